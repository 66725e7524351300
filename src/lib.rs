//! Call-center activity metrics.
//!
//! Raw sheet text flows through [`sheet`] parsing, [`normalize`] into
//! [`models::CallRecord`]s, [`filter`] scoping, and [`metrics`] aggregation.
//! [`dashboard`] wires the stages to a [`source::SheetSource`].

pub mod config;
pub mod dashboard;
pub mod directory;
pub mod disposition;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod report;
pub mod sheet;
pub mod source;

pub use dashboard::{build_metrics, Dashboard, RefreshSlot, Selection};
pub use directory::RepDirectory;
pub use error::{FetchError, PipelineError};
pub use filter::{date_range_for, DurationKey, ALL_CLIENTS};
pub use models::{CallRecord, DateRange, Metrics};
