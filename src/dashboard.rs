//! End-to-end pipeline: raw text to metrics, plus the slot holding the most
//! recent result for periodic refreshes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::directory::RepDirectory;
use crate::error::PipelineError;
use crate::filter::{date_range_for, filter_by_client, filter_by_date_range, DurationKey};
use crate::metrics::calculate_metrics;
use crate::models::{CallRecord, DateRange, Metrics};
use crate::normalize::normalize_rows;
use crate::sheet::parse_csv;
use crate::source::SheetSource;

/// The two dashboard selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub client: Option<String>,
    pub duration: DurationKey,
}

impl Selection {
    pub fn range_at(&self, now: DateTime<Utc>) -> DateRange {
        date_range_for(self.duration, now)
    }
}

pub fn load_records(text: &str, directory: &RepDirectory) -> Result<Vec<CallRecord>, PipelineError> {
    let rows = parse_csv(text)?;
    Ok(normalize_rows(&rows, directory))
}

/// Scopes the full record set to a client and window, then aggregates.
pub fn metrics_for(
    records: &[CallRecord],
    directory: &RepDirectory,
    client: Option<&str>,
    range: &DateRange,
) -> Metrics {
    let scoped = filter_by_client(records, client, directory);
    let scoped = filter_by_date_range(&scoped, range);
    calculate_metrics(&scoped)
}

pub fn build_metrics(
    text: &str,
    directory: &RepDirectory,
    selection: &Selection,
    now: DateTime<Utc>,
) -> Result<Metrics, PipelineError> {
    let records = load_records(text, directory)?;
    Ok(metrics_for(
        &records,
        directory,
        selection.client.as_deref(),
        &selection.range_at(now),
    ))
}

/// Holds the latest committed metrics. Each fetch takes a ticket; a result only
/// lands if its ticket is newer than the one already committed.
#[derive(Debug, Default)]
pub struct RefreshSlot {
    next_ticket: AtomicU64,
    committed: Mutex<Option<(u64, Arc<Metrics>)>>,
}

impl RefreshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns false when a newer result was already committed.
    pub fn commit(&self, ticket: u64, metrics: Metrics) -> bool {
        let mut committed = match self.committed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if committed.as_ref().is_some_and(|(current, _)| *current >= ticket) {
            tracing::debug!(ticket, "discarding superseded refresh result");
            return false;
        }
        *committed = Some((ticket, Arc::new(metrics)));
        true
    }

    pub fn latest(&self) -> Option<Arc<Metrics>> {
        let committed = match self.committed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        committed.as_ref().map(|(_, metrics)| Arc::clone(metrics))
    }
}

/// A source, a directory and a refresh slot.
pub struct Dashboard {
    source: Box<dyn SheetSource>,
    directory: RepDirectory,
    slot: RefreshSlot,
}

impl Dashboard {
    pub fn new(source: Box<dyn SheetSource>, directory: RepDirectory) -> Self {
        Self {
            source,
            directory,
            slot: RefreshSlot::new(),
        }
    }

    pub fn directory(&self) -> &RepDirectory {
        &self.directory
    }

    pub async fn fetch_records(&self) -> Result<Vec<CallRecord>, PipelineError> {
        let text = self.source.fetch().await?;
        load_records(&text, &self.directory)
    }

    /// Fetches, recomputes and commits. On failure the previously committed
    /// metrics stay in place and the error is returned.
    pub async fn refresh(&self, selection: &Selection) -> Result<Option<Arc<Metrics>>, PipelineError> {
        let ticket = self.slot.begin();
        let records = match self.fetch_records().await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(source = %self.source.describe(), error = %err, "refresh failed");
                return Err(err);
            }
        };
        let metrics = metrics_for(
            &records,
            &self.directory,
            selection.client.as_deref(),
            &selection.range_at(Utc::now()),
        );
        if self.slot.commit(ticket, metrics) {
            tracing::info!(ticket, records = records.len(), "metrics refreshed");
        }
        Ok(self.slot.latest())
    }

    pub fn latest(&self) -> Option<Arc<Metrics>> {
        self.slot.latest()
    }
}
