use std::path::PathBuf;

use thiserror::Error;

/// Failures retrieving the raw sheet text. Kept apart from parse failures so
/// callers can offer a retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("empty response from {0}")]
    EmptyBody(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input has no usable lines")]
    EmptyInput,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid rep directory {path}: {reason}")]
    Directory { path: PathBuf, reason: String },
}
