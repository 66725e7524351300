//! Where the raw sheet text comes from.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;

/// Produces the full CSV text of the current sheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;

    fn describe(&self) -> String;
}

/// A CSV export already on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SheetSource for FileSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// CSV export of a published spreadsheet, fetched over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub fn spreadsheet_export_url(spreadsheet_id: &str, gid: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/export?format=csv&gid={gid}")
}

#[async_trait]
impl SheetSource for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/csv")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody(self.url.clone()));
        }
        tracing::info!(url = %self.url, bytes = body.len(), "fetched sheet export");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
