use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub rep: String,
    pub client: String,
}

/// Ordered rep-key to client table. A rep name matches an entry when it
/// contains the entry's key; the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepDirectory {
    entries: Vec<DirectoryEntry>,
}

impl Default for RepDirectory {
    fn default() -> Self {
        Self::new([
            ("Tom", "NewCo Capital"),
            ("Bryan", "NewCo Capital"),
            ("Afif", "Baton Market"),
            ("Alex", "Baton Market"),
            ("Mario", "Kodem Security"),
        ])
    }
}

impl RepDirectory {
    pub fn new<I, R, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(rep, client)| DirectoryEntry {
                    rep: rep.into(),
                    client: client.into(),
                })
                .collect(),
        }
    }

    /// Reads a JSON array of `{"rep": .., "client": ..}` objects, keeping file order.
    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let invalid = |reason: String| PipelineError::Directory {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|err| invalid(err.to_string()))?;
        let entries: Vec<DirectoryEntry> =
            serde_json::from_str(&text).map_err(|err| invalid(err.to_string()))?;
        if let Some(entry) = entries.iter().find(|entry| entry.rep.is_empty()) {
            return Err(invalid(format!(
                "empty rep key for client {:?}",
                entry.client
            )));
        }
        tracing::debug!(entries = entries.len(), path = %path.display(), "loaded rep directory");
        Ok(Self { entries })
    }

    pub fn resolve_client(&self, rep_name: &str) -> Option<&str> {
        if rep_name.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| rep_name.contains(entry.rep.as_str()))
            .map(|entry| entry.client.as_str())
    }

    pub fn reps_for_client(&self, client: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.client == client)
            .map(|entry| entry.rep.as_str())
            .collect()
    }

    /// Distinct client names in table order.
    pub fn clients(&self) -> Vec<&str> {
        let mut clients: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !clients.contains(&entry.client.as_str()) {
                clients.push(entry.client.as_str());
            }
        }
        clients
    }
}
