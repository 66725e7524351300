use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;

use crate::dashboard::Selection;
use crate::directory::RepDirectory;
use crate::filter::{DurationKey, ALL_CLIENTS};
use crate::source::{spreadsheet_export_url, FileSource, HttpSource, SheetSource};

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Read the sheet export from a local CSV file
    #[arg(long, conflicts_with_all = ["spreadsheet_id", "sheet_url"])]
    pub csv: Option<PathBuf>,
    /// Spreadsheet to export as CSV
    #[arg(long, env = "SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,
    /// Sheet tab id within the spreadsheet
    #[arg(long, default_value = "0")]
    pub gid: String,
    /// Full CSV URL, overriding the spreadsheet export URL
    #[arg(long, env = "SHEET_CSV_URL")]
    pub sheet_url: Option<String>,
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl SourceArgs {
    pub fn build(&self) -> anyhow::Result<Box<dyn SheetSource>> {
        if let Some(path) = &self.csv {
            return Ok(Box::new(FileSource::new(path.clone())));
        }

        let url = match (&self.sheet_url, &self.spreadsheet_id) {
            (Some(url), _) => url.clone(),
            (None, Some(id)) => spreadsheet_export_url(id, &self.gid),
            (None, None) => {
                anyhow::bail!("one of --csv, --sheet-url or --spreadsheet-id (SPREADSHEET_ID) is required")
            }
        };
        let source = HttpSource::new(url, Duration::from_secs(self.timeout_secs))
            .context("failed to build HTTP client")?;
        Ok(Box::new(source))
    }
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Client to scope to, or "All"
    #[arg(long, default_value = ALL_CLIENTS)]
    pub client: String,
    /// yesterday, 7days, 14days or 30days
    #[arg(long, default_value = "7days")]
    pub range: DurationKey,
    /// JSON rep directory replacing the built-in table
    #[arg(long, env = "REP_DIRECTORY")]
    pub directory: Option<PathBuf>,
}

impl FilterArgs {
    pub fn selection(&self) -> Selection {
        Selection {
            client: Some(self.client.clone()),
            duration: self.range,
        }
    }

    pub fn directory(&self) -> anyhow::Result<RepDirectory> {
        match &self.directory {
            Some(path) => Ok(RepDirectory::from_json_file(path)?),
            None => Ok(RepDirectory::default()),
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the default level.
pub fn init_tracing(log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "call_activity_metrics=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    }

    #[test]
    fn defaults_select_all_clients_for_seven_days() {
        let harness = Harness::try_parse_from(["test", "--csv", "calls.csv"]).unwrap();
        let selection = harness.filter.selection();
        assert_eq!(selection.client.as_deref(), Some(ALL_CLIENTS));
        assert_eq!(selection.duration, DurationKey::Last7Days);
        assert!(harness.source.build().unwrap().describe().ends_with("calls.csv"));
    }

    #[test]
    fn rejects_unknown_range() {
        assert!(Harness::try_parse_from(["test", "--csv", "x.csv", "--range", "90days"]).is_err());
    }

    #[test]
    fn spreadsheet_id_builds_export_url() {
        let harness =
            Harness::try_parse_from(["test", "--spreadsheet-id", "sheet42", "--gid", "7"]).unwrap();
        let source = harness.source.build().unwrap();
        assert_eq!(
            source.describe(),
            "https://docs.google.com/spreadsheets/d/sheet42/export?format=csv&gid=7"
        );
    }
}
