use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use call_activity_metrics::config::{init_tracing, FilterArgs, SourceArgs};
use call_activity_metrics::dashboard::{metrics_for, Dashboard};
use call_activity_metrics::report;
use call_activity_metrics::{DateRange, Metrics, RepDirectory, ALL_CLIENTS};

#[derive(Parser)]
#[command(name = "call-metrics")]
#[command(about = "Connect, gatekeeper and conversion metrics from call activity sheets", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepFormat {
    Table,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metrics for a selection as JSON
    Metrics {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Per-rep productivity breakdown
    Reps {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = RepFormat::Table)]
        format: RepFormat,
    },
    /// List the clients known to the rep directory
    Clients {
        #[arg(long, env = "REP_DIRECTORY")]
        directory: Option<PathBuf>,
    },
    /// Re-fetch and recompute on a timer
    Watch {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

/// One fetch, scoped to the selection as of now.
async fn compute(source: &SourceArgs, filter: &FilterArgs) -> anyhow::Result<(Metrics, DateRange)> {
    let dashboard = Dashboard::new(source.build()?, filter.directory()?);
    let selection = filter.selection();
    let range = selection.range_at(Utc::now());
    let records = dashboard.fetch_records().await?;
    let metrics = metrics_for(
        &records,
        dashboard.directory(),
        selection.client.as_deref(),
        &range,
    );
    Ok((metrics, range))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Metrics { source, filter } => {
            let (metrics, _) = compute(&source, &filter).await?;
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
        Commands::Report {
            source,
            filter,
            out,
        } => {
            let (metrics, range) = compute(&source, &filter).await?;
            let report = report::build_report(Some(filter.client.as_str()), &range, &metrics);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Reps {
            source,
            filter,
            format,
        } => {
            let (metrics, _) = compute(&source, &filter).await?;

            match format {
                RepFormat::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    for rep in &metrics.rep_metrics {
                        writer.serialize(rep)?;
                    }
                    writer.flush()?;
                }
                RepFormat::Table => {
                    if metrics.rep_metrics.is_empty() {
                        println!("No rep activity for this selection.");
                        return Ok(());
                    }
                    for rep in &metrics.rep_metrics {
                        println!(
                            "- {}: {} calls ({}/day, {}/week), connect {}%, gatekeeper {}%, {} meetings, conversion {}%",
                            rep.rep_name,
                            rep.total_calls,
                            rep.calls_per_day,
                            rep.calls_per_week,
                            rep.connect_rate,
                            rep.gatekeeper_rate,
                            rep.meetings_scheduled,
                            rep.conversion_rate
                        );
                    }
                }
            }
        }
        Commands::Clients { directory } => {
            let directory = match directory {
                Some(path) => RepDirectory::from_json_file(&path)?,
                None => RepDirectory::default(),
            };
            println!("{ALL_CLIENTS}");
            for client in directory.clients() {
                println!("{client}");
            }
        }
        Commands::Watch {
            source,
            filter,
            interval_secs,
        } => {
            let dashboard = Dashboard::new(source.build()?, filter.directory()?);
            let selection = filter.selection();
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

            loop {
                ticker.tick().await;
                // Errors are logged inside refresh; the last good metrics stay current.
                if let Ok(Some(metrics)) = dashboard.refresh(&selection).await {
                    println!(
                        "{} calls, connect {}%, gatekeeper {}%, conversion {}%",
                        metrics.totals.calls,
                        metrics.kpis.connect_rate,
                        metrics.kpis.gatekeeper_rate,
                        metrics.kpis.conversion_rate
                    );
                }
            }
        }
    }

    Ok(())
}
