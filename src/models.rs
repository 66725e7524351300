use chrono::{DateTime, Utc};
use serde::Serialize;

/// One normalized call, built once per parsed row and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub timestamp: String,
    pub call_date: Option<DateTime<Utc>>,
    pub rep_name: String,
    pub client: Option<String>,
    pub disposition: String,
    pub duration: f64,
    pub is_connect: bool,
    pub is_gatekeeper: bool,
    pub is_meeting_scheduled: bool,
}

/// Inclusive interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub connect_rate: String,
    pub gatekeeper_rate: String,
    pub conversion_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub calls: usize,
    pub connects: usize,
    pub meetings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepMetrics {
    pub rep_name: String,
    pub total_calls: usize,
    pub connects: usize,
    pub gatekeepers: usize,
    pub meetings_scheduled: usize,
    pub unique_days: usize,
    pub calls_per_day: String,
    pub calls_per_week: String,
    pub connect_rate: String,
    pub gatekeeper_rate: String,
    pub conversion_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispositionShare {
    pub name: String,
    pub count: usize,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: usize,
}

/// Everything the dashboard shows for one client/date-range selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub kpis: Kpis,
    pub totals: Totals,
    pub rep_metrics: Vec<RepMetrics>,
    pub disposition_distribution: Vec<DispositionShare>,
    pub calls_by_date: Vec<DailyCount>,
}

impl Metrics {
    pub fn empty() -> Self {
        Self {
            kpis: Kpis {
                connect_rate: "0.0".to_string(),
                gatekeeper_rate: "0.0".to_string(),
                conversion_rate: "0.0".to_string(),
            },
            totals: Totals {
                calls: 0,
                connects: 0,
                meetings: 0,
            },
            rep_metrics: Vec::new(),
            disposition_distribution: Vec::new(),
            calls_by_date: Vec::new(),
        }
    }
}
