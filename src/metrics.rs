use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::disposition::is_excluded_from_connect_rate;
use crate::models::{CallRecord, DailyCount, DispositionShare, Kpis, Metrics, RepMetrics, Totals};

const UNKNOWN_DISPOSITION: &str = "Unknown";

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percent(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

#[derive(Default)]
struct Tally {
    calls: usize,
    connects: usize,
    gatekeepers: usize,
    meetings: usize,
}

impl Tally {
    fn add(&mut self, record: &CallRecord) {
        self.calls += 1;
        if !is_excluded_from_connect_rate(&record.disposition) {
            self.connects += 1;
        }
        if record.is_gatekeeper {
            self.gatekeepers += 1;
        }
        if record.is_meeting_scheduled {
            self.meetings += 1;
        }
    }

    fn kpis(&self) -> Kpis {
        Kpis {
            connect_rate: one_decimal(percent(self.connects, self.calls)),
            gatekeeper_rate: one_decimal(percent(self.gatekeepers, self.calls)),
            conversion_rate: one_decimal(percent(self.meetings, self.connects)),
        }
    }
}

/// Aggregates an already filtered record set. Empty input yields [`Metrics::empty`].
pub fn calculate_metrics(records: &[CallRecord]) -> Metrics {
    if records.is_empty() {
        return Metrics::empty();
    }

    let mut tally = Tally::default();
    for record in records {
        tally.add(record);
    }

    Metrics {
        kpis: tally.kpis(),
        totals: Totals {
            calls: tally.calls,
            connects: tally.connects,
            meetings: tally.meetings,
        },
        rep_metrics: rep_metrics(records),
        disposition_distribution: disposition_distribution(records),
        calls_by_date: calls_by_date(records),
    }
}

/// Per-rep summaries keyed by the exact rep name, in order of first appearance.
/// Records without a rep name are skipped.
pub fn rep_metrics(records: &[CallRecord]) -> Vec<RepMetrics> {
    let mut order: Vec<&str> = Vec::new();
    let mut reps: HashMap<&str, (Tally, HashSet<NaiveDate>)> = HashMap::new();

    for record in records {
        if record.rep_name.is_empty() {
            continue;
        }
        let entry = reps.entry(record.rep_name.as_str()).or_insert_with(|| {
            order.push(record.rep_name.as_str());
            (Tally::default(), HashSet::new())
        });
        entry.0.add(record);
        if let Some(instant) = record.call_date {
            entry.1.insert(instant.date_naive());
        }
    }

    order
        .into_iter()
        .filter_map(|rep_name| reps.remove(rep_name).map(|summary| (rep_name, summary)))
        .map(|(rep_name, (tally, days))| {
            let unique_days = days.len();
            let calls_per_day = tally.calls as f64 / unique_days.max(1) as f64;
            let kpis = tally.kpis();
            RepMetrics {
                rep_name: rep_name.to_string(),
                total_calls: tally.calls,
                connects: tally.connects,
                gatekeepers: tally.gatekeepers,
                meetings_scheduled: tally.meetings,
                unique_days,
                calls_per_day: one_decimal(calls_per_day),
                calls_per_week: one_decimal(calls_per_day * 7.0),
                connect_rate: kpis.connect_rate,
                gatekeeper_rate: kpis.gatekeeper_rate,
                conversion_rate: kpis.conversion_rate,
            }
        })
        .collect()
}

/// Share of each exact disposition label, largest first. Ties keep first-seen order.
pub fn disposition_distribution(records: &[CallRecord]) -> Vec<DispositionShare> {
    let total = records.len();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let name = if record.disposition.is_empty() {
            UNKNOWN_DISPOSITION
        } else {
            record.disposition.as_str()
        };
        let count = counts.entry(name).or_insert_with(|| {
            order.push(name);
            0
        });
        *count += 1;
    }

    let mut shares: Vec<DispositionShare> = order
        .into_iter()
        .map(|name| {
            let count = counts.get(name).copied().unwrap_or_default();
            DispositionShare {
                name: name.to_string(),
                count,
                percentage: format!("{:.2}", percent(count, total)),
            }
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Daily call counts, oldest first. Grouped by calendar date so the same
/// month/day in different years stay apart.
pub fn calls_by_date(records: &[CallRecord]) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for instant in records.iter().filter_map(|record| record.call_date) {
        *days.entry(instant.date_naive()).or_default() += 1;
    }

    days.into_iter()
        .map(|(date, count)| DailyCount {
            date: date.format("%b %d").to_string(),
            count,
        })
        .collect()
}
