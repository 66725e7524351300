use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::directory::RepDirectory;
use crate::models::{CallRecord, DateRange};

/// Client selector value meaning "no client filter".
pub const ALL_CLIENTS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationKey {
    Yesterday,
    Last7Days,
    Last14Days,
    Last30Days,
}

#[derive(Debug, Error)]
#[error("unknown duration {0:?}, expected one of yesterday, 7days, 14days, 30days")]
pub struct UnknownDurationKey(pub String);

impl FromStr for DurationKey {
    type Err = UnknownDurationKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "yesterday" => Ok(DurationKey::Yesterday),
            "7days" => Ok(DurationKey::Last7Days),
            "14days" => Ok(DurationKey::Last14Days),
            "30days" => Ok(DurationKey::Last30Days),
            other => Err(UnknownDurationKey(other.to_string())),
        }
    }
}

impl fmt::Display for DurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            DurationKey::Yesterday => "yesterday",
            DurationKey::Last7Days => "7days",
            DurationKey::Last14Days => "14days",
            DurationKey::Last30Days => "30days",
        };
        f.write_str(key)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

/// Concrete window for a duration key. The multi-day windows start at
/// midnight N days before `now` and end at `now` itself.
pub fn date_range_for(key: DurationKey, now: DateTime<Utc>) -> DateRange {
    let today = now.date_naive();
    let lookback = |days: i64| DateRange {
        start: start_of_day(today - Duration::days(days)),
        end: now,
    };

    match key {
        DurationKey::Yesterday => {
            let yesterday = today - Duration::days(1);
            DateRange {
                start: start_of_day(yesterday),
                end: end_of_day(yesterday),
            }
        }
        DurationKey::Last7Days => lookback(7),
        DurationKey::Last14Days => lookback(14),
        DurationKey::Last30Days => lookback(30),
    }
}

pub fn filter_by_client(
    records: &[CallRecord],
    client: Option<&str>,
    directory: &RepDirectory,
) -> Vec<CallRecord> {
    let client = match client {
        None | Some(ALL_CLIENTS) => return records.to_vec(),
        Some(client) => client,
    };

    let reps = directory.reps_for_client(client);
    records
        .iter()
        .filter(|record| reps.iter().any(|rep| record.rep_name.contains(*rep)))
        .cloned()
        .collect()
}

/// Keeps dated records inside the inclusive range; undated records are dropped.
pub fn filter_by_date_range(records: &[CallRecord], range: &DateRange) -> Vec<CallRecord> {
    records
        .iter()
        .filter(|record| record.call_date.is_some_and(|instant| range.contains(instant)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(rep_name: &str, call_date: Option<DateTime<Utc>>) -> CallRecord {
        CallRecord {
            timestamp: String::new(),
            call_date,
            rep_name: rep_name.to_string(),
            client: None,
            disposition: "Connected".to_string(),
            duration: 0.0,
            is_connect: true,
            is_gatekeeper: false,
            is_meeting_scheduled: false,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn duration_keys_parse_and_reject_unknown() {
        assert_eq!("14days".parse::<DurationKey>().unwrap(), DurationKey::Last14Days);
        assert_eq!(DurationKey::Yesterday.to_string(), "yesterday");
        assert!("90days".parse::<DurationKey>().is_err());
    }

    #[test]
    fn yesterday_covers_the_whole_previous_day() {
        let now = at(2024, 3, 10, 15, 30, 0);
        let range = date_range_for(DurationKey::Yesterday, now);
        assert_eq!(range.start, at(2024, 3, 9, 0, 0, 0));
        assert!(range.contains(at(2024, 3, 9, 23, 59, 59)));
        assert!(!range.contains(at(2024, 3, 10, 0, 0, 0)));
    }

    #[test]
    fn lookback_windows_end_at_now() {
        let now = at(2024, 3, 10, 15, 30, 0);
        let range = date_range_for(DurationKey::Last7Days, now);
        assert_eq!(range.start, at(2024, 3, 3, 0, 0, 0));
        assert_eq!(range.end, now);
        assert!(!range.contains(at(2024, 3, 10, 15, 30, 1)));

        let month = date_range_for(DurationKey::Last30Days, now);
        assert_eq!(month.start, at(2024, 2, 9, 0, 0, 0));
    }

    #[test]
    fn client_filter_matches_directory_substrings() {
        let records = vec![
            record("Tom B.", None),
            record("Bryan", None),
            record("Alex", None),
            record("", None),
        ];
        let directory = RepDirectory::default();

        let newco = filter_by_client(&records, Some("NewCo Capital"), &directory);
        let names: Vec<&str> = newco.iter().map(|r| r.rep_name.as_str()).collect();
        assert_eq!(names, vec!["Tom B.", "Bryan"]);

        assert_eq!(filter_by_client(&records, Some(ALL_CLIENTS), &directory).len(), 4);
        assert_eq!(filter_by_client(&records, None, &directory).len(), 4);
        assert!(filter_by_client(&records, Some("Unknown Co"), &directory).is_empty());
    }

    #[test]
    fn date_filter_is_inclusive_and_drops_undated() {
        let range = DateRange {
            start: at(2024, 1, 1, 0, 0, 0),
            end: at(2024, 1, 2, 0, 0, 0),
        };
        let records = vec![
            record("a", Some(at(2024, 1, 1, 0, 0, 0))),
            record("b", Some(at(2024, 1, 2, 0, 0, 0))),
            record("c", Some(at(2024, 1, 2, 0, 0, 1))),
            record("d", None),
        ];
        let kept = filter_by_date_range(&records, &range);
        let names: Vec<&str> = kept.iter().map(|r| r.rep_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
