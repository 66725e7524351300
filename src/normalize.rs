use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::directory::RepDirectory;
use crate::disposition::Classification;
use crate::models::CallRecord;
use crate::sheet::RawRow;

/// Accepted header spellings per field, highest priority first.
pub const TIMESTAMP_HEADERS: &[&str] = &["Timestamp", "timestamp"];
pub const REP_NAME_HEADERS: &[&str] = &["Rep Name", "rep name", "RepName"];
pub const DISPOSITION_HEADERS: &[&str] = &["Disposition", "disposition"];
pub const DURATION_HEADERS: &[&str] = &["Duration (seconds)", "Duration"];

const ISO_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

const LOOSE_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
];

const LOOSE_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%d %b %Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampParse {
    Parsed(DateTime<Utc>),
    Unparseable,
}

impl TimestampParse {
    pub fn ok(self) -> Option<DateTime<Utc>> {
        match self {
            TimestampParse::Parsed(instant) => Some(instant),
            TimestampParse::Unparseable => None,
        }
    }
}

/// First non-empty value among the aliases, in alias order.
fn field<'a>(row: &'a RawRow, aliases: &[&str]) -> &'a str {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn parse_loose(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc2822(text) {
        return Some(instant.with_timezone(&Utc));
    }
    LOOSE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            LOOSE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// ISO-8601 first, then common spreadsheet layouts. Zone-less values are UTC.
pub fn parse_timestamp(text: &str) -> TimestampParse {
    let text = text.trim();
    if text.is_empty() {
        return TimestampParse::Unparseable;
    }
    match parse_iso(text).or_else(|| parse_loose(text)) {
        Some(instant) => TimestampParse::Parsed(instant),
        None => {
            tracing::warn!(timestamp = text, "unparseable call timestamp");
            TimestampParse::Unparseable
        }
    }
}

pub fn parse_duration(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds,
        _ => 0.0,
    }
}

pub fn normalize_row(row: &RawRow, directory: &RepDirectory) -> CallRecord {
    let timestamp = field(row, TIMESTAMP_HEADERS);
    let rep_name = field(row, REP_NAME_HEADERS).trim();
    let disposition = field(row, DISPOSITION_HEADERS).trim();
    let facets = Classification::of(disposition);

    CallRecord {
        timestamp: timestamp.to_string(),
        call_date: parse_timestamp(timestamp).ok(),
        rep_name: rep_name.to_string(),
        client: directory.resolve_client(rep_name).map(str::to_string),
        disposition: disposition.to_string(),
        duration: parse_duration(field(row, DURATION_HEADERS)),
        is_connect: facets.connect,
        is_gatekeeper: facets.gatekeeper,
        is_meeting_scheduled: facets.meeting_scheduled,
    }
}

pub fn normalize_rows(rows: &[RawRow], directory: &RepDirectory) -> Vec<CallRecord> {
    let records: Vec<CallRecord> = rows
        .iter()
        .map(|row| normalize_row(row, directory))
        .collect();
    let undated = records.iter().filter(|record| record.call_date.is_none()).count();
    tracing::debug!(records = records.len(), undated, "normalized call records");
    records
}
