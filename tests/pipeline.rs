use call_activity_metrics::dashboard::{load_records, metrics_for};
use call_activity_metrics::{
    build_metrics, date_range_for, DurationKey, PipelineError, RepDirectory, Selection,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

const SHEET: &str = "\
Timestamp,RepName,Disposition,Duration (seconds)
2024-01-01T10:00:00Z,Tom,Meeting Scheduled,310
2024-01-01T11:00:00Z,Tom,No Answer,0
2024-01-01T12:00:00Z,Mario,\"Gatekeeper, front desk\",45
not a date,Tom,Connected,12
";

#[test]
fn scoped_scenario_produces_expected_kpis() {
    let now = Utc.with_ymd_and_hms(2024, 1, 4, 8, 0, 0).unwrap();
    let selection = Selection {
        client: Some("NewCo Capital".to_string()),
        duration: DurationKey::Last7Days,
    };

    let metrics = build_metrics(SHEET, &RepDirectory::default(), &selection, now).unwrap();

    assert_eq!(metrics.totals.calls, 2);
    assert_eq!(metrics.totals.connects, 1);
    assert_eq!(metrics.totals.meetings, 1);
    assert_eq!(metrics.kpis.connect_rate, "50.0");
    assert_eq!(metrics.kpis.conversion_rate, "100.0");
    assert_eq!(metrics.rep_metrics.len(), 1);
    assert_eq!(metrics.rep_metrics[0].rep_name, "Tom");
    assert_eq!(metrics.calls_by_date.len(), 1);
    assert_eq!(metrics.calls_by_date[0].date, "Jan 01");
}

#[test]
fn undated_rows_survive_normalization_but_not_date_scoping() {
    let directory = RepDirectory::default();
    let records = load_records(SHEET, &directory).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[2].disposition, "Gatekeeper, front desk");
    assert_eq!(records[2].client.as_deref(), Some("Kodem Security"));
    assert!(records[3].call_date.is_none());

    let now = Utc.with_ymd_and_hms(2024, 1, 4, 8, 0, 0).unwrap();
    let range = date_range_for(DurationKey::Last30Days, now);
    let metrics = metrics_for(&records, &directory, None, &range);
    assert_eq!(metrics.totals.calls, 3);
    assert_eq!(metrics.kpis.gatekeeper_rate, "33.3");
}

#[test]
fn metrics_serialize_with_camel_case_keys() {
    let now = Utc.with_ymd_and_hms(2024, 1, 4, 8, 0, 0).unwrap();
    let selection = Selection {
        client: None,
        duration: DurationKey::Last7Days,
    };
    let metrics = build_metrics(SHEET, &RepDirectory::default(), &selection, now).unwrap();
    let json = serde_json::to_value(&metrics).unwrap();
    assert_eq!(json["kpis"]["connectRate"], "33.3");
    assert!(json["repMetrics"][0]["callsPerWeek"].is_string());
    assert!(json["dispositionDistribution"].is_array());
    assert!(json["callsByDate"].is_array());
}

#[test]
fn empty_text_is_rejected_before_aggregation() {
    let selection = Selection {
        client: None,
        duration: DurationKey::Last7Days,
    };
    let result = build_metrics("  \n\n", &RepDirectory::default(), &selection, Utc::now());
    assert!(matches!(result, Err(PipelineError::EmptyInput)));
}
