use std::fmt::Write;

use crate::models::{DateRange, Metrics};

pub fn build_report(client: Option<&str>, range: &DateRange, metrics: &Metrics) -> String {
    let mut output = String::new();
    let client_label = client.unwrap_or("all clients");

    let _ = writeln!(output, "# Call Activity Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} to {})",
        client_label,
        range.start.format("%Y-%m-%d %H:%M"),
        range.end.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Headline");
    let _ = writeln!(
        output,
        "- {} calls, {} connects, {} meetings",
        metrics.totals.calls, metrics.totals.connects, metrics.totals.meetings
    );
    let _ = writeln!(output, "- Connect rate {}%", metrics.kpis.connect_rate);
    let _ = writeln!(output, "- Gatekeeper rate {}%", metrics.kpis.gatekeeper_rate);
    let _ = writeln!(output, "- Conversion rate {}%", metrics.kpis.conversion_rate);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Reps");

    if metrics.rep_metrics.is_empty() {
        let _ = writeln!(output, "No rep activity in this window.");
    } else {
        let _ = writeln!(
            output,
            "| Rep | Calls | Calls/day | Calls/week | Connect % | Gatekeeper % | Meetings | Conversion % |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for rep in &metrics.rep_metrics {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
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

    let _ = writeln!(output);
    let _ = writeln!(output, "## Disposition Mix");

    if metrics.disposition_distribution.is_empty() {
        let _ = writeln!(output, "No calls recorded for this window.");
    } else {
        for share in &metrics.disposition_distribution {
            let _ = writeln!(
                output,
                "- {}: {} calls ({}%)",
                share.name, share.count, share.percentage
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Calls by Date");

    if metrics.calls_by_date.is_empty() {
        let _ = writeln!(output, "No dated calls in this window.");
    } else {
        for day in &metrics.calls_by_date {
            let _ = writeln!(output, "- {}: {}", day.date, day.count);
        }
    }

    output
}
