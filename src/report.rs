use std::fmt::Write;

use crate::models::{FilterSelection, GroupChoice, SummaryMetrics};
use crate::view::ViewModel;

pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{value:.2}%"),
        None => "no data".to_string(),
    }
}

pub fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(value) => format!("{value:.2}"),
        None => "no data".to_string(),
    }
}

fn group_label(selection: &FilterSelection) -> String {
    match &selection.group {
        GroupChoice::All => "all groups".to_string(),
        GroupChoice::Group(name) => format!("group {name}"),
    }
}

fn write_summary(output: &mut String, summary: &SummaryMetrics) {
    let _ = writeln!(output, "- Total users: {}", summary.total_users);
    let _ = writeln!(output, "- Avg. sessions: {}", format_mean(summary.avg_sessions));
    let _ = writeln!(output, "- Retention rate: {}", format_rate(summary.retention_rate));
}

pub fn build_report(selection: &FilterSelection, view: &ViewModel) -> String {
    let (start, end) = selection.date_range;
    let mut output = String::new();

    let _ = writeln!(output, "# User Behavior Analytics Report");
    let _ = writeln!(
        output,
        "Generated for {} (signups {} to {})",
        group_label(selection),
        start,
        end
    );

    if view.malformed_records > 0 {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "Warning: {} record(s) have last_active_date before signup_date.",
            view.malformed_records
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    write_summary(&mut output, &view.summary);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Signup Trend");
    if view.weekly_trend.is_empty() {
        let _ = writeln!(output, "No signups in the filtered range.");
    } else {
        for entry in view.weekly_trend.iter() {
            let _ = writeln!(
                output,
                "- week of {}: {} signups",
                entry.week_start, entry.signups
            );
        }
    }

    if let Some(comparison) = &view.retention_comparison {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Retention by A/B Group");
        if comparison.by_group.is_empty() {
            let _ = writeln!(output, "No groups present in the filtered set.");
        } else {
            for group in comparison.by_group.iter() {
                let _ = writeln!(
                    output,
                    "- {}: {:.2}%",
                    group.ab_group, group.retention_rate
                );
            }
        }
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", comparison.insight);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Raw Data Preview");
    if view.preview.is_empty() {
        let _ = writeln!(output, "No rows to preview.");
    } else {
        for row in view.preview.iter() {
            let mut line = format!(
                "- {} | signup {} | last active {} | group {} | {} sessions | retained: {}",
                row.record.user_id,
                row.record.signup_date,
                row.record.last_active_date,
                row.record.ab_group,
                row.record.session_count,
                if row.retained { "yes" } else { "no" }
            );
            for (column, value) in row.record.extras.iter() {
                let _ = write!(line, " | {column}: {value}");
            }
            let _ = writeln!(output, "{line}");
        }
    }

    output
}
