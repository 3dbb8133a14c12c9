use std::collections::BTreeMap;

use crate::models::{GroupRetention, SummaryMetrics, UserRow, WeeklySignups};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weekly signup counts, ascending by week. Weeks with no signups in the
/// working set are not synthesized; only weeks present in the data appear.
pub fn weekly_signups(rows: &[UserRow]) -> Vec<WeeklySignups> {
    let mut counts: BTreeMap<chrono::NaiveDate, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.signup_week).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(week_start, signups)| WeeklySignups { week_start, signups })
        .collect()
}

/// Retention rate per cohort group as a percentage, ordered by group name.
pub fn retention_by_group(rows: &[UserRow]) -> Vec<GroupRetention> {
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.record.ab_group.clone()).or_insert((0, 0));
        entry.0 += 1;
        if row.retained {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(ab_group, (total, retained))| GroupRetention {
            ab_group,
            retention_rate: round2(retained as f64 / total as f64 * 100.0),
        })
        .collect()
}

pub fn summary_metrics(rows: &[UserRow]) -> SummaryMetrics {
    if rows.is_empty() {
        return SummaryMetrics {
            total_users: 0,
            avg_sessions: None,
            retention_rate: None,
        };
    }

    let total = rows.len();
    let session_sum: u64 = rows.iter().map(|row| row.record.session_count as u64).sum();
    let retained = rows.iter().filter(|row| row.retained).count();

    SummaryMetrics {
        total_users: total,
        avg_sessions: Some(round2(session_sum as f64 / total as f64)),
        retention_rate: Some(round2(retained as f64 / total as f64 * 100.0)),
    }
}
