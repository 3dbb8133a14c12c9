use serde::Serialize;

use crate::aggregate;
use crate::error::AnalyticsError;
use crate::filter;
use crate::insight::{self, Insight};
use crate::models::{
    FilterSelection, GroupChoice, GroupRetention, SummaryMetrics, UserRecord, UserRow,
    WeeklySignups,
};
use crate::retention;

pub const PREVIEW_ROWS: usize = 10;

/// Present only when the group selection is `All`; comparing a single
/// cohort against itself has no meaning.
#[derive(Debug, Clone, Serialize)]
pub struct RetentionComparison {
    pub by_group: Vec<GroupRetention>,
    pub insight: Insight,
}

/// Everything one render cycle hands to a presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub summary: SummaryMetrics,
    pub weekly_trend: Vec<WeeklySignups>,
    pub retention_comparison: Option<RetentionComparison>,
    pub preview: Vec<UserRow>,
    pub malformed_records: usize,
}

/// One full pass: derive fields, filter, aggregate, compare. Pure and
/// UI-free; every derived structure is rebuilt from the base records.
pub fn render_cycle(
    records: &[UserRecord],
    selection: &FilterSelection,
) -> Result<ViewModel, AnalyticsError> {
    let rows = retention::enrich(records);
    let malformed_records = rows
        .iter()
        .filter(|row| row.record.last_active_date < row.record.signup_date)
        .count();

    let working_set = filter::apply(rows, selection)?;

    let summary = aggregate::summary_metrics(&working_set);
    let weekly_trend = aggregate::weekly_signups(&working_set);
    let retention_comparison = match selection.group {
        GroupChoice::All => {
            let by_group = aggregate::retention_by_group(&working_set);
            let insight = insight::compare_groups(&by_group);
            Some(RetentionComparison { by_group, insight })
        }
        GroupChoice::Group(_) => None,
    };
    let preview: Vec<UserRow> = working_set.iter().take(PREVIEW_ROWS).cloned().collect();

    Ok(ViewModel {
        summary,
        weekly_trend,
        retention_comparison,
        preview,
        malformed_records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_selection() -> FilterSelection {
        FilterSelection {
            group: GroupChoice::All,
            date_range: (date(2025, 3, 3), date(2025, 3, 18)),
            min_sessions: 1,
            only_retained: false,
        }
    }

    #[test]
    fn unfiltered_cycle_reproduces_the_sample_scenario() {
        let records = store::sample_records().unwrap();
        let view = render_cycle(&records, &full_selection()).unwrap();

        assert_eq!(view.summary.total_users, 10);
        assert_eq!(view.summary.avg_sessions, Some(5.70));
        assert_eq!(view.summary.retention_rate, Some(50.00));
        assert_eq!(view.preview.len(), 10);
        assert_eq!(view.malformed_records, 0);

        let comparison = view.retention_comparison.unwrap();
        assert_eq!(comparison.by_group.len(), 2);
        assert_eq!(comparison.insight, Insight::GroupALeads { diff: 41.67 });
    }

    #[test]
    fn single_cohort_selection_suppresses_the_comparison() {
        let records = store::sample_records().unwrap();
        let mut selection = full_selection();
        selection.group = GroupChoice::Group("A".to_string());

        let view = render_cycle(&records, &selection).unwrap();
        assert!(view.retention_comparison.is_none());
        assert_eq!(view.summary.total_users, 6);
        assert_eq!(view.preview.len(), 6);
    }

    #[test]
    fn min_sessions_above_the_data_maximum_empties_every_output() {
        let records = store::sample_records().unwrap();
        let mut selection = full_selection();
        selection.min_sessions = 13;

        let view = render_cycle(&records, &selection).unwrap();
        assert_eq!(view.summary.total_users, 0);
        assert_eq!(view.summary.avg_sessions, None);
        assert_eq!(view.summary.retention_rate, None);
        assert!(view.weekly_trend.is_empty());
        assert!(view.preview.is_empty());
        assert_eq!(
            view.retention_comparison.unwrap().insight,
            Insight::InsufficientData
        );
    }

    #[test]
    fn malformed_records_are_counted_not_dropped() {
        let mut records = store::sample_records().unwrap();
        records.push(crate::models::UserRecord {
            user_id: Uuid::from_u128(99),
            signup_date: date(2025, 3, 18),
            last_active_date: date(2025, 3, 1),
            ab_group: "B".to_string(),
            session_count: 4,
            extras: Vec::new(),
        });

        let view = render_cycle(&records, &full_selection()).unwrap();
        assert_eq!(view.malformed_records, 1);
        assert_eq!(view.summary.total_users, 11);
    }

    #[test]
    fn inverted_range_is_rejected_before_aggregation() {
        let records = store::sample_records().unwrap();
        let mut selection = full_selection();
        selection.date_range = (date(2025, 3, 18), date(2025, 3, 3));

        let err = render_cycle(&records, &selection).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDateRange { .. }));
    }
}
