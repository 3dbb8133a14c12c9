use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{UserRecord, UserRow};

/// A user counts as retained once their activity gap exceeds this many days
/// past signup.
pub const RETENTION_DAY_THRESHOLD: i64 = 7;

/// Monday of the week containing `date`. Monday-start weeks keep the weekly
/// grouping identical across the whole dataset.
pub fn signup_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// A negative gap (last_active before signup) simply reads as not retained;
/// the load/view layer counts those rows as a data-quality warning.
pub fn is_retained(signup: NaiveDate, last_active: NaiveDate) -> bool {
    (last_active - signup).num_days() > RETENTION_DAY_THRESHOLD
}

pub fn enrich(records: &[UserRecord]) -> Vec<UserRow> {
    records
        .iter()
        .map(|record| UserRow {
            signup_week: signup_week(record.signup_date),
            retained: is_retained(record.signup_date, record.last_active_date),
            record: record.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn signup_week_maps_to_monday_at_or_before() {
        // 2025-03-03 is a Monday.
        assert_eq!(signup_week(date(2025, 3, 3)), date(2025, 3, 3));
        assert_eq!(signup_week(date(2025, 3, 5)), date(2025, 3, 3));
        assert_eq!(signup_week(date(2025, 3, 9)), date(2025, 3, 3));
        assert_eq!(signup_week(date(2025, 3, 10)), date(2025, 3, 10));
    }

    #[test]
    fn signup_week_is_idempotent() {
        for offset in 0..14 {
            let day = date(2025, 3, 3) + Duration::days(offset);
            let week = signup_week(day);
            assert_eq!(signup_week(week), week);
            assert!(week <= day);
        }
    }

    #[test]
    fn retention_threshold_is_exclusive() {
        let signup = date(2025, 3, 3);
        assert!(!is_retained(signup, date(2025, 3, 10))); // exactly 7 days
        assert!(is_retained(signup, date(2025, 3, 11))); // 8 days
    }

    #[test]
    fn negative_gap_is_not_retained() {
        assert!(!is_retained(date(2025, 3, 10), date(2025, 3, 3)));
    }
}
