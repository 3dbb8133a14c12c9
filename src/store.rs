use std::io;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::UserRecord;

pub const REQUIRED_COLUMNS: [&str; 4] = [
    "signup_date",
    "last_active_date",
    "ab_group",
    "session_count",
];

#[derive(serde::Deserialize)]
struct CsvRow {
    signup_date: NaiveDate,
    last_active_date: NaiveDate,
    ab_group: String,
    session_count: u32,
}

pub fn load_csv(path: &Path) -> anyhow::Result<Vec<UserRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_records(file).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses the required columns into typed fields and carries every other
/// column through untouched, in header order.
pub fn read_records<R: io::Read>(reader: R) -> anyhow::Result<Vec<UserRecord>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == required) {
            return Err(AnalyticsError::MissingColumn(required.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let raw = result?;
        let row: CsvRow = raw
            .deserialize(Some(&headers))
            .with_context(|| format!("failed to parse data row {}", index + 1))?;
        let extras = headers
            .iter()
            .zip(raw.iter())
            .filter(|(header, _)| !REQUIRED_COLUMNS.contains(header))
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();

        records.push(UserRecord {
            user_id: Uuid::new_v4(),
            signup_date: row.signup_date,
            last_active_date: row.last_active_date,
            ab_group: row.ab_group,
            session_count: row.session_count,
            extras,
        });
    }

    Ok(records)
}

pub fn signup_bounds(records: &[UserRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|record| record.signup_date).min()?;
    let max = records.iter().map(|record| record.signup_date).max()?;
    Some((min, max))
}

/// Built-in demo dataset: 10 users over three Monday-started weeks, 6 in
/// group A (4 retained) and 4 in group B (1 retained). Ids are fixed so
/// repeated loads stay comparable.
pub fn sample_records() -> anyhow::Result<Vec<UserRecord>> {
    let rows = [
        ("A", (2025, 3, 3), (2025, 3, 15), 5),
        ("A", (2025, 3, 4), (2025, 3, 20), 8),
        ("B", (2025, 3, 5), (2025, 3, 18), 7),
        ("B", (2025, 3, 6), (2025, 3, 10), 1),
        ("A", (2025, 3, 10), (2025, 3, 25), 12),
        ("A", (2025, 3, 11), (2025, 3, 19), 3),
        ("B", (2025, 3, 11), (2025, 3, 14), 4),
        ("A", (2025, 3, 12), (2025, 3, 17), 2),
        ("A", (2025, 3, 17), (2025, 3, 21), 6),
        ("B", (2025, 3, 18), (2025, 3, 24), 9),
    ];

    let mut records = Vec::with_capacity(rows.len());
    for (index, (ab_group, signup, last_active, session_count)) in rows.into_iter().enumerate() {
        let signup_date = NaiveDate::from_ymd_opt(signup.0, signup.1, signup.2)
            .context("invalid sample signup date")?;
        let last_active_date =
            NaiveDate::from_ymd_opt(last_active.0, last_active.1, last_active.2)
                .context("invalid sample activity date")?;
        records.push(UserRecord {
            user_id: Uuid::from_u128(index as u128 + 1),
            signup_date,
            last_active_date,
            ab_group: ab_group.to_string(),
            session_count,
            extras: Vec::new(),
        });
    }

    Ok(records)
}

pub fn write_sample_csv(path: &Path) -> anyhow::Result<usize> {
    let records = sample_records()?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(REQUIRED_COLUMNS)?;
    for record in &records {
        writer.write_record(&[
            record.signup_date.to_string(),
            record.last_active_date.to_string(),
            record.ab_group.clone(),
            record.session_count.to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_required_columns_into_typed_fields() {
        let csv = "signup_date,last_active_date,ab_group,session_count\n\
                   2025-03-03,2025-03-15,A,5\n\
                   2025-03-05,2025-03-06,B,2\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].signup_date, date(2025, 3, 3));
        assert_eq!(records[0].ab_group, "A");
        assert_eq!(records[0].session_count, 5);
        assert!(records[0].extras.is_empty());
    }

    #[test]
    fn extra_columns_pass_through_untouched() {
        let csv = "signup_date,plan,last_active_date,ab_group,session_count,country\n\
                   2025-03-03,pro,2025-03-15,A,5,NL\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(
            records[0].extras,
            vec![
                ("plan".to_string(), "pro".to_string()),
                ("country".to_string(), "NL".to_string()),
            ]
        );
    }

    #[test]
    fn missing_required_column_is_a_typed_error() {
        let csv = "signup_date,last_active_date,session_count\n2025-03-03,2025-03-15,5\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalyticsError>(),
            Some(&AnalyticsError::MissingColumn("ab_group".to_string()))
        );
    }

    #[test]
    fn unparseable_row_fails_with_row_context() {
        let csv = "signup_date,last_active_date,ab_group,session_count\n\
                   2025-03-03,2025-03-15,A,5\n\
                   not-a-date,2025-03-15,A,5\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("data row 2"));
    }

    #[test]
    fn signup_bounds_span_the_dataset() {
        let records = sample_records().unwrap();
        assert_eq!(
            signup_bounds(&records),
            Some((date(2025, 3, 3), date(2025, 3, 18)))
        );
        assert_eq!(signup_bounds(&[]), None);
    }

    #[test]
    fn sample_dataset_matches_the_documented_cohorts() {
        let records = sample_records().unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records.iter().filter(|r| r.ab_group == "A").count(), 6);
        assert_eq!(records.iter().filter(|r| r.ab_group == "B").count(), 4);
    }
}
