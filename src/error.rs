use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("invalid signup date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("required column '{0}' is missing from the input file")]
    MissingColumn(String),
    #[error("no records loaded; pass --from and --to to run against an empty dataset")]
    EmptyDataset,
}
