use chrono::NaiveDate;

use crate::error::AnalyticsError;
use crate::models::{FilterSelection, GroupChoice, UserRow};

/// Rejects an inverted range before any filtering runs, so the caller gets a
/// validation error instead of a silently empty result.
pub fn validate(selection: &FilterSelection) -> Result<(), AnalyticsError> {
    let (start, end) = selection.date_range;
    if start > end {
        return Err(AnalyticsError::InvalidDateRange { start, end });
    }
    Ok(())
}

pub fn by_group(rows: Vec<UserRow>, choice: &GroupChoice) -> Vec<UserRow> {
    match choice {
        GroupChoice::All => rows,
        GroupChoice::Group(name) => rows
            .into_iter()
            .filter(|row| row.record.ab_group == *name)
            .collect(),
    }
}

/// Inclusive on both bounds, against `signup_date` only.
pub fn by_signup_range(rows: Vec<UserRow>, start: NaiveDate, end: NaiveDate) -> Vec<UserRow> {
    rows.into_iter()
        .filter(|row| row.record.signup_date >= start && row.record.signup_date <= end)
        .collect()
}

pub fn by_min_sessions(rows: Vec<UserRow>, min_sessions: u32) -> Vec<UserRow> {
    rows.into_iter()
        .filter(|row| row.record.session_count >= min_sessions)
        .collect()
}

pub fn by_retained(rows: Vec<UserRow>, only_retained: bool) -> Vec<UserRow> {
    if !only_retained {
        return rows;
    }
    rows.into_iter().filter(|row| row.retained).collect()
}

/// Canonical order: group, signup range, minimum sessions, retained flag.
/// The steps are independent row predicates, so the order changes nothing
/// mathematically; fixing it keeps results reproducible and easy to debug.
pub fn apply(rows: Vec<UserRow>, selection: &FilterSelection) -> Result<Vec<UserRow>, AnalyticsError> {
    validate(selection)?;
    let (start, end) = selection.date_range;
    let rows = by_group(rows, &selection.group);
    let rows = by_signup_range(rows, start, end);
    let rows = by_min_sessions(rows, selection.min_sessions);
    Ok(by_retained(rows, selection.only_retained))
}
