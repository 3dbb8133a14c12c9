use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// One signup/activity record, immutable after load. `extras` carries every
/// CSV column outside the required schema, in header order, untouched.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub signup_date: NaiveDate,
    pub last_active_date: NaiveDate,
    pub ab_group: String,
    pub session_count: u32,
    pub extras: Vec<(String, String)>,
}

/// A record plus its derived fields, computed once per render cycle before
/// any filtering.
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    #[serde(flatten)]
    pub record: UserRecord,
    pub signup_week: NaiveDate,
    pub retained: bool,
}

/// Cohort-group selection. `All` is a sentinel meaning "no constraint",
/// never a literal group value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupChoice {
    All,
    Group(String),
}

impl GroupChoice {
    pub fn parse(raw: &str) -> GroupChoice {
        if raw.eq_ignore_ascii_case("all") {
            GroupChoice::All
        } else {
            GroupChoice::Group(raw.to_string())
        }
    }
}

/// Filter inputs for one render cycle. Read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    pub group: GroupChoice,
    /// Inclusive on both bounds, applied against `signup_date` only.
    pub date_range: (NaiveDate, NaiveDate),
    pub min_sessions: u32,
    pub only_retained: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklySignups {
    pub week_start: NaiveDate,
    pub signups: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRetention {
    pub ab_group: String,
    /// Percentage in [0, 100], two-decimal precision.
    pub retention_rate: f64,
}

/// Scalar summaries over the working set. `None` means the set was empty;
/// renderers show "no data" rather than a fabricated zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_users: usize,
    pub avg_sessions: Option<f64>,
    pub retention_rate: Option<f64>,
}
