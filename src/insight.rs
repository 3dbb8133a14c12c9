use std::fmt;

use serde::Serialize;

use crate::aggregate::round2;
use crate::models::GroupRetention;

/// Outcome of comparing cohort A against cohort B. `diff` is always the
/// positive margin in percentage points, two-decimal precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Insight {
    GroupALeads { diff: f64 },
    GroupBLeads { diff: f64 },
    Even,
    InsufficientData,
}

/// Looks up cohorts "A" and "B" in the retention aggregate. Either cohort
/// missing from the filtered data is an ordinary outcome, not an error.
pub fn compare_groups(by_group: &[GroupRetention]) -> Insight {
    let rate_of = |name: &str| {
        by_group
            .iter()
            .find(|group| group.ab_group == name)
            .map(|group| group.retention_rate)
    };

    match (rate_of("A"), rate_of("B")) {
        (Some(a), Some(b)) => {
            let diff = round2(a - b);
            if diff > 0.0 {
                Insight::GroupALeads { diff }
            } else if diff < 0.0 {
                Insight::GroupBLeads { diff: -diff }
            } else {
                Insight::Even
            }
        }
        _ => Insight::InsufficientData,
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::GroupALeads { diff } => write!(
                f,
                "Group A has {diff:.2} points higher retention than group B. Feature A may be more effective."
            ),
            Insight::GroupBLeads { diff } => write!(
                f,
                "Group B has {diff:.2} points higher retention than group A. Consider exploring why feature B performs better."
            ),
            Insight::Even => write!(f, "Retention is equal across both groups."),
            Insight::InsufficientData => {
                write!(f, "Insufficient data to compare groups A and B.")
            }
        }
    }
}
