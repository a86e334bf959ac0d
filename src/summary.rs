use crate::models::Entry;
use serde::{Deserialize, Serialize};

/// Totals derived from the goal and the active day log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub consumed: u64,
    pub remaining: f64,
    pub over_limit: bool,
    pub progress_percent: f64,
}

pub fn build_summary(goal: f64, entries: &[Entry]) -> DaySummary {
    let consumed = entries
        .iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.kcal));
    let total = consumed as f64;

    let progress_percent = if goal > 0.0 {
        (total / goal * 100.0).min(100.0)
    } else if consumed > 0 {
        100.0
    } else {
        0.0
    };

    DaySummary {
        consumed,
        remaining: (goal - total).max(0.0),
        over_limit: total > goal,
        progress_percent,
    }
}
