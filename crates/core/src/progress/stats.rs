use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{EntryDay, ProgressEntry};
use crate::progress::streak::current_streak;

/// Aggregate counters shown above the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_entries: u32,
    pub unique_days: u32,
    pub current_streak: u32,
}

impl ProgressStats {
    /// Recompute all counters from `entries`, anchoring the streak at `today`.
    #[must_use]
    pub fn compute(entries: &[ProgressEntry], today: EntryDay) -> Self {
        let days = distinct_days(entries);
        Self {
            total_entries: saturating_u32(entries.len()),
            unique_days: saturating_u32(days.len()),
            current_streak: current_streak(&days, today),
        }
    }
}

/// The set of calendar days with at least one entry.
#[must_use]
pub fn distinct_days(entries: &[ProgressEntry]) -> BTreeSet<EntryDay> {
    entries.iter().map(ProgressEntry::date).collect()
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
