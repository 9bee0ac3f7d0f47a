use std::collections::BTreeMap;

use crate::model::{EntryDay, ProgressEntry};

/// Entries sharing one calendar day, most recently created first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    date: EntryDay,
    entries: Vec<ProgressEntry>,
}

impl DateGroup {
    #[must_use]
    pub fn date(&self) -> EntryDay {
        self.date
    }

    #[must_use]
    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Partition `entries` into per-day groups.
///
/// Groups come back newest day first. Inside a group entries are ordered by
/// `created_at` descending; equal timestamps keep their input order. The
/// order of `entries` itself is never trusted.
#[must_use]
pub fn group_by_date(entries: &[ProgressEntry]) -> Vec<DateGroup> {
    let mut buckets: BTreeMap<EntryDay, Vec<ProgressEntry>> = BTreeMap::new();
    for entry in entries {
        buckets.entry(entry.date()).or_default().push(entry.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|(date, mut entries)| {
            // stable: ties stay in input order
            entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            DateGroup { date, entries }
        })
        .collect()
}

/// Entries of `groups` in display order.
#[must_use]
pub fn flatten(groups: &[DateGroup]) -> Vec<ProgressEntry> {
    groups
        .iter()
        .flat_map(|g| g.entries.iter().cloned())
        .collect()
}
