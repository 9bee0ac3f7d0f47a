use chrono::{DateTime, Utc};
use serde::Serialize;

use daylog_core::model::{EntryDay, EntryId, ProgressEntry};
use daylog_core::progress::{DateGroup, ProgressStats, group_by_date};

/// Derived dashboard state: counters plus the day-grouped entry list.
///
/// Always rebuilt from a full entry snapshot; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    today: EntryDay,
    stats: ProgressStats,
    groups: Vec<DateGroup>,
}

impl DashboardView {
    #[must_use]
    pub fn build(entries: &[ProgressEntry], today: EntryDay) -> Self {
        Self {
            today,
            stats: ProgressStats::compute(entries, today),
            groups: group_by_date(entries),
        }
    }

    /// The day the streak was anchored to when this view was built.
    #[must_use]
    pub fn today(&self) -> EntryDay {
        self.today
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.stats
    }

    #[must_use]
    pub fn groups(&self) -> &[DateGroup] {
        &self.groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            today: self.today,
            stats: self.stats,
            days: self.groups.iter().map(DayListItem::from_group).collect(),
        }
    }
}

/// Presentation-agnostic, serializable copy of a `DashboardView`.
///
/// No pre-formatted strings: the presentation layer owns date and time
/// formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub today: EntryDay,
    pub stats: ProgressStats,
    pub days: Vec<DayListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayListItem {
    pub date: EntryDay,
    pub entry_count: usize,
    pub entries: Vec<EntryListItem>,
}

impl DayListItem {
    #[must_use]
    pub fn from_group(group: &DateGroup) -> Self {
        Self {
            date: group.date(),
            entry_count: group.len(),
            entries: group.entries().iter().map(EntryListItem::from_entry).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryListItem {
    pub id: EntryId,
    pub heading: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EntryListItem {
    #[must_use]
    pub fn from_entry(entry: &ProgressEntry) -> Self {
        Self {
            id: entry.id(),
            heading: entry.heading().to_owned(),
            description: entry.description().map(str::to_owned),
            video_url: entry.video_url().map(ToString::to_string),
            image_url: entry.image_url().map(ToString::to_string),
            created_at: entry.created_at(),
        }
    }
}
