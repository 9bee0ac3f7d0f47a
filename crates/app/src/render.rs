//! Plain-text rendering of the dashboard for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use daylog_core::model::{EntryDay, ProgressEntry};
use daylog_core::progress::{DateGroup, ProgressStats};
use services::DashboardView;

pub const DELETE_FAILED: &str = "Failed to delete progress entry. Please try again.";
pub const SAVE_FAILED: &str = "Failed to save progress. Please try again.";
pub const EMPTY_STATE: &str = "No progress entries yet.";

const DESCRIPTION_LIMIT: usize = 200;

/// `Wednesday, January 3, 2024`
#[must_use]
pub fn long_date(day: EntryDay) -> String {
    day.as_naive_date().format("%A, %B %-d, %Y").to_string()
}

#[must_use]
pub fn entry_time(created_at: DateTime<Utc>) -> String {
    created_at.format("%H:%M").to_string()
}

#[must_use]
pub fn group_header(group: &DateGroup) -> String {
    let noun = if group.len() == 1 { "entry" } else { "entries" };
    format!("{} ({} {noun})", long_date(group.date()), group.len())
}

/// Cut `text` to the first 200 characters, marking the cut with `...`.
#[must_use]
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

#[must_use]
pub fn stats_line(stats: ProgressStats) -> String {
    format!(
        "Total entries: {}  |  Days logged: {}  |  Current streak: {}",
        stats.total_entries, stats.unique_days, stats.current_streak
    )
}

fn write_entry(out: &mut String, entry: &ProgressEntry) {
    let _ = writeln!(
        out,
        "  [{}] {}  {}",
        entry.id(),
        entry_time(entry.created_at()),
        entry.heading()
    );
    if let Some(description) = entry.description() {
        let _ = writeln!(out, "      {}", truncate_description(description));
    }
    if let Some(url) = entry.video_url() {
        let _ = writeln!(out, "      video: {url}");
    }
    if let Some(url) = entry.image_url() {
        let _ = writeln!(out, "      image: {url}");
    }
}

#[must_use]
pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", stats_line(view.stats()));
    out.push('\n');

    if view.is_empty() {
        let _ = writeln!(out, "{EMPTY_STATE}");
        return out;
    }

    for (i, group) in view.groups().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", group_header(group));
        for entry in group.entries() {
            write_entry(&mut out, entry);
        }
    }
    out
}
