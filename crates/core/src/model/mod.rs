mod day;
mod entry;
mod ids;

pub use day::{DayParseError, EntryDay};
pub use entry::{EntryDraft, EntryError, ProgressEntry, ValidatedEntry};
pub use ids::{EntryId, ParseIdError, UserId};
