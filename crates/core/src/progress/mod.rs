//! Derived views over a user's progress entries.
//!
//! Everything here is a pure function of an entry snapshot (plus an explicit
//! `today` for the streak). Callers recompute from scratch after every change
//! to the underlying collection.

mod grouping;
mod stats;
mod streak;

pub use grouping::{DateGroup, flatten, group_by_date};
pub use stats::{ProgressStats, distinct_days};
pub use streak::current_streak;
