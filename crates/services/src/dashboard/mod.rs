mod controller;
mod view;

pub use crate::error::DashboardError;
pub use controller::{DeleteOutcome, LoadOutcome, ProgressDashboard};
pub use view::{DashboardSnapshot, DashboardView, DayListItem, EntryListItem};
