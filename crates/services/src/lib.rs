#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard;
pub mod entry_service;
pub mod error;

pub use daylog_core::Clock;

pub use app_services::AppServices;
pub use dashboard::{
    DashboardSnapshot, DashboardView, DeleteOutcome, LoadOutcome, ProgressDashboard,
};
pub use entry_service::EntryService;
pub use error::{AppServicesError, DashboardError, EntryServiceError};
