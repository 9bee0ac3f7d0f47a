//! Shared error types for the services crate.

use thiserror::Error;

use daylog_core::model::{EntryError, EntryId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `EntryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EntryServiceError {
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressDashboard`.
///
/// Load failures never show up here: the dashboard falls back to an empty
/// collection instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("failed to delete entry {id}: {source}")]
    Delete {
        id: EntryId,
        #[source]
        source: StorageError,
    },
    #[error(transparent)]
    Create(#[from] EntryServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
