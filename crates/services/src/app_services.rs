use std::sync::Arc;

use daylog_core::model::UserId;
use storage::repository::Storage;

use crate::Clock;
use crate::dashboard::ProgressDashboard;
use crate::entry_service::EntryService;
use crate::error::AppServicesError;

/// Assembles app-facing services for one signed-in user.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    user_id: UserId,
    storage: Storage,
    entry_service: Arc<EntryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        user_id: UserId,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, clock, user_id))
    }

    /// Build services over an in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, user_id: UserId) -> Self {
        Self::from_storage(Storage::in_memory(), clock, user_id)
    }

    #[must_use]
    pub fn from_storage(storage: Storage, clock: Clock, user_id: UserId) -> Self {
        let entry_service = Arc::new(EntryService::new(clock, Arc::clone(&storage.entries)));
        Self {
            clock,
            user_id,
            storage,
            entry_service,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn entry_service(&self) -> Arc<EntryService> {
        Arc::clone(&self.entry_service)
    }

    /// A fresh, not yet loaded dashboard for the configured user.
    #[must_use]
    pub fn dashboard(&self) -> ProgressDashboard {
        ProgressDashboard::new(self.clock, self.user_id, Arc::clone(&self.storage.entries))
    }
}
