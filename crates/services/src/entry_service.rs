use std::sync::Arc;

use daylog_core::model::{EntryDraft, EntryId, UserId};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::EntryServiceError;

/// Orchestrates entry creation and persistence.
#[derive(Clone)]
pub struct EntryService {
    clock: Clock,
    entries: Arc<dyn ProgressRepository>,
}

impl EntryService {
    #[must_use]
    pub fn new(clock: Clock, entries: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, entries }
    }

    /// A blank draft dated today per the service clock.
    #[must_use]
    pub fn draft_for_today(&self, heading: impl Into<String>) -> EntryDraft {
        EntryDraft::new(self.clock.today(), heading)
    }

    /// Validate `draft` for `user_id` and persist it.
    ///
    /// # Errors
    ///
    /// Returns `EntryServiceError::Entry` for validation failures.
    /// Returns `EntryServiceError::Storage` if persistence fails.
    pub async fn create_entry(
        &self,
        user_id: UserId,
        draft: EntryDraft,
    ) -> Result<EntryId, EntryServiceError> {
        let validated = draft.validate(user_id, self.clock.now())?;
        let date = validated.date;
        let id = self.entries.insert_entry(validated).await?;
        tracing::info!(%user_id, entry_id = %id, %date, "created progress entry");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use daylog_core::model::EntryError;
    use daylog_core::time::{fixed_clock, fixed_today};
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn create_entry_persists_validated_draft() {
        let repo = InMemoryRepository::new();
        let service = EntryService::new(fixed_clock(), Arc::new(repo.clone()));

        let draft = service
            .draft_for_today("Ran 5k")
            .with_description("felt good");
        let id = service.create_entry(UserId::new(1), draft).await.unwrap();

        let listed = repo.list_entries(UserId::new(1)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), id);
        assert_eq!(listed[0].date(), fixed_today());
        assert_eq!(listed[0].description(), Some("felt good"));
    }

    #[tokio::test]
    async fn create_entry_rejects_blank_heading_without_writing() {
        let repo = InMemoryRepository::new();
        let service = EntryService::new(fixed_clock(), Arc::new(repo.clone()));

        let err = service
            .create_entry(UserId::new(1), service.draft_for_today(" "))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EntryServiceError::Entry(EntryError::EmptyHeading)
        ));
        assert!(repo.list_entries(UserId::new(1)).await.unwrap().is_empty());
    }
}
