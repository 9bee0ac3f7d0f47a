use std::sync::Arc;

use daylog_core::model::{EntryDraft, EntryId, ProgressEntry, UserId};
use daylog_core::progress::{DateGroup, ProgressStats};
use storage::repository::ProgressRepository;
use tracing::{debug, info, warn};

use super::view::DashboardView;
use crate::Clock;
use crate::entry_service::EntryService;
use crate::error::DashboardError;

/// Result of [`ProgressDashboard::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    /// The fetch failed and the dashboard now shows an empty collection.
    /// Nothing is retried; call `load` again to try once more.
    FellBackToEmpty,
}

/// Result of a successful [`ProgressDashboard::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// The id was not in the local collection; no remote call was made.
    AlreadyAbsent,
}

/// Owns one user's in-memory entry collection for a session and keeps the
/// derived dashboard view consistent with it.
///
/// Mutations go through `&mut self`, so one operation finishes before the
/// next starts. Every change to the collection rebuilds the whole view.
pub struct ProgressDashboard {
    clock: Clock,
    user_id: UserId,
    repo: Arc<dyn ProgressRepository>,
    creator: EntryService,
    entries: Vec<ProgressEntry>,
    view: DashboardView,
}

impl ProgressDashboard {
    /// An empty dashboard for `user_id`. Call [`Self::load`] to populate it.
    #[must_use]
    pub fn new(clock: Clock, user_id: UserId, repo: Arc<dyn ProgressRepository>) -> Self {
        let creator = EntryService::new(clock, Arc::clone(&repo));
        Self {
            clock,
            user_id,
            repo,
            creator,
            entries: Vec::new(),
            view: DashboardView::build(&[], clock.today()),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    #[must_use]
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.view.stats()
    }

    #[must_use]
    pub fn groups(&self) -> &[DateGroup] {
        self.view.groups()
    }

    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the collection with a fresh fetch from the repository.
    ///
    /// A failed fetch is logged and leaves the dashboard empty instead of
    /// surfacing an error.
    pub async fn load(&mut self) -> LoadOutcome {
        match self.repo.list_entries(self.user_id).await {
            Ok(entries) => {
                let count = entries.len();
                self.replace(entries);
                info!(user_id = %self.user_id, count, "loaded progress entries");
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                warn!(
                    user_id = %self.user_id,
                    error = %err,
                    "failed to load progress entries, showing empty dashboard"
                );
                self.replace(Vec::new());
                LoadOutcome::FellBackToEmpty
            }
        }
    }

    /// Install `entries` as the canonical collection and rebuild the view.
    pub fn replace(&mut self, entries: Vec<ProgressEntry>) {
        self.entries = entries;
        self.recompute();
    }

    /// Delete `id` remotely, then locally once the store confirms.
    ///
    /// An id that is no longer in the local collection is a no-op. On a
    /// failed remote delete the collection and view are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Delete` when the repository rejects the delete
    /// (including `StorageError::NotFound`).
    pub async fn delete(&mut self, id: EntryId) -> Result<DeleteOutcome, DashboardError> {
        if !self.contains(id) {
            debug!(user_id = %self.user_id, entry_id = %id, "delete skipped, entry not present");
            return Ok(DeleteOutcome::AlreadyAbsent);
        }

        if let Err(source) = self.repo.delete_entry(self.user_id, id).await {
            warn!(user_id = %self.user_id, entry_id = %id, error = %source, "delete failed");
            return Err(DashboardError::Delete { id, source });
        }

        self.remove_local(id);
        info!(user_id = %self.user_id, entry_id = %id, "deleted progress entry");
        Ok(DeleteOutcome::Removed)
    }

    /// Drop `id` from the local collection and rebuild the view.
    ///
    /// Returns `false` (and changes nothing) when `id` is not present.
    pub fn remove_local(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        if self.entries.len() == before {
            return false;
        }
        self.recompute();
        true
    }

    /// Validate and persist `draft`, then reload the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Create` for validation or storage failures.
    /// The collection is untouched in that case.
    pub async fn create(&mut self, draft: EntryDraft) -> Result<EntryId, DashboardError> {
        let id = self.creator.create_entry(self.user_id, draft).await?;
        self.load().await;
        Ok(id)
    }

    /// Swap the time source. Takes effect at the next recompute.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
        self.creator = EntryService::new(clock, Arc::clone(&self.repo));
    }

    /// Rebuild the view against the clock's current day without re-fetching.
    pub fn refresh_today(&mut self) {
        self.recompute();
    }

    fn recompute(&mut self) {
        self.view = DashboardView::build(&self.entries, self.clock.today());
        let stats = self.view.stats();
        debug!(
            user_id = %self.user_id,
            total = stats.total_entries,
            days = stats.unique_days,
            streak = stats.current_streak,
            today = %self.view.today(),
            "recomputed dashboard"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use daylog_core::model::EntryDay;
    use storage::repository::InMemoryRepository;

    fn clock_on(date: &str) -> Clock {
        let day: EntryDay = date.parse().unwrap();
        let noon = day.as_naive_date().and_hms_opt(12, 0, 0).unwrap();
        Clock::fixed(Utc.from_utc_datetime(&noon))
    }

    async fn seeded(repo: &InMemoryRepository, clock: Clock, dates: &[&str]) -> Vec<EntryId> {
        let service = EntryService::new(clock, Arc::new(repo.clone()));
        let mut ids = Vec::new();
        for (i, date) in dates.iter().enumerate() {
            let draft = EntryDraft::new(date.parse().unwrap(), format!("Entry {i}"));
            ids.push(service.create_entry(UserId::new(1), draft).await.unwrap());
        }
        ids
    }

    #[tokio::test]
    async fn load_computes_stats_and_groups() {
        let repo = InMemoryRepository::new();
        let clock = clock_on("2024-01-03");
        seeded(&repo, clock, &["2024-01-03", "2024-01-03", "2024-01-02"]).await;

        let mut dashboard = ProgressDashboard::new(clock, UserId::new(1), Arc::new(repo));
        assert_eq!(dashboard.load().await, LoadOutcome::Loaded { count: 3 });

        let stats = dashboard.stats();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.unique_days, 2);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(dashboard.groups().len(), 2);
        assert_eq!(dashboard.groups()[0].len(), 2);
    }

    #[tokio::test]
    async fn deleting_the_only_entry_for_today_resets_streak() {
        let repo = InMemoryRepository::new();
        let clock = clock_on("2024-01-03");
        let ids = seeded(&repo, clock, &["2024-01-03", "2024-01-02", "2024-01-02"]).await;

        let mut dashboard = ProgressDashboard::new(clock, UserId::new(1), Arc::new(repo.clone()));
        dashboard.load().await;

        let outcome = dashboard.delete(ids[0]).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Removed);
        assert!(!dashboard.contains(ids[0]));
        let stats = dashboard.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.unique_days, 1);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(repo.list_entries(UserId::new(1)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remove_local_of_absent_id_is_noop() {
        let repo = InMemoryRepository::new();
        let clock = clock_on("2024-01-03");
        seeded(&repo, clock, &["2024-01-03"]).await;

        let mut dashboard = ProgressDashboard::new(clock, UserId::new(1), Arc::new(repo));
        dashboard.load().await;
        let before = dashboard.view().clone();

        assert!(!dashboard.remove_local(EntryId::new(999)));
        assert_eq!(dashboard.view(), &before);
    }

    #[tokio::test]
    async fn create_reloads_and_regroups() {
        let repo = InMemoryRepository::new();
        let clock = clock_on("2024-01-03");
        let mut dashboard = ProgressDashboard::new(clock, UserId::new(1), Arc::new(repo));
        dashboard.load().await;
        assert!(dashboard.is_empty());

        let draft = EntryDraft::new("2024-01-03".parse().unwrap(), "First");
        let id = dashboard.create(draft).await.unwrap();

        assert!(dashboard.contains(id));
        assert_eq!(dashboard.stats().current_streak, 1);
        assert_eq!(dashboard.groups()[0].entries()[0].id(), id);
    }

    #[tokio::test]
    async fn create_with_invalid_draft_leaves_collection() {
        let repo = InMemoryRepository::new();
        let clock = clock_on("2024-01-03");
        seeded(&repo, clock, &["2024-01-03"]).await;
        let mut dashboard = ProgressDashboard::new(clock, UserId::new(1), Arc::new(repo));
        dashboard.load().await;

        let draft = EntryDraft::new("2024-01-03".parse().unwrap(), "").with_date("yesterday");
        let err = dashboard.create(draft).await.unwrap_err();

        assert!(matches!(err, DashboardError::Create(_)));
        assert_eq!(dashboard.entries().len(), 1);
    }

    #[tokio::test]
    async fn refresh_today_reanchors_streak_after_midnight() {
        let repo = InMemoryRepository::new();
        let mut clock = clock_on("2024-01-03");
        seeded(&repo, clock, &["2024-01-03"]).await;

        let mut dashboard = ProgressDashboard::new(clock, UserId::new(1), Arc::new(repo));
        dashboard.load().await;
        assert_eq!(dashboard.stats().current_streak, 1);

        clock.advance(chrono::Duration::days(1));
        dashboard.set_clock(clock);
        dashboard.refresh_today();

        assert_eq!(dashboard.view().today().to_string(), "2024-01-04");
        assert_eq!(dashboard.stats().current_streak, 0);
        assert_eq!(dashboard.stats().total_entries, 1);
    }
}
