use async_trait::async_trait;
use daylog_core::model::{EntryId, ProgressEntry, UserId, ValidatedEntry};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for progress entries.
///
/// Every query is scoped to one owner; an entry is never visible to, or
/// deletable by, another user.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Persist a new entry and return the id storage assigned to it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn insert_entry(&self, entry: ValidatedEntry) -> Result<EntryId, StorageError>;

    /// Fetch every entry owned by `user_id`.
    ///
    /// Adapters return `(date desc, created_at desc)`, but callers must not
    /// depend on that order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn list_entries(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError>;

    /// Delete the entry `id` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such entry exists for that owner,
    /// or other storage errors.
    async fn delete_entry(&self, user_id: UserId, id: EntryId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<BTreeMap<EntryId, ProgressEntry>>>,
    next_id: Arc<Mutex<u64>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Store a fully-formed entry under its own id, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_entry(&self, entry: ProgressEntry) -> Result<(), StorageError> {
        let mut next = self
            .next_id
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *next = (*next).max(entry.id().value().saturating_add(1));
        drop(next);

        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(entry.id(), entry);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn insert_entry(&self, entry: ValidatedEntry) -> Result<EntryId, StorageError> {
        let id = {
            let mut next = self
                .next_id
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            let id = EntryId::new(*next);
            *next = next.saturating_add(1);
            id
        };

        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&id) {
            return Err(StorageError::Conflict);
        }
        guard.insert(id, entry.assign_id(id));
        Ok(id)
    }

    async fn list_entries(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<ProgressEntry> = guard
            .values()
            .filter(|e| e.user_id() == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });
        Ok(found)
    }

    async fn delete_entry(&self, user_id: UserId, id: EntryId) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(&id) {
            Some(entry) if entry.user_id() == user_id => {
                guard.remove(&id);
                Ok(())
            }
            _ => Err(StorageError::NotFound),
        }
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub entries: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let entries: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylog_core::model::{EntryDay, EntryDraft};
    use daylog_core::time::fixed_now;

    fn draft(user: u64, date: &str, heading: &str) -> ValidatedEntry {
        let day: EntryDay = date.parse().unwrap();
        EntryDraft::new(day, heading)
            .validate(UserId::new(user), fixed_now())
            .unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let repo = InMemoryRepository::new();
        let a = repo.insert_entry(draft(1, "2024-01-02", "A")).await.unwrap();
        let b = repo.insert_entry(draft(1, "2024-01-03", "B")).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_sorted() {
        let repo = InMemoryRepository::new();
        repo.insert_entry(draft(1, "2024-01-02", "old")).await.unwrap();
        repo.insert_entry(draft(2, "2024-01-05", "other user")).await.unwrap();
        repo.insert_entry(draft(1, "2024-01-03", "new")).await.unwrap();

        let listed = repo.list_entries(UserId::new(1)).await.unwrap();
        let headings: Vec<&str> = listed.iter().map(ProgressEntry::heading).collect();
        assert_eq!(headings, ["new", "old"]);
    }

    #[tokio::test]
    async fn delete_requires_matching_owner() {
        let repo = InMemoryRepository::new();
        let id = repo.insert_entry(draft(1, "2024-01-02", "A")).await.unwrap();

        let err = repo.delete_entry(UserId::new(2), id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));

        repo.delete_entry(UserId::new(1), id).await.unwrap();
        let err = repo.delete_entry(UserId::new(1), id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn put_entry_keeps_id_allocation_ahead() {
        let repo = InMemoryRepository::new();
        repo.put_entry(draft(1, "2024-01-02", "seeded").assign_id(EntryId::new(10)))
            .unwrap();
        let id = repo.insert_entry(draft(1, "2024-01-03", "next")).await.unwrap();
        assert_eq!(id, EntryId::new(11));
    }
}
