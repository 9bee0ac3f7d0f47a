use daylog_core::model::{EntryId, ProgressEntry, UserId, ValidatedEntry};

use super::SqliteRepository;
use super::mapping::{entry_id_from_i64, id_to_i64, map_entry_row};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn insert_entry(&self, entry: ValidatedEntry) -> Result<EntryId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO progress_entries (
                user_id, date, heading, description, video_url, image_url, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ",
        )
        .bind(id_to_i64("user_id", entry.user_id.value())?)
        .bind(entry.date.to_string())
        .bind(entry.heading)
        .bind(entry.description)
        .bind(entry.video_url.map(String::from))
        .bind(entry.image_url.map(String::from))
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        entry_id_from_i64(res.last_insert_rowid())
    }

    async fn list_entries(&self, user_id: UserId) -> Result<Vec<ProgressEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, heading, description, video_url, image_url, created_at, updated_at
            FROM progress_entries
            WHERE user_id = ?1
            ORDER BY date DESC, created_at DESC, id DESC
            ",
        )
        .bind(id_to_i64("user_id", user_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(map_entry_row(&row)?);
        }
        Ok(entries)
    }

    async fn delete_entry(&self, user_id: UserId, id: EntryId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM progress_entries WHERE id = ?1 AND user_id = ?2")
            .bind(id_to_i64("entry_id", id.value())?)
            .bind(id_to_i64("user_id", user_id.value())?)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
