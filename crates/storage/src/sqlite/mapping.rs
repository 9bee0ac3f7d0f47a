use daylog_core::model::{EntryDay, EntryId, ProgressEntry, UserId};
use sqlx::Row;
use url::Url;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn entry_id_from_i64(v: i64) -> Result<EntryId, StorageError> {
    Ok(EntryId::new(i64_to_u64("entry_id", v)?))
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

pub(crate) fn parse_day(raw: &str) -> Result<EntryDay, StorageError> {
    raw.parse::<EntryDay>().map_err(ser)
}

fn parse_url(field: &'static str, raw: Option<String>) -> Result<Option<Url>, StorageError> {
    raw.map(|s| {
        Url::parse(&s).map_err(|_| StorageError::Serialization(format!("invalid {field}: {s}")))
    })
    .transpose()
}

pub(crate) fn map_entry_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressEntry, StorageError> {
    let date: String = row.try_get("date").map_err(ser)?;

    ProgressEntry::from_persisted(
        entry_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        user_id_from_i64(row.try_get::<i64, _>("user_id").map_err(ser)?)?,
        parse_day(&date)?,
        row.try_get::<String, _>("heading").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        parse_url("video_url", row.try_get("video_url").map_err(ser)?)?,
        parse_url("image_url", row.try_get("image_url").map_err(ser)?)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}
