use chrono::Duration;
use daylog_core::model::{EntryDay, EntryDraft, EntryId, ProgressEntry, UserId};
use daylog_core::time::fixed_now;
use storage::repository::{ProgressRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn repo(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn day(s: &str) -> EntryDay {
    s.parse().unwrap()
}

#[tokio::test]
async fn sqlite_roundtrip_preserves_fields() {
    let repo = repo("memdb_roundtrip").await;
    let user = UserId::new(1);

    let validated = EntryDraft::new(day("2024-01-03"), "Shipped the parser")
        .with_description("Took three tries.")
        .with_video_url("https://example.com/watch?v=abc")
        .with_image_url("https://cdn.example.com/img/1.png")
        .validate(user, fixed_now())
        .unwrap();
    let id = repo.insert_entry(validated).await.unwrap();

    let listed = repo.list_entries(user).await.unwrap();
    assert_eq!(listed.len(), 1);
    let entry = &listed[0];
    assert_eq!(entry.id(), id);
    assert_eq!(entry.date(), day("2024-01-03"));
    assert_eq!(entry.heading(), "Shipped the parser");
    assert_eq!(entry.description(), Some("Took three tries."));
    assert_eq!(
        entry.video_url().map(|u| u.as_str()),
        Some("https://example.com/watch?v=abc")
    );
    assert_eq!(
        entry.image_url().map(|u| u.as_str()),
        Some("https://cdn.example.com/img/1.png")
    );
    assert_eq!(entry.created_at(), fixed_now());
    assert_eq!(entry.updated_at(), fixed_now());
}

#[tokio::test]
async fn sqlite_lists_newest_first_and_scopes_by_owner() {
    let repo = repo("memdb_ordering").await;
    let me = UserId::new(1);
    let other = UserId::new(2);
    let now = fixed_now();

    for (user, date, heading, minutes) in [
        (me, "2024-01-02", "older day", 0),
        (me, "2024-01-03", "morning", 0),
        (other, "2024-01-04", "not mine", 0),
        (me, "2024-01-03", "evening", 600),
    ] {
        let validated = EntryDraft::new(day(date), heading)
            .validate(user, now + Duration::minutes(minutes))
            .unwrap();
        repo.insert_entry(validated).await.unwrap();
    }

    let listed = repo.list_entries(me).await.unwrap();
    let headings: Vec<&str> = listed.iter().map(ProgressEntry::heading).collect();
    assert_eq!(headings, ["evening", "morning", "older day"]);

    let theirs = repo.list_entries(other).await.unwrap();
    assert_eq!(theirs.len(), 1);
}

#[tokio::test]
async fn sqlite_delete_reports_missing_rows() {
    let repo = repo("memdb_delete").await;
    let me = UserId::new(1);
    let validated = EntryDraft::new(day("2024-01-03"), "to delete")
        .validate(me, fixed_now())
        .unwrap();
    let id = repo.insert_entry(validated).await.unwrap();

    let err = repo.delete_entry(UserId::new(2), id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    repo.delete_entry(me, id).await.unwrap();
    assert!(repo.list_entries(me).await.unwrap().is_empty());

    let err = repo.delete_entry(me, id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    let err = repo
        .delete_entry(me, EntryId::new(9_999))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_rejects_corrupt_day_on_read() {
    let repo = repo("memdb_corrupt").await;
    sqlx::query(
        r"
        INSERT INTO progress_entries (user_id, date, heading, created_at, updated_at)
        VALUES (1, '2024/01/03', 'bad', ?1, ?1)
        ",
    )
    .bind(fixed_now())
    .execute(repo.pool())
    .await
    .unwrap();

    let err = repo.list_entries(UserId::new(1)).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
