//! `SQLite` engine against a database file on disk.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use statusboard::ErrorKind;
use statusboard::filters::QuerySpec;
use statusboard::models::{Item, Note, Status, StatusKind};
use statusboard::storage::{ItemStore, NoteStore, OpContext, SqliteStore, StatusStore};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("board.db");
    let ctx = OpContext::background();

    let stored = {
        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.db_path(), Some(path.as_path()));
        let item = store
            .store_item(
                &ctx,
                Item::new("db-primary").with_status(Status::new("UP", StatusKind::Up)),
            )
            .unwrap();
        store.store_note(&ctx, Note::new("failover tested"), &item.id).unwrap();
        store.get_item(&ctx, &item.id).unwrap()
    };

    let store = SqliteStore::open(&path, Duration::from_millis(100)).unwrap();
    let fetched = store.get_item(&ctx, &stored.id).unwrap();
    assert_eq!(fetched, stored);
    assert_eq!(fetched.notes.len(), 1);
    assert_eq!(store.find_statuses(&ctx, &QuerySpec::all()).unwrap().len(), 1);
}

#[test]
fn test_foreign_keys_enforced_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.db");
    let ctx = OpContext::background();
    {
        let store = SqliteStore::new(&path).unwrap();
        store.store_item(&ctx, Item::new("web")).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert!(store.foreign_keys_enabled().unwrap());
    let err = store
        .store_item(&ctx, Item::new("api").with_status_id("ghost"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_two_handles_share_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.db");
    let ctx = OpContext::background();

    let writer = SqliteStore::new(&path).unwrap();
    let reader = SqliteStore::new(&path).unwrap();
    let status = writer
        .store_status(&ctx, Status::new("DOWN", StatusKind::Down))
        .unwrap();
    assert_eq!(reader.get_status(&ctx, &status.id).unwrap(), status);
}
