//! `BoardService` integration tests.
//!
//! Runs the service flows against both engines:
//! - Default status seeding
//! - Items created with an initial note and an embedded status
//! - Users, password checks, and password changes

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use secrecy::SecretString;
use statusboard::config::{BackendKind, BoardConfig};
use statusboard::filters::{CreateSpec, QuerySpec, create, query};
use statusboard::models::{Status, StatusKind, Timestamps};
use statusboard::storage::open_store;
use statusboard::{BoardService, ErrorKind};
use tempfile::TempDir;
use test_case::test_case;

// ============================================================================
// Test Helpers
// ============================================================================

fn service(backend: BackendKind, dir: &TempDir) -> BoardService {
    let config = BoardConfig::default()
        .with_backend(backend)
        .with_sqlite_path(dir.path().join("board.db"));
    BoardService::new(open_store(&config).unwrap())
}

// ============================================================================
// Flows
// ============================================================================

#[test_case(BackendKind::Memory ; "memory")]
#[test_case(BackendKind::Sqlite ; "sqlite")]
fn test_defaults_then_items(backend: BackendKind) {
    let dir = TempDir::new().unwrap();
    let svc = service(backend, &dir);
    let ctx = BoardConfig::default().context();

    let defaults = svc.seed_defaults(&ctx).unwrap();
    assert_eq!(defaults.len(), 8);
    let up = defaults.iter().find(|s| s.name == "UP").unwrap().clone();

    let spec = CreateSpec::build([
        create::with_status_id(up.id.clone()),
        create::with_description("primary API"),
        create::with_note_text("created by deploy"),
    ])
    .unwrap();
    let item = svc.new_item(&ctx, "api", &spec).unwrap();
    assert_eq!(item.status(), Some(&up));
    assert_eq!(item.notes.len(), 1);

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Up])]).unwrap();
    let found = svc.find_items(&ctx, &q).unwrap();
    assert_eq!(found, vec![svc.get_item(&ctx, &item.id).unwrap()]);

    let err = svc.remove_status(&ctx, &up.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InUse);
    assert!(!err.is_client_error());

    // a second seeding leaves the store alone
    assert!(svc.seed_defaults(&ctx).unwrap().is_empty());
    assert_eq!(svc.created_defaults().len(), 8);
}

#[test_case(BackendKind::Memory ; "memory")]
#[test_case(BackendKind::Sqlite ; "sqlite")]
fn test_embedded_status_and_notes(backend: BackendKind) {
    let dir = TempDir::new().unwrap();
    let svc = service(backend, &dir);
    let ctx = BoardConfig::default().context();

    let spec = CreateSpec::build([create::with_status(
        Status::new("MAINTENANCE", StatusKind::Unavailable).with_color("#888888"),
    )])
    .unwrap();
    let item = svc.new_item(&ctx, "queue", &spec).unwrap();
    let status = item.status().unwrap().clone();
    assert_eq!(svc.get_status(&ctx, &status.id).unwrap(), status);

    let note = svc
        .add_note(&ctx, &item.id, "drained", &CreateSpec::build([create::with_id("n-1")]).unwrap())
        .unwrap();
    assert_eq!(note.id.as_str(), "n-1");

    let created = chrono::DateTime::from_timestamp_nanos(1_650_000_000_000_000_000);
    svc.edit_note(
        &ctx,
        &note.id,
        "drained and restarted",
        Some(Timestamps {
            created: Some(created),
            updated: None,
            deleted: None,
        }),
    )
    .unwrap();
    let notes = svc.notes_for(&ctx, &item.id).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "drained and restarted");
    assert_eq!(notes[0].timestamps.created, Some(created));

    svc.remove_item(&ctx, &item.id).unwrap();
    assert_eq!(svc.get_note(&ctx, &note.id).unwrap_err().kind(), ErrorKind::NotFound);
    svc.remove_status(&ctx, &status.id).unwrap();
}

#[test_case(BackendKind::Memory ; "memory")]
#[test_case(BackendKind::Sqlite ; "sqlite")]
fn test_user_passwords(backend: BackendKind) {
    let dir = TempDir::new().unwrap();
    let svc = service(backend, &dir);
    let ctx = BoardConfig::default().context();
    let old = SecretString::from("old-password");
    let new = SecretString::from("new-password");

    let spec = CreateSpec::build([create::with_first_name("Ada"), create::with_last_name("Lovelace")]).unwrap();
    let user = svc
        .add_user(&ctx, "ada", &old, "ada@example.com", &spec)
        .unwrap();
    assert_ne!(user.password_hash, "old-password");
    assert_eq!(user.first_name.as_deref(), Some("Ada"));

    let err = svc
        .add_user(&ctx, "ada", &old, "ada@example.com", &CreateSpec::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let err = svc.change_password(&ctx, "ada", &new, &new).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredentials);

    svc.change_password(&ctx, "ada", &old, &new).unwrap();
    assert!(svc.check_password(&ctx, "ada", &old).is_err());
    let signed_in = svc.check_password(&ctx, "ada", &new).unwrap();
    assert!(signed_in.last_login.is_some());

    svc.remove_user(&ctx, "ada").unwrap();
    assert_eq!(svc.get_user(&ctx, "ada").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_validation_before_storage() {
    let dir = TempDir::new().unwrap();
    let svc = service(BackendKind::Memory, &dir);
    let ctx = BoardConfig::default().context();

    let err = svc
        .add_user(&ctx, "", &SecretString::from("x"), "e@example.com", &CreateSpec::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyString);
    assert!(err.is_client_error());

    let err = svc
        .add_note(&ctx, &"item".into(), "   ", &CreateSpec::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyString);
}
