//! Cross-engine conformance tests.
//!
//! Every test runs against both engines with identical fixtures and must
//! produce identical records and errors on each.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use statusboard::filters::{QuerySpec, UpdateSpec, query, update};
use statusboard::models::{Item, ItemId, Note, NoteId, Status, StatusId, StatusKind, StatusRef, User};
use statusboard::storage::{BoardStore, MemDbStore, OpContext, SqliteStore};
use statusboard::ErrorKind;
use test_case::test_case;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Engine {
    MemDb,
    Sqlite,
}

fn open(engine: Engine) -> Box<dyn BoardStore> {
    match engine {
        Engine::MemDb => Box::new(MemDbStore::new().expect("memdb")),
        Engine::Sqlite => Box::new(SqliteStore::in_memory().expect("sqlite")),
    }
}

/// Statuses `up`/`down`/`warn` and items `a` (up), `b` (down), `c` (warn),
/// `d` (no status).
fn fixture(store: &dyn BoardStore, ctx: &OpContext) {
    for (id, kind) in [
        ("up", StatusKind::Available),
        ("down", StatusKind::Down),
        ("warn", StatusKind::Warning),
    ] {
        store
            .store_status(ctx, Status::new(id.to_uppercase(), kind).with_id(id))
            .unwrap();
    }
    for (name, status) in [("a", Some("up")), ("b", Some("down")), ("c", Some("warn")), ("d", None)] {
        let mut item = Item::new(name).with_id(format!("item-{name}"));
        if let Some(status) = status {
            item = item.with_status_id(status);
        }
        store.store_item(ctx, item).unwrap();
    }
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

// ============================================================================
// Find semantics
// ============================================================================

fn find_cases() -> Vec<(QuerySpec, Vec<&'static str>)> {
    vec![
        (QuerySpec::all(), vec!["a", "b", "c", "d"]),
        (
            QuerySpec::build([query::with_status_kinds([StatusKind::Available])]).unwrap(),
            vec!["a"],
        ),
        (
            QuerySpec::build([query::with_status_kinds([StatusKind::Available, StatusKind::Down])]).unwrap(),
            vec!["a", "b"],
        ),
        (
            QuerySpec::build([query::with_status_ids(["up", "warn"])]).unwrap(),
            vec!["a", "c"],
        ),
        (
            QuerySpec::build([
                query::with_status_ids(["up"]),
                query::with_status_kinds([StatusKind::Down]),
            ])
            .unwrap(),
            vec![],
        ),
        (
            QuerySpec::build([
                query::with_status_ids(["up", "down"]),
                query::with_status_kinds([StatusKind::Down]),
            ])
            .unwrap(),
            vec!["b"],
        ),
        (QuerySpec::build([query::with_names(["d", "a"])]).unwrap(), vec!["a", "d"]),
        (
            QuerySpec::build([
                query::with_names(["d"]),
                query::with_status_kinds([StatusKind::Down]),
            ])
            .unwrap(),
            vec![],
        ),
    ]
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_find_items_and_semantics(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    fixture(store.as_ref(), &ctx);

    for (query, expected) in find_cases() {
        let found = store.find_items(&ctx, &query).unwrap();
        assert_eq!(names(&found), expected, "query {query:?}");
    }
}

#[test]
fn test_engines_agree_on_fixture() {
    let ctx = OpContext::background();
    let memdb = open(Engine::MemDb);
    let sqlite = open(Engine::Sqlite);
    fixture(memdb.as_ref(), &ctx);
    fixture(sqlite.as_ref(), &ctx);

    for (query, _) in find_cases() {
        let left = memdb.find_items(&ctx, &query).unwrap();
        let right = sqlite.find_items(&ctx, &query).unwrap();
        let strip = |items: Vec<Item>| -> Vec<(ItemId, String, Option<StatusId>)> {
            items
                .into_iter()
                .map(|i| (i.id.clone(), i.name.clone(), i.status_id().cloned()))
                .collect()
        };
        assert_eq!(strip(left), strip(right));
    }
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_find_statuses(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    fixture(store.as_ref(), &ctx);

    let all = store.find_statuses(&ctx, &QuerySpec::all()).unwrap();
    let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["down", "up", "warn"]);

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Warning, StatusKind::Down])]).unwrap();
    let found = store.find_statuses(&ctx, &q).unwrap();
    assert_eq!(found.len(), 2);

    let q = QuerySpec::build([query::with_names(["UP"]), query::with_status_ids(["down"])]).unwrap();
    assert!(store.find_statuses(&ctx, &q).unwrap().is_empty());
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_available_example(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let up = store
        .store_status(&ctx, Status::new("UP", StatusKind::Available))
        .unwrap();
    store
        .store_item(&ctx, Item::new("svc-a").with_status_id(up.id.clone()))
        .unwrap();
    store.store_item(&ctx, Item::new("svc-b")).unwrap();

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Available])]).unwrap();
    let found = store.find_items(&ctx, &q).unwrap();
    assert_eq!(names(&found), vec!["svc-a"]);
}

// ============================================================================
// Store and Get
// ============================================================================

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_embedded_status_is_created(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let item = store
        .store_item(
            &ctx,
            Item::new("web").with_status(Status::new("DEGRADED", StatusKind::Warning)),
        )
        .unwrap();

    let fetched = store.get_item(&ctx, &item.id).unwrap();
    let status = fetched.status().expect("status resolved").clone();
    assert!(!status.id.is_empty());
    assert_eq!(status.name, "DEGRADED");
    assert_eq!(store.get_status(&ctx, &status.id).unwrap(), status);
    assert!(matches!(fetched.status, Some(StatusRef::Embedded(_))));
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_item_roundtrip(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let item = Item::new("<api> & \"gateway\"")
        .with_description("it's <b>bold</b>")
        .with_status(Status::new("OK", StatusKind::Up).with_color("#00FF00"));
    let mut item = item;
    item.notes.push(Note::new("second").with_id("n2"));
    item.notes.push(Note::new("first & <only>").with_id("n1"));

    let stored = store.store_item(&ctx, item).unwrap();
    let fetched = store.get_item(&ctx, &stored.id).unwrap();
    assert_eq!(fetched, stored);
    assert_eq!(fetched.name, "<api> & \"gateway\"");
    assert_eq!(fetched.description.as_deref(), Some("it's <b>bold</b>"));
    let note_ids: Vec<&str> = fetched.notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(note_ids, vec!["n1", "n2"]);
    assert!(fetched.notes.iter().all(|n| n.item_id == stored.id));
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_unknown_status_id_rejected(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let err = store
        .store_item(&ctx, Item::new("web").with_status_id("missing"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.is_client_error());
    assert!(store.find_items(&ctx, &QuerySpec::all()).unwrap().is_empty());
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_duplicates_rejected(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    store.store_item(&ctx, Item::new("web").with_id("i1")).unwrap();

    let err = store.store_item(&ctx, Item::new("web").with_id("i2")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    let err = store.store_item(&ctx, Item::new("other").with_id("i1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    store.store_status(&ctx, Status::new("UP", StatusKind::Up)).unwrap();
    let err = store
        .store_status(&ctx, Status::new("UP", StatusKind::Down))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

// ============================================================================
// Notes
// ============================================================================

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_note_for_missing_owner(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let missing = ItemId::new("nobody");
    let err = store
        .store_note(&ctx, Note::new("orphan").with_id("n1"), &missing)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = store.get_note(&ctx, &NoteId::new("n1")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = store.find_notes(&ctx, &missing, &QuerySpec::all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_notes_lifecycle(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let item = store.store_item(&ctx, Item::new("web")).unwrap();
    let note = store.store_note(&ctx, Note::new("draft"), &item.id).unwrap();
    assert_eq!(note.item_id, item.id);

    let spec = UpdateSpec::build([update::with_note_text("final")]).unwrap();
    store.update_note(&ctx, &note.id, &spec).unwrap();
    let fetched = store.get_note(&ctx, &note.id).unwrap();
    assert_eq!(fetched.text, "final");
    assert_eq!(fetched.timestamps.created, note.timestamps.created);
    assert!(fetched.timestamps.updated >= note.timestamps.updated);

    let q = QuerySpec::build([query::with_names(["final"])]).unwrap();
    assert_eq!(store.find_notes(&ctx, &item.id, &q).unwrap().len(), 1);
    assert_eq!(store.find_notes(&ctx, &item.id, &QuerySpec::all()).unwrap().len(), 1);

    store.delete_item(&ctx, &item.id).unwrap();
    let err = store.get_note(&ctx, &note.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ============================================================================
// Update and Delete
// ============================================================================

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_empty_update_rejected(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let empty = UpdateSpec::default();

    let err = store.update_item(&ctx, &ItemId::new("x"), &empty).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtLeastOne);
    let err = store.update_status(&ctx, &StatusId::new("x"), &empty).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtLeastOne);
    let err = store.update_note(&ctx, &NoteId::new("x"), &empty).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtLeastOne);
    let err = store.update_user(&ctx, "x", &empty).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtLeastOne);

    // fields irrelevant to the entity count as nothing
    let kind_only = UpdateSpec::build([update::with_kind(StatusKind::Up)]).unwrap();
    let err = store.update_item(&ctx, &ItemId::new("x"), &kind_only).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AtLeastOne);
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_delete_twice(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    fixture(store.as_ref(), &ctx);
    let note = store
        .store_note(&ctx, Note::new("n"), &ItemId::new("item-a"))
        .unwrap();
    store.store_user(&ctx, User::new("alice", "hash")).unwrap();

    store.delete_note(&ctx, &note.id).unwrap();
    assert_eq!(store.delete_note(&ctx, &note.id).unwrap_err().kind(), ErrorKind::NotFound);

    store.delete_item(&ctx, &ItemId::new("item-d")).unwrap();
    let err = store.delete_item(&ctx, &ItemId::new("item-d")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    store.delete_user(&ctx, "alice").unwrap();
    assert_eq!(store.delete_user(&ctx, "alice").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_status_in_use(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    fixture(store.as_ref(), &ctx);
    let up = StatusId::new("up");

    let err = store.delete_status(&ctx, &up).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InUse);
    assert!(store.get_status(&ctx, &up).is_ok());

    store.delete_item(&ctx, &ItemId::new("item-a")).unwrap();
    store.delete_status(&ctx, &up).unwrap();
    let err = store.delete_status(&ctx, &up).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_update_item_status(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    fixture(store.as_ref(), &ctx);
    let d = ItemId::new("item-d");

    let spec = UpdateSpec::build([update::with_status_id("down"), update::with_name("dee")]).unwrap();
    store.update_item(&ctx, &d, &spec).unwrap();
    let fetched = store.get_item(&ctx, &d).unwrap();
    assert_eq!(fetched.name, "dee");
    assert_eq!(fetched.status_id(), Some(&StatusId::new("down")));

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Down])]).unwrap();
    assert_eq!(names(&store.find_items(&ctx, &q).unwrap()), vec!["b", "dee"]);

    let spec = UpdateSpec::build([update::with_status(Status::new("NEW", StatusKind::Observing))]).unwrap();
    store.update_item(&ctx, &d, &spec).unwrap();
    let fetched = store.get_item(&ctx, &d).unwrap();
    assert_eq!(fetched.status().map(|s| s.name.as_str()), Some("NEW"));

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Down])]).unwrap();
    assert_eq!(names(&store.find_items(&ctx, &q).unwrap()), vec!["b"]);

    let spec = UpdateSpec::build([update::with_status_id("missing")]).unwrap();
    let err = store.update_item(&ctx, &d, &spec).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_update_status_reindexes_kind(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    fixture(store.as_ref(), &ctx);

    let spec = UpdateSpec::build([
        update::with_kind(StatusKind::Offline),
        update::with_color("#000000"),
    ])
    .unwrap();
    store.update_status(&ctx, &StatusId::new("warn"), &spec).unwrap();

    let status = store.get_status(&ctx, &StatusId::new("warn")).unwrap();
    assert_eq!(status.kind, StatusKind::Offline);
    assert_eq!(status.color.as_deref(), Some("#000000"));

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Offline])]).unwrap();
    assert_eq!(names(&store.find_items(&ctx, &q).unwrap()), vec!["c"]);
    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Warning])]).unwrap();
    assert!(store.find_items(&ctx, &q).unwrap().is_empty());

    let err = store
        .update_status(&ctx, &StatusId::new("missing"), &spec)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ============================================================================
// Users
// ============================================================================

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_users(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let alice = store
        .store_user(&ctx, User::new("alice", "hash-a").with_email_address("a@example.com"))
        .unwrap();
    store.store_user(&ctx, User::new("bob", "hash-b")).unwrap();

    let err = store.store_user(&ctx, User::new("alice", "other")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    let err = store.store_user(&ctx, User::new("carol", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredentials);

    assert_eq!(store.get_user(&ctx, "alice").unwrap(), alice);
    assert_eq!(store.find_users(&ctx, &QuerySpec::all()).unwrap().len(), 2);

    let q = QuerySpec::build([query::with_names(["bob"])]).unwrap();
    let found = store.find_users(&ctx, &q).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "bob");

    let q = QuerySpec::build([query::with_status_kinds([StatusKind::Up])]).unwrap();
    assert!(store.find_users(&ctx, &q).unwrap().is_empty());

    let spec = UpdateSpec::build([
        update::with_first_name("Alice"),
        update::with_avatar_url("https://example.com/a.png"),
    ])
    .unwrap();
    store.update_user(&ctx, "alice", &spec).unwrap();
    let fetched = store.get_user(&ctx, "alice").unwrap();
    assert_eq!(fetched.first_name.as_deref(), Some("Alice"));
    assert_eq!(fetched.email_address.as_deref(), Some("a@example.com"));
    assert_eq!(fetched.password_hash, "hash-a");

    let err = store.update_user(&ctx, "nobody", &spec).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test_case(Engine::MemDb ; "memdb")]
#[test_case(Engine::Sqlite ; "sqlite")]
fn test_cancelled_context(engine: Engine) {
    let store = open(engine);
    let ctx = OpContext::background();
    let cancelled = OpContext::background();
    cancelled.cancel();

    let err = store.store_item(&cancelled, Item::new("web")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    let err = store.find_items(&cancelled, &QuerySpec::all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(store.find_items(&ctx, &QuerySpec::all()).unwrap().is_empty());
}
