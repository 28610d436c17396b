//! Relational schema, created idempotently when a store opens.

use crate::{Error, Result};
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS status (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL UNIQUE,
    kind        TEXT NOT NULL,
    description TEXT,
    color       TEXT,
    created     INTEGER NOT NULL,
    updated     INTEGER NOT NULL,
    deleted     INTEGER
);
CREATE INDEX IF NOT EXISTS idx_status_kind ON status(kind);

CREATE TABLE IF NOT EXISTS items (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL UNIQUE,
    description TEXT,
    status_id   TEXT REFERENCES status(id),
    created     INTEGER NOT NULL,
    updated     INTEGER NOT NULL,
    deleted     INTEGER
);
CREATE INDEX IF NOT EXISTS idx_items_status_id ON items(status_id);

CREATE TABLE IF NOT EXISTS notes (
    id          TEXT PRIMARY KEY NOT NULL,
    note_text   TEXT NOT NULL,
    item_id     TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    created     INTEGER NOT NULL,
    updated     INTEGER NOT NULL,
    deleted     INTEGER
);
CREATE INDEX IF NOT EXISTS idx_notes_item_id ON notes(item_id);

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY NOT NULL,
    username      TEXT NOT NULL UNIQUE,
    password      TEXT NOT NULL,
    first_name    TEXT,
    last_name     TEXT,
    email_address TEXT,
    avatar_url    TEXT,
    last_login    INTEGER,
    created       INTEGER NOT NULL,
    updated       INTEGER NOT NULL,
    deleted       INTEGER
);
";

pub(super) const STATUS_COLUMNS: &str =
    "id, name, kind, description, color, created, updated, deleted";
pub(super) const ITEM_COLUMNS: &str =
    "i.id, i.name, i.description, i.status_id, i.created, i.updated, i.deleted";
pub(super) const NOTE_COLUMNS: &str = "id, note_text, item_id, created, updated, deleted";
pub(super) const USER_COLUMNS: &str = "id, username, password, first_name, last_name, \
     email_address, avatar_url, last_login, created, updated, deleted";

/// Creates every table and index that does not exist yet.
///
/// # Errors
///
/// Returns [`Error::Unrecoverable`] if a statement fails.
pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| Error::Unrecoverable {
            operation: "create_schema".to_string(),
            cause: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
                 AND name IN ('status', 'items', 'notes', 'users')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }
}
