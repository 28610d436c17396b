//! Note operations.

use super::rows::note_row;
use super::schema::NOTE_COLUMNS;
use super::sql::build_update;
use super::{BACKEND, Probe, SqliteStore, delete_one, execute, exists, expect_one, query_all, query_one};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{ItemId, Note, NoteId};
use crate::storage::OpContext;
use crate::storage::integrity::ensure_item_exists;
use crate::storage::mapper::{ColumnValue, NoteRow, note_diff};
use crate::storage::metrics::observe;
use crate::storage::prepare;
use crate::storage::traits::NoteStore;
use crate::{Error, Result};
use chrono::Utc;
use rusqlite::{Connection, params, params_from_iter};

const ENTITY: &str = "note";

/// Inserts a prepared note on an open transaction.
pub(super) fn insert_note(conn: &Connection, note: &Note) -> Result<()> {
    let row = NoteRow::from_domain(note)?;
    let sql = format!("INSERT INTO notes ({NOTE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)");
    let affected = execute(
        conn,
        "insert_note",
        ENTITY,
        &sql,
        params![row.id, row.note_text, row.item_id, row.created, row.updated, row.deleted],
    )?;
    expect_one("insert_note", affected)
}

/// Loads the notes of an item, ordered by id.
pub(super) fn load_notes(
    conn: &Connection,
    ctx: &OpContext,
    operation: &str,
    item_id: &str,
) -> Result<Vec<Note>> {
    let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE item_id = ?1 ORDER BY id");
    let rows = query_all(conn, ctx, operation, ENTITY, &sql, [item_id], note_row)?;
    rows.iter().map(NoteRow::to_domain).collect()
}

impl NoteStore for SqliteStore {
    #[tracing::instrument(skip(self, ctx, note), fields(backend = BACKEND))]
    fn store_note(&self, ctx: &OpContext, note: Note, item_id: &ItemId) -> Result<Note> {
        observe(BACKEND, "store_note", || {
            let note = prepare::note(note, item_id, Utc::now());
            self.write(ctx, "store_note", |conn| {
                ensure_item_exists(&Probe(conn), item_id)?;
                insert_note(conn, &note)
            })?;
            Ok(note)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_note(&self, ctx: &OpContext, id: &NoteId) -> Result<Note> {
        observe(BACKEND, "get_note", || {
            self.read(ctx, "get_note", |conn| {
                let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1");
                query_one(conn, "get_note", ENTITY, &sql, [id.as_str()], note_row)?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?
                    .to_domain()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_notes(&self, ctx: &OpContext, item_id: &ItemId, query: &QuerySpec) -> Result<Vec<Note>> {
        observe(BACKEND, "find_notes", || {
            self.read(ctx, "find_notes", |conn| {
                ensure_item_exists(&Probe(conn), item_id)?;
                if !query.is_empty() {
                    tracing::debug!(item_id = %item_id, "note lookup ignores query predicates");
                }
                load_notes(conn, ctx, "find_notes", item_id.as_str())
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_note(&self, ctx: &OpContext, id: &NoteId, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_note", || {
            let diff = note_diff(update, Utc::now())?;
            self.write(ctx, "update_note", |conn| {
                if !exists(conn, "notes", "id", id.as_str())? {
                    return Err(Error::not_found(ENTITY, id.as_str()));
                }
                let (sql, mut params) = build_update("notes", &diff, "id");
                params.push(ColumnValue::Text(id.as_str().to_string()));
                let affected = execute(conn, "update_note", ENTITY, &sql, params_from_iter(params.iter()))?;
                expect_one("update_note", affected)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_note(&self, ctx: &OpContext, id: &NoteId) -> Result<()> {
        observe(BACKEND, "delete_note", || {
            self.write(ctx, "delete_note", |conn| {
                delete_one(conn, "delete_note", ENTITY, "notes", "id", id.as_str())
            })
        })
    }
}
