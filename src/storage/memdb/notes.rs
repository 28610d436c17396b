//! Note operations.

use super::tables::{
    NOTES, NOTES_BY_ITEM, Probe, Reader, ensure_absent, get_row, load_set, put_row, remove,
    set_insert, set_remove,
};
use super::{BACKEND, MemDbStore};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{ItemId, Note, NoteId};
use crate::storage::OpContext;
use crate::storage::integrity::ensure_item_exists;
use crate::storage::mapper::{ApplyDiff, NoteRow, note_diff};
use crate::storage::metrics::observe;
use crate::storage::prepare;
use crate::storage::traits::NoteStore;
use crate::{Error, Result};
use chrono::Utc;
use redb::WriteTransaction;

const ENTITY: &str = "note";

/// Inserts a prepared note and indexes it under its item.
pub(super) fn insert_note(txn: &WriteTransaction, note: &Note) -> Result<()> {
    let row = NoteRow::from_domain(note)?;
    ensure_absent(txn, NOTES, ENTITY, &row.id)?;
    set_insert(txn, NOTES_BY_ITEM, &row.item_id, &row.id)?;
    put_row(txn, NOTES, &row.id, &row)
}

/// Loads the notes of an item, ordered by id.
pub(super) fn load_notes(
    reader: &impl Reader,
    ctx: &OpContext,
    operation: &str,
    item_id: &str,
) -> Result<Vec<Note>> {
    let mut notes = Vec::new();
    for note_id in load_set(reader, NOTES_BY_ITEM, item_id)? {
        ctx.check(operation)?;
        let row: NoteRow = get_row(reader, NOTES, ENTITY, &note_id)?.ok_or_else(|| {
            Error::InvalidData {
                entity: ENTITY,
                reason: format!("index references missing note '{note_id}'"),
            }
        })?;
        notes.push(row.to_domain()?);
    }
    Ok(notes)
}

impl NoteStore for MemDbStore {
    #[tracing::instrument(skip(self, ctx, note), fields(backend = BACKEND))]
    fn store_note(&self, ctx: &OpContext, note: Note, item_id: &ItemId) -> Result<Note> {
        observe(BACKEND, "store_note", || {
            let note = prepare::note(note, item_id, Utc::now());
            self.write(ctx, "store_note", |txn| {
                ensure_item_exists(&Probe(txn), item_id)?;
                insert_note(txn, &note)
            })?;
            Ok(note)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_note(&self, ctx: &OpContext, id: &NoteId) -> Result<Note> {
        observe(BACKEND, "get_note", || {
            self.read(ctx, "get_note", |txn| {
                let row: NoteRow = get_row(txn, NOTES, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                row.to_domain()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_notes(&self, ctx: &OpContext, item_id: &ItemId, query: &QuerySpec) -> Result<Vec<Note>> {
        observe(BACKEND, "find_notes", || {
            self.read(ctx, "find_notes", |txn| {
                ensure_item_exists(&Probe(txn), item_id)?;
                if !query.is_empty() {
                    tracing::debug!(item_id = %item_id, "note lookup ignores query predicates");
                }
                load_notes(txn, ctx, "find_notes", item_id.as_str())
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_note(&self, ctx: &OpContext, id: &NoteId, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_note", || {
            let diff = note_diff(update, Utc::now())?;
            self.write(ctx, "update_note", |txn| {
                let mut row: NoteRow = get_row(txn, NOTES, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                row.apply(&diff)?;
                put_row(txn, NOTES, &row.id, &row)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_note(&self, ctx: &OpContext, id: &NoteId) -> Result<()> {
        observe(BACKEND, "delete_note", || {
            self.write(ctx, "delete_note", |txn| {
                let row: NoteRow = get_row(txn, NOTES, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                set_remove(txn, NOTES_BY_ITEM, &row.item_id, &row.id)?;
                remove(txn, NOTES, &row.id)?;
                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::filters::query;
    use crate::models::{Item, StatusKind};
    use crate::storage::ItemStore;

    #[test]
    fn test_orphan_note_rejected() {
        let store = MemDbStore::new().unwrap();
        let ctx = OpContext::background();
        let err = store
            .store_note(&ctx, Note::new("lost"), &ItemId::new("nope"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_query_predicates_keep_all_notes() {
        let store = MemDbStore::new().unwrap();
        let ctx = OpContext::background();
        let item = store.store_item(&ctx, Item::new("web")).unwrap();
        store.store_note(&ctx, Note::new("a"), &item.id).unwrap();

        let all = store.find_notes(&ctx, &item.id, &QuerySpec::all()).unwrap();
        assert_eq!(all.len(), 1);
        let by_kind = QuerySpec::build([query::with_status_kinds([StatusKind::Up])]).unwrap();
        assert_eq!(store.find_notes(&ctx, &item.id, &by_kind).unwrap(), all);
        let by_name = QuerySpec::build([query::with_names(["anything"])]).unwrap();
        assert_eq!(store.find_notes(&ctx, &item.id, &by_name).unwrap(), all);
    }

    #[test]
    fn test_delete_twice_not_found() {
        let store = MemDbStore::new().unwrap();
        let ctx = OpContext::background();
        let item = store.store_item(&ctx, Item::new("web")).unwrap();
        let note = store.store_note(&ctx, Note::new("a"), &item.id).unwrap();
        store.delete_note(&ctx, &note.id).unwrap();
        let err = store.delete_note(&ctx, &note.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.get_item(&ctx, &item.id).unwrap().notes.is_empty());
    }
}
