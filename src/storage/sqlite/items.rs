//! Item operations.

use super::notes::{insert_note, load_notes};
use super::rows::item_row;
use super::schema::ITEM_COLUMNS;
use super::sql::{build_item_filter, build_update};
use super::statuses::{insert_status, load_status};
use super::{BACKEND, Probe, SqliteStore, delete_one, execute, exists, expect_one, query_all, query_one};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Item, ItemId, Status, StatusRef};
use crate::storage::OpContext;
use crate::storage::integrity::ensure_status_exists;
use crate::storage::mapper::{ColumnValue, ItemDiff, ItemRow};
use crate::storage::metrics::observe;
use crate::storage::prepare::{self, StatusPlan};
use crate::storage::traits::ItemStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params, params_from_iter};

const ENTITY: &str = "item";

fn resolve_status(
    conn: &Connection,
    status: Option<StatusRef>,
    now: DateTime<Utc>,
) -> Result<Option<Status>> {
    match prepare::plan_status(status, now) {
        None => Ok(None),
        Some(StatusPlan::Existing(id)) => {
            ensure_status_exists(&Probe(conn), &id)?;
            let status = load_status(conn, id.as_str())?
                .ok_or_else(|| Error::not_found("status", id.as_str()))?;
            Ok(Some(status))
        },
        Some(StatusPlan::Create(status)) => {
            insert_status(conn, &status)?;
            Ok(Some(status))
        },
    }
}

fn assemble(conn: &Connection, ctx: &OpContext, operation: &str, row: &ItemRow) -> Result<Item> {
    let status = match &row.status_id {
        Some(id) => load_status(conn, id)?,
        None => None,
    };
    let notes = load_notes(conn, ctx, operation, &row.id)?;
    row.to_domain(status, notes)
}

impl ItemStore for SqliteStore {
    #[tracing::instrument(skip(self, ctx, item), fields(backend = BACKEND, name = %item.name))]
    fn store_item(&self, ctx: &OpContext, item: Item) -> Result<Item> {
        observe(BACKEND, "store_item", || {
            let now = Utc::now();
            let mut item = prepare::item(item, now);
            self.write(ctx, "store_item", |conn| {
                let status = resolve_status(conn, item.status.take(), now)?;
                item.status = status.map(StatusRef::Embedded);

                let row = ItemRow::from_domain(&item)?;
                let sql = "INSERT INTO items (id, name, description, status_id, created, updated, deleted) \
                           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
                let affected = execute(
                    conn,
                    "insert_item",
                    ENTITY,
                    sql,
                    params![
                        row.id,
                        row.name,
                        row.description,
                        row.status_id,
                        row.created,
                        row.updated,
                        row.deleted
                    ],
                )?;
                expect_one("insert_item", affected)?;

                item.notes.sort_by(|a, b| a.id.cmp(&b.id));
                for note in &item.notes {
                    ctx.check("store_item")?;
                    insert_note(conn, note)?;
                }
                Ok(())
            })?;
            Ok(item)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_item(&self, ctx: &OpContext, id: &ItemId) -> Result<Item> {
        observe(BACKEND, "get_item", || {
            self.read(ctx, "get_item", |conn| {
                let sql = format!("SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = ?1");
                let row = query_one(conn, "get_item", ENTITY, &sql, [id.as_str()], item_row)?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                assemble(conn, ctx, "get_item", &row)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_items(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Item>> {
        observe(BACKEND, "find_items", || {
            self.read(ctx, "find_items", |conn| {
                let (clause, params, _) = build_item_filter(query, 1);
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items i \
                     LEFT JOIN status s ON s.id = i.status_id{clause} ORDER BY i.id"
                );
                let rows = query_all(
                    conn,
                    ctx,
                    "find_items",
                    ENTITY,
                    &sql,
                    params_from_iter(params.iter()),
                    item_row,
                )?;
                rows.iter()
                    .map(|row| assemble(conn, ctx, "find_items", row))
                    .collect()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_item(&self, ctx: &OpContext, id: &ItemId, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_item", || {
            let plan = ItemDiff::plan(update)?;
            let now = Utc::now();
            self.write(ctx, "update_item", |conn| {
                if !exists(conn, "items", "id", id.as_str())? {
                    return Err(Error::not_found(ENTITY, id.as_str()));
                }
                let status = resolve_status(conn, plan.status().cloned(), now)?;
                let diff = plan.finish(status.as_ref().map(|s| &s.id), now)?;

                let (sql, mut params) = build_update("items", &diff, "id");
                params.push(ColumnValue::Text(id.as_str().to_string()));
                let affected = execute(conn, "update_item", ENTITY, &sql, params_from_iter(params.iter()))?;
                expect_one("update_item", affected)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_item(&self, ctx: &OpContext, id: &ItemId) -> Result<()> {
        observe(BACKEND, "delete_item", || {
            self.write(ctx, "delete_item", |conn| {
                // notes go with the item through ON DELETE CASCADE
                delete_one(conn, "delete_item", ENTITY, "items", "id", id.as_str())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::filters::{query, update};
    use crate::models::{Note, StatusKind};
    use crate::storage::{NoteStore, StatusStore};

    fn store() -> (SqliteStore, OpContext) {
        (SqliteStore::in_memory().unwrap(), OpContext::background())
    }

    #[test]
    fn test_find_by_kind_joins_status() {
        let (store, ctx) = store();
        let up = store
            .store_status(&ctx, Status::new("UP", StatusKind::Available))
            .unwrap();
        store
            .store_item(&ctx, Item::new("svc-a").with_status_id(up.id.clone()))
            .unwrap();
        store.store_item(&ctx, Item::new("svc-b")).unwrap();

        let q = QuerySpec::build([query::with_status_kinds([StatusKind::Available])]).unwrap();
        let found = store.find_items(&ctx, &q).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "svc-a");
        assert_eq!(found[0].status(), Some(&up));
    }

    #[test]
    fn test_unknown_status_id_is_not_found() {
        let (store, ctx) = store();
        let err = store
            .store_item(&ctx, Item::new("svc").with_status_id("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let item = store.store_item(&ctx, Item::new("svc")).unwrap();
        let spec = UpdateSpec::build([update::with_status_id("missing")]).unwrap();
        let err = store.update_item(&ctx, &item.id, &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_cascades_notes() {
        let (store, ctx) = store();
        let item = store.store_item(&ctx, Item::new("web")).unwrap();
        let note = store.store_note(&ctx, Note::new("bye"), &item.id).unwrap();
        store.delete_item(&ctx, &item.id).unwrap();
        assert_eq!(
            store.get_note(&ctx, &note.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_rename_collision_is_already_exists() {
        let (store, ctx) = store();
        store.store_item(&ctx, Item::new("a")).unwrap();
        let b = store.store_item(&ctx, Item::new("b")).unwrap();
        let spec = UpdateSpec::build([update::with_name("a")]).unwrap();
        let err = store.update_item(&ctx, &b.id, &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }
}
