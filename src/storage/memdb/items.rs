//! Item operations.

use super::notes::{insert_note, load_notes};
use super::statuses::{insert_status, load_status};
use super::tables::{
    ITEM_NAMES, ITEMS, ITEMS_BY_STATUS, NOTES, NOTES_BY_ITEM, Probe, Reader, STATUS_BY_KIND,
    claim_unique, ensure_absent, get_row, load_set, put_row, remove, scan_rows, set_insert,
    set_remove,
};
use super::{BACKEND, MemDbStore};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Item, ItemId, Status, StatusId, StatusRef};
use crate::storage::integrity::ensure_status_exists;
use crate::storage::mapper::{ApplyDiff, ItemDiff, ItemRow, unescape_html};
use crate::storage::metrics::observe;
use crate::storage::prepare::{self, StatusPlan};
use crate::storage::traits::ItemStore;
use crate::storage::OpContext;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use redb::WriteTransaction;
use std::collections::BTreeSet;

const ENTITY: &str = "item";

/// Resolves an item's status inside the write transaction, creating an
/// embedded one when needed.
fn resolve_status(
    txn: &WriteTransaction,
    status: Option<StatusRef>,
    now: DateTime<Utc>,
) -> Result<Option<Status>> {
    match prepare::plan_status(status, now) {
        None => Ok(None),
        Some(StatusPlan::Existing(id)) => {
            ensure_status_exists(&Probe(txn), &id)?;
            let status = load_status(txn, id.as_str())?
                .ok_or_else(|| Error::not_found("status", id.as_str()))?;
            Ok(Some(status))
        },
        Some(StatusPlan::Create(status)) => {
            insert_status(txn, &status)?;
            Ok(Some(status))
        },
    }
}

/// Rebuilds an item with its status and notes.
fn assemble(reader: &impl Reader, ctx: &OpContext, operation: &str, row: &ItemRow) -> Result<Item> {
    let status = match &row.status_id {
        Some(id) => load_status(reader, id)?,
        None => None,
    };
    let notes = load_notes(reader, ctx, operation, &row.id)?;
    row.to_domain(status, notes)
}

fn status_matches(
    row: &ItemRow,
    ids: Option<&BTreeSet<StatusId>>,
    kind_ids: Option<&BTreeSet<String>>,
) -> bool {
    let Some(status_id) = &row.status_id else {
        return ids.is_none() && kind_ids.is_none();
    };
    ids.is_none_or(|ids| ids.contains(&StatusId::new(status_id.clone())))
        && kind_ids.is_none_or(|kind_ids| kind_ids.contains(status_id))
}

impl ItemStore for MemDbStore {
    #[tracing::instrument(skip(self, ctx, item), fields(backend = BACKEND, name = %item.name))]
    fn store_item(&self, ctx: &OpContext, item: Item) -> Result<Item> {
        observe(BACKEND, "store_item", || {
            let now = Utc::now();
            let mut item = prepare::item(item, now);
            self.write(ctx, "store_item", |txn| {
                let status = resolve_status(txn, item.status.take(), now)?;
                item.status = status.map(StatusRef::Embedded);

                let row = ItemRow::from_domain(&item)?;
                ensure_absent(txn, ITEMS, ENTITY, &row.id)?;
                claim_unique(txn, ITEM_NAMES, ENTITY, &row.name, &row.id)?;
                if let Some(status_id) = &row.status_id {
                    set_insert(txn, ITEMS_BY_STATUS, status_id, &row.id)?;
                }
                put_row(txn, ITEMS, &row.id, &row)?;

                item.notes.sort_by(|a, b| a.id.cmp(&b.id));
                for note in &item.notes {
                    ctx.check("store_item")?;
                    insert_note(txn, note)?;
                }
                Ok(())
            })?;
            Ok(item)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_item(&self, ctx: &OpContext, id: &ItemId) -> Result<Item> {
        observe(BACKEND, "get_item", || {
            self.read(ctx, "get_item", |txn| {
                let row: ItemRow = get_row(txn, ITEMS, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                assemble(txn, ctx, "get_item", &row)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_items(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Item>> {
        observe(BACKEND, "find_items", || {
            self.read(ctx, "find_items", |txn| {
                let status_ids = query.status_ids();
                let names = query.names();
                let kind_ids = match query.status_kinds() {
                    Some(kinds) => {
                        let mut ids = BTreeSet::new();
                        for kind in kinds {
                            ids.extend(load_set(txn, STATUS_BY_KIND, kind.as_str())?);
                        }
                        Some(ids)
                    },
                    None => None,
                };

                let candidates: Vec<ItemRow> = match status_ids.as_ref() {
                    Some(ids) => {
                        let mut item_ids = BTreeSet::new();
                        for id in ids {
                            item_ids.extend(load_set(txn, ITEMS_BY_STATUS, id.as_str())?);
                        }
                        let mut rows = Vec::new();
                        for item_id in item_ids {
                            ctx.check("find_items")?;
                            rows.extend(get_row(txn, ITEMS, ENTITY, &item_id)?);
                        }
                        rows
                    },
                    None => scan_rows(txn, ctx, "find_items", ITEMS, ENTITY)?,
                };

                let mut items = Vec::new();
                for row in &candidates {
                    ctx.check("find_items")?;
                    if !status_matches(row, status_ids.as_ref(), kind_ids.as_ref()) {
                        continue;
                    }
                    if names
                        .as_ref()
                        .is_some_and(|names| !names.contains(&unescape_html(&row.name)))
                    {
                        continue;
                    }
                    items.push(assemble(txn, ctx, "find_items", row)?);
                }
                Ok(items)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_item(&self, ctx: &OpContext, id: &ItemId, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_item", || {
            let plan = ItemDiff::plan(update)?;
            let now = Utc::now();
            self.write(ctx, "update_item", |txn| {
                let mut row: ItemRow = get_row(txn, ITEMS, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                let before = row.clone();

                let status = resolve_status(txn, plan.status().cloned(), now)?;
                let diff = plan.finish(status.as_ref().map(|s| &s.id), now)?;
                row.apply(&diff)?;

                if row.name != before.name {
                    claim_unique(txn, ITEM_NAMES, ENTITY, &row.name, &row.id)?;
                    remove(txn, ITEM_NAMES, &before.name)?;
                }
                if row.status_id != before.status_id {
                    if let Some(old) = &before.status_id {
                        set_remove(txn, ITEMS_BY_STATUS, old, &row.id)?;
                    }
                    if let Some(new) = &row.status_id {
                        set_insert(txn, ITEMS_BY_STATUS, new, &row.id)?;
                    }
                }
                put_row(txn, ITEMS, &row.id, &row)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_item(&self, ctx: &OpContext, id: &ItemId) -> Result<()> {
        observe(BACKEND, "delete_item", || {
            self.write(ctx, "delete_item", |txn| {
                let row: ItemRow = get_row(txn, ITEMS, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;

                let note_ids = load_set(txn, NOTES_BY_ITEM, &row.id)?;
                for note_id in &note_ids {
                    ctx.check("delete_item")?;
                    remove(txn, NOTES, note_id)?;
                }
                remove(txn, NOTES_BY_ITEM, &row.id)?;
                tracing::debug!(item_id = %row.id, notes = note_ids.len(), "cascading note delete");

                if let Some(status_id) = &row.status_id {
                    set_remove(txn, ITEMS_BY_STATUS, status_id, &row.id)?;
                }
                remove(txn, ITEM_NAMES, &row.name)?;
                remove(txn, ITEMS, &row.id)?;
                Ok(())
            })
        })
    }
}
