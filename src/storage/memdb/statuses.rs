//! Status operations.

use super::tables::{
    Probe, Reader, STATUS, STATUS_BY_KIND, STATUS_NAMES, claim_unique, ensure_absent, get_row,
    load_set, put_row, remove, scan_rows, set_insert, set_remove,
};
use super::{BACKEND, MemDbStore};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Status, StatusId};
use crate::storage::OpContext;
use crate::storage::integrity::ensure_status_unreferenced;
use crate::storage::mapper::{ApplyDiff, StatusRow, status_diff, unescape_html};
use crate::storage::metrics::observe;
use crate::storage::prepare;
use crate::storage::traits::StatusStore;
use crate::{Error, Result};
use chrono::Utc;
use redb::WriteTransaction;
use std::collections::BTreeSet;

const ENTITY: &str = "status";

/// Inserts a prepared status and its index entries.
pub(super) fn insert_status(txn: &WriteTransaction, status: &Status) -> Result<()> {
    let row = StatusRow::from_domain(status)?;
    ensure_absent(txn, STATUS, ENTITY, &row.id)?;
    claim_unique(txn, STATUS_NAMES, ENTITY, &row.name, &row.id)?;
    set_insert(txn, STATUS_BY_KIND, &row.kind, &row.id)?;
    put_row(txn, STATUS, &row.id, &row)
}

/// Loads and decodes a status by id.
pub(super) fn load_status(reader: &impl Reader, id: &str) -> Result<Option<Status>> {
    get_row::<StatusRow>(reader, STATUS, ENTITY, id)?
        .map(|row| row.to_domain())
        .transpose()
}

fn matches(row: &StatusRow, query: &QuerySpec) -> bool {
    let id_ok = query
        .status_ids()
        .is_none_or(|ids| ids.contains(&StatusId::new(row.id.clone())));
    let kind_ok = query
        .status_kinds()
        .is_none_or(|kinds| kinds.iter().any(|k| k.as_str() == row.kind));
    let name_ok = query
        .names()
        .is_none_or(|names| names.contains(&unescape_html(&row.name)));
    id_ok && kind_ok && name_ok
}

impl StatusStore for MemDbStore {
    #[tracing::instrument(skip(self, ctx, status), fields(backend = BACKEND, name = %status.name))]
    fn store_status(&self, ctx: &OpContext, status: Status) -> Result<Status> {
        observe(BACKEND, "store_status", || {
            let status = prepare::status(status, Utc::now());
            self.write(ctx, "store_status", |txn| insert_status(txn, &status))?;
            Ok(status)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_status(&self, ctx: &OpContext, id: &StatusId) -> Result<Status> {
        observe(BACKEND, "get_status", || {
            self.read(ctx, "get_status", |txn| {
                load_status(txn, id.as_str())?.ok_or_else(|| Error::not_found(ENTITY, id.as_str()))
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_statuses(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Status>> {
        observe(BACKEND, "find_statuses", || {
            self.read(ctx, "find_statuses", |txn| {
                let rows: Vec<StatusRow> = if let Some(ids) = query.status_ids() {
                    let mut rows = Vec::new();
                    for id in ids {
                        ctx.check("find_statuses")?;
                        rows.extend(get_row(txn, STATUS, ENTITY, id.as_str())?);
                    }
                    rows
                } else if let Some(kinds) = query.status_kinds() {
                    let mut ids = BTreeSet::new();
                    for kind in kinds {
                        ids.extend(load_set(txn, STATUS_BY_KIND, kind.as_str())?);
                    }
                    let mut rows = Vec::new();
                    for id in ids {
                        ctx.check("find_statuses")?;
                        rows.extend(get_row(txn, STATUS, ENTITY, &id)?);
                    }
                    rows
                } else {
                    scan_rows(txn, ctx, "find_statuses", STATUS, ENTITY)?
                };
                rows.iter()
                    .filter(|row| matches(row, query))
                    .map(StatusRow::to_domain)
                    .collect()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_status(&self, ctx: &OpContext, id: &StatusId, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_status", || {
            let diff = status_diff(update, Utc::now())?;
            self.write(ctx, "update_status", |txn| {
                let mut row: StatusRow = get_row(txn, STATUS, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                let before = row.clone();
                row.apply(&diff)?;
                row.to_domain()?;
                if row.name != before.name {
                    claim_unique(txn, STATUS_NAMES, ENTITY, &row.name, &row.id)?;
                    remove(txn, STATUS_NAMES, &before.name)?;
                }
                if row.kind != before.kind {
                    set_remove(txn, STATUS_BY_KIND, &before.kind, &row.id)?;
                    set_insert(txn, STATUS_BY_KIND, &row.kind, &row.id)?;
                }
                put_row(txn, STATUS, &row.id, &row)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_status(&self, ctx: &OpContext, id: &StatusId) -> Result<()> {
        observe(BACKEND, "delete_status", || {
            self.write(ctx, "delete_status", |txn| {
                let row: StatusRow = get_row(txn, STATUS, ENTITY, id.as_str())?
                    .ok_or_else(|| Error::not_found(ENTITY, id.as_str()))?;
                ensure_status_unreferenced(&Probe(txn), id)?;
                remove(txn, STATUS_NAMES, &row.name)?;
                set_remove(txn, STATUS_BY_KIND, &row.kind, &row.id)?;
                remove(txn, STATUS, &row.id)?;
                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::filters::{query, update};
    use crate::models::StatusKind;

    fn store() -> (MemDbStore, OpContext) {
        (MemDbStore::new().unwrap(), OpContext::background())
    }

    #[test]
    fn test_rename_frees_old_name() {
        let (store, ctx) = store();
        let up = store
            .store_status(&ctx, Status::new("UP", StatusKind::Up))
            .unwrap();
        let spec = UpdateSpec::build([update::with_name("RUNNING")]).unwrap();
        store.update_status(&ctx, &up.id, &spec).unwrap();

        store
            .store_status(&ctx, Status::new("UP", StatusKind::Up))
            .unwrap();
        let err = store
            .store_status(&ctx, Status::new("RUNNING", StatusKind::Up))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_kind_index_follows_update() {
        let (store, ctx) = store();
        let s = store
            .store_status(&ctx, Status::new("FLAKY", StatusKind::Up))
            .unwrap();
        let spec = UpdateSpec::build([update::with_kind(StatusKind::Warning)]).unwrap();
        store.update_status(&ctx, &s.id, &spec).unwrap();

        let by_up = QuerySpec::build([query::with_status_kinds([StatusKind::Up])]).unwrap();
        assert!(store.find_statuses(&ctx, &by_up).unwrap().is_empty());
        let by_warn = QuerySpec::build([query::with_status_kinds([StatusKind::Warning])]).unwrap();
        assert_eq!(store.find_statuses(&ctx, &by_warn).unwrap().len(), 1);
    }
}
