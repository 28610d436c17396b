//! Status operations.

use super::rows::status_row;
use super::schema::STATUS_COLUMNS;
use super::sql::{build_status_filter, build_update};
use super::{BACKEND, Probe, SqliteStore, delete_one, execute, exists, expect_one, query_all, query_one};
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Status, StatusId};
use crate::storage::OpContext;
use crate::storage::integrity::ensure_status_unreferenced;
use crate::storage::mapper::{ColumnValue, StatusRow, status_diff};
use crate::storage::metrics::observe;
use crate::storage::prepare;
use crate::storage::traits::StatusStore;
use crate::{Error, Result};
use chrono::Utc;
use rusqlite::{Connection, params, params_from_iter};

const ENTITY: &str = "status";

/// Inserts a prepared status on an open transaction.
pub(super) fn insert_status(conn: &Connection, status: &Status) -> Result<()> {
    let row = StatusRow::from_domain(status)?;
    let sql = format!("INSERT INTO status ({STATUS_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)");
    let affected = execute(
        conn,
        "insert_status",
        ENTITY,
        &sql,
        params![
            row.id,
            row.name,
            row.kind,
            row.description,
            row.color,
            row.created,
            row.updated,
            row.deleted
        ],
    )?;
    expect_one("insert_status", affected)
}

/// Loads and decodes a status by id.
pub(super) fn load_status(conn: &Connection, id: &str) -> Result<Option<Status>> {
    let sql = format!("SELECT {STATUS_COLUMNS} FROM status WHERE id = ?1");
    query_one(conn, "get_status", ENTITY, &sql, [id], status_row)?
        .map(|row| row.to_domain())
        .transpose()
}

impl StatusStore for SqliteStore {
    #[tracing::instrument(skip(self, ctx, status), fields(backend = BACKEND, name = %status.name))]
    fn store_status(&self, ctx: &OpContext, status: Status) -> Result<Status> {
        observe(BACKEND, "store_status", || {
            let status = prepare::status(status, Utc::now());
            self.write(ctx, "store_status", |conn| insert_status(conn, &status))?;
            Ok(status)
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn get_status(&self, ctx: &OpContext, id: &StatusId) -> Result<Status> {
        observe(BACKEND, "get_status", || {
            self.read(ctx, "get_status", |conn| {
                load_status(conn, id.as_str())?.ok_or_else(|| Error::not_found(ENTITY, id.as_str()))
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, query), fields(backend = BACKEND))]
    fn find_statuses(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Status>> {
        observe(BACKEND, "find_statuses", || {
            self.read(ctx, "find_statuses", |conn| {
                let (clause, params, _) = build_status_filter(query, 1);
                let sql = format!("SELECT {STATUS_COLUMNS} FROM status{clause} ORDER BY id");
                let rows = query_all(
                    conn,
                    ctx,
                    "find_statuses",
                    ENTITY,
                    &sql,
                    params_from_iter(params.iter()),
                    status_row,
                )?;
                rows.iter().map(StatusRow::to_domain).collect()
            })
        })
    }

    #[tracing::instrument(skip(self, ctx, update), fields(backend = BACKEND))]
    fn update_status(&self, ctx: &OpContext, id: &StatusId, update: &UpdateSpec) -> Result<()> {
        observe(BACKEND, "update_status", || {
            let diff = status_diff(update, Utc::now())?;
            self.write(ctx, "update_status", |conn| {
                if !exists(conn, "status", "id", id.as_str())? {
                    return Err(Error::not_found(ENTITY, id.as_str()));
                }
                let (sql, mut params) = build_update("status", &diff, "id");
                params.push(ColumnValue::Text(id.as_str().to_string()));
                let affected = execute(conn, "update_status", ENTITY, &sql, params_from_iter(params.iter()))?;
                expect_one("update_status", affected)
            })
        })
    }

    #[tracing::instrument(skip(self, ctx), fields(backend = BACKEND))]
    fn delete_status(&self, ctx: &OpContext, id: &StatusId) -> Result<()> {
        observe(BACKEND, "delete_status", || {
            self.write(ctx, "delete_status", |conn| {
                if !exists(conn, "status", "id", id.as_str())? {
                    return Err(Error::not_found(ENTITY, id.as_str()));
                }
                ensure_status_unreferenced(&Probe(conn), id)?;
                delete_one(conn, "delete_status", ENTITY, "status", "id", id.as_str())
            })
        })
    }
}
