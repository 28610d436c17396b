//! Relational engine built on `SQLite`.
//!
//! ## Module Structure
//!
//! - [`connection`]: connection setup, lock acquisition, foreign keys
//! - [`schema`]: idempotent table creation and column lists
//! - [`sql`]: WHERE and UPDATE builders with numbered parameters
//! - `error`: driver error classification
//! - `rows`: result rows to mapper rows
//!
//! The engine holds one `Mutex<Connection>`. Writes run inside
//! `BEGIN IMMEDIATE ... COMMIT`, including an item store that also creates
//! its embedded status, and roll back on any error or fired context.

pub mod connection;
mod error;
mod items;
mod notes;
mod rows;
pub mod schema;
pub mod sql;
mod statuses;
mod users;

pub use connection::{DEFAULT_BUSY_TIMEOUT, acquire_lock, configure_connection, foreign_keys_enabled};

use super::OpContext;
use super::integrity::IntegrityProbe;
use super::traits::BoardStore;
use crate::models::{ItemId, StatusId};
use crate::{Error, Result};
use error::{Statement, classify};
use rusqlite::{Connection, OptionalExtension, Params, Row};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

const BACKEND: &str = "sqlite";

/// `SQLite`-backed store.
pub struct SqliteStore {
    /// Protected by Mutex because `rusqlite::Connection` is not `Sync`.
    conn: Mutex<Connection>,
    /// Path to the database file (None for in-memory).
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) a database file with the default busy timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the file cannot be opened, or
    /// [`Error::Unrecoverable`] if the schema cannot be created.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(db_path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Opens (or creates) a database file.
    ///
    /// # Errors
    ///
    /// Same as [`SqliteStore::new`].
    pub fn open(db_path: impl Into<PathBuf>, busy_timeout: Duration) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::StoreUnavailable {
                operation: "open_sqlite".to_string(),
                cause: e.to_string(),
            })?;
        }
        let conn = Connection::open(&db_path).map_err(|e| Error::StoreUnavailable {
            operation: "open_sqlite".to_string(),
            cause: e.to_string(),
        })?;
        tracing::info!(path = %db_path.display(), "opened sqlite store");
        Self::with_connection(conn, Some(db_path), busy_timeout)
    }

    /// Creates an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::StoreUnavailable {
            operation: "open_sqlite_in_memory".to_string(),
            cause: e.to_string(),
        })?;
        Self::with_connection(conn, None, DEFAULT_BUSY_TIMEOUT)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>, busy_timeout: Duration) -> Result<Self> {
        configure_connection(&conn, busy_timeout)?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Reports whether foreign keys are enforced on the open connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        foreign_keys_enabled(&acquire_lock(&self.conn))
    }

    fn read<T>(
        &self,
        ctx: &OpContext,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        ctx.check(operation)?;
        let conn = acquire_lock(&self.conn);
        f(&conn)
    }

    fn write<T>(
        &self,
        ctx: &OpContext,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        ctx.check(operation)?;
        let conn = acquire_lock(&self.conn);
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| classify(operation, "transaction", Statement::Write, e))?;

        let result = f(&conn).and_then(|value| {
            ctx.check(operation)?;
            Ok(value)
        });
        let result = result.and_then(|value| {
            conn.execute_batch("COMMIT")
                .map_err(|e| classify(operation, "transaction", Statement::Write, e))?;
            Ok(value)
        });
        if result.is_err() && !conn.is_autocommit() {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                tracing::warn!(operation, error = %e, "rollback failed");
            }
        }
        result
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl BoardStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

/// Runs a query expected to yield at most one row.
fn query_one<P: Params, T>(
    conn: &Connection,
    operation: &str,
    entity: &'static str,
    sql: &str,
    params: P,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
    conn.query_row(sql, params, map)
        .optional()
        .map_err(|e| classify(operation, entity, Statement::Read, e))
}

/// Runs a query and collects every row, checking `ctx` between rows.
fn query_all<P: Params, T>(
    conn: &Connection,
    ctx: &OpContext,
    operation: &str,
    entity: &'static str,
    sql: &str,
    params: P,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| classify(operation, entity, Statement::Read, e))?;
    let rows = stmt
        .query_map(params, map)
        .map_err(|e| classify(operation, entity, Statement::Read, e))?;
    let mut out = Vec::new();
    for row in rows {
        ctx.check(operation)?;
        out.push(row.map_err(|e| classify(operation, entity, Statement::Read, e))?);
    }
    Ok(out)
}

/// Executes a write and returns the affected row count.
fn execute<P: Params>(
    conn: &Connection,
    operation: &str,
    entity: &'static str,
    sql: &str,
    params: P,
) -> Result<usize> {
    conn.execute(sql, params)
        .map_err(|e| classify(operation, entity, Statement::Write, e))
}

/// Checks existence, then deletes exactly one row by key.
fn delete_one(
    conn: &Connection,
    operation: &str,
    entity: &'static str,
    table: &str,
    key_column: &str,
    key: &str,
) -> Result<()> {
    if !exists(conn, table, key_column, key)? {
        return Err(Error::not_found(entity, key));
    }
    let sql = format!("DELETE FROM {table} WHERE {key_column} = ?1");
    let affected = conn
        .execute(&sql, [key])
        .map_err(|e| classify(operation, entity, Statement::Delete, e))?;
    expect_one(operation, affected)
}

/// Asserts a statement touched exactly one row.
fn expect_one(operation: &str, affected: usize) -> Result<()> {
    if affected == 1 {
        Ok(())
    } else {
        Err(Error::UnexpectedRows {
            operation: operation.to_string(),
            expected: 1,
            actual: affected,
        })
    }
}

fn exists(conn: &Connection, table: &str, key_column: &str, key: &str) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {key_column} = ?1)");
    conn.query_row(&sql, [key], |row| row.get::<_, bool>(0))
        .map_err(|e| classify("exists", "lookup", Statement::Read, e))
}

/// Integrity lookups answered on the open connection.
struct Probe<'c>(&'c Connection);

impl IntegrityProbe for Probe<'_> {
    fn status_exists(&self, id: &StatusId) -> Result<bool> {
        exists(self.0, "status", "id", id.as_str())
    }

    fn item_exists(&self, id: &ItemId) -> Result<bool> {
        exists(self.0, "items", "id", id.as_str())
    }

    fn items_using_status(&self, id: &StatusId) -> Result<usize> {
        let count: i64 = self
            .0
            .query_row(
                "SELECT COUNT(*) FROM items WHERE status_id = ?1",
                [id.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| classify("items_using_status", "item", Statement::Read, e))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::filters::QuerySpec;
    use crate::models::{Item, Status, StatusKind};
    use crate::storage::{ItemStore, StatusStore};

    #[test]
    fn test_in_memory_enforces_foreign_keys() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.foreign_keys_enabled().unwrap());
        assert!(store.db_path().is_none());
    }

    #[test]
    fn test_failed_store_rolls_back_embedded_status() {
        let store = SqliteStore::in_memory().unwrap();
        let ctx = OpContext::background();
        store.store_item(&ctx, Item::new("web")).unwrap();

        let dup = Item::new("web").with_status(Status::new("NEW", StatusKind::Created));
        let err = store.store_item(&ctx, dup).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(store.find_statuses(&ctx, &QuerySpec::all()).unwrap().is_empty());
    }

    #[test]
    fn test_expect_one() {
        assert!(expect_one("delete_item", 1).is_ok());
        let err = expect_one("delete_item", 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedRows);
    }

    #[test]
    fn test_cancelled_write_rolls_back() {
        let store = SqliteStore::in_memory().unwrap();
        let cancelled = OpContext::background();
        cancelled.cancel();
        let err = store
            .store_status(&cancelled, Status::new("UP", StatusKind::Up))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        let live = OpContext::background();
        assert!(store.find_statuses(&live, &QuerySpec::all()).unwrap().is_empty());
    }
}
