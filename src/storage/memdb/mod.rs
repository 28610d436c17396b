//! Transactional in-process engine built on `redb`.
//!
//! Every call runs in one short-lived transaction. Writes commit only when
//! the whole operation succeeded and the context has not fired; anything
//! else aborts. Reads use a snapshot, so concurrent readers never see a
//! partially applied write.
//!
//! There is no native join: item lookups resolve their status and notes
//! with secondary reads inside the same transaction.

mod items;
mod notes;
mod statuses;
mod tables;
mod users;

use super::OpContext;
use super::traits::BoardStore;
use crate::Result;
use redb::backends::InMemoryBackend;
use redb::{Database, ReadTransaction, WriteTransaction};
use tables::{ALL_TABLES, driver, unavailable};

const BACKEND: &str = "memdb";

/// In-memory store; contents live as long as the value does.
pub struct MemDbStore {
    db: Database,
}

impl MemDbStore {
    /// Creates an empty store with every table in place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StoreUnavailable`] if the database cannot be
    /// created, or [`crate::Error::Unrecoverable`] if the tables cannot be.
    pub fn new() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|e| unavailable("open_memdb", e))?;

        let txn = db.begin_write().map_err(|e| unavailable("open_memdb", e))?;
        for table in ALL_TABLES {
            txn.open_table(table).map_err(|e| driver("open_memdb", e))?;
        }
        txn.commit().map_err(|e| driver("open_memdb", e))?;

        tracing::debug!("in-memory store ready");
        Ok(Self { db })
    }

    fn read<T>(
        &self,
        ctx: &OpContext,
        operation: &'static str,
        f: impl FnOnce(&ReadTransaction) -> Result<T>,
    ) -> Result<T> {
        ctx.check(operation)?;
        let txn = self
            .db
            .begin_read()
            .map_err(|e| unavailable(operation, e))?;
        f(&txn)
    }

    fn write<T>(
        &self,
        ctx: &OpContext,
        operation: &'static str,
        f: impl FnOnce(&WriteTransaction) -> Result<T>,
    ) -> Result<T> {
        ctx.check(operation)?;
        let txn = self
            .db
            .begin_write()
            .map_err(|e| unavailable(operation, e))?;
        let outcome = f(&txn).and_then(|value| {
            ctx.check(operation)?;
            Ok(value)
        });
        match outcome {
            Ok(value) => {
                txn.commit().map_err(|e| driver(operation, e))?;
                Ok(value)
            },
            Err(e) => {
                if let Err(abort) = txn.abort() {
                    tracing::warn!(operation, error = %abort, "failed to abort transaction");
                }
                Err(e)
            },
        }
    }
}

impl std::fmt::Debug for MemDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemDbStore").finish_non_exhaustive()
    }
}

impl BoardStore for MemDbStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
