//! Connection handling for the relational engine.
//!
//! `SQLite` leaves foreign keys off for every new connection, so
//! [`configure_connection`] turns them on each time a connection is opened
//! and verifies the setting took.

use crate::{Error, Result};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Default wait before a busy database is reported as unavailable.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Lock-recovery events for the shared connection.
pub const LOCK_RECOVERIES: &str = "statusboard_sqlite_lock_recoveries_total";

/// Locks the shared connection.
///
/// A poisoned lock is taken over and counted under [`LOCK_RECOVERIES`].
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!(engine = "sqlite", "connection lock poisoned, taking it over");
        metrics::counter!(LOCK_RECOVERIES).increment(1);
        poisoned.into_inner()
    })
}

/// Configures a freshly opened connection.
///
/// # Configuration Applied
///
/// - **WAL mode**: concurrent readers alongside a single writer
/// - **NORMAL synchronous**: balances durability with performance
/// - **`busy_timeout`**: waits on lock contention instead of failing at once
/// - **`foreign_keys`**: on, then read back to confirm
///
/// # Errors
///
/// - [`Error::StoreUnavailable`] if the busy timeout cannot be set
/// - [`Error::Unrecoverable`] if foreign keys cannot be enabled
pub fn configure_connection(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    // journal_mode returns a row ("wal" or "memory"), so results are ignored
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    conn.busy_timeout(busy_timeout)
        .map_err(|e| Error::StoreUnavailable {
            operation: "set_busy_timeout".to_string(),
            cause: e.to_string(),
        })?;

    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| Error::Unrecoverable {
            operation: "enable_foreign_keys".to_string(),
            cause: e.to_string(),
        })?;
    if !foreign_keys_enabled(conn)? {
        return Err(Error::Unrecoverable {
            operation: "enable_foreign_keys".to_string(),
            cause: "foreign_keys pragma did not take effect".to_string(),
        });
    }
    Ok(())
}

/// Reads back the `foreign_keys` pragma.
///
/// # Errors
///
/// Returns [`Error::Unrecoverable`] if the pragma cannot be read.
pub fn foreign_keys_enabled(conn: &Connection) -> Result<bool> {
    conn.pragma_query_value(None, "foreign_keys", |row| row.get::<_, i64>(0))
        .map(|v| v == 1)
        .map_err(|e| Error::Unrecoverable {
            operation: "read_foreign_keys".to_string(),
            cause: e.to_string(),
        })
}
