//! Backend selection from configuration.

use super::{BoardStore, MemDbStore, SqliteStore};
use crate::Result;
use crate::config::{BackendKind, BoardConfig};
use std::sync::Arc;
use std::time::Duration;

/// Opens the engine named by `config`.
///
/// # Errors
///
/// Returns [`crate::Error::StoreUnavailable`] if the engine cannot be opened.
pub fn open_store(config: &BoardConfig) -> Result<Arc<dyn BoardStore>> {
    let store: Arc<dyn BoardStore> = match config.backend {
        BackendKind::Memory => Arc::new(MemDbStore::new()?),
        BackendKind::Sqlite => Arc::new(SqliteStore::open(
            config.sqlite_path.clone(),
            Duration::from_millis(config.busy_timeout_ms),
        )?),
    };
    tracing::info!(backend = store.backend_name(), "storage backend opened");
    Ok(store)
}
