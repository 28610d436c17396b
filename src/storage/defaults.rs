//! Built-in statuses for a fresh store.

use super::{BoardStore, OpContext};
use crate::Result;
use crate::filters::QuerySpec;
use crate::models::{Status, StatusId, StatusKind, Timestamps};
use chrono::{DateTime, Utc};

const GREEN: &str = "#5DFC0A";
const RED: &str = "#FF0000";
const YELLOW: &str = "#EEEB8D";

const DEFAULTS: [(&str, StatusKind, &str); 8] = [
    ("UP", StatusKind::Up, GREEN),
    ("DOWN", StatusKind::Down, RED),
    ("WARNING", StatusKind::Warning, YELLOW),
    ("CREATED", StatusKind::Created, GREEN),
    ("OFFLINE", StatusKind::Offline, RED),
    ("ONLINE", StatusKind::Online, GREEN),
    ("OBSERVING", StatusKind::Observing, YELLOW),
    ("INVESTIGATING", StatusKind::Investigating, YELLOW),
];

/// Builds the default statuses.
///
/// Every call returns fresh records with newly generated ids, so callers may
/// modify or store them without affecting later calls.
#[must_use]
pub fn default_statuses(now: DateTime<Utc>) -> Vec<Status> {
    DEFAULTS
        .iter()
        .map(|(name, kind, color)| Status {
            id: StatusId::generate(),
            name: (*name).to_string(),
            kind: *kind,
            description: None,
            color: Some((*color).to_string()),
            timestamps: Timestamps {
                created: Some(now),
                updated: Some(now),
                deleted: None,
            },
        })
        .collect()
}

/// Stores the default statuses when the store has none.
///
/// Individual failures are logged and skipped. Returns the statuses that
/// were created, which is empty when the store already had any status.
///
/// # Errors
///
/// Returns an error if the existing statuses cannot be listed, or if the
/// context fires while seeding.
pub fn seed_default_statuses(store: &dyn BoardStore, ctx: &OpContext) -> Result<Vec<Status>> {
    if !store.find_statuses(ctx, &QuerySpec::all())?.is_empty() {
        tracing::debug!(backend = store.backend_name(), "statuses present, skipping defaults");
        return Ok(Vec::new());
    }

    let mut created = Vec::new();
    for status in default_statuses(Utc::now()) {
        ctx.check("seed_default_statuses")?;
        let name = status.name.clone();
        match store.store_status(ctx, status) {
            Ok(stored) => created.push(stored),
            Err(e) => {
                tracing::warn!(
                    backend = store.backend_name(),
                    status = %name,
                    error = %e,
                    "failed to store default status"
                );
            },
        }
    }
    tracing::info!(
        backend = store.backend_name(),
        count = created.len(),
        "seeded default statuses"
    );
    Ok(created)
}
