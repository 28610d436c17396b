//! Referential integrity checks shared by both engines.
//!
//! The relational engine also has foreign keys, but both engines run these
//! checks inside their write transaction first so the error a caller sees
//! (`NotFound`, `InUse`) does not depend on the backend.

use crate::models::{ItemId, StatusId};
use crate::{Error, Result};

/// Existence lookups an engine answers from inside an open transaction.
pub trait IntegrityProbe {
    /// Returns true if a status with `id` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn status_exists(&self, id: &StatusId) -> Result<bool>;

    /// Returns true if an item with `id` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn item_exists(&self, id: &ItemId) -> Result<bool>;

    /// Returns how many items reference status `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn items_using_status(&self, id: &StatusId) -> Result<usize>;
}

/// Fails with `NotFound` unless status `id` exists.
///
/// # Errors
///
/// Returns [`Error::NotFound`] or the probe's own error.
pub fn ensure_status_exists(probe: &impl IntegrityProbe, id: &StatusId) -> Result<()> {
    if probe.status_exists(id)? {
        Ok(())
    } else {
        Err(Error::not_found("status", id.as_str()))
    }
}

/// Fails with `NotFound` unless item `id` exists.
///
/// # Errors
///
/// Returns [`Error::NotFound`] or the probe's own error.
pub fn ensure_item_exists(probe: &impl IntegrityProbe, id: &ItemId) -> Result<()> {
    if probe.item_exists(id)? {
        Ok(())
    } else {
        Err(Error::not_found("item", id.as_str()))
    }
}

/// Fails with `InUse` if any item still references status `id`.
///
/// # Errors
///
/// Returns [`Error::InUse`] or the probe's own error.
pub fn ensure_status_unreferenced(probe: &impl IntegrityProbe, id: &StatusId) -> Result<()> {
    let count = probe.items_using_status(id)?;
    if count > 0 {
        tracing::debug!(status_id = %id, items = count, "status still referenced");
        return Err(Error::InUse {
            entity: "status",
            id: id.as_str().to_string(),
        });
    }
    Ok(())
}
