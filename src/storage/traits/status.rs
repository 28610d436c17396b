//! Status store trait.

use crate::Result;
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Status, StatusId};
use crate::storage::OpContext;

/// Store, look up, and change statuses.
pub trait StatusStore: Send + Sync {
    /// Inserts a new status and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyExists`] when the id or name is taken.
    fn store_status(&self, ctx: &OpContext, status: Status) -> Result<Status>;

    /// Fetches a status by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no status has that id.
    fn get_status(&self, ctx: &OpContext, id: &StatusId) -> Result<Status>;

    /// Returns every status matching `query`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_statuses(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Status>>;

    /// Applies the status-relevant fields of `update`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::AtLeastOne`] when `update` has nothing for statuses
    /// - [`crate::Error::NotFound`] when the status is missing
    fn update_status(&self, ctx: &OpContext, id: &StatusId, update: &UpdateSpec) -> Result<()>;

    /// Deletes a status no item references.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::NotFound`] when the status is missing
    /// - [`crate::Error::InUse`] when an item still references it
    fn delete_status(&self, ctx: &OpContext, id: &StatusId) -> Result<()>;
}
