//! Item store trait.

use crate::Result;
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{Item, ItemId};
use crate::storage::OpContext;

/// Store, look up, and change items.
///
/// Items read back always carry their status embedded and their notes
/// ordered by id.
pub trait ItemStore: Send + Sync {
    /// Inserts a new item and returns it as stored.
    ///
    /// An empty id is generated; unset timestamps are filled with now. An
    /// embedded status without an id is created in the same transaction; a
    /// status given by id must already exist.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::AlreadyExists`] when the id or name is taken
    /// - [`crate::Error::NotFound`] when the referenced status is missing
    fn store_item(&self, ctx: &OpContext, item: Item) -> Result<Item>;

    /// Fetches an item by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no item has that id.
    fn get_item(&self, ctx: &OpContext, id: &ItemId) -> Result<Item>;

    /// Returns every item matching `query`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_items(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Item>>;

    /// Applies the item-relevant fields of `update`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::AtLeastOne`] when `update` has nothing for items
    /// - [`crate::Error::NotFound`] when the item or referenced status is missing
    fn update_item(&self, ctx: &OpContext, id: &ItemId, update: &UpdateSpec) -> Result<()>;

    /// Deletes an item and its notes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no item has that id.
    fn delete_item(&self, ctx: &OpContext, id: &ItemId) -> Result<()>;
}
