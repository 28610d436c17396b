//! Storage contract traits.
//!
//! Each entity has its own trait; [`BoardStore`] bundles them so callers can
//! hold a single `Arc<dyn BoardStore>` whatever engine sits behind it.

mod item;
mod note;
mod status;
mod user;

pub use item::ItemStore;
pub use note::NoteStore;
pub use status::StatusStore;
pub use user::UserStore;

/// The full storage contract.
pub trait BoardStore: ItemStore + StatusStore + NoteStore + UserStore {
    /// Short engine name used in logs and metrics.
    fn backend_name(&self) -> &'static str;
}
