//! Domain records.
//!
//! These are the rich types callers work with. Storage engines never persist
//! them directly; the mapper in [`crate::storage::mapper`] converts them to
//! flat rows and back.

mod ids;
mod item;
mod kind;
mod note;
mod status;
mod timestamps;
mod user;

pub use ids::{ItemId, NoteId, StatusId, UserId};
pub use item::Item;
pub use kind::StatusKind;
pub use note::Note;
pub use status::{Status, StatusRef};
pub use timestamps::Timestamps;
pub use user::User;
