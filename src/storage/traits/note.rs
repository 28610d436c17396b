//! Note store trait.

use crate::Result;
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::{ItemId, Note, NoteId};
use crate::storage::OpContext;

/// Store, look up, and change notes.
pub trait NoteStore: Send + Sync {
    /// Attaches a new note to `item_id` and returns it as stored.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::NotFound`] when the item is missing
    /// - [`crate::Error::AlreadyExists`] when the note id is taken
    fn store_note(&self, ctx: &OpContext, note: Note, item_id: &ItemId) -> Result<Note>;

    /// Fetches a note by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no note has that id.
    fn get_note(&self, ctx: &OpContext, id: &NoteId) -> Result<Note>;

    /// Returns the notes of `item_id`, ordered by id.
    ///
    /// Notes carry neither a status nor a name, so the predicates in
    /// `query` do not narrow the result: every note of the item is returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when the item is missing.
    fn find_notes(&self, ctx: &OpContext, item_id: &ItemId, query: &QuerySpec) -> Result<Vec<Note>>;

    /// Applies the note-relevant fields of `update`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::AtLeastOne`] when `update` has nothing for notes
    /// - [`crate::Error::NotFound`] when the note is missing
    fn update_note(&self, ctx: &OpContext, id: &NoteId, update: &UpdateSpec) -> Result<()>;

    /// Deletes a note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no note has that id.
    fn delete_note(&self, ctx: &OpContext, id: &NoteId) -> Result<()>;
}
