//! Note rows.

use super::diff::{ApplyDiff, Column, ColumnDiff, integer_value, text_value, wrong_column};
use super::escape::{escape_html, unescape_html};
use super::timestamps::EncodedTimestamps;
use super::{require_id, require_text};
use crate::Result;
use crate::models::{ItemId, Note, NoteId};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "note";

/// Flat, storage-ready note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRow {
    /// Primary key.
    pub id: String,
    /// Escaped body.
    pub note_text: String,
    /// Owning item.
    pub item_id: String,
    /// Creation instant, epoch nanoseconds.
    pub created: i64,
    /// Last-update instant, epoch nanoseconds.
    pub updated: i64,
    /// Deletion instant, epoch nanoseconds.
    pub deleted: Option<i64>,
}

impl NoteRow {
    /// Validates a domain note and flattens it.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::EmptyString`] for an empty id, owner, or text
    /// - [`crate::Error::MissingTimestamp`] for unset created/updated
    pub fn from_domain(note: &Note) -> Result<Self> {
        require_id("note.id", note.id.as_str())?;
        require_id("note.item_id", note.item_id.as_str())?;
        require_text("note.text", &note.text)?;
        let ts = EncodedTimestamps::encode(&note.timestamps)?;
        Ok(Self {
            id: note.id.as_str().to_string(),
            note_text: escape_html(&note.text),
            item_id: note.item_id.as_str().to_string(),
            created: ts.created,
            updated: ts.updated,
            deleted: ts.deleted,
        })
    }

    /// Rebuilds the domain note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidData`] if the timestamps are missing.
    pub fn to_domain(&self) -> Result<Note> {
        let timestamps = EncodedTimestamps {
            created: self.created,
            updated: self.updated,
            deleted: self.deleted,
        }
        .decode(ENTITY)?;
        Ok(Note {
            id: NoteId::new(self.id.clone()),
            item_id: ItemId::new(self.item_id.clone()),
            text: unescape_html(&self.note_text),
            timestamps,
        })
    }
}

impl ApplyDiff for NoteRow {
    fn apply(&mut self, diff: &ColumnDiff) -> Result<()> {
        for (column, value) in diff.iter() {
            match column {
                Column::NoteText => self.note_text = text_value(ENTITY, *column, value)?,
                Column::Created => self.created = integer_value(ENTITY, *column, value)?,
                Column::Updated => self.updated = integer_value(ENTITY, *column, value)?,
                Column::Deleted => self.deleted = value.as_integer(),
                other => return Err(wrong_column(ENTITY, *other)),
            }
        }
        Ok(())
    }
}
