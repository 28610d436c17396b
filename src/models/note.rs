//! Notes attached to items.

use super::{ItemId, NoteId, Timestamps};
use serde::{Deserialize, Serialize};

/// A free-text annotation owned by exactly one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique id; empty until the store assigns one.
    pub id: NoteId,
    /// Owning item; set by the store from the `store_note` argument.
    pub item_id: ItemId,
    /// Note body.
    pub text: String,
    /// Lifecycle timestamps.
    pub timestamps: Timestamps,
}

impl Note {
    /// Creates a note without an id, owner, or timestamps.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NoteId::default(),
            item_id: ItemId::default(),
            text: text.into(),
            timestamps: Timestamps::default(),
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<NoteId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the timestamps.
    #[must_use]
    pub const fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
        self.timestamps = timestamps;
        self
    }
}
