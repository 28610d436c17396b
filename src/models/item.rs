//! Items: the monitored things.

use super::{ItemId, Note, Status, StatusId, StatusRef, Timestamps};
use serde::{Deserialize, Serialize};

/// A monitored thing with an optional status and its notes.
///
/// Records read back from a store always carry their status as
/// [`StatusRef::Embedded`] and their notes ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique id; empty until the store assigns one.
    pub id: ItemId,
    /// Unique display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional status.
    pub status: Option<StatusRef>,
    /// Notes owned by this item.
    pub notes: Vec<Note>,
    /// Lifecycle timestamps.
    pub timestamps: Timestamps,
}

impl Item {
    /// Creates an item without an id, status, or timestamps.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::default(),
            name: name.into(),
            description: None,
            status: None,
            notes: Vec::new(),
            timestamps: Timestamps::default(),
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Points the item at an existing status.
    #[must_use]
    pub fn with_status_id(mut self, id: impl Into<StatusId>) -> Self {
        self.status = Some(StatusRef::ById(id.into()));
        self
    }

    /// Embeds a status record, created on write when it has no id.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(StatusRef::Embedded(status));
        self
    }

    /// Sets the timestamps.
    #[must_use]
    pub const fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Returns the status id, if known.
    #[must_use]
    pub fn status_id(&self) -> Option<&StatusId> {
        self.status.as_ref().and_then(StatusRef::id)
    }

    /// Returns the resolved status record, if embedded.
    #[must_use]
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref().and_then(StatusRef::status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusKind;

    #[test]
    fn test_item_status_accessors() {
        let item = Item::new("svc-a").with_status_id("s1");
        assert_eq!(item.status_id().map(StatusId::as_str), Some("s1"));
        assert!(item.status().is_none());

        let item = Item::new("svc-b").with_status(Status::new("UP", StatusKind::Up));
        assert!(item.status_id().is_none());
        assert_eq!(item.status().map(|s| s.kind), Some(StatusKind::Up));
    }
}
