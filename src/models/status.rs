//! Status records and references to them.

use super::{StatusId, StatusKind, Timestamps};
use serde::{Deserialize, Serialize};

/// A named, colored, kind-tagged state that items point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Unique id; empty until the store assigns one.
    pub id: StatusId,
    /// Unique display name.
    pub name: String,
    /// Category of the status.
    pub kind: StatusKind,
    /// Optional description.
    pub description: Option<String>,
    /// Optional display color, usually a hex triplet.
    pub color: Option<String>,
    /// Lifecycle timestamps.
    pub timestamps: Timestamps,
}

impl Status {
    /// Creates a status without an id or timestamps.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            id: StatusId::default(),
            name: name.into(),
            kind,
            description: None,
            color: None,
            timestamps: Timestamps::default(),
        }
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<StatusId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the timestamps.
    #[must_use]
    pub const fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
        self.timestamps = timestamps;
        self
    }
}

/// How an item refers to its status.
///
/// A status is either named by id (it must already exist) or carried whole.
/// An embedded status without an id is created when the item is written;
/// one with an id is treated as a reference to that id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusRef {
    /// Reference an existing status.
    ById(StatusId),
    /// Carry the status record itself.
    Embedded(Status),
}

impl StatusRef {
    /// Returns the referenced id, if one is known.
    #[must_use]
    pub fn id(&self) -> Option<&StatusId> {
        match self {
            Self::ById(id) => Some(id),
            Self::Embedded(status) if !status.id.is_empty() => Some(&status.id),
            Self::Embedded(_) => None,
        }
    }

    /// Returns the embedded record, if any.
    #[must_use]
    pub const fn status(&self) -> Option<&Status> {
        match self {
            Self::ById(_) => None,
            Self::Embedded(status) => Some(status),
        }
    }
}

impl From<StatusId> for StatusRef {
    fn from(id: StatusId) -> Self {
        Self::ById(id)
    }
}

impl From<Status> for StatusRef {
    fn from(status: Status) -> Self {
        Self::Embedded(status)
    }
}
