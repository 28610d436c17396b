//! Item rows.

use super::diff::{ApplyDiff, Column, ColumnDiff, integer_value, optional_text, text_value, wrong_column};
use super::escape::{escape_html, unescape_html};
use super::timestamps::EncodedTimestamps;
use super::{escape_opt, require_id, require_text, unescape_opt};
use crate::models::{Item, ItemId, Note, Status, StatusRef};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "item";

/// Flat, storage-ready item. Notes and the status record live in their own
/// tables; only the status id is kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    /// Primary key.
    pub id: String,
    /// Escaped unique name.
    pub name: String,
    /// Escaped description.
    pub description: Option<String>,
    /// Referenced status, if any.
    pub status_id: Option<String>,
    /// Creation instant, epoch nanoseconds.
    pub created: i64,
    /// Last-update instant, epoch nanoseconds.
    pub updated: i64,
    /// Deletion instant, epoch nanoseconds.
    pub deleted: Option<i64>,
}

impl ItemRow {
    /// Validates a domain item and flattens it.
    ///
    /// The item's status must already be resolved to an id; an embedded
    /// status without one is rejected.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyString`] for an empty id, name, or unresolved status
    /// - [`Error::MissingTimestamp`] for unset created/updated
    pub fn from_domain(item: &Item) -> Result<Self> {
        require_id("item.id", item.id.as_str())?;
        require_text("item.name", &item.name)?;
        let status_id = match &item.status {
            None => None,
            Some(status) => Some(
                status
                    .id()
                    .filter(|id| !id.is_empty())
                    .ok_or(Error::EmptyString {
                        field: "item.status_id",
                    })?
                    .as_str()
                    .to_string(),
            ),
        };
        let ts = EncodedTimestamps::encode(&item.timestamps)?;
        Ok(Self {
            id: item.id.as_str().to_string(),
            name: escape_html(&item.name),
            description: escape_opt(item.description.as_deref()),
            status_id,
            created: ts.created,
            updated: ts.updated,
            deleted: ts.deleted,
        })
    }

    /// Rebuilds the domain item from this row, its resolved status, and its
    /// notes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the row references a status that was
    /// not supplied, or its timestamps are missing.
    pub fn to_domain(&self, status: Option<Status>, notes: Vec<Note>) -> Result<Item> {
        let status = match (&self.status_id, status) {
            (None, _) => None,
            (Some(_), Some(status)) => Some(StatusRef::Embedded(status)),
            (Some(id), None) => {
                return Err(Error::InvalidData {
                    entity: ENTITY,
                    reason: format!("references missing status '{id}'"),
                });
            },
        };
        let timestamps = EncodedTimestamps {
            created: self.created,
            updated: self.updated,
            deleted: self.deleted,
        }
        .decode(ENTITY)?;
        Ok(Item {
            id: ItemId::new(self.id.clone()),
            name: unescape_html(&self.name),
            description: unescape_opt(self.description.as_deref()),
            status,
            notes,
            timestamps,
        })
    }
}

impl ApplyDiff for ItemRow {
    fn apply(&mut self, diff: &ColumnDiff) -> Result<()> {
        for (column, value) in diff.iter() {
            match column {
                Column::Name => self.name = text_value(ENTITY, *column, value)?,
                Column::Description => self.description = optional_text(value),
                Column::StatusId => self.status_id = optional_text(value),
                Column::Updated => self.updated = integer_value(ENTITY, *column, value)?,
                other => return Err(wrong_column(ENTITY, *other)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::models::{StatusKind, Timestamps};

    fn status() -> Status {
        Status::new("UP", StatusKind::Up)
            .with_id("s1")
            .with_timestamps(Timestamps::now())
    }

    #[test]
    fn test_roundtrip_embeds_status() {
        let item = Item::new("web & db")
            .with_id("i1")
            .with_status_id("s1")
            .with_timestamps(Timestamps::now());
        let row = ItemRow::from_domain(&item).unwrap();
        assert_eq!(row.name, "web &amp; db");
        assert_eq!(row.status_id.as_deref(), Some("s1"));

        let back = row.to_domain(Some(status()), Vec::new()).unwrap();
        assert_eq!(back.name, "web & db");
        assert_eq!(back.status().map(|s| s.name.as_str()), Some("UP"));
        assert_eq!(back.timestamps, item.timestamps);
    }

    #[test]
    fn test_unresolved_embedded_status_rejected() {
        let item = Item::new("x")
            .with_id("i1")
            .with_status(Status::new("NEW", StatusKind::Up))
            .with_timestamps(Timestamps::now());
        let err = ItemRow::from_domain(&item).unwrap_err();
        assert!(matches!(err, Error::EmptyString { field: "item.status_id" }));
    }

    #[test]
    fn test_dangling_status_is_invalid_data() {
        let item = Item::new("x")
            .with_id("i1")
            .with_status_id("gone")
            .with_timestamps(Timestamps::now());
        let row = ItemRow::from_domain(&item).unwrap();
        let err = row.to_domain(None, Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_empty_name_rejected() {
        let item = Item::new("  ").with_id("i1").with_timestamps(Timestamps::now());
        assert_eq!(
            ItemRow::from_domain(&item).unwrap_err().kind(),
            ErrorKind::EmptyString
        );
    }
}
