//! Status rows.

use super::diff::{ApplyDiff, Column, ColumnDiff, integer_value, optional_text, text_value, wrong_column};
use super::escape::{escape_html, unescape_html};
use super::timestamps::EncodedTimestamps;
use super::{escape_opt, require_id, require_text, unescape_opt};
use crate::models::{Status, StatusId, StatusKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "status";

/// Flat, storage-ready status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    /// Primary key.
    pub id: String,
    /// Escaped unique name.
    pub name: String,
    /// Symbolic kind name, e.g. `STATUS_KIND_UP`.
    pub kind: String,
    /// Escaped description.
    pub description: Option<String>,
    /// Escaped color.
    pub color: Option<String>,
    /// Creation instant, epoch nanoseconds.
    pub created: i64,
    /// Last-update instant, epoch nanoseconds.
    pub updated: i64,
    /// Deletion instant, epoch nanoseconds.
    pub deleted: Option<i64>,
}

impl StatusRow {
    /// Validates a domain status and flattens it.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyString`] for an empty id or name
    /// - [`Error::EmptyEnum`] for an `Unknown` kind
    /// - [`Error::MissingTimestamp`] for unset created/updated
    pub fn from_domain(status: &Status) -> Result<Self> {
        require_id("status.id", status.id.as_str())?;
        require_text("status.name", &status.name)?;
        if status.kind.is_unknown() {
            return Err(Error::EmptyEnum {
                field: "status.kind",
            });
        }
        let ts = EncodedTimestamps::encode(&status.timestamps)?;
        Ok(Self {
            id: status.id.as_str().to_string(),
            name: escape_html(&status.name),
            kind: status.kind.as_str().to_string(),
            description: escape_opt(status.description.as_deref()),
            color: escape_opt(status.color.as_deref()),
            created: ts.created,
            updated: ts.updated,
            deleted: ts.deleted,
        })
    }

    /// Rebuilds the domain status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the kind is unrecognized or the
    /// timestamps are missing.
    pub fn to_domain(&self) -> Result<Status> {
        let kind = StatusKind::parse(&self.kind)
            .filter(|k| !k.is_unknown())
            .ok_or_else(|| Error::InvalidData {
                entity: ENTITY,
                reason: format!("unrecognized kind '{}'", self.kind),
            })?;
        let timestamps = self.encoded_timestamps().decode(ENTITY)?;
        Ok(Status {
            id: StatusId::new(self.id.clone()),
            name: unescape_html(&self.name),
            kind,
            description: unescape_opt(self.description.as_deref()),
            color: unescape_opt(self.color.as_deref()),
            timestamps,
        })
    }

    const fn encoded_timestamps(&self) -> EncodedTimestamps {
        EncodedTimestamps {
            created: self.created,
            updated: self.updated,
            deleted: self.deleted,
        }
    }
}

impl ApplyDiff for StatusRow {
    fn apply(&mut self, diff: &ColumnDiff) -> Result<()> {
        for (column, value) in diff.iter() {
            match column {
                Column::Name => self.name = text_value(ENTITY, *column, value)?,
                Column::Kind => self.kind = text_value(ENTITY, *column, value)?,
                Column::Description => self.description = optional_text(value),
                Column::Color => self.color = optional_text(value),
                Column::Updated => self.updated = integer_value(ENTITY, *column, value)?,
                other => return Err(wrong_column(ENTITY, *other)),
            }
        }
        Ok(())
    }
}
