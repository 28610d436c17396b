//! Column diffs computed from an [`UpdateSpec`].
//!
//! Both engines apply updates through the same diff: the relational engine
//! turns it into a partial `UPDATE`, the in-memory engine patches the stored
//! row with [`ApplyDiff`]. Text values in a diff are already escaped.

use super::escape::escape_html;
use super::timestamps::{encode_optional, encode_required};
use crate::filters::UpdateSpec;
use crate::models::{StatusId, StatusRef};
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// A storage column that an update can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Item or status name.
    Name,
    /// Item or status description.
    Description,
    /// Status color.
    Color,
    /// Status kind, stored by symbolic name.
    Kind,
    /// Item status reference.
    StatusId,
    /// Note body.
    NoteText,
    /// User password hash.
    Password,
    /// User given name.
    FirstName,
    /// User family name.
    LastName,
    /// User email address.
    EmailAddress,
    /// User avatar location.
    AvatarUrl,
    /// User last sign-in.
    LastLogin,
    /// Creation instant.
    Created,
    /// Last-update instant.
    Updated,
    /// Deletion instant.
    Deleted,
}

impl Column {
    /// Returns the SQL column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Color => "color",
            Self::Kind => "kind",
            Self::StatusId => "status_id",
            Self::NoteText => "note_text",
            Self::Password => "password",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::EmailAddress => "email_address",
            Self::AvatarUrl => "avatar_url",
            Self::LastLogin => "last_login",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// A value destined for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// SQL `NULL` / absent.
    Null,
}

impl ColumnValue {
    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Ordered set of column assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDiff {
    changes: Vec<(Column, ColumnValue)>,
}

impl ColumnDiff {
    /// Assigns `value` to `column`, replacing an earlier assignment.
    pub fn set(&mut self, column: Column, value: ColumnValue) {
        if let Some(existing) = self.changes.iter_mut().find(|(c, _)| *c == column) {
            existing.1 = value;
        } else {
            self.changes.push((column, value));
        }
    }

    /// Returns the value assigned to `column`.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<&ColumnValue> {
        self.changes
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    /// Iterates assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(Column, ColumnValue)> {
        self.changes.iter()
    }

    /// Number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns true when nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn set_text(&mut self, column: Column, value: Option<String>) {
        if let Some(value) = value {
            self.set(column, ColumnValue::Text(value));
        }
    }

    fn set_escaped(&mut self, column: Column, value: Option<String>) {
        self.set_text(column, value.as_deref().map(escape_html));
    }

    fn bump(&mut self, now: DateTime<Utc>) -> Result<()> {
        let nanos = encode_required("updated", Some(now))?;
        self.set(Column::Updated, ColumnValue::Integer(nanos));
        Ok(())
    }
}

/// A row type that can take a [`ColumnDiff`].
pub trait ApplyDiff {
    /// Patches the row in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unrecoverable`] if the diff names a column this row
    /// does not have or carries a value of the wrong shape.
    fn apply(&mut self, diff: &ColumnDiff) -> Result<()>;
}

pub(crate) fn wrong_column(entity: &'static str, column: Column) -> Error {
    Error::Unrecoverable {
        operation: format!("apply_{entity}_diff"),
        cause: format!("column '{}' is not valid here", column.as_str()),
    }
}

pub(crate) fn text_value(entity: &'static str, column: Column, value: &ColumnValue) -> Result<String> {
    value
        .as_text()
        .map(ToString::to_string)
        .ok_or_else(|| wrong_column(entity, column))
}

pub(crate) fn optional_text(value: &ColumnValue) -> Option<String> {
    value.as_text().map(ToString::to_string)
}

pub(crate) fn integer_value(entity: &'static str, column: Column, value: &ColumnValue) -> Result<i64> {
    value.as_integer().ok_or_else(|| wrong_column(entity, column))
}

/// Diff for a status update: name, description, color, kind.
///
/// # Errors
///
/// Returns [`Error::AtLeastOne`] if the spec carries none of them.
pub fn status_diff(spec: &UpdateSpec, now: DateTime<Utc>) -> Result<ColumnDiff> {
    let mut diff = ColumnDiff::default();
    diff.set_escaped(Column::Name, spec.name());
    diff.set_escaped(Column::Description, spec.description());
    diff.set_escaped(Column::Color, spec.color());
    diff.set_text(Column::Kind, spec.kind().map(|k| k.as_str().to_string()));
    if diff.is_empty() {
        return Err(Error::AtLeastOne { field: "update" });
    }
    diff.bump(now)?;
    Ok(diff)
}

/// Pending item diff whose status reference is still unresolved.
///
/// Engines resolve the reference (checking existence or creating an
/// embedded status) and then call [`ItemDiff::finish`].
#[derive(Debug, Clone)]
pub struct ItemDiff {
    diff: ColumnDiff,
    status: Option<StatusRef>,
}

impl ItemDiff {
    /// Plans an item update: name, description, status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AtLeastOne`] if the spec carries none of them.
    pub fn plan(spec: &UpdateSpec) -> Result<Self> {
        let mut diff = ColumnDiff::default();
        diff.set_escaped(Column::Name, spec.name());
        diff.set_escaped(Column::Description, spec.description());
        let status = spec.status();
        if diff.is_empty() && status.is_none() {
            return Err(Error::AtLeastOne { field: "update" });
        }
        Ok(Self { diff, status })
    }

    /// Status reference to resolve before finishing.
    #[must_use]
    pub const fn status(&self) -> Option<&StatusRef> {
        self.status.as_ref()
    }

    /// Completes the diff with the resolved status id and bumps `updated`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] if a status change was planned but no
    /// id was resolved for it.
    pub fn finish(mut self, status_id: Option<&StatusId>, now: DateTime<Utc>) -> Result<ColumnDiff> {
        if self.status.is_some() {
            let id = status_id
                .filter(|id| !id.is_empty())
                .ok_or(Error::EmptyString { field: "status_id" })?;
            self.diff
                .set(Column::StatusId, ColumnValue::Text(id.as_str().to_string()));
        }
        self.diff.bump(now)?;
        Ok(self.diff)
    }
}

/// Diff for a note update: text and optional timestamp override.
///
/// Without an override `updated` is bumped to `now`; with one, each supplied
/// instant replaces the stored value and a missing `updated` still bumps.
///
/// # Errors
///
/// Returns [`Error::AtLeastOne`] if the spec carries neither field.
pub fn note_diff(spec: &UpdateSpec, now: DateTime<Utc>) -> Result<ColumnDiff> {
    let mut diff = ColumnDiff::default();
    diff.set_escaped(Column::NoteText, spec.note_text());
    let timestamps = spec.timestamps();
    if diff.is_empty() && timestamps.is_none() {
        return Err(Error::AtLeastOne { field: "update" });
    }
    match timestamps {
        Some(ts) => {
            if ts.created.is_some() {
                let created = encode_required("created", ts.created)?;
                diff.set(Column::Created, ColumnValue::Integer(created));
            }
            let updated = encode_required("updated", ts.updated.or(Some(now)))?;
            diff.set(Column::Updated, ColumnValue::Integer(updated));
            if let Some(deleted) = encode_optional("deleted", ts.deleted)? {
                diff.set(Column::Deleted, ColumnValue::Integer(deleted));
            }
        },
        None => diff.bump(now)?,
    }
    Ok(diff)
}

/// Diff for a user update: profile fields, password hash, last sign-in.
///
/// # Errors
///
/// Returns [`Error::AtLeastOne`] if the spec carries none of them.
pub fn user_diff(spec: &UpdateSpec, now: DateTime<Utc>) -> Result<ColumnDiff> {
    let mut diff = ColumnDiff::default();
    diff.set_escaped(Column::FirstName, spec.first_name());
    diff.set_escaped(Column::LastName, spec.last_name());
    diff.set_text(Column::EmailAddress, spec.email_address());
    diff.set_text(Column::AvatarUrl, spec.avatar_url());
    diff.set_text(Column::Password, spec.password_hash());
    if let Some(at) = spec.last_login() {
        let nanos = encode_required("last_login", Some(at))?;
        diff.set(Column::LastLogin, ColumnValue::Integer(nanos));
    }
    if diff.is_empty() {
        return Err(Error::AtLeastOne { field: "update" });
    }
    diff.bump(now)?;
    Ok(diff)
}
