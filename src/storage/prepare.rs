//! Defaults applied to records before either engine writes them.

use crate::models::{Item, ItemId, Note, NoteId, Status, StatusId, StatusRef, User, UserId};
use chrono::{DateTime, Utc};

/// Assigns an id when missing and fills unset created/updated.
pub(crate) fn status(mut status: Status, now: DateTime<Utc>) -> Status {
    if status.id.is_empty() {
        status.id = StatusId::generate();
    }
    status.timestamps.fill_missing(now);
    status
}

/// Assigns an id, fills timestamps, and prepares any carried notes.
///
/// The status reference is left alone; see [`plan_status`].
pub(crate) fn item(mut item: Item, now: DateTime<Utc>) -> Item {
    if item.id.is_empty() {
        item.id = ItemId::generate();
    }
    item.timestamps.fill_missing(now);
    let owner = item.id.clone();
    item.notes = std::mem::take(&mut item.notes)
        .into_iter()
        .map(|n| note(n, &owner, now))
        .collect();
    item
}

/// Assigns an id, binds the owner, and fills timestamps.
pub(crate) fn note(mut note: Note, item_id: &ItemId, now: DateTime<Utc>) -> Note {
    if note.id.is_empty() {
        note.id = NoteId::generate();
    }
    note.item_id = item_id.clone();
    note.timestamps.fill_missing(now);
    note
}

/// Assigns an id when missing and fills unset created/updated.
pub(crate) fn user(mut user: User, now: DateTime<Utc>) -> User {
    if user.id.is_empty() {
        user.id = UserId::generate();
    }
    user.timestamps.fill_missing(now);
    user
}

/// What an engine must do with an item's status reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatusPlan {
    /// Reference an existing status; it must exist.
    Existing(StatusId),
    /// Insert this status first, then reference it.
    Create(Status),
}

/// Decides how to resolve a status reference.
///
/// An embedded status without an id is created; one with an id is treated
/// as a reference.
pub(crate) fn plan_status(status: Option<StatusRef>, now: DateTime<Utc>) -> Option<StatusPlan> {
    match status? {
        StatusRef::ById(id) => Some(StatusPlan::Existing(id)),
        StatusRef::Embedded(s) if !s.id.is_empty() => Some(StatusPlan::Existing(s.id)),
        StatusRef::Embedded(s) => Some(StatusPlan::Create(self::status(s, now))),
    }
}
