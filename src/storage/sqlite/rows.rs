//! Reading mapper rows out of `rusqlite` result rows.
//!
//! Column order matches the lists in [`super::schema`].

use crate::storage::mapper::{ItemRow, NoteRow, StatusRow, UserRow};
use rusqlite::Row;

pub(super) fn status_row(row: &Row<'_>) -> rusqlite::Result<StatusRow> {
    Ok(StatusRow {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        description: row.get(3)?,
        color: row.get(4)?,
        created: row.get(5)?,
        updated: row.get(6)?,
        deleted: row.get(7)?,
    })
}

pub(super) fn item_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status_id: row.get(3)?,
        created: row.get(4)?,
        updated: row.get(5)?,
        deleted: row.get(6)?,
    })
}

pub(super) fn note_row(row: &Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        note_text: row.get(1)?,
        item_id: row.get(2)?,
        created: row.get(3)?,
        updated: row.get(4)?,
        deleted: row.get(5)?,
    })
}

pub(super) fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        email_address: row.get(5)?,
        avatar_url: row.get(6)?,
        last_login: row.get(7)?,
        created: row.get(8)?,
        updated: row.get(9)?,
        deleted: row.get(10)?,
    })
}
