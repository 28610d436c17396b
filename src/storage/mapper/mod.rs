//! Domain to storage mapping.
//!
//! Every engine goes through this module on the way in and out:
//!
//! - free text is HTML-escaped when written and unescaped when read
//! - status kinds are stored by symbolic name (`STATUS_KIND_UP`)
//! - instants are stored as epoch nanoseconds, `0` meaning absent
//! - updates become a [`ColumnDiff`] that both engines apply the same way

pub mod diff;
pub mod escape;
mod item;
mod note;
mod status;
pub mod timestamps;
mod user;

pub use diff::{ApplyDiff, Column, ColumnDiff, ColumnValue, ItemDiff, note_diff, status_diff, user_diff};
pub use escape::{escape_html, unescape_html};
pub use item::ItemRow;
pub use note::NoteRow;
pub use status::StatusRow;
pub use user::UserRow;

use crate::{Error, Result};

fn require_id(field: &'static str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::EmptyString { field });
    }
    Ok(())
}

fn require_text(field: &'static str, text: &str) -> Result<()> {
    require_id(field, text)
}

fn escape_opt(s: Option<&str>) -> Option<String> {
    s.map(escape_html)
}

fn unescape_opt(s: Option<&str>) -> Option<String> {
    s.map(unescape_html)
}
