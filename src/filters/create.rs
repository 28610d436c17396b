//! Options for creating records through the service layer.

use super::{Slot, Spec, SpecOption, string_option};
use crate::Error;
use crate::models::{Status, StatusId, StatusRef};
use chrono::{DateTime, Utc};

/// Fields a caller may supply when creating a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateFields {
    id: Slot<String>,
    description: Slot<String>,
    color: Slot<String>,
    status: Slot<StatusRef>,
    note_text: Slot<String>,
    first_name: Slot<String>,
    last_name: Slot<String>,
    avatar_url: Slot<String>,
    last_login: Slot<DateTime<Utc>>,
}

/// Validated creation request.
pub type CreateSpec = Spec<CreateFields>;

/// A single creation option.
pub type CreateOption = SpecOption<CreateFields>;

/// Uses a caller-chosen id instead of a generated one.
pub fn with_id(id: impl Into<String>) -> CreateOption {
    string_option("id", id, |f: &mut CreateFields| &mut f.id)
}

/// Sets the description.
pub fn with_description(description: impl Into<String>) -> CreateOption {
    string_option("description", description, |f: &mut CreateFields| {
        &mut f.description
    })
}

/// Sets the color of a new status.
pub fn with_color(color: impl Into<String>) -> CreateOption {
    string_option("color", color, |f: &mut CreateFields| &mut f.color)
}

/// Links a new item to an existing status.
///
/// Mutually exclusive with [`with_status`].
pub fn with_status_id(id: impl Into<StatusId>) -> CreateOption {
    let id = id.into();
    if id.is_empty() {
        return SpecOption::fail(Error::EmptyString { field: "status_id" });
    }
    SpecOption::new(move |f: &mut CreateFields| f.status.set("status", StatusRef::ById(id)))
}

/// Creates a new item together with a new status.
///
/// Mutually exclusive with [`with_status_id`].
pub fn with_status(status: Status) -> CreateOption {
    if status.name.trim().is_empty() {
        return SpecOption::fail(Error::EmptyString {
            field: "status.name",
        });
    }
    if status.kind.is_unknown() {
        return SpecOption::fail(Error::EmptyEnum {
            field: "status.kind",
        });
    }
    SpecOption::new(move |f: &mut CreateFields| f.status.set("status", StatusRef::Embedded(status)))
}

/// Adds an initial note to a new item.
pub fn with_note_text(text: impl Into<String>) -> CreateOption {
    string_option("note_text", text, |f: &mut CreateFields| &mut f.note_text)
}

/// Sets a new user's given name.
pub fn with_first_name(name: impl Into<String>) -> CreateOption {
    string_option("first_name", name, |f: &mut CreateFields| &mut f.first_name)
}

/// Sets a new user's family name.
pub fn with_last_name(name: impl Into<String>) -> CreateOption {
    string_option("last_name", name, |f: &mut CreateFields| &mut f.last_name)
}

/// Sets a new user's avatar location.
pub fn with_avatar_url(url: impl Into<String>) -> CreateOption {
    string_option("avatar_url", url, |f: &mut CreateFields| &mut f.avatar_url)
}

/// Records a last sign-in for a new user.
pub fn with_last_login(at: DateTime<Utc>) -> CreateOption {
    SpecOption::new(move |f: &mut CreateFields| f.last_login.set("last_login", at))
}

impl CreateSpec {
    /// Caller-chosen id.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.read(|f| f.id.cloned())
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.read(|f| f.description.cloned())
    }

    /// Status color.
    #[must_use]
    pub fn color(&self) -> Option<String> {
        self.read(|f| f.color.cloned())
    }

    /// Status reference for a new item.
    #[must_use]
    pub fn status(&self) -> Option<StatusRef> {
        self.read(|f| f.status.cloned())
    }

    /// Initial note text.
    #[must_use]
    pub fn note_text(&self) -> Option<String> {
        self.read(|f| f.note_text.cloned())
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> Option<String> {
        self.read(|f| f.first_name.cloned())
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> Option<String> {
        self.read(|f| f.last_name.cloned())
    }

    /// Avatar location.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        self.read(|f| f.avatar_url.cloned())
    }

    /// Last sign-in.
    #[must_use]
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.read(|f| f.last_login.cloned())
    }
}
