//! Options for partial updates.
//!
//! Each store applies only the fields that belong to the entity being
//! updated; an update that carries none of them fails with `AtLeastOne`.
//!
//! | Entity | Fields honored |
//! |--------|----------------|
//! | Item | name, description, status |
//! | Status | name, description, color, kind |
//! | Note | note text, timestamps |
//! | User | first/last name, email, avatar, password hash, last login |

use super::{Slot, Spec, SpecOption, string_option};
use crate::Error;
use crate::models::{Status, StatusId, StatusKind, StatusRef, Timestamps};
use chrono::{DateTime, Utc};

/// Fields a caller may change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFields {
    name: Slot<String>,
    description: Slot<String>,
    color: Slot<String>,
    kind: Slot<StatusKind>,
    status: Slot<StatusRef>,
    note_text: Slot<String>,
    timestamps: Slot<Timestamps>,
    first_name: Slot<String>,
    last_name: Slot<String>,
    email_address: Slot<String>,
    avatar_url: Slot<String>,
    password_hash: Slot<String>,
    last_login: Slot<DateTime<Utc>>,
}

/// Validated update request.
pub type UpdateSpec = Spec<UpdateFields>;

/// A single update option.
pub type UpdateOption = SpecOption<UpdateFields>;

/// Renames an item or status.
pub fn with_name(name: impl Into<String>) -> UpdateOption {
    string_option("name", name, |f: &mut UpdateFields| &mut f.name)
}

/// Changes the description of an item or status.
pub fn with_description(description: impl Into<String>) -> UpdateOption {
    string_option("description", description, |f: &mut UpdateFields| {
        &mut f.description
    })
}

/// Changes a status color.
pub fn with_color(color: impl Into<String>) -> UpdateOption {
    string_option("color", color, |f: &mut UpdateFields| &mut f.color)
}

/// Changes a status kind.
pub fn with_kind(kind: StatusKind) -> UpdateOption {
    if kind.is_unknown() {
        return SpecOption::fail(Error::EmptyEnum {
            field: "status_kind",
        });
    }
    SpecOption::new(move |f: &mut UpdateFields| f.kind.set("status_kind", kind))
}

/// Points an item at an existing status.
///
/// Mutually exclusive with [`with_status`].
pub fn with_status_id(id: impl Into<StatusId>) -> UpdateOption {
    let id = id.into();
    if id.is_empty() {
        return SpecOption::fail(Error::EmptyString { field: "status_id" });
    }
    SpecOption::new(move |f: &mut UpdateFields| f.status.set("status", StatusRef::ById(id)))
}

/// Points an item at an embedded status, creating it if it has no id.
///
/// Mutually exclusive with [`with_status_id`].
pub fn with_status(status: Status) -> UpdateOption {
    if status.id.is_empty() && status.name.trim().is_empty() {
        return SpecOption::fail(Error::EmptyString {
            field: "status.name",
        });
    }
    if status.id.is_empty() && status.kind.is_unknown() {
        return SpecOption::fail(Error::EmptyEnum {
            field: "status.kind",
        });
    }
    SpecOption::new(move |f: &mut UpdateFields| {
        f.status.set("status", StatusRef::Embedded(status))
    })
}

/// Replaces a note's text.
pub fn with_note_text(text: impl Into<String>) -> UpdateOption {
    string_option("note_text", text, |f: &mut UpdateFields| &mut f.note_text)
}

/// Overrides a note's timestamps instead of bumping `updated`.
pub fn with_timestamps(timestamps: Timestamps) -> UpdateOption {
    if timestamps.is_unset() {
        return SpecOption::fail(Error::NilValue {
            field: "timestamps",
        });
    }
    SpecOption::new(move |f: &mut UpdateFields| f.timestamps.set("timestamps", timestamps))
}

/// Changes a user's given name.
pub fn with_first_name(name: impl Into<String>) -> UpdateOption {
    string_option("first_name", name, |f: &mut UpdateFields| &mut f.first_name)
}

/// Changes a user's family name.
pub fn with_last_name(name: impl Into<String>) -> UpdateOption {
    string_option("last_name", name, |f: &mut UpdateFields| &mut f.last_name)
}

/// Changes a user's email address.
pub fn with_email_address(email: impl Into<String>) -> UpdateOption {
    string_option("email_address", email, |f: &mut UpdateFields| {
        &mut f.email_address
    })
}

/// Changes a user's avatar location.
pub fn with_avatar_url(url: impl Into<String>) -> UpdateOption {
    string_option("avatar_url", url, |f: &mut UpdateFields| &mut f.avatar_url)
}

/// Replaces a user's password hash.
pub fn with_password_hash(hash: impl Into<String>) -> UpdateOption {
    string_option("password", hash, |f: &mut UpdateFields| &mut f.password_hash)
}

/// Records a user's last sign-in.
pub fn with_last_login(at: DateTime<Utc>) -> UpdateOption {
    SpecOption::new(move |f: &mut UpdateFields| f.last_login.set("last_login", at))
}

impl UpdateSpec {
    /// New name.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.read(|f| f.name.cloned())
    }

    /// New description.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.read(|f| f.description.cloned())
    }

    /// New status color.
    #[must_use]
    pub fn color(&self) -> Option<String> {
        self.read(|f| f.color.cloned())
    }

    /// New status kind.
    #[must_use]
    pub fn kind(&self) -> Option<StatusKind> {
        self.read(|f| f.kind.cloned())
    }

    /// New status reference for an item.
    #[must_use]
    pub fn status(&self) -> Option<StatusRef> {
        self.read(|f| f.status.cloned())
    }

    /// New note text.
    #[must_use]
    pub fn note_text(&self) -> Option<String> {
        self.read(|f| f.note_text.cloned())
    }

    /// Timestamp override.
    #[must_use]
    pub fn timestamps(&self) -> Option<Timestamps> {
        self.read(|f| f.timestamps.cloned())
    }

    /// New given name.
    #[must_use]
    pub fn first_name(&self) -> Option<String> {
        self.read(|f| f.first_name.cloned())
    }

    /// New family name.
    #[must_use]
    pub fn last_name(&self) -> Option<String> {
        self.read(|f| f.last_name.cloned())
    }

    /// New email address.
    #[must_use]
    pub fn email_address(&self) -> Option<String> {
        self.read(|f| f.email_address.cloned())
    }

    /// New avatar location.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        self.read(|f| f.avatar_url.cloned())
    }

    /// New password hash.
    #[must_use]
    pub fn password_hash(&self) -> Option<String> {
        self.read(|f| f.password_hash.cloned())
    }

    /// New last sign-in.
    #[must_use]
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.read(|f| f.last_login.cloned())
    }

    /// Returns true when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(|f| *f == UpdateFields::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update() {
        let spec = UpdateSpec::build([]).unwrap();
        assert!(spec.is_empty());
        assert!(spec.name().is_none());
    }

    #[test]
    fn test_kind_validation() {
        let err = UpdateSpec::build([with_kind(StatusKind::Unknown)]).unwrap_err();
        assert!(matches!(err, Error::EmptyEnum { field: "status_kind" }));

        let err = UpdateSpec::build([with_kind(StatusKind::Up), with_kind(StatusKind::Down)])
            .unwrap_err();
        assert!(matches!(err, Error::AlreadySet { field: "status_kind" }));
    }

    #[test]
    fn test_timestamps_require_a_value() {
        let err = UpdateSpec::build([with_timestamps(Timestamps::default())]).unwrap_err();
        assert!(matches!(err, Error::NilValue { field: "timestamps" }));

        let ts = Timestamps::now();
        let spec = UpdateSpec::build([with_timestamps(ts)]).unwrap();
        assert_eq!(spec.timestamps(), Some(ts));
    }

    #[test]
    fn test_status_forms_are_exclusive() {
        let err = UpdateSpec::build([
            with_status(Status::new("UP", StatusKind::Up)),
            with_status_id("s1"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::AlreadySet { field: "status" }));
    }

    #[test]
    fn test_embedded_status_with_id_skips_name_check() {
        let status = Status::new("", StatusKind::Unknown).with_id("s1");
        let spec = UpdateSpec::build([with_status(status)]).unwrap();
        assert_eq!(
            spec.status().and_then(|s| s.id().cloned()),
            Some(StatusId::new("s1"))
        );
    }

    #[test]
    fn test_user_fields() {
        let now = Utc::now();
        let spec = UpdateSpec::build([
            with_first_name("Ada"),
            with_email_address("ada@example.com"),
            with_password_hash("$argon2id$hash"),
            with_last_login(now),
        ])
        .unwrap();
        assert_eq!(spec.first_name().as_deref(), Some("Ada"));
        assert_eq!(spec.email_address().as_deref(), Some("ada@example.com"));
        assert_eq!(spec.password_hash().as_deref(), Some("$argon2id$hash"));
        assert_eq!(spec.last_login(), Some(now));
        assert!(!spec.is_empty());
    }
}
