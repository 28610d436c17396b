//! User rows.

use super::diff::{ApplyDiff, Column, ColumnDiff, integer_value, optional_text, text_value, wrong_column};
use super::escape::{escape_html, unescape_html};
use super::timestamps::{EncodedTimestamps, decode_optional, encode_optional};
use super::{escape_opt, require_id, require_text, unescape_opt};
use crate::models::{User, UserId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "user";

/// Flat, storage-ready user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    /// Primary key.
    pub id: String,
    /// Unique login name, stored as given.
    pub username: String,
    /// PHC-format password hash.
    pub password: String,
    /// Escaped given name.
    pub first_name: Option<String>,
    /// Escaped family name.
    pub last_name: Option<String>,
    /// Email address.
    pub email_address: Option<String>,
    /// Avatar location.
    pub avatar_url: Option<String>,
    /// Last sign-in, epoch nanoseconds.
    pub last_login: Option<i64>,
    /// Creation instant, epoch nanoseconds.
    pub created: i64,
    /// Last-update instant, epoch nanoseconds.
    pub updated: i64,
    /// Deletion instant, epoch nanoseconds.
    pub deleted: Option<i64>,
}

impl UserRow {
    /// Validates a domain user and flattens it.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyString`] for an empty id or username
    /// - [`Error::MissingCredentials`] for an empty password hash
    /// - [`Error::MissingTimestamp`] for unset created/updated
    pub fn from_domain(user: &User) -> Result<Self> {
        require_id("user.id", user.id.as_str())?;
        require_text("user.username", &user.username)?;
        if user.password_hash.is_empty() {
            return Err(Error::MissingCredentials {
                field: "user.password",
            });
        }
        let ts = EncodedTimestamps::encode(&user.timestamps)?;
        Ok(Self {
            id: user.id.as_str().to_string(),
            username: user.username.clone(),
            password: user.password_hash.clone(),
            first_name: escape_opt(user.first_name.as_deref()),
            last_name: escape_opt(user.last_name.as_deref()),
            email_address: user.email_address.clone(),
            avatar_url: user.avatar_url.clone(),
            last_login: encode_optional("last_login", user.last_login)?,
            created: ts.created,
            updated: ts.updated,
            deleted: ts.deleted,
        })
    }

    /// Rebuilds the domain user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the timestamps are missing.
    pub fn to_domain(&self) -> Result<User> {
        let timestamps = EncodedTimestamps {
            created: self.created,
            updated: self.updated,
            deleted: self.deleted,
        }
        .decode(ENTITY)?;
        Ok(User {
            id: UserId::new(self.id.clone()),
            username: self.username.clone(),
            password_hash: self.password.clone(),
            first_name: unescape_opt(self.first_name.as_deref()),
            last_name: unescape_opt(self.last_name.as_deref()),
            email_address: self.email_address.clone(),
            avatar_url: self.avatar_url.clone(),
            last_login: decode_optional(self.last_login),
            timestamps,
        })
    }
}

impl std::fmt::Debug for UserRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApplyDiff for UserRow {
    fn apply(&mut self, diff: &ColumnDiff) -> Result<()> {
        for (column, value) in diff.iter() {
            match column {
                Column::FirstName => self.first_name = optional_text(value),
                Column::LastName => self.last_name = optional_text(value),
                Column::EmailAddress => self.email_address = optional_text(value),
                Column::AvatarUrl => self.avatar_url = optional_text(value),
                Column::Password => self.password = text_value(ENTITY, *column, value)?,
                Column::LastLogin => {
                    self.last_login = Some(integer_value(ENTITY, *column, value)?);
                },
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
    use crate::models::Timestamps;

    fn user() -> User {
        let mut user = User::new("alice", "$argon2id$v=19$stub").with_email_address("a@example.com");
        user.id = UserId::new("u1");
        user.first_name = Some("Al & Ice".to_string());
        user.timestamps = Timestamps::now();
        user
    }

    #[test]
    fn test_roundtrip_escapes_names() {
        let user = user();
        let row = UserRow::from_domain(&user).unwrap();
        assert_eq!(row.first_name.as_deref(), Some("Al &amp; Ice"));
        assert_eq!(row.to_domain().unwrap(), user);
    }

    #[test]
    fn test_password_required() {
        let mut user = user();
        user.password_hash.clear();
        assert_eq!(
            UserRow::from_domain(&user).unwrap_err().kind(),
            ErrorKind::MissingCredentials
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let row = UserRow::from_domain(&user()).unwrap();
        assert!(!format!("{row:?}").contains("argon2"));
    }
}
