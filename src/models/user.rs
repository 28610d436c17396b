//! Users and their credentials.

use super::{Timestamps, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account that can sign in.
///
/// The store keeps `password_hash` as given; hashing is the caller's job
/// (see [`BoardService::add_user`](crate::services::BoardService::add_user)).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id; empty until the store assigns one.
    pub id: UserId,
    /// Unique login name; the store's key for users.
    pub username: String,
    /// PHC-format password hash.
    pub password_hash: String,
    /// Optional given name.
    pub first_name: Option<String>,
    /// Optional family name.
    pub last_name: Option<String>,
    /// Optional email address.
    pub email_address: Option<String>,
    /// Optional avatar location.
    pub avatar_url: Option<String>,
    /// Last successful sign-in.
    pub last_login: Option<DateTime<Utc>>,
    /// Lifecycle timestamps.
    pub timestamps: Timestamps,
}

impl User {
    /// Creates a user with the given login name and password hash.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: UserId::default(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: None,
            last_name: None,
            email_address: None,
            avatar_url: None,
            last_login: None,
            timestamps: Timestamps::default(),
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email_address(mut self, email: impl Into<String>) -> Self {
        self.email_address = Some(email.into());
        self
    }
}

// Keeps password hashes out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("avatar_url", &self.avatar_url)
            .field("last_login", &self.last_login)
            .field("timestamps", &self.timestamps)
            .finish()
    }
}
