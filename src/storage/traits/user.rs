//! User store trait.

use crate::Result;
use crate::filters::{QuerySpec, UpdateSpec};
use crate::models::User;
use crate::storage::OpContext;

/// Store, look up, and change users. Users are addressed by username.
pub trait UserStore: Send + Sync {
    /// Inserts a new user and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyExists`] when the id or username is taken.
    fn store_user(&self, ctx: &OpContext, user: User) -> Result<User>;

    /// Fetches a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no user has that username.
    fn get_user(&self, ctx: &OpContext, username: &str) -> Result<User>;

    /// Returns every user matching `query` (names match usernames), ordered
    /// by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn find_users(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<User>>;

    /// Applies the user-relevant fields of `update`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::AtLeastOne`] when `update` has nothing for users
    /// - [`crate::Error::NotFound`] when the user is missing
    fn update_user(&self, ctx: &OpContext, username: &str, update: &UpdateSpec) -> Result<()>;

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no user has that username.
    fn delete_user(&self, ctx: &OpContext, username: &str) -> Result<()>;
}
