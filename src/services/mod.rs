//! Business logic services.
//!
//! [`BoardService`] sits on top of any [`BoardStore`] and turns caller
//! intent (a name plus creation options) into complete records: generated
//! ids, fresh timestamps, hashed passwords, optional default statuses.

mod password;

pub use password::{hash_password, verify_password};

use crate::filters::{CreateSpec, QuerySpec, UpdateSpec, update};
use crate::models::{Item, ItemId, Note, NoteId, Status, StatusId, StatusKind, Timestamps, User, UserId};
use crate::storage::{BoardStore, OpContext, seed_default_statuses};
use crate::{Error, Result};
use chrono::Utc;
use secrecy::SecretString;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::instrument;

/// Backend-agnostic operations over items, statuses, notes, and users.
pub struct BoardService {
    store: Arc<dyn BoardStore>,
    created_defaults: RwLock<Vec<Status>>,
}

impl std::fmt::Debug for BoardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardService")
            .field("backend", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::EmptyString { field });
    }
    Ok(())
}

impl BoardService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self {
            store,
            created_defaults: RwLock::new(Vec::new()),
        }
    }

    /// Creates a service and seeds the default statuses into an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if existing statuses cannot be listed.
    pub fn with_defaults(store: Arc<dyn BoardStore>, ctx: &OpContext) -> Result<Self> {
        let service = Self::new(store);
        service.seed_defaults(ctx)?;
        Ok(service)
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn BoardStore> {
        &self.store
    }

    /// Stores the default statuses if the store has none, remembering the
    /// ones created.
    ///
    /// # Errors
    ///
    /// Returns an error if existing statuses cannot be listed.
    pub fn seed_defaults(&self, ctx: &OpContext) -> Result<Vec<Status>> {
        let created = seed_default_statuses(self.store.as_ref(), ctx)?;
        self.created_defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(created.iter().cloned());
        Ok(created)
    }

    /// Default statuses this service created.
    #[must_use]
    pub fn created_defaults(&self) -> Vec<Status> {
        self.created_defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Creates an item.
    ///
    /// Honors `id`, `description`, a status (by id, which must exist, or
    /// embedded, which is created) and `note_text` for an initial note,
    /// all stored in one transaction.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyString`] for a blank name
    /// - [`Error::NotFound`] for an unknown status id
    /// - [`Error::AlreadyExists`] for a taken id or name
    #[instrument(skip(self, ctx, spec), fields(name = %name))]
    pub fn new_item(&self, ctx: &OpContext, name: &str, spec: &CreateSpec) -> Result<Item> {
        require("name", name)?;
        let mut item = Item::new(name);
        if let Some(id) = spec.id() {
            item.id = ItemId::new(id);
        }
        item.description = spec.description();
        item.status = spec.status();
        if let Some(text) = spec.note_text() {
            item.notes.push(Note::new(text));
        }
        self.store.store_item(ctx, item)
    }

    /// Fetches an item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or [`Error::NotFound`].
    pub fn get_item(&self, ctx: &OpContext, id: &ItemId) -> Result<Item> {
        require("item_id", id.as_str())?;
        self.store.get_item(ctx, id)
    }

    /// Lists items matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn find_items(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Item>> {
        self.store.find_items(ctx, query)
    }

    /// Changes an item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id, or whatever the store
    /// reports.
    #[instrument(skip(self, ctx, update))]
    pub fn edit_item(&self, ctx: &OpContext, id: &ItemId, update: &UpdateSpec) -> Result<()> {
        require("item_id", id.as_str())?;
        self.store.update_item(ctx, id, update)
    }

    /// Removes an item and its notes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or [`Error::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn remove_item(&self, ctx: &OpContext, id: &ItemId) -> Result<()> {
        require("item_id", id.as_str())?;
        self.store.delete_item(ctx, id)
    }

    /// Creates a status, honoring `id`, `description` and `color`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyString`] for a blank name
    /// - [`Error::EmptyEnum`] for [`StatusKind::Unknown`]
    #[instrument(skip(self, ctx, spec), fields(name = %name))]
    pub fn new_status(
        &self,
        ctx: &OpContext,
        name: &str,
        kind: StatusKind,
        spec: &CreateSpec,
    ) -> Result<Status> {
        require("name", name)?;
        if kind.is_unknown() {
            return Err(Error::EmptyEnum { field: "kind" });
        }
        let mut status = Status::new(name, kind);
        if let Some(id) = spec.id() {
            status.id = StatusId::new(id);
        }
        status.description = spec.description();
        status.color = spec.color();
        self.store.store_status(ctx, status)
    }

    /// Fetches a status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or [`Error::NotFound`].
    pub fn get_status(&self, ctx: &OpContext, id: &StatusId) -> Result<Status> {
        require("status_id", id.as_str())?;
        self.store.get_status(ctx, id)
    }

    /// Lists statuses matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn find_statuses(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<Status>> {
        self.store.find_statuses(ctx, query)
    }

    /// Changes a status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id, or whatever the store
    /// reports.
    #[instrument(skip(self, ctx, update))]
    pub fn edit_status(&self, ctx: &OpContext, id: &StatusId, update: &UpdateSpec) -> Result<()> {
        require("status_id", id.as_str())?;
        self.store.update_status(ctx, id, update)
    }

    /// Removes a status no item references.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InUse`] while items still reference it.
    #[instrument(skip(self, ctx))]
    pub fn remove_status(&self, ctx: &OpContext, id: &StatusId) -> Result<()> {
        require("status_id", id.as_str())?;
        self.store.delete_status(ctx, id)
    }

    /// Adds a note to an item, honoring `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or text, or
    /// [`Error::NotFound`] for an unknown item.
    #[instrument(skip(self, ctx, text, spec))]
    pub fn add_note(&self, ctx: &OpContext, item_id: &ItemId, text: &str, spec: &CreateSpec) -> Result<Note> {
        require("item_id", item_id.as_str())?;
        require("note_text", text)?;
        let mut note = Note::new(text);
        if let Some(id) = spec.id() {
            note.id = NoteId::new(id);
        }
        self.store.store_note(ctx, note, item_id)
    }

    /// Fetches a note.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or [`Error::NotFound`].
    pub fn get_note(&self, ctx: &OpContext, id: &NoteId) -> Result<Note> {
        require("note_id", id.as_str())?;
        self.store.get_note(ctx, id)
    }

    /// Lists every note of an item, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown item.
    pub fn notes_for(&self, ctx: &OpContext, item_id: &ItemId) -> Result<Vec<Note>> {
        require("item_id", item_id.as_str())?;
        self.store.find_notes(ctx, item_id, &QuerySpec::all())
    }

    /// Replaces a note's text, optionally overriding its timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or text, or
    /// [`Error::NotFound`].
    #[instrument(skip(self, ctx, text))]
    pub fn edit_note(
        &self,
        ctx: &OpContext,
        id: &NoteId,
        text: &str,
        timestamps: Option<Timestamps>,
    ) -> Result<()> {
        require("note_id", id.as_str())?;
        require("note_text", text)?;
        let mut options = vec![update::with_note_text(text)];
        if let Some(ts) = timestamps {
            options.push(update::with_timestamps(ts));
        }
        let spec = UpdateSpec::build(options)?;
        self.store.update_note(ctx, id, &spec)
    }

    /// Removes a note.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank id or [`Error::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn remove_note(&self, ctx: &OpContext, id: &NoteId) -> Result<()> {
        require("note_id", id.as_str())?;
        self.store.delete_note(ctx, id)
    }

    /// Registers a user, hashing `password` with argon2.
    ///
    /// Honors `id`, `first_name`, `last_name`, `avatar_url` and
    /// `last_login`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyString`] for a blank username, password or email
    /// - [`Error::AlreadyExists`] for a taken username
    #[instrument(skip(self, ctx, password, email_address, spec), fields(username = %username))]
    pub fn add_user(
        &self,
        ctx: &OpContext,
        username: &str,
        password: &SecretString,
        email_address: &str,
        spec: &CreateSpec,
    ) -> Result<User> {
        require("username", username)?;
        require("email_address", email_address)?;
        let hash = hash_password(password)?;

        let mut user = User::new(username, hash).with_email_address(email_address);
        if let Some(id) = spec.id() {
            user.id = UserId::new(id);
        }
        user.first_name = spec.first_name();
        user.last_name = spec.last_name();
        user.avatar_url = spec.avatar_url();
        user.last_login = spec.last_login();
        self.store.store_user(ctx, user)
    }

    /// Fetches a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank username or
    /// [`Error::NotFound`].
    pub fn get_user(&self, ctx: &OpContext, username: &str) -> Result<User> {
        require("username", username)?;
        self.store.get_user(ctx, username)
    }

    /// Lists users matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn find_users(&self, ctx: &OpContext, query: &QuerySpec) -> Result<Vec<User>> {
        self.store.find_users(ctx, query)
    }

    /// Verifies a password and records the sign-in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if the password does not match,
    /// or [`Error::NotFound`] for an unknown user.
    #[instrument(skip(self, ctx, password))]
    pub fn check_password(&self, ctx: &OpContext, username: &str, password: &SecretString) -> Result<User> {
        require("username", username)?;
        let mut user = self.store.get_user(ctx, username)?;
        verify_password(password, &user.password_hash)?;

        let now = Utc::now();
        let spec = UpdateSpec::build([update::with_last_login(now)])?;
        self.store.update_user(ctx, username, &spec)?;
        user.last_login = Some(now);
        Ok(user)
    }

    /// Replaces a user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if `current` does not match.
    #[instrument(skip(self, ctx, current, new))]
    pub fn change_password(
        &self,
        ctx: &OpContext,
        username: &str,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<()> {
        require("username", username)?;
        let user = self.store.get_user(ctx, username)?;
        verify_password(current, &user.password_hash)?;
        let hash = hash_password(new)?;
        let spec = UpdateSpec::build([update::with_password_hash(hash)])?;
        self.store.update_user(ctx, username, &spec)
    }

    /// Changes a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank username, or whatever the
    /// store reports.
    #[instrument(skip(self, ctx, update))]
    pub fn edit_user(&self, ctx: &OpContext, username: &str, update: &UpdateSpec) -> Result<()> {
        require("username", username)?;
        self.store.update_user(ctx, username, update)
    }

    /// Removes a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyString`] for a blank username or
    /// [`Error::NotFound`].
    #[instrument(skip(self, ctx))]
    pub fn remove_user(&self, ctx: &OpContext, username: &str) -> Result<()> {
        require("username", username)?;
        self.store.delete_user(ctx, username)
    }
}
