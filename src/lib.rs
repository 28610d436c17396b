//! # Statusboard
//!
//! Storage layer for tracking monitored items, their statuses, and notes.
//!
//! Items carry an optional [`Status`] (a named, colored, kind-tagged state) and
//! a list of free-text [`Note`]s. Users and credentials live alongside them.
//! All of it sits behind one storage contract ([`storage::BoardStore`]) with
//! two interchangeable engines:
//!
//! - [`storage::MemDbStore`]: a transactional in-process store built on `redb`
//! - [`storage::SqliteStore`]: a relational store built on `SQLite`
//!
//! Callers describe what to create, change, or match with the validated
//! request types in [`filters`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use statusboard::filters::{QuerySpec, query};
//! use statusboard::models::{Item, Status, StatusKind};
//! use statusboard::storage::{ItemStore, MemDbStore, OpContext, StatusStore};
//!
//! let store = MemDbStore::new()?;
//! let ctx = OpContext::background();
//! let up = store.store_status(&ctx, Status::new("UP", StatusKind::Available))?;
//! store.store_item(&ctx, Item::new("svc-a").with_status_id(up.id.clone()))?;
//!
//! let query = QuerySpec::build([query::with_status_kinds([StatusKind::Available])])?;
//! let items = store.find_items(&ctx, &query)?;
//! assert_eq!(items.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod filters;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::BoardConfig;
pub use filters::{CreateSpec, QuerySpec, UpdateSpec};
pub use models::{Item, ItemId, Note, NoteId, Status, StatusId, StatusKind, StatusRef, User};
pub use services::BoardService;
pub use storage::{BoardStore, OpContext};

/// Error type for statusboard operations.
///
/// Every engine maps its driver failures onto these variants, so callers can
/// branch on [`Error::kind`] without knowing which backend is active.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `EmptyString` | A required string is empty or whitespace |
/// | `NilValue` | A required value carries no data |
/// | `EmptyEnum` | A status kind is `Unknown` |
/// | `AlreadySet` | The same request field is supplied twice |
/// | `AtLeastOne` | An update or list option carries nothing |
/// | `NotFound` | The addressed record (or a referenced one) does not exist |
/// | `AlreadyExists` | A unique id, name, or username is taken |
/// | `InUse` | Deleting a status that items still reference |
/// | `InvalidData` | A stored row fails to decode into a domain record |
/// | `MissingTimestamp` | `created` or `updated` is unset or unrepresentable |
/// | `StoreUnavailable` | The backend cannot be opened or is busy |
/// | `UnexpectedRows` | A delete touched a row count other than one |
/// | `Unrecoverable` | Any other low-level driver failure |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required string was empty.
    ///
    /// Raised when:
    /// - A request option receives an empty or whitespace-only string
    /// - A record reaching the mapper has an empty id, name, or note text
    #[error("{field}: value cannot be empty")]
    EmptyString {
        /// The offending field.
        field: &'static str,
    },

    /// A required value carried no data.
    #[error("{field}: value cannot be nil")]
    NilValue {
        /// The offending field.
        field: &'static str,
    },

    /// A status kind was the `Unknown` sentinel.
    #[error("{field}: enum value cannot be unknown")]
    EmptyEnum {
        /// The offending field.
        field: &'static str,
    },

    /// A request field was supplied more than once.
    ///
    /// Raised when:
    /// - The same option appears twice in a request
    /// - A status is given both by id and as an embedded record
    #[error("{field}: value already set")]
    AlreadySet {
        /// The offending field.
        field: &'static str,
    },

    /// At least one value was required.
    ///
    /// Raised when:
    /// - An update carries no field the target entity understands
    /// - A list option receives an empty list
    #[error("{field}: at least one value is required")]
    AtLeastOne {
        /// The offending field.
        field: &'static str,
    },

    /// A record was not found.
    ///
    /// Raised when:
    /// - Get, Update, or Delete addresses a missing id
    /// - A status id referenced by an item does not exist
    /// - A note is stored for an item that does not exist
    #[error("{entity} '{id}': not found")]
    NotFound {
        /// The entity type that was looked up.
        entity: &'static str,
        /// The id or key that was looked up.
        id: String,
    },

    /// A unique key is already taken.
    #[error("{entity}: already exists ({detail})")]
    AlreadyExists {
        /// The entity type being written.
        entity: &'static str,
        /// Which key collided.
        detail: String,
    },

    /// The record is still referenced and cannot be deleted.
    #[error("{entity} '{id}': in use")]
    InUse {
        /// The entity type being deleted.
        entity: &'static str,
        /// The id being deleted.
        id: String,
    },

    /// A record failed domain validation on its way in or out of storage.
    ///
    /// Raised when:
    /// - A stored row cannot be decoded
    /// - A stored status kind resolves to `Unknown`
    /// - A stored item references a status that is gone
    #[error("{entity}: invalid data: {reason}")]
    InvalidData {
        /// The entity type being decoded.
        entity: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A required timestamp was unset or cannot be encoded.
    #[error("{field}: missing or invalid timestamp")]
    MissingTimestamp {
        /// The offending timestamp field.
        field: &'static str,
    },

    /// The backend could not be reached.
    ///
    /// Raised when:
    /// - The database file cannot be opened
    /// - A transaction cannot be started
    /// - `SQLite` reports the database as busy or locked
    #[error("store unavailable during '{operation}': {cause}")]
    StoreUnavailable {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A statement affected an unexpected number of rows.
    #[error("'{operation}' affected {actual} rows, expected {expected}")]
    UnexpectedRows {
        /// The operation that failed.
        operation: String,
        /// Rows the statement should have touched.
        expected: usize,
        /// Rows the statement did touch.
        actual: usize,
    },

    /// A low-level driver failure.
    #[error("operation '{operation}' failed: {cause}")]
    Unrecoverable {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The store does not implement the operation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The operation context was cancelled.
    #[error("'{operation}' cancelled")]
    Cancelled {
        /// The operation that observed the cancellation.
        operation: String,
    },

    /// The operation context deadline passed.
    #[error("'{operation}' exceeded its deadline")]
    DeadlineExceeded {
        /// The operation that observed the deadline.
        operation: String,
    },

    /// Credentials were missing or did not verify.
    #[error("{field}: missing or invalid credentials")]
    MissingCredentials {
        /// The offending field.
        field: &'static str,
    },

    /// Invalid input outside of request validation (configuration, paths).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Stable, backend-independent classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::EmptyString`].
    EmptyString,
    /// See [`Error::NilValue`].
    NilValue,
    /// See [`Error::EmptyEnum`].
    EmptyEnum,
    /// See [`Error::AlreadySet`].
    AlreadySet,
    /// See [`Error::AtLeastOne`].
    AtLeastOne,
    /// See [`Error::NotFound`].
    NotFound,
    /// See [`Error::AlreadyExists`].
    AlreadyExists,
    /// See [`Error::InUse`].
    InUse,
    /// See [`Error::InvalidData`].
    InvalidData,
    /// See [`Error::MissingTimestamp`].
    MissingTimestamp,
    /// See [`Error::StoreUnavailable`].
    StoreUnavailable,
    /// See [`Error::UnexpectedRows`].
    UnexpectedRows,
    /// See [`Error::Unrecoverable`].
    Unrecoverable,
    /// See [`Error::NotImplemented`].
    NotImplemented,
    /// See [`Error::Cancelled`].
    Cancelled,
    /// See [`Error::DeadlineExceeded`].
    DeadlineExceeded,
    /// See [`Error::MissingCredentials`].
    MissingCredentials,
    /// See [`Error::InvalidInput`].
    InvalidInput,
}

impl Error {
    /// Returns the taxonomy tag for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyString { .. } => ErrorKind::EmptyString,
            Self::NilValue { .. } => ErrorKind::NilValue,
            Self::EmptyEnum { .. } => ErrorKind::EmptyEnum,
            Self::AlreadySet { .. } => ErrorKind::AlreadySet,
            Self::AtLeastOne { .. } => ErrorKind::AtLeastOne,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InUse { .. } => ErrorKind::InUse,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
            Self::MissingTimestamp { .. } => ErrorKind::MissingTimestamp,
            Self::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            Self::UnexpectedRows { .. } => ErrorKind::UnexpectedRows,
            Self::Unrecoverable { .. } => ErrorKind::Unrecoverable,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            Self::MissingCredentials { .. } => ErrorKind::MissingCredentials,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Returns true when the caller can correct the request and retry.
    ///
    /// Everything else should surface as an opaque internal error.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::EmptyString | ErrorKind::EmptyEnum
        )
    }

    /// Returns true for errors that indicate a bug or a broken environment.
    #[must_use]
    pub const fn is_severe(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidData | ErrorKind::Unrecoverable | ErrorKind::UnexpectedRows
        )
    }

    /// Builds a [`Error::NotFound`] for the given entity and key.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Result type alias for statusboard operations.
pub type Result<T> = std::result::Result<T, Error>;
