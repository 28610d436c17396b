//! Validated request types.
//!
//! Callers describe what to create, what to change, and what to match with
//! three purpose-named request types that share one building pattern:
//!
//! | Type | Options | Used by |
//! |------|---------|---------|
//! | [`CreateSpec`] | [`create`] | service constructors (`new_item`, `add_user`, ...) |
//! | [`UpdateSpec`] | [`update`] | `update_*` store operations |
//! | [`QuerySpec`] | [`query`] | `find_*` store operations |
//!
//! A request is built from an ordered list of option functions. Each option
//! validates its own argument and refuses to overwrite a field that is
//! already set, so the first invalid or repeated option aborts the build and
//! nothing partially built escapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use statusboard::filters::{UpdateSpec, update};
//!
//! let spec = UpdateSpec::build([
//!     update::with_name("svc-a"),
//!     update::with_description("primary API"),
//! ])?;
//! assert_eq!(spec.name().as_deref(), Some("svc-a"));
//!
//! // Repeating a field is rejected.
//! let err = UpdateSpec::build([update::with_name("a"), update::with_name("b")]);
//! assert!(err.is_err());
//! ```

pub mod create;
pub mod query;
pub mod update;

pub use create::{CreateFields, CreateOption, CreateSpec};
pub use query::{QueryFields, QueryOption, QuerySpec};
pub use update::{UpdateFields, UpdateOption, UpdateSpec};

use crate::{Error, Result};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// A single validated setter applied while a [`Spec`] is built.
pub struct SpecOption<F>(Box<dyn FnOnce(&mut F) -> Result<()> + Send>);

impl<F: 'static> SpecOption<F> {
    pub(crate) fn new(apply: impl FnOnce(&mut F) -> Result<()> + Send + 'static) -> Self {
        Self(Box::new(apply))
    }

    /// An option that fails the build with `err`.
    ///
    /// Options validate their arguments eagerly and defer the failure to the
    /// build so the first error in list order wins.
    pub(crate) fn fail(err: Error) -> Self {
        Self::new(move |_| Err(err))
    }
}

impl<F> fmt::Debug for SpecOption<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpecOption")
    }
}

/// An immutable-after-build set of validated fields.
///
/// Building takes the write lock once; every accessor takes the read lock,
/// so a built spec can be shared across threads freely.
pub struct Spec<F> {
    fields: RwLock<F>,
}

impl<F: Default> Spec<F> {
    /// Builds a spec by applying `options` in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an option: `EmptyString`,
    /// `NilValue`, `EmptyEnum`, `AlreadySet`, or `AtLeastOne`.
    pub fn build<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = SpecOption<F>>,
    {
        let spec = Self::default();
        {
            let mut fields = spec
                .fields
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for option in options {
                (option.0)(&mut *fields)?;
            }
        }
        Ok(spec)
    }
}

impl<F> Spec<F> {
    /// Runs `read` against the built fields under the read lock.
    pub(crate) fn read<T>(&self, read: impl FnOnce(&F) -> T) -> T {
        let fields = self.fields.read().unwrap_or_else(PoisonError::into_inner);
        read(&*fields)
    }
}

impl<F: Default> Default for Spec<F> {
    fn default() -> Self {
        Self {
            fields: RwLock::new(F::default()),
        }
    }
}

impl<F: Clone> Clone for Spec<F> {
    fn clone(&self) -> Self {
        Self {
            fields: RwLock::new(self.read(Clone::clone)),
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for Spec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|fields| f.debug_struct("Spec").field("fields", fields).finish())
    }
}

impl<F: PartialEq> PartialEq for Spec<F> {
    fn eq(&self, other: &Self) -> bool {
        self.read(|a| other.read(|b| a == b))
    }
}

/// A set-once field cell.
#[derive(Clone, PartialEq, Eq)]
pub struct Slot<T>(Option<T>);

impl<T> Slot<T> {
    /// Stores `value`, failing with `AlreadySet` if the slot is taken.
    pub(crate) fn set(&mut self, field: &'static str, value: T) -> Result<()> {
        if self.0.is_some() {
            return Err(Error::AlreadySet { field });
        }
        self.0 = Some(value);
        Ok(())
    }

    /// Returns the stored value.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Returns true when a value is stored.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl<T: Clone> Slot<T> {
    /// Returns a copy of the stored value.
    #[must_use]
    pub fn cloned(&self) -> Option<T> {
        self.0.clone()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Rejects empty or whitespace-only strings.
pub(crate) fn non_empty(field: &'static str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(Error::EmptyString { field });
    }
    Ok(value)
}

/// Builds an option that validates `value` and stores it with `store`.
pub(crate) fn string_option<F: 'static>(
    field: &'static str,
    value: impl Into<String>,
    store: fn(&mut F) -> &mut Slot<String>,
) -> SpecOption<F> {
    match non_empty(field, value) {
        Ok(value) => SpecOption::new(move |fields| store(fields).set(field, value)),
        Err(err) => SpecOption::fail(err),
    }
}
