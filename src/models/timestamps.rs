//! Timestamps carried by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Created/updated/deleted instants.
///
/// `deleted` exists for schema compatibility only; deletion is physical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// When the record was created.
    pub created: Option<DateTime<Utc>>,
    /// When the record last changed.
    pub updated: Option<DateTime<Utc>>,
    /// When the record was marked deleted.
    pub deleted: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Returns timestamps with created and updated both set to `at`.
    #[must_use]
    pub const fn at(at: DateTime<Utc>) -> Self {
        Self {
            created: Some(at),
            updated: Some(at),
            deleted: None,
        }
    }

    /// Returns timestamps with created and updated set to the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Returns true when neither created nor updated is set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.created.is_none() && self.updated.is_none()
    }

    /// Fills in missing created/updated values with `now`.
    ///
    /// An unset `updated` takes the value of `created` when that is present.
    pub fn fill_missing(&mut self, now: DateTime<Utc>) {
        let created = *self.created.get_or_insert(now);
        if self.updated.is_none() {
            self.updated = Some(created.max(now));
        }
    }
}
