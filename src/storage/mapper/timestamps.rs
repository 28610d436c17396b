//! Nanosecond-epoch timestamp encoding.
//!
//! `0` is the "absent" sentinel, so an instant exactly at the Unix epoch
//! cannot be stored. Instants outside the `i64` nanosecond range (roughly
//! 1677..2262) cannot be encoded either.

use crate::models::Timestamps;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Encodes a required instant.
///
/// # Errors
///
/// Returns [`Error::MissingTimestamp`] if the instant is unset, out of range,
/// or exactly the epoch.
pub fn encode_required(field: &'static str, at: Option<DateTime<Utc>>) -> Result<i64> {
    match encode_optional(field, at)? {
        Some(nanos) => Ok(nanos),
        None => Err(Error::MissingTimestamp { field }),
    }
}

/// Encodes an optional instant.
///
/// # Errors
///
/// Returns [`Error::MissingTimestamp`] if the instant is out of range.
pub fn encode_optional(field: &'static str, at: Option<DateTime<Utc>>) -> Result<Option<i64>> {
    let Some(at) = at else {
        return Ok(None);
    };
    let nanos = at
        .timestamp_nanos_opt()
        .ok_or(Error::MissingTimestamp { field })?;
    Ok((nanos != 0).then_some(nanos))
}

/// Decodes a stored value, mapping the sentinel back to `None`.
#[must_use]
pub fn decode(nanos: i64) -> Option<DateTime<Utc>> {
    (nanos != 0).then(|| DateTime::from_timestamp_nanos(nanos))
}

/// Decodes an optional stored value.
#[must_use]
pub fn decode_optional(nanos: Option<i64>) -> Option<DateTime<Utc>> {
    nanos.and_then(decode)
}

/// Encoded created/updated/deleted triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedTimestamps {
    /// Creation instant.
    pub created: i64,
    /// Last-update instant.
    pub updated: i64,
    /// Deletion instant, if any.
    pub deleted: Option<i64>,
}

impl EncodedTimestamps {
    /// Validates and encodes domain timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTimestamp`] if created or updated is unset or
    /// cannot be encoded.
    pub fn encode(ts: &Timestamps) -> Result<Self> {
        Ok(Self {
            created: encode_required("created", ts.created)?,
            updated: encode_required("updated", ts.updated)?,
            deleted: encode_optional("deleted", ts.deleted)?,
        })
    }

    /// Decodes stored timestamps, rejecting rows without created/updated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] naming `entity` if created or updated
    /// holds the sentinel.
    pub fn decode(self, entity: &'static str) -> Result<Timestamps> {
        let created = decode(self.created).ok_or_else(|| Error::InvalidData {
            entity,
            reason: "created timestamp missing".to_string(),
        })?;
        let updated = decode(self.updated).ok_or_else(|| Error::InvalidData {
            entity,
            reason: "updated timestamp missing".to_string(),
        })?;
        Ok(Timestamps {
            created: Some(created),
            updated: Some(updated),
            deleted: decode_optional(self.deleted),
        })
    }
}
