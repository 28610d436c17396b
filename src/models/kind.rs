//! Status kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a [`Status`](super::Status).
///
/// `Unknown` is the zero value. It is never valid in a request and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Unset sentinel.
    #[default]
    Unknown,
    /// Thing is up.
    Up,
    /// Thing is down.
    Down,
    /// Thing is degraded.
    Warning,
    /// Thing was just created.
    Created,
    /// Thing is available.
    Available,
    /// Thing is unavailable.
    Unavailable,
    /// Thing is decommissioned.
    Decomm,
    /// Thing is offline.
    Offline,
    /// Thing is online.
    Online,
    /// Thing is being watched.
    Observing,
    /// Thing is being investigated.
    Investigating,
}

impl StatusKind {
    /// Returns every valid (non-`Unknown`) kind.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Up,
            Self::Down,
            Self::Warning,
            Self::Created,
            Self::Available,
            Self::Unavailable,
            Self::Decomm,
            Self::Offline,
            Self::Online,
            Self::Observing,
            Self::Investigating,
        ]
    }

    /// Returns the symbolic name used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "STATUS_KIND_UNKNOWN",
            Self::Up => "STATUS_KIND_UP",
            Self::Down => "STATUS_KIND_DOWN",
            Self::Warning => "STATUS_KIND_WARNING",
            Self::Created => "STATUS_KIND_CREATED",
            Self::Available => "STATUS_KIND_AVAILABLE",
            Self::Unavailable => "STATUS_KIND_UNAVAILABLE",
            Self::Decomm => "STATUS_KIND_DECOMM",
            Self::Offline => "STATUS_KIND_OFFLINE",
            Self::Online => "STATUS_KIND_ONLINE",
            Self::Observing => "STATUS_KIND_OBSERVING",
            Self::Investigating => "STATUS_KIND_INVESTIGATING",
        }
    }

    /// Parses a kind from its symbolic name or its short form.
    ///
    /// Accepts `STATUS_KIND_UP`, `UP`, or `up`. Returns `None` for anything
    /// unrecognized; the unknown sentinel parses to `Some(Unknown)` so callers
    /// can reject it explicitly.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("STATUS_KIND_").unwrap_or(&upper);
        match short {
            "UNKNOWN" | "UNSPECIFIED" => Some(Self::Unknown),
            "UP" => Some(Self::Up),
            "DOWN" => Some(Self::Down),
            "WARNING" => Some(Self::Warning),
            "CREATED" => Some(Self::Created),
            "AVAILABLE" => Some(Self::Available),
            "UNAVAILABLE" => Some(Self::Unavailable),
            "DECOMM" => Some(Self::Decomm),
            "OFFLINE" => Some(Self::Offline),
            "ONLINE" => Some(Self::Online),
            "OBSERVING" => Some(Self::Observing),
            "INVESTIGATING" => Some(Self::Investigating),
            _ => None,
        }
    }

    /// Returns true for the `Unknown` sentinel.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
