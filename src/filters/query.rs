//! Options for `find_*` predicates.
//!
//! Groups combine with AND: a record matches when it satisfies every group
//! that is present. An empty query matches everything. Items without a status
//! never match a status-id or kind group.

use super::{Slot, Spec, SpecOption};
use crate::Error;
use crate::models::{StatusId, StatusKind};
use std::collections::BTreeSet;

/// Predicate groups a caller may supply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFields {
    status_ids: Slot<BTreeSet<StatusId>>,
    status_kinds: Slot<BTreeSet<StatusKind>>,
    names: Slot<BTreeSet<String>>,
}

/// Validated query request.
pub type QuerySpec = Spec<QueryFields>;

/// A single query option.
pub type QueryOption = SpecOption<QueryFields>;

/// Matches records whose status id is in `ids`.
pub fn with_status_ids<I, S>(ids: I) -> QueryOption
where
    I: IntoIterator<Item = S>,
    S: Into<StatusId>,
{
    let ids: Vec<StatusId> = ids.into_iter().map(Into::into).collect();
    if ids.is_empty() {
        return SpecOption::fail(Error::AtLeastOne { field: "status_ids" });
    }
    if ids.iter().any(StatusId::is_empty) {
        return SpecOption::fail(Error::EmptyString { field: "status_ids" });
    }
    let ids: BTreeSet<StatusId> = ids.into_iter().collect();
    SpecOption::new(move |f: &mut QueryFields| f.status_ids.set("status_ids", ids))
}

/// Matches records whose (resolved) status kind is in `kinds`.
pub fn with_status_kinds(kinds: impl IntoIterator<Item = StatusKind>) -> QueryOption {
    let kinds: BTreeSet<StatusKind> = kinds.into_iter().collect();
    if kinds.is_empty() {
        return SpecOption::fail(Error::AtLeastOne {
            field: "status_kinds",
        });
    }
    if kinds.contains(&StatusKind::Unknown) {
        return SpecOption::fail(Error::EmptyEnum {
            field: "status_kinds",
        });
    }
    SpecOption::new(move |f: &mut QueryFields| f.status_kinds.set("status_kinds", kinds))
}

/// Matches records whose name (username for users) is in `names`.
pub fn with_names<I, S>(names: I) -> QueryOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    if names.is_empty() {
        return SpecOption::fail(Error::AtLeastOne { field: "names" });
    }
    if names.iter().any(|n| n.trim().is_empty()) {
        return SpecOption::fail(Error::EmptyString { field: "names" });
    }
    let names: BTreeSet<String> = names.into_iter().collect();
    SpecOption::new(move |f: &mut QueryFields| f.names.set("names", names))
}

impl QuerySpec {
    /// A query that matches everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Status id group.
    #[must_use]
    pub fn status_ids(&self) -> Option<BTreeSet<StatusId>> {
        self.read(|f| f.status_ids.cloned())
    }

    /// Status kind group.
    #[must_use]
    pub fn status_kinds(&self) -> Option<BTreeSet<StatusKind>> {
        self.read(|f| f.status_kinds.cloned())
    }

    /// Name group.
    #[must_use]
    pub fn names(&self) -> Option<BTreeSet<String>> {
        self.read(|f| f.names.cloned())
    }

    /// Returns true when any status group is present.
    #[must_use]
    pub fn has_status_predicate(&self) -> bool {
        self.read(|f| f.status_ids.is_set() || f.status_kinds.is_set())
    }

    /// Returns true when no group is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read(|f| *f == QueryFields::default())
    }
}
