//! Opaque identity types: entities, roots, and attached labels.

#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, totally-ordered identifier naming one dataset entity (a commit).
///
/// The cache key everywhere. Constructed by providers; never recomputed from
/// a row index outside the identity resolver.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Origin partition of a row (the repository root it came from).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RootId(u32);

impl RootId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root#{}", self.0)
    }
}

/// Kind of a label attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    Branch,
    Tag,
    Head,
}

impl LabelKind {
    /// Branch-type labels include the detached HEAD marker: both name a line
    /// of development, which is what branch filtering is for.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Branch | Self::Head)
    }
}

/// A named reference attached to one entity (branch, tag, HEAD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub kind: LabelKind,
}

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: LabelKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
