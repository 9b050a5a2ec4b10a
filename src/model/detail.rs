//! Two-tier detail payloads and the non-blocking cache answer.
//!
//! The lightweight tier ([`CommitMetadata`]) is what list rendering needs; the
//! full tier ([`CommitDetails`]) carries the complete message and change
//! summary. Both tiers answer cache lookups with [`Cached`]: either the loaded
//! value or a placeholder carrying only the entity id, produced synchronously
//! and never blocking.

#![allow(missing_docs)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::entity::{EntityId, RootId};

/// Lightweight per-entity metadata: what a list row needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMetadata {
    pub id: EntityId,
    pub root: RootId,
    pub author: String,
    pub subject: String,
    pub committed_at: DateTime<Utc>,
    pub short_hash: String,
}

/// Full per-entity payload: metadata plus the heavyweight parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDetails {
    pub metadata: CommitMetadata,
    pub full_message: String,
    pub changed_files: usize,
}

/// A non-blocking cache answer: the value, or a sentinel naming what is still
/// being resolved.
#[derive(Debug, Clone)]
pub enum Cached<T> {
    Loaded(Arc<T>),
    Placeholder(EntityId),
}

impl<T> Cached<T> {
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// The loaded value, if resolution has completed.
    #[must_use]
    pub fn loaded(&self) -> Option<&Arc<T>> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Placeholder(_) => None,
        }
    }
}

/// Stable composite key of a fully-identified entity: id plus origin root.
///
/// Only derivable from loaded metadata. Placeholder rows have no composite
/// key yet; synthesizing one from placeholder data would pin a wrong identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitId {
    pub id: EntityId,
    pub root: RootId,
}

impl CommitId {
    /// Derive from metadata, failing open on placeholders.
    #[must_use]
    pub fn from_cached(cached: &Cached<CommitMetadata>) -> Option<Self> {
        cached.loaded().map(|meta| Self {
            id: meta.id,
            root: meta.root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta(raw: u64) -> CommitMetadata {
        CommitMetadata {
            id: EntityId::new(raw),
            root: RootId::new(1),
            author: "ada".to_string(),
            subject: "initial import".to_string(),
            committed_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            short_hash: "abc1234".to_string(),
        }
    }

    #[test]
    fn placeholder_carries_the_requested_id() {
        let cached: Cached<CommitMetadata> = Cached::Placeholder(EntityId::new(9));
        assert!(cached.is_placeholder());
        assert!(cached.loaded().is_none());
        match cached {
            Cached::Placeholder(id) => assert_eq!(id, EntityId::new(9)),
            Cached::Loaded(_) => panic!("expected a placeholder"),
        }
    }

    #[test]
    fn commit_id_fails_open_on_placeholder() {
        let cached: Cached<CommitMetadata> = Cached::Placeholder(EntityId::new(3));
        assert!(CommitId::from_cached(&cached).is_none());
    }

    #[test]
    fn commit_id_derives_from_loaded_metadata() {
        let cached = Cached::Loaded(Arc::new(meta(5)));
        let key = CommitId::from_cached(&cached).expect("loaded metadata has a key");
        assert_eq!(key.id, EntityId::new(5));
        assert_eq!(key.root, RootId::new(1));
    }

    #[test]
    fn metadata_roundtrips_through_json() {
        let original = meta(8);
        let json = serde_json::to_string(&original).expect("serialize");
        let back: CommitMetadata = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, original);
    }
}
