//! The visible pack: an immutable snapshot of the linearized history window.
//!
//! A pack is built once by the upstream graph provider, published behind an
//! `Arc`, and never mutated. Staleness is handled by wholesale replacement in
//! the view state; once published, a pack's row→id mapping never changes.

#![allow(missing_docs)]

use std::collections::HashMap;

use crate::model::entity::{EntityId, Label, RootId};

/// One visible row: the entity it resolves to and its origin partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: EntityId,
    pub root: RootId,
}

impl VisibleRow {
    #[must_use]
    pub const fn new(id: EntityId, root: RootId) -> Self {
        Self { id, root }
    }
}

/// Immutable snapshot of the visible ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisiblePack {
    rows: Vec<VisibleRow>,
    labels: HashMap<EntityId, Vec<Label>>,
    can_request_more: bool,
}

impl VisiblePack {
    /// Explicit first-install sentinel: no rows, nothing more to load.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            labels: HashMap::new(),
            can_request_more: false,
        }
    }

    #[must_use]
    pub fn new(
        rows: Vec<VisibleRow>,
        labels: HashMap<EntityId, Vec<Label>>,
        can_request_more: bool,
    ) -> Self {
        Self {
            rows,
            labels,
            can_request_more,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row lookup; `None` outside `[0, row_count)`.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<VisibleRow> {
        self.rows.get(row).copied()
    }

    /// Labels attached to an entity, empty if it has none.
    #[must_use]
    pub fn labels_of(&self, id: EntityId) -> &[Label] {
        self.labels.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Whether the upstream provider can extend this window.
    #[must_use]
    pub const fn can_request_more(&self) -> bool {
        self.can_request_more
    }
}
