//! Identity resolver: row index → entity id and per-row facts.
//!
//! Every call re-reads the current pack; nothing derived from a row index is
//! cached across a pack replacement.

use std::sync::Arc;

use crate::access::view_state::WindowedViewState;
use crate::core::errors::{Result, WindowError};
use crate::model::entity::{EntityId, Label, RootId};
use crate::model::pack::{VisiblePack, VisibleRow};

/// Maps row indices to stable entity identities via the current pack.
pub struct IdentityResolver {
    view: Arc<WindowedViewState>,
}

impl IdentityResolver {
    /// Resolver over a shared view-state handle.
    #[must_use]
    pub fn new(view: Arc<WindowedViewState>) -> Self {
        Self { view }
    }

    /// Row count of the current pack, read fresh on every call.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.view.current().row_count()
    }

    /// Stable entity id at `row`. Out-of-range is a caller contract violation
    /// and fails loudly.
    pub fn id_at(&self, row: usize) -> Result<EntityId> {
        self.row_at(row).map(|r| r.id)
    }

    /// Origin partition of `row`.
    pub fn root_at(&self, row: usize) -> Result<RootId> {
        self.row_at(row).map(|r| r.root)
    }

    /// All labels attached to the entity at `row`.
    pub fn labels_at(&self, row: usize) -> Result<Vec<Label>> {
        let pack = self.view.current();
        let visible = Self::lookup(&pack, row)?;
        Ok(pack.labels_of(visible.id).to_vec())
    }

    /// Labels at `row` restricted to branch-type labels.
    pub fn branch_labels_at(&self, row: usize) -> Result<Vec<Label>> {
        let mut labels = self.labels_at(row)?;
        labels.retain(|label| label.kind.is_branch());
        Ok(labels)
    }

    fn row_at(&self, row: usize) -> Result<VisibleRow> {
        Self::lookup(&self.view.current(), row)
    }

    fn lookup(pack: &VisiblePack, row: usize) -> Result<VisibleRow> {
        pack.row(row).ok_or(WindowError::RowOutOfRange {
            row,
            row_count: pack.row_count(),
        })
    }
}
