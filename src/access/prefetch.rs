//! Prefetch window planner: the id set to warm around an access point.
//!
//! Produces a forward-only, single-pass iterator (consumed by value, no
//! `Clone`) covering `[max(0, row - up), min(row_count, row + down))`. The row
//! count is re-read from the live pack on every step, not snapshotted up
//! front: a pack replacement mid-iteration makes the sequence terminate early
//! instead of yielding out-of-range ids. Clamp, don't fail.

use std::iter::FusedIterator;
use std::sync::Arc;

use crate::access::view_state::WindowedViewState;
use crate::core::config::AccessConfig;
use crate::model::entity::EntityId;

/// Lazy, non-restartable sequence of entity ids around one row.
pub struct PrefetchWindow {
    view: Arc<WindowedViewState>,
    next_row: usize,
    end_row: usize,
}

impl PrefetchWindow {
    /// Plan a window around `row` using the configured margins.
    #[must_use]
    pub fn around(view: Arc<WindowedViewState>, row: usize, config: &AccessConfig) -> Self {
        Self {
            view,
            next_row: row.saturating_sub(config.up_preload),
            end_row: row.saturating_add(config.down_preload),
        }
    }

    /// Remaining extent assuming the pack does not change; the live bound may
    /// be tighter by the time the iterator gets there.
    #[must_use]
    pub fn planned_len(&self) -> usize {
        let row_count = self.view.current().row_count();
        self.end_row.min(row_count).saturating_sub(self.next_row)
    }
}

impl Iterator for PrefetchWindow {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        if self.next_row >= self.end_row {
            return None;
        }
        // Bound re-read per step: a shrunk pack ends the sequence early.
        let pack = self.view.current();
        match pack.row(self.next_row) {
            Some(visible) => {
                self.next_row += 1;
                Some(visible.id)
            }
            None => {
                self.next_row = self.end_row;
                None
            }
        }
    }
}

impl FusedIterator for PrefetchWindow {}
