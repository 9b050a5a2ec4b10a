//! Windowed view state: the single swap point for visible packs.
//!
//! Holds the current immutable [`VisiblePack`] behind a read/write lock and a
//! monotonically increasing generation counter. Readers clone the `Arc` under
//! a read guard, so a concurrent swap is never observed half-applied: either
//! the old pack or the new one, whole. Invalidation is wholesale — observers
//! get a full structural-change event per swap, never an incremental diff,
//! because old row indices have no defined relationship to new ones.

#![allow(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::{Mutex, RwLock};

use crate::model::pack::VisiblePack;

/// Full-invalidation notification: everything previously derived from row
/// indices is void.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralChange {
    /// Generation of the pack that is now current.
    pub generation: u64,
}

/// Single-writer/multi-reader access point for the current pack.
pub struct WindowedViewState {
    pack: RwLock<Arc<VisiblePack>>,
    generation: AtomicU64,
    subscribers: Mutex<Vec<Sender<StructuralChange>>>,
}

impl Default for WindowedViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowedViewState {
    /// Starts holding the empty sentinel at generation 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pack: RwLock::new(Arc::new(VisiblePack::empty())),
            generation: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The current pack. Cheap: clones the `Arc` under a read guard.
    #[must_use]
    pub fn current(&self) -> Arc<VisiblePack> {
        Arc::clone(&self.pack.read())
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Swap in a replacement pack and bump the generation. Does not notify;
    /// the model sequences swap → clear-pending → publish so the request
    /// coordinator is idle by the time observers react.
    pub fn swap(&self, pack: VisiblePack) -> u64 {
        let replacement = Arc::new(pack);
        *self.pack.write() = replacement;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "visible pack replaced");
        generation
    }

    /// Register an observer for structural changes.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<StructuralChange> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Fan a structural change out to all live subscribers, pruning any whose
    /// receiver is gone. Fire-and-forget: never blocks the access path.
    pub fn publish(&self, change: StructuralChange) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(change).is_ok());
    }
}
