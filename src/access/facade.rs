//! The consumer surface: per-cell access with a never-fail contract.
//!
//! [`LogWindowModel`] is what the presentation layer talks to. A cell lookup
//! never aborts caller iteration because one cell's backing data is transiently
//! unavailable or raced an invalidation: every data error is absorbed at this
//! boundary and replaced by the column's stub value, with the outcome kind
//! kept explicit so callers (and tests) can tell "fell back" from "succeeded".
//! Only contract violations — an out-of-range row — cross this boundary as
//! errors.

#![allow(missing_docs)]

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::access::coordinator::MoreDataCoordinator;
use crate::access::prefetch::PrefetchWindow;
use crate::access::resolver::IdentityResolver;
use crate::access::view_state::{StructuralChange, WindowedViewState};
use crate::core::config::AccessConfig;
use crate::core::dispatch::{OnLoaded, noop_on_loaded};
use crate::core::errors::{Result, WindowError};
use crate::model::detail::{Cached, CommitDetails, CommitId, CommitMetadata};
use crate::model::entity::{EntityId, Label, RootId};
use crate::model::pack::{VisiblePack, VisibleRow};
use crate::provider::{DetailError, DetailResult, FullDetailCache, MetadataCache, MoreDataFetcher};

// ──────────────────── columns ────────────────────

/// The fixed set of typed per-row accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Root,
    Hash,
    Author,
    Date,
    Subject,
}

impl ColumnKind {
    /// Every column, for exhaustive iteration.
    pub const ALL: [Self; 5] = [
        Self::Root,
        Self::Hash,
        Self::Author,
        Self::Date,
        Self::Subject,
    ];

    /// The value substituted when this column's backing data is unavailable.
    #[must_use]
    pub fn stub_value(self) -> CellValue {
        match self {
            Self::Root => CellValue::Root(None),
            Self::Date => CellValue::Timestamp(None),
            Self::Hash | Self::Author | Self::Subject => CellValue::Text(String::new()),
        }
    }
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Timestamp(Option<DateTime<Utc>>),
    Root(Option<RootId>),
}

/// Why a cell fell back to its stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The computation was cooperatively cancelled. Never logged.
    Cancelled,
    /// The backing cache has not resolved this entity yet.
    Unavailable,
    /// An unexpected computation failure, logged once with context.
    Failed,
}

/// Result of a cell lookup: the real value, or the stub with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    Resolved(CellValue),
    Fallback {
        value: CellValue,
        reason: FallbackReason,
    },
}

impl CellOutcome {
    fn fallback(column: ColumnKind, reason: FallbackReason) -> Self {
        Self::Fallback {
            value: column.stub_value(),
            reason,
        }
    }

    /// The value to present, fallback or not.
    #[must_use]
    pub const fn value(&self) -> &CellValue {
        match self {
            Self::Resolved(value) | Self::Fallback { value, .. } => value,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The fallback reason, if this outcome fell back.
    #[must_use]
    pub const fn reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Resolved(_) => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }
}

// ──────────────────── model ────────────────────

/// Windowed access model over the current visible pack and external caches.
pub struct LogWindowModel {
    view: Arc<WindowedViewState>,
    resolver: IdentityResolver,
    coordinator: MoreDataCoordinator,
    metadata_cache: Arc<dyn MetadataCache>,
    details_cache: Arc<dyn FullDetailCache>,
    config: AccessConfig,
}

impl LogWindowModel {
    /// Build a model starting from the empty sentinel pack.
    #[must_use]
    pub fn new(
        metadata_cache: Arc<dyn MetadataCache>,
        details_cache: Arc<dyn FullDetailCache>,
        fetcher: Arc<dyn MoreDataFetcher>,
        config: AccessConfig,
    ) -> Self {
        let view = Arc::new(WindowedViewState::new());
        Self {
            resolver: IdentityResolver::new(Arc::clone(&view)),
            coordinator: MoreDataCoordinator::new(fetcher),
            view,
            metadata_cache,
            details_cache,
            config,
        }
    }

    /// The shared view state, for components that need their own handle.
    #[must_use]
    pub fn view(&self) -> Arc<WindowedViewState> {
        Arc::clone(&self.view)
    }

    #[must_use]
    pub const fn config(&self) -> &AccessConfig {
        &self.config
    }

    // ──────────────────── identity ────────────────────

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.resolver.row_count()
    }

    pub fn id_at(&self, row: usize) -> Result<EntityId> {
        self.resolver.id_at(row)
    }

    pub fn root_at(&self, row: usize) -> Result<RootId> {
        self.resolver.root_at(row)
    }

    pub fn labels_at(&self, row: usize) -> Result<Vec<Label>> {
        self.resolver.labels_at(row)
    }

    pub fn branch_labels_at(&self, row: usize) -> Result<Vec<Label>> {
        self.resolver.branch_labels_at(row)
    }

    // ──────────────────── pack lifecycle ────────────────────

    /// Install a replacement pack: swap, clear the pending request, notify.
    /// Called on the UI-affine thread for every reload, successful or not.
    pub fn install_pack(&self, pack: VisiblePack) -> u64 {
        let generation = self.view.swap(pack);
        self.coordinator.mark_idle();
        self.view.publish(StructuralChange { generation });
        generation
    }

    /// Register for full-invalidation notifications.
    #[must_use]
    pub fn subscribe(&self) -> crossbeam_channel::Receiver<StructuralChange> {
        self.view.subscribe()
    }

    // ──────────────────── more-data coordination ────────────────────

    /// Pure query: no request in flight and the current pack can extend.
    #[must_use]
    pub fn can_request_more(&self) -> bool {
        !self.coordinator.is_pending() && self.view.current().can_request_more()
    }

    /// Ask the upstream provider to extend the dataset. At most one request
    /// is in flight at a time; returns whether this call dispatched it.
    pub fn request_more(&self, on_loaded: OnLoaded) -> bool {
        if !self.view.current().can_request_more() {
            return false;
        }
        self.coordinator.request_more(on_loaded)
    }

    // ──────────────────── cell access ────────────────────

    /// Prefetch plan around `row`; single-pass, clamped to the live extent.
    #[must_use]
    pub fn window_around(&self, row: usize) -> PrefetchWindow {
        PrefetchWindow::around(Arc::clone(&self.view), row, &self.config)
    }

    /// The never-fail cell lookup. `Err` only for an out-of-range row.
    ///
    /// Accessing a row within `down_preload` of the window tail arms a
    /// silent load-more request, which is how scrolling near the bottom
    /// extends the dataset.
    pub fn value_at(&self, row: usize, column: ColumnKind) -> Result<CellOutcome> {
        let pack = self.view.current();
        let row_count = pack.row_count();
        let visible = pack.row(row).ok_or(WindowError::RowOutOfRange {
            row,
            row_count,
        })?;
        drop(pack);

        if row_count - row <= self.config.down_preload && self.can_request_more() {
            let _ = self.request_more(noop_on_loaded());
        }

        match self.compute_cell(row, visible, column) {
            Ok(Some(value)) => Ok(CellOutcome::Resolved(value)),
            Ok(None) => Ok(CellOutcome::fallback(column, FallbackReason::Unavailable)),
            Err(DetailError::Cancelled) => {
                Ok(CellOutcome::fallback(column, FallbackReason::Cancelled))
            }
            Err(DetailError::Failed { details }) => {
                tracing::error!(
                    row,
                    column = ?column,
                    %details,
                    "failed to get information for the log window"
                );
                Ok(CellOutcome::fallback(column, FallbackReason::Failed))
            }
        }
    }

    /// Cached full detail or a placeholder. Never blocks, never loads.
    pub fn commit_detail(&self, row: usize) -> Result<Cached<CommitDetails>> {
        let id = self.resolver.id_at(row)?;
        let lookup = self.details_cache.full_details(id);
        Ok(self.absorb(lookup, id, row, "full details"))
    }

    /// Cached metadata or a placeholder. With `load`, the prefetch window
    /// around `row` is handed to the cache as a batch hint.
    pub fn metadata(&self, row: usize, load: bool) -> Result<Cached<CommitMetadata>> {
        let id = self.resolver.id_at(row)?;
        let lookup = if load {
            let mut hints = self.window_around(row);
            self.metadata_cache.metadata(id, &mut hints)
        } else {
            self.metadata_cache.metadata(id, &mut std::iter::empty())
        };
        Ok(self.absorb(lookup, id, row, "metadata"))
    }

    /// Stable composite key of the entity at `row`. `None` while the row's
    /// metadata is still a placeholder: partial rows have no identity yet.
    pub fn commit_id(&self, row: usize) -> Result<Option<CommitId>> {
        Ok(CommitId::from_cached(&self.metadata(row, false)?))
    }

    fn compute_cell(
        &self,
        row: usize,
        visible: VisibleRow,
        column: ColumnKind,
    ) -> std::result::Result<Option<CellValue>, DetailError> {
        if column == ColumnKind::Root {
            return Ok(Some(CellValue::Root(Some(visible.root))));
        }
        let mut hints = self.window_around(row);
        let cached = self.metadata_cache.metadata(visible.id, &mut hints)?;
        let Some(meta) = cached.loaded() else {
            return Ok(None);
        };
        let value = match column {
            ColumnKind::Root => CellValue::Root(Some(visible.root)),
            ColumnKind::Hash => CellValue::Text(meta.short_hash.clone()),
            ColumnKind::Author => CellValue::Text(meta.author.clone()),
            ColumnKind::Date => CellValue::Timestamp(Some(meta.committed_at)),
            ColumnKind::Subject => CellValue::Text(meta.subject.clone()),
        };
        Ok(Some(value))
    }

    /// Collapse a cache lookup to the placeholder-fallback contract:
    /// cancellation is silent, anything else is logged once.
    fn absorb<T>(
        &self,
        lookup: DetailResult<T>,
        id: EntityId,
        row: usize,
        what: &'static str,
    ) -> Cached<T> {
        match lookup {
            Ok(cached) => cached,
            Err(DetailError::Cancelled) => Cached::Placeholder(id),
            Err(DetailError::Failed { details }) => {
                tracing::error!(row, %id, what, %details, "detail lookup failed");
                Cached::Placeholder(id)
            }
        }
    }
}
