//! Upstream collaborator seams: detail caches and the more-data fetcher.
//!
//! The access core never performs blocking I/O and never writes detail values
//! itself. It reads from externally-owned caches through these traits and
//! issues fetch/prefetch hints; population is entirely the provider's concern.

#![allow(missing_docs)]

use thiserror::Error;

use crate::core::dispatch::OnLoaded;
use crate::model::detail::{Cached, CommitDetails, CommitMetadata};
use crate::model::entity::EntityId;

pub mod memory;

/// Failure of a cache-value computation.
///
/// Cancellation stays a distinct variant: it is a cooperative abort (the
/// enclosing operation was superseded), resolved silently to a placeholder.
/// Anything else is unexpected and gets logged at the facade boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("detail computation cancelled")]
    Cancelled,

    #[error("detail computation failed: {details}")]
    Failed { details: String },
}

/// Result of a non-blocking cache lookup: a loaded value, a placeholder, or a
/// computation failure for the facade to absorb.
pub type DetailResult<T> = Result<Cached<T>, DetailError>;

/// Full-tier cache: rich commit payloads.
///
/// Lookups are synchronous and never block; a miss answers with a
/// placeholder. This tier is never load-triggered by the access core.
pub trait FullDetailCache: Send + Sync {
    fn full_details(&self, id: EntityId) -> DetailResult<CommitDetails>;
}

/// Lightweight-tier cache: per-row metadata.
///
/// `prefetch_hints` is advisory: the ids the caller expects to touch soon, in
/// ascending row order. The cache may batch-fetch the whole window instead of
/// resolving one id at a time, or ignore the hints entirely. Hints computed
/// against a superseded window may be stale; they are a performance hint, not
/// a correctness dependency.
pub trait MetadataCache: Send + Sync {
    fn metadata(
        &self,
        id: EntityId,
        prefetch_hints: &mut dyn Iterator<Item = EntityId>,
    ) -> DetailResult<CommitMetadata>;
}

/// Asynchronous dataset extension.
///
/// `fetch_more` must return immediately; the actual load happens out of band.
/// The implementation must eventually invoke `on_complete` exactly once, on
/// the UI-affine thread, whether the load succeeds, fails, or is superseded.
pub trait MoreDataFetcher: Send + Sync {
    fn fetch_more(&self, on_complete: OnLoaded);
}
