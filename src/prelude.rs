//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use log_window::prelude::*;
//! ```

// Core
pub use crate::core::config::{AccessConfig, DOWN_PRELOAD_COUNT, UP_PRELOAD_COUNT};
pub use crate::core::dispatch::{DispatchHandle, OnLoaded, UiDispatcher, noop_on_loaded};
pub use crate::core::errors::{Result, WindowError};

// Model
pub use crate::model::detail::{Cached, CommitDetails, CommitId, CommitMetadata};
pub use crate::model::entity::{EntityId, Label, LabelKind, RootId};
pub use crate::model::pack::{VisiblePack, VisibleRow};

// Access
pub use crate::access::facade::{
    CellOutcome, CellValue, ColumnKind, FallbackReason, LogWindowModel,
};
pub use crate::access::prefetch::PrefetchWindow;
pub use crate::access::resolver::IdentityResolver;
pub use crate::access::view_state::{StructuralChange, WindowedViewState};

// Provider seams
pub use crate::provider::{
    DetailError, DetailResult, FullDetailCache, MetadataCache, MoreDataFetcher,
};
