#![forbid(unsafe_code)]

//! log-window — windowed access core for huge append-only history logs.
//!
//! Virtualizes row-indexed access to an incrementally-materialized linearized
//! history (millions of commits) so a bounded visible window can be served
//! without holding the whole dataset:
//!
//! 1. **Identity resolution** — row index → stable entity id, fresh from the
//!    current immutable snapshot on every call
//! 2. **Placeholder-backed detail access** — synchronous cache lookups that
//!    never block and never fail a cell, with opportunistic prefetch hints
//! 3. **Single-flight load-more** — at most one in-flight dataset extension
//!    per window generation, cleared only by wholesale pack replacement
//!
//! Rendering, input handling, persistence, and graph construction are
//! external collaborators reached through the traits in [`provider`].
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use log_window::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use log_window::access::facade::LogWindowModel;
//! use log_window::core::config::AccessConfig;
//! ```

pub mod prelude;

pub mod access;
pub mod core;
pub mod model;
pub mod provider;
