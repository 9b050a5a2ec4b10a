//! Foundation: errors, configuration, and UI-affine dispatch.

pub mod config;
pub mod dispatch;
pub mod errors;
