//! Immutable data model: identities, the visible pack, and detail payloads.

pub mod detail;
pub mod entity;
pub mod pack;
