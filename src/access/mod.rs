//! The windowed access layer: view state, identity resolution, prefetch
//! planning, load-more coordination, and the never-fail cell facade.

pub mod coordinator;
pub mod facade;
pub mod prefetch;
pub mod resolver;
pub mod view_state;
