//! I/O adapters around the roster core.

pub mod config;
pub mod reveal;
pub mod store;
