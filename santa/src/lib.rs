//! Gift exchange roster with randomized gift assignments.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: The roster, its assignment pointer and the draw. No I/O;
//!   randomness is injected by the caller.
//! - **[`io`]**: Snapshot files, configuration and rendered notices.
//!
//! The `santa` binary wires both together into a small CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
