//! Pure roster logic shared by the CLI and the persistence adapter.
//!
//! Core modules must be free of I/O side effects. Randomness is always passed
//! in by the caller so draws can be reproduced from a seed in tests.

pub mod draw;
pub mod pointer;
pub mod roster;
pub mod snapshot;
pub mod types;
