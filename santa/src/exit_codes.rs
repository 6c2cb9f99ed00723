//! Stable exit codes for `santa` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to unreadable files, invalid config or bad arguments.
pub const INVALID: i32 = 1;
/// The roster refused the operation (duplicate name, unknown participant,
/// invalid assignment, or no possible draw).
pub const REJECTED: i32 = 2;
