//! Stable exit codes for the `ignited` binary.

/// Command succeeded.
pub const OK: i32 = 0;
/// Bootstrap or command body failed.
pub const FAILURE: i32 = 1;
