//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
/// Nothing extracted, validation errors, or a submission that should not be graded.
pub const FAILED: i32 = 1;
/// Bad config, unreadable input, or a usage error.
pub const CONFIG_ERROR: i32 = 2;
