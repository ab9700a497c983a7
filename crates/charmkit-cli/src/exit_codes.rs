//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Series error - no series could be chosen, or the requested one is unsupported
pub const SERIES_ERROR: i32 = 2;

/// Charm error - missing or malformed charm files, corrupt archive
pub const CHARM_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// External command error - a revision control tool could not run or failed
pub const COMMAND_ERROR: i32 = 6;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
