//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: Runtime failure, e.g. the server stopped with an error
//! - 2: Configuration or startup errors

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Runtime failure
pub const EXIT_WARNING: i32 = 1;

/// Configuration or startup error
pub const EXIT_ERROR: i32 = 2;
