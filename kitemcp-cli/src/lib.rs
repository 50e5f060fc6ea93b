//! kitemcp CLI Library
//!
//! Command-line definitions, exit codes and logging setup for the `kitemcp`
//! binary.

// Re-export modules for use in tests
/// Command-line interface definitions and argument parsing
pub mod cli;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log subscriber setup and the MCP log file writer
pub mod logging;
