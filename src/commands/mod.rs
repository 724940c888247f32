//! Command implementations for the twindiff CLI.

/// Compare two files or text blocks and print the edit script.
pub mod compare;
/// Get and set comparison options.
pub mod config;
/// Manage the file-filter history.
pub mod filter;
