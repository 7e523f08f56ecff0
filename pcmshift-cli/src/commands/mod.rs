//! Command implementations for the CLI.

/// The conversion run: configuration, logging, batch execution and summary.
pub mod convert;
