//! Command implementations for the CLI.

/// The batch run: discover videos, render each through the engine, report.
pub mod process;
