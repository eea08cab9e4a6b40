// hyperbatch-cli/src/lib.rs
//
// Library portion of the Hyperbatch CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, ProcessArgs};
pub use commands::process::run_process;
pub use error::{CliErrorContext, CliResult};
