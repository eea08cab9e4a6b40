// hyperbatch-cli/src/config.rs
//
// Defines default configuration constants for the `hyperbatch` command.

pub const DEFAULT_INPUT_DIR: &str = ".";
pub const DEFAULT_OUTPUT_SUBDIR: &str = hyperbatch_core::config::DEFAULT_OUTPUT_SUBDIR;

/// Exit code when any file failed or the batch could not start.
pub const EXIT_FAILURE: i32 = 1;
