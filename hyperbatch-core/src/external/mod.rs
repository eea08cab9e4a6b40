// ============================================================================
// hyperbatch-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Availability Checks for External CLI Tools
//
// The batch run depends on ffprobe (metadata) and ffmpeg (the processing
// engine). Both are checked up front so a missing binary fails the batch
// before any file is touched.
//
// KEY COMPONENTS:
// - Dependency checking function
// - Mock reader and engine used by the driver tests (mocks submodule)

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Scripted test doubles for [`VideoInfoReader`](crate::media::VideoInfoReader)
/// and [`ProcessingEngine`](crate::engine::ProcessingEngine), behind the
/// `test-mocks` feature
pub mod mocks;

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with a `-version` argument. Only failure to launch counts
/// as unavailable; the exit status is ignored.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The command parts if the command is found
/// * `Err(CoreError::DependencyNotFound)` - If the command is not found
/// * `Err(CoreError::CommandStart)` - If the command exists but fails to start
pub(crate) fn check_dependency(cmd_name: &str) -> CoreResult<Vec<String>> {
    let cmd_parts = vec![cmd_name.to_string()];

    let result = Command::new(&cmd_parts[0])
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(cmd_parts)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
