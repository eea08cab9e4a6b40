//! ffprobe command execution.
//!
//! Runs `ffprobe` against a single file and returns its JSON report. Parsing
//! the report into a [`VideoInfo`](super::VideoInfo) lives in
//! [`reader`](super::reader).

use crate::error::{CoreError, CoreResult, metadata_error};
use crate::external::check_dependency;

use serde_json::Value;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default name of the ffprobe executable looked up on `PATH`.
pub const FFPROBE_BINARY: &str = "ffprobe";

/// ffprobe command executor
#[derive(Debug, Clone)]
pub struct Ffprobe {
    binary: PathBuf,
}

impl Default for Ffprobe {
    fn default() -> Self {
        Self::new()
    }
}

impl Ffprobe {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(FFPROBE_BINARY),
        }
    }

    /// Uses an explicit ffprobe binary instead of the one on `PATH`.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Checks that the ffprobe binary can be executed.
    pub fn check_available(&self) -> CoreResult<()> {
        check_dependency(&self.binary.to_string_lossy()).map(|_| ())
    }

    /// Executes ffprobe and returns its JSON output.
    pub fn execute(&self, input_path: &Path) -> CoreResult<Value> {
        if !input_path.is_file() {
            return Err(metadata_error(input_path, "file not found"));
        }

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"]);
        cmd.arg(OsString::from(input_path.as_os_str()));

        log::debug!("Running ffprobe: {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                CoreError::DependencyNotFound(self.binary.to_string_lossy().into_owned())
            } else {
                CoreError::CommandStart(self.binary.to_string_lossy().into_owned(), e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("ffprobe exited with {}", output.status),
                message => format!("ffprobe exited with {}: {}", output.status, message),
            };
            return Err(metadata_error(input_path, reason));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            metadata_error(input_path, format!("failed to parse ffprobe output: {e}"))
        })
    }
}
