//! Configuration structures and constants for the hyperbatch-core library.
//!
//! This module provides the configuration for a batch run: where the input
//! videos live, how they are sped up, where outputs go, and how per-file
//! errors are treated.

mod builder;

use crate::error::{CoreError, CoreResult};
use crate::media::FrameRate;

use std::path::PathBuf;

pub use builder::CoreConfigBuilder;

// Default constants

/// File extensions (compared case-insensitively) recognized as input videos.
pub const VALID_VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "wmv", "mov"];

/// Name of the folder, created next to the inputs, that receives the outputs.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Output";

/// How the batch driver reacts when a file cannot be prepared for the engine
/// (unreadable metadata, no matching calibration, output folder failure).
///
/// Engine failures and cancellations never stop the batch regardless of
/// this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileErrorPolicy {
    /// Report the file as skipped and continue with the next one.
    #[default]
    Skip,

    /// Stop the whole batch at the first such file.
    AbortBatch,
}

/// Main configuration structure for the hyperbatch-core library.
///
/// Typically created by the consumer of the library (e.g., hyperbatch-cli)
/// and passed to [`process_directory`](crate::process_directory).
///
/// # Examples
///
/// ```rust
/// use hyperbatch_core::config::{CoreConfig, FileErrorPolicy};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::new(PathBuf::from("/videos"), 8);
/// assert_eq!(config.output_subdir, "Output");
/// assert_eq!(config.file_error_policy, FileErrorPolicy::Skip);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory containing input video files to process
    pub input_dir: PathBuf,

    /// Ratio of output playback speed to input playback speed
    pub speedup_factor: u32,

    /// Output frame rate; the input frame rate is kept when unset
    pub output_frame_rate: Option<FrameRate>,

    /// Folder name, relative to each input's directory, for outputs
    pub output_subdir: String,

    pub file_error_policy: FileErrorPolicy,

    /// JSON calibration catalog replacing the built-in profiles
    pub calibration_catalog: Option<PathBuf>,

    /// Explicit ffmpeg binary for the processing engine
    pub ffmpeg_path: Option<PathBuf>,

    /// Explicit ffprobe binary for metadata reads
    pub ffprobe_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            speedup_factor: 1,
            output_frame_rate: None,
            output_subdir: DEFAULT_OUTPUT_SUBDIR.to_string(),
            file_error_policy: FileErrorPolicy::default(),
            calibration_catalog: None,
            ffmpeg_path: None,
            ffprobe_path: None,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with defaults for everything but the input
    /// directory and speedup factor.
    pub fn new(input_dir: PathBuf, speedup_factor: u32) -> Self {
        Self {
            input_dir,
            speedup_factor,
            ..Self::default()
        }
    }

    /// Checks values that would otherwise only fail deep inside a batch run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.speedup_factor == 0 {
            return Err(CoreError::Config(
                "speedup factor must be a positive integer".to_string(),
            ));
        }

        let subdir = self.output_subdir.trim();
        if subdir.is_empty() || subdir == "." || subdir == ".." {
            return Err(CoreError::Config(format!(
                "invalid output folder name '{}'",
                self.output_subdir
            )));
        }
        if subdir.contains(['/', '\\']) {
            return Err(CoreError::Config(format!(
                "output folder name '{}' must not contain path separators",
                self.output_subdir
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.output_subdir, DEFAULT_OUTPUT_SUBDIR);
        assert_eq!(config.speedup_factor, 1);
        assert!(config.output_frame_rate.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_speedup() {
        let config = CoreConfig::new(PathBuf::from("."), 0);
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn accepts_large_speedup() {
        assert!(CoreConfig::new(PathBuf::from("."), 5000).validate().is_ok());
        assert!(CoreConfig::new(PathBuf::from("."), u32::MAX).validate().is_ok());
    }

    #[test]
    fn rejects_nested_output_folder() {
        let mut config = CoreConfig::new(PathBuf::from("."), 4);
        config.output_subdir = "out/nested".to_string();
        assert!(config.validate().is_err());
        config.output_subdir = "..".to_string();
        assert!(config.validate().is_err());
        config.output_subdir = "Rendered".to_string();
        assert!(config.validate().is_ok());
    }
}
