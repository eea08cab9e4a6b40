// ============================================================================
// hyperbatch-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig instances with defaults for every
// optional field. `build` validates the result.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, FileErrorPolicy};
use crate::error::{CoreError, CoreResult};
use crate::media::FrameRate;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use hyperbatch_core::config::{CoreConfigBuilder, FileErrorPolicy};
/// use hyperbatch_core::media::FrameRate;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/videos"))
///     .speedup_factor(10)
///     .output_frame_rate(FrameRate::from_integer(30))
///     .file_error_policy(FileErrorPolicy::AbortBatch)
///     .build()
///     .unwrap();
/// assert_eq!(config.speedup_factor, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    // Required fields
    input_dir: Option<PathBuf>,
    speedup_factor: Option<u32>,

    // Optional fields
    output_frame_rate: Option<FrameRate>,
    output_subdir: Option<String>,
    file_error_policy: FileErrorPolicy,
    calibration_catalog: Option<PathBuf>,
    ffmpeg_path: Option<PathBuf>,
    ffprobe_path: Option<PathBuf>,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory containing input video files.
    pub fn input_dir(mut self, input_dir: PathBuf) -> Self {
        self.input_dir = Some(input_dir);
        self
    }

    /// Sets the speedup factor (output speed / input speed).
    pub fn speedup_factor(mut self, speedup_factor: u32) -> Self {
        self.speedup_factor = Some(speedup_factor);
        self
    }

    /// Overrides the output frame rate.
    pub fn output_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.output_frame_rate = Some(frame_rate);
        self
    }

    /// Sets the name of the output folder created next to the inputs.
    pub fn output_subdir(mut self, name: &str) -> Self {
        self.output_subdir = Some(name.to_string());
        self
    }

    pub fn file_error_policy(mut self, policy: FileErrorPolicy) -> Self {
        self.file_error_policy = policy;
        self
    }

    /// Loads calibration profiles from a JSON file instead of the built-in set.
    pub fn calibration_catalog(mut self, path: PathBuf) -> Self {
        self.calibration_catalog = Some(path);
        self
    }

    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.ffmpeg_path = Some(path);
        self
    }

    pub fn ffprobe_path(mut self, path: PathBuf) -> Self {
        self.ffprobe_path = Some(path);
        self
    }

    /// Builds and validates a CoreConfig.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` - If a required field is missing or a value is invalid
    pub fn build(self) -> CoreResult<CoreConfig> {
        let input_dir = self
            .input_dir
            .ok_or_else(|| CoreError::Config("input_dir is required".to_string()))?;
        let speedup_factor = self
            .speedup_factor
            .ok_or_else(|| CoreError::Config("speedup_factor is required".to_string()))?;

        let mut config = CoreConfig::new(input_dir, speedup_factor);
        config.output_frame_rate = self.output_frame_rate;
        if let Some(subdir) = self.output_subdir {
            config.output_subdir = subdir;
        }
        config.file_error_policy = self.file_error_policy;
        config.calibration_catalog = self.calibration_catalog;
        config.ffmpeg_path = self.ffmpeg_path;
        config.ffprobe_path = self.ffprobe_path;

        config.validate()?;
        Ok(config)
    }
}
