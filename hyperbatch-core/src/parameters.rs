// ============================================================================
// hyperbatch-core/src/parameters.rs
// ============================================================================
//
// PROCESSING PARAMETERS: Per-file Engine Submission Records
//
// ParameterBuilder turns an (input, output) pair into the immutable record
// handed to the processing engine: metadata read, calibration lookup and
// bitrate estimate composed into one ProcessingParameters value.
//
// The only side effect of building is the metadata read.

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ---- External crate imports ----
use url::Url;

// ---- Internal crate imports ----
use crate::bitrate::BitrateEstimator;
use crate::calibration::{CalibrationCatalog, CalibrationMatcher, CalibrationProfile, VideoMode};
use crate::error::{CoreError, CoreResult};
use crate::media::{FrameRate, Rotation, VideoInfoReader};

// ============================================================================
// FIXED SETTINGS
// ============================================================================

/// Optional engine features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub advanced_smoothing: bool,
    pub force_software_rendering: bool,
    pub geometry_shaders: bool,
    pub hardware_encoder: bool,
}

/// Feature set used for every submission. Hardware encoding stays off
/// because some inputs fail to encode with it.
pub const FIXED_FEATURE_FLAGS: FeatureFlags = FeatureFlags {
    advanced_smoothing: false,
    force_software_rendering: false,
    geometry_shaders: false,
    hardware_encoder: false,
};

/// Length of end credits appended to each output, in seconds.
pub const DEFAULT_CREDIT_LENGTH: u32 = 0;

/// Source frame range. `end: None` runs to the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl FrameRange {
    pub const WHOLE_VIDEO: FrameRange = FrameRange {
        start: 0,
        end: None,
    };

    pub fn is_whole_video(&self) -> bool {
        *self == Self::WHOLE_VIDEO
    }
}

impl Default for FrameRange {
    fn default() -> Self {
        Self::WHOLE_VIDEO
    }
}

// ============================================================================
// PARAMETER RECORD
// ============================================================================

/// Everything the engine needs for one file.
#[derive(Debug, Clone)]
pub struct ProcessingParameters<'a> {
    pub calibration: &'a CalibrationProfile,
    pub frame_range: FrameRange,
    pub video_mode: &'a VideoMode,

    pub input_frame_rate: FrameRate,
    pub output_frame_rate: FrameRate,

    pub output_width: u32,
    pub output_height: u32,
    pub output_rotation: Rotation,
    pub output_bitrate: u64,

    pub speedup_factor: u32,

    /// `file://` URI of the input.
    pub input_uri: Url,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub temp_dir: PathBuf,

    pub credit_length: u32,
    pub features: FeatureFlags,

    /// Source duration, when known; used for progress only.
    pub source_duration_secs: Option<f64>,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Composes a [`VideoInfoReader`], a calibration catalog and a
/// [`BitrateEstimator`] into [`ProcessingParameters`].
pub struct ParameterBuilder<'a, R: VideoInfoReader + ?Sized> {
    reader: &'a R,
    matcher: CalibrationMatcher<'a>,
    estimator: &'a BitrateEstimator,
}

impl<'a, R: VideoInfoReader + ?Sized> ParameterBuilder<'a, R> {
    pub fn new(reader: &'a R, catalog: &'a CalibrationCatalog, estimator: &'a BitrateEstimator) -> Self {
        Self {
            reader,
            matcher: CalibrationMatcher::new(catalog),
            estimator,
        }
    }

    /// Builds the parameters for one file.
    ///
    /// # Errors
    ///
    /// * `CoreError::MetadataRead` - If the input cannot be read
    /// * `CoreError::NoCalibrationMatch` - If no profile fits the input
    /// * `CoreError::Config` - If `speedup_factor` is zero
    /// * `CoreError::PathError` - If the input path cannot be made into a URI
    pub fn build(
        &self,
        input: &Path,
        output: &Path,
        speedup_factor: u32,
        output_fps: Option<FrameRate>,
    ) -> CoreResult<ProcessingParameters<'a>> {
        if speedup_factor == 0 {
            return Err(CoreError::Config("speedup factor must be at least 1".to_string()));
        }

        let info = self.reader.read_info(input)?;
        let calibration = self.matcher.find_calibration(&info)?;

        let output_frame_rate = output_fps.unwrap_or(info.frame_rate);
        let output_bitrate = self.estimator.estimate(
            info.bits_per_second,
            info.width,
            info.height,
            info.width,
            info.height,
            info.frame_rate,
            Some(output_frame_rate),
        );

        let temp_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(ProcessingParameters {
            calibration,
            frame_range: FrameRange::WHOLE_VIDEO,
            video_mode: &calibration.video_mode,
            input_frame_rate: info.frame_rate,
            output_frame_rate,
            output_width: info.width,
            output_height: info.height,
            output_rotation: info.rotation,
            output_bitrate,
            speedup_factor,
            input_uri: file_uri(input)?,
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            temp_dir,
            credit_length: DEFAULT_CREDIT_LENGTH,
            features: FIXED_FEATURE_FLAGS,
            source_duration_secs: info.duration_secs,
        })
    }
}

/// `file://` URI for a local path, made absolute against the working directory.
pub fn file_uri(path: &Path) -> CoreResult<Url> {
    let absolute = std::path::absolute(path).map_err(|e| {
        CoreError::PathError(format!("Failed to resolve {}: {}", path.display(), e))
    })?;
    Url::from_file_path(&absolute).map_err(|()| {
        CoreError::PathError(format!("Cannot build a file URI for {}", absolute.display()))
    })
}
