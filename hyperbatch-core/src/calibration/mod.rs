//! Camera calibration profiles and selection.
//!
//! A [`CalibrationProfile`] couples a camera [`VideoMode`] with the lens
//! correction the engine applies to footage shot in that mode. Profiles live
//! in an immutable [`CalibrationCatalog`]; the [`CalibrationMatcher`] picks
//! one per input video.

pub mod catalog;
pub mod matcher;

pub use catalog::CalibrationCatalog;
pub use matcher::CalibrationMatcher;

use serde::{Deserialize, Serialize};

/// Landscape (including square) or portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(width: u32, height: u32) -> Self {
        if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Recording mode a calibration was measured in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,

    /// Highest frame rate the mode records at.
    pub max_frame_rate: f64,
}

impl VideoMode {
    pub fn new(width: u32, height: u32, max_frame_rate: f64) -> Self {
        Self {
            width,
            height,
            max_frame_rate,
        }
    }

    pub fn long_side(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn short_side(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn pixel_area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.width, self.height)
    }
}

/// Lens distortion correction. The optical centre is relative to the frame
/// (0.5, 0.5 is the middle), k1 and k2 are the radial coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensCalibration {
    #[serde(default = "centre")]
    pub cx: f64,
    #[serde(default = "centre")]
    pub cy: f64,
    pub k1: f64,
    #[serde(default)]
    pub k2: f64,
}

fn centre() -> f64 {
    0.5
}

impl LensCalibration {
    /// Radial correction around the frame centre.
    pub fn radial(k1: f64, k2: f64) -> Self {
        Self {
            cx: 0.5,
            cy: 0.5,
            k1,
            k2,
        }
    }

    /// Identity correction.
    pub fn none() -> Self {
        Self::radial(0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        self.k1 == 0.0 && self.k2 == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    pub id: String,

    /// Free-form camera description shown in logs.
    #[serde(default)]
    pub camera: String,

    pub video_mode: VideoMode,
    pub lens: LensCalibration,
}

impl CalibrationProfile {
    pub fn new(id: &str, camera: &str, video_mode: VideoMode, lens: LensCalibration) -> Self {
        Self {
            id: id.to_string(),
            camera: camera.to_string(),
            video_mode,
            lens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_of_square_is_landscape() {
        assert_eq!(Orientation::of(1080, 1080), Orientation::Landscape);
        assert_eq!(Orientation::of(1080, 1920), Orientation::Portrait);
    }

    #[test]
    fn lens_defaults_to_centre() {
        let lens: LensCalibration = serde_json::from_str(r#"{ "k1": -0.2 }"#).unwrap();
        assert_eq!(lens, LensCalibration::radial(-0.2, 0.0));
        assert!(!lens.is_identity());
        assert!(LensCalibration::none().is_identity());
    }
}
