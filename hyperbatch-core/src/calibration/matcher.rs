//! Selection of a calibration profile for a video.
//!
//! A profile's mode is compatible with a video when it covers the video's
//! display resolution on both axes, has an aspect ratio within
//! [`ASPECT_TOLERANCE`], and records at least the video's frame rate (within
//! [`FRAME_RATE_TOLERANCE`]). Among compatible modes the matcher prefers, in
//! order: matching orientation, smaller pixel area, lower maximum frame rate,
//! earlier catalog position. The result depends only on the video and the
//! catalog.

use super::{CalibrationCatalog, CalibrationProfile, Orientation, VideoMode};
use crate::error::{CoreError, CoreResult};
use crate::media::VideoInfo;

use std::cmp::Ordering;

/// Maximum relative difference between mode and video aspect ratios.
pub const ASPECT_TOLERANCE: f64 = 0.03;

/// Allowed relative excess of the video frame rate over the mode maximum.
pub const FRAME_RATE_TOLERANCE: f64 = 0.01;

/// Picks calibration profiles from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationMatcher<'a> {
    catalog: &'a CalibrationCatalog,
}

impl<'a> CalibrationMatcher<'a> {
    pub fn new(catalog: &'a CalibrationCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the best-covering profile for `info`, or
    /// [`CoreError::NoCalibrationMatch`] when no mode is compatible.
    pub fn find_calibration(&self, info: &VideoInfo) -> CoreResult<&'a CalibrationProfile> {
        let (width, height) = info.display_dimensions();
        let fps = info.frame_rate.as_f64();
        let orientation = Orientation::of(width, height);

        let best = self
            .catalog
            .profiles()
            .iter()
            .enumerate()
            .filter(|(_, profile)| is_compatible(&profile.video_mode, width, height, fps))
            .min_by(|(ia, a), (ib, b)| {
                let mismatch_a = a.video_mode.orientation() != orientation;
                let mismatch_b = b.video_mode.orientation() != orientation;
                mismatch_a
                    .cmp(&mismatch_b)
                    .then_with(|| a.video_mode.pixel_area().cmp(&b.video_mode.pixel_area()))
                    .then_with(|| {
                        a.video_mode
                            .max_frame_rate
                            .total_cmp(&b.video_mode.max_frame_rate)
                    })
                    .then_with(|| ia.cmp(ib))
            })
            .map(|(_, profile)| profile);

        match best {
            Some(profile) => {
                log::debug!(
                    "Calibration '{}' selected for {} ({}x{} @ {} fps)",
                    profile.id,
                    info.source_path.display(),
                    width,
                    height,
                    info.frame_rate
                );
                Ok(profile)
            }
            None => Err(CoreError::NoCalibrationMatch {
                width: info.width,
                height: info.height,
                frame_rate: info.frame_rate.to_string(),
                rotation: info.rotation.degrees(),
            }),
        }
    }
}

fn is_compatible(mode: &VideoMode, width: u32, height: u32, fps: f64) -> bool {
    let long = width.max(height);
    let short = width.min(height);
    if short == 0 || mode.long_side() < long || mode.short_side() < short {
        return false;
    }

    let video_aspect = f64::from(long) / f64::from(short);
    let mode_aspect = f64::from(mode.long_side()) / f64::from(mode.short_side());
    if (mode_aspect - video_aspect).abs() / video_aspect > ASPECT_TOLERANCE {
        return false;
    }

    matches!(
        fps.partial_cmp(&(mode.max_frame_rate * (1.0 + FRAME_RATE_TOLERANCE))),
        Some(Ordering::Less | Ordering::Equal)
    )
}
