//! Output bitrate estimation.
//!
//! The target bitrate scales with the pixel rate: output area over input area
//! times output frame rate over input frame rate. The arithmetic is exact
//! (integers and rationals in `u128`) and rounds half up, so identical input
//! and output geometry returns the input bitrate unchanged.

use crate::media::FrameRate;

/// Smallest bitrate ever returned.
pub const MIN_BITRATE_BPS: u64 = 1;

/// Stateless bitrate estimator, shared read-only for a whole batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitrateEstimator;

impl BitrateEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimates the output bitrate in bits per second.
    ///
    /// `output_fps` defaults to `input_fps`. A zero input area leaves the
    /// bitrate unscaled. The result is never below [`MIN_BITRATE_BPS`].
    ///
    /// ```rust
    /// use hyperbatch_core::bitrate::BitrateEstimator;
    /// use hyperbatch_core::media::FrameRate;
    ///
    /// let fps = FrameRate::from_integer(30);
    /// let bps = BitrateEstimator::new().estimate(8_000_000, 1920, 1080, 960, 540, fps, None);
    /// assert_eq!(bps, 2_000_000);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn estimate(
        &self,
        input_bps: u64,
        input_width: u32,
        input_height: u32,
        output_width: u32,
        output_height: u32,
        input_fps: FrameRate,
        output_fps: Option<FrameRate>,
    ) -> u64 {
        let output_fps = output_fps.unwrap_or(input_fps);

        let input_area = u128::from(input_width) * u128::from(input_height);
        if input_area == 0 {
            return input_bps.max(MIN_BITRATE_BPS);
        }
        let output_area = u128::from(output_width) * u128::from(output_height);

        // bps * (out_area / in_area) * ((out_num / out_den) / (in_num / in_den))
        let numerator = u128::from(input_bps)
            * output_area
            * u128::from(output_fps.numerator())
            * u128::from(input_fps.denominator());
        let denominator = input_area
            * u128::from(output_fps.denominator())
            * u128::from(input_fps.numerator());

        let rounded = (numerator + denominator / 2) / denominator;
        u64::try_from(rounded)
            .unwrap_or(u64::MAX)
            .max(MIN_BITRATE_BPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps(num: u32, den: u32) -> FrameRate {
        FrameRate::new(num, den).unwrap()
    }

    #[test]
    fn identity_is_exact() {
        let est = BitrateEstimator::new();
        let ntsc = fps(30000, 1001);
        assert_eq!(est.estimate(17_123_457, 3840, 2160, 3840, 2160, ntsc, None), 17_123_457);
        assert_eq!(est.estimate(17_123_457, 3840, 2160, 3840, 2160, ntsc, Some(ntsc)), 17_123_457);
    }

    #[test]
    fn scales_with_area_and_frame_rate() {
        let est = BitrateEstimator::new();
        let thirty = FrameRate::from_integer(30);
        assert_eq!(est.estimate(8_000_000, 1920, 1080, 960, 540, thirty, None), 2_000_000);
        assert_eq!(
            est.estimate(8_000_000, 1920, 1080, 1920, 1080, thirty, Some(FrameRate::from_integer(60))),
            16_000_000
        );
        assert_eq!(
            est.estimate(8_000_000, 1920, 1080, 1920, 1080, fps(60, 1), Some(fps(30000, 1001))),
            3_996_004 // 8e6 * 30000 / 60060 = 3996003.996
        );
    }

    #[test]
    fn monotonic_in_area() {
        let est = BitrateEstimator::new();
        let thirty = FrameRate::from_integer(30);
        let single = est.estimate(5_000_000, 1280, 720, 1280, 720, thirty, None);
        let double = est.estimate(5_000_000, 1280, 720, 2560, 720, thirty, None);
        assert_eq!(double, 2 * single);
    }

    #[test]
    fn never_zero() {
        let est = BitrateEstimator::new();
        let thirty = FrameRate::from_integer(30);
        assert_eq!(est.estimate(1, 3840, 2160, 2, 2, thirty, None), 1);
        assert_eq!(est.estimate(0, 1920, 1080, 1920, 1080, thirty, None), 1);
        assert_eq!(est.estimate(4_000, 0, 0, 640, 480, thirty, None), 4_000);
    }

    #[test]
    fn rounds_half_up() {
        let est = BitrateEstimator::new();
        let one = FrameRate::from_integer(1);
        // 3 * 1 / 2 = 1.5
        assert_eq!(est.estimate(3, 2, 1, 1, 1, one, None), 2);
        // 5 * 1 / 4 = 1.25
        assert_eq!(est.estimate(5, 4, 1, 1, 1, one, None), 1);
    }
}
