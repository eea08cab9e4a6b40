//! Video metadata types and probing.
//!
//! This module defines the intrinsic metadata the batch driver needs about
//! each input file ([`VideoInfo`]) together with the small value types it is
//! built from, and the [`VideoInfoReader`] abstraction used to obtain it.

pub mod probe;
pub mod reader;

pub use reader::{FfprobeInfoReader, VideoInfoReader};

use crate::error::{CoreError, CoreResult};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// FRAME RATE
// ============================================================================

/// A frame rate expressed as an exact rational number of frames per second.
///
/// Values are always stored reduced, so `60/2` and `30/1` compare equal.
///
/// ```rust
/// use hyperbatch_core::media::FrameRate;
///
/// let ntsc: FrameRate = "30000/1001".parse().unwrap();
/// assert!((ntsc.as_f64() - 29.97).abs() < 0.01);
/// assert_eq!("60/2".parse::<FrameRate>().unwrap(), FrameRate::from_integer(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    num: u32,
    den: u32,
}

impl FrameRate {
    /// Creates a frame rate of `num / den` frames per second.
    pub fn new(num: u32, den: u32) -> CoreResult<Self> {
        if num == 0 || den == 0 {
            return Err(CoreError::InvalidFrameRate(format!("{num}/{den}")));
        }
        let divisor = gcd(num, den);
        Ok(Self {
            num: num / divisor,
            den: den / divisor,
        })
    }

    /// Creates a whole-number frame rate. Zero is clamped to one.
    pub fn from_integer(fps: u32) -> Self {
        Self {
            num: fps.max(1),
            den: 1,
        }
    }

    pub fn numerator(&self) -> u32 {
        self.num
    }

    pub fn denominator(&self) -> u32 {
        self.den
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl FromStr for FrameRate {
    type Err = CoreError;

    /// Accepts `"30"`, `"30000/1001"` and decimal forms such as `"29.97"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || CoreError::InvalidFrameRate(s.to_string());

        if let Some((num, den)) = trimmed.split_once('/') {
            let num = num.trim().parse::<u32>().map_err(|_| invalid())?;
            let den = den.trim().parse::<u32>().map_err(|_| invalid())?;
            return FrameRate::new(num, den).map_err(|_| invalid());
        }

        if let Some((whole, frac)) = trimmed.split_once('.') {
            if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let den = 10u32.pow(frac.len() as u32);
            let whole = if whole.is_empty() {
                0
            } else {
                whole.parse::<u32>().map_err(|_| invalid())?
            };
            let frac = frac.parse::<u32>().map_err(|_| invalid())?;
            let num = whole
                .checked_mul(den)
                .and_then(|n| n.checked_add(frac))
                .ok_or_else(invalid)?;
            return FrameRate::new(num, den).map_err(|_| invalid());
        }

        let fps = trimmed.parse::<u32>().map_err(|_| invalid())?;
        FrameRate::new(fps, 1).map_err(|_| invalid())
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

// ============================================================================
// ROTATION
// ============================================================================

/// Clockwise display rotation recorded in the container metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Upside180,
    Clockwise270,
}

impl Rotation {
    /// Normalizes an arbitrary angle in degrees to the nearest quarter turn.
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Rotation::None;
        }
        let quarter_turns = (degrees / 90.0).round() as i64;
        match quarter_turns.rem_euclid(4) {
            1 => Rotation::Clockwise90,
            2 => Rotation::Upside180,
            3 => Rotation::Clockwise270,
            _ => Rotation::None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Upside180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Whether displaying the video swaps its stored width and height.
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

// ============================================================================
// VIDEO INFO
// ============================================================================

/// Intrinsic metadata of one input video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    /// File the metadata was read from
    pub source_path: PathBuf,

    /// Stored frame width in pixels
    pub width: u32,

    /// Stored frame height in pixels
    pub height: u32,

    pub frame_rate: FrameRate,

    /// Video stream bitrate in bits per second
    pub bits_per_second: u64,

    pub rotation: Rotation,

    /// Duration in seconds, when the container reports one
    pub duration_secs: Option<f64>,
}

impl VideoInfo {
    pub fn new(
        source_path: impl AsRef<Path>,
        width: u32,
        height: u32,
        frame_rate: FrameRate,
        bits_per_second: u64,
        rotation: Rotation,
    ) -> Self {
        Self {
            source_path: source_path.as_ref().to_path_buf(),
            width,
            height,
            frame_rate,
            bits_per_second,
            rotation,
            duration_secs: None,
        }
    }

    /// Width and height as the video is displayed, after rotation.
    pub fn display_dimensions(&self) -> (u32, u32) {
        if self.rotation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    pub fn pixel_area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rate_parsing() {
        assert_eq!("30".parse::<FrameRate>().unwrap(), FrameRate::from_integer(30));
        let ntsc = "30000/1001".parse::<FrameRate>().unwrap();
        assert_eq!((ntsc.numerator(), ntsc.denominator()), (30000, 1001));
        assert_eq!("29.97".parse::<FrameRate>().unwrap(), FrameRate::new(2997, 100).unwrap());
        assert_eq!("25.0".parse::<FrameRate>().unwrap(), FrameRate::from_integer(25));
        assert_eq!(" 120/4 ".parse::<FrameRate>().unwrap(), FrameRate::from_integer(30));
    }

    #[test]
    fn frame_rate_rejects_garbage() {
        for input in ["", "abc", "0", "0/1", "30/0", "-30", "1.", "1.2.3", "30/x"] {
            assert!(input.parse::<FrameRate>().is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn frame_rate_display() {
        assert_eq!(FrameRate::from_integer(60).to_string(), "60");
        assert_eq!(FrameRate::new(60000, 1001).unwrap().to_string(), "60000/1001");
    }

    #[test]
    fn rotation_normalization() {
        assert_eq!(Rotation::from_degrees(0.0), Rotation::None);
        assert_eq!(Rotation::from_degrees(90.0), Rotation::Clockwise90);
        assert_eq!(Rotation::from_degrees(-90.0), Rotation::Clockwise270);
        assert_eq!(Rotation::from_degrees(180.0), Rotation::Upside180);
        assert_eq!(Rotation::from_degrees(-180.0), Rotation::Upside180);
        assert_eq!(Rotation::from_degrees(450.0), Rotation::Clockwise90);
        assert_eq!(Rotation::from_degrees(89.6), Rotation::Clockwise90);
        assert_eq!(Rotation::from_degrees(f64::NAN), Rotation::None);
    }

    #[test]
    fn display_dimensions_follow_rotation() {
        let fps = FrameRate::from_integer(30);
        let mut info = VideoInfo::new("a.mp4", 1920, 1080, fps, 8_000_000, Rotation::None);
        assert_eq!(info.display_dimensions(), (1920, 1080));
        info.rotation = Rotation::Clockwise90;
        assert_eq!(info.display_dimensions(), (1080, 1920));
        info.rotation = Rotation::Upside180;
        assert_eq!(info.display_dimensions(), (1920, 1080));
        assert_eq!(info.pixel_area(), 1920 * 1080);
    }
}
