//! Reading [`VideoInfo`] from input files.
//!
//! The batch driver only depends on the [`VideoInfoReader`] trait. The
//! production implementation, [`FfprobeInfoReader`], runs ffprobe and extracts
//! the first real video stream of its JSON report.

use super::probe::Ffprobe;
use super::{FrameRate, Rotation, VideoInfo};
use crate::error::{CoreResult, metadata_error};

use serde_json::Value;

use std::path::Path;

/// Extracts intrinsic metadata from a video file.
pub trait VideoInfoReader {
    /// Reads metadata for `path`. Fails with
    /// [`CoreError::MetadataRead`](crate::CoreError::MetadataRead) when the
    /// file is missing, unreadable or has no usable video stream.
    fn read_info(&self, path: &Path) -> CoreResult<VideoInfo>;
}

/// [`VideoInfoReader`] backed by ffprobe.
#[derive(Debug, Clone, Default)]
pub struct FfprobeInfoReader {
    ffprobe: Ffprobe,
}

impl FfprobeInfoReader {
    pub fn new(ffprobe: Ffprobe) -> Self {
        Self { ffprobe }
    }

    pub fn ffprobe(&self) -> &Ffprobe {
        &self.ffprobe
    }
}

impl VideoInfoReader for FfprobeInfoReader {
    fn read_info(&self, path: &Path) -> CoreResult<VideoInfo> {
        let report = self.ffprobe.execute(path)?;
        let info = video_info_from_probe(path, &report)?;
        log::debug!(
            "Probed {}: {}x{} @ {} fps, {} bps, rotation {}",
            path.display(),
            info.width,
            info.height,
            info.frame_rate,
            info.bits_per_second,
            info.rotation
        );
        Ok(info)
    }
}

/// Builds a [`VideoInfo`] from an ffprobe JSON report
/// (`-show_format -show_streams`).
pub fn video_info_from_probe(path: &Path, report: &Value) -> CoreResult<VideoInfo> {
    let streams = report
        .get("streams")
        .and_then(Value::as_array)
        .ok_or_else(|| metadata_error(path, "ffprobe report has no streams"))?;

    let stream = streams
        .iter()
        .find(|s| is_video_stream(s))
        .ok_or_else(|| metadata_error(path, "no video stream found"))?;
    let format = report.get("format");

    let width = positive_u32(stream.get("width"))
        .ok_or_else(|| metadata_error(path, "video stream missing width"))?;
    let height = positive_u32(stream.get("height"))
        .ok_or_else(|| metadata_error(path, "video stream missing height"))?;

    let frame_rate = ["r_frame_rate", "avg_frame_rate"]
        .iter()
        .filter_map(|key| stream.get(*key).and_then(Value::as_str))
        .find_map(|rate| rate.parse::<FrameRate>().ok())
        .ok_or_else(|| metadata_error(path, "video stream has no usable frame rate"))?;

    let duration_secs = format
        .and_then(|f| number_field(f.get("duration")))
        .or_else(|| number_field(stream.get("duration")))
        .filter(|d| *d > 0.0);

    let bits_per_second = number_field(stream.get("bit_rate"))
        .or_else(|| format.and_then(|f| number_field(f.get("bit_rate"))))
        .or_else(|| {
            let size = format.and_then(|f| number_field(f.get("size")))?;
            duration_secs.map(|d| size * 8.0 / d)
        })
        .filter(|bps| *bps >= 1.0)
        .map(|bps| bps.round() as u64)
        .ok_or_else(|| metadata_error(path, "unable to determine video bitrate"))?;

    let mut info = VideoInfo::new(
        path,
        width,
        height,
        frame_rate,
        bits_per_second,
        stream_rotation(stream),
    );
    info.duration_secs = duration_secs;
    Ok(info)
}

/// A video stream that is not an embedded cover image.
fn is_video_stream(stream: &Value) -> bool {
    let is_video = stream.get("codec_type").and_then(Value::as_str) == Some("video");
    let attached_pic = stream
        .get("disposition")
        .and_then(|d| d.get("attached_pic"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    is_video && attached_pic == 0
}

/// Rotation from the legacy `rotate` tag, or from display-matrix side data.
///
/// Display-matrix rotation is counter-clockwise, the tag is clockwise.
fn stream_rotation(stream: &Value) -> Rotation {
    if let Some(degrees) = stream
        .get("tags")
        .and_then(|t| t.get("rotate"))
        .and_then(|r| number_field(Some(r)))
    {
        return Rotation::from_degrees(degrees);
    }

    stream
        .get("side_data_list")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(|side_data| number_field(side_data.get("rotation")))
        .map_or(Rotation::None, |degrees| Rotation::from_degrees(-degrees))
}

/// ffprobe reports most numbers as strings; accept both forms.
fn number_field(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn positive_u32(value: Option<&Value>) -> Option<u32> {
    value?
        .as_u64()
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}
