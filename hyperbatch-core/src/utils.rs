//! Utility functions for formatting and file operations.
//!
//! General-purpose helpers used throughout the hyperbatch-core library:
//! duration and bitrate formatting, ffmpeg time parsing, and file names.

use std::path::Path;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats a bitrate with decimal units (bps, kbps, Mbps).
#[must_use]
pub fn format_bitrate(bits_per_second: u64) -> String {
    const KBPS: f64 = 1_000.0;
    const MBPS: f64 = 1_000_000.0;

    let bps = bits_per_second as f64;
    if bps >= MBPS {
        format!("{:.2} Mbps", bps / MBPS)
    } else if bps >= KBPS {
        format!("{:.1} kbps", bps / KBPS)
    } else {
        format!("{bits_per_second} bps")
    }
}

/// Parses FFmpeg time string (HH:MM:SS.MS) to seconds. Returns None if invalid.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let time = time.trim();
    // ffmpeg reports negative times before the first frame
    if time.starts_with('-') {
        return None;
    }
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        let total = hours * 3600.0 + minutes * 60.0 + seconds;
        (total.is_finite() && total >= 0.0).then_some(total)
    } else {
        None
    }
}

/// Safely extracts filename from a path with consistent error handling.
/// Returns the filename as a String, or an error if the path has no filename component.
pub fn get_filename_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// File name for log lines; falls back to the full path.
#[must_use]
pub fn display_name(path: &Path) -> String {
    get_filename_safe(path).unwrap_or_else(|_| path.display().to_string())
}
