// hyperbatch-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::Parser;
use hyperbatch_core::media::FrameRate;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_SUBDIR};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Hyperbatch: batch hyperlapse tool",
    long_about = "Renders every .mp4, .wmv and .mov file in a directory as a hyperlapse, one file at a time, using ffmpeg via hyperbatch-core."
)]
pub struct Cli {
    #[command(flatten)]
    pub process: ProcessArgs,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// How many times faster the output plays than the input (positive integer)
    #[arg(value_name = "SPEEDUP", value_parser = clap::value_parser!(u32).range(1..))]
    pub speedup: u32,

    /// Directory containing the videos to process
    #[arg(short = 'i', long = "input-dir", value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Folder created next to each input to receive its output
    #[arg(long, value_name = "NAME", default_value = DEFAULT_OUTPUT_SUBDIR)]
    pub output_subdir: String,

    /// Optional: Output frame rate, e.g. 30 or 30000/1001 (defaults to the input's)
    #[arg(long, value_name = "FPS", value_parser = parse_frame_rate)]
    pub output_fps: Option<FrameRate>,

    /// Stop the whole batch when a file cannot be read or matched to a calibration
    #[arg(long, default_value_t = false)]
    pub abort_on_file_error: bool,

    /// Optional: JSON calibration catalog replacing the built-in profiles
    #[arg(long, value_name = "FILE")]
    pub calibration_catalog: Option<PathBuf>,

    /// Optional: ffmpeg binary to render with.
    /// Can also be set via the HYPERBATCH_FFMPEG environment variable.
    #[arg(long, value_name = "PATH", env = "HYPERBATCH_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Optional: ffprobe binary to read metadata with.
    /// Can also be set via the HYPERBATCH_FFPROBE environment variable.
    #[arg(long, value_name = "PATH", env = "HYPERBATCH_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Print batch events as JSON lines on stdout instead of progress bars
    #[arg(long, default_value_t = false)]
    pub json_progress: bool,
}

fn parse_frame_rate(value: &str) -> Result<FrameRate, String> {
    FrameRate::from_str(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_speedup_with_defaults() {
        let cli = Cli::try_parse_from(["hyperbatch", "12"]).unwrap();
        assert_eq!(cli.process.speedup, 12);
        assert_eq!(cli.process.input_dir, PathBuf::from("."));
        assert_eq!(cli.process.output_subdir, "Output");
        assert!(cli.process.output_fps.is_none());
        assert!(!cli.process.abort_on_file_error);
        assert!(!cli.verbose);
    }

    #[test]
    fn rejects_non_integer_speedup() {
        assert!(Cli::try_parse_from(["hyperbatch", "abc"]).is_err());
    }

    #[test]
    fn rejects_zero_speedup() {
        assert!(Cli::try_parse_from(["hyperbatch", "0"]).is_err());
    }

    #[test]
    fn requires_speedup() {
        let err = Cli::try_parse_from(["hyperbatch"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_optional_flags() {
        let cli = Cli::try_parse_from([
            "hyperbatch",
            "8",
            "--input-dir",
            "/videos",
            "--output-fps",
            "30000/1001",
            "--output-subdir",
            "Rendered",
            "--abort-on-file-error",
            "--json-progress",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.process.input_dir, PathBuf::from("/videos"));
        assert_eq!(cli.process.output_fps, FrameRate::new(30000, 1001).ok());
        assert_eq!(cli.process.output_subdir, "Rendered");
        assert!(cli.process.abort_on_file_error);
        assert!(cli.process.json_progress);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_bad_frame_rate() {
        assert!(Cli::try_parse_from(["hyperbatch", "8", "--output-fps", "fast"]).is_err());
    }
}
