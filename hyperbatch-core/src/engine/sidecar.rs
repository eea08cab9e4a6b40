// ============================================================================
// hyperbatch-core/src/engine/sidecar.rs
// ============================================================================
//
// FFMPEG ENGINE: ProcessingEngine Backed by ffmpeg-sidecar
//
// Each submission spawns one ffmpeg process on the calling thread, so launch
// failures surface as errors from `start`. A worker thread then drains the
// ffmpeg event stream, forwards progress, waits for the exit status and
// delivers exactly one terminal event:
//
// - exit status 0              -> Finished
// - terminated by a signal     -> Cancelled
// - any other exit or failure  -> Failed(message)
//
// Parameter mapping: lens correction from the calibration, frame-range trim
// when bounded, deshake for advanced smoothing, setpts for the speedup, the
// output frame rate and size, target bitrate, and the rotation tag. Input
// autorotation is disabled so the stored pixels and the rotation tag stay
// consistent.

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

// ---- External crate imports ----
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

// ---- Internal crate imports ----
use super::{EngineEvent, EngineNotifier, ProcessingEngine};
use crate::error::{CoreError, CoreResult};
use crate::external::check_dependency;
use crate::parameters::ProcessingParameters;
use crate::utils::parse_ffmpeg_time;

/// Default name of the ffmpeg executable looked up on `PATH`.
pub const FFMPEG_BINARY: &str = "ffmpeg";

/// Software H.264 encoder.
pub const SOFTWARE_ENCODER: &str = "libx264";

/// Platform hardware H.264 encoder.
pub const HARDWARE_ENCODER: &str = if cfg!(target_os = "macos") {
    "h264_videotoolbox"
} else {
    "h264_nvenc"
};

/// Minimum change in percent between two progress notifications.
const PROGRESS_STEP: f32 = 1.0;

// ============================================================================
// FILTER CHAIN
// ============================================================================

/// Builder for constructing video filter chains
#[derive(Default)]
struct VideoFilterChain {
    filters: Vec<String>,
}

impl VideoFilterChain {
    fn new() -> Self {
        Self::default()
    }

    fn add_filter(mut self, filter: String) -> Self {
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    fn add_filter_if(self, condition: bool, filter: impl FnOnce() -> String) -> Self {
        if condition { self.add_filter(filter()) } else { self }
    }

    fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Video filter graph for one submission.
pub fn filter_chain(params: &ProcessingParameters<'_>) -> String {
    let range = params.frame_range;
    let lens = params.calibration.lens;

    VideoFilterChain::new()
        .add_filter_if(!range.is_whole_video(), || match range.end {
            Some(end) => format!("trim=start_frame={}:end_frame={}", range.start, end),
            None => format!("trim=start_frame={}", range.start),
        })
        .add_filter_if(!lens.is_identity(), || {
            format!(
                "lenscorrection=cx={}:cy={}:k1={}:k2={}",
                lens.cx, lens.cy, lens.k1, lens.k2
            )
        })
        .add_filter_if(params.features.advanced_smoothing, || "deshake".to_string())
        .add_filter(format!("setpts=(PTS-STARTPTS)/{}", params.speedup_factor))
        .add_filter(format!("fps={}", params.output_frame_rate))
        .add_filter(format!("scale={}:{}", params.output_width, params.output_height))
        .build()
        .unwrap_or_default()
}

/// Full ffmpeg argument list (without the binary) for one submission.
pub fn hyperlapse_args(params: &ProcessingParameters<'_>) -> Vec<String> {
    let encoder = if params.features.hardware_encoder {
        HARDWARE_ENCODER
    } else {
        SOFTWARE_ENCODER
    };

    let mut args: Vec<String> = ["-hide_banner", "-y", "-noautorotate", "-i"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(params.input_path.to_string_lossy().into_owned());

    args.extend([
        "-vf".to_string(),
        filter_chain(params),
        "-an".to_string(),
        "-c:v".to_string(),
        encoder.to_string(),
        "-b:v".to_string(),
        params.output_bitrate.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]);

    let degrees = params.output_rotation.degrees();
    if degrees != 0 {
        args.push("-metadata:s:v:0".to_string());
        args.push(format!("rotate={degrees}"));
    }

    args.push(params.output_path.to_string_lossy().into_owned());
    args
}

// ============================================================================
// ENGINE
// ============================================================================

/// [`ProcessingEngine`] that renders hyperlapses with ffmpeg.
pub struct SidecarEngine {
    binary: PathBuf,
    worker: Option<JoinHandle<()>>,
}

impl SidecarEngine {
    /// Engine using `ffmpeg` from `PATH`.
    pub fn new() -> CoreResult<Self> {
        Self::with_binary(FFMPEG_BINARY)
    }

    /// Engine using an explicit ffmpeg binary. Fails with
    /// [`CoreError::EngineUnavailable`] when the binary cannot be run.
    pub fn with_binary(binary: impl Into<PathBuf>) -> CoreResult<Self> {
        let binary = binary.into();
        check_dependency(&binary.to_string_lossy())
            .map_err(|e| CoreError::EngineUnavailable(e.to_string()))?;
        log::debug!("Using ffmpeg engine at {}", binary.display());
        Ok(Self {
            binary,
            worker: None,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn build_command(&self, params: &ProcessingParameters<'_>) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new_with_path(&self.binary);
        cmd.args(hyperlapse_args(params));
        cmd
    }

    fn join_worker(&mut self) -> CoreResult<()> {
        match self.worker.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CoreError::OperationFailed("ffmpeg worker thread panicked".to_string())),
            None => Ok(()),
        }
    }
}

impl ProcessingEngine for SidecarEngine {
    fn start(&mut self, params: &ProcessingParameters<'_>, notifier: EngineNotifier) -> CoreResult<()> {
        // The previous worker has already delivered its terminal event.
        self.join_worker()?;

        let mut cmd = self.build_command(params);
        log::debug!("FFmpeg command: {:?}", cmd);

        let child = cmd.spawn().map_err(|e| CoreError::EngineStart {
            path: params.input_path.clone(),
            reason: format!("failed to start ffmpeg: {e}"),
        })?;

        let duration = params.source_duration_secs.filter(|d| *d > 0.0);
        if duration.is_none() {
            log::warn!(
                "Duration of {} unknown; progress will not be reported.",
                notifier.file_name()
            );
        }
        let speedup = params.speedup_factor;
        let encoder = if params.features.hardware_encoder {
            HARDWARE_ENCODER
        } else {
            SOFTWARE_ENCODER
        };
        notifier.notify(EngineEvent::TrialStatusChanged {
            message: format!("encoding with {encoder}"),
        });

        let handle = thread::Builder::new()
            .name("hyperbatch-ffmpeg".to_string())
            .spawn(move || run_worker(child, notifier, duration, speedup))
            .map_err(|e| CoreError::EngineStart {
                path: params.input_path.clone(),
                reason: format!("failed to spawn worker thread: {e}"),
            })?;
        self.worker = Some(handle);
        Ok(())
    }

    fn dispose(&mut self) -> CoreResult<()> {
        self.join_worker()?;
        log::debug!("ffmpeg engine released");
        Ok(())
    }
}

impl Drop for SidecarEngine {
    fn drop(&mut self) {
        let _ = self.join_worker();
    }
}

/// Drains ffmpeg events and reports the single terminal outcome.
fn run_worker(mut child: FfmpegChild, notifier: EngineNotifier, duration: Option<f64>, speedup: u32) {
    let mut last_error: Option<String> = None;
    let mut last_percent = -PROGRESS_STEP;

    match child.iter() {
        Ok(events) => {
            for event in events {
                match event {
                    FfmpegEvent::Progress(progress) => {
                        let (Some(total), Some(out_secs)) = (duration, parse_ffmpeg_time(&progress.time)) else {
                            continue;
                        };
                        let percent = (out_secs * f64::from(speedup) / total * 100.0).min(100.0) as f32;
                        if percent - last_percent >= PROGRESS_STEP || (percent >= 100.0 && last_percent < 100.0) {
                            notifier.progress(percent);
                            last_percent = percent;
                        }
                    }
                    FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) | FfmpegEvent::Error(message) => {
                        log::debug!("ffmpeg: {}", message);
                        last_error = Some(message);
                    }
                    FfmpegEvent::Log(_, message) => log::trace!("ffmpeg: {}", message),
                    _ => {}
                }
            }
        }
        Err(e) => {
            let _ = child.kill();
            last_error = Some(format!("failed to read ffmpeg output: {e}"));
        }
    }

    match child.wait() {
        Ok(status) if status.success() => notifier.finished(),
        Ok(status) => match status.code() {
            None => notifier.cancelled(),
            Some(code) => notifier.failed(match last_error {
                Some(message) => format!("ffmpeg exited with code {code}: {message}"),
                None => format!("ffmpeg exited with code {code}"),
            }),
        },
        Err(e) => notifier.failed(format!("failed to wait for ffmpeg: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationProfile, LensCalibration, VideoMode};
    use crate::media::{FrameRate, Rotation};
    use crate::parameters::{FIXED_FEATURE_FLAGS, FrameRange, file_uri};

    fn profile(lens: LensCalibration) -> CalibrationProfile {
        CalibrationProfile::new("cam", "test", VideoMode::new(1920, 1080, 60.0), lens)
    }

    fn params(calibration: &CalibrationProfile) -> ProcessingParameters<'_> {
        let input = PathBuf::from("/videos/a.mp4");
        ProcessingParameters {
            calibration,
            frame_range: FrameRange::WHOLE_VIDEO,
            video_mode: &calibration.video_mode,
            input_frame_rate: FrameRate::from_integer(30),
            output_frame_rate: FrameRate::from_integer(30),
            output_width: 1920,
            output_height: 1080,
            output_rotation: Rotation::None,
            output_bitrate: 8_000_000,
            speedup_factor: 10,
            input_uri: file_uri(&input).unwrap(),
            input_path: input,
            output_path: PathBuf::from("/videos/Output/a.mp4"),
            temp_dir: PathBuf::from("/videos/Output"),
            credit_length: 0,
            features: FIXED_FEATURE_FLAGS,
            source_duration_secs: Some(60.0),
        }
    }

    #[test]
    fn default_filter_chain() {
        let calibration = profile(LensCalibration::radial(-0.2, 0.05));
        let chain = filter_chain(&params(&calibration));
        assert_eq!(
            chain,
            "lenscorrection=cx=0.5:cy=0.5:k1=-0.2:k2=0.05,setpts=(PTS-STARTPTS)/10,fps=30,scale=1920:1080"
        );
    }

    #[test]
    fn bounded_range_and_smoothing() {
        let calibration = profile(LensCalibration::none());
        let mut p = params(&calibration);
        p.frame_range = FrameRange {
            start: 30,
            end: Some(300),
        };
        p.features.advanced_smoothing = true;
        p.output_frame_rate = FrameRate::new(30000, 1001).unwrap();

        let chain = filter_chain(&p);
        assert_eq!(
            chain,
            "trim=start_frame=30:end_frame=300,deshake,setpts=(PTS-STARTPTS)/10,fps=30000/1001,scale=1920:1080"
        );
    }

    #[test]
    fn args_carry_bitrate_encoder_and_rotation() {
        let calibration = profile(LensCalibration::none());
        let mut p = params(&calibration);
        p.output_rotation = Rotation::Clockwise90;

        let args = hyperlapse_args(&p);
        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();

        assert_eq!(args[pos("-i") + 1], "/videos/a.mp4");
        assert_eq!(args[pos("-b:v") + 1], "8000000");
        assert_eq!(args[pos("-c:v") + 1], SOFTWARE_ENCODER);
        assert_eq!(args[pos("-metadata:s:v:0") + 1], "rotate=90");
        assert!(args.contains(&"-an".to_string()));
        assert!(pos("-noautorotate") < pos("-i"));
        assert_eq!(args.last().unwrap(), "/videos/Output/a.mp4");

        p.features.hardware_encoder = true;
        p.output_rotation = Rotation::None;
        let args = hyperlapse_args(&p);
        assert!(args.contains(&HARDWARE_ENCODER.to_string()));
        assert!(!args.contains(&"-metadata:s:v:0".to_string()));
    }

    #[test]
    fn missing_binary_is_engine_unavailable() {
        let result = SidecarEngine::with_binary("/nonexistent/hyperbatch/ffmpeg");
        assert!(matches!(result, Err(CoreError::EngineUnavailable(_))));
    }
}
