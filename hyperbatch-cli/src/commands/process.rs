//! Implementation of the batch run.
//!
//! Turns command-line arguments into a `CoreConfig`, wires up the ffprobe
//! reader, the ffmpeg engine and progress rendering, and hands the directory
//! to `hyperbatch_core::process_directory`.

use crate::cli::ProcessArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::progress::CliProgressHandler;
use crate::terminal;

use hyperbatch_core::calibration::CalibrationCatalog;
use hyperbatch_core::engine::SidecarEngine;
use hyperbatch_core::engine::sidecar::FFMPEG_BINARY;
use hyperbatch_core::events::{EventDispatcher, JsonProgressHandler};
use hyperbatch_core::media::FfprobeInfoReader;
use hyperbatch_core::media::probe::Ffprobe;
use hyperbatch_core::{BatchSummary, CoreConfig, CoreConfigBuilder, CoreError, FileErrorPolicy};

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};

/// Builds the core configuration from parsed arguments.
pub fn config_from_args(args: &ProcessArgs) -> CliResult<CoreConfig> {
    let policy = if args.abort_on_file_error {
        FileErrorPolicy::AbortBatch
    } else {
        FileErrorPolicy::Skip
    };

    let mut builder = CoreConfigBuilder::new()
        .input_dir(args.input_dir.clone())
        .speedup_factor(args.speedup)
        .output_subdir(&args.output_subdir)
        .file_error_policy(policy);
    if let Some(fps) = args.output_fps {
        builder = builder.output_frame_rate(fps);
    }
    if let Some(path) = &args.calibration_catalog {
        builder = builder.calibration_catalog(path.clone());
    }
    if let Some(path) = &args.ffmpeg {
        builder = builder.ffmpeg_path(path.clone());
    }
    if let Some(path) = &args.ffprobe {
        builder = builder.ffprobe_path(path.clone());
    }
    builder.build()
}

/// Hint printed under a fatal error.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DirectoryNotFound(_) => Some("Check the --input-dir path"),
        CoreError::NoFilesFound => {
            Some("Only .mp4, .wmv and .mov files directly inside the input directory are processed")
        }
        CoreError::EngineUnavailable(_) | CoreError::DependencyNotFound(_) => {
            Some("Install ffmpeg, or point HYPERBATCH_FFMPEG / HYPERBATCH_FFPROBE at the binaries")
        }
        CoreError::BatchAborted { .. } => Some("Drop --abort-on-file-error to skip unreadable files"),
        _ => None,
    }
}

fn print_run_header(config: &CoreConfig, catalog: &CalibrationCatalog) {
    terminal::print_section("Hyperbatch");
    terminal::print_status("Input directory", &config.input_dir.display().to_string(), true);
    terminal::print_status("Speedup", &format!("{}x", config.speedup_factor), true);
    let fps = config
        .output_frame_rate
        .map_or_else(|| "same as input".to_string(), |fps| format!("{fps} fps"));
    terminal::print_status("Output rate", &fps, false);
    terminal::print_status("Output folder", &config.output_subdir, false);
    terminal::print_status("Calibrations", &catalog.len().to_string(), false);
}

/// Runs the whole batch and returns its summary.
///
/// Precondition failures (missing directory, no videos, ffmpeg or ffprobe
/// missing) come back as errors before any file is touched.
pub fn run_process(args: ProcessArgs) -> CliResult<BatchSummary> {
    let config = config_from_args(&args)?;
    debug!("Configuration: {:?}", config);

    let catalog = CalibrationCatalog::load(config.calibration_catalog.as_deref())
        .cli_context("Failed to load calibration catalog")?;

    let ffprobe = match &config.ffprobe_path {
        Some(path) => Ffprobe::with_binary(path.clone()),
        None => Ffprobe::new(),
    };
    let reader = FfprobeInfoReader::new(ffprobe);
    let ffmpeg = config
        .ffmpeg_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(FFMPEG_BINARY));

    let mut dispatcher = EventDispatcher::new();
    if args.json_progress {
        dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
    } else {
        dispatcher.add_handler(Arc::new(CliProgressHandler::new()));
    }

    print_run_header(&config, &catalog);

    let summary = hyperbatch_core::process_directory(
        &config,
        &reader,
        &catalog,
        Arc::new(dispatcher),
        || {
            reader.ffprobe().check_available()?;
            SidecarEngine::with_binary(ffmpeg)
        },
    )?;

    info!(
        "Batch finished: {} of {} files succeeded",
        summary.succeeded(),
        summary.total()
    );
    Ok(summary)
}
