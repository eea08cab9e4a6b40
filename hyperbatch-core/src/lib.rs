//! Core library for batch hyperlapse processing through an external engine.
//!
//! This crate discovers input videos in a directory, reads their metadata,
//! picks a camera calibration and target bitrate for each, and drives a
//! [`ProcessingEngine`](engine::ProcessingEngine) through them strictly one
//! file at a time.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use hyperbatch_core::{CoreConfig, process_directory};
//! use hyperbatch_core::calibration::CalibrationCatalog;
//! use hyperbatch_core::engine::SidecarEngine;
//! use hyperbatch_core::events::EventDispatcher;
//! use hyperbatch_core::media::FfprobeInfoReader;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::new(PathBuf::from("/path/to/videos"), 10);
//! config.validate().unwrap();
//!
//! let catalog = CalibrationCatalog::builtin();
//! let reader = FfprobeInfoReader::default();
//!
//! let summary = process_directory(
//!     &config,
//!     &reader,
//!     &catalog,
//!     Arc::new(EventDispatcher::new()),
//!     SidecarEngine::new,
//! )
//! .unwrap();
//! println!("{} of {} succeeded", summary.succeeded(), summary.total());
//! ```

pub mod batch;
pub mod bitrate;
pub mod calibration;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod events;
pub mod external;
pub mod media;
pub mod output;
pub mod parameters;
pub mod reporting;
pub mod utils;

// Re-exports for public API
pub use batch::{BatchDriver, BatchItem, BatchJob, DriverState};
pub use bitrate::BitrateEstimator;
pub use config::{CoreConfig, CoreConfigBuilder, FileErrorPolicy};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use parameters::{ParameterBuilder, ProcessingParameters};
pub use reporting::{BatchSummary, FileResult, FileStatus};
pub use utils::{format_duration, parse_ffmpeg_time};

use calibration::CalibrationCatalog;
use engine::ProcessingEngine;
use events::EventDispatcher;
use media::VideoInfoReader;

use std::sync::Arc;

/// Processes every video in `config.input_dir`.
///
/// Checks run in this order, each aborting the batch before any file is
/// touched: configuration, input directory, file discovery, engine
/// creation through `engine_factory`. After that, per-file problems are
/// handled by the driver according to `config.file_error_policy`.
///
/// # Errors
///
/// * Any precondition error (see [`CoreError::is_precondition`])
/// * `CoreError::Config` - If the configuration is invalid
/// * `CoreError::BatchAborted` - If the abort policy stopped the batch
pub fn process_directory<E, R, F>(
    config: &CoreConfig,
    reader: &R,
    catalog: &CalibrationCatalog,
    events: Arc<EventDispatcher>,
    engine_factory: F,
) -> CoreResult<BatchSummary>
where
    E: ProcessingEngine,
    R: VideoInfoReader + ?Sized,
    F: FnOnce() -> CoreResult<E>,
{
    config.validate()?;

    let files = find_processable_files(&config.input_dir)?;
    let job = BatchJob::from_files(
        &files,
        &config.output_subdir,
        config.speedup_factor,
        config.output_frame_rate,
    )?;

    let engine = engine_factory()?;

    let estimator = BitrateEstimator::new();
    let builder = ParameterBuilder::new(reader, catalog, &estimator);
    BatchDriver::new(engine, builder)
        .with_policy(config.file_error_policy)
        .with_events(events)
        .run(&job)
}
