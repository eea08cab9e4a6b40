// ============================================================================
// hyperbatch-core/src/batch.rs
// ============================================================================
//
// BATCH DRIVER: Sequential, Single-flight Processing of a File List
//
// The driver walks a BatchJob top to bottom. For each file it prepares the
// output folder and the ProcessingParameters, submits them to the engine and
// blocks until the engine reports exactly one terminal outcome. Only then is
// the next file prepared, so at most one file is ever in flight.
//
// State sequence per file:
//
//   PreparingFile -> Submitted -> AwaitingCompletion -> Finished|Failed|Cancelled
//
// and Done once every file has passed a completion state.
//
// Engine failures and cancellations are recorded and the batch continues.
// Preparation failures follow the configured FileErrorPolicy.

// ---- Standard library imports ----
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

// ---- Internal crate imports ----
use crate::config::FileErrorPolicy;
use crate::engine::{CompletionSignal, EngineNotifier, EngineOutcome, ProcessingEngine};
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::media::{FrameRate, VideoInfoReader};
use crate::output::{ensure_output_dir, resolve_output_path};
use crate::parameters::ParameterBuilder;
use crate::reporting::{BatchSummary, FileResult, FileStatus};
use crate::utils::{display_name, format_bitrate};

// ============================================================================
// BATCH JOB
// ============================================================================

/// One input file and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Ordered list of files plus the settings shared by all of them.
#[derive(Debug, Clone)]
pub struct BatchJob {
    items: Vec<BatchItem>,
    speedup_factor: u32,
    output_frame_rate: Option<FrameRate>,
}

impl BatchJob {
    pub fn new(
        items: Vec<BatchItem>,
        speedup_factor: u32,
        output_frame_rate: Option<FrameRate>,
    ) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::NoFilesFound);
        }
        if speedup_factor == 0 {
            return Err(CoreError::Config("speedup factor must be at least 1".to_string()));
        }
        Ok(Self {
            items,
            speedup_factor,
            output_frame_rate,
        })
    }

    /// Pairs each input with its output under `output_subdir`, keeping order.
    pub fn from_files(
        files: &[PathBuf],
        output_subdir: &str,
        speedup_factor: u32,
        output_frame_rate: Option<FrameRate>,
    ) -> CoreResult<Self> {
        let items = files
            .iter()
            .map(|input| {
                Ok(BatchItem {
                    input: input.clone(),
                    output: resolve_output_path(input, output_subdir)?,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(items, speedup_factor, output_frame_rate)
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn speedup_factor(&self) -> u32 {
        self.speedup_factor
    }

    pub fn output_frame_rate(&self) -> Option<FrameRate> {
        self.output_frame_rate
    }
}

// ============================================================================
// DRIVER STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    PreparingFile,
    Submitted,
    AwaitingCompletion,
    Finished,
    Failed,
    Cancelled,
    Done,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Idle => "idle",
            DriverState::PreparingFile => "preparing",
            DriverState::Submitted => "submitted",
            DriverState::AwaitingCompletion => "awaiting completion",
            DriverState::Finished => "finished",
            DriverState::Failed => "failed",
            DriverState::Cancelled => "cancelled",
            DriverState::Done => "done",
        };
        f.write_str(name)
    }
}

// ============================================================================
// BATCH DRIVER
// ============================================================================

/// Drives a [`ProcessingEngine`] through a [`BatchJob`], one file at a time.
///
/// The driver owns the engine for the whole run and disposes of it after the
/// last file (or when the batch is aborted).
pub struct BatchDriver<'a, E: ProcessingEngine, R: VideoInfoReader + ?Sized> {
    engine: E,
    builder: ParameterBuilder<'a, R>,
    policy: FileErrorPolicy,
    signal: Arc<CompletionSignal>,
    events: Arc<EventDispatcher>,
    state: DriverState,
}

impl<'a, E: ProcessingEngine, R: VideoInfoReader + ?Sized> BatchDriver<'a, E, R> {
    pub fn new(engine: E, builder: ParameterBuilder<'a, R>) -> Self {
        Self {
            engine,
            builder,
            policy: FileErrorPolicy::default(),
            signal: Arc::new(CompletionSignal::new()),
            events: Arc::new(EventDispatcher::new()),
            state: DriverState::Idle,
        }
    }

    pub fn with_policy(mut self, policy: FileErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// Processes every file of `job` in order and returns the per-file results.
    ///
    /// # Errors
    ///
    /// * `CoreError::BatchAborted` - If a file could not be prepared and the
    ///   policy is [`FileErrorPolicy::AbortBatch`]
    pub fn run(mut self, job: &BatchJob) -> CoreResult<BatchSummary> {
        let batch_start = Instant::now();
        let total_files = job.len();

        log::info!(
            "Processing {} file(s) at {}x speedup",
            total_files,
            job.speedup_factor()
        );
        self.events.emit(Event::BatchStarted {
            total_files,
            speedup_factor: job.speedup_factor(),
            output_frame_rate: job.output_frame_rate(),
        });

        let mut results = Vec::with_capacity(total_files);

        for (index, item) in job.items().iter().enumerate() {
            let file_number = index + 1;
            let name = display_name(&item.input);

            log::info!("[Processing file {} of {}] - {}", file_number, total_files, name);
            self.events.emit(Event::FileStarted {
                file_number,
                total_files,
                input: item.input.clone(),
                output: item.output.clone(),
            });

            let file_start = Instant::now();
            let status = match self.process_file(file_number, &name, item, job) {
                Ok(EngineOutcome::Finished) => {
                    log::info!("Finished {} -> {}", name, item.output.display());
                    FileStatus::Succeeded
                }
                Ok(EngineOutcome::Failed(message)) => {
                    log::error!("Processing failed for {}: {}", name, message);
                    FileStatus::Failed(message)
                }
                Ok(EngineOutcome::Cancelled) => {
                    log::warn!("Processing cancelled for {}", name);
                    FileStatus::Cancelled
                }
                Err(e) => {
                    self.transition(DriverState::Failed);
                    if self.policy == FileErrorPolicy::AbortBatch {
                        log::error!("Aborting batch at {}: {}", name, e);
                        self.release_engine();
                        let completed = BatchSummary::new(results, batch_start.elapsed());
                        log::info!(
                            "{} of {} file(s) succeeded before the abort",
                            completed.succeeded(),
                            total_files
                        );
                        self.events.emit(Event::BatchCompleted {
                            summary: completed.clone(),
                        });
                        return Err(CoreError::BatchAborted {
                            path: item.input.clone(),
                            reason: e.to_string(),
                            completed: Box::new(completed),
                        });
                    }
                    log::warn!("Skipping {}: {}", name, e);
                    FileStatus::Skipped(e.to_string())
                }
            };

            let result = FileResult {
                input: item.input.clone(),
                output: item.output.clone(),
                status,
                elapsed: file_start.elapsed(),
            };
            self.events.emit(Event::FileCompleted {
                file_number,
                total_files,
                result: result.clone(),
            });
            results.push(result);
        }

        self.transition(DriverState::Done);
        self.release_engine();

        let summary = BatchSummary::new(results, batch_start.elapsed());
        self.events.emit(Event::BatchCompleted {
            summary: summary.clone(),
        });
        Ok(summary)
    }

    /// Prepares, submits and awaits one file.
    fn process_file(
        &mut self,
        file_number: usize,
        name: &str,
        item: &BatchItem,
        job: &BatchJob,
    ) -> CoreResult<EngineOutcome> {
        self.transition(DriverState::PreparingFile);
        ensure_output_dir(&item.output)?;
        let params = self.builder.build(
            &item.input,
            &item.output,
            job.speedup_factor(),
            job.output_frame_rate(),
        )?;
        log::debug!(
            "{}: calibration '{}', {} fps -> {} fps, {}",
            name,
            params.calibration.id,
            params.input_frame_rate,
            params.output_frame_rate,
            format_bitrate(params.output_bitrate)
        );

        let generation = self.signal.arm();
        let notifier = EngineNotifier::new(
            Arc::clone(&self.signal),
            generation,
            file_number,
            name,
            Arc::clone(&self.events),
        );

        self.transition(DriverState::Submitted);
        self.engine.start(&params, notifier).map_err(|e| match e {
            CoreError::EngineStart { .. } => e,
            other => CoreError::EngineStart {
                path: item.input.clone(),
                reason: other.to_string(),
            },
        })?;

        self.transition(DriverState::AwaitingCompletion);
        let outcome = self.signal.wait(generation);

        self.transition(match outcome {
            EngineOutcome::Finished => DriverState::Finished,
            EngineOutcome::Failed(_) => DriverState::Failed,
            EngineOutcome::Cancelled => DriverState::Cancelled,
        });
        Ok(outcome)
    }

    fn transition(&mut self, state: DriverState) {
        log::trace!("Driver state: {} -> {}", self.state, state);
        self.state = state;
        self.events.emit(Event::StateChanged { state });
    }

    fn release_engine(&mut self) {
        if let Err(e) = self.engine.dispose() {
            log::warn!("Failed to release processing engine: {}", e);
        }
    }
}
