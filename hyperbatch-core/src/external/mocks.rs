// hyperbatch-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---
// This module is only compiled when the "test-mocks" feature is enabled.
#![cfg(feature = "test-mocks")]

use crate::engine::{EngineEvent, EngineNotifier, ProcessingEngine};
use crate::error::{CoreError, CoreResult, metadata_error};
use crate::media::{VideoInfo, VideoInfoReader};
use crate::parameters::ProcessingParameters;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

// ============================================================================
// VIDEO INFO READER
// ============================================================================

/// Reader returning canned metadata per path. Unknown paths fail with
/// `MetadataRead`, as does any path registered through `with_error`.
#[derive(Debug, Clone, Default)]
pub struct MockVideoInfoReader {
    infos: HashMap<PathBuf, VideoInfo>,
    errors: HashMap<PathBuf, String>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockVideoInfoReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, info: VideoInfo) -> Self {
        self.infos.insert(info.source_path.clone(), info);
        self
    }

    pub fn with_error(mut self, path: impl Into<PathBuf>, reason: &str) -> Self {
        self.errors.insert(path.into(), reason.to_string());
        self
    }

    /// Paths read so far, in order.
    pub fn reads(&self) -> Vec<PathBuf> {
        lock(&self.reads).clone()
    }
}

impl VideoInfoReader for MockVideoInfoReader {
    fn read_info(&self, path: &Path) -> CoreResult<VideoInfo> {
        lock(&self.reads).push(path.to_path_buf());
        if let Some(reason) = self.errors.get(path) {
            return Err(metadata_error(path, reason.as_str()));
        }
        self.infos
            .get(path)
            .cloned()
            .ok_or_else(|| metadata_error(path, "file not found"))
    }
}

// ============================================================================
// PROCESSING ENGINE
// ============================================================================

/// Scripted behaviour for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum MockScript {
    /// Emit these events, in order, from a background thread.
    Events(Vec<EngineEvent>),

    /// Refuse the submission from `start`.
    RejectStart(String),
}

impl MockScript {
    pub fn finish() -> Self {
        MockScript::Events(vec![
            EngineEvent::ProgressChanged { percent: 50.0 },
            EngineEvent::ProgressChanged { percent: 100.0 },
            EngineEvent::Finished,
        ])
    }

    pub fn fail(message: &str) -> Self {
        MockScript::Events(vec![EngineEvent::Failed(message.to_string())])
    }

    pub fn cancel() -> Self {
        MockScript::Events(vec![EngineEvent::Cancelled])
    }

    /// Finishes, then reports a second, conflicting terminal event.
    pub fn finish_twice() -> Self {
        MockScript::Events(vec![
            EngineEvent::Finished,
            EngineEvent::Failed("late duplicate".to_string()),
        ])
    }
}

/// What the mock saw for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_uri: String,
    pub calibration_id: String,
    pub output_bitrate: u64,
    pub output_frame_rate: String,
    pub speedup_factor: u32,
}

#[derive(Debug, Default)]
struct MockEngineState {
    submissions: Vec<SubmittedJob>,
    in_flight: bool,
    overlaps: usize,
    disposed: bool,
    starts_after_dispose: usize,
}

/// Read-only view of a [`MockEngine`]'s record, usable after the engine has
/// been moved into a driver.
#[derive(Debug, Clone)]
pub struct MockEngineHandle {
    state: Arc<Mutex<MockEngineState>>,
}

impl MockEngineHandle {
    pub fn submissions(&self) -> Vec<SubmittedJob> {
        lock(&self.state).submissions.clone()
    }

    pub fn submitted_names(&self) -> Vec<String> {
        self.submissions()
            .iter()
            .map(|s| crate::utils::display_name(&s.input_path))
            .collect()
    }

    /// Number of submissions made while another one was still in flight.
    pub fn overlaps(&self) -> usize {
        lock(&self.state).overlaps
    }

    pub fn disposed(&self) -> bool {
        lock(&self.state).disposed
    }

    pub fn starts_after_dispose(&self) -> usize {
        lock(&self.state).starts_after_dispose
    }
}

/// [`ProcessingEngine`] that plays back a script per input file name.
///
/// Events are delivered from a background thread after a short delay, so the
/// driver really has to wait for them.
pub struct MockEngine {
    scripts: HashMap<String, MockScript>,
    default_script: MockScript,
    delay: Duration,
    state: Arc<Mutex<MockEngineState>>,
    workers: Vec<JoinHandle<()>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_script: MockScript::finish(),
            delay: Duration::from_millis(10),
            state: Arc::new(Mutex::new(MockEngineState::default())),
            workers: Vec::new(),
        }
    }

    /// Scripts the submission whose input file name is `file_name`.
    pub fn with_script(mut self, file_name: &str, script: MockScript) -> Self {
        self.scripts.insert(file_name.to_string(), script);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn handle(&self) -> MockEngineHandle {
        MockEngineHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn record(&self, params: &ProcessingParameters<'_>) {
        let mut state = lock(&self.state);
        if state.in_flight {
            log::error!(
                "MockEngine: {} submitted while another file is in flight",
                params.input_path.display()
            );
            state.overlaps += 1;
        }
        if state.disposed {
            state.starts_after_dispose += 1;
        }
        state.submissions.push(SubmittedJob {
            input_path: params.input_path.clone(),
            output_path: params.output_path.clone(),
            input_uri: params.input_uri.to_string(),
            calibration_id: params.calibration.id.clone(),
            output_bitrate: params.output_bitrate,
            output_frame_rate: params.output_frame_rate.to_string(),
            speedup_factor: params.speedup_factor,
        });
    }
}

impl ProcessingEngine for MockEngine {
    fn start(&mut self, params: &ProcessingParameters<'_>, notifier: EngineNotifier) -> CoreResult<()> {
        self.record(params);

        let name = crate::utils::display_name(&params.input_path);
        let script = self
            .scripts
            .get(&name)
            .cloned()
            .unwrap_or_else(|| self.default_script.clone());

        let events = match script {
            MockScript::RejectStart(reason) => {
                return Err(CoreError::EngineStart {
                    path: params.input_path.clone(),
                    reason,
                });
            }
            MockScript::Events(events) => events,
        };

        lock(&self.state).in_flight = true;
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        self.workers.push(thread::spawn(move || {
            thread::sleep(delay);
            let mut completed = false;
            for event in events {
                if event.outcome().is_some() && !completed {
                    // Cleared before the driver can wake up and submit again.
                    lock(&state).in_flight = false;
                    completed = true;
                }
                notifier.notify(event);
            }
        }));
        Ok(())
    }

    fn dispose(&mut self) -> CoreResult<()> {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        lock(&self.state).disposed = true;
        log::info!("MockEngine: disposed");
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
