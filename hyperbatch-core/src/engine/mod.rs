// ============================================================================
// hyperbatch-core/src/engine/mod.rs
// ============================================================================
//
// PROCESSING ENGINE: Contract Between the Batch Driver and the Engine
//
// The engine processes one file per submission. `start` returns as soon as
// the work is accepted; progress and the single terminal outcome arrive later
// through the EngineNotifier, usually from another thread. The driver blocks
// on the CompletionSignal until that outcome arrives.
//
// KEY COMPONENTS:
// - EngineEvent / EngineOutcome: notifications and terminal outcomes
// - ProcessingEngine: the trait engines implement
// - EngineNotifier: per-submission handle that forwards notifications
// - CompletionSignal (completion): one-shot gate with stale/duplicate filtering
// - SidecarEngine (sidecar): ffmpeg-backed implementation

// ---- Standard library imports ----
use std::fmt;
use std::sync::Arc;

// ---- Internal crate imports ----
use crate::error::CoreResult;
use crate::events::{Event, EventDispatcher};
use crate::parameters::ProcessingParameters;

// ============================================================================
// SUBMODULES
// ============================================================================

pub mod completion;
pub mod sidecar;

pub use completion::{CompletionSignal, SignalResult};
pub use sidecar::SidecarEngine;

// ============================================================================
// EVENTS AND OUTCOMES
// ============================================================================

/// Terminal outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    Finished,
    Failed(String),
    Cancelled,
}

impl fmt::Display for EngineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOutcome::Finished => f.write_str("finished"),
            EngineOutcome::Failed(msg) => write!(f, "failed: {msg}"),
            EngineOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Notification raised by the engine while a submission is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ProgressChanged { percent: f32 },
    TrialStatusChanged { message: String },
    Finished,
    Failed(String),
    Cancelled,
}

impl EngineEvent {
    /// The terminal outcome carried by this event, if any.
    pub fn outcome(&self) -> Option<EngineOutcome> {
        match self {
            EngineEvent::Finished => Some(EngineOutcome::Finished),
            EngineEvent::Failed(msg) => Some(EngineOutcome::Failed(msg.clone())),
            EngineEvent::Cancelled => Some(EngineOutcome::Cancelled),
            EngineEvent::ProgressChanged { .. } | EngineEvent::TrialStatusChanged { .. } => None,
        }
    }
}

// ============================================================================
// ENGINE TRAIT
// ============================================================================

/// External processing engine driven one file at a time.
///
/// Implementations must deliver exactly one terminal event (`Finished`,
/// `Failed` or `Cancelled`) through the notifier for every accepted
/// submission. Returning an error from `start` means nothing was accepted
/// and no terminal event will follow.
pub trait ProcessingEngine {
    /// Submits one file. Returns once the submission is accepted.
    fn start(&mut self, params: &ProcessingParameters<'_>, notifier: EngineNotifier) -> CoreResult<()>;

    /// Releases the engine after the last submission.
    fn dispose(&mut self) -> CoreResult<()>;
}

// ============================================================================
// NOTIFIER
// ============================================================================

/// Handle through which an engine reports on one submission.
///
/// Terminal events release the waiting driver; only the first one counts.
/// Terminal events from an earlier submission are ignored.
#[derive(Clone)]
pub struct EngineNotifier {
    signal: Arc<CompletionSignal>,
    generation: u64,
    file_number: usize,
    file_name: String,
    events: Arc<EventDispatcher>,
}

impl EngineNotifier {
    pub fn new(
        signal: Arc<CompletionSignal>,
        generation: u64,
        file_number: usize,
        file_name: &str,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            signal,
            generation,
            file_number,
            file_name: file_name.to_string(),
            events,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn notify(&self, event: EngineEvent) {
        if let Some(outcome) = event.outcome() {
            self.complete(outcome);
            return;
        }

        match event {
            EngineEvent::ProgressChanged { percent } => {
                log::trace!("{}: {:.1}%", self.file_name, percent);
                self.events.emit(Event::EngineProgress {
                    file_number: self.file_number,
                    percent: percent.clamp(0.0, 100.0),
                });
            }
            EngineEvent::TrialStatusChanged { message } => {
                log::debug!("{}: {}", self.file_name, message);
                self.events.emit(Event::EngineStatus {
                    file_number: self.file_number,
                    message,
                });
            }
            EngineEvent::Finished | EngineEvent::Failed(_) | EngineEvent::Cancelled => {}
        }
    }

    pub fn progress(&self, percent: f32) {
        self.notify(EngineEvent::ProgressChanged { percent });
    }

    pub fn finished(&self) {
        self.notify(EngineEvent::Finished);
    }

    pub fn failed(&self, message: impl Into<String>) {
        self.notify(EngineEvent::Failed(message.into()));
    }

    pub fn cancelled(&self) {
        self.notify(EngineEvent::Cancelled);
    }

    fn complete(&self, outcome: EngineOutcome) {
        match self.signal.signal(self.generation, outcome.clone()) {
            SignalResult::Accepted => {
                log::debug!("{}: engine {}", self.file_name, outcome);
            }
            SignalResult::Duplicate => {
                log::warn!(
                    "Ignoring duplicate completion ({}) for {}",
                    outcome,
                    self.file_name
                );
            }
            SignalResult::Stale => {
                log::warn!(
                    "Ignoring completion ({}) for {} from a previous submission",
                    outcome,
                    self.file_name
                );
            }
        }
    }
}
