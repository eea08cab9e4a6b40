//! One-shot completion gate between the engine and the batch driver.
//!
//! Each submission arms the signal, which starts a new generation. The first
//! terminal outcome for the current generation is stored and wakes the
//! waiter; later ones are reported as duplicates, and outcomes tagged with an
//! older generation are reported as stale. Neither kind can release a wait.

use super::EngineOutcome;

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// What happened to an outcome passed to [`CompletionSignal::signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalResult {
    Accepted,
    Duplicate,
    Stale,
}

#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    fired: bool,
    outcome: Option<EngineOutcome>,
}

#[derive(Debug, Default)]
pub struct CompletionSignal {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resets the gate for a new submission and returns its generation.
    pub fn arm(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.fired = false;
        state.outcome = None;
        state.generation
    }

    /// Records `outcome` for `generation`.
    pub fn signal(&self, generation: u64, outcome: EngineOutcome) -> SignalResult {
        let mut state = self.lock();
        if generation != state.generation {
            return SignalResult::Stale;
        }
        if state.fired {
            return SignalResult::Duplicate;
        }
        state.fired = true;
        state.outcome = Some(outcome);
        self.ready.notify_all();
        SignalResult::Accepted
    }

    /// Blocks until the outcome for `generation` arrives and takes it.
    pub fn wait(&self, generation: u64) -> EngineOutcome {
        let mut state = self.lock();
        loop {
            if state.generation == generation {
                if let Some(outcome) = state.outcome.take() {
                    return outcome;
                }
            } else {
                // The gate was re-armed underneath us; nothing will arrive.
                return EngineOutcome::Cancelled;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Current generation, mostly for diagnostics.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}
