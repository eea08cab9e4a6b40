// ============================================================================
// hyperbatch-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: indicatif rendering of batch events
//
// The batch driver emits events from the calling thread and engine progress
// from the engine's worker thread. CliProgressHandler keeps one progress bar
// for the file currently in flight and replaces it when the next file starts.

// ---- External crate imports ----
use hyperbatch_core::events::{Event, EventHandler};
use hyperbatch_core::utils::display_name;
use indicatif::{ProgressBar, ProgressStyle};

// ---- Standard library imports ----
use std::sync::{Mutex, PoisonError};

const BAR_TEMPLATE: &str = "{prefix} {msg:30!} {percent:>3}% [{bar:30}] {elapsed_precise}";

// ============================================================================
// CLI PROGRESS HANDLER
// ============================================================================

/// [`EventHandler`] drawing a per-file progress bar on stderr.
///
/// indicatif hides the bar when stderr is not a terminal, so piped runs
/// only see the log lines.
#[derive(Default)]
pub struct CliProgressHandler {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_bar(file_number: usize, total_files: usize, name: String) -> ProgressBar {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.");
        let bar = ProgressBar::new(100).with_style(style);
        bar.set_prefix(format!("[{file_number}/{total_files}]"));
        bar.set_message(name);
        bar
    }

    /// Position for a progress percentage, clamped to the bar length.
    pub fn position_for(percent: f32) -> u64 {
        if percent.is_finite() {
            percent.clamp(0.0, 100.0).round() as u64
        } else {
            0
        }
    }
}

impl EventHandler for CliProgressHandler {
    fn handle(&self, event: &Event) {
        let mut bar = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match event {
            Event::FileStarted {
                file_number,
                total_files,
                input,
                ..
            } => {
                if let Some(previous) = bar.take() {
                    previous.finish_and_clear();
                }
                *bar = Some(Self::new_bar(*file_number, *total_files, display_name(input)));
            }
            Event::EngineProgress { percent, .. } => {
                if let Some(current) = bar.as_ref() {
                    current.set_position(Self::position_for(*percent));
                }
            }
            Event::FileCompleted { result, .. } => {
                if let Some(current) = bar.take() {
                    if result.status.is_success() {
                        current.set_position(100);
                    }
                    current.finish_and_clear();
                }
            }
            Event::BatchCompleted { .. } => {
                if let Some(current) = bar.take() {
                    current.finish_and_clear();
                }
            }
            Event::BatchStarted { .. } | Event::StateChanged { .. } | Event::EngineStatus { .. } => {}
        }
    }
}
