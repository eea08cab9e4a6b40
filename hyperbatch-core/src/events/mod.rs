//! Batch events.
//!
//! The driver reports what it is doing through an [`EventDispatcher`];
//! front ends register [`EventHandler`]s to render progress. Engine progress
//! arrives on the engine's own thread, so handlers must be `Send + Sync`.

use crate::batch::DriverState;
use crate::media::FrameRate;
use crate::reporting::{BatchSummary, FileResult};

use std::path::PathBuf;
use std::sync::Arc;

pub mod json_handler;

pub use json_handler::JsonProgressHandler;

#[derive(Debug, Clone)]
pub enum Event {
    BatchStarted {
        total_files: usize,
        speedup_factor: u32,
        output_frame_rate: Option<FrameRate>,
    },

    /// `file_number` is 1-based.
    FileStarted {
        file_number: usize,
        total_files: usize,
        input: PathBuf,
        output: PathBuf,
    },

    StateChanged {
        state: DriverState,
    },

    EngineProgress {
        file_number: usize,
        percent: f32,
    },

    EngineStatus {
        file_number: usize,
        message: String,
    },

    FileCompleted {
        file_number: usize,
        total_files: usize,
        result: FileResult,
    },

    BatchCompleted {
        summary: BatchSummary,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
