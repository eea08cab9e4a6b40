//! JSON progress handler for structured progress output
//!
//! Writes one JSON object per line for every batch event, for consumption by
//! scripts wrapping the CLI.

use super::{Event, EventHandler};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs batch events as JSON lines
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{}", json_str);
                let _ = output.flush();
            }
        }
    }
}

/// Converts an event to its JSON form.
pub fn event_to_json(event: &Event, timestamp: u64) -> Value {
    match event {
        Event::BatchStarted {
            total_files,
            speedup_factor,
            output_frame_rate,
        } => json!({
            "type": "batch_started",
            "total_files": total_files,
            "speedup_factor": speedup_factor,
            "output_frame_rate": output_frame_rate.map(|fps| fps.to_string()),
            "timestamp": timestamp
        }),
        Event::FileStarted {
            file_number,
            total_files,
            input,
            output,
        } => json!({
            "type": "file_started",
            "file_number": file_number,
            "total_files": total_files,
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "timestamp": timestamp
        }),
        Event::StateChanged { state } => json!({
            "type": "state_changed",
            "state": state.to_string(),
            "timestamp": timestamp
        }),
        Event::EngineProgress {
            file_number,
            percent,
        } => json!({
            "type": "progress",
            "file_number": file_number,
            "percent": percent,
            "timestamp": timestamp
        }),
        Event::EngineStatus {
            file_number,
            message,
        } => json!({
            "type": "status",
            "file_number": file_number,
            "message": message,
            "timestamp": timestamp
        }),
        Event::FileCompleted {
            file_number,
            total_files,
            result,
        } => json!({
            "type": "file_completed",
            "file_number": file_number,
            "total_files": total_files,
            "input": result.input.display().to_string(),
            "output": result.output.display().to_string(),
            "status": result.status.label(),
            "message": result.status.message(),
            "elapsed_seconds": result.elapsed.as_secs_f64(),
            "timestamp": timestamp
        }),
        Event::BatchCompleted { summary } => json!({
            "type": "batch_completed",
            "total_files": summary.total(),
            "succeeded": summary.succeeded(),
            "failed": summary.failed(),
            "cancelled": summary.cancelled(),
            "skipped": summary.skipped(),
            "elapsed_seconds": summary.total_elapsed.as_secs_f64(),
            "timestamp": timestamp
        }),
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        self.write_json(event_to_json(event, Self::get_timestamp()));
    }
}
