//! Error types for the hyperbatch-core library.
//!
//! Errors fall into two groups. Precondition errors (missing directory, no
//! input files, unavailable engine) are detected before the batch loop starts
//! and abort the whole run. Everything else is local to one file and is
//! handled by the batch driver according to its
//! [`FileErrorPolicy`](crate::config::FileErrorPolicy).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::reporting::BatchSummary;

/// Custom error types for hyperbatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No video files found")]
    NoFilesFound,

    #[error("Required external command '{0}' not found")]
    DependencyNotFound(String),

    #[error("Processing engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to read video metadata from '{}': {reason}", path.display())]
    MetadataRead { path: PathBuf, reason: String },

    #[error(
        "No calibration profile matches {width}x{height} at {frame_rate} fps (rotation {rotation})"
    )]
    NoCalibrationMatch {
        width: u32,
        height: u32,
        frame_rate: String,
        rotation: u32,
    },

    #[error("Engine rejected submission for '{}': {reason}", path.display())]
    EngineStart { path: PathBuf, reason: String },

    #[error("Invalid calibration catalog: {0}")]
    Catalog(String),

    #[error("Calibration catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid frame rate '{0}'")]
    InvalidFrameRate(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    /// `completed` holds the files processed before the abort.
    #[error("Batch aborted after '{}': {reason}", path.display())]
    BatchAborted {
        path: PathBuf,
        reason: String,
        completed: Box<BatchSummary>,
    },

    #[error("{0}")]
    OperationFailed(String),
}

impl CoreError {
    /// Returns true for errors that abort the run before any file is processed.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CoreError::DirectoryNotFound(_)
                | CoreError::NoFilesFound
                | CoreError::DependencyNotFound(_)
                | CoreError::EngineUnavailable(_)
        )
    }
}

/// Result type for hyperbatch-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a [`CoreError::MetadataRead`] for the given path.
pub(crate) fn metadata_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> CoreError {
    CoreError::MetadataRead {
        path: path.into(),
        reason: reason.into(),
    }
}
