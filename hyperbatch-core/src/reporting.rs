//! Per-file results and the batch summary.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Final status of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// The engine reported `Finished`.
    Succeeded,

    /// The engine reported `Failed` with the given message.
    Failed(String),

    /// The engine reported `Cancelled`.
    Cancelled,

    /// The file never reached the engine (metadata, calibration or output
    /// folder error).
    Skipped(String),
}

impl FileStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FileStatus::Succeeded)
    }

    /// Short label used in summaries and JSON output.
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Succeeded => "succeeded",
            FileStatus::Failed(_) => "failed",
            FileStatus::Cancelled => "cancelled",
            FileStatus::Skipped(_) => "skipped",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FileStatus::Failed(msg) | FileStatus::Skipped(msg) => Some(msg),
            FileStatus::Succeeded | FileStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "{}: {}", self.label(), msg),
            None => f.write_str(self.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: FileStatus,
    pub elapsed: Duration,
}

/// Outcome of a whole batch, in processing order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSummary {
    pub results: Vec<FileResult>,
    pub total_elapsed: Duration,
}

impl BatchSummary {
    pub fn new(results: Vec<FileResult>, total_elapsed: Duration) -> Self {
        Self {
            results,
            total_elapsed,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed(_)))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Cancelled))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped(_)))
    }

    /// True when every file finished successfully.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.status.is_success())
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: FileStatus) -> FileResult {
        FileResult {
            input: PathBuf::from(name),
            output: PathBuf::from("Output").join(name),
            status,
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn tallies() {
        let summary = BatchSummary::new(
            vec![
                result("a.mp4", FileStatus::Succeeded),
                result("b.mp4", FileStatus::Failed("codec".into())),
                result("c.mp4", FileStatus::Cancelled),
                result("d.mp4", FileStatus::Skipped("no calibration".into())),
                result("e.mp4", FileStatus::Succeeded),
            ],
            Duration::from_secs(5),
        );
        assert_eq!(summary.total(), 5);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.cancelled(), 1);
        assert_eq!(summary.skipped(), 1);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn status_display() {
        assert_eq!(FileStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(FileStatus::Failed("exit 1".into()).to_string(), "failed: exit 1");
        assert_eq!(FileStatus::Cancelled.message(), None);
    }
}
