//! Batch result types.
//!
//! Contains types for representing the outcome of marking many files.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Status of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum MarkStatus {
    /// Watermark written
    Marked,
    /// Marking failed with error
    Failed(String),
}

impl MarkStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, MarkStatus::Marked)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, MarkStatus::Failed(_))
    }
}

impl std::fmt::Display for MarkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkStatus::Marked => write!(f, "marked"),
            MarkStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of marking a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: MarkStatus,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl FileResult {
    /// Create a successful result.
    pub fn marked(path: PathBuf, duration: Duration) -> Self {
        Self { path, status: MarkStatus::Marked, duration }
    }

    /// Create a failed result.
    pub fn failed(path: PathBuf, error: String, duration: Duration) -> Self {
        Self { path, status: MarkStatus::Failed(error), duration }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    /// Results in input order
    pub files: Vec<FileResult>,
    #[serde(rename = "total_duration_ms", serialize_with = "serialize_millis")]
    pub total_duration: Duration,
}

impl BatchResult {
    pub fn marked_count(&self) -> usize {
        self.files.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|r| r.status.is_failure()).count()
    }

    /// True when no file failed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn failures(&self) -> Vec<&FileResult> {
        self.files.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the batch.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let marked = self.marked_count();
        let failed = self.failed_count();
        let total = self.files.len();

        if failed > 0 {
            lines.push(format!("Marking failed: {} marked, {} failed ({} total)", marked, failed, total));
            for file in self.failures() {
                lines.push(format!("  - {}: {}", file.path.display(), file.status));
            }
        } else {
            lines.push(format!("Marked {} file(s) in {:?}", marked, self.total_duration));
        }

        lines.join("\n")
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
