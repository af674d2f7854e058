//! Parallel marking of many files with one shared watermark.
//!
//! ```ignore
//! use watermark::batch::BatchMark;
//!
//! let result = BatchMark::new(&watermark).with_jobs(4).run(&paths);
//! println!("{}", result.summary());
//! ```

mod discovery;
mod result;

pub use discovery::{discover_dir, discover_targets, DiscoveryError};
pub use result::{BatchResult, FileResult, MarkStatus};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

use crate::watermark::Watermark;

/// Default number of parallel jobs (uses available parallelism).
fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Parallel batch executor.
pub struct BatchMark<'a> {
    watermark: &'a Watermark,
    jobs: usize,
}

impl<'a> BatchMark<'a> {
    pub fn new(watermark: &'a Watermark) -> Self {
        Self { watermark, jobs: default_jobs() }
    }

    /// Set the number of parallel jobs; 0 selects the available parallelism.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { default_jobs() } else { jobs };
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Mark every path; results come back in input order.
    pub fn run(&self, paths: &[PathBuf]) -> BatchResult {
        let start = Instant::now();

        let files: Vec<FileResult> = if self.jobs <= 1 || paths.len() <= 1 {
            paths.iter().map(|p| self.mark_one(p)).collect()
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
                Ok(pool) => pool.install(|| paths.par_iter().map(|p| self.mark_one(p)).collect()),
                Err(e) => {
                    warn!("could not start worker pool, marking sequentially: {}", e);
                    paths.iter().map(|p| self.mark_one(p)).collect()
                }
            }
        };

        BatchResult { files, total_duration: start.elapsed() }
    }

    fn mark_one(&self, path: &Path) -> FileResult {
        let start = Instant::now();
        match self.watermark.mark_file(path) {
            Ok(()) => FileResult::marked(path.to_path_buf(), start.elapsed()),
            Err(e) => {
                warn!(path = %path.display(), "{}", e);
                FileResult::failed(path.to_path_buf(), e.to_string(), start.elapsed())
            }
        }
    }
}
