//! Summary reporting module
//!
//! Counts and per-file records produced by one run, serializable for
//! machine-readable output.

use crate::processing::execute::{JobOutcome, JobResult};

use serde::Serialize;

use std::path::PathBuf;

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Media files found in the input directory
    pub discovered: usize,
    /// Files that never became jobs
    pub skipped: usize,
    /// Jobs whose output was written and verified
    pub converted: usize,
    /// Jobs whose encode failed (originals kept)
    pub failed: usize,
    /// Jobs described but not run (dry-run)
    pub planned: usize,
    /// Originals deleted after a verified conversion
    pub originals_removed: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// A discovered file that was not converted, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub summary: RunSummary,
    pub skipped: Vec<SkippedFile>,
    pub jobs: Vec<JobResult>,
}

impl BatchReport {
    /// Jobs that failed, in source-path order.
    pub fn failed_jobs(&self) -> impl Iterator<Item = &JobResult> {
        self.jobs.iter().filter(|job| job.is_failure())
    }

    /// Total bytes before and after, over successful conversions.
    pub fn size_totals(&self) -> (u64, u64) {
        self.jobs
            .iter()
            .filter_map(|job| match job.outcome {
                JobOutcome::Succeeded {
                    input_size,
                    output_size,
                    ..
                } => Some((input_size, output_size)),
                _ => None,
            })
            .fold((0, 0), |(i, o), (a, b)| (i + a, o + b))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
