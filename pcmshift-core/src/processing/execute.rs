// ============================================================================
// pcmshift-core/src/processing/execute.rs
// ============================================================================
//
// EXECUTION ENGINE: Running one planned job
//
// Order of operations for a live job:
//
//   1. sample the input size
//   2. run ffmpeg (always with -n, never overwriting)
//   3. verify the destination exists
//   4. only then, unless keep_original is set, remove the source
//
// Any failure before step 4 leaves the source untouched. A failed removal in
// step 4 is a warning; the conversion itself still counts as a success.
// Partial outputs left behind by a failed encode are not removed.
//
// In dry-run mode nothing is spawned and nothing on disk changes; the job
// result carries the command that would have been run.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::{build_convert_args, run_ffmpeg_convert};
use crate::external::ffmpeg_executor::FfmpegSpawner;
use crate::processing::plan::{AudioMode, JobPlan};
use crate::reporting::RunReporter;
use crate::utils::format_command_line;

use serde::Serialize;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What a dry run says would happen to the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginalAction {
    Keep,
    Delete,
}

/// How one job ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Dry-run: the job was described, not run.
    Planned {
        command: String,
        original: OriginalAction,
    },
    Succeeded {
        original_removed: bool,
        input_size: u64,
        output_size: u64,
        elapsed_secs: f64,
    },
    Failed {
        reason: String,
    },
}

/// Result of executing one [`JobPlan`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub audio_mode: AudioMode,
    pub outcome: JobOutcome,
}

impl JobResult {
    fn new(plan: &JobPlan, outcome: JobOutcome) -> Self {
        Self {
            source: plan.source.clone(),
            destination: plan.destination.clone(),
            audio_mode: plan.audio_mode.clone(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Succeeded { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, JobOutcome::Failed { .. })
    }
}

/// The shell command a dry run prints for `plan`.
pub fn dry_run_command(plan: &JobPlan) -> String {
    format_command_line("ffmpeg", build_convert_args(plan))
}

/// Executes one job.
///
/// Never returns an error: failures are captured in [`JobOutcome::Failed`] so
/// the batch can carry on.
pub fn execute<S: FfmpegSpawner>(
    spawner: &S,
    plan: &JobPlan,
    config: &CoreConfig,
    reporter: &RunReporter,
) -> JobResult {
    if config.dry_run {
        let command = dry_run_command(plan);
        reporter.job_planned(plan, &command, config.keep_original);
        let original = if config.keep_original {
            OriginalAction::Keep
        } else {
            OriginalAction::Delete
        };
        return JobResult::new(plan, JobOutcome::Planned { command, original });
    }

    reporter.job_started(plan);

    let input_size = fs::metadata(&plan.source).map(|m| m.len()).unwrap_or(0);
    let start = Instant::now();

    let output_size = match run_ffmpeg_convert(spawner, plan)
        .and_then(|()| verify_output(&plan.destination))
    {
        Ok(size) => size,
        Err(e) => {
            let reason = e.to_string();
            reporter.job_failed(plan, &reason);
            return JobResult::new(plan, JobOutcome::Failed { reason });
        }
    };

    let elapsed_secs = start.elapsed().as_secs_f64();
    reporter.job_succeeded(plan, elapsed_secs, input_size, output_size);

    let original_removed = if config.keep_original {
        reporter.original_kept(&plan.source);
        false
    } else {
        match fs::remove_file(&plan.source) {
            Ok(()) => {
                reporter.original_removed(&plan.source);
                true
            }
            Err(e) => {
                reporter.original_removal_failed(&plan.source, &e.to_string());
                false
            }
        }
    };

    JobResult::new(
        plan,
        JobOutcome::Succeeded {
            original_removed,
            input_size,
            output_size,
            elapsed_secs,
        },
    )
}

/// Confirms the encoder left a regular file at `destination` and returns its size.
fn verify_output(destination: &Path) -> CoreResult<u64> {
    match fs::metadata(destination) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        _ => Err(CoreError::MissingOutput(destination.to_path_buf())),
    }
}
