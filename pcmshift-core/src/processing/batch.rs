// ============================================================================
// pcmshift-core/src/processing/batch.rs
// ============================================================================
//
// BATCH ORCHESTRATION: Scan, inspect, classify, plan and run every file
//
// Discovery, probing, classification and planning always happen on the
// calling thread, one file at a time. Only the encodes are dispatched:
//
// - sequential (jobs <= 1, or dry-run): each file's whole lifecycle finishes
//   before the next file is probed
// - parallel (jobs > 1): each job is spawned onto a rayon pool of exactly
//   `jobs` threads inside `in_place_scope`; the end of the scope is the drain
//   barrier, so no job is still running when this function reports completion
//
// WORKFLOW:
// 1. Discover media files in the input directory
// 2. Create the output directory (live mode only)
// 3. For each file: probe -> classify -> plan -> execute
// 4. Wait for every job, then emit the final summary line

use crate::config::CoreConfig;
use crate::discovery::{MediaFile, discover_media_files};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, StreamInfo};
use crate::processing::classify::{Classification, classify};
use crate::processing::execute::{JobResult, execute};
use crate::processing::plan::{JobPlan, destination_for, plan};
use crate::reporting::{BatchReport, RunReporter, SkippedFile};

use rayon::ThreadPoolBuilder;

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;

/// Per-run bookkeeping for files that have been looked at but not dispatched.
struct Intake<'a, P> {
    ffprobe: &'a P,
    config: &'a CoreConfig,
    reporter: &'a RunReporter,
    claimed: HashSet<PathBuf>,
    skipped: Vec<SkippedFile>,
}

impl<'a, P: FfprobeExecutor> Intake<'a, P> {
    fn new(ffprobe: &'a P, config: &'a CoreConfig, reporter: &'a RunReporter) -> Self {
        Self {
            ffprobe,
            config,
            reporter,
            claimed: HashSet::new(),
            skipped: Vec::new(),
        }
    }

    /// Probes, classifies and plans one file. Returns the job to run, if any.
    fn admit(&mut self, file: MediaFile) -> Option<JobPlan> {
        self.reporter.file_discovered(&file);

        let info = match self.ffprobe.inspect_audio(&file.path) {
            Ok(info) => {
                self.reporter.stream_detected(&file, &info);
                info
            }
            Err(e) => {
                self.reporter.probe_failed(&file, &e.to_string());
                StreamInfo::none()
            }
        };

        let classification = classify(&info, self.config);
        self.reporter.classified(&file, &classification);

        if let Classification::Skip { reason } = &classification {
            self.reporter.file_skipped(&file.path, reason);
            self.skip(file.path, reason.clone());
            return None;
        }

        match self
            .claim(&file)
            .and_then(|()| plan(&file, &classification, self.config))
        {
            Ok(job) => job,
            Err(e) => {
                let reason = e.to_string();
                self.reporter.file_refused(&file.path, &reason);
                self.skip(file.path, reason);
                None
            }
        }
    }

    /// Refuses a second file mapping to a destination already used in this run.
    ///
    /// Checked before planning so the refusal does not depend on whether the
    /// first job has already written its output.
    fn claim(&mut self, file: &MediaFile) -> CoreResult<()> {
        let destination = destination_for(file, self.config);
        if self.claimed.contains(&destination) {
            return Err(CoreError::DuplicateDestination {
                source_path: file.path.clone(),
                destination,
            });
        }
        self.claimed.insert(destination);
        Ok(())
    }

    fn skip(&mut self, path: PathBuf, reason: String) {
        self.skipped.push(SkippedFile { path, reason });
    }
}

/// Processes every media file in `config.input_dir`.
///
/// Per-file problems (probe failures, skips, path conflicts, encoder
/// failures) are recorded in the returned report and never abort the run.
///
/// # Errors
///
/// * `CoreError::Io` - the input directory cannot be read or the output
///   directory cannot be created
/// * `CoreError::Pool` - the worker pool cannot be built
pub fn process_directory<S, P>(
    spawner: &S,
    ffprobe: &P,
    config: &CoreConfig,
    reporter: &RunReporter,
) -> CoreResult<BatchReport>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
{
    reporter.scan_started(&config.input_dir, &config.output_dir, config.dry_run);
    // Snapshot the listing so outputs written into the input directory are
    // never picked up as inputs.
    let files: Vec<MediaFile> = discover_media_files(&config.input_dir)?.collect();

    if !config.dry_run {
        fs::create_dir_all(&config.output_dir)?;
    }

    let mut intake = Intake::new(ffprobe, config, reporter);
    let mut jobs: Vec<JobResult> = Vec::new();

    if config.is_sequential() {
        for file in files {
            if let Some(job) = intake.admit(file) {
                jobs.push(execute(spawner, &job, config, reporter));
            }
        }
    } else {
        log::debug!("Dispatching encodes on {} worker threads", config.jobs);
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .thread_name(|i| format!("pcmshift-job-{i}"))
            .build()
            .map_err(|e| CoreError::Pool(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<JobResult>();
        pool.in_place_scope(|scope| {
            for file in files {
                if let Some(job) = intake.admit(file) {
                    let tx = tx.clone();
                    scope.spawn(move |_| {
                        let result = execute(spawner, &job, config, reporter);
                        if tx.send(result).is_err() {
                            log::error!("Result channel closed before {} finished", job.source.display());
                        }
                    });
                }
            }
        });
        drop(tx);

        jobs.extend(rx);
        jobs.sort_by(|a, b| a.source.cmp(&b.source));
    }

    reporter.all_jobs_completed();

    Ok(BatchReport {
        summary: reporter.summary(),
        skipped: intake.skipped,
        jobs,
    })
}
