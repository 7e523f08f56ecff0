//! Run reporting: timestamped progress lines and the shared tally.
//!
//! The reporter is purely observational. It formats one line per pipeline
//! event, sends it through the `log` facade under [`REPORT_TARGET`], and
//! counts outcomes in atomics so worker threads can share it by reference.

mod summary;

pub use summary::{BatchReport, RunSummary, SkippedFile};

use crate::discovery::MediaFile;
use crate::external::StreamInfo;
use crate::processing::classify::Classification;
use crate::processing::plan::JobPlan;
use crate::utils::{format_bytes, format_duration};

use chrono::Local;
use owo_colors::OwoColorize;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Log target used for every reporter line. Frontends print these records
/// verbatim; the line already carries its own timestamp.
pub const REPORT_TARGET: &str = "pcmshift::report";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Scan,
    Probe,
    Skip,
    Start,
    Done,
    Fail,
    Keep,
    Delete,
    DryRun,
    Finish,
}

impl Tag {
    fn label(self) -> &'static str {
        match self {
            Tag::Scan => "SCAN",
            Tag::Probe => "PROBE",
            Tag::Skip => "SKIP",
            Tag::Start => "START",
            Tag::Done => "DONE",
            Tag::Fail => "FAIL",
            Tag::Keep => "KEEP",
            Tag::Delete => "DELETE",
            Tag::DryRun => "DRY-RUN",
            Tag::Finish => "FINISH",
        }
    }
}

/// Returns true when reporter tags should be coloured.
pub fn colors_enabled() -> bool {
    console::colors_enabled() && std::env::var_os("NO_COLOR").is_none()
}

/// Emits progress lines and keeps the run tally.
#[derive(Debug)]
pub struct RunReporter {
    colors: bool,
    discovered: AtomicUsize,
    skipped: AtomicUsize,
    converted: AtomicUsize,
    failed: AtomicUsize,
    planned: AtomicUsize,
    originals_removed: AtomicUsize,
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReporter {
    /// Creates a reporter, colouring tags when the terminal allows it.
    pub fn new() -> Self {
        Self::with_colors(colors_enabled())
    }

    pub fn with_colors(colors: bool) -> Self {
        Self {
            colors,
            discovered: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            converted: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            planned: AtomicUsize::new(0),
            originals_removed: AtomicUsize::new(0),
        }
    }

    /// Builds one report line: `[timestamp] TAG message`.
    fn line(&self, tag: Tag, message: &str) -> String {
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        let label = tag.label();
        let label = if self.colors {
            match tag {
                Tag::Done | Tag::Finish => label.green().bold().to_string(),
                Tag::Fail => label.red().bold().to_string(),
                Tag::Skip | Tag::Keep => label.yellow().to_string(),
                Tag::Delete => label.magenta().to_string(),
                Tag::DryRun => label.cyan().bold().to_string(),
                Tag::Scan | Tag::Probe | Tag::Start => label.blue().to_string(),
            }
        } else {
            label.to_string()
        };
        format!("[{stamp}] {label} {message}")
    }

    fn info(&self, tag: Tag, message: &str) {
        log::info!(target: REPORT_TARGET, "{}", self.line(tag, message));
    }

    fn warn(&self, tag: Tag, message: &str) {
        log::warn!(target: REPORT_TARGET, "{}", self.line(tag, message));
    }

    fn error(&self, tag: Tag, message: &str) {
        log::error!(target: REPORT_TARGET, "{}", self.line(tag, message));
    }

    pub fn scan_started(&self, input_dir: &Path, output_dir: &Path, dry_run: bool) {
        let mode = if dry_run { " (dry run)" } else { "" };
        self.info(
            Tag::Scan,
            &format!(
                "Scanning {} -> {}{}",
                input_dir.display(),
                output_dir.display(),
                mode
            ),
        );
    }

    pub fn file_discovered(&self, file: &MediaFile) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
        self.info(Tag::Scan, &format!("Found {}", file.file_name()));
    }

    pub fn stream_detected(&self, file: &MediaFile, info: &StreamInfo) {
        let message = match info.audio_codec() {
            Some(codec) => format!(
                "{}: audio codec {}, {} track{}",
                file.file_name(),
                codec,
                info.audio_track_count(),
                if info.audio_track_count() == 1 { "" } else { "s" }
            ),
            None => format!("{}: no audio stream detected", file.file_name()),
        };
        self.info(Tag::Probe, &message);
    }

    pub fn probe_failed(&self, file: &MediaFile, reason: &str) {
        self.warn(
            Tag::Probe,
            &format!("{}: probe failed, treating as no audio ({})", file.file_name(), reason),
        );
    }

    pub fn classified(&self, file: &MediaFile, classification: &Classification) {
        if !classification.is_skip() {
            self.info(Tag::Probe, &format!("{}: {}", file.file_name(), classification));
        }
    }

    /// Records a file that never became a job.
    pub fn file_skipped(&self, path: &Path, reason: &str) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        self.info(Tag::Skip, &format!("{}: {}", display_name(path), reason));
    }

    /// Records a file that was refused for a safety reason.
    pub fn file_refused(&self, path: &Path, reason: &str) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        self.warn(Tag::Skip, &format!("{}: {}", display_name(path), reason));
    }

    pub fn job_planned(&self, plan: &JobPlan, command: &str, keep_original: bool) {
        self.planned.fetch_add(1, Ordering::Relaxed);
        self.info(
            Tag::DryRun,
            &format!(
                "{} -> {} ({})",
                plan.source_file_name(),
                plan.destination_file_name(),
                plan.audio_mode
            ),
        );
        self.info(Tag::DryRun, &format!("Would run: {command}"));
        let action = if keep_original { "keep" } else { "delete" };
        self.info(
            Tag::DryRun,
            &format!("Would {} original {}", action, plan.source_file_name()),
        );
    }

    pub fn job_started(&self, plan: &JobPlan) {
        self.info(
            Tag::Start,
            &format!(
                "{} -> {} (audio: {})",
                plan.source_file_name(),
                plan.destination_file_name(),
                plan.audio_mode
            ),
        );
    }

    pub fn job_succeeded(
        &self,
        plan: &JobPlan,
        elapsed_secs: f64,
        input_size: u64,
        output_size: u64,
    ) {
        self.converted.fetch_add(1, Ordering::Relaxed);
        self.info(
            Tag::Done,
            &format!(
                "{} in {} ({} -> {})",
                plan.destination_file_name(),
                format_duration(elapsed_secs),
                format_bytes(input_size),
                format_bytes(output_size)
            ),
        );
    }

    pub fn job_failed(&self, plan: &JobPlan, reason: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.error(
            Tag::Fail,
            &format!("{}: {}; original kept", plan.source_file_name(), reason),
        );
    }

    pub fn original_removed(&self, path: &Path) {
        self.originals_removed.fetch_add(1, Ordering::Relaxed);
        self.info(Tag::Delete, &format!("Removed original {}", display_name(path)));
    }

    pub fn original_kept(&self, path: &Path) {
        self.info(Tag::Keep, &format!("Kept original {}", display_name(path)));
    }

    pub fn original_removal_failed(&self, path: &Path, reason: &str) {
        self.warn(
            Tag::Keep,
            &format!("Could not remove original {}: {}", display_name(path), reason),
        );
    }

    /// Final line; only emitted once every job has finished.
    pub fn all_jobs_completed(&self) {
        let s = self.summary();
        self.info(
            Tag::Finish,
            &format!(
                "All jobs completed: {} found, {} converted, {} failed, {} skipped{}",
                s.discovered,
                s.converted,
                s.failed,
                s.skipped,
                if s.planned > 0 {
                    format!(", {} planned", s.planned)
                } else {
                    String::new()
                }
            ),
        );
    }

    /// Snapshot of the tally.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            discovered: self.discovered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            converted: self.converted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            planned: self.planned.load(Ordering::Relaxed),
            originals_removed: self.originals_removed.load(Ordering::Relaxed),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
