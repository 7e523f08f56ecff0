//! Core library for batch audio conversion of video files using ffmpeg and ffprobe.
//!
//! This crate scans a directory for video files, probes each file's audio,
//! decides whether to transcode, stream-copy or skip it, and runs ffmpeg to
//! write a new file with the video stream copied losslessly.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use pcmshift_core::config::CoreConfigBuilder;
//! use pcmshift_core::run_conversion;
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new()
//!     .input_dir(PathBuf::from("/path/to/videos"))
//!     .audio_codec("lpcm")
//!     .jobs(2)
//!     .build();
//!
//! let report = run_conversion(&config).unwrap();
//! println!("{} converted, {} failed", report.summary.converted, report.summary.failed);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod processing;
pub mod reporting;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::{MediaFile, MediaFiles, discover_media_files};
pub use error::{CoreError, CoreResult};
pub use external::{
    CrateFfprobeExecutor, FfmpegProcess, FfmpegSpawner, FfprobeExecutor, SidecarSpawner,
    StreamInfo, check_dependencies, check_dependency,
};
pub use processing::{
    AudioMode, Classification, JobOutcome, JobPlan, JobResult, OriginalAction, classify,
    execute, plan, process_directory,
};
pub use reporting::{BatchReport, REPORT_TARGET, RunReporter, RunSummary, SkippedFile};
pub use utils::{format_bytes, format_duration};

/// Runs a full conversion with the production ffmpeg and ffprobe backends.
///
/// Validates the configuration, checks that ffmpeg and ffprobe are
/// available, then processes the input directory.
///
/// # Errors
///
/// Fatal preconditions (`InvalidInputDir`, `Config`, `DependencyNotFound`)
/// are returned before any file is touched. Per-file failures are reported
/// inside the returned [`BatchReport`].
pub fn run_conversion(config: &CoreConfig) -> CoreResult<BatchReport> {
    run_conversion_with_reporter(config, &RunReporter::new())
}

/// Like [`run_conversion`], reporting through the given reporter.
pub fn run_conversion_with_reporter(
    config: &CoreConfig,
    reporter: &RunReporter,
) -> CoreResult<BatchReport> {
    config.validate()?;
    check_dependencies()?;

    let spawner = SidecarSpawner;
    let ffprobe = CrateFfprobeExecutor::new();
    process_directory(&spawner, &ffprobe, config, reporter)
}
