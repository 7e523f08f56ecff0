//! Implementation of the conversion run.
//!
//! Maps CLI arguments onto the core configuration, sets up logging, runs the
//! batch through pcmshift-core and prints the final summary.

use crate::cli::Cli;
use crate::error::CliResult;
use crate::logging;

use pcmshift_core::config::CoreConfigBuilder;
use pcmshift_core::{
    BatchReport, CoreConfig, JobOutcome, REPORT_TARGET, RunReporter, check_dependencies,
    format_bytes, format_duration,
};

use log::{error, info, warn};

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Builds the core configuration from parsed arguments.
pub fn build_config(args: &Cli) -> CoreConfig {
    let mut builder = CoreConfigBuilder::new()
        .input_dir(args.input_dir.clone())
        .audio_codec(&args.audio_codec)
        .container_format(&args.container_format)
        .jobs(usize::from(args.jobs))
        .dry_run(args.dry_run)
        .keep_original(args.keep_original)
        .force(args.force);
    if let Some(output_dir) = &args.output_dir {
        builder = builder.output_dir(output_dir.clone());
    }
    builder.build()
}

/// Decides where the run log goes. Dry runs never create one.
fn prepare_log_file(args: &Cli) -> CliResult<Option<PathBuf>> {
    match &args.log_dir {
        Some(dir) if !args.dry_run => {
            fs::create_dir_all(dir)?;
            Ok(Some(logging::run_log_path(dir)))
        }
        _ => Ok(None),
    }
}

/// Runs a full conversion for the given arguments.
pub fn run_convert(args: &Cli) -> CliResult<BatchReport> {
    let total_start_time = Instant::now();
    let config = build_config(args);

    // Fatal preconditions stop the run before the log directory is created.
    config.validate()?;
    check_dependencies()?;

    logging::configure_colors();
    let log_file = prepare_log_file(args)?;
    logging::init_logging(args.verbose, log_file.as_deref())?;

    if args.dry_run && args.log_dir.is_some() {
        warn!("--log-dir is ignored in dry-run mode; no log file will be written");
    }
    if let Some(path) = &log_file {
        info!("Run log: {}", path.display());
    }

    log::debug!("Configuration: {:?}", config);

    let reporter = RunReporter::new();
    let report = match pcmshift_core::run_conversion_with_reporter(&config, &reporter) {
        Ok(report) => report,
        Err(e) => {
            // main prints the error to stderr; this copy is for the run log.
            error!(target: logging::FATAL_TARGET, "Run stopped: {e}");
            return Err(e);
        }
    };

    print_summary(&report, &config);
    info!(
        target: REPORT_TARGET,
        "Total execution time: {}",
        format_duration(total_start_time.elapsed().as_secs_f64())
    );

    if args.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("Could not render JSON report: {e}"),
        }
    }

    Ok(report)
}

/// Prints the end-of-run summary.
fn print_summary(report: &BatchReport, config: &CoreConfig) {
    let s = &report.summary;
    info!(target: REPORT_TARGET, "========================================");
    info!(target: REPORT_TARGET, "Conversion Summary:");
    info!(target: REPORT_TARGET, "========================================");
    info!(target: REPORT_TARGET, "  Files found:       {}", s.discovered);
    if config.dry_run {
        info!(target: REPORT_TARGET, "  Planned:           {}", s.planned);
    } else {
        info!(target: REPORT_TARGET, "  Converted:         {}", s.converted);
        info!(target: REPORT_TARGET, "  Failed:            {}", s.failed);
        info!(target: REPORT_TARGET, "  Originals removed: {}", s.originals_removed);
    }
    info!(target: REPORT_TARGET, "  Skipped:           {}", s.skipped);

    if s.converted > 0 {
        let (input, output) = report.size_totals();
        info!(target: REPORT_TARGET, "  Input size:        {}", format_bytes(input));
        info!(target: REPORT_TARGET, "  Output size:       {}", format_bytes(output));
    }

    if s.has_failures() {
        warn!(target: REPORT_TARGET, "  Failed files:");
        for job in report.failed_jobs() {
            if let JobOutcome::Failed { reason } = &job.outcome {
                warn!(target: REPORT_TARGET, "    {}: {}", job.source.display(), reason);
            }
        }
    }
    info!(target: REPORT_TARGET, "========================================");
}
