// ============================================================================
// pcmshift-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and run-log output through fern
//
// Library code only uses the `log` facade. This module installs the fern
// dispatch that decides where records go:
//
// - console (stdout): reporter lines verbatim, everything else prefixed
//   with time and level
// - optional run log file: same lines with ANSI colour codes stripped, plus
//   the fatal error that stopped the run, if any
//
// Colour support is detected once and shared with the `console` crate, which
// the core reporter consults before colouring its tags.

use crate::error::CliResult;

use pcmshift_core::{CoreError, REPORT_TARGET};

use chrono::Local;
use log::LevelFilter;

use std::path::{Path, PathBuf};

/// Log target for fatal errors. These go to the run log only; `main` already
/// prints them on stderr.
pub const FATAL_TARGET: &str = "pcmshift::fatal";

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("pcmshift_run_{}.log", pcmshift_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("pcmshift_run_"));
/// ```
pub fn get_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the run log file inside `log_dir`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("pcmshift_run_{}.log", get_timestamp()))
}

/// Enables or disables colours for both output streams based on terminal support.
pub fn configure_colors() {
    let stdout = supports_color::on(supports_color::Stream::Stdout).is_some();
    let stderr = supports_color::on(supports_color::Stream::Stderr).is_some();
    console::set_colors_enabled(stdout);
    console::set_colors_enabled_stderr(stderr);
}

fn format_line(message: &std::fmt::Arguments, record: &log::Record) -> String {
    if record.target().starts_with(REPORT_TARGET) {
        message.to_string()
    } else {
        format!(
            "[{}] {:<5} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            message
        )
    }
}

/// Installs the global logger.
///
/// # Errors
///
/// Fails when the run log file cannot be created or a logger is already set.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console_dispatch = fern::Dispatch::new()
        .filter(|metadata| !metadata.target().starts_with(FATAL_TARGET))
        .format(|out, message, record| out.finish(format_args!("{}", format_line(message, record))))
        .chain(std::io::stdout());

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .level_for("rayon", LevelFilter::Warn)
        .level_for("rayon_core", LevelFilter::Warn)
        .chain(console_dispatch);

    if let Some(path) = log_file {
        let file = fern::log_file(path)?;
        let file_dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                let line = strip_ansi_escapes::strip_str(format_line(message, record));
                out.finish(format_args!("{}", line))
            })
            .chain(file);
        dispatch = dispatch.chain(file_dispatch);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::Io(std::io::Error::other(format!("failed to initialise logging: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let stamp = get_timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_run_log_path() {
        let path = run_log_path(Path::new("/var/log/pcmshift"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("pcmshift_run_"));
        assert!(name.ends_with(".log"));
        assert_eq!(path.parent().unwrap(), Path::new("/var/log/pcmshift"));
    }
}
