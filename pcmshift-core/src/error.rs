// ============================================================================
// pcmshift-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Conversion Pipeline
//
// Errors fall into two groups. Fatal preconditions (missing tools, a bad
// input directory, invalid configuration) stop the run before any file is
// touched. Per-file errors (probe failures, path conflicts, encoder failures)
// are isolated to the file that raised them and never abort the batch.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the pcmshift core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Invalid input directory '{}': {reason}", .path.display())]
    InvalidInputDir { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error(
        "Destination '{}' would overwrite its own source '{}'",
        .destination.display(),
        .source_path.display()
    )]
    PathConflict {
        source_path: PathBuf,
        destination: PathBuf,
    },

    #[error(
        "Destination '{}' for '{}' is already claimed by another file in this run",
        .destination.display(),
        .source_path.display()
    )]
    DuplicateDestination {
        source_path: PathBuf,
        destination: PathBuf,
    },

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Encoder reported success but produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Worker pool error: {0}")]
    Pool(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// True for errors that must stop the run before any file is touched.
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            CoreError::DependencyNotFound(_) | CoreError::InvalidInputDir { .. } | CoreError::Config(_)
        )
    }
}

/// Result type for pcmshift core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

pub fn command_start_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

pub fn command_wait_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
