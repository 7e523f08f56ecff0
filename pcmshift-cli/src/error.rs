// ============================================================================
// pcmshift-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result type and exit codes
//
// The CLI reuses the core error type and maps each fatal error to the
// process exit code a script can branch on. Argument errors never reach
// this module: clap exits with 2 on its own.

use pcmshift_core::{CoreError, CoreResult};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Batch ran to completion (including skips and per-file failures).
pub const EXIT_SUCCESS: i32 = 0;
/// Unexpected fatal error (I/O, worker pool, logging setup).
pub const EXIT_FAILURE: i32 = 1;
/// Invalid usage or configuration.
pub const EXIT_USAGE: i32 = 2;
/// ffmpeg or ffprobe is not installed.
pub const EXIT_MISSING_TOOL: i32 = 3;
/// Input directory is missing or not a directory.
pub const EXIT_INVALID_INPUT: i32 = 4;

/// Maps a fatal error to the process exit code.
pub fn exit_code_for(err: &CoreError) -> i32 {
    match err {
        CoreError::DependencyNotFound(_) => EXIT_MISSING_TOOL,
        CoreError::InvalidInputDir { .. } => EXIT_INVALID_INPUT,
        CoreError::Config(_) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&CoreError::DependencyNotFound("ffprobe".into())), 3);
        assert_eq!(
            exit_code_for(&CoreError::InvalidInputDir {
                path: PathBuf::from("/nope"),
                reason: "No such file or directory".into(),
            }),
            4
        );
        assert_eq!(exit_code_for(&CoreError::Config("bad".into())), 2);
        assert_eq!(
            exit_code_for(&CoreError::Io(std::io::Error::other("disk full"))),
            1
        );
    }
}
