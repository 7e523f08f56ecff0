// ============================================================================
// pcmshift-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates the Media Engine: probing audio streams with
// ffprobe and running conversions with ffmpeg. The rest of the crate only
// sees the FfprobeExecutor and FfmpegSpawner traits, so tests can substitute
// their own implementations.
//
// KEY COMPONENTS:
// - Traits for external tool interactions (FfmpegSpawner, FfprobeExecutor)
// - Concrete implementations using the ffmpeg-sidecar and ffprobe crates
// - Conversion command construction (ffmpeg.rs)
// - Dependency checking functions

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Conversion command construction and execution
pub mod ffmpeg;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for probing audio streams
pub mod ffprobe_executor;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{build_convert_args, build_convert_command, muxer_for_format, run_ffmpeg_convert};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor, StreamInfo, audio_stream_info};

/// External commands the pipeline cannot run without.
pub const REQUIRED_TOOLS: [&str; 2] = ["ffmpeg", "ffprobe"];

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a required external command is available and executable by
/// running it with `-version`.
///
/// # Returns
///
/// * `Ok(())` - The command started
/// * `Err(CoreError::DependencyNotFound)` - The command is not on `PATH` or
///   cannot be started
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        // A tool that exists but cannot be started (e.g. not executable) is
        // as unusable as a missing one.
        Err(e) => {
            log::debug!("Dependency '{}' cannot be started: {}", cmd_name, e);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
    }
}

/// Checks every tool in [`REQUIRED_TOOLS`], stopping at the first missing one.
pub fn check_dependencies() -> CoreResult<()> {
    for tool in REQUIRED_TOOLS {
        check_dependency(tool)?;
    }
    Ok(())
}
