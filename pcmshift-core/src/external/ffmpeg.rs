//! FFmpeg command building and execution for audio conversion
//!
//! Every conversion is a stream-copy of all video streams plus either a
//! stream-copy or a re-encode of all audio streams, written to a new file.
//! The encoder is always told to refuse an existing destination (`-n`).

use crate::error::{CoreResult, command_failed_error};
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::processing::plan::JobPlan;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, error};

use std::collections::VecDeque;

/// How many encoder error lines are kept for the failure message.
const STDERR_TAIL_LINES: usize = 5;

/// Maps a container extension to the ffmpeg muxer name passed with `-f`.
pub fn muxer_for_format(format: &str) -> &str {
    match format {
        "mkv" => "matroska",
        "webm" => "webm",
        other => other,
    }
}

/// Arguments following the input path, up to and including the destination.
fn output_args(plan: &JobPlan) -> Vec<String> {
    vec![
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "0:a".to_string(),
        "-map_metadata".to_string(),
        "0".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-c:a".to_string(),
        plan.audio_mode.ffmpeg_codec().to_string(),
        "-f".to_string(),
        muxer_for_format(&plan.container_format).to_string(),
    ]
}

/// Builds the ffmpeg-sidecar command for a job.
pub fn build_convert_command(plan: &JobPlan) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.hide_banner();
    cmd.arg("-n");
    cmd.input(plan.source.to_string_lossy().as_ref());
    cmd.args(output_args(plan));
    cmd.output(plan.destination.to_string_lossy().as_ref());
    cmd
}

/// Argument list (without the program name) of [`build_convert_command`].
///
/// Dry-run prints exactly these, so the preview never drifts from what a
/// live run spawns.
pub fn build_convert_args(plan: &JobPlan) -> Vec<String> {
    build_convert_command(plan)
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Runs the conversion for `plan` and waits for ffmpeg to exit.
///
/// Returns an error when the process cannot be started, its event stream
/// fails, or it exits unsuccessfully. Whether the output actually exists is
/// checked by the caller.
pub fn run_ffmpeg_convert<S: FfmpegSpawner>(spawner: &S, plan: &JobPlan) -> CoreResult<()> {
    let cmd = build_convert_command(plan);
    debug!("FFmpeg command: {:?}", cmd);

    let mut child = spawner.spawn(cmd)?;
    let mut stderr_tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let file_name = plan.source_file_name();

    child.handle_events(|event| {
        match event {
            FfmpegEvent::Error(message)
            | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) => {
                error!("ffmpeg [{}]: {}", file_name, message);
                if stderr_tail.len() == STDERR_TAIL_LINES {
                    stderr_tail.pop_front();
                }
                stderr_tail.push_back(message);
            }
            FfmpegEvent::Progress(progress) => {
                debug!(
                    "ffmpeg [{}]: time={} speed={:.2}x size={}kB",
                    file_name, progress.time, progress.speed, progress.size_kb
                );
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = child.wait()?;
    if !status.success() {
        let stderr = if stderr_tail.is_empty() {
            "no error output captured".to_string()
        } else {
            Vec::from(stderr_tail).join("; ")
        };
        return Err(command_failed_error("ffmpeg", status, stderr));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::plan::AudioMode;
    use std::path::PathBuf;

    fn plan(mode: AudioMode, format: &str) -> JobPlan {
        JobPlan {
            source: PathBuf::from("/in/clip.mp4"),
            destination: PathBuf::from(format!("/out/clip.{format}")),
            audio_mode: mode,
            container_format: format.to_string(),
        }
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn transcode_args_copy_video_and_refuse_overwrite() {
        let args = build_convert_args(&plan(AudioMode::Transcode("pcm_s16le".into()), "mov"));
        let expected_tail = strings(&[
            "-hide_banner", "-n", "-i", "/in/clip.mp4", "-map", "0:v", "-map", "0:a",
            "-map_metadata", "0", "-c:v", "copy", "-c:a", "pcm_s16le", "-f", "mov",
            "/out/clip.mov",
        ]);
        assert!(args.ends_with(&expected_tail), "unexpected args: {args:?}");
        assert!(!args.iter().any(|a| a == "-y"));
    }

    #[test]
    fn args_match_the_spawned_command() {
        let plan = plan(AudioMode::Copy, "mkv");
        let spawned: Vec<String> = build_convert_command(&plan)
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(build_convert_args(&plan), spawned);
    }

    #[test]
    fn copy_mode_and_matroska_muxer() {
        let args = build_convert_args(&plan(AudioMode::Copy, "mkv"));
        let audio = args.iter().position(|a| a == "-c:a").unwrap();
        assert_eq!(args[audio + 1], "copy");
        let format = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[format + 1], "matroska");
        assert_eq!(args.last().unwrap(), "/out/clip.mkv");
    }

    #[test]
    fn muxer_names() {
        assert_eq!(muxer_for_format("mkv"), "matroska");
        assert_eq!(muxer_for_format("webm"), "webm");
        assert_eq!(muxer_for_format("mov"), "mov");
        assert_eq!(muxer_for_format("mp4"), "mp4");
        assert_eq!(muxer_for_format("avi"), "avi");
    }
}
