// ============================================================================
// pcmshift-core/src/processing/plan.rs
// ============================================================================
//
// JOB PLANNER: Turning a classified file into a concrete job
//
// The destination is always `<output_dir>/<base_name>.<container_format>`.
// Two safety checks run here, before anything is spawned:
//
// - the destination must not be the source file itself
// - the destination must not already exist (ffmpeg is also run with `-n`)

use crate::config::CoreConfig;
use crate::discovery::MediaFile;
use crate::error::{CoreError, CoreResult};
use crate::processing::classify::Classification;

use serde::Serialize;

use std::fmt;
use std::path::{Path, PathBuf};

/// What happens to the audio streams of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "codec", rename_all = "snake_case")]
pub enum AudioMode {
    /// Stream-copy all audio streams
    Copy,
    /// Re-encode all audio streams with the given ffmpeg codec
    Transcode(String),
}

impl AudioMode {
    /// Value passed to ffmpeg's `-c:a`.
    pub fn ffmpeg_codec(&self) -> &str {
        match self {
            AudioMode::Copy => "copy",
            AudioMode::Transcode(codec) => codec,
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioMode::Copy => write!(f, "copy"),
            AudioMode::Transcode(codec) => write!(f, "transcode to {codec}"),
        }
    }
}

/// A fully resolved conversion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub audio_mode: AudioMode,
    pub container_format: String,
}

impl JobPlan {
    pub fn source_file_name(&self) -> String {
        file_name_of(&self.source)
    }

    pub fn destination_file_name(&self) -> String {
        file_name_of(&self.destination)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Destination path for a file under the given configuration.
pub fn destination_for(file: &MediaFile, config: &CoreConfig) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.{}", file.base_name, config.container_format))
}

/// Builds the job for a classified file.
///
/// Returns `Ok(None)` when the classification is a skip.
///
/// # Errors
///
/// * `CoreError::PathConflict` - the destination is the source file
/// * `CoreError::OutputExists` - the destination is already present
pub fn plan(
    file: &MediaFile,
    classification: &Classification,
    config: &CoreConfig,
) -> CoreResult<Option<JobPlan>> {
    let audio_mode = match classification {
        Classification::Skip { .. } => return Ok(None),
        Classification::CopyAudio => AudioMode::Copy,
        Classification::TranscodeAudio { codec } => AudioMode::Transcode(codec.clone()),
    };

    let destination = destination_for(file, config);

    if same_file(&file.path, &destination) {
        return Err(CoreError::PathConflict {
            source_path: file.path.clone(),
            destination,
        });
    }

    if destination.exists() {
        return Err(CoreError::OutputExists(destination));
    }

    Ok(Some(JobPlan {
        source: file.path.clone(),
        destination,
        audio_mode,
        container_format: config.container_format.clone(),
    }))
}

/// True when both paths name the same file.
///
/// Canonical paths are compared when both resolve; otherwise the absolute
/// forms are compared.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (a.canonicalize(), b.canonicalize()) {
        return a == b;
    }
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn media(path: PathBuf) -> MediaFile {
        MediaFile::from_path(path).unwrap()
    }

    fn transcode() -> Classification {
        Classification::TranscodeAudio {
            codec: "pcm_s16le".to_string(),
        }
    }

    #[test]
    fn skip_produces_no_plan() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        let file = media(dir.path().join("clip.mp4"));
        let result = plan(&file, &Classification::skip("no audio stream"), &config).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn destination_uses_base_name_and_format() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let mut config = CoreConfig::new(input.path().to_path_buf());
        config.output_dir = output.path().to_path_buf();
        config.container_format = "mkv".to_string();

        let file = media(input.path().join("holiday.clip.MP4"));
        let job = plan(&file, &Classification::CopyAudio, &config)
            .unwrap()
            .unwrap();

        assert_eq!(job.destination, output.path().join("holiday.clip.mkv"));
        assert_eq!(job.audio_mode, AudioMode::Copy);
        assert_eq!(job.container_format, "mkv");
    }

    #[test]
    fn same_path_is_a_conflict() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("clip.mov");
        std::fs::write(&source, b"video").unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());

        let err = plan(&media(source.clone()), &transcode(), &config).unwrap_err();
        assert!(matches!(err, CoreError::PathConflict { .. }));
        assert!(source.exists());
    }

    #[test]
    fn existing_destination_is_refused() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"video").unwrap();
        std::fs::write(dir.path().join("clip.mov"), b"earlier output").unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());

        let err = plan(&media(source), &transcode(), &config).unwrap_err();
        assert!(matches!(err, CoreError::OutputExists(_)));
    }

    #[test]
    fn same_file_compares_absolute_forms() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("x.mov");
        assert!(same_file(&a, &dir.path().join(".").join("x.mov")));
        assert!(!same_file(&a, &dir.path().join("y.mov")));
    }

    #[test]
    fn audio_mode_codec_values() {
        assert_eq!(AudioMode::Copy.ffmpeg_codec(), "copy");
        assert_eq!(AudioMode::Transcode("ac3".into()).ffmpeg_codec(), "ac3");
    }
}
