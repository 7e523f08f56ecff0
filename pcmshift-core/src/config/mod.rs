//! Configuration structures and constants for the pcmshift-core library.
//!
//! A single immutable [`CoreConfig`] is built once per run (usually by the CLI
//! through [`CoreConfigBuilder`]) and passed by reference to every component.

mod builder;

use crate::error::{CoreError, CoreResult};

use std::path::PathBuf;

pub use builder::CoreConfigBuilder;

/// Default audio codec: signed 16-bit little-endian PCM.
pub const DEFAULT_AUDIO_CODEC: &str = "pcm_s16le";

/// Alias accepted (case-insensitively) for [`DEFAULT_AUDIO_CODEC`].
pub const LPCM_ALIAS: &str = "lpcm";

/// Default container format (QuickTime).
pub const DEFAULT_CONTAINER_FORMAT: &str = "mov";

/// Default number of concurrent encodes.
pub const DEFAULT_JOBS: usize = 1;

/// Main configuration structure for the pcmshift-core library.
///
/// Codec and format values are stored normalized; use [`normalize_audio_codec`]
/// and [`normalize_container_format`] (the builder does this for you) when
/// constructing the struct by hand.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory scanned for input video files
    pub input_dir: PathBuf,

    /// Directory receiving converted files (defaults to `input_dir`)
    pub output_dir: PathBuf,

    /// ffmpeg audio codec used for transcoding, e.g. `pcm_s16le`
    pub audio_codec: String,

    /// Output container extension, e.g. `mov`
    pub container_format: String,

    /// Maximum number of encodes in flight at once
    pub jobs: usize,

    /// Describe the work without touching the filesystem or running ffmpeg
    pub dry_run: bool,

    /// Keep originals after a successful conversion
    pub keep_original: bool,

    /// Transcode even when the detected audio codec is not AAC
    pub force: bool,
}

impl CoreConfig {
    /// Creates a configuration with default settings for the given input directory.
    /// The output directory defaults to the input directory.
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            output_dir: input_dir.clone(),
            input_dir,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            container_format: DEFAULT_CONTAINER_FORMAT.to_string(),
            jobs: DEFAULT_JOBS,
            dry_run: false,
            keep_original: false,
            force: false,
        }
    }

    /// Validates the configuration.
    ///
    /// The input directory check comes first so that a bad path is reported
    /// as such even when other settings are also wrong.
    pub fn validate(&self) -> CoreResult<()> {
        match std::fs::metadata(&self.input_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(CoreError::InvalidInputDir {
                    path: self.input_dir.clone(),
                    reason: "not a directory".to_string(),
                });
            }
            Err(e) => {
                return Err(CoreError::InvalidInputDir {
                    path: self.input_dir.clone(),
                    reason: e.to_string(),
                });
            }
        }

        if self.jobs == 0 {
            return Err(CoreError::Config(
                "concurrency limit must be at least 1".to_string(),
            ));
        }

        if self.audio_codec.is_empty() {
            return Err(CoreError::Config("audio codec must not be empty".to_string()));
        }

        if self.container_format.is_empty()
            || self.container_format.contains(['/', '\\', '.'])
        {
            return Err(CoreError::Config(format!(
                "invalid container format '{}'",
                self.container_format
            )));
        }

        if self.audio_codec.starts_with("pcm_") && self.container_format == "mp4" {
            log::warn!(
                "The mp4 container cannot hold {} audio; ffmpeg will reject these jobs and originals will be kept",
                self.audio_codec
            );
        }

        Ok(())
    }

    /// True when jobs must run one after another.
    pub fn is_sequential(&self) -> bool {
        self.jobs <= 1 || self.dry_run
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

/// Normalizes a user-supplied audio codec: trims, lower-cases and maps the
/// `lpcm` alias to `pcm_s16le`.
pub fn normalize_audio_codec(codec: &str) -> String {
    let codec = codec.trim();
    if codec.eq_ignore_ascii_case(LPCM_ALIAS) {
        DEFAULT_AUDIO_CODEC.to_string()
    } else {
        codec.to_ascii_lowercase()
    }
}

/// Normalizes a container format: trims, strips one leading dot and lower-cases.
pub fn normalize_container_format(format: &str) -> String {
    let format = format.trim();
    format
        .strip_prefix('.')
        .unwrap_or(format)
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lpcm_alias_maps_to_pcm_s16le() {
        assert_eq!(normalize_audio_codec("lpcm"), "pcm_s16le");
        assert_eq!(normalize_audio_codec("LPCM"), "pcm_s16le");
        assert_eq!(normalize_audio_codec(" LpCm "), "pcm_s16le");
        assert_eq!(normalize_audio_codec("AC3"), "ac3");
        assert_eq!(normalize_audio_codec("pcm_s24le"), "pcm_s24le");
    }

    #[test]
    fn container_format_is_normalized() {
        assert_eq!(normalize_container_format("MOV"), "mov");
        assert_eq!(normalize_container_format(".mkv"), "mkv");
        assert_eq!(normalize_container_format(" mp4 "), "mp4");
    }

    #[test]
    fn new_defaults_output_to_input() {
        let config = CoreConfig::new(PathBuf::from("/videos"));
        assert_eq!(config.output_dir, PathBuf::from("/videos"));
        assert_eq!(config.audio_codec, DEFAULT_AUDIO_CODEC);
        assert_eq!(config.container_format, DEFAULT_CONTAINER_FORMAT);
        assert_eq!(config.jobs, 1);
        assert!(!config.dry_run && !config.keep_original && !config.force);
    }

    #[test]
    fn validate_rejects_missing_input_dir() {
        let config = CoreConfig::new(PathBuf::from("surely/this/does/not/exist"));
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidInputDir { .. })
        ));
    }

    #[test]
    fn validate_rejects_file_as_input_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"x").unwrap();
        let config = CoreConfig::new(file);
        match config.validate() {
            Err(CoreError::InvalidInputDir { reason, .. }) => assert_eq!(reason, "not a directory"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_zero_jobs_and_bad_format() {
        let dir = tempdir().unwrap();
        let mut config = CoreConfig::new(dir.path().to_path_buf());
        config.jobs = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.jobs = 2;
        config.container_format = "../mov".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.container_format = "mov".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn dry_run_forces_sequential_dispatch() {
        let mut config = CoreConfig::default();
        config.jobs = 4;
        assert!(!config.is_sequential());
        config.dry_run = true;
        assert!(config.is_sequential());
    }
}
