// ============================================================================
// pcmshift-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Provides a fluent API for creating CoreConfig instances. Codec and format
// values are normalized on the way in, and the output directory falls back
// to the input directory when it is not set.

use std::path::PathBuf;

use super::{
    CoreConfig, DEFAULT_AUDIO_CODEC, DEFAULT_CONTAINER_FORMAT, DEFAULT_JOBS,
    normalize_audio_codec, normalize_container_format,
};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use pcmshift_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/videos"))
///     .audio_codec("LPCM")
///     .container_format("mov")
///     .jobs(4)
///     .keep_original(true)
///     .build();
///
/// assert_eq!(config.audio_codec, "pcm_s16le");
/// assert_eq!(config.output_dir, PathBuf::from("/path/to/videos"));
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    audio_codec: String,
    container_format: String,
    jobs: usize,
    dry_run: bool,
    keep_original: bool,
    force: bool,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            container_format: DEFAULT_CONTAINER_FORMAT.to_string(),
            jobs: DEFAULT_JOBS,
            dry_run: false,
            keep_original: false,
            force: false,
        }
    }

    pub fn input_dir(mut self, dir: PathBuf) -> Self {
        self.input_dir = Some(dir);
        self
    }

    /// Sets the output directory. When never called, the input directory is used.
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Sets the target audio codec. Accepts the `lpcm` alias.
    pub fn audio_codec(mut self, codec: &str) -> Self {
        self.audio_codec = normalize_audio_codec(codec);
        self
    }

    pub fn container_format(mut self, format: &str) -> Self {
        self.container_format = normalize_container_format(format);
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn keep_original(mut self, keep: bool) -> Self {
        self.keep_original = keep;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Builds the CoreConfig. Call [`CoreConfig::validate`] before use.
    pub fn build(self) -> CoreConfig {
        let input_dir = self.input_dir.unwrap_or_else(|| PathBuf::from("."));
        let output_dir = self.output_dir.unwrap_or_else(|| input_dir.clone());

        CoreConfig {
            input_dir,
            output_dir,
            audio_codec: self.audio_codec,
            container_format: self.container_format,
            jobs: self.jobs,
            dry_run: self.dry_run,
            keep_original: self.keep_original,
            force: self.force,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfigBuilder::new().build();
        assert_eq!(config.input_dir, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.audio_codec, "pcm_s16le");
        assert_eq!(config.container_format, "mov");
        assert_eq!(config.jobs, 1);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .input_dir(PathBuf::from("/in"))
            .output_dir(PathBuf::from("/out"))
            .audio_codec("AC3")
            .container_format(".MKV")
            .jobs(3)
            .dry_run(true)
            .keep_original(true)
            .force(true)
            .build();

        assert_eq!(config.input_dir, PathBuf::from("/in"));
        assert_eq!(config.output_dir, PathBuf::from("/out"));
        assert_eq!(config.audio_codec, "ac3");
        assert_eq!(config.container_format, "mkv");
        assert_eq!(config.jobs, 3);
        assert!(config.dry_run);
        assert!(config.keep_original);
        assert!(config.force);
    }
}
