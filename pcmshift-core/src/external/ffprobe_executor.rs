//! FFprobe integration for audio stream inspection
//!
//! This module runs ffprobe against an input file and reduces its stream list
//! to the two facts the classification policy needs: the codec of the first
//! audio stream and the number of audio streams.

use crate::error::{CoreError, CoreResult};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Audio facts gathered from one probe.
///
/// Fields are private so the invariant holds: when no codec was detected the
/// track count is always 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    audio_codec: Option<String>,
    audio_track_count: u32,
}

impl StreamInfo {
    pub fn new(audio_codec: Option<String>, audio_track_count: u32) -> Self {
        let audio_codec = audio_codec.filter(|codec| !codec.trim().is_empty());
        let audio_track_count = if audio_codec.is_some() {
            audio_track_count
        } else {
            0
        };
        Self {
            audio_codec,
            audio_track_count,
        }
    }

    /// A file with no detectable audio.
    pub fn none() -> Self {
        Self::default()
    }

    /// Codec identifier of the first audio stream, as reported by the prober.
    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    pub fn audio_track_count(&self) -> u32 {
        self.audio_track_count
    }
}

/// Trait for probing the audio streams of a media file.
pub trait FfprobeExecutor {
    /// Returns the first audio stream's codec and the total audio stream count.
    fn inspect_audio(&self, input_path: &Path) -> CoreResult<StreamInfo>;
}

/// Concrete implementation of `FfprobeExecutor` using the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn inspect_audio(&self, input_path: &Path) -> CoreResult<StreamInfo> {
        log::debug!(
            "Running ffprobe (via crate) for audio streams on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => {
                let info = audio_stream_info(
                    metadata
                        .streams
                        .iter()
                        .map(|s| (s.codec_type.as_deref(), s.codec_name.as_deref())),
                );
                if info.audio_codec().is_none() {
                    log::debug!("No audio streams found by ffprobe for {}", input_path.display());
                }
                Ok(info)
            }
            Err(err) => {
                log::debug!(
                    "ffprobe failed for audio streams on {}: {:?}",
                    input_path.display(),
                    err
                );
                Err(map_ffprobe_error(err, input_path))
            }
        }
    }
}

/// Reduces `(codec_type, codec_name)` pairs, in stream order, to a [`StreamInfo`].
///
/// The codec comes from the first audio stream (ffprobe selector `a:0`); the
/// count covers every audio stream.
pub fn audio_stream_info<'a, I>(streams: I) -> StreamInfo
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    let mut first_codec: Option<Option<&str>> = None;
    let mut count = 0u32;

    for (codec_type, codec_name) in streams {
        if codec_type != Some("audio") {
            continue;
        }
        count += 1;
        if first_codec.is_none() {
            first_codec = Some(codec_name);
        }
    }

    StreamInfo::new(first_codec.flatten().map(str::to_string), count)
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    let file = input_path.display();
    match err {
        FfProbeError::Io(io_err) => {
            CoreError::Probe(format!("could not run ffprobe on {file}: {io_err}"))
        }
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::Probe(format!(
                "ffprobe exited with {} for {file}: {}",
                output.status,
                stderr.trim()
            ))
        }
        FfProbeError::Deserialize(err) => {
            CoreError::Probe(format!("unreadable ffprobe output for {file}: {err}"))
        }
        _ => CoreError::Probe(format!("unknown ffprobe error for {file}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_codec_forces_zero_tracks() {
        let info = StreamInfo::new(None, 3);
        assert_eq!(info.audio_codec(), None);
        assert_eq!(info.audio_track_count(), 0);

        let info = StreamInfo::new(Some("  ".to_string()), 2);
        assert_eq!(info, StreamInfo::none());
    }

    #[test]
    fn first_audio_stream_wins() {
        let streams = [
            (Some("video"), Some("h264")),
            (Some("audio"), Some("aac")),
            (Some("subtitle"), Some("mov_text")),
            (Some("audio"), Some("ac3")),
        ];
        let info = audio_stream_info(streams);
        assert_eq!(info.audio_codec(), Some("aac"));
        assert_eq!(info.audio_track_count(), 2);
    }

    #[test]
    fn no_audio_streams() {
        let streams = [(Some("video"), Some("h264")), (None, Some("bin_data"))];
        assert_eq!(audio_stream_info(streams), StreamInfo::none());
    }
}
