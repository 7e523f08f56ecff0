// ============================================================================
// pcmshift-core/src/processing/classify.rs
// ============================================================================
//
// CLASSIFICATION POLICY: Deciding what to do with each file's audio
//
// A pure function of the probe result and the configuration. Rules are
// evaluated in order and the first match wins:
//
//   1. no audio stream                     -> skip
//   2. codec is not AAC and force is off   -> skip
//   3. more than one audio stream          -> copy all audio untouched
//   4. otherwise                           -> transcode to the configured codec
//
// Multi-track files are never transcoded: copying keeps every track intact.

use crate::config::CoreConfig;
use crate::external::StreamInfo;

use serde::Serialize;

use std::fmt;

/// Skip reason for files without an audio stream.
pub const REASON_NO_AUDIO: &str = "no audio stream";

/// Skip reason for non-AAC audio when force is off.
pub const REASON_NOT_AAC: &str = "audio not AAC and not forced";

/// The action decided for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Classification {
    Skip { reason: String },
    CopyAudio,
    TranscodeAudio { codec: String },
}

impl Classification {
    pub fn skip(reason: impl Into<String>) -> Self {
        Classification::Skip {
            reason: reason.into(),
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Classification::Skip { .. })
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Skip { reason } => write!(f, "skip ({reason})"),
            Classification::CopyAudio => write!(f, "copy audio"),
            Classification::TranscodeAudio { codec } => write!(f, "transcode audio to {codec}"),
        }
    }
}

/// Classifies a file from its probed audio streams.
#[must_use]
pub fn classify(info: &StreamInfo, config: &CoreConfig) -> Classification {
    let Some(codec) = info.audio_codec() else {
        return Classification::skip(REASON_NO_AUDIO);
    };

    if !codec.eq_ignore_ascii_case("aac") && !config.force {
        return Classification::skip(REASON_NOT_AAC);
    }

    if info.audio_track_count() > 1 {
        return Classification::CopyAudio;
    }

    Classification::TranscodeAudio {
        codec: config.audio_codec.clone(),
    }
}
