//! Audio mapping and codec policy.

use serde::{Deserialize, Serialize};

use super::{disposition_args, ArgumentList};
use crate::probe::StreamKind;

/// Channel target for sources with more than two channels.
pub const SURROUND_CHANNELS: u32 = 6;

/// Channel target for mono and stereo sources.
pub const STEREO_CHANNELS: u32 = 2;

/// Whether selected audio streams are passed through or re-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioMode {
    /// Pass streams through unchanged.
    #[default]
    Copy,
    /// Re-encode with the channel-dependent [`AudioPolicy`].
    Transcode,
}

impl std::fmt::Display for AudioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AudioMode::Copy => "copy",
            AudioMode::Transcode => "transcode",
        })
    }
}

impl std::str::FromStr for AudioMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "copy" => Ok(AudioMode::Copy),
            "transcode" => Ok(AudioMode::Transcode),
            _ => Err(format!(
                "Unknown audio mode: {} (expected copy or transcode)",
                s
            )),
        }
    }
}

/// Codec and bitrates used when transcoding audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPolicy {
    pub codec: String,
    /// Bitrate for sources with more than two channels.
    pub surround_bitrate: String,
    /// Bitrate for mono/stereo sources.
    pub stereo_bitrate: String,
}

impl Default for AudioPolicy {
    fn default() -> Self {
        Self {
            codec: "aac".to_string(),
            surround_bitrate: "384k".to_string(),
            stereo_bitrate: "192k".to_string(),
        }
    }
}

impl AudioPolicy {
    /// Bitrate and channel target for a source with `channels` channels.
    pub fn target_for(&self, channels: u32) -> (&str, u32) {
        if channels > STEREO_CHANNELS {
            (self.surround_bitrate.as_str(), SURROUND_CHANNELS)
        } else {
            (self.stereo_bitrate.as_str(), STEREO_CHANNELS)
        }
    }
}

/// Map the selected audio streams (0-based source indices, in output order)
/// and emit their codec and disposition directives.
///
/// `channels` is only consulted in [`AudioMode::Transcode`].
pub fn audio_args(
    args: &mut ArgumentList,
    indices: &[usize],
    mode: AudioMode,
    policy: &AudioPolicy,
    channels: impl Fn(usize) -> u32,
) {
    if indices.is_empty() {
        return;
    }

    for index in indices {
        args.pair("-map", format!("0:a:{index}"));
    }

    match mode {
        AudioMode::Copy => {
            args.pair("-c:a", "copy");
        }
        AudioMode::Transcode => {
            for (position, &index) in indices.iter().enumerate() {
                let source_channels = channels(index);
                let (bitrate, target) = policy.target_for(source_channels);

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "Audio stream {} ({} ch) -> output {}: {} {} {} ch",
                    index,
                    source_channels,
                    position,
                    policy.codec,
                    bitrate,
                    target
                );

                args.pair(format!("-c:a:{position}"), policy.codec.as_str())
                    .pair(format!("-b:a:{position}"), bitrate)
                    .pair(format!("-ac:a:{position}"), target.to_string());
            }
        }
    }

    disposition_args(args, StreamKind::Audio, indices.len());
}
