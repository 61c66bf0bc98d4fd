//! ffmpeg argument synthesis.
//!
//! Every file gets the same shape of command:
//!
//! ```text
//! ffmpeg -hide_banner -nostdin -i <input>
//!        <video> <audio> <subtitles> -map_metadata 0 [-movflags +faststart] <output>
//! ```
//!
//! The blocks are produced by the submodules and collected in an
//! [`ArgumentList`]; [`synthesize`] runs probe, selection and synthesis for
//! one file.

mod audio;
mod container;
mod subtitle;
mod video;

pub use audio::{audio_args, AudioMode, AudioPolicy, STEREO_CHANNELS, SURROUND_CHANNELS};
pub use container::{container_args, Container};
pub use subtitle::subtitle_args;
pub use video::{video_args, EncoderProfile, VideoParams};

use std::path::Path;

use crate::probe::{StreamInventory, StreamKind, StreamProbe};
use crate::selection::{select_tracks, Selection};

/// Ordered engine arguments, only ever appended to.
///
/// Tokens stay discrete; nothing is joined into a string and re-split, so
/// paths and values with spaces survive unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    tokens: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single token.
    pub fn push(&mut self, token: impl Into<String>) -> &mut Self {
        self.tokens.push(token.into());
        self
    }

    /// Append a flag followed by its value.
    pub fn pair(&mut self, flag: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push(flag).push(value)
    }

    /// Append several tokens.
    pub fn extend<I, S>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }

    /// Number of times `flag` is immediately followed by `value`.
    #[cfg(test)]
    pub(crate) fn count_pair(&self, flag: &str, value: &str) -> usize {
        self.tokens
            .windows(2)
            .filter(|w| w[0] == flag && w[1] == value)
            .count()
    }

    /// Value following the first occurrence of `flag`.
    #[cfg(test)]
    pub(crate) fn value_of(&self, flag: &str) -> Option<&str> {
        self.tokens
            .windows(2)
            .find(|w| w[0] == flag)
            .map(|w| w[1].as_str())
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl From<ArgumentList> for Vec<String> {
    fn from(list: ArgumentList) -> Self {
        list.tokens
    }
}

/// Per-run encode settings, applied identically to every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeSettings {
    pub profile: EncoderProfile,
    pub container: Container,
    /// Grain retention tuning; only honored by profiles that support it.
    pub grain: bool,
    pub audio_mode: AudioMode,
    pub audio_policy: AudioPolicy,
    /// Raw audio selection, comma-separated 1-based indices.
    pub audio_tracks: Option<String>,
    /// Raw subtitle selection; `None` carries every subtitle stream.
    pub subtitle_tracks: Option<String>,
}

/// Everything derived for one file.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub inventory: StreamInventory,
    pub audio: Selection,
    pub subtitles: Selection,
    /// Video, audio, subtitle and container blocks, without input/output.
    pub args: ArgumentList,
}

/// Probe `file`, resolve the track selections and build its argument blocks.
pub fn synthesize(settings: &EncodeSettings, probe: &dyn StreamProbe, file: &Path) -> Synthesis {
    let inventory = StreamInventory::probe(probe, file);

    let audio = select_tracks(
        settings.audio_tracks.as_deref(),
        inventory.count(StreamKind::Audio),
        StreamKind::Audio,
    );
    let subtitles = select_tracks(
        settings.subtitle_tracks.as_deref(),
        inventory.count(StreamKind::Subtitle),
        StreamKind::Subtitle,
    );

    let mut args = ArgumentList::new();
    video_args(&mut args, settings.profile, settings.grain);
    audio_args(
        &mut args,
        audio.tracks.indices(),
        settings.audio_mode,
        &settings.audio_policy,
        |index| probe.audio_channels(file, index),
    );
    subtitle_args(&mut args, &subtitles.tracks);
    container_args(&mut args, settings.container);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "{:?}: {} audio / {} subtitle streams, audio {:?}, subtitles {:?}",
        file,
        inventory.audio,
        inventory.subtitles,
        audio.tracks,
        subtitles.tracks
    );

    Synthesis {
        inventory,
        audio,
        subtitles,
        args,
    }
}

/// Emit default/non-default dispositions for `count` mapped streams of `kind`:
/// output position 0 becomes the default track, every later one is cleared.
pub(crate) fn disposition_args(args: &mut ArgumentList, kind: StreamKind, count: usize) {
    for position in 0..count {
        let value = if position == 0 { "default" } else { "0" };
        args.pair(format!("-disposition:{}:{position}", kind.specifier()), value);
    }
}
