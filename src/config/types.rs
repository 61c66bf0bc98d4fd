use batchforge_av::args::{AudioMode, Container, EncoderProfile};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub encode: EncodeConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub subtitles: SubtitleConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EncodeConfig {
    /// Video encoder profile (default: x265)
    #[serde(default)]
    pub profile: EncoderProfile,

    /// Grain retention tuning, x265 only
    #[serde(default)]
    pub grain: bool,

    /// Output container (default: mp4)
    #[serde(default)]
    pub container: Container,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub mode: AudioMode,

    /// Comma-separated 1-based audio tracks; first track when unset
    #[serde(default)]
    pub tracks: Option<String>,

    /// Bitrate for sources with more than two channels (default: "384k")
    #[serde(default = "default_surround_bitrate")]
    pub surround_bitrate: String,

    /// Bitrate for mono/stereo sources (default: "192k")
    #[serde(default = "default_stereo_bitrate")]
    pub stereo_bitrate: String,
}

fn default_surround_bitrate() -> String {
    "384k".to_string()
}

fn default_stereo_bitrate() -> String {
    "192k".to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            mode: AudioMode::default(),
            tracks: None,
            surround_bitrate: default_surround_bitrate(),
            stereo_bitrate: default_stereo_bitrate(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubtitleConfig {
    /// Comma-separated 1-based subtitle tracks; every track when unset
    #[serde(default)]
    pub tracks: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Output root; `<input>_encoded` next to the input directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Stop at the first failed file
    #[serde(default)]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
