//! Video encoder profiles.

use serde::{Deserialize, Serialize};

use super::ArgumentList;

/// Static parameter table of one encoder profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoParams {
    /// ffmpeg encoder name.
    pub codec: &'static str,
    /// Rate control flag and value, e.g. `-crf 20`.
    pub rate_control: (&'static str, &'static str),
    pub preset: &'static str,
    pub pix_fmt: &'static str,
    /// Extra flag/value pair for grain retention, if the encoder has one.
    pub grain_tune: Option<(&'static str, &'static str)>,
}

const X265: VideoParams = VideoParams {
    codec: "libx265",
    rate_control: ("-crf", "20"),
    preset: "slow",
    pix_fmt: "yuv420p10le",
    grain_tune: Some(("-tune", "grain")),
};

const X264: VideoParams = VideoParams {
    codec: "libx264",
    rate_control: ("-crf", "18"),
    preset: "slow",
    pix_fmt: "yuv420p",
    grain_tune: None,
};

const AV1: VideoParams = VideoParams {
    codec: "libsvtav1",
    rate_control: ("-crf", "28"),
    preset: "6",
    pix_fmt: "yuv420p10le",
    grain_tune: None,
};

const NVENC: VideoParams = VideoParams {
    codec: "hevc_nvenc",
    rate_control: ("-cq", "22"),
    preset: "p7",
    pix_fmt: "p010le",
    grain_tune: None,
};

/// Named video encoder configuration, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderProfile {
    /// HEVC via libx265
    #[default]
    X265,
    /// H.264 via libx264
    X264,
    /// AV1 via SVT-AV1
    Av1,
    /// HEVC via NVIDIA NVENC
    Nvenc,
}

impl EncoderProfile {
    pub const ALL: [EncoderProfile; 4] = [
        EncoderProfile::X265,
        EncoderProfile::X264,
        EncoderProfile::Av1,
        EncoderProfile::Nvenc,
    ];

    /// The profile's parameter table.
    pub fn params(&self) -> &'static VideoParams {
        match self {
            EncoderProfile::X265 => &X265,
            EncoderProfile::X264 => &X264,
            EncoderProfile::Av1 => &AV1,
            EncoderProfile::Nvenc => &NVENC,
        }
    }

    /// Name accepted on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            EncoderProfile::X265 => "x265",
            EncoderProfile::X264 => "x264",
            EncoderProfile::Av1 => "av1",
            EncoderProfile::Nvenc => "nvenc",
        }
    }

    pub fn supports_grain(&self) -> bool {
        self.params().grain_tune.is_some()
    }
}

impl std::fmt::Display for EncoderProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EncoderProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("Unknown encoder: {} (expected one of {})", s, names.join(", "))
            })
    }
}

/// Map the first video stream and apply the profile's parameter table.
///
/// Only stream `0:v:0` is ever encoded; further video streams are dropped.
pub fn video_args(args: &mut ArgumentList, profile: EncoderProfile, grain: bool) {
    let p = profile.params();
    args.pair("-map", "0:v:0")
        .pair("-c:v", p.codec)
        .pair(p.rate_control.0, p.rate_control.1)
        .pair("-preset", p.preset)
        .pair("-pix_fmt", p.pix_fmt);

    match (grain, p.grain_tune) {
        (true, Some((flag, value))) => {
            args.pair(flag, value);
        }
        (true, None) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Grain tuning is not supported by the {} profile, ignoring", profile);
        }
        (false, _) => {}
    }
}
