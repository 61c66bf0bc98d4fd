//! Output container and muxer options.

use serde::{Deserialize, Serialize};

use super::ArgumentList;

/// Supported output container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// MPEG-4 Part 14 container
    #[default]
    Mp4,
    /// Matroska container
    Mkv,
    /// QuickTime container
    Mov,
}

impl Container {
    /// Get the file extension for this container.
    pub fn extension(&self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Mkv => "mkv",
            Container::Mov => "mov",
        }
    }

    /// Whether the muxer understands `-movflags`.
    pub fn supports_faststart(&self) -> bool {
        matches!(self, Container::Mp4 | Container::Mov)
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for Container {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp4" | "m4v" => Ok(Container::Mp4),
            "mkv" | "matroska" => Ok(Container::Mkv),
            "mov" | "quicktime" => Ok(Container::Mov),
            _ => Err(format!(
                "Unknown container format: {} (expected mp4, mkv or mov)",
                s
            )),
        }
    }
}

/// Carry global metadata over and, for MP4-family outputs, move the index
/// to the front of the file.
pub fn container_args(args: &mut ArgumentList, container: Container) {
    args.pair("-map_metadata", "0");
    if container.supports_faststart() {
        args.pair("-movflags", "+faststart");
    }
}
