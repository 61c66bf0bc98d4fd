mod run;
mod types;

pub use run::{Overrides, RunConfig};
pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config).with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./batchforge.toml",
        "~/.config/batchforge/config.toml",
        "/etc/batchforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    for (name, value) in [
        ("audio.surround_bitrate", &config.audio.surround_bitrate),
        ("audio.stereo_bitrate", &config.audio.stereo_bitrate),
    ] {
        if !is_valid_bitrate(value) {
            anyhow::bail!(
                "{} must be a number optionally followed by k or M, got '{}'",
                name,
                value
            );
        }
    }

    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}

/// `192k`, `1.5M` style values as accepted by ffmpeg's `-b:a`.
fn is_valid_bitrate(value: &str) -> bool {
    let digits = value
        .strip_suffix(|c: char| matches!(c, 'k' | 'K' | 'M'))
        .unwrap_or(value);
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.matches('.').count() <= 1
}
