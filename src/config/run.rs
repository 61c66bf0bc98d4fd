//! Resolution of file config and command-line flags into the settings of
//! one batch run.

use super::Config;
use crate::batch::FailurePolicy;
use anyhow::{Context, Result};
use batchforge_av::args::{AudioMode, AudioPolicy, Container, EncodeSettings, EncoderProfile};
use std::path::{Component, Path, PathBuf};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub encoder: Option<EncoderProfile>,
    pub output_dir: Option<PathBuf>,
    pub audio_tracks: Option<String>,
    pub audio_mode: Option<AudioMode>,
    pub subtitle_tracks: Option<String>,
    pub grain: bool,
    pub container: Option<Container>,
    pub dry_run: bool,
    pub fail_fast: bool,
}

/// Settings of one batch run, fixed before the first file is touched.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Absolute input root.
    pub input_dir: PathBuf,
    /// Absolute output root.
    pub output_dir: PathBuf,
    pub settings: EncodeSettings,
    pub failure_policy: FailurePolicy,
    /// Print commands instead of running them.
    pub dry_run: bool,
}

impl RunConfig {
    /// Merge `config` and `overrides` for a run over `input_dir`.
    ///
    /// Fails if the input directory does not exist or the output root would
    /// be the input root itself.
    pub fn resolve(config: &Config, input_dir: &Path, overrides: Overrides) -> Result<Self> {
        if !input_dir.is_dir() {
            anyhow::bail!("Input directory does not exist: {:?}", input_dir);
        }
        let input_dir = std::fs::canonicalize(input_dir)
            .with_context(|| format!("Failed to resolve input directory: {:?}", input_dir))?;

        let output_dir = match overrides.output_dir.or_else(|| config.batch.output_dir.clone()) {
            Some(dir) => absolutize(&expand_tilde(&dir))?,
            None => default_output_dir(&input_dir)?,
        };
        if output_dir == input_dir {
            anyhow::bail!(
                "Output directory must differ from the input directory: {:?}",
                output_dir
            );
        }

        let profile = overrides.encoder.unwrap_or(config.encode.profile);
        let grain = overrides.grain || config.encode.grain;
        if grain && !profile.supports_grain() {
            tracing::warn!(
                "Grain tuning is only available for x265, ignoring it for {}",
                profile
            );
        }

        let settings = EncodeSettings {
            profile,
            container: overrides.container.unwrap_or(config.encode.container),
            grain,
            audio_mode: overrides.audio_mode.unwrap_or(config.audio.mode),
            audio_policy: AudioPolicy {
                surround_bitrate: config.audio.surround_bitrate.clone(),
                stereo_bitrate: config.audio.stereo_bitrate.clone(),
                ..AudioPolicy::default()
            },
            audio_tracks: overrides.audio_tracks.or_else(|| config.audio.tracks.clone()),
            subtitle_tracks: overrides
                .subtitle_tracks
                .or_else(|| config.subtitles.tracks.clone()),
        };

        let failure_policy = if overrides.fail_fast || config.batch.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        };

        Ok(Self {
            input_dir,
            output_dir,
            settings,
            failure_policy,
            dry_run: overrides.dry_run,
        })
    }
}

/// `<parent>/<name>_encoded` next to the input directory.
fn default_output_dir(input_dir: &Path) -> Result<PathBuf> {
    let name = input_dir
        .file_name()
        .with_context(|| format!("Cannot derive an output directory from {:?}", input_dir))?;
    let parent = input_dir.parent().unwrap_or(input_dir);
    Ok(parent.join(format!("{}_encoded", name.to_string_lossy())))
}

fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Absolute form of `path` with symlinks resolved in the part that already
/// exists, so it compares equal to paths found while walking the input. The
/// part that does not exist yet is normalized lexically.
fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve output directory: {:?}", path))?;

    let components: Vec<Component> = absolute.components().collect();
    let mut split = components.len();
    let mut existing = PathBuf::new();
    for (i, component) in components.iter().enumerate() {
        let next = existing.join(component);
        if !next.exists() {
            split = i;
            break;
        }
        existing = next;
    }

    let mut resolved = std::fs::canonicalize(&existing)
        .with_context(|| format!("Failed to resolve output directory: {:?}", path))?;
    for component in &components[split..] {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn library() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("movies")).unwrap();
        dir
    }

    #[test]
    fn defaults_without_flags_or_config() {
        let root = library();
        let run = RunConfig::resolve(
            &Config::default(),
            &root.path().join("movies"),
            Overrides::default(),
        )
        .unwrap();

        let canonical = std::fs::canonicalize(root.path()).unwrap();
        assert_eq!(run.input_dir, canonical.join("movies"));
        assert_eq!(run.output_dir, canonical.join("movies_encoded"));
        assert_eq!(run.settings, EncodeSettings::default());
        assert_eq!(run.failure_policy, FailurePolicy::Continue);
        assert!(!run.dry_run);
    }

    #[test]
    fn flags_override_config() {
        let root = library();
        let mut config = Config::default();
        config.encode.profile = EncoderProfile::X264;
        config.audio.tracks = Some("1".into());
        config.subtitles.tracks = Some("2".into());
        config.audio.stereo_bitrate = "160k".into();

        let overrides = Overrides {
            encoder: Some(EncoderProfile::Av1),
            audio_tracks: Some("2,1".into()),
            container: Some(Container::Mkv),
            fail_fast: true,
            output_dir: Some(root.path().join("out")),
            ..Default::default()
        };
        let run = RunConfig::resolve(&config, &root.path().join("movies"), overrides).unwrap();

        assert_eq!(run.settings.profile, EncoderProfile::Av1);
        assert_eq!(run.settings.container, Container::Mkv);
        assert_eq!(run.settings.audio_tracks.as_deref(), Some("2,1"));
        assert_eq!(run.settings.subtitle_tracks.as_deref(), Some("2"));
        assert_eq!(run.settings.audio_policy.stereo_bitrate, "160k");
        assert_eq!(run.settings.audio_policy.codec, "aac");
        assert_eq!(run.failure_policy, FailurePolicy::FailFast);
        assert!(run.output_dir.ends_with("out"));
        assert!(run.output_dir.is_absolute());
    }

    #[test]
    fn missing_input_directory() {
        let root = library();
        let err = RunConfig::resolve(
            &Config::default(),
            &root.path().join("nope"),
            Overrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Input directory does not exist"));
    }

    #[test]
    fn missing_output_dir_is_normalized() {
        let root = library();
        let input = root.path().join("movies");
        let overrides = Overrides {
            output_dir: Some(input.join("x").join("..").join(".").join("encoded")),
            ..Default::default()
        };
        let run = RunConfig::resolve(&Config::default(), &input, overrides).unwrap();

        assert_eq!(run.output_dir, run.input_dir.join("encoded"));
    }

    #[test]
    fn output_equal_to_input_is_rejected() {
        let root = library();
        let input = root.path().join("movies");
        let overrides = Overrides {
            output_dir: Some(input.clone()),
            ..Default::default()
        };
        assert!(RunConfig::resolve(&Config::default(), &input, overrides).is_err());
    }
}
