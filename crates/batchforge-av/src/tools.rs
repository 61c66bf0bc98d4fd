//! External tool detection.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolved locations of the two tools a batch needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolve ffmpeg and ffprobe, preferring configured paths over `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] for the first tool that cannot be found.
    pub fn resolve(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Result<Self> {
        Ok(Self {
            ffmpeg: get_tool_path("ffmpeg", ffmpeg)?,
            ffprobe: get_tool_path("ffprobe", ffprobe)?,
        })
    }
}

/// Require that a tool is available on `PATH`, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Configured {} path {:?} does not exist, searching PATH",
            name,
            path
        );
    }

    require_tool(name)
}

/// Run `<tool> -version` and return the first line of stdout.
///
/// ffmpeg and ffprobe take `-version`, not `--version`.
pub fn detect_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("-version").output().ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_version_missing_tool() {
        assert!(detect_version(Path::new("nonexistent_tool_12345")).is_none());
    }

    #[test]
    fn test_require_missing_tool() {
        let err = require_tool("nonexistent_tool_12345").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn test_configured_path_wins() {
        let fake = NamedTempFile::new().unwrap();
        let path = get_tool_path("nonexistent_tool_12345", Some(fake.path())).unwrap();
        assert_eq!(path, fake.path());
    }

    #[test]
    fn test_missing_configured_path_falls_back_to_path_lookup() {
        let result = get_tool_path(
            "nonexistent_tool_12345",
            Some(Path::new("/nonexistent/dir/tool")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_with_configured_paths() {
        let ffmpeg = NamedTempFile::new().unwrap();
        let ffprobe = NamedTempFile::new().unwrap();
        let tools = ToolPaths::resolve(Some(ffmpeg.path()), Some(ffprobe.path())).unwrap();
        assert_eq!(tools.ffmpeg, ffmpeg.path());
        assert_eq!(tools.ffprobe, ffprobe.path());
    }
}
