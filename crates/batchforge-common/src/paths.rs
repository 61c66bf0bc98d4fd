//! Path utilities for detecting video files and mapping them into the
//! output tree.

use std::path::{Path, PathBuf};

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// Marker inserted before the extension of in-progress encodes.
const PARTIAL_MARKER: &str = "partial";

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use batchforge_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.MKV")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Map `input` (somewhere below `input_root`) to the same relative location
/// below `output_root`, with its extension replaced by `extension`.
///
/// Returns `None` if `input` is not inside `input_root` or has no file name.
pub fn output_path_for(
    input_root: &Path,
    input: &Path,
    output_root: &Path,
    extension: &str,
) -> Option<PathBuf> {
    let relative = input.strip_prefix(input_root).ok()?;
    relative.file_name()?;
    Some(output_root.join(relative).with_extension(extension))
}

/// Path an encode writes to before it is moved onto `output`.
///
/// `/out/movie.mp4` becomes `/out/movie.partial.mp4`, so the container is
/// still recognizable from the extension.
pub fn partial_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{stem}.{PARTIAL_MARKER}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{PARTIAL_MARKER}"),
    };
    output.with_file_name(name)
}
