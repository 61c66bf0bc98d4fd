//! Recursive discovery of video files below the input root.

use anyhow::Result;
use batchforge_common::paths::{is_video_file, output_path_for};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// A discovered source file and where its encode goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    /// Path relative to the input root.
    pub relative: PathBuf,
    pub output: PathBuf,
}

/// Find video files below `input_root`, sorted by path.
///
/// Hidden entries and the output root (when it lives inside the input root)
/// are not descended into; unreadable entries are logged and skipped. Each
/// file's output mirrors its relative path below `output_root` with the
/// extension replaced by `extension`. When two sources map to the same
/// output, only the first in path order is kept and the collision is logged.
pub fn discover(input_root: &Path, output_root: &Path, extension: &str) -> Result<Vec<MediaFile>> {
    if !input_root.is_dir() {
        anyhow::bail!("Input directory does not exist: {:?}", input_root);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(input_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && e.path() != output_root));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_video_file(path) {
            continue;
        }

        let Some(output) = output_path_for(input_root, path, output_root, extension) else {
            continue;
        };
        let relative = path.strip_prefix(input_root).unwrap_or(path).to_path_buf();

        files.push(MediaFile {
            path: path.to_path_buf(),
            relative,
            output,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(drop_colliding_outputs(files))
}

fn drop_colliding_outputs(files: Vec<MediaFile>) -> Vec<MediaFile> {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    files
        .into_iter()
        .filter(|file| {
            if let Some(first) = claimed.get(&file.output) {
                warn!(
                    "Skipping {:?}: its output {:?} is already produced from {:?}",
                    file.relative, file.output, first
                );
                return false;
            }
            claimed.insert(file.output.clone(), file.relative.clone());
            true
        })
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
