//! Running one encode.
//!
//! ffmpeg never writes the final output path directly. It writes a sibling
//! `<stem>.partial.<ext>` file which is renamed onto the output only after
//! the process exits successfully, so an existing output always means a
//! completed encode.

use std::path::{Path, PathBuf};

use batchforge_common::paths::partial_path_for;

use crate::args::ArgumentList;
use crate::command::{CommandRunner, ToolCommand, ToolStatus};
use crate::{Error, Result};

/// Fixed flags placed before the input of every encode.
const LEADING_FLAGS: [&str; 2] = ["-hide_banner", "-nostdin"];

/// Everything needed to encode one file.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Synthesized blocks between the input and the output path.
    pub args: ArgumentList,
}

impl EncodeRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, args: ArgumentList) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            args,
        }
    }

    /// The command as a user would run it by hand, targeting the final
    /// output path.
    pub fn command(&self, ffmpeg: &Path) -> ToolCommand {
        self.command_to(ffmpeg, &self.output)
    }

    /// Path ffmpeg writes to while the encode is running.
    pub fn partial_output(&self) -> PathBuf {
        partial_path_for(&self.output)
    }

    fn command_to(&self, ffmpeg: &Path, target: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(ffmpeg);
        cmd.args(LEADING_FLAGS)
            .arg("-i")
            .arg(&self.input)
            .args(self.args.iter())
            .arg(target);
        cmd
    }
}

/// How an encode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeResult {
    pub status: ToolStatus,
    /// Whether the final output exists after the encode.
    pub output_exists: bool,
}

impl EncodeResult {
    /// Success requires both a clean exit and the output on disk.
    pub fn success(&self) -> bool {
        self.status.success && self.output_exists
    }
}

/// Encode `request` with ffmpeg, blocking until it exits.
///
/// Fails with [`Error::FileNotFound`] if the input has vanished since
/// discovery. Parent directories of the output are created first, and a
/// leftover partial file from an interrupted run is removed before starting.
/// A non-zero exit is reported through [`EncodeResult`], not as an `Err`.
pub fn run_encode(
    runner: &dyn CommandRunner,
    ffmpeg: &Path,
    request: &EncodeRequest,
) -> Result<EncodeResult> {
    if !request.input.exists() {
        return Err(Error::file_not_found(&request.input));
    }
    if let Some(parent) = request.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let partial = request.partial_output();
    if partial.exists() {
        #[cfg(feature = "tracing")]
        tracing::debug!("Removing stale partial output {:?}", partial);
        std::fs::remove_file(&partial)?;
    }

    let status = runner.status(&request.command_to(ffmpeg, &partial))?;

    if status.success && partial.exists() {
        std::fs::rename(&partial, &request.output)?;
    } else if partial.exists() {
        #[cfg(feature = "tracing")]
        tracing::debug!("Discarding partial output {:?} ({})", partial, status);
        let _ = std::fs::remove_file(&partial);
    }

    Ok(EncodeResult {
        status,
        output_exists: request.output.exists(),
    })
}
