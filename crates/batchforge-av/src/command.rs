//! Builder for external tool invocations and the runner seam that executes
//! them.
//!
//! Everything that shells out goes through [`CommandRunner`], so probing and
//! encoding can be exercised in tests with a scripted runner instead of real
//! ffmpeg/ffprobe binaries.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use crate::{Error, Result};

/// Exit information of a finished tool process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Whether the process exited successfully.
    pub success: bool,
}

impl ToolStatus {
    /// A successful exit with code 0.
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            success: true,
        }
    }

    /// A failed exit with the given code.
    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            success: false,
        }
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ToolStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing external tool invocations.
///
/// # Example
///
/// ```
/// use batchforge_av::ToolCommand;
///
/// let mut cmd = ToolCommand::new("ffprobe");
/// cmd.args(["-v", "error"]).arg("movie.mkv");
/// assert_eq!(cmd.to_string(), "ffprobe -v error movie.mkv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(s.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(iter.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// The arguments in order.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Short tool name used in error messages, e.g. `ffprobe`.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    fn to_process(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl std::fmt::Display for ToolCommand {
    /// Render as a shell-pasteable line, quoting tokens where needed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn shell_quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,?@%".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

/// Executes [`ToolCommand`]s.
///
/// Neither method treats a non-zero exit as an error: callers decide what a
/// failed status means. Only failing to start the process is an `Err`.
pub trait CommandRunner {
    /// Run to completion, capturing stdout and stderr.
    fn output(&self, command: &ToolCommand) -> Result<ToolOutput>;

    /// Run to completion with stdio inherited from this process.
    fn status(&self, command: &ToolCommand) -> Result<ToolStatus>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn output(&self, command: &ToolCommand) -> Result<ToolOutput> {
        (**self).output(command)
    }

    fn status(&self, command: &ToolCommand) -> Result<ToolStatus> {
        (**self).status(command)
    }
}

/// Runs commands as real child processes, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let output = command
            .to_process()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(command, e))?;

        Ok(ToolOutput {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn status(&self, command: &ToolCommand) -> Result<ToolStatus> {
        let status = command
            .to_process()
            .stdin(Stdio::null())
            .status()
            .map_err(|e| spawn_error(command, e))?;
        Ok(status.into())
    }
}

fn spawn_error(command: &ToolCommand, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::tool_not_found(command.tool_name())
    } else {
        Error::tool_failed(command.tool_name(), format!("failed to spawn: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_when_needed() {
        let mut cmd = ToolCommand::new("/usr/bin/ffmpeg");
        cmd.args(["-i", "/media/My Movie (2020).mkv", "-map", "0:s?"])
            .arg("it's.mp4");
        assert_eq!(
            cmd.to_string(),
            r"/usr/bin/ffmpeg -i '/media/My Movie (2020).mkv' -map 0:s? 'it'\''s.mp4'"
        );
    }

    #[test]
    fn tool_name_strips_directories() {
        assert_eq!(ToolCommand::new("/opt/ff/bin/ffprobe").tool_name(), "ffprobe");
        assert_eq!(ToolCommand::new("ffmpeg").tool_name(), "ffmpeg");
    }

    #[test]
    fn execute_nonexistent_tool() {
        let cmd = ToolCommand::new("nonexistent_tool_xyz_12345");
        let err = SystemRunner.output(&cmd).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn execute_echo() {
        let mut cmd = ToolCommand::new("echo");
        cmd.arg("hello");
        let output = SystemRunner.output(&cmd).unwrap();
        assert!(output.status.success);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_not_an_error() {
        let cmd = ToolCommand::new("false");
        let status = SystemRunner.status(&cmd).unwrap();
        assert!(!status.success);
        assert_eq!(status.code, Some(1));
    }
}
