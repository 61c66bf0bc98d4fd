//! Stream inventory probing.
//!
//! Only two questions are ever asked of a media file: how many streams of a
//! kind does it carry, and how many channels does a given audio stream have.
//! Both are answered by one ffprobe invocation each, read back as JSON. A failed invocation
//! degrades to zero streams / [`DEFAULT_CHANNELS`] instead of aborting.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::command::{CommandRunner, ToolCommand};

/// Channel count assumed when ffprobe cannot tell.
pub const DEFAULT_CHANNELS: u32 = 2;

/// Kind of elementary stream the selector and synthesizer deal with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Audio,
    Subtitle,
}

impl StreamKind {
    /// ffmpeg stream specifier letter (`a`, `s`).
    pub fn specifier(&self) -> &'static str {
        match self {
            StreamKind::Audio => "a",
            StreamKind::Subtitle => "s",
        }
    }

    /// Human-readable name used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Answers stream questions about a media file.
pub trait StreamProbe {
    /// Number of streams of `kind` in `file`; 0 if probing fails.
    fn count_streams(&self, file: &Path, kind: StreamKind) -> usize;

    /// Channel count of the 0-based audio stream `index`; [`DEFAULT_CHANNELS`]
    /// if probing fails or reports nothing usable.
    fn audio_channels(&self, file: &Path, index: usize) -> u32;
}

/// Stream counts of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamInventory {
    pub audio: usize,
    pub subtitles: usize,
}

impl StreamInventory {
    /// Count audio and subtitle streams of `file`.
    pub fn probe(probe: &dyn StreamProbe, file: &Path) -> Self {
        Self {
            audio: probe.count_streams(file, StreamKind::Audio),
            subtitles: probe.count_streams(file, StreamKind::Subtitle),
        }
    }

    /// Stream count for `kind`.
    pub fn count(&self, kind: StreamKind) -> usize {
        match kind {
            StreamKind::Audio => self.audio,
            StreamKind::Subtitle => self.subtitles,
        }
    }
}

/// [`StreamProbe`] backed by the ffprobe CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProbe<R> {
    ffprobe: PathBuf,
    runner: R,
}

impl<R: CommandRunner> FfprobeProbe<R> {
    pub fn new(ffprobe: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            runner,
        }
    }

    fn query(&self, file: &Path, selector: &str, entry: &str) -> Option<ProbeStreams> {
        let mut cmd = ToolCommand::new(&self.ffprobe);
        cmd.args(["-v", "error", "-select_streams", selector])
            .args(["-show_entries", entry, "-of", "json"])
            .arg(file);

        let out = match self.runner.output(&cmd) {
            Ok(out) if out.status.success => out,
            Ok(out) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "ffprobe {} on {:?} failed ({}): {}",
                    selector,
                    file,
                    out.status,
                    out.stderr.trim()
                );
                let _ = out;
                return None;
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("ffprobe {} on {:?} failed: {}", selector, file, e);
                let _ = e;
                return None;
            }
        };

        match serde_json::from_str::<ProbeStreams>(&out.stdout) {
            Ok(streams) => Some(streams),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Unreadable ffprobe output for {:?}: {}", file, e);
                let _ = e;
                None
            }
        }
    }
}

impl<R: CommandRunner> StreamProbe for FfprobeProbe<R> {
    fn count_streams(&self, file: &Path, kind: StreamKind) -> usize {
        self.query(file, kind.specifier(), "stream=index")
            .map(|probed| probed.streams.len())
            .unwrap_or(0)
    }

    fn audio_channels(&self, file: &Path, index: usize) -> u32 {
        let selector = format!("a:{index}");
        let channels = self
            .query(file, &selector, "stream=channels")
            .and_then(|probed| probed.streams.first().and_then(|s| s.channels))
            .filter(|&c| c > 0);

        match channels {
            Some(c) => c,
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "No channel count for audio stream {} of {:?}, assuming {}",
                    index,
                    file,
                    DEFAULT_CHANNELS
                );
                DEFAULT_CHANNELS
            }
        }
    }
}

/// `-of json` reply to a `-show_entries stream=...` query.
#[derive(Debug, Default, Deserialize)]
struct ProbeStreams {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[allow(dead_code)]
    index: Option<u32>,
    channels: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ToolOutput, ToolStatus};
    use crate::Result;
    use std::cell::RefCell;

    /// Replies with a fixed output and records every command it sees.
    struct Scripted {
        reply: Result<ToolOutput>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn stdout(status: ToolStatus, stdout: &str) -> Self {
            Self {
                reply: Ok(ToolOutput {
                    status,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                }),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for Scripted {
        fn output(&self, command: &ToolCommand) -> Result<ToolOutput> {
            self.seen.borrow_mut().push(command.to_string());
            match &self.reply {
                Ok(out) => Ok(out.clone()),
                Err(_) => Err(crate::Error::tool_not_found("ffprobe")),
            }
        }

        fn status(&self, _command: &ToolCommand) -> Result<ToolStatus> {
            unreachable!("probing never inherits stdio")
        }
    }

    const TWO_AUDIO: &str = r#"{
    "programs": [],
    "streams": [
        { "index": 1 },
        { "index": 2 }
    ]
}"#;

    #[test]
    fn counts_streams_in_json_output() {
        let runner = Scripted::stdout(ToolStatus::ok(), TWO_AUDIO);
        let probe = FfprobeProbe::new("ffprobe", &runner);
        assert_eq!(
            probe.count_streams(Path::new("movie.mkv"), StreamKind::Audio),
            2
        );
        assert_eq!(
            runner.seen.borrow()[0],
            "ffprobe -v error -select_streams a -show_entries stream=index -of json movie.mkv"
        );
    }

    #[test]
    fn empty_or_missing_stream_list_counts_zero() {
        for stdout in [r#"{"streams": []}"#, "{}", r#"{"programs": []}"#] {
            let runner = Scripted::stdout(ToolStatus::ok(), stdout);
            let probe = FfprobeProbe::new("ffprobe", &runner);
            assert_eq!(
                probe.count_streams(Path::new("movie.mkv"), StreamKind::Subtitle),
                0,
                "stdout {stdout:?}"
            );
        }
    }

    #[test]
    fn failed_count_degrades_to_zero() {
        let runner = Scripted::stdout(ToolStatus::failed(1), TWO_AUDIO);
        let probe = FfprobeProbe::new("ffprobe", &runner);
        assert_eq!(
            probe.count_streams(Path::new("movie.mkv"), StreamKind::Subtitle),
            0
        );
    }

    #[test]
    fn unparseable_output_degrades_to_zero() {
        let runner = Scripted::stdout(ToolStatus::ok(), "1\n2\n");
        let probe = FfprobeProbe::new("ffprobe", &runner);
        assert_eq!(
            probe.count_streams(Path::new("movie.mkv"), StreamKind::Audio),
            0
        );
    }

    #[test]
    fn spawn_failure_degrades_to_zero() {
        let runner = Scripted {
            reply: Err(crate::Error::tool_not_found("ffprobe")),
            seen: RefCell::new(Vec::new()),
        };
        let probe = FfprobeProbe::new("ffprobe", &runner);
        assert_eq!(
            probe.count_streams(Path::new("movie.mkv"), StreamKind::Audio),
            0
        );
        assert_eq!(probe.audio_channels(Path::new("movie.mkv"), 0), 2);
    }

    #[test]
    fn reads_channels_for_indexed_stream() {
        let runner = Scripted::stdout(
            ToolStatus::ok(),
            r#"{"programs": [], "streams": [{"channels": 6}]}"#,
        );
        let probe = FfprobeProbe::new("ffprobe", &runner);
        assert_eq!(probe.audio_channels(Path::new("movie.mkv"), 2), 6);
        assert!(runner.seen.borrow()[0].contains("-select_streams a:2"));
        assert!(runner.seen.borrow()[0].contains("stream=channels"));
        assert!(runner.seen.borrow()[0].contains("-of json"));
    }

    #[test]
    fn channels_default_on_missing_or_bad_data() {
        for stdout in [
            "",
            r#"{"streams": []}"#,
            r#"{"streams": [{}]}"#,
            r#"{"streams": [{"channels": 0}]}"#,
            "6\n",
        ] {
            let runner = Scripted::stdout(ToolStatus::ok(), stdout);
            let probe = FfprobeProbe::new("ffprobe", &runner);
            assert_eq!(
                probe.audio_channels(Path::new("movie.mkv"), 0),
                DEFAULT_CHANNELS,
                "stdout {stdout:?}"
            );
        }
    }

    #[test]
    fn inventory_probes_both_kinds() {
        let runner = Scripted::stdout(ToolStatus::ok(), TWO_AUDIO);
        let probe = FfprobeProbe::new("ffprobe", &runner);
        let inv = StreamInventory::probe(&probe, Path::new("movie.mkv"));
        assert_eq!(inv, StreamInventory { audio: 2, subtitles: 2 });
        assert_eq!(inv.count(StreamKind::Subtitle), 2);
        assert_eq!(runner.seen.borrow().len(), 2);
    }
}
