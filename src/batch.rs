//! The batch driver: discover, skip, synthesize and encode, one file at a
//! time.

use crate::config::RunConfig;
use crate::discovery::{discover, MediaFile};
use anyhow::Result;
use batchforge_av::args::synthesize;
use batchforge_av::probe::StreamProbe;
use batchforge_av::{run_encode, CommandRunner, EncodeRequest};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// What to do after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next file.
    #[default]
    Continue,
    /// Stop the batch at the first failure.
    FailFast,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// ffmpeg succeeded and the output is in place.
    Encoded,
    /// The output already existed.
    Skipped,
    /// The encode did not produce an output.
    Failed { reason: String },
    /// Dry run: the command was printed, nothing ran.
    Planned,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of a batch, in processing order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
    /// Files discovered, including any not reached after a fail-fast stop.
    pub discovered: usize,
    /// Set when [`FailurePolicy::FailFast`] ended the batch early.
    pub stopped_early: bool,
}

impl BatchReport {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn encoded(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Encoded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Planned))
    }

    /// Reports of failed files only.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }
}

/// Runs a batch strictly sequentially: one ffmpeg process at a time.
pub struct BatchDriver<'a, R, P> {
    config: &'a RunConfig,
    ffmpeg: PathBuf,
    runner: R,
    probe: P,
}

impl<'a, R: CommandRunner, P: StreamProbe> BatchDriver<'a, R, P> {
    pub fn new(config: &'a RunConfig, ffmpeg: impl Into<PathBuf>, runner: R, probe: P) -> Self {
        Self {
            config,
            ffmpeg: ffmpeg.into(),
            runner,
            probe,
        }
    }

    /// Process every discovered file and summarize.
    ///
    /// Only setup problems (an unreadable input root) are errors; per-file
    /// failures are recorded in the report.
    pub fn run(&self) -> Result<BatchReport> {
        let config = self.config;
        let files = discover(
            &config.input_dir,
            &config.output_dir,
            config.settings.container.extension(),
        )?;

        info!(
            "Found {} video file(s) in {:?}",
            files.len(),
            config.input_dir
        );
        info!(
            "Encoder: {}, audio: {}, container: {}",
            config.settings.profile, config.settings.audio_mode, config.settings.container
        );

        let mut report = BatchReport {
            output_dir: config.output_dir.clone(),
            discovered: files.len(),
            ..Default::default()
        };

        let total = files.len();
        for (i, file) in files.iter().enumerate() {
            let outcome = self.process(i + 1, total, file);
            let failed = matches!(outcome, FileOutcome::Failed { .. });

            report.files.push(FileReport {
                input: file.path.clone(),
                output: file.output.clone(),
                outcome,
            });

            if failed && config.failure_policy == FailurePolicy::FailFast {
                warn!(
                    "Stopping after failure, {} file(s) not processed",
                    total - (i + 1)
                );
                report.stopped_early = true;
                break;
            }
        }

        log_summary(&report, config.dry_run);
        Ok(report)
    }

    /// Skip, plan or encode a single file.
    pub fn process(&self, position: usize, total: usize, file: &MediaFile) -> FileOutcome {
        if file.output.exists() {
            info!(
                "[{}/{}] SKIP (already encoded): {:?}",
                position, total, file.output
            );
            return FileOutcome::Skipped;
        }

        let synthesis = synthesize(&self.config.settings, &self.probe, &file.path);
        let request = EncodeRequest::new(&file.path, &file.output, synthesis.args);

        if self.config.dry_run {
            info!(
                "[{}/{}] Would encode: {:?} -> {:?}",
                position, total, file.path, file.output
            );
            println!("{}", request.command(&self.ffmpeg));
            return FileOutcome::Planned;
        }

        info!(
            "[{}/{}] Encoding: {:?} -> {:?}",
            position, total, file.path, file.output
        );
        debug!("Command: {}", request.command(&self.ffmpeg));

        match run_encode(&self.runner, &self.ffmpeg, &request) {
            Ok(result) if result.success() => {
                info!("[{}/{}] DONE: {:?}", position, total, file.output);
                FileOutcome::Encoded
            }
            Ok(result) => {
                let reason = if result.status.success {
                    "ffmpeg exited successfully but wrote no output".to_string()
                } else {
                    format!("ffmpeg failed with {}", result.status)
                };
                error!("[{}/{}] Failed: {:?} ({})", position, total, file.path, reason);
                FileOutcome::Failed { reason }
            }
            Err(e) => {
                error!("[{}/{}] Failed: {:?} ({})", position, total, file.path, e);
                FileOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn log_summary(report: &BatchReport, dry_run: bool) {
    if dry_run {
        info!(
            "Dry run complete: {} planned, {} skipped. Output directory: {}",
            report.planned(),
            report.skipped(),
            report.output_dir.display()
        );
        return;
    }

    info!(
        "Finished: {} encoded, {} skipped, {} failed. Output directory: {}",
        report.encoded(),
        report.skipped(),
        report.failed(),
        report.output_dir.display()
    );
    for failure in report.failures() {
        if let FileOutcome::Failed { reason } = &failure.outcome {
            warn!("  {:?}: {}", failure.input, reason);
        }
    }
}
