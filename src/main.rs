mod cli;

use anyhow::{Context, Result};
use batchforge::batch::BatchDriver;
use batchforge::config::{self, RunConfig};
use batchforge_av::probe::FfprobeProbe;
use batchforge_av::{detect_version, SystemRunner, ToolPaths};
use clap::Parser;
use cli::Cli;
use std::io::IsTerminal;

fn main() -> Result<()> {
    // Usage errors exit with 1, help and version with 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "batchforge=debug,batchforge_av=debug".to_string()
        } else {
            "batchforge=info,batchforge_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let config = config::load_config_or_default(cli.config.as_deref())?;
    let run = RunConfig::resolve(&config, &cli.input_dir, cli.overrides())?;

    let tools = ToolPaths::resolve(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
    .context("ffmpeg and ffprobe must be installed or configured under [tools]")?;

    if let Some(version) = detect_version(&tools.ffmpeg) {
        tracing::debug!("Using {:?}: {}", tools.ffmpeg, version);
    }

    tracing::info!("Input directory: {}", run.input_dir.display());
    tracing::info!("Output directory: {}", run.output_dir.display());

    let probe = FfprobeProbe::new(&tools.ffprobe, SystemRunner);
    let driver = BatchDriver::new(&run, &tools.ffmpeg, SystemRunner, probe);
    let report = driver.run()?;

    if report.stopped_early {
        anyhow::bail!(
            "Stopped after a failed encode ({} of {} file(s) processed)",
            report.files.len(),
            report.discovered
        );
    }

    Ok(())
}
