use batchforge::config::Overrides;
use batchforge_av::args::{AudioMode, Container, EncoderProfile};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "batchforge")]
#[command(author, version, about = "Batch video transcoding with ffmpeg")]
pub struct Cli {
    /// Directory to scan recursively for video files
    pub input_dir: PathBuf,

    /// Encoder profile: x265, x264, av1 or nvenc
    #[arg(short, long, value_name = "PROFILE")]
    pub encoder: Option<EncoderProfile>,

    /// Output directory (default: <INPUT_DIR>_encoded next to the input)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Audio tracks to keep, comma-separated and 1-based (default: 1)
    #[arg(short, long, value_name = "LIST")]
    pub audio: Option<String>,

    /// Audio handling: copy or transcode
    #[arg(short = 'm', long, value_name = "MODE")]
    pub audio_mode: Option<AudioMode>,

    /// Subtitle tracks to keep, comma-separated and 1-based (default: all)
    #[arg(short, long, value_name = "LIST")]
    pub subs: Option<String>,

    /// Tune for film grain retention (x265 only)
    #[arg(short, long)]
    pub grain: bool,

    /// Output container: mp4, mkv or mov
    #[arg(short, long, value_name = "FORMAT")]
    pub container: Option<Container>,

    /// Path to config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the ffmpeg commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first file that fails to encode
    #[arg(long)]
    pub fail_fast: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags that take precedence over the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            encoder: self.encoder,
            output_dir: self.output.clone(),
            audio_tracks: self.audio.clone(),
            audio_mode: self.audio_mode,
            subtitle_tracks: self.subs.clone(),
            grain: self.grain,
            container: self.container,
            dry_run: self.dry_run,
            fail_fast: self.fail_fast,
        }
    }
}
