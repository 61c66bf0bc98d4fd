//! # batchforge-av
//!
//! The ffmpeg-facing half of batchforge: everything needed to turn one media
//! file into one ffmpeg invocation.
//!
//! - [`probe`] counts audio/subtitle streams and reads audio channel counts
//!   through ffprobe
//! - [`selection`] resolves user track lists (`"3,1"`) against those counts
//! - [`args`] synthesizes the video, audio, subtitle and container blocks
//! - [`encode`] runs ffmpeg into a partial file and finalizes the output
//!
//! External processes are started through [`CommandRunner`], which tests
//! replace with scripted fakes.
//!
//! ## Features
//!
//! - `tracing` - Emit log events for fallbacks and rejected input
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use batchforge_av::args::{synthesize, EncodeSettings};
//! use batchforge_av::probe::FfprobeProbe;
//! use batchforge_av::{SystemRunner, ToolPaths};
//!
//! let tools = ToolPaths::resolve(None, None)?;
//! let probe = FfprobeProbe::new(&tools.ffprobe, SystemRunner);
//! let settings = EncodeSettings {
//!     audio_tracks: Some("2,1".into()),
//!     ..Default::default()
//! };
//! let synthesis = synthesize(&settings, &probe, Path::new("/media/movie.mkv"));
//! println!("{:?}", synthesis.args);
//! # Ok::<(), batchforge_av::Error>(())
//! ```

mod error;
pub mod args;
pub mod command;
pub mod encode;
pub mod probe;
pub mod selection;
pub mod tools;

// Re-exports
pub use command::{CommandRunner, SystemRunner, ToolCommand, ToolOutput, ToolStatus};
pub use encode::{run_encode, EncodeRequest, EncodeResult};
pub use error::{Error, Result};
pub use tools::{detect_version, require_tool, ToolPaths};
