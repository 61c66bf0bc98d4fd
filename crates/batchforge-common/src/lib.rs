//! Batchforge-Common: shared utilities.
//!
//! - **Path Utilities**: detect video files by extension and derive the
//!   mirrored output path for an input file.
//!
//! # Examples
//!
//! ```
//! use batchforge_common::paths::{is_video_file, output_path_for};
//! use std::path::Path;
//!
//! assert!(is_video_file(Path::new("movie.mkv")));
//!
//! let out = output_path_for(
//!     Path::new("/in"),
//!     Path::new("/in/show/ep1.mkv"),
//!     Path::new("/out"),
//!     "mp4",
//! );
//! assert_eq!(out.as_deref(), Some(Path::new("/out/show/ep1.mp4")));
//! ```

pub mod paths;
