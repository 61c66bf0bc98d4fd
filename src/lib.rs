//! Batchforge - batch video transcoding driver
//!
//! This library crate exposes the driver pieces for integration testing.

pub mod batch;
pub mod config;
pub mod discovery;
