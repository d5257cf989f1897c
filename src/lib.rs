// SPDX-License-Identifier: MPL-2.0

//! Simple Video Recorder - live camera preview with filters and recording
//!
//! Frames are captured from a V4L2 camera, flipped and filtered, optionally
//! written to an MP4 file, and shown in the terminal with a status overlay.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Capture loop and recording session state machines
//! - [`backends`]: Camera, display and video sink abstractions
//! - [`media`]: Frame buffer, filters, edge detection and overlay drawing
//! - [`pipelines`]: GStreamer recording pipeline
//! - [`terminal`]: Terminal display sink
//! - [`config`]: Runtime settings
//! - [`storage`]: Output directory and file naming
//!
//! # Example
//!
//! ```ignore
//! // Keys: Space toggles recording, F cycles filters, R cycles flips,
//! // Esc exits.
//! video_recorder::app::run(video_recorder::Config::default())?;
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod media;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{FilterMode, FlipMode, LoopState, Recorder, RecordingSession};
pub use config::Config;
pub use constants::BitratePreset;
pub use errors::{AppError, AppResult};
pub use media::{Frame, FrameSize};
