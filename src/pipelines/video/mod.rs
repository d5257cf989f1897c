// SPDX-License-Identifier: MPL-2.0

//! Video recording pipeline
//!
//! Frames are pushed from the capture loop into an `appsrc`, encoded with
//! the first available encoder for the requested codec tag and muxed into
//! an MP4 file.

pub mod encoder_selection;
pub mod muxer;
pub mod recorder;

pub use encoder_selection::{SelectedEncoder, select_encoder};
pub use recorder::{GstVideoSinkFactory, VideoRecorder};
