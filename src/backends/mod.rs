// SPDX-License-Identifier: MPL-2.0

//! External collaborators of the capture loop
//!
//! The loop only talks to three seams:
//!
//! ```text
//! ┌──────────────┐   frames   ┌──────────────┐   overlaid copy  ┌──────────────┐
//! │ CameraSource │ ─────────▶ │   Recorder   │ ───────────────▶ │ DisplaySink  │
//! └──────────────┘            └──────┬───────┘ ◀─── key events ─└──────────────┘
//!                                    │ processed frames
//!                                    ▼
//!                             ┌──────────────┐
//!                             │  VideoSink   │ (created by a VideoSinkFactory)
//!                             └──────────────┘
//! ```
//!
//! Production implementations are GStreamer based ([`camera::GstCamera`],
//! [`crate::pipelines::video::GstVideoSinkFactory`]) plus the terminal
//! display in [`crate::terminal`]. Tests substitute in-memory fakes.

pub mod camera;
pub mod display;
pub mod encoder;

pub use camera::CameraSource;
pub use display::{DisplaySink, Key};
pub use encoder::{VideoSink, VideoSinkFactory};
