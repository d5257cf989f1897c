// SPDX-License-Identifier: MPL-2.0

//! Encoding pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────────┐     ┌──────────────┐
//! │ BGR Frames   │ ──▶ │  Video Pipeline       │ ──▶ │   MP4 File   │
//! │ (flip+filter)│     │  - appsrc             │     │              │
//! │              │     │  - encoder + parser   │     │              │
//! │              │     │  - mp4mux + filesink  │     │              │
//! └──────────────┘     └───────────────────────┘     └──────────────┘
//! ```
//!
//! - [`video`]: Video recording with GStreamer

pub mod video;
