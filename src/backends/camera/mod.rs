// SPDX-License-Identifier: MPL-2.0

//! Camera source abstraction
//!
//! A [`CameraSource`] hands out frames in capture order at a fixed size.
//! [`GstCamera`] is the V4L2/GStreamer implementation used by the binary.

pub mod pipeline;

pub use pipeline::GstCamera;

use crate::errors::CameraError;
use crate::media::{Frame, FrameSize};

/// Result type for camera operations
pub type CameraResult<T> = Result<T, CameraError>;

/// Live frame producer
pub trait CameraSource {
    /// Resolution reported by the device, fixed for the source's lifetime
    fn size(&self) -> FrameSize;

    /// Next frame, blocking for at most the source's read timeout
    ///
    /// Returns [`CameraError::EndOfStream`] once the source is exhausted or
    /// released, and [`CameraError::ReadFailed`] if a frame could not be
    /// grabbed.
    fn read_frame(&mut self) -> CameraResult<Frame>;

    /// Stop capture and release the device; idempotent
    fn release(&mut self);
}
