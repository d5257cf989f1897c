// SPDX-License-Identifier: GPL-3.0-only

//! Video encoding sink abstraction

use crate::errors::RecordingError;
use crate::media::{Frame, FrameSize};
use std::path::Path;

/// An open, append-only video file
///
/// Frames are written in submission order. Dropping a sink without calling
/// [`VideoSink::finish`] must still release the underlying file.
pub trait VideoSink {
    /// Size every appended frame must have
    fn frame_size(&self) -> FrameSize;

    /// Append one frame
    fn append(&mut self, frame: &Frame) -> Result<(), RecordingError>;

    /// Flush and close the file
    fn finish(&mut self) -> Result<(), RecordingError>;
}

/// Opens [`VideoSink`]s
pub trait VideoSinkFactory {
    type Sink: VideoSink;

    /// Open `path` for writing with the given four character code, frame
    /// rate and frame size
    fn create(
        &self,
        path: &Path,
        codec_tag: &str,
        framerate: u32,
        size: FrameSize,
    ) -> Result<Self::Sink, RecordingError>;
}
