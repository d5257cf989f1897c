// SPDX-License-Identifier: MPL-2.0

//! Container muxing and file output

use crate::errors::RecordingError;
use gstreamer as gst;
use gstreamer::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Create the muxer element, configured for seekable file output
pub fn create_muxer(muxer_name: &str) -> Result<gst::Element, RecordingError> {
    let muxer = gst::ElementFactory::make(muxer_name)
        .name("recording_mux")
        .build()
        .map_err(|e| {
            RecordingError::SinkCreation(format!("Failed to create {}: {}", muxer_name, e))
        })?;

    // Non-streamable output gets duration and indexes written on EOS
    if muxer.has_property("streamable") {
        muxer.set_property("streamable", false);
        debug!(muxer = %muxer_name, "Configured muxer with streamable=false");
    }

    Ok(muxer)
}

/// Create a filesink writing to `path`
pub fn create_filesink(path: &Path) -> Result<gst::Element, RecordingError> {
    info!(path = %path.display(), "Creating filesink");

    gst::ElementFactory::make("filesink")
        .name("recording_file")
        .property("location", path.to_string_lossy().to_string())
        .build()
        .map_err(|e| RecordingError::SinkCreation(format!("Failed to create filesink: {}", e)))
}

/// Link the tail of the video chain (encoder or parser) through the muxer
/// into the filesink
pub fn link_to_file(
    video_tail: &gst::Element,
    muxer: &gst::Element,
    filesink: &gst::Element,
) -> Result<(), RecordingError> {
    video_tail
        .link(muxer)
        .map_err(|_| RecordingError::SinkCreation("Failed to link video to muxer".into()))?;
    muxer
        .link(filesink)
        .map_err(|_| RecordingError::SinkCreation("Failed to link muxer to filesink".into()))?;

    debug!("Muxer linked to filesink");
    Ok(())
}
