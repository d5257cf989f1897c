// SPDX-License-Identifier: MPL-2.0

//! Encoder selection for the recording pipeline
//!
//! Each codec tag maps to an ordered list of GStreamer encoders; the first
//! one installed on the system wins. `mp4v` prefers the libav MPEG-4 Part 2
//! encoder and falls back to H.264 so recording still works on systems
//! without gst-libav.

use crate::constants::{BitratePreset, pipeline};
use crate::errors::RecordingError;
use gstreamer as gst;
use gstreamer::prelude::*;
use tracing::{debug, info};

/// Encoder (plus optional parser) ready to be added to the pipeline
pub struct SelectedEncoder {
    /// Factory name of the encoder, for logging
    pub name: &'static str,
    pub encoder: gst::Element,
    pub parser: Option<gst::Element>,
}

/// Encoder factory names paired with the parser that follows them
pub type EncoderCandidates = &'static [(&'static str, Option<&'static str>)];

/// Candidate encoders for a four character code
pub fn candidates_for(codec_tag: &str) -> Result<EncoderCandidates, RecordingError> {
    match codec_tag.to_ascii_lowercase().as_str() {
        "mp4v" | "fmp4" | "xvid" => Ok(pipeline::MPEG4_ENCODERS),
        "avc1" | "h264" | "x264" => Ok(pipeline::H264_ENCODERS),
        other => Err(RecordingError::EncoderNotAvailable(format!(
            "unsupported codec tag '{}'",
            other
        ))),
    }
}

/// Pick and configure the first installed encoder for `codec_tag`
pub fn select_encoder(
    codec_tag: &str,
    width: u32,
    preset: BitratePreset,
) -> Result<SelectedEncoder, RecordingError> {
    let candidates = candidates_for(codec_tag)?;

    for &(name, parser_name) in candidates {
        if gst::ElementFactory::find(name).is_none() {
            debug!(encoder = name, "Encoder not installed");
            continue;
        }

        let encoder = gst::ElementFactory::make(name)
            .name("recording_encoder")
            .build()
            .map_err(|e| {
                RecordingError::SinkCreation(format!("Failed to create {}: {}", name, e))
            })?;
        configure_encoder(&encoder, name, preset.bitrate_kbps(width));

        let parser = match parser_name {
            Some(parser_name) if gst::ElementFactory::find(parser_name).is_some() => Some(
                gst::ElementFactory::make(parser_name)
                    .name("recording_parser")
                    .build()
                    .map_err(|e| {
                        RecordingError::SinkCreation(format!(
                            "Failed to create {}: {}",
                            parser_name, e
                        ))
                    })?,
            ),
            _ => None,
        };

        info!(
            encoder = name,
            parser = ?parser_name,
            preset = preset.display_name(),
            "Selected video encoder"
        );
        return Ok(SelectedEncoder {
            name,
            encoder,
            parser,
        });
    }

    let names: Vec<&str> = candidates.iter().map(|(name, _)| *name).collect();
    Err(RecordingError::EncoderNotAvailable(format!(
        "none of [{}] installed; install gst-libav or gstreamer1-plugins-ugly",
        names.join(", ")
    )))
}

/// Apply the bitrate, in the unit each encoder expects
fn configure_encoder(encoder: &gst::Element, name: &str, kbps: u32) {
    if !encoder.has_property("bitrate") {
        return;
    }
    let value = match name {
        // x264enc takes kbit/s
        "x264enc" => kbps.to_string(),
        // avenc_mpeg4 and openh264enc take bit/s
        _ => (kbps as u64 * 1000).to_string(),
    };
    encoder.set_property_from_str("bitrate", &value);

    if name == "x264enc" {
        encoder.set_property_from_str("speed-preset", "veryfast");
        encoder.set_property_from_str("tune", "zerolatency");
    }
    debug!(encoder = name, bitrate = %value, "Configured encoder bitrate");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp4v_prefers_mpeg4() {
        let candidates = candidates_for("mp4v").unwrap();
        assert_eq!(candidates[0].0, "avenc_mpeg4");
    }

    #[test]
    fn test_codec_tag_case_insensitive() {
        assert!(candidates_for("MP4V").is_ok());
        assert!(candidates_for("H264").is_ok());
    }

    #[test]
    fn test_unknown_codec_tag_rejected() {
        assert!(matches!(
            candidates_for("zzzz"),
            Err(RecordingError::EncoderNotAvailable(_))
        ));
    }
}
