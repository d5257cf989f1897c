// SPDX-License-Identifier: MPL-2.0

//! Video recording pipeline fed from the capture loop
//!
//! ```text
//! appsrc (BGR) ! videoconvert ! <encoder> ! [parser] ! mp4mux ! filesink
//! ```
//!
//! Buffers are stamped at `n / framerate`, so the file plays back at the
//! configured rate regardless of how fast the camera delivered frames.

use super::encoder_selection::select_encoder;
use super::muxer::{create_filesink, create_muxer, link_to_file};
use crate::backends::encoder::{VideoSink, VideoSinkFactory};
use crate::constants::{BitratePreset, pipeline, timing};
use crate::errors::RecordingError;
use crate::media::frame::CHANNELS;
use crate::media::{Frame, FrameSize};
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app::AppSrc;
use gstreamer_video::{VideoFormat, VideoInfo};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// How long to watch the bus for immediate errors after starting
const START_ERROR_CHECK_MS: u64 = 100;

/// Opens [`VideoRecorder`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct GstVideoSinkFactory {
    pub bitrate: BitratePreset,
}

impl VideoSinkFactory for GstVideoSinkFactory {
    type Sink = VideoRecorder;

    fn create(
        &self,
        path: &Path,
        codec_tag: &str,
        framerate: u32,
        size: FrameSize,
    ) -> Result<VideoRecorder, RecordingError> {
        VideoRecorder::new(path, codec_tag, framerate, size, self.bitrate)
    }
}

/// One open recording
#[derive(Debug)]
pub struct VideoRecorder {
    pipeline: gst::Pipeline,
    appsrc: AppSrc,
    info: VideoInfo,
    file_path: PathBuf,
    size: FrameSize,
    frame_duration: gst::ClockTime,
    frames_written: u64,
    finished: bool,
}

impl VideoRecorder {
    /// Build and start the pipeline writing to `path`
    pub fn new(
        path: &Path,
        codec_tag: &str,
        framerate: u32,
        size: FrameSize,
        bitrate: BitratePreset,
    ) -> Result<Self, RecordingError> {
        info!(
            path = %path.display(),
            codec = codec_tag,
            framerate,
            size = %size,
            "Creating video recorder"
        );

        if framerate == 0 {
            return Err(RecordingError::SinkCreation("framerate must be positive".into()));
        }

        gst::init()
            .map_err(|e| RecordingError::SinkCreation(format!("GStreamer init failed: {}", e)))?;

        let info = VideoInfo::builder(VideoFormat::Bgr, size.width, size.height)
            .fps(gst::Fraction::new(framerate as i32, 1))
            .build()
            .map_err(|e| RecordingError::SinkCreation(format!("Invalid video info: {}", e)))?;
        let caps = info
            .to_caps()
            .map_err(|e| RecordingError::SinkCreation(format!("Invalid caps: {}", e)))?;

        let appsrc = gst::ElementFactory::make("appsrc")
            .name("recording_src")
            .build()
            .map_err(|e| RecordingError::SinkCreation(format!("Failed to create appsrc: {}", e)))?
            .downcast::<AppSrc>()
            .map_err(|_| RecordingError::SinkCreation("Failed to downcast to AppSrc".into()))?;
        appsrc.set_caps(Some(&caps));
        appsrc.set_format(gst::Format::Time);
        // Block instead of dropping when the encoder falls behind so frame
        // order and count are preserved
        appsrc.set_block(true);

        let videoconvert = gst::ElementFactory::make("videoconvert")
            .name("recording_convert")
            .build()
            .map_err(|e| {
                RecordingError::SinkCreation(format!("Failed to create videoconvert: {}", e))
            })?;

        let selected = select_encoder(codec_tag, size.width, bitrate)?;
        let muxer = create_muxer(pipeline::MUXER)?;
        let filesink = create_filesink(path)?;

        let pipeline = gst::Pipeline::new();
        let mut chain: Vec<&gst::Element> =
            vec![appsrc.upcast_ref(), &videoconvert, &selected.encoder];
        if let Some(parser) = &selected.parser {
            chain.push(parser);
        }

        pipeline
            .add_many(chain.iter().copied().chain([&muxer, &filesink]))
            .map_err(|e| RecordingError::SinkCreation(format!("Failed to add elements: {}", e)))?;
        gst::Element::link_many(chain.iter().copied()).map_err(|e| {
            RecordingError::SinkCreation(format!("Failed to link video chain: {}", e))
        })?;

        let tail = selected.parser.as_ref().unwrap_or(&selected.encoder);
        link_to_file(tail, &muxer, &filesink)?;

        let mut recorder = Self {
            pipeline,
            appsrc,
            info,
            file_path: path.to_path_buf(),
            size,
            frame_duration: gst::ClockTime::from_nseconds(1_000_000_000 / framerate as u64),
            frames_written: 0,
            finished: false,
        };
        if let Err(e) = recorder.start() {
            recorder.abort();
            return Err(e);
        }

        info!(encoder = selected.name, "Video recorder started");
        Ok(recorder)
    }

    /// Tear down a pipeline that failed to start and remove its output
    ///
    /// Skips EOS; an errored pipeline never drains.
    fn abort(&mut self) {
        self.finished = true;
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            error!(?e, "Failed to set recording pipeline to Null");
        }
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => debug!(path = %self.file_path.display(), "Removed partial recording"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.file_path.display(),
                %e,
                "Failed to remove partial recording"
            ),
        }
    }

    fn start(&self) -> Result<(), RecordingError> {
        self.pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| RecordingError::SinkCreation(format!("Failed to start pipeline: {}", e)))?;

        // Check for immediate errors
        let bus = self
            .pipeline
            .bus()
            .ok_or_else(|| RecordingError::SinkCreation("No bus available".into()))?;
        if let Some(msg) = bus.timed_pop_filtered(
            gst::ClockTime::from_mseconds(START_ERROR_CHECK_MS),
            &[gst::MessageType::Error],
        ) && let gst::MessageView::Error(err) = msg.view()
        {
            error!(
                error = %err.error(),
                debug = ?err.debug(),
                source = ?err.src().map(|s| s.name()),
                "GStreamer error during start"
            );
            return Err(RecordingError::SinkCreation(err.error().to_string()));
        }

        Ok(())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn push(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        let stride = self.info.stride()[0] as usize;
        let offset = self.info.offset()[0];
        let row_len = frame.width() as usize * CHANNELS;

        let mut buffer = gst::Buffer::with_size(self.info.size())
            .map_err(|e| RecordingError::Write(format!("Failed to create buffer: {}", e)))?;
        {
            let buffer_ref = buffer.get_mut().ok_or_else(|| {
                RecordingError::Write("Failed to get mutable buffer reference".into())
            })?;
            buffer_ref.set_pts(self.frame_duration * self.frames_written);
            buffer_ref.set_duration(self.frame_duration);

            let mut map = buffer_ref
                .map_writable()
                .map_err(|e| RecordingError::Write(format!("Failed to map buffer: {}", e)))?;
            let dst = map.as_mut_slice();
            for y in 0..frame.height() {
                let start = offset + y as usize * stride;
                dst[start..start + row_len].copy_from_slice(frame.row(y));
            }
        }

        self.appsrc
            .push_buffer(buffer)
            .map_err(|e| RecordingError::Write(format!("Failed to push frame: {:?}", e)))?;
        Ok(())
    }
}

impl VideoSink for VideoRecorder {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn append(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        if self.finished {
            return Err(RecordingError::Write("recording already finished".into()));
        }
        if frame.size() != self.size {
            return Err(RecordingError::FrameSizeMismatch {
                expected: (self.size.width, self.size.height),
                actual: (frame.width(), frame.height()),
            });
        }

        self.push(frame)?;
        self.frames_written += 1;
        if self.frames_written % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(frames = self.frames_written, "Recording frames written");
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordingError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        info!("Stopping video recording");

        // EOS lets the muxer write its index before the pipeline is torn down
        let mut result = Ok(());
        if let Err(e) = self.appsrc.end_of_stream() {
            warn!(?e, "Failed to send EOS to recording pipeline");
        } else if let Some(bus) = self.pipeline.bus() {
            let msg = bus.timed_pop_filtered(
                gst::ClockTime::from_seconds(timing::ENCODER_EOS_TIMEOUT_SECS),
                &[gst::MessageType::Eos, gst::MessageType::Error],
            );
            match msg.as_ref().map(|m| m.view()) {
                Some(gst::MessageView::Eos(_)) => debug!("Recording pipeline drained"),
                Some(gst::MessageView::Error(err)) => {
                    error!(error = %err.error(), "GStreamer error while finalizing");
                    result = Err(RecordingError::Finalize(err.error().to_string()));
                }
                _ => warn!("Timed out waiting for recording pipeline to drain"),
            }
        }

        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            error!(?e, "Failed to set recording pipeline to Null");
        }

        info!(
            path = %self.file_path.display(),
            frames = self.frames_written,
            "Recording saved"
        );
        result
    }
}

impl Drop for VideoRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!(%e, "Recording finalized with errors on drop");
        }
    }
}
