// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer capture pipeline delivering packed BGR frames
//!
//! ```text
//! v4l2src device=/dev/videoN ! videoconvert ! video/x-raw,format=BGR ! appsink
//! ```
//!
//! The first frame is pulled while opening so the negotiated resolution is
//! known up front; it is handed out by the first [`CameraSource::read_frame`].

use super::{CameraResult, CameraSource};
use crate::constants::{pipeline, timing};
use crate::errors::CameraError;
use crate::media::frame::CHANNELS;
use crate::media::{Frame, FrameSize};
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Camera opened through a GStreamer appsink
pub struct GstCamera {
    pipeline: gst::Pipeline,
    appsink: AppSink,
    size: FrameSize,
    read_timeout: Duration,
    /// Frame pulled during open, returned by the first read
    pending: Option<Frame>,
    frames_read: u64,
    released: bool,
}

impl GstCamera {
    /// Open `/dev/video<device_index>`
    pub fn open(device_index: u32, read_timeout: Duration) -> CameraResult<Self> {
        let description = format!(
            "v4l2src device=/dev/video{} ! videoconvert ! video/x-raw,format={} ! \
             appsink name=sink max-buffers={} drop=true sync=false",
            device_index,
            pipeline::RAW_FORMAT,
            pipeline::MAX_BUFFERS
        );
        Self::from_description(&description, read_timeout)
    }

    /// Open an arbitrary pipeline description ending in `appsink name=sink`
    /// that produces BGR buffers
    pub fn from_description(description: &str, read_timeout: Duration) -> CameraResult<Self> {
        gst::init()
            .map_err(|e| CameraError::Unavailable(format!("GStreamer init failed: {}", e)))?;

        info!(pipeline = %description, "Opening camera");

        let pipeline = gst::parse::launch(description)
            .map_err(|e| CameraError::Unavailable(format!("Failed to create pipeline: {}", e)))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| CameraError::Unavailable("Failed to downcast to Pipeline".into()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::Unavailable("Failed to find appsink".into()))?
            .downcast::<AppSink>()
            .map_err(|_| CameraError::Unavailable("Failed to downcast to AppSink".into()))?;

        if let Err(e) = pipeline.set_state(gst::State::Playing) {
            let reason = bus_error(&pipeline).unwrap_or_else(|| e.to_string());
            let _ = pipeline.set_state(gst::State::Null);
            return Err(CameraError::Unavailable(reason));
        }

        let first = appsink
            .try_pull_sample(clock_time(timing::CAMERA_START_TIMEOUT))
            .ok_or_else(|| {
                bus_error(&pipeline).unwrap_or_else(|| "no frame from camera".to_string())
            })
            .and_then(|sample| sample_to_frame(&sample));

        let first = match first {
            Ok(frame) => frame,
            Err(reason) => {
                let _ = pipeline.set_state(gst::State::Null);
                return Err(CameraError::Unavailable(reason));
            }
        };

        let size = first.size();
        info!(size = %size, "Camera opened");

        Ok(Self {
            pipeline,
            appsink,
            size,
            read_timeout,
            pending: Some(first),
            frames_read: 0,
            released: false,
        })
    }
}

impl CameraSource for GstCamera {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn read_frame(&mut self) -> CameraResult<Frame> {
        if self.released {
            return Err(CameraError::EndOfStream);
        }

        let frame = match self.pending.take() {
            Some(frame) => frame,
            None => match self.appsink.try_pull_sample(clock_time(self.read_timeout)) {
                Some(sample) => sample_to_frame(&sample).map_err(CameraError::ReadFailed)?,
                None if self.appsink.is_eos() => return Err(CameraError::EndOfStream),
                None => {
                    let reason = bus_error(&self.pipeline)
                        .unwrap_or_else(|| "timed out waiting for frame".to_string());
                    return Err(CameraError::ReadFailed(reason));
                }
            },
        };

        if frame.size() != self.size {
            return Err(CameraError::ReadFailed(format!(
                "camera renegotiated from {} to {}",
                self.size,
                frame.size()
            )));
        }

        self.frames_read += 1;
        if self.frames_read % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(frames = self.frames_read, "Camera frames read");
        }
        Ok(frame)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.pending = None;
        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            error!(?e, "Failed to set camera pipeline to Null");
        }
        info!(frames = self.frames_read, "Camera released");
    }
}

impl Drop for GstCamera {
    fn drop(&mut self) {
        self.release();
    }
}

fn clock_time(duration: Duration) -> gst::ClockTime {
    gst::ClockTime::from_mseconds(duration.as_millis() as u64)
}

/// First error message waiting on the pipeline bus, if any
fn bus_error(pipeline: &gst::Pipeline) -> Option<String> {
    let bus = pipeline.bus()?;
    while let Some(msg) = bus.pop_filtered(&[gst::MessageType::Error, gst::MessageType::Warning]) {
        match msg.view() {
            gst::MessageView::Error(err) => {
                error!(
                    error = %err.error(),
                    debug = ?err.debug(),
                    source = ?err.src().map(|s| s.name()),
                    "GStreamer camera error"
                );
                return Some(err.error().to_string());
            }
            gst::MessageView::Warning(w) => {
                warn!(warning = %w.error(), "GStreamer camera warning");
            }
            _ => {}
        }
    }
    None
}

/// Copy a BGR sample into a tightly packed [`Frame`], dropping row padding
fn sample_to_frame(sample: &gst::Sample) -> Result<Frame, String> {
    let caps = sample.caps().ok_or("No caps on sample")?;
    let info = gstreamer_video::VideoInfo::from_caps(caps)
        .map_err(|e| format!("Invalid caps on sample: {}", e))?;
    if info.format() != gstreamer_video::VideoFormat::Bgr {
        return Err(format!("Unexpected pixel format {:?}", info.format()));
    }

    let buffer = sample.buffer().ok_or("No buffer in sample")?;
    let map = buffer
        .map_readable()
        .map_err(|_| "Failed to map buffer".to_string())?;
    let src = map.as_slice();

    let width = info.width();
    let height = info.height();
    let stride = info.stride()[0] as usize;
    let offset = info.offset()[0];
    let row_len = width as usize * CHANNELS;

    let mut data = Vec::with_capacity(row_len * height as usize);
    for y in 0..height as usize {
        let start = offset + y * stride;
        let row = src
            .get(start..start + row_len)
            .ok_or("Buffer shorter than its caps")?;
        data.extend_from_slice(row);
    }

    Frame::from_bgr(width, height, data).ok_or_else(|| "Frame size mismatch".to_string())
}
