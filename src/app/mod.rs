// SPDX-License-Identifier: MPL-2.0

//! Capture loop for the video recorder
//!
//! Each iteration of [`Recorder::step`]:
//!
//! ```text
//! read frame ─► flip ─► filter ─┬─► recording session (no overlay)
//!                               └─► overlay ─► display ─► poll key ─► dispatch
//! ```
//!
//! # Main Types
//!
//! - `Recorder`: owns the camera, display and recording session
//! - `RecordingSession`: Idle/Recording state machine around the video sink
//! - `FilterMode` / `FlipMode`: cyclic frame transforms selected by key

mod session;
mod state;

pub use session::{RecordingSession, RecordingSummary};
pub use state::{FilterMode, FlipMode, LoopState};

use crate::backends::camera::{CameraSource, GstCamera};
use crate::backends::display::{DisplaySink, Key};
use crate::backends::encoder::VideoSinkFactory;
use crate::config::Config;
use crate::constants::timing;
use crate::errors::{AppResult, CameraError};
use crate::media::{OverlayStatus, apply_filter, apply_flip, overlay};
use crate::pipelines::video::GstVideoSinkFactory;
use crate::storage;
use crate::terminal::TerminalDisplay;
use std::io::Write;
use tracing::{debug, error, info, warn};

/// Open the default camera and terminal display and run until exit
///
/// Fails before anything else is touched if the camera cannot be opened.
pub fn run(config: Config) -> AppResult<()> {
    let camera = GstCamera::open(config.device_index, config.camera_read_timeout)?;
    info!(size = %camera.size(), "Camera opened");

    storage::ensure_output_dir(&config.output_dir)?;

    let display = TerminalDisplay::new(&config.window_name)?;
    let mut recorder = Recorder::new(camera, display, GstVideoSinkFactory::default(), config);
    recorder.run()
}

/// Print the closing lines for a finished run; `true` when it succeeded
///
/// Runs after the terminal has been restored, for both outcomes.
pub fn report_exit(result: &AppResult<()>, out: &mut impl Write, err: &mut impl Write) -> bool {
    if let Err(e) = result {
        let _ = writeln!(err, "Error: {}", e);
    }
    let _ = writeln!(out, "Application closed");
    result.is_ok()
}

/// The capture loop and everything it owns
///
/// Field order is drop order: an active recording is finalized before the
/// camera and display are released.
pub struct Recorder<C: CameraSource, D: DisplaySink, F: VideoSinkFactory> {
    session: RecordingSession<F>,
    camera: C,
    display: D,
    filter: FilterMode,
    flip: FlipMode,
    state: LoopState,
    config: Config,
    frames_processed: u64,
    closed: bool,
}

impl<C: CameraSource, D: DisplaySink, F: VideoSinkFactory> Recorder<C, D, F> {
    pub fn new(camera: C, display: D, factory: F, config: Config) -> Self {
        let session = RecordingSession::new(factory, &config, camera.size());
        Self {
            session,
            camera,
            display,
            filter: FilterMode::default(),
            flip: FlipMode::default(),
            state: LoopState::Running,
            config,
            frames_processed: 0,
            closed: false,
        }
    }

    /// Step until stopped, then release everything
    ///
    /// Cleanup also runs when a step fails; the error is returned after.
    pub fn run(&mut self) -> AppResult<()> {
        let result = loop {
            match self.step() {
                Ok(LoopState::Running) => {}
                Ok(LoopState::Stopped) => break Ok(()),
                Err(e) => {
                    error!(%e, "Capture loop failed");
                    break Err(e);
                }
            }
        };
        self.shutdown();
        result
    }

    /// Run one iteration of the capture loop
    pub fn step(&mut self) -> AppResult<LoopState> {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        let frame = match self.camera.read_frame() {
            Ok(frame) => frame,
            Err(CameraError::EndOfStream) => {
                info!(frames = self.frames_processed, "Camera stream ended");
                self.state = LoopState::Stopped;
                return Ok(self.state);
            }
            Err(e) => {
                warn!(%e, "Failed to grab frame");
                self.display.notify("Failed to grab frame");
                self.state = LoopState::Stopped;
                return Ok(self.state);
            }
        };

        let processed = apply_filter(&apply_flip(&frame, self.flip), self.filter);

        if let Err(e) = self.session.write_frame(&processed) {
            error!(%e, "Failed to write frame to recording");
            self.display.notify(&format!("Recording error: {}", e));
            self.stop_recording();
        }

        let status = match self.session.elapsed() {
            Some(elapsed) => OverlayStatus::recording(elapsed.as_secs()),
            None => OverlayStatus::preview(),
        };
        let annotated = overlay::render(&processed, &status);
        self.display.show_frame(&self.config.window_name, &annotated)?;

        self.frames_processed += 1;
        if self.frames_processed % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(frames = self.frames_processed, "Frames processed");
        }

        if let Some(key) = self.display.poll_key(self.config.key_poll_timeout)? {
            self.handle_key(key);
        }

        Ok(self.state)
    }

    /// Dispatch one key press
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                info!("Exit requested");
                self.state = LoopState::Stopped;
            }
            Key::Space => self.toggle_recording(),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'f' => {
                    self.filter = self.filter.next();
                    info!(filter = %self.filter, "Filter mode changed");
                    self.display.notify(&format!(
                        "Filter mode changed to {} ({})",
                        self.filter.index(),
                        self.filter.display_name()
                    ));
                }
                'r' => {
                    self.flip = self.flip.next();
                    info!(flip = %self.flip, "Flip mode changed");
                    self.display.notify(&format!(
                        "Flip mode changed to {} ({})",
                        self.flip.index(),
                        self.flip.display_name()
                    ));
                }
                _ => {}
            },
            Key::Other => {}
        }
    }

    /// Start recording when idle, stop when recording
    pub fn toggle_recording(&mut self) {
        if self.session.is_recording() {
            self.stop_recording();
            return;
        }

        match self.session.start() {
            Ok(path) => {
                self.display
                    .notify(&format!("Recording started: {}", path.display()));
            }
            Err(e) => {
                error!(%e, "Failed to start recording");
                self.display.notify(&format!("Error: {}", e));
            }
        }
    }

    fn stop_recording(&mut self) {
        match self.session.stop() {
            Ok(Some(summary)) => {
                self.display.notify(&format!(
                    "Recording stopped: {} ({} frames)",
                    summary.path.display(),
                    summary.frames
                ));
            }
            Ok(None) => {}
            Err(e) => {
                error!(%e, "Failed to finalize recording");
                self.display.notify(&format!("Error: {}", e));
            }
        }
    }

    /// Stop any recording, release the camera and close the display
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.state = LoopState::Stopped;

        self.stop_recording();
        self.camera.release();
        self.display.notify("Application closed");
        self.display.close_all();
        info!(frames = self.frames_processed, "Application closed");
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn flip(&self) -> FlipMode {
        self.flip
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

impl<C: CameraSource, D: DisplaySink, F: VideoSinkFactory> Drop for Recorder<C, D, F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, CameraError};

    #[test]
    fn test_report_exit_success() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert!(report_exit(&Ok(()), &mut out, &mut err));
        assert_eq!(String::from_utf8(out).unwrap(), "Application closed\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_report_exit_failure_still_closes() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let result = Err(AppError::Camera(CameraError::Unavailable("no device".into())));
        assert!(!report_exit(&result, &mut out, &mut err));
        assert_eq!(String::from_utf8(out).unwrap(), "Application closed\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Error: Camera error: Could not open camera: no device\n"
        );
    }
}
