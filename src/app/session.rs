// SPDX-License-Identifier: GPL-3.0-only

//! Recording session state machine
//!
//! Idle until [`RecordingSession::start`] opens a sink; [`RecordingSession::stop`]
//! finalizes it and returns to Idle. Dropping a session that is still
//! recording finalizes the file as well.

use crate::backends::encoder::{VideoSink, VideoSinkFactory};
use crate::config::Config;
use crate::errors::RecordingError;
use crate::media::{Frame, FrameSize};
use crate::storage;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Recording state; the sink only exists while recording
#[derive(Debug)]
enum RecordingState<S> {
    Idle,
    Recording(ActiveRecording<S>),
}

/// An open recording
#[derive(Debug)]
struct ActiveRecording<S> {
    sink: S,
    started_at: Instant,
    path: PathBuf,
    frames: u64,
}

/// What a finished recording produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSummary {
    pub path: PathBuf,
    pub frames: u64,
}

/// Owns the output sink for the lifetime of one recording
pub struct RecordingSession<F: VideoSinkFactory> {
    factory: F,
    output_dir: PathBuf,
    codec_tag: String,
    extension: String,
    framerate: u32,
    size: FrameSize,
    state: RecordingState<F::Sink>,
}

impl<F: VideoSinkFactory> RecordingSession<F> {
    /// Idle session producing `size` frames into `config.output_dir`
    pub fn new(factory: F, config: &Config, size: FrameSize) -> Self {
        Self {
            factory,
            output_dir: config.output_dir.clone(),
            codec_tag: config.codec_tag.clone(),
            extension: config.container_extension.clone(),
            framerate: config.framerate,
            size,
            state: RecordingState::Idle,
        }
    }

    /// Open a new timestamped file and start recording
    ///
    /// Returns the path of the active recording. Calling this while already
    /// recording returns the current path without opening anything.
    pub fn start(&mut self) -> Result<PathBuf, RecordingError> {
        if let RecordingState::Recording(active) = &self.state {
            return Ok(active.path.clone());
        }

        let path = storage::new_recording_path(&self.output_dir, &self.extension);
        let sink = self
            .factory
            .create(&path, &self.codec_tag, self.framerate, self.size)
            .map_err(|e| match e {
                RecordingError::SinkCreation(_) => e,
                other => RecordingError::SinkCreation(other.to_string()),
            })?;

        info!(path = %path.display(), size = %self.size, "Recording started");
        self.state = RecordingState::Recording(ActiveRecording {
            sink,
            started_at: Instant::now(),
            path: path.clone(),
            frames: 0,
        });
        Ok(path)
    }

    /// Finalize the active recording; `Ok(None)` when idle
    ///
    /// The session is Idle afterwards even if finalizing failed.
    pub fn stop(&mut self) -> Result<Option<RecordingSummary>, RecordingError> {
        let state = std::mem::replace(&mut self.state, RecordingState::Idle);
        let RecordingState::Recording(mut active) = state else {
            return Ok(None);
        };

        active.sink.finish()?;
        info!(
            path = %active.path.display(),
            frames = active.frames,
            "Recording stopped"
        );
        Ok(Some(RecordingSummary {
            path: active.path,
            frames: active.frames,
        }))
    }

    /// Append `frame` to the active recording; no-op when idle
    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        let RecordingState::Recording(active) = &mut self.state else {
            return Ok(());
        };
        active.sink.append(frame)?;
        active.frames += 1;
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording(_))
    }

    /// Time since recording started, `None` when idle
    pub fn elapsed(&self) -> Option<Duration> {
        match &self.state {
            RecordingState::Recording(active) => Some(active.started_at.elapsed()),
            RecordingState::Idle => None,
        }
    }

    /// Path of the active recording
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            RecordingState::Recording(active) => Some(&active.path),
            RecordingState::Idle => None,
        }
    }

    /// Frames appended to the active recording so far
    pub fn frames(&self) -> Option<u64> {
        match &self.state {
            RecordingState::Recording(active) => Some(active.frames),
            RecordingState::Idle => None,
        }
    }
}

impl<F: VideoSinkFactory> Drop for RecordingSession<F> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(%e, "Failed to finalize recording on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        created: Vec<PathBuf>,
        appended: usize,
        finished: usize,
    }

    struct FakeSink {
        size: FrameSize,
        log: Rc<RefCell<Log>>,
    }

    impl VideoSink for FakeSink {
        fn frame_size(&self) -> FrameSize {
            self.size
        }

        fn append(&mut self, frame: &Frame) -> Result<(), RecordingError> {
            if frame.size() != self.size {
                return Err(RecordingError::FrameSizeMismatch {
                    expected: (self.size.width, self.size.height),
                    actual: (frame.width(), frame.height()),
                });
            }
            self.log.borrow_mut().appended += 1;
            Ok(())
        }

        fn finish(&mut self) -> Result<(), RecordingError> {
            self.log.borrow_mut().finished += 1;
            Ok(())
        }
    }

    struct FakeFactory {
        log: Rc<RefCell<Log>>,
        fail: bool,
    }

    impl VideoSinkFactory for FakeFactory {
        type Sink = FakeSink;

        fn create(
            &self,
            path: &Path,
            _codec_tag: &str,
            _framerate: u32,
            size: FrameSize,
        ) -> Result<FakeSink, RecordingError> {
            if self.fail {
                return Err(RecordingError::EncoderNotAvailable("no encoder".into()));
            }
            self.log.borrow_mut().created.push(path.to_path_buf());
            Ok(FakeSink {
                size,
                log: self.log.clone(),
            })
        }
    }

    fn session(fail: bool) -> (RecordingSession<FakeFactory>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let factory = FakeFactory {
            log: log.clone(),
            fail,
        };
        let config = Config::with_output_dir("out");
        (
            RecordingSession::new(factory, &config, FrameSize::new(4, 4)),
            log,
        )
    }

    #[test]
    fn test_start_twice_opens_once() {
        let (mut session, log) = session(false);
        let first = session.start().unwrap();
        let second = session.start().unwrap();
        assert_eq!(first, second);
        assert_eq!(log.borrow().created.len(), 1);
        assert!(session.is_recording());
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let (mut session, log) = session(false);
        assert_eq!(session.stop().unwrap(), None);
        assert_eq!(log.borrow().finished, 0);
    }

    #[test]
    fn test_stop_reports_frames() {
        let (mut session, log) = session(false);
        let path = session.start().unwrap();
        let frame = Frame::filled(4, 4, [1, 2, 3]);
        for _ in 0..3 {
            session.write_frame(&frame).unwrap();
        }
        let summary = session.stop().unwrap().unwrap();
        assert_eq!(summary, RecordingSummary { path, frames: 3 });
        assert_eq!(log.borrow().finished, 1);
        assert!(!session.is_recording());
        assert_eq!(session.elapsed(), None);
    }

    #[test]
    fn test_write_while_idle_is_noop() {
        let (mut session, log) = session(false);
        session.write_frame(&Frame::filled(4, 4, [0, 0, 0])).unwrap();
        assert_eq!(log.borrow().appended, 0);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let (mut session, _log) = session(false);
        session.start().unwrap();
        let err = session.write_frame(&Frame::filled(2, 2, [0, 0, 0]));
        assert!(matches!(
            err,
            Err(RecordingError::FrameSizeMismatch { .. })
        ));
        assert_eq!(session.frames(), Some(0));
    }

    #[test]
    fn test_creation_failure_stays_idle() {
        let (mut session, _log) = session(true);
        assert!(matches!(
            session.start(),
            Err(RecordingError::SinkCreation(_))
        ));
        assert!(!session.is_recording());
        assert_eq!(session.path(), None);
    }

    #[test]
    fn test_drop_finalizes_active_recording() {
        let (mut session, log) = session(false);
        session.start().unwrap();
        drop(session);
        assert_eq!(log.borrow().finished, 1);
    }

    #[test]
    fn test_file_name_pattern() {
        let (mut session, _log) = session(false);
        let path = session.start().unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(storage::is_recording_file_name(name, "mp4"), "{}", name);
        assert_eq!(path.parent(), Some(Path::new("out")));
    }
}
