// SPDX-License-Identifier: MPL-2.0

//! In-memory camera, display and video sink used to drive the capture loop

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use video_recorder::backends::camera::{CameraResult, CameraSource};
use video_recorder::backends::display::{DisplaySink, Key};
use video_recorder::backends::encoder::{VideoSink, VideoSinkFactory};
use video_recorder::errors::{CameraError, DisplayError, RecordingError};
use video_recorder::{Frame, FrameSize};

/// Frame whose pixels vary with position so flips and filters are visible
pub fn gradient_frame(width: u32, height: u32, seed: u8) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x as u8).wrapping_mul(3).wrapping_add(seed));
            data.push((y as u8).wrapping_mul(5));
            data.push((x as u8 ^ y as u8).wrapping_add(seed));
        }
    }
    Frame::from_bgr(width, height, data).expect("frame size")
}

#[derive(Default)]
pub struct CameraLog {
    pub reads: usize,
    pub releases: usize,
}

pub struct FakeCamera {
    size: FrameSize,
    frames: VecDeque<Frame>,
    fail_when_empty: bool,
    pub log: Rc<RefCell<CameraLog>>,
}

impl FakeCamera {
    pub fn new(frames: Vec<Frame>) -> Self {
        let size = frames
            .first()
            .map(Frame::size)
            .unwrap_or(FrameSize::new(0, 0));
        Self {
            size,
            frames: frames.into(),
            fail_when_empty: false,
            log: Rc::default(),
        }
    }

    /// `count` copies of a gradient frame
    pub fn repeating(width: u32, height: u32, count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| gradient_frame(width, height, i as u8))
                .collect(),
        )
    }

    /// Report a read failure instead of end-of-stream once frames run out
    pub fn failing_when_empty(mut self) -> Self {
        self.fail_when_empty = true;
        self
    }
}

impl CameraSource for FakeCamera {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn read_frame(&mut self) -> CameraResult<Frame> {
        self.log.borrow_mut().reads += 1;
        match self.frames.pop_front() {
            Some(frame) => Ok(frame),
            None if self.fail_when_empty => Err(CameraError::ReadFailed("device lost".into())),
            None => Err(CameraError::EndOfStream),
        }
    }

    fn release(&mut self) {
        self.log.borrow_mut().releases += 1;
        self.frames.clear();
    }
}

#[derive(Default)]
pub struct DisplayLog {
    pub shown: Vec<Frame>,
    pub windows: Vec<String>,
    pub notifications: Vec<String>,
    pub closes: usize,
}

pub struct FakeDisplay {
    keys: VecDeque<Option<Key>>,
    pub log: Rc<RefCell<DisplayLog>>,
}

impl FakeDisplay {
    /// One entry per poll; `None` means no key that iteration
    pub fn with_keys(keys: Vec<Option<Key>>) -> Self {
        Self {
            keys: keys.into(),
            log: Rc::default(),
        }
    }
}

impl DisplaySink for FakeDisplay {
    fn show_frame(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError> {
        let mut log = self.log.borrow_mut();
        log.windows.push(window.to_string());
        log.shown.push(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<Key>, DisplayError> {
        Ok(self.keys.pop_front().flatten())
    }

    fn notify(&mut self, message: &str) {
        self.log.borrow_mut().notifications.push(message.to_string());
    }

    fn close_all(&mut self) {
        self.log.borrow_mut().closes += 1;
    }
}

#[derive(Default)]
pub struct SinkLog {
    pub created: Vec<PathBuf>,
    pub codec_tags: Vec<String>,
    pub framerates: Vec<u32>,
    pub frames: Vec<Frame>,
    pub finished: Vec<PathBuf>,
}

/// Writes one placeholder byte per appended frame so files exist on disk
pub struct FakeSink {
    path: PathBuf,
    size: FrameSize,
    fail_writes: bool,
    log: Rc<RefCell<SinkLog>>,
}

impl VideoSink for FakeSink {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn append(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        if self.fail_writes {
            return Err(RecordingError::Write("disk full".into()));
        }
        if frame.size() != self.size {
            return Err(RecordingError::FrameSizeMismatch {
                expected: (self.size.width, self.size.height),
                actual: (frame.width(), frame.height()),
            });
        }
        self.log.borrow_mut().frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RecordingError> {
        let mut log = self.log.borrow_mut();
        std::fs::write(&self.path, vec![0u8; log.frames.len()])
            .map_err(|e| RecordingError::Finalize(e.to_string()))?;
        log.finished.push(self.path.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSinkFactory {
    pub fail_create: bool,
    pub fail_writes: bool,
    pub log: Rc<RefCell<SinkLog>>,
}

impl VideoSinkFactory for FakeSinkFactory {
    type Sink = FakeSink;

    fn create(
        &self,
        path: &Path,
        codec_tag: &str,
        framerate: u32,
        size: FrameSize,
    ) -> Result<FakeSink, RecordingError> {
        if self.fail_create {
            return Err(RecordingError::SinkCreation("codec unavailable".into()));
        }
        let mut log = self.log.borrow_mut();
        log.created.push(path.to_path_buf());
        log.codec_tags.push(codec_tag.to_string());
        log.framerates.push(framerate);
        Ok(FakeSink {
            path: path.to_path_buf(),
            size,
            fail_writes: self.fail_writes,
            log: self.log.clone(),
        })
    }
}
