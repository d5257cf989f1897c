// SPDX-License-Identifier: MPL-2.0

//! Error types for the video recorder

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Recording-related errors
    Recording(RecordingError),
    /// Display / keyboard errors
    Display(DisplayError),
    /// Storage/filesystem errors
    Storage(String),
}

/// Camera source errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The device could not be opened or never produced a frame
    Unavailable(String),
    /// A single frame read failed
    ReadFailed(String),
    /// The source has no more frames
    EndOfStream,
}

/// Recording sink errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingError {
    /// The video writer could not be opened
    SinkCreation(String),
    /// No encoder available for the requested codec tag
    EncoderNotAvailable(String),
    /// A frame could not be appended
    Write(String),
    /// A frame's size differs from the size the sink was opened with
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// Finalizing the file failed
    Finalize(String),
}

/// Display sink errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Terminal setup failed
    Init(String),
    /// Drawing or input failed
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Recording(e) => write!(f, "Recording error: {}", e),
            AppError::Display(e) => write!(f, "Display error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Unavailable(msg) => write!(f, "Could not open camera: {}", msg),
            CameraError::ReadFailed(msg) => write!(f, "Failed to grab frame: {}", msg),
            CameraError::EndOfStream => write!(f, "Camera stream ended"),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::SinkCreation(msg) => {
                write!(f, "Could not create output video file: {}", msg)
            }
            RecordingError::EncoderNotAvailable(msg) => write!(f, "Encoder not available: {}", msg),
            RecordingError::Write(msg) => write!(f, "Failed to write frame: {}", msg),
            RecordingError::FrameSizeMismatch { expected, actual } => write!(
                f,
                "Frame size {}x{} doesn't match recording {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            RecordingError::Finalize(msg) => write!(f, "Failed to finalize recording: {}", msg),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Init(msg) => write!(f, "Terminal setup failed: {}", msg),
            DisplayError::Io(msg) => write!(f, "Terminal I/O failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for DisplayError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<RecordingError> for AppError {
    fn from(err: RecordingError) -> Self {
        AppError::Recording(err)
    }
}

impl From<DisplayError> for AppError {
    fn from(err: DisplayError) -> Self {
        AppError::Display(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err.to_string())
    }
}
