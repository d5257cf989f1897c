// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{self, recording, timing};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for one recorder run
///
/// Nothing here is read from disk, the environment or the command line;
/// the binary always runs with [`Config::default`]. Tests construct their
/// own to redirect output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Camera device index (`/dev/video<N>`)
    pub device_index: u32,
    /// Output frame rate handed to the encoder
    pub framerate: u32,
    /// Directory recordings are written to
    pub output_dir: PathBuf,
    /// Four character code requested from the encoder factory
    pub codec_tag: String,
    /// Container file extension
    pub container_extension: String,
    /// Title given to the display sink
    pub window_name: String,
    /// Bounded wait for a key press each iteration
    pub key_poll_timeout: Duration,
    /// Longest a single camera read may block
    pub camera_read_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_index: constants::DEFAULT_DEVICE_INDEX,
            framerate: recording::FRAMERATE,
            output_dir: PathBuf::from(recording::OUTPUT_DIR),
            codec_tag: recording::CODEC_TAG.to_string(),
            container_extension: recording::CONTAINER_EXTENSION.to_string(),
            window_name: constants::WINDOW_NAME.to_string(),
            key_poll_timeout: timing::KEY_POLL_TIMEOUT,
            camera_read_timeout: timing::CAMERA_READ_TIMEOUT,
        }
    }
}

impl Config {
    /// Default settings writing into `output_dir`
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}
