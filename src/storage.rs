// SPDX-License-Identifier: MPL-2.0

//! Output directory and file naming for recordings

use crate::constants::recording;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Create the recordings directory if it does not exist yet
pub fn ensure_output_dir(dir: &Path) -> std::io::Result<()> {
    if dir.is_dir() {
        debug!(path = %dir.display(), "Output directory exists");
        return Ok(());
    }
    std::fs::create_dir_all(dir)?;
    info!(path = %dir.display(), "Created output directory");
    Ok(())
}

/// `<dir>/video_YYYYMMDD_HHMMSS.<extension>` for the given local time
pub fn recording_path(dir: &Path, timestamp: DateTime<Local>, extension: &str) -> PathBuf {
    let stamp = timestamp.format(recording::TIMESTAMP_FORMAT);
    dir.join(format!("{}{}.{}", recording::FILE_PREFIX, stamp, extension))
}

/// Recording path stamped with the current local time
pub fn new_recording_path(dir: &Path, extension: &str) -> PathBuf {
    recording_path(dir, Local::now(), extension)
}

/// Whether `name` looks like `video_<8 digits>_<6 digits>.<extension>`
pub fn is_recording_file_name(name: &str, extension: &str) -> bool {
    let Some(rest) = name.strip_prefix(recording::FILE_PREFIX) else {
        return false;
    };
    let Some(stamp) = rest
        .strip_suffix(extension)
        .and_then(|s| s.strip_suffix('.'))
    else {
        return false;
    };
    let bytes = stamp.as_bytes();
    bytes.len() == 15
        && bytes[8] == b'_'
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[9..].iter().all(u8::is_ascii_digit)
}
