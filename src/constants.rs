// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Video encoder bitrate presets
///
/// The recorder always uses [`BitratePreset::Medium`]; the other presets
/// exist so the table can be tuned in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitratePreset {
    /// Low bitrate - smaller files, reduced quality
    Low,
    /// Medium bitrate - balanced quality and file size (default)
    #[default]
    Medium,
    /// High bitrate - larger files, better quality
    High,
}

impl BitratePreset {
    pub const ALL: [BitratePreset; 3] = [
        BitratePreset::Low,
        BitratePreset::Medium,
        BitratePreset::High,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            BitratePreset::Low => "Low",
            BitratePreset::Medium => "Medium",
            BitratePreset::High => "High",
        }
    }

    /// Get bitrate in kbps for a given frame width
    ///
    /// - SD (640x480): Low=1, Medium=2, High=4 Mbps
    /// - HD (1280x720): Low=2.5, Medium=5, High=10 Mbps
    /// - Full HD (1920x1080) and above: Low=4, Medium=8, High=16 Mbps
    pub fn bitrate_kbps(&self, width: u32) -> u32 {
        match (ResolutionTier::for_width(width), self) {
            (ResolutionTier::SD, BitratePreset::Low) => 1_000,
            (ResolutionTier::SD, BitratePreset::Medium) => 2_000,
            (ResolutionTier::SD, BitratePreset::High) => 4_000,
            (ResolutionTier::HD, BitratePreset::Low) => 2_500,
            (ResolutionTier::HD, BitratePreset::Medium) => 5_000,
            (ResolutionTier::HD, BitratePreset::High) => 10_000,
            (ResolutionTier::FullHD, BitratePreset::Low) => 4_000,
            (ResolutionTier::FullHD, BitratePreset::Medium) => 8_000,
            (ResolutionTier::FullHD, BitratePreset::High) => 16_000,
        }
    }
}

/// Resolution tiers for bitrate calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    /// 640x480 and below
    SD,
    /// 1280x720
    HD,
    /// 1920x1080 and above
    FullHD,
}

impl ResolutionTier {
    pub fn for_width(width: u32) -> Self {
        match width {
            w if w >= 1920 => ResolutionTier::FullHD,
            w if w >= 1280 => ResolutionTier::HD,
            _ => ResolutionTier::SD,
        }
    }
}

/// Recording output constants
pub mod recording {
    /// Directory (relative to the working directory) recordings are written to
    pub const OUTPUT_DIR: &str = "recordings";

    /// File name prefix, followed by a `YYYYMMDD_HHMMSS` timestamp
    pub const FILE_PREFIX: &str = "video_";

    /// `chrono` format string for the file name timestamp
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Four character code requested from the encoder factory (MPEG-4 Part 2)
    pub const CODEC_TAG: &str = "mp4v";

    /// Container file extension
    pub const CONTAINER_EXTENSION: &str = "mp4";

    /// Fixed output frame rate
    pub const FRAMERATE: u32 = 30;
}

/// Edge detection thresholds
///
/// Part of the filter's observable output; not user-tunable.
pub mod edges {
    pub const LOW_THRESHOLD: i32 = 100;
    pub const HIGH_THRESHOLD: i32 = 200;
}

/// On-frame overlay layout, in frame pixels
pub mod overlay {
    /// BGR red
    pub const RED: [u8; 3] = [0, 0, 255];
    /// BGR white
    pub const WHITE: [u8; 3] = [255, 255, 255];

    pub const INDICATOR_CENTER: (i32, i32) = (40, 35);
    pub const INDICATOR_RADIUS: i32 = 10;

    /// Baseline origin of the elapsed-time text
    pub const TIMER_ORIGIN: (i32, i32) = (60, 40);

    /// Mode label is drawn this far left of the right edge
    pub const MODE_LABEL_RIGHT_INSET: i32 = 90;
    pub const MODE_LABEL_BASELINE: i32 = 40;

    pub const FOOTER_LEFT: i32 = 10;
    /// Title baseline, measured up from the bottom edge
    pub const TITLE_BOTTOM_OFFSET: i32 = 40;
    /// Help baseline, measured up from the bottom edge
    pub const HELP_BOTTOM_OFFSET: i32 = 20;

    pub const TITLE_TEXT: &str = "= Simple Video Recorder =";
    pub const HELP_TEXT: &str = "Space: Toggle Recording | F: Filter | R: Flip | ESC: Exit";

    pub const RECORDING_LABEL: &str = "Recording";
    pub const PREVIEW_LABEL: &str = "Preview";
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Raw format requested from the camera and pushed to the encoder
    pub const RAW_FORMAT: &str = "BGR";

    /// Maximum appsink queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Encoders tried in order for each codec tag, with the parser placed
    /// between encoder and muxer
    pub const MPEG4_ENCODERS: &[(&str, Option<&str>)] = &[
        ("avenc_mpeg4", Some("mpeg4videoparse")),
        ("x264enc", Some("h264parse")),
        ("openh264enc", Some("h264parse")),
    ];
    pub const H264_ENCODERS: &[(&str, Option<&str>)] = &[
        ("x264enc", Some("h264parse")),
        ("openh264enc", Some("h264parse")),
    ];

    pub const MUXER: &str = "mp4mux";
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Bounded wait for a key press each loop iteration
    pub const KEY_POLL_TIMEOUT: Duration = Duration::from_millis(1);

    /// Longest a single camera read may block before it counts as a failure
    pub const CAMERA_READ_TIMEOUT: Duration = Duration::from_secs(2);

    /// Time allowed for the camera to deliver its first frame
    pub const CAMERA_START_TIMEOUT: Duration = Duration::from_secs(5);

    /// Time allowed for the encoder to drain after end-of-stream
    pub const ENCODER_EOS_TIMEOUT_SECS: u64 = 5;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 300;
}

/// Window title handed to the display sink
pub const WINDOW_NAME: &str = "Video Recorder";

/// Default camera device index (`/dev/video0`)
pub const DEFAULT_DEVICE_INDEX: u32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_tiers() {
        assert_eq!(ResolutionTier::for_width(640), ResolutionTier::SD);
        assert_eq!(ResolutionTier::for_width(1280), ResolutionTier::HD);
        assert_eq!(ResolutionTier::for_width(1920), ResolutionTier::FullHD);
        assert_eq!(ResolutionTier::for_width(3840), ResolutionTier::FullHD);
    }

    #[test]
    fn test_bitrate_presets_ordered() {
        for width in [640, 1280, 1920] {
            let rates: Vec<u32> = BitratePreset::ALL
                .iter()
                .map(|p| p.bitrate_kbps(width))
                .collect();
            assert!(rates.windows(2).all(|w| w[0] < w[1]), "width {}", width);
        }
    }
}
