// SPDX-License-Identifier: GPL-3.0-only

//! On-screen annotations for the displayed frame
//!
//! The overlay only ever touches a copy: the frame handed to the recorder
//! must stay free of indicator, timer, label and help text.

use super::draw::{draw_text, fill_circle};
use super::frame::Frame;
use crate::constants::overlay::*;

/// What the overlay needs to know about the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayStatus {
    /// Whole seconds since recording started, `None` while previewing
    pub recording_secs: Option<u64>,
}

impl OverlayStatus {
    pub fn preview() -> Self {
        Self::default()
    }

    pub fn recording(elapsed_secs: u64) -> Self {
        Self {
            recording_secs: Some(elapsed_secs),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording_secs.is_some()
    }
}

/// `MM:SS`, zero padded, minutes unbounded
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Annotated copy of `frame`
pub fn render(frame: &Frame, status: &OverlayStatus) -> Frame {
    let mut out = frame.clone();
    let width = out.width() as i32;
    let height = out.height() as i32;

    if let Some(secs) = status.recording_secs {
        fill_circle(&mut out, INDICATOR_CENTER, INDICATOR_RADIUS, RED);
        draw_text(&mut out, &format_elapsed(secs), TIMER_ORIGIN, RED);
    }

    let label = if status.is_recording() {
        RECORDING_LABEL
    } else {
        PREVIEW_LABEL
    };
    draw_text(
        &mut out,
        label,
        (width - MODE_LABEL_RIGHT_INSET, MODE_LABEL_BASELINE),
        WHITE,
    );

    draw_text(
        &mut out,
        TITLE_TEXT,
        (FOOTER_LEFT, height - TITLE_BOTTOM_OFFSET),
        WHITE,
    );
    draw_text(
        &mut out,
        HELP_TEXT,
        (FOOTER_LEFT, height - HELP_BOTTOM_OFFSET),
        WHITE,
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 3] = [0, 0, 0];

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(61), "01:01");
        assert_eq!(format_elapsed(6000), "100:00");
    }

    #[test]
    fn test_render_leaves_input_untouched() {
        let frame = Frame::filled(640, 480, BLACK);
        let out = render(&frame, &OverlayStatus::recording(5));
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
        assert_ne!(out, frame);
    }

    #[test]
    fn test_indicator_only_while_recording() {
        let frame = Frame::filled(640, 480, BLACK);
        let (cx, cy) = INDICATOR_CENTER;

        let preview = render(&frame, &OverlayStatus::preview());
        assert_eq!(preview.pixel(cx as u32, cy as u32), BLACK);

        let recording = render(&frame, &OverlayStatus::recording(0));
        assert_eq!(recording.pixel(cx as u32, cy as u32), RED);
    }

    #[test]
    fn test_footer_drawn_near_bottom() {
        let frame = Frame::filled(640, 480, BLACK);
        let out = render(&frame, &OverlayStatus::preview());
        let footer_top = 480 - TITLE_BOTTOM_OFFSET as u32 - 8;
        let lit = (footer_top..480)
            .flat_map(|y| (0..640).map(move |x| (x, y)))
            .any(|(x, y)| out.pixel(x, y) == WHITE);
        assert!(lit);
    }

    #[test]
    fn test_tiny_frame_does_not_panic() {
        let frame = Frame::filled(4, 4, BLACK);
        let out = render(&frame, &OverlayStatus::recording(3));
        assert_eq!(out.size(), frame.size());
    }
}
