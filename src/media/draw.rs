// SPDX-License-Identifier: GPL-3.0-only

//! Raster primitives for the overlay: filled circles and bitmap text
//!
//! All primitives clip silently at the frame edges.

use super::frame::Frame;
use font8x8::{BASIC_FONTS, UnicodeFonts};

/// Glyph cell size in pixels
pub const GLYPH_SIZE: i32 = 8;

/// Filled disc centred on `center`
pub fn fill_circle(frame: &mut Frame, center: (i32, i32), radius: i32, bgr: [u8; 3]) {
    let (cx, cy) = center;
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                frame.put_pixel(cx + dx, cy + dy, bgr);
            }
        }
    }
}

/// Draw `text` with its baseline starting at `origin` (bottom-left corner
/// of the first glyph). Characters without a glyph advance the cursor.
pub fn draw_text(frame: &mut Frame, text: &str, origin: (i32, i32), bgr: [u8; 3]) {
    let (mut x, baseline) = origin;
    let top = baseline - GLYPH_SIZE;
    for ch in text.chars() {
        if let Some(glyph) = BASIC_FONTS.get(ch) {
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    // Bit 0 is the leftmost column
                    if bits & (1 << col) != 0 {
                        frame.put_pixel(x + col, top + row as i32, bgr);
                    }
                }
            }
        }
        x += GLYPH_SIZE;
    }
}

/// Width in pixels `text` occupies when drawn
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [0, 0, 255];

    #[test]
    fn test_circle_covers_center_not_corners() {
        let mut frame = Frame::filled(30, 30, [0, 0, 0]);
        fill_circle(&mut frame, (15, 15), 5, RED);
        assert_eq!(frame.pixel(15, 15), RED);
        assert_eq!(frame.pixel(20, 15), RED);
        assert_eq!(frame.pixel(20, 20), [0, 0, 0]);
        assert_eq!(frame.pixel(15, 21), [0, 0, 0]);
    }

    #[test]
    fn test_circle_clips_at_edges() {
        let mut frame = Frame::filled(10, 10, [0, 0, 0]);
        fill_circle(&mut frame, (0, 0), 4, RED);
        assert_eq!(frame.pixel(0, 0), RED);
    }

    #[test]
    fn test_text_stays_above_baseline() {
        let mut frame = Frame::filled(40, 20, [0, 0, 0]);
        draw_text(&mut frame, "H", (2, 12), [255, 255, 255]);
        let lit: Vec<(u32, u32)> = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) != [0, 0, 0])
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| (2..10).contains(&x) && (4..12).contains(&y)));
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut frame = Frame::filled(20, 20, [0, 0, 0]);
        draw_text(&mut frame, "  ", (0, 10), [255, 255, 255]);
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(text_width("  "), 16);
    }
}
