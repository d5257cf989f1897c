// SPDX-License-Identifier: GPL-3.0-only

//! Two-threshold gradient edge detector
//!
//! 1. 3x3 Sobel derivatives per colour channel (replicated borders). The
//!    channel with the largest `|dx| + |dy|` supplies the pixel's gradient.
//! 2. Non-maximum suppression along the gradient direction, quantized to
//!    0/45/90/135 degrees. Magnitude outside the image counts as zero.
//! 3. Hysteresis: magnitudes above the high threshold seed edges, which
//!    grow through 8-connected pixels above the low threshold.
//!
//! The output plane holds 255 for edge pixels and 0 elsewhere.

use super::frame::{CHANNELS, Frame};
use crate::constants::edges::{HIGH_THRESHOLD, LOW_THRESHOLD};

/// tan(22.5 deg) in Q15
const TAN_22_5_Q15: i64 = 13573;

const EDGE: u8 = 255;

/// Pixel classification after suppression
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Suppressed or below the low threshold
    None,
    /// Local maximum between the thresholds
    Weak,
    /// Confirmed edge
    Strong,
}

/// Edge map of `frame` using the fixed thresholds
pub fn detect(frame: &Frame) -> Vec<u8> {
    detect_with_thresholds(frame, LOW_THRESHOLD, HIGH_THRESHOLD)
}

pub(crate) fn detect_with_thresholds(frame: &Frame, low: i32, high: i32) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let gradients = sobel(frame, width, height);
    let marks = suppress(&gradients, width, height, low, high);
    hysteresis(marks, width, height)
}

/// Per-pixel dominant gradient
#[derive(Clone, Copy, Default)]
struct Gradient {
    dx: i32,
    dy: i32,
    magnitude: i32,
}

fn sobel(frame: &Frame, width: usize, height: usize) -> Vec<Gradient> {
    let data = frame.as_bytes();
    let stride = width * CHANNELS;
    let sample = |x: isize, y: isize, c: usize| -> i32 {
        let x = x.clamp(0, width as isize - 1) as usize;
        let y = y.clamp(0, height as isize - 1) as usize;
        data[y * stride + x * CHANNELS + c] as i32
    };

    let mut out = vec![Gradient::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            let (xi, yi) = (x as isize, y as isize);
            let mut best = Gradient::default();
            for c in 0..CHANNELS {
                let tl = sample(xi - 1, yi - 1, c);
                let tm = sample(xi, yi - 1, c);
                let tr = sample(xi + 1, yi - 1, c);
                let ml = sample(xi - 1, yi, c);
                let mr = sample(xi + 1, yi, c);
                let bl = sample(xi - 1, yi + 1, c);
                let bm = sample(xi, yi + 1, c);
                let br = sample(xi + 1, yi + 1, c);

                let dx = (tr + 2 * mr + br) - (tl + 2 * ml + bl);
                let dy = (bl + 2 * bm + br) - (tl + 2 * tm + tr);
                let magnitude = dx.abs() + dy.abs();
                if c == 0 || magnitude > best.magnitude {
                    best = Gradient { dx, dy, magnitude };
                }
            }
            out[y * width + x] = best;
        }
    }
    out
}

fn suppress(gradients: &[Gradient], width: usize, height: usize, low: i32, high: i32) -> Vec<Mark> {
    let magnitude_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            return 0;
        }
        gradients[y as usize * width + x as usize].magnitude
    };

    let mut marks = vec![Mark::None; width * height];
    for y in 0..height {
        for x in 0..width {
            let g = gradients[y * width + x];
            let m = g.magnitude;
            if m <= low {
                continue;
            }

            let (xi, yi) = (x as isize, y as isize);
            let ax = g.dx.unsigned_abs() as i64;
            let ay = (g.dy.unsigned_abs() as i64) << 15;
            let tg22 = ax * TAN_22_5_Q15;

            let is_max = if ay < tg22 {
                // Mostly horizontal gradient: compare left/right
                m > magnitude_at(xi - 1, yi) && m >= magnitude_at(xi + 1, yi)
            } else {
                let tg67 = tg22 + (ax << 16);
                if ay > tg67 {
                    // Mostly vertical gradient: compare up/down
                    m > magnitude_at(xi, yi - 1) && m >= magnitude_at(xi, yi + 1)
                } else {
                    // Diagonal: the sign of dx*dy picks the diagonal
                    let s: isize = if (g.dx ^ g.dy) < 0 { -1 } else { 1 };
                    m > magnitude_at(xi - s, yi - 1) && m > magnitude_at(xi + s, yi + 1)
                }
            };

            if is_max {
                marks[y * width + x] = if m > high { Mark::Strong } else { Mark::Weak };
            }
        }
    }
    marks
}

fn hysteresis(mut marks: Vec<Mark>, width: usize, height: usize) -> Vec<u8> {
    let mut stack: Vec<usize> = marks
        .iter()
        .enumerate()
        .filter(|(_, m)| **m == Mark::Strong)
        .map(|(i, _)| i)
        .collect();

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % width) as isize, (idx / width) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let n = ny as usize * width + nx as usize;
                if marks[n] == Mark::Weak {
                    marks[n] = Mark::Strong;
                    stack.push(n);
                }
            }
        }
    }

    marks
        .into_iter()
        .map(|m| if m == Mark::Strong { EDGE } else { 0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half black, right half white
    fn vertical_step(width: u32, height: u32) -> Frame {
        let mut data = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        Frame::from_bgr(width, height, data).unwrap()
    }

    #[test]
    fn test_flat_frame_has_no_edges() {
        let frame = Frame::filled(8, 6, [120, 60, 200]);
        assert!(detect(&frame).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_step_produces_single_column() {
        let frame = vertical_step(10, 6);
        let edges = detect(&frame);
        for y in 0..6 {
            let row: Vec<u8> = edges[y * 10..(y + 1) * 10].to_vec();
            let lit: Vec<usize> = (0..10).filter(|&x| row[x] == EDGE).collect();
            // Equal magnitudes at x=4 and x=5; the left neighbour wins the
            // strict comparison, the right neighbour the non-strict one
            assert_eq!(lit, vec![4], "row {}", y);
        }
    }

    #[test]
    fn test_output_is_binary() {
        let frame = vertical_step(12, 4);
        assert!(detect(&frame).iter().all(|&v| v == 0 || v == EDGE));
    }

    #[test]
    fn test_weak_pixels_need_a_strong_neighbour() {
        // Step of 30 gives |dx| = 120: above low, below high
        let mut data = Vec::new();
        for _ in 0..5 {
            for x in 0..8u32 {
                let v = if x < 4 { 100 } else { 130 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        let frame = Frame::from_bgr(8, 5, data).unwrap();
        assert!(detect(&frame).iter().all(|&v| v == 0));
        assert!(detect_with_thresholds(&frame, 100, 110).contains(&EDGE));
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::from_bgr(0, 0, Vec::new()).unwrap();
        assert!(detect(&frame).is_empty());
    }
}
