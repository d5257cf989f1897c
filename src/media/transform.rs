// SPDX-License-Identifier: MPL-2.0

//! Flip and filter transforms on BGR frames
//!
//! Every function here takes the input by reference and returns a new,
//! independently owned frame. Flip is applied to the raw capture first,
//! then the filter runs on the flipped result.

use super::edges;
use super::frame::{CHANNELS, Frame};
use crate::app::{FilterMode, FlipMode};

// BT.601 luma weights in 14-bit fixed point
const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

/// Sepia mixing matrix, rows producing R', G', B' from (R, G, B)
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Mirror the frame according to `mode`
pub fn apply_flip(frame: &Frame, mode: FlipMode) -> Frame {
    match mode {
        FlipMode::None => frame.clone(),
        FlipMode::Horizontal => flip_horizontal(frame),
        FlipMode::Vertical => flip_vertical(frame),
    }
}

/// Apply the colour filter selected by `mode`
pub fn apply_filter(frame: &Frame, mode: FilterMode) -> Frame {
    match mode {
        FilterMode::None => frame.clone(),
        FilterMode::Grayscale => expand_gray(frame, &grayscale(frame)),
        FilterMode::Sepia => sepia(frame),
        FilterMode::EdgeDetection => expand_gray(frame, &edges::detect(frame)),
    }
}

fn flip_horizontal(frame: &Frame) -> Frame {
    let mut out = Vec::with_capacity(frame.as_bytes().len());
    for y in 0..frame.height() {
        for pixel in frame.row(y).chunks_exact(CHANNELS).rev() {
            out.extend_from_slice(pixel);
        }
    }
    rebuild(frame, out)
}

fn flip_vertical(frame: &Frame) -> Frame {
    let mut out = Vec::with_capacity(frame.as_bytes().len());
    for y in (0..frame.height()).rev() {
        out.extend_from_slice(frame.row(y));
    }
    rebuild(frame, out)
}

/// Single-channel luminance plane, one byte per pixel
pub fn grayscale(frame: &Frame) -> Vec<u8> {
    frame
        .as_bytes()
        .chunks_exact(CHANNELS)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

/// Luminance of one BGR pixel, rounded to nearest
pub fn luma(b: u8, g: u8, r: u8) -> u8 {
    let sum = b as u32 * LUMA_B + g as u32 * LUMA_G + r as u32 * LUMA_R;
    ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

fn sepia(frame: &Frame) -> Frame {
    let mut out = Vec::with_capacity(frame.as_bytes().len());
    for px in frame.as_bytes().chunks_exact(CHANNELS) {
        let (b, g, r) = (px[0] as f32, px[1] as f32, px[2] as f32);
        let mix = |row: &[f32; 3]| saturate(row[0] * r + row[1] * g + row[2] * b);
        let (r2, g2, b2) = (mix(&SEPIA[0]), mix(&SEPIA[1]), mix(&SEPIA[2]));
        out.extend_from_slice(&[b2, g2, r2]);
    }
    rebuild(frame, out)
}

fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Replicate a single-channel plane into all three channels
fn expand_gray(frame: &Frame, plane: &[u8]) -> Frame {
    let mut out = Vec::with_capacity(plane.len() * CHANNELS);
    for &v in plane {
        out.extend_from_slice(&[v, v, v]);
    }
    rebuild(frame, out)
}

fn rebuild(like: &Frame, data: Vec<u8>) -> Frame {
    like.with_same_size(data)
}
