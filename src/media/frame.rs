// SPDX-License-Identifier: GPL-3.0-only

//! Packed BGR frame buffer

use std::fmt;

/// Bytes per pixel (B, G, R)
pub const CHANNELS: usize = 3;

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Byte length of a tightly packed BGR frame of this size
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One captured image: 8-bit B,G,R triples, rows packed without padding
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap packed BGR bytes; `None` when the length does not match the size
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != FrameSize::new(width, height).byte_len() {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single BGR colour
    pub fn filled(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&bgr);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Frame of the same size as `self` holding `data`
    pub(crate) fn with_same_size(&self, data: Vec<u8>) -> Frame {
        debug_assert_eq!(data.len(), self.data.len(), "transform changed frame size");
        Frame {
            width: self.width,
            height: self.height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of row `y`
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// BGR triple at (x, y), clamped to the frame
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width.saturating_sub(1)) as usize;
        let y = y.min(self.height.saturating_sub(1)) as usize;
        let idx = y * self.stride() + x * CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Write a BGR triple; coordinates outside the frame are ignored
    pub fn put_pixel(&mut self, x: i32, y: i32, bgr: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.stride() + x as usize * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&bgr);
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}
