// SPDX-License-Identifier: GPL-3.0-only

//! Application state: filter/flip selections and loop state

use std::fmt;

/// Visual filter applied after the flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FilterMode {
    /// Frame passes through unchanged
    #[default]
    None,
    /// Luminance expanded back to three equal channels
    Grayscale,
    /// Warm brownish tone via a fixed colour-mixing matrix
    Sepia,
    /// Binary edge map from a two-threshold gradient detector
    EdgeDetection,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::None,
        FilterMode::Grayscale,
        FilterMode::Sepia,
        FilterMode::EdgeDetection,
    ];

    /// Position in the cycle, 0..=3
    pub fn index(&self) -> usize {
        match self {
            FilterMode::None => 0,
            FilterMode::Grayscale => 1,
            FilterMode::Sepia => 2,
            FilterMode::EdgeDetection => 3,
        }
    }

    /// Next mode, wrapping after edge detection
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterMode::None => "No filter",
            FilterMode::Grayscale => "Grayscale",
            FilterMode::Sepia => "Sepia",
            FilterMode::EdgeDetection => "Edge detection",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Mirror transform applied to the raw captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FlipMode {
    #[default]
    None,
    /// Mirror across the vertical axis (left/right swap)
    Horizontal,
    /// Mirror across the horizontal axis (top/bottom swap)
    Vertical,
}

impl FlipMode {
    pub const ALL: [FlipMode; 3] = [FlipMode::None, FlipMode::Horizontal, FlipMode::Vertical];

    /// Position in the cycle, 0..=2
    pub fn index(&self) -> usize {
        match self {
            FlipMode::None => 0,
            FlipMode::Horizontal => 1,
            FlipMode::Vertical => 2,
        }
    }

    /// Next mode, wrapping after vertical
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlipMode::None => "No flip",
            FlipMode::Horizontal => "Horizontal",
            FlipMode::Vertical => "Vertical",
        }
    }
}

impl fmt::Display for FlipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Capture loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Running,
    /// Terminal; the loop never leaves this state
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_cycle_wraps_after_four() {
        let mut mode = FilterMode::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode.index());
        }
        assert_eq!(seen, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_flip_cycle_wraps_after_three() {
        let mut mode = FlipMode::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            mode = mode.next();
            seen.push(mode.index());
        }
        assert_eq!(seen, vec![1, 2, 0]);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, mode) in FilterMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
        for (i, mode) in FlipMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }
}
