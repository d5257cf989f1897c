// SPDX-License-Identifier: GPL-3.0-only

//! Display sink abstraction

use crate::errors::DisplayError;
use crate::media::Frame;
use std::time::Duration;

/// Key events the capture loop understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Char(char),
    /// Anything else; ignored by the loop
    Other,
}

/// Where processed frames are shown and key presses come from
pub trait DisplaySink {
    /// Present `frame` in the window called `window`
    fn show_frame(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError>;

    /// Wait at most `timeout` for one key press
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>, DisplayError>;

    /// Surface a one-line status message to the user
    fn notify(&mut self, message: &str);

    /// Tear down every window; idempotent
    fn close_all(&mut self);
}
