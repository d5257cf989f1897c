// SPDX-License-Identifier: MPL-2.0

//! Frame processing for the capture loop
//!
//! # Transforms
//!
//! The [`transform`] module holds the flip and colour filters applied to
//! every captured frame before it is recorded. Edge detection lives in
//! [`edges`].
//!
//! # Overlay
//!
//! [`overlay`] annotates a copy of the processed frame for display using
//! the raster primitives in [`draw`].

pub mod draw;
pub mod edges;
pub mod frame;
pub mod overlay;
pub mod transform;

pub use frame::{Frame, FrameSize};
pub use overlay::OverlayStatus;
pub use transform::{apply_filter, apply_flip};
