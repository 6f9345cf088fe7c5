// SPDX-License-Identifier: GPL-3.0-only

//! Async photo pipeline
//!
//! ```text
//! Preview frame → Capture (JPEG temp) → Decode → Filter preview
//!                                          ↓
//!                         Save (optional bake) → Media library album
//! ```
//!
//! Every stage runs off the UI thread; CPU-bound work goes through
//! `spawn_blocking` and the preview keeps streaming while a still is taken.

pub mod capture;
pub mod decode;
pub mod encoding;
pub mod processing;
pub mod save;

pub use capture::{CapturedImage, PhotoCapture};
pub use decode::{DecodedImage, decode};
pub use encoding::{EncodedImage, PhotoEncoder};
pub use processing::{apply_filter, filter_image, render_filter_thumbnails};
pub use save::{SaveRequest, SavedPhoto, save_to_library};
