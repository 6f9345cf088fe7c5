// SPDX-License-Identifier: GPL-3.0-only

//! Capture controls module
//!
//! - Shutter button, dimmed while a capture or save is in flight
//! - Flip camera button

pub mod capture_button;
