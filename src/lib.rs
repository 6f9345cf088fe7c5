// SPDX-License-Identifier: GPL-3.0-only

//! Filter Camera - capture, filter and save photos on the COSMIC desktop
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application model, permission gate and capture/preview screens
//! - [`backends`]: Platform capabilities (camera, permissions, media library,
//!   push delivery and local notifications)
//! - [`filters`]: Color-matrix filter definitions and the CPU implementation
//! - [`notifications`]: Push-to-local notification bootstrap
//! - [`pipelines`]: Photo capture, decode, filter and save steps
//! - [`shaders`]: GPU compute path for applying color matrices
//! - [`config`]: User configuration handling
//! - [`storage`]: Temporary capture storage
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // filter-camera
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filters;
pub mod gpu;
pub mod i18n;
pub mod notifications;
pub mod pipelines;
pub mod shaders;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use filters::{ColorMatrix, FilterType};
