// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │  Facing
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │  ← enumerate, preview start/stop
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │PipeWire│  ← GStreamer pipewiresrc
//!       └────────┘
//! ```

pub mod pipewire;
pub mod types;

pub use pipewire::select_device;
pub use types::*;

/// Camera backend trait
pub trait CameraBackend: Send {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Check if this backend is available on the current system
    fn is_available(&self) -> bool;

    /// Start streaming RGBA preview frames from `device` into `sender`
    ///
    /// Any preview already running is stopped first.
    fn start_preview(&mut self, device: &CameraDevice, sender: FrameSender) -> BackendResult<()>;

    /// Stop the preview and release the camera
    fn stop_preview(&mut self) -> BackendResult<()>;

    /// Device the preview is currently running on
    fn current_device(&self) -> Option<&CameraDevice>;
}

/// Get the camera backend (PipeWire only)
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(pipewire::PipeWireBackend::new())
}

/// Enumerate cameras and pick the one facing the requested way
pub fn resolve_device(
    backend: &dyn CameraBackend,
    facing: Facing,
) -> BackendResult<CameraDevice> {
    let devices = backend.enumerate_cameras();
    select_device(&devices, facing)
        .cloned()
        .ok_or_else(|| BackendError::DeviceNotFound(format!("no {} camera", facing)))
}
