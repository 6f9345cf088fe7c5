// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for the camera backend

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way the active camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Rear (world-facing) camera
    #[default]
    Back,
    /// Front (user-facing) camera
    Front,
}

impl Facing {
    /// The other camera
    pub fn toggled(self) -> Self {
        match self {
            Facing::Back => Facing::Front,
            Facing::Front => Facing::Back,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Back => write!(f, "back"),
            Facing::Front => write!(f, "front"),
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" => Ok(Facing::Back),
            "front" | "user" => Ok(Facing::Front),
            other => Err(format!("Unknown camera facing '{}' (expected back or front)", other)),
        }
    }
}

/// Physical mounting reported by libcamera (`api.libcamera.location`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraLocation {
    Front,
    Back,
    External,
    #[default]
    Unknown,
}

impl CameraLocation {
    /// Parse the libcamera location property value
    pub fn from_property(value: &str) -> Self {
        match value.trim() {
            "front" => CameraLocation::Front,
            "back" => CameraLocation::Back,
            "external" => CameraLocation::External,
            _ => CameraLocation::Unknown,
        }
    }
}

/// A camera device discovered through PipeWire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name (node.description)
    pub name: String,
    /// PipeWire target (`pipewire-serial-N` or `pipewire-N`), empty = auto-select
    pub path: String,
    /// PipeWire node id
    pub node_id: Option<String>,
    /// Physical location, when the driver reports one
    pub location: CameraLocation,
}

impl CameraDevice {
    /// Device that lets PipeWire pick its default camera
    pub fn default_device() -> Self {
        Self {
            name: "Default Camera".to_string(),
            path: String::new(),
            node_id: None,
            location: CameraLocation::Unknown,
        }
    }

    /// Value for the pipewiresrc `target-object` property
    pub fn target_object(&self) -> Option<&str> {
        if let Some(serial) = self.path.strip_prefix("pipewire-serial-") {
            Some(serial)
        } else if let Some(id) = self.path.strip_prefix("pipewire-") {
            Some(id)
        } else {
            None
        }
    }
}

/// A single preview frame, tightly packed RGBA (stride = width * 4)
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

/// Receiver side of the preview frame channel
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// Sender side of the preview frame channel
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Camera backend errors
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for crate::errors::CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DeviceNotFound(_) => crate::errors::CameraError::NoCameraFound,
            BackendError::InitializationFailed(msg) => {
                crate::errors::CameraError::InitializationFailed(msg)
            }
            other => crate::errors::CameraError::BackendError(other.to_string()),
        }
    }
}
