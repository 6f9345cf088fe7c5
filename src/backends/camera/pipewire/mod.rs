// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera backend
//!
//! Uses PipeWire for enumeration and a GStreamer pipewiresrc pipeline for
//! the live preview.

mod enumeration;
mod pipeline;

pub use enumeration::{enumerate_pipewire_cameras, is_pipewire_available, select_device};
pub use pipeline::PreviewPipeline;

use super::CameraBackend;
use super::types::*;
use tracing::info;

/// PipeWire backend implementation
#[derive(Default)]
pub struct PipeWireBackend {
    /// Device the preview is running on
    current_device: Option<CameraDevice>,
    /// Active preview pipeline
    pipeline: Option<PreviewPipeline>,
}

impl PipeWireBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let cameras = enumerate_pipewire_cameras().unwrap_or_default();
        info!(count = cameras.len(), "PipeWire cameras enumerated");
        cameras
    }

    fn is_available(&self) -> bool {
        is_pipewire_available()
    }

    fn start_preview(&mut self, device: &CameraDevice, sender: FrameSender) -> BackendResult<()> {
        if self.pipeline.is_some() {
            self.stop_preview()?;
        }

        let pipeline = PreviewPipeline::new(device, sender)?;
        self.pipeline = Some(pipeline);
        self.current_device = Some(device.clone());

        info!(device = %device.name, "Preview started");
        Ok(())
    }

    fn stop_preview(&mut self) -> BackendResult<()> {
        self.current_device = None;
        match self.pipeline.take() {
            Some(pipeline) => pipeline.stop(),
            None => Ok(()),
        }
    }

    fn current_device(&self) -> Option<&CameraDevice> {
        self.current_device.as_ref()
    }
}
