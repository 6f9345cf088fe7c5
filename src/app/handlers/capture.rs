// SPDX-License-Identifier: GPL-3.0-only

//! Capture view handlers
//!
//! Handles live frames, flipping between cameras and the shutter.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::CameraFrame;
use crate::pipelines::photo::{CapturedImage, PhotoCapture, PhotoEncoder, decode};
use cosmic::Task;
use std::sync::Arc;
use tracing::{info, warn};

impl AppModel {
    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        self.camera_error = None;
        self.current_frame = Some(frame);
        Task::none()
    }

    pub(crate) fn handle_camera_unavailable(&mut self, error: String) -> Task<cosmic::Action<Message>> {
        self.camera_error = Some(error);
        self.current_frame = None;
        Task::none()
    }

    /// Toggle facing; the camera subscription restarts on the new key
    ///
    /// A capture in flight keeps the frame it already cloned.
    pub(crate) fn handle_flip_camera(&mut self) -> Task<cosmic::Action<Message>> {
        self.session.flip();
        self.current_frame = None;
        self.camera_error = None;
        Task::none()
    }

    /// Capture the current frame as a still
    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.session.begin_capture() {
            info!("Capture ignored while another operation is in flight");
            return Task::none();
        }

        let Some(frame) = self.current_frame.clone() else {
            info!("No frame available to capture");
            self.session
                .on_captured(Err(crate::errors::PhotoError::NoFrameAvailable.to_string()));
            return Task::none();
        };

        info!(width = frame.width, height = frame.height, "Capturing photo");
        let encoder = PhotoEncoder::new(self.config.effective_jpeg_quality());
        let output_dir = crate::storage::capture_dir();

        Task::perform(
            async move {
                PhotoCapture::capture_frame(&frame, &output_dir, encoder)
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::PhotoCaptured(result)),
        )
    }

    /// Store the capture and start decoding it for the filter preview
    pub(crate) fn handle_photo_captured(
        &mut self,
        result: Result<CapturedImage, String>,
    ) -> Task<cosmic::Action<Message>> {
        self.session.on_captured(result);

        let Some(captured) = self.session.captured.clone() else {
            return Task::none();
        };
        self.preview.reset(Some(captured.path.clone()));

        let source = captured.path;
        Task::perform(
            async move {
                let result = decode(source.clone()).await.map_err(|e| {
                    warn!(error = %e, "Decode failed");
                    e.to_string()
                });
                (source, result)
            },
            |(source, result)| cosmic::Action::App(Message::PhotoDecoded(source, result)),
        )
    }
}
