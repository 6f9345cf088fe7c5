// SPDX-License-Identifier: GPL-3.0-only

//! Still capture from preview frames
//!
//! A capture writes the current preview frame to a temporary JPEG in the
//! capture directory. The resulting [`CapturedImage`] is what the filter
//! preview decodes and what the save step imports into the library.

use super::encoding::PhotoEncoder;
use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A still written to temporary storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapturedImage {
    pub path: PathBuf,
}

/// Photo capture handler
pub struct PhotoCapture;

impl PhotoCapture {
    /// Encode `frame` and write it into `output_dir`
    ///
    /// The horizontal mirroring applied to the front camera preview is a
    /// display concern only; the stored still is never mirrored.
    pub async fn capture_frame(
        frame: &CameraFrame,
        output_dir: &Path,
        encoder: PhotoEncoder,
    ) -> Result<CapturedImage, PhotoError> {
        let expected = frame.width as usize * frame.height as usize * 4;
        if frame.width == 0 || frame.height == 0 || frame.data.len() < expected {
            return Err(PhotoError::CaptureFailed(format!(
                "Frame {}x{} carries {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            )));
        }

        debug!(
            width = frame.width,
            height = frame.height,
            age_ms = frame.captured_at.elapsed().as_millis() as u64,
            "Capturing frame"
        );

        let rgba = frame.data[..expected].to_vec();
        let encoded = encoder.encode(rgba, frame.width, frame.height).await?;
        let path = encoder.save(encoded, capture_path(output_dir)).await?;

        info!(path = %path.display(), "Still captured");
        Ok(CapturedImage { path })
    }
}

/// Fresh temporary file name in `dir`
pub fn capture_path(dir: &Path) -> PathBuf {
    dir.join(format!("capture_{}.jpg", uuid::Uuid::new_v4().simple()))
}
