// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of RGBA stills

use crate::errors::PhotoError;
use image::RgbImage;
use std::path::PathBuf;
use tracing::{debug, info};

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder with the given JPEG quality (1-100)
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode tightly packed RGBA pixels on a blocking thread
    pub async fn encode(
        &self,
        rgba: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<EncodedImage, PhotoError> {
        let quality = self.quality;
        tokio::task::spawn_blocking(move || Self::encode_rgba(&rgba, width, height, quality))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Encode tightly packed RGBA pixels as JPEG (alpha is dropped)
    pub fn encode_rgba(
        rgba: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<EncodedImage, PhotoError> {
        let rgb: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect();
        let image = RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
            PhotoError::EncodingFailed(format!(
                "Buffer of {} bytes does not match {}x{}",
                rgba.len(),
                width,
                height
            ))
        })?;

        let mut data = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut data, quality);
        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        debug!(size = data.len(), width, height, "Encoding complete");
        Ok(EncodedImage {
            data,
            width,
            height,
        })
    }

    /// Write encoded data to `path`
    pub async fn save(&self, encoded: EncodedImage, path: PathBuf) -> Result<PathBuf, PhotoError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &encoded.data).await?;

        info!(
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            "Photo written"
        );
        Ok(path)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(crate::constants::capture::DEFAULT_JPEG_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_jpeg() {
        let rgba = vec![200u8; 8 * 4 * 4];
        let encoded = PhotoEncoder::encode_rgba(&rgba, 8, 4, 90).unwrap();
        // JPEG SOI marker
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width, encoded.height), (8, 4));
    }

    #[test]
    fn test_encode_rejects_mismatched_buffer() {
        let result = PhotoEncoder::encode_rgba(&[0u8; 12], 2, 2, 90);
        assert!(matches!(result, Err(PhotoError::EncodingFailed(_))));
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(PhotoEncoder::new(0).quality(), 1);
        assert_eq!(PhotoEncoder::new(255).quality(), 100);
    }
}
