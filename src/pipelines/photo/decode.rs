// SPDX-License-Identifier: GPL-3.0-only

//! Decoding captured stills for the filter preview

use crate::errors::PhotoError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A captured still decoded to RGBA
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// File the pixels were decoded from
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Downscaled copy whose longest side is at most `max_side`
    pub fn thumbnail(&self, max_side: u32) -> Option<DecodedImage> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.rgba.as_ref().clone())?;
        let longest = self.width.max(self.height).max(1);
        let scale = (max_side as f32 / longest as f32).min(1.0);
        let width = ((self.width as f32 * scale).round() as u32).max(1);
        let height = ((self.height as f32 * scale).round() as u32).max(1);

        let small = image::imageops::thumbnail(&image, width, height);
        Some(DecodedImage {
            source: self.source.clone(),
            width,
            height,
            rgba: Arc::new(small.into_raw()),
        })
    }
}

/// Decode the file at `path` on a blocking thread
pub async fn decode(path: PathBuf) -> Result<DecodedImage, PhotoError> {
    tokio::task::spawn_blocking(move || decode_blocking(&path))
        .await
        .map_err(|e| PhotoError::DecodeFailed(format!("Decode task error: {}", e)))?
}

/// Decode the file at `path`, applying any stored orientation
pub fn decode_blocking(path: &Path) -> Result<DecodedImage, PhotoError> {
    use image::ImageDecoder;

    let reader = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PhotoError::DecodeFailed(format!("{}: {}", path.display(), e)))?;
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| PhotoError::DecodeFailed(format!("{}: {}", path.display(), e)))?;
    let orientation = decoder
        .orientation()
        .unwrap_or(image::metadata::Orientation::NoTransforms);
    let mut image = image::DynamicImage::from_decoder(decoder)
        .map_err(|e| PhotoError::DecodeFailed(format!("{}: {}", path.display(), e)))?;
    image.apply_orientation(orientation);

    let rgba = image.into_rgba8();
    debug!(
        path = %path.display(),
        width = rgba.width(),
        height = rgba.height(),
        "Decoded capture"
    );

    Ok(DecodedImage {
        source: path.to_path_buf(),
        width: rgba.width(),
        height: rgba.height(),
        rgba: Arc::new(rgba.into_raw()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::encoding::PhotoEncoder;

    #[tokio::test]
    async fn test_decode_round_trip_dimensions() {
        let dir = std::env::temp_dir().join(format!("filter-camera-decode-{}", uuid::Uuid::new_v4()));
        let encoder = PhotoEncoder::default();
        let encoded = encoder.encode(vec![90u8; 6 * 3 * 4], 6, 3).await.unwrap();
        let path = encoder.save(encoded, dir.join("still.jpg")).await.unwrap();

        let decoded = decode(path.clone()).await.unwrap();
        assert_eq!((decoded.width, decoded.height), (6, 3));
        assert_eq!(decoded.rgba.len(), 6 * 3 * 4);
        assert_eq!(decoded.source, path);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_decode_garbage_fails() {
        let dir = std::env::temp_dir().join(format!("filter-camera-decode-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(decode(path).await, Err(PhotoError::DecodeFailed(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_thumbnail_keeps_aspect() {
        let image = DecodedImage {
            source: PathBuf::from("x.jpg"),
            width: 400,
            height: 200,
            rgba: Arc::new(vec![0u8; 400 * 200 * 4]),
        };
        let thumb = image.thumbnail(100).unwrap();
        assert_eq!((thumb.width, thumb.height), (100, 50));
        assert_eq!(thumb.rgba.len(), 100 * 50 * 4);
    }
}
