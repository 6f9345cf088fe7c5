// SPDX-License-Identifier: GPL-3.0-only

//! Filter application for captured stills
//!
//! Filters run on the GPU compute pipeline when an adapter is available and
//! fall back to the CPU color matrix otherwise. Both paths produce the same
//! output within rounding.

use super::decode::DecodedImage;
use crate::filters::{FilterType, apply_filter_cpu};
use crate::shaders::apply_filter_gpu_rgba;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Apply `filter` to tightly packed RGBA pixels
pub async fn apply_filter(rgba: &[u8], width: u32, height: u32, filter: FilterType) -> Vec<u8> {
    if filter == FilterType::Normal {
        return rgba.to_vec();
    }

    match apply_filter_gpu_rgba(rgba, width, height, filter).await {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, %filter, "GPU filter unavailable, using CPU");
            apply_filter_cpu(rgba, filter)
        }
    }
}

/// Apply `filter` to a decoded still
pub async fn filter_image(image: &DecodedImage, filter: FilterType) -> DecodedImage {
    let rgba = apply_filter(&image.rgba, image.width, image.height, filter).await;
    DecodedImage {
        source: image.source.clone(),
        width: image.width,
        height: image.height,
        rgba: Arc::new(rgba),
    }
}

/// Thumbnail of `image` rendered with every filter
///
/// Thumbnails are small, so they are rendered on the CPU.
pub async fn render_filter_thumbnails(
    image: DecodedImage,
    max_side: u32,
) -> HashMap<FilterType, DecodedImage> {
    let rendered = tokio::task::spawn_blocking(move || {
        let Some(thumbnail) = image.thumbnail(max_side) else {
            return HashMap::new();
        };
        FilterType::ALL
            .iter()
            .map(|&filter| {
                let rgba = apply_filter_cpu(&thumbnail.rgba, filter);
                (
                    filter,
                    DecodedImage {
                        source: thumbnail.source.clone(),
                        width: thumbnail.width,
                        height: thumbnail.height,
                        rgba: Arc::new(rgba),
                    },
                )
            })
            .collect::<HashMap<_, _>>()
    })
    .await;

    match rendered {
        Ok(thumbnails) => {
            debug!(count = thumbnails.len(), "Rendered filter thumbnails");
            thumbnails
        }
        Err(e) => {
            warn!(error = %e, "Thumbnail task failed");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            source: PathBuf::from("still.jpg"),
            width,
            height,
            rgba: Arc::new(vec![200u8; (width * height * 4) as usize]),
        }
    }

    #[tokio::test]
    async fn test_normal_passes_through() {
        let input = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(apply_filter(&input, 2, 1, FilterType::Normal).await, input);
    }

    #[tokio::test]
    async fn test_grayscale_matches_cpu_within_rounding() {
        let source = image(8, 8);
        let filtered = filter_image(&source, FilterType::Grayscale).await;
        let expected = apply_filter_cpu(&source.rgba, FilterType::Grayscale);

        assert_eq!(filtered.rgba.len(), expected.len());
        for (a, b) in filtered.rgba.iter().zip(expected.iter()) {
            assert!(a.abs_diff(*b) <= 1);
        }
        assert_eq!(filtered.source, source.source);
    }

    #[tokio::test]
    async fn test_thumbnails_for_every_filter() {
        let thumbnails = render_filter_thumbnails(image(64, 32), 16).await;
        assert_eq!(thumbnails.len(), FilterType::ALL.len());
        let normal = &thumbnails[&FilterType::Normal];
        assert_eq!((normal.width, normal.height), (16, 8));
    }
}
