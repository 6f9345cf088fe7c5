// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the capture → preview → save flow

use filter_camera::backends::camera::types::CameraFrame;
use filter_camera::backends::media_library::{DirectoryLibrary, MediaLibrary};
use filter_camera::filters::FilterType;
use filter_camera::pipelines::photo::{
    PhotoCapture, PhotoEncoder, SaveRequest, decode, filter_image, save_to_library,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "filter-camera-it-{}-{}",
        label,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn gradient_frame(width: u32, height: u32) -> CameraFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, 128, 255]);
        }
    }
    CameraFrame {
        width,
        height,
        data: Arc::from(data),
        captured_at: Instant::now(),
    }
}

#[tokio::test]
async fn test_capture_preview_and_save_twice() {
    let dir = scratch_dir("flow");
    let encoder = PhotoEncoder::default();

    let captured = PhotoCapture::capture_frame(&gradient_frame(16, 12), &dir.join("tmp"), encoder)
        .await
        .unwrap();

    let decoded = decode(captured.path.clone()).await.unwrap();
    assert_eq!((decoded.width, decoded.height), (16, 12));

    let sepia = filter_image(&decoded, FilterType::Sepia).await;
    assert_eq!(sepia.rgba.len(), decoded.rgba.len());
    assert_ne!(sepia.rgba, decoded.rgba);

    let library: Arc<dyn MediaLibrary> = Arc::new(DirectoryLibrary::new(dir.join("Pictures")));

    let first = save_to_library(
        library.clone(),
        SaveRequest {
            captured: captured.clone(),
            album: "Camera App".to_string(),
            filter: FilterType::Sepia,
            bake_filter: false,
            encoder,
        },
    )
    .await
    .unwrap();
    assert_eq!(first.album.name, "Camera App");
    assert_eq!(first.baked, None);

    // Same album is appended to, not recreated
    let second = save_to_library(
        library,
        SaveRequest {
            captured,
            album: "Camera App".to_string(),
            filter: FilterType::Grayscale,
            bake_filter: true,
            encoder,
        },
    )
    .await
    .unwrap();
    assert_eq!(second.album.path, first.album.path);
    assert_eq!(second.baked, Some(FilterType::Grayscale));

    let count = std::fs::read_dir(&second.album.path).unwrap().count();
    assert_eq!(count, 2);

    let _ = std::fs::remove_dir_all(&dir);
}
