// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a filtered photo without the GUI
//! - Sending a push message to a running instance
//! - Printing this installation's push token

use chrono::Local;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use filter_camera::backends::camera::pipewire::{PreviewPipeline, enumerate_pipewire_cameras};
use filter_camera::backends::camera::types::CameraFrame;
use filter_camera::backends::camera::{CameraDevice, Facing, select_device};
use filter_camera::backends::media_library::DirectoryLibrary;
use filter_camera::backends::push::{self, RemoteMessage};
use filter_camera::config::Config;
use filter_camera::constants::{app_info, capture, pipeline};
use filter_camera::filters::FilterType;
use filter_camera::pipelines::photo::{
    CapturedImage, PhotoCapture, PhotoEncoder, SaveRequest, apply_filter, save_to_library,
};
use filter_camera::storage;
use futures::StreamExt;
use futures::channel::mpsc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Frames arriving before this are treated as sensor warm-up
const WARMUP: Duration = Duration::from_millis(500);

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_pipewire_cameras().unwrap_or_default();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let back = select_device(&cameras, Facing::Back).map(|c| c.path.clone());
    let front = select_device(&cameras, Facing::Front).map(|c| c.path.clone());

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        let mut roles = Vec::new();
        if back.as_deref() == Some(camera.path.as_str()) {
            roles.push("back");
        }
        if front.as_deref() == Some(camera.path.as_str()) {
            roles.push("front");
        }

        if roles.is_empty() {
            println!("  [{}] {}", index, camera.name);
        } else {
            println!("  [{}] {} ({})", index, camera.name, roles.join(", "));
        }
        println!("      Path: {}", camera.path);
    }

    Ok(())
}

/// Take a photo with the camera facing `facing` and apply `filter`
///
/// With `output` the JPEG is written there (a directory gets a timestamped
/// file name). Without it the photo is filed into `album`, or the configured
/// album when none is given.
pub fn take_photo(
    facing: Facing,
    filter: FilterType,
    output: Option<PathBuf>,
    album: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_pipewire_cameras().unwrap_or_default();
    let camera = select_device(&cameras, facing)
        .ok_or_else(|| format!("No {} camera found", facing))?
        .clone();
    println!("Using camera: {}", camera.name);

    let config = load_config();
    let encoder = PhotoEncoder::new(config.effective_jpeg_quality());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        println!("Capturing...");
        let frame = first_frame(&camera).await?;
        println!("Captured {}x{} ({})", frame.width, frame.height, filter);

        let pixels = apply_filter(&frame.data, frame.width, frame.height, filter).await;
        let filtered = CameraFrame {
            data: Arc::from(pixels),
            ..frame
        };

        match output {
            Some(path) => {
                let target = output_path(&path);
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let encoded = encoder
                    .encode(filtered.data.to_vec(), filtered.width, filtered.height)
                    .await?;
                let saved = encoder.save(encoded, target).await?;
                println!("Photo saved: {}", saved.display());
            }
            None => {
                let capture_dir = storage::capture_dir();
                let CapturedImage { path } =
                    PhotoCapture::capture_frame(&filtered, &capture_dir, encoder).await?;

                let album = album.unwrap_or_else(|| config.effective_album_name().to_string());
                let library = Arc::new(DirectoryLibrary::new(storage::library_root()));
                let saved = save_to_library(
                    library,
                    SaveRequest {
                        captured: CapturedImage { path },
                        album,
                        filter,
                        // Pixels were filtered before encoding
                        bake_filter: false,
                        encoder,
                    },
                )
                .await?;
                println!(
                    "Photo saved to album '{}': {}",
                    saved.album.name,
                    saved.album.path.display()
                );
            }
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Deliver a message to a running instance through the push interface
pub fn push(
    title: Option<String>,
    body: Option<String>,
    data: Vec<(String, String)>,
    token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let token = match token {
            Some(token) => token,
            None => push::load_or_create_token(&push::default_token_path()).await?,
        };

        let message = RemoteMessage {
            title,
            body,
            data: data.into_iter().collect::<HashMap<_, _>>(),
        };
        push::deliver(&token, &message).await?;
        println!("Message delivered to {}", app_info::APP_NAME);

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Print the push token of this installation
pub fn token() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let token = rt.block_on(push::load_or_create_token(&push::default_token_path()))?;
    println!("{}", token);
    Ok(())
}

/// Parse a `key=value` pair for `push --data`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Run a preview on `camera` and return the first frame after warm-up
///
/// Falls back to the last frame seen if warm-up outlasts the timeout.
async fn first_frame(
    camera: &CameraDevice,
) -> Result<CameraFrame, Box<dyn std::error::Error>> {
    let (sender, mut receiver) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    let preview = PreviewPipeline::new(camera, sender)?;

    let start = Instant::now();
    let mut frame: Option<CameraFrame> = None;

    while start.elapsed() < capture::FIRST_FRAME_TIMEOUT {
        let remaining = capture::FIRST_FRAME_TIMEOUT.saturating_sub(start.elapsed());
        match tokio::time::timeout(remaining, receiver.next()).await {
            Ok(Some(f)) => {
                frame = Some(f);
                if start.elapsed() > WARMUP {
                    break;
                }
            }
            Ok(None) | Err(_) => break,
        }
    }

    if let Err(e) = preview.stop() {
        tracing::warn!(error = %e, "Failed to stop preview cleanly");
    }

    frame.ok_or_else(|| "Failed to capture frame from camera".into())
}

/// Resolve `--output`: directories get a timestamped file name
fn output_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        path.join(format!("photo_{}.jpg", timestamp))
    } else {
        path.to_path_buf()
    }
}

fn load_config() -> Config {
    match cosmic_config::Config::new(app_info::APP_ID, Config::VERSION) {
        Ok(handler) => Config::get_entry(&handler).unwrap_or_else(|(errors, config)| {
            tracing::warn!(?errors, "Errors loading config");
            config
        }),
        Err(err) => {
            tracing::warn!(%err, "Failed to open config, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("kind=album"),
            Ok(("kind".to_string(), "album".to_string()))
        );
        assert_eq!(
            parse_key_value("url=a=b"),
            Ok(("url".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_output_path_for_file_is_unchanged() {
        let path = PathBuf::from("/nonexistent/dir/shot.jpg");
        assert_eq!(output_path(&path), path);
    }

    #[test]
    fn test_output_path_for_directory_is_timestamped() {
        let dir = std::env::temp_dir();
        let path = output_path(&dir);
        assert_eq!(path.parent(), Some(dir.as_path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("photo_"));
        assert!(name.ends_with(".jpg"));
    }
}
