// SPDX-License-Identifier: GPL-3.0-only

//! Importing captured stills into the media library

use super::capture::{CapturedImage, capture_path};
use super::decode::decode;
use super::encoding::PhotoEncoder;
use super::processing::filter_image;
use crate::backends::media_library::{Album, MediaLibrary};
use crate::errors::PhotoError;
use crate::filters::FilterType;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What to save and where
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub captured: CapturedImage,
    pub album: String,
    pub filter: FilterType,
    /// Write the filtered pixels instead of the original capture
    pub bake_filter: bool,
    pub encoder: PhotoEncoder,
}

/// Result of a successful save
#[derive(Debug, Clone)]
pub struct SavedPhoto {
    pub album: Album,
    /// Filter baked into the stored file, if any
    pub baked: Option<FilterType>,
}

/// Create an asset from the capture and file it into the requested album
///
/// The album is created on first save and appended to afterwards.
pub async fn save_to_library(
    library: Arc<dyn MediaLibrary>,
    request: SaveRequest,
) -> Result<SavedPhoto, PhotoError> {
    let bake = request.bake_filter && request.filter != FilterType::Normal;

    let source = if bake {
        bake_filter(&request.captured, request.filter, request.encoder).await?
    } else {
        request.captured.path.clone()
    };

    let album_name = request.album.clone();
    let asset_source = source.clone();
    let result = tokio::task::spawn_blocking(move || {
        let asset = library.create_asset(&asset_source)?;
        library.save_to_album(&album_name, &asset)
    })
    .await
    .map_err(|e| PhotoError::SaveFailed(format!("Save task error: {}", e)))?;

    if bake && let Err(e) = tokio::fs::remove_file(&source).await {
        warn!(path = %source.display(), error = %e, "Failed to remove baked temporary");
    }

    let album = result?;
    info!(
        album = %album.name,
        filter = %request.filter,
        baked = bake,
        "Photo saved to album"
    );

    Ok(SavedPhoto {
        album,
        baked: bake.then_some(request.filter),
    })
}

/// Re-encode the capture with `filter` applied, next to the original
async fn bake_filter(
    captured: &CapturedImage,
    filter: FilterType,
    encoder: PhotoEncoder,
) -> Result<PathBuf, PhotoError> {
    let decoded = decode(captured.path.clone()).await?;
    let filtered = filter_image(&decoded, filter).await;
    let rgba = Arc::try_unwrap(filtered.rgba).unwrap_or_else(|shared| shared.as_ref().clone());

    let encoded = encoder.encode(rgba, filtered.width, filtered.height).await?;
    let dir = captured
        .path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let path = encoder.save(encoded, capture_path(&dir)).await?;

    debug!(path = %path.display(), %filter, "Baked filter into temporary");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::media_library::DirectoryLibrary;

    struct Workspace {
        dir: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("filter-camera-save-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        async fn capture(&self) -> CapturedImage {
            let encoder = PhotoEncoder::default();
            let encoded = encoder.encode(vec![180u8; 8 * 8 * 4], 8, 8).await.unwrap();
            let path = encoder
                .save(encoded, capture_path(&self.dir.join("captures")))
                .await
                .unwrap();
            CapturedImage { path }
        }

        fn library(&self) -> Arc<dyn MediaLibrary> {
            Arc::new(DirectoryLibrary::new(self.dir.join("Pictures")))
        }
    }

    impl Drop for Workspace {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    fn album_files(album: &Album) -> Vec<PathBuf> {
        std::fs::read_dir(&album.path)
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .collect()
    }

    #[tokio::test]
    async fn test_first_save_creates_album_second_appends() {
        let workspace = Workspace::new();
        let library = workspace.library();

        let request = SaveRequest {
            captured: workspace.capture().await,
            album: "Camera App".to_string(),
            filter: FilterType::Sepia,
            bake_filter: false,
            encoder: PhotoEncoder::default(),
        };
        let first = save_to_library(library.clone(), request.clone()).await.unwrap();
        assert_eq!(first.album.name, "Camera App");
        assert_eq!(first.baked, None);
        assert_eq!(album_files(&first.album).len(), 1);

        let second = save_to_library(library, request).await.unwrap();
        assert_eq!(second.album.path, first.album.path);
        assert_eq!(album_files(&second.album).len(), 2);
    }

    #[tokio::test]
    async fn test_baked_save_removes_temporary() {
        let workspace = Workspace::new();
        let captured = workspace.capture().await;

        let saved = save_to_library(
            workspace.library(),
            SaveRequest {
                captured: captured.clone(),
                album: "Camera App".to_string(),
                filter: FilterType::Grayscale,
                bake_filter: true,
                encoder: PhotoEncoder::default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(saved.baked, Some(FilterType::Grayscale));
        // Only the original capture remains in the temporary directory
        let leftovers: Vec<_> = std::fs::read_dir(workspace.dir.join("captures"))
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .collect();
        assert_eq!(leftovers, vec![captured.path]);
    }

    #[tokio::test]
    async fn test_missing_capture_fails() {
        let workspace = Workspace::new();
        let result = save_to_library(
            workspace.library(),
            SaveRequest {
                captured: CapturedImage {
                    path: workspace.dir.join("gone.jpg"),
                },
                album: "Camera App".to_string(),
                filter: FilterType::Normal,
                bake_filter: false,
                encoder: PhotoEncoder::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(PhotoError::SaveFailed(_))));
    }
}
