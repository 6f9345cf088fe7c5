// SPDX-License-Identifier: GPL-3.0-only

//! Photo library persistence
//!
//! The desktop library is a directory tree: assets are files in the library
//! root, albums are sub-directories holding the assets filed into them.

use crate::constants::library;
use crate::errors::LibraryError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A photo stored in the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// File name, unique within the library root
    pub id: String,
    /// Current location on disk
    pub path: PathBuf,
}

/// A named album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub name: String,
    pub path: PathBuf,
}

/// Media library operations
///
/// Implementations do blocking I/O; call them from `spawn_blocking`.
pub trait MediaLibrary: Send + Sync {
    /// Import an image file into the library
    fn create_asset(&self, source: &Path) -> Result<Asset, LibraryError>;

    /// Look up an album by name
    fn album(&self, name: &str) -> Result<Option<Album>, LibraryError>;

    /// Create an album and file `asset` into it (moved unless `copy`)
    ///
    /// If the album already exists the asset is appended to it.
    fn create_album(&self, name: &str, asset: &Asset, copy: bool) -> Result<Album, LibraryError>;

    /// File `asset` into an existing album (moved unless `copy`)
    fn add_to_album(&self, album: &Album, asset: &Asset, copy: bool)
    -> Result<Asset, LibraryError>;

    /// File `asset` into the album `name`, creating the album when absent
    fn save_to_album(&self, name: &str, asset: &Asset) -> Result<Album, LibraryError> {
        match self.album(name)? {
            Some(album) => {
                self.add_to_album(&album, asset, false)?;
                Ok(album)
            }
            None => self.create_album(name, asset, false),
        }
    }
}

/// Directory-backed media library
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn album_path(&self, name: &str) -> Result<PathBuf, LibraryError> {
        validate_album_name(name)?;
        Ok(self.root.join(name.trim()))
    }

    fn file_into(&self, dir: &Path, asset: &Asset, copy: bool) -> Result<Asset, LibraryError> {
        if !asset.path.is_file() {
            return Err(LibraryError::AssetNotFound(asset.id.clone()));
        }

        let target = unique_path(dir, &asset.id);
        if copy {
            std::fs::copy(&asset.path, &target)?;
        } else {
            move_file(&asset.path, &target)?;
        }

        debug!(from = %asset.path.display(), to = %target.display(), copy, "Asset filed");
        Ok(Asset {
            id: file_name(&target),
            path: target,
        })
    }
}

impl MediaLibrary for DirectoryLibrary {
    fn create_asset(&self, source: &Path) -> Result<Asset, LibraryError> {
        if !source.is_file() {
            return Err(LibraryError::AssetNotFound(source.display().to_string()));
        }

        std::fs::create_dir_all(&self.root)?;

        let extension = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        let name = format!(
            "{}_{}.{}",
            library::ASSET_PREFIX,
            chrono::Local::now().format("%Y%m%d_%H%M%S_%3f"),
            extension
        );
        let target = unique_path(&self.root, &name);
        std::fs::copy(source, &target)?;

        info!(path = %target.display(), "Asset created");
        Ok(Asset {
            id: file_name(&target),
            path: target,
        })
    }

    fn album(&self, name: &str) -> Result<Option<Album>, LibraryError> {
        let path = self.album_path(name)?;
        Ok(path.is_dir().then(|| Album {
            name: name.trim().to_string(),
            path,
        }))
    }

    fn create_album(&self, name: &str, asset: &Asset, copy: bool) -> Result<Album, LibraryError> {
        let path = self.album_path(name)?;
        std::fs::create_dir_all(&path)?;

        let album = Album {
            name: name.trim().to_string(),
            path,
        };
        self.file_into(&album.path, asset, copy)?;

        info!(album = %album.name, "Album created");
        Ok(album)
    }

    fn add_to_album(
        &self,
        album: &Album,
        asset: &Asset,
        copy: bool,
    ) -> Result<Asset, LibraryError> {
        self.file_into(&album.path, asset, copy)
    }
}

/// Album names become directory names
pub fn validate_album_name(name: &str) -> Result<(), LibraryError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed
            .chars()
            .any(|c| library::FORBIDDEN_ALBUM_CHARS.contains(&c))
    {
        return Err(LibraryError::InvalidAlbumName(name.to_string()));
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `dir/name`, or `dir/stem_N.ext` for the first N that does not exist
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1u32..)
        .map(|n| dir.join(format!("{}_{}{}", stem, n, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Rename, falling back to copy + remove across filesystems
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
    }
}
