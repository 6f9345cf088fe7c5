// SPDX-License-Identifier: GPL-3.0-only

//! Storage locations for temporary captures and the photo library

use crate::constants::capture;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Directory holding captured stills until they are saved or discarded
pub fn capture_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(capture::TEMP_DIR_NAME)
        .join("captures")
}

/// Root of the photo library (XDG Pictures directory)
pub fn library_root() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| std::env::temp_dir().join("Pictures"))
}

/// Remove capture files last modified more than `max_age` ago
///
/// Returns how many files were removed. A missing directory is not an error.
pub fn prune_stale_captures(dir: &Path, max_age: Duration) -> std::io::Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();

        if age > max_age {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed stale capture");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove stale capture"),
            }
        }
    }

    if removed > 0 {
        info!(removed, dir = %dir.display(), "Pruned stale captures");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_missing_dir() {
        let dir = std::env::temp_dir().join(format!("filter-camera-missing-{}", uuid::Uuid::new_v4()));
        assert_eq!(prune_stale_captures(&dir, Duration::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_prune_respects_age() {
        let dir = std::env::temp_dir().join(format!("filter-camera-prune-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("a.jpg"), b"a").unwrap();
        std::fs::write(dir.join("b.jpg"), b"b").unwrap();

        // Fresh files survive a day-long threshold
        assert_eq!(prune_stale_captures(&dir, capture::STALE_CAPTURE_AGE).unwrap(), 0);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(prune_stale_captures(&dir, Duration::from_millis(1)).unwrap(), 2);
        // Directories are left alone
        assert!(dir.join("nested").is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
