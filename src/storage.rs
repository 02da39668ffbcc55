// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for captured and cropped photos
//!
//! Captures and crops are working files, not a gallery: they live under the
//! user cache directory and are pruned once they are older than a day.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

const APP_DIR: &str = "capture-screen";

/// Root cache directory (~/.cache/capture-screen)
pub fn cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Directory receiving still frames from the camera
pub fn capture_directory() -> PathBuf {
    cache_root().join("captures")
}

/// Directory receiving crop results
pub fn crop_directory() -> PathBuf {
    cache_root().join("crops")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Timestamped file name for a new capture (IMG_20250101_120000_123.jpg)
pub fn new_capture_path(dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
    dir.join(format!("IMG_{}.jpg", timestamp))
}

/// Unique file name for a crop result
pub fn new_crop_path(dir: &Path) -> PathBuf {
    dir.join(format!("crop_{}.jpg", uuid::Uuid::new_v4().simple()))
}

/// Delete regular files in `dir` last modified more than `max_age` ago
///
/// Returns the number of files removed. A missing directory is not an error.
pub fn prune_stale_files(dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
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
                    debug!(path = %path.display(), "Removed stale cache file");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove stale file"),
            }
        }
    }

    removed
}

/// Create the cache directories and prune old working files
pub fn prepare_cache(max_age: Duration) {
    for dir in [capture_directory(), crop_directory()] {
        if let Err(e) = ensure_directory(&dir) {
            warn!(path = %dir.display(), error = %e, "Failed to create cache directory");
            continue;
        }
        let removed = prune_stale_files(&dir, max_age);
        if removed > 0 {
            info!(path = %dir.display(), removed, "Pruned stale working files");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_names_are_jpeg() {
        let path = new_capture_path(Path::new("/tmp"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("IMG_"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn test_crop_names_are_unique() {
        let a = new_crop_path(Path::new("/tmp"));
        let b = new_crop_path(Path::new("/tmp"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_prune_keeps_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fresh.jpg"), b"x").unwrap();
        assert_eq!(prune_stale_files(dir.path(), Duration::from_secs(3600)), 0);
        assert!(dir.path().join("fresh.jpg").exists());
    }

    #[test]
    fn test_prune_missing_directory() {
        assert_eq!(
            prune_stale_files(Path::new("/nonexistent/capture-screen"), Duration::ZERO),
            0
        );
    }
}
