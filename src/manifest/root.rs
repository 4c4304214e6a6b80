//! Locating project roots by walking up to the nearest `package.json`.

use std::path::{Path, PathBuf};

use super::ManifestError;
use crate::constants::MANIFEST_FILE;
use crate::utils::platform::normalize_path;

/// Walk upward from `start` to the nearest directory containing a manifest
///
/// `start` is made absolute and `..` segments are folded before the walk, so
/// `host/..` starts at the parent of `host`. `start` itself is checked first.
///
/// # Errors
///
/// [`ManifestError::NotFound`] when no ancestor holds a manifest.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ManifestError> {
    let start = normalize_path(start).map_err(|_| ManifestError::NotFound)?;

    let found = start.ancestors().find(|dir| dir.join(MANIFEST_FILE).is_file());
    match found {
        Some(root) => {
            tracing::trace!("Found project root at {}", root.display());
            Ok(root.to_path_buf())
        }
        None => Err(ManifestError::NotFound),
    }
}

/// Turn a user-supplied path into the directory the root search starts from
///
/// Files start from their parent directory.
///
/// # Errors
///
/// [`ManifestError::PathDoesNotExist`] when nothing exists at `input`.
pub async fn resolve_start_dir(input: &Path) -> Result<PathBuf, ManifestError> {
    let normalized = normalize_path(input).map_err(|_| ManifestError::PathDoesNotExist)?;

    let metadata =
        tokio::fs::metadata(&normalized).await.map_err(|_| ManifestError::PathDoesNotExist)?;

    if metadata.is_dir() {
        Ok(normalized)
    } else {
        Ok(normalized.parent().map_or_else(|| normalized.clone(), Path::to_path_buf))
    }
}
