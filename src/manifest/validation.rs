//! Validation of the linked module's manifest and of host eligibility.

use std::path::{Path, PathBuf};

use super::{ManifestError, PackageManifest, RepoOwner, find_project_root, read_manifest, resolve_start_dir};
use crate::constants::{NGX_PACKAGE_NAME, REPO_OWNER};

/// Check that a manifest belongs to the linked module
///
/// The owner check accepts a `repoOwner` string equal to [`REPO_OWNER`] or a
/// list containing it anywhere.
///
/// # Errors
///
/// [`ManifestError::NameMismatch`], [`ManifestError::OwnerMissing`] or
/// [`ManifestError::OwnerMismatch`].
pub fn validate_ngx_manifest(manifest: &PackageManifest) -> Result<(), ManifestError> {
    if manifest.name.as_deref() != Some(NGX_PACKAGE_NAME) {
        return Err(ManifestError::NameMismatch {
            actual: manifest.name.clone().unwrap_or_else(|| "undefined".to_string()),
            expected: NGX_PACKAGE_NAME.to_string(),
        });
    }

    if manifest.repo_owner.contains(REPO_OWNER) {
        return Ok(());
    }

    match &manifest.repo_owner {
        RepoOwner::Single(actual) => Err(ManifestError::OwnerMismatch {
            actual: actual.clone(),
            expected: REPO_OWNER.to_string(),
        }),
        RepoOwner::List(actual) if !actual.is_empty() => Err(ManifestError::OwnerMismatch {
            actual: actual.join(", "),
            expected: REPO_OWNER.to_string(),
        }),
        _ => Err(ManifestError::OwnerMissing {
            expected: REPO_OWNER.to_string(),
        }),
    }
}

/// Resolve a user-supplied path to a validated linked-module root
///
/// The path may point anywhere inside the checkout; the nearest enclosing
/// `package.json` decides.
///
/// # Errors
///
/// The first [`ManifestError`] hit along the way.
pub async fn validate_ngx_path(input: &Path) -> Result<PathBuf, ManifestError> {
    let start = resolve_start_dir(input).await?;
    let root = find_project_root(&start)?;
    let manifest = read_manifest(&root).await?;
    validate_ngx_manifest(&manifest)?;

    tracing::debug!("Validated ngx module root at {}", root.display());
    Ok(root)
}

/// True when `root` is itself a checkout of the linked module
pub async fn is_ngx_project(root: &Path) -> bool {
    match read_manifest(root).await {
        Ok(manifest) => validate_ngx_manifest(&manifest).is_ok(),
        Err(_) => false,
    }
}

/// True when the host project may use the linker
///
/// The manifest `name` must be on `allowed` and `repoOwner` must be, or
/// contain, [`REPO_OWNER`]. Unreadable or malformed manifests are ineligible.
pub async fn is_eligible_project(root: &Path, allowed: &[String]) -> bool {
    let manifest = match read_manifest(root).await {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::debug!("{} is not eligible: {}", root.display(), e);
            return false;
        }
    };

    let name_allowed =
        manifest.name.as_ref().is_some_and(|name| allowed.iter().any(|allowed| allowed == name));

    name_allowed && manifest.repo_owner.contains(REPO_OWNER)
}
