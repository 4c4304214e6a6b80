//! Reading and validating `package.json` manifests.
//!
//! The linker never writes a manifest. It reads two fields, `name` and
//! `repoOwner`, to answer three questions:
//!
//! - where is the project root for a given path ([`find_project_root`])
//! - is a directory a checkout of the linked module ([`validate_ngx_path`])
//! - may the host project use the linker at all ([`is_eligible_project`])
//!
//! Malformed manifests are an everyday occurrence (half-finished edits, wrong
//! folder picked in a dialog), so every check returns a typed
//! [`ManifestError`] whose `Display` is the exact message shown to the user.

mod root;
mod validation;

pub use root::{find_project_root, resolve_start_dir};
pub use validation::{
    is_eligible_project, is_ngx_project, validate_ngx_manifest, validate_ngx_path,
};

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::constants::MANIFEST_FILE;

/// Why a path or manifest was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// The selected path does not exist on disk
    #[error("Selected path does not exist.")]
    PathDoesNotExist,

    /// No ancestor of the selected path contains a manifest
    #[error("Could not find a package.json in the selected path or any of its parent folders.")]
    NotFound,

    /// The manifest exists but could not be read
    #[error("Failed to read package.json in the detected project root.")]
    ReadFailed,

    /// The manifest is not valid JSON
    #[error("package.json in the detected project root is not valid JSON.")]
    InvalidJson,

    /// The manifest belongs to a different package
    #[error("package.json name is \"{actual}\", expected \"{expected}\".")]
    NameMismatch {
        /// Declared name, `undefined` when absent
        actual: String,
        /// Required name
        expected: String,
    },

    /// `repoOwner` is absent or empty
    #[error("the repoOwner in package.json is missing, expected \"{expected}\".")]
    OwnerMissing {
        /// Required owner tag
        expected: String,
    },

    /// `repoOwner` is present but names someone else
    #[error("the repoOwner in package.json is \"{actual}\", expected \"{expected}\".")]
    OwnerMismatch {
        /// Declared owner(s)
        actual: String,
        /// Required owner tag
        expected: String,
    },
}

/// Shape of the `repoOwner` field
///
/// Older manifests carry a single string, newer ones a list of owner tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RepoOwner {
    /// Field absent or `null`
    #[default]
    Missing,
    /// `"repoOwner": "@org/team"`
    Single(String),
    /// `"repoOwner": ["@org/team", ...]`, non-string entries dropped
    List(Vec<String>),
    /// Any other JSON type
    Unsupported,
}

impl RepoOwner {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(owner)) => Self::Single(owner.clone()),
            Some(Value::Array(items)) => Self::List(
                items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
            ),
            Some(_) => Self::Unsupported,
        }
    }

    /// True when the field is, or contains, `owner`
    #[must_use]
    pub fn contains(&self, owner: &str) -> bool {
        match self {
            Self::Single(value) => value == owner,
            Self::List(values) => values.iter().any(|value| value == owner),
            Self::Missing | Self::Unsupported => false,
        }
    }
}

/// The two manifest fields the linker consults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    /// `name`, if present and a string
    pub name: Option<String>,
    /// `repoOwner`
    pub repo_owner: RepoOwner,
}

impl PackageManifest {
    /// Parse manifest text, keeping only `name` and `repoOwner`
    ///
    /// # Errors
    ///
    /// [`ManifestError::InvalidJson`] when the text is not JSON.
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| ManifestError::InvalidJson)?;

        Ok(Self {
            name: value.get("name").and_then(Value::as_str).map(str::to_string),
            repo_owner: RepoOwner::from_value(value.get("repoOwner")),
        })
    }
}

/// Read and parse `<root>/package.json`
///
/// # Errors
///
/// [`ManifestError::ReadFailed`] or [`ManifestError::InvalidJson`].
pub async fn read_manifest(root: &Path) -> Result<PackageManifest, ManifestError> {
    let path = root.join(MANIFEST_FILE);
    let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::debug!("Cannot read {}: {}", path.display(), e);
        ManifestError::ReadFailed
    })?;

    PackageManifest::parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_single_owner() {
        let manifest =
            PackageManifest::parse(r#"{"name": "account", "repoOwner": "@org/team"}"#).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("account"));
        assert_eq!(manifest.repo_owner, RepoOwner::Single("@org/team".to_string()));
        assert!(manifest.repo_owner.contains("@org/team"));
    }

    #[test]
    fn test_parse_owner_list_skips_non_strings() {
        let manifest =
            PackageManifest::parse(r#"{"repoOwner": [1, "@a/b", null, "@c/d"]}"#).unwrap();
        assert_eq!(
            manifest.repo_owner,
            RepoOwner::List(vec!["@a/b".to_string(), "@c/d".to_string()])
        );
        assert!(manifest.repo_owner.contains("@c/d"));
        assert!(manifest.name.is_none());
    }

    #[test]
    fn test_parse_odd_types() {
        let manifest = PackageManifest::parse(r#"{"name": 42, "repoOwner": {"a": 1}}"#).unwrap();
        assert!(manifest.name.is_none());
        assert_eq!(manifest.repo_owner, RepoOwner::Unsupported);
        assert!(!manifest.repo_owner.contains("a"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert_eq!(PackageManifest::parse("{ not json").unwrap_err(), ManifestError::InvalidJson);
    }

    #[tokio::test]
    async fn test_read_manifest_missing_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_manifest(temp.path()).await.unwrap_err(), ManifestError::ReadFailed);
    }

    #[test]
    fn test_error_messages() {
        let err = ManifestError::NameMismatch {
            actual: "account".to_string(),
            expected: "@vfde-care/ngx-lib".to_string(),
        };
        assert_eq!(err.to_string(), r#"package.json name is "account", expected "@vfde-care/ngx-lib"."#);

        let err = ManifestError::OwnerMissing {
            expected: "@o/t".to_string(),
        };
        assert_eq!(err.to_string(), r#"the repoOwner in package.json is missing, expected "@o/t"."#);
    }
}
