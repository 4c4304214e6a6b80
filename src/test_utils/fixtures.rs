//! On-disk fixtures: host projects, linked-module checkouts, npm-style links.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{DEPENDENCY_DIR, NGX_DIST_RELATIVE, NGX_PACKAGE_NAME, REPO_OWNER};

/// Write a `package.json` with the given name and owner tag
pub fn write_package_json(dir: &Path, name: &str, repo_owner: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let body = serde_json::json!({
        "name": name,
        "version": "1.0.0",
        "repoOwner": [repo_owner],
    });
    fs::write(dir.join("package.json"), serde_json::to_string_pretty(&body)?)?;
    Ok(())
}

/// A temp directory holding one host project and one linked-module checkout
///
/// Layout:
///
/// ```text
/// <tmp>/host/package.json            name = "account"
/// <tmp>/ngx-lib/package.json         name = "@vfde-care/ngx-lib"
/// <tmp>/global/                      stand-in for npm's global prefix
/// ```
pub struct LinkFixture {
    _temp_dir: TempDir,
    /// Host project root
    pub host: PathBuf,
    /// Linked module root
    pub module: PathBuf,
    /// Stand-in for the global npm registry directory
    pub global: PathBuf,
}

impl LinkFixture {
    /// Create the fixture with valid manifests and no build output
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let host = temp_dir.path().join("host");
        let module = temp_dir.path().join("ngx-lib");
        let global = temp_dir.path().join("global");

        write_package_json(&host, "account", REPO_OWNER)?;
        write_package_json(&module, NGX_PACKAGE_NAME, REPO_OWNER)?;
        fs::create_dir_all(&global)?;

        Ok(Self {
            _temp_dir: temp_dir,
            host,
            module,
            global,
        })
    }

    /// Root of the temp directory
    pub fn root(&self) -> &Path {
        self.host.parent().unwrap_or(&self.host)
    }

    /// Create `<module>/distribution/ngx-lib` as `npm run build:lib` would
    pub fn build_dist(&self) -> Result<PathBuf> {
        let dist = self.module.join(NGX_DIST_RELATIVE);
        fs::create_dir_all(&dist)?;
        fs::write(dist.join("package.json"), format!(r#"{{"name": "{NGX_PACKAGE_NAME}"}}"#))?;
        Ok(dist)
    }

    /// Path npm links the package to inside the host
    pub fn dependency_path(&self) -> PathBuf {
        self.host.join(DEPENDENCY_DIR).join(NGX_PACKAGE_NAME)
    }

    /// Link the way npm does: host -> global -> dist
    #[cfg(unix)]
    pub fn link_via_global(&self) -> Result<()> {
        let dist = self.build_dist()?;
        let global_entry = self.global.join(NGX_PACKAGE_NAME);
        fs::create_dir_all(global_entry.parent().unwrap_or(&self.global))?;
        std::os::unix::fs::symlink(&dist, &global_entry)?;

        let dependency = self.dependency_path();
        fs::create_dir_all(dependency.parent().unwrap_or(&self.host))?;
        std::os::unix::fs::symlink(&global_entry, &dependency)?;
        Ok(())
    }

    /// Point the host's dependency symlink straight at `target`
    #[cfg(unix)]
    pub fn link_to(&self, target: &Path) -> Result<()> {
        let dependency = self.dependency_path();
        fs::create_dir_all(dependency.parent().unwrap_or(&self.host))?;
        std::os::unix::fs::symlink(target, &dependency)?;
        Ok(())
    }
}
