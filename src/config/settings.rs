//! User settings stored in `~/.ngx-linker/config.toml`
//!
//! Settings are global to the user, not per host project: the linked module
//! checkout is usually shared between several host projects.
//!
//! # File format
//!
//! ```toml
//! ngx_module_path = "/home/dev/work/ngx-lib"
//! allowed_projects = ["account", "payment", "@vfde-care/ngx-lib"]
//! npm_command = "npm"
//! editor_command = "code"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{DEFAULT_ALLOWED_PROJECTS, DEFAULT_EDITOR_COMMAND};
use crate::utils::platform::{get_home_dir, get_npm_command, resolve_path};

/// Persistent user settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Validated root of the linked module checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngx_module_path: Option<PathBuf>,

    /// Host project names this tool activates for
    pub allowed_projects: Vec<String>,

    /// Program used for every npm invocation
    pub npm_command: String,

    /// Program used to open the module in a new editor window
    pub editor_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ngx_module_path: None,
            allowed_projects: DEFAULT_ALLOWED_PROJECTS.iter().map(ToString::to_string).collect(),
            npm_command: get_npm_command().to_string(),
            editor_command: DEFAULT_EDITOR_COMMAND.to_string(),
        }
    }
}

impl Settings {
    /// Load from a specific file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// Write to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Fails on any I/O or serialization error.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// `~/.ngx-linker/config.toml`, or `%LOCALAPPDATA%\ngx-linker\config.toml`
    /// on Windows.
    ///
    /// # Errors
    ///
    /// Fails when the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("ngx-linker")
        } else {
            get_home_dir()?.join(".ngx-linker")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Configured module path with `~` and variables expanded
    ///
    /// A value that fails to expand is returned as written; validation
    /// downstream reports it as a missing path.
    #[must_use]
    pub fn module_path(&self) -> Option<PathBuf> {
        let raw = self.ngx_module_path.as_ref()?;
        let text = raw.to_string_lossy();
        Some(resolve_path(&text).unwrap_or_else(|_| raw.clone()))
    }

    /// Whether `name` is on the allow-list
    #[must_use]
    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed_projects.iter().any(|allowed| allowed == name)
    }

    /// Add `name` to the allow-list; false when already present
    pub fn allow(&mut self, name: &str) -> bool {
        if self.is_allowed(name) {
            return false;
        }
        self.allowed_projects.push(name.to_string());
        true
    }

    /// Remove `name` from the allow-list; false when absent
    pub fn disallow(&mut self, name: &str) -> bool {
        let before = self.allowed_projects.len();
        self.allowed_projects.retain(|allowed| allowed != name);
        before != self.allowed_projects.len()
    }
}

/// Lazily loaded, cached [`Settings`] bound to one file
///
/// The panel holds one manager for its lifetime so that a path cleared or
/// set from the panel is visible to the next refresh without re-reading.
pub struct SettingsManager {
    settings: Option<Settings>,
    path: PathBuf,
}

impl SettingsManager {
    /// Manager for the default settings file
    ///
    /// # Errors
    ///
    /// Fails when the default path cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self {
            settings: None,
            path: Settings::default_path()?,
        })
    }

    /// Manager for an explicit settings file (`--config`)
    #[must_use]
    pub const fn with_path(path: PathBuf) -> Self {
        Self {
            settings: None,
            path,
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_cached(&mut self) -> Result<&mut Settings> {
        let settings = match self.settings.take() {
            Some(settings) => settings,
            None if self.path.exists() => Settings::load_from(&self.path).await?,
            None => Settings::default(),
        };
        Ok(self.settings.insert(settings))
    }

    /// Current settings, loading on first use
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be parsed.
    pub async fn get(&mut self) -> Result<&Settings> {
        Ok(&*self.load_cached().await?)
    }

    /// Mutable settings; call [`save`](Self::save) to persist
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be parsed.
    pub async fn get_mut(&mut self) -> Result<&mut Settings> {
        self.load_cached().await
    }

    /// Persist the cached settings, if any were loaded
    ///
    /// # Errors
    ///
    /// Fails on any I/O error.
    pub async fn save(&self) -> Result<()> {
        if let Some(settings) = &self.settings {
            settings.save_to(&self.path).await?;
        }
        Ok(())
    }

    /// Discard the cache and read the file again
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be parsed.
    pub async fn reload(&mut self) -> Result<()> {
        self.settings = None;
        self.load_cached().await?;
        Ok(())
    }
}
