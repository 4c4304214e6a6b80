//! Configuration
//!
//! A single global TOML file holds the user's [`Settings`]. The `--config`
//! flag points [`SettingsManager`] at a different file, which the
//! integration tests rely on to stay out of the real home directory.

mod settings;

pub use settings::{Settings, SettingsManager};

use anyhow::Result;
use std::path::PathBuf;

/// Manager for `--config` when given, otherwise the default settings file
///
/// # Errors
///
/// Fails when no override is given and the default path cannot be determined.
pub fn manager_for(config_path: Option<PathBuf>) -> Result<SettingsManager> {
    match config_path {
        Some(path) => Ok(SettingsManager::with_path(path)),
        None => SettingsManager::new(),
    }
}
