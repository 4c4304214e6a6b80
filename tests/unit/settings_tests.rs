//! Settings file handling through the public config API.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use ngx_linker::config::{Settings, SettingsManager};
use ngx_linker::constants::DEFAULT_ALLOWED_PROJECTS;

#[tokio::test]
async fn partial_settings_file_keeps_defaults() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("config.toml");
    fs::write(&path, "ngx_module_path = \"/work/ngx-lib\"\n")?;

    let settings = Settings::load_from(&path).await?;
    assert_eq!(settings.ngx_module_path, Some(PathBuf::from("/work/ngx-lib")));
    assert_eq!(settings.allowed_projects.len(), DEFAULT_ALLOWED_PROJECTS.len());
    assert!(!settings.npm_command.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_settings_file_is_an_error() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("config.toml");
    fs::write(&path, "allowed_projects = 3\n")?;

    assert!(Settings::load_from(&path).await.is_err());
    Ok(())
}

#[tokio::test]
async fn manager_persists_changes_across_instances() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("nested").join("config.toml");

    let mut first = SettingsManager::with_path(path.clone());
    assert!(first.get_mut().await?.allow("new-portal"));
    first.get_mut().await?.ngx_module_path = Some(PathBuf::from("/work/ngx-lib"));
    first.save().await?;

    let mut second = SettingsManager::with_path(path);
    let loaded = second.get().await?;
    assert!(loaded.is_allowed("new-portal"));
    assert_eq!(loaded.module_path(), Some(PathBuf::from("/work/ngx-lib")));
    Ok(())
}

#[tokio::test]
async fn save_without_load_writes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("config.toml");

    SettingsManager::with_path(path.clone()).save().await?;
    assert!(!path.exists());
    Ok(())
}
