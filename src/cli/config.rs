//! `ngx-link config`: inspect and edit the settings file
//!
//! Unlike every other subcommand this one works from any directory; it never
//! looks at the host project.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::cli::common::apply_module_path;
use crate::config::SettingsManager;

/// Settings file management
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the settings (default)
    Show,

    /// Print the settings file location
    Path,

    /// Validate and store the ngx module path
    SetPath {
        /// Any path inside the ngx-lib checkout
        path: String,
    },

    /// Forget the ngx module path
    ClearPath,

    /// Add a project name to the allow-list
    Allow {
        /// `name` from the project's package.json
        name: String,
    },

    /// Remove a project name from the allow-list
    Disallow {
        /// `name` from the project's package.json
        name: String,
    },
}

impl ConfigCommand {
    pub async fn execute(self, mut settings: SettingsManager) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => Self::show(&mut settings).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", settings.path().display());
                Ok(())
            }
            Some(ConfigSubcommands::SetPath {
                path,
            }) => {
                let root = apply_module_path(&mut settings, &path).await?;
                println!("✅ ngx module path set to {}", root.display());
                Ok(())
            }
            Some(ConfigSubcommands::ClearPath) => {
                settings.get_mut().await?.ngx_module_path = None;
                settings.save().await?;
                println!("✅ ngx module path cleared");
                Ok(())
            }
            Some(ConfigSubcommands::Allow {
                name,
            }) => {
                if settings.get_mut().await?.allow(&name) {
                    settings.save().await?;
                    println!("✅ Added '{name}' to allowed projects");
                } else {
                    println!("'{name}' is already allowed");
                }
                Ok(())
            }
            Some(ConfigSubcommands::Disallow {
                name,
            }) => {
                if settings.get_mut().await?.disallow(&name) {
                    settings.save().await?;
                    println!("✅ Removed '{name}' from allowed projects");
                } else {
                    println!("❌ '{name}' is not in allowed projects");
                }
                Ok(())
            }
        }
    }

    async fn show(settings: &mut SettingsManager) -> Result<()> {
        let location = settings.path().display().to_string();
        let current = settings.get().await?;

        println!("{}", "ngx-linker settings".bold());
        println!("Location: {location}\n");
        match &current.ngx_module_path {
            Some(path) => println!("ngx module path: {}", path.display()),
            None => println!("ngx module path: {}", "not configured".yellow()),
        }
        println!("npm command:     {}", current.npm_command);
        println!("editor command:  {}", current.editor_command);
        println!("allowed projects:");
        for name in &current.allowed_projects {
            println!("  - {name}");
        }
        Ok(())
    }
}
