//! Command-line interface for ngx-link
//!
//! Run from anywhere inside a host project:
//!
//! ```bash
//! ngx-link configure ~/work/ngx-lib   # remember the ngx-lib checkout
//! ngx-link switch-branch              # pick a branch interactively
//! ngx-link build-and-link --watch     # build, link, wait for the link
//! ngx-link status                     # NGX: develop [Linked]
//! ngx-link panel                      # everything above, interactively
//! ```
//!
//! # Global options
//!
//! - `--project DIR`: host project (defaults to the working directory)
//! - `--config FILE`: settings file (defaults to `~/.ngx-linker/config.toml`)
//! - `-v` / `-q`: debug logging / errors only
//!
//! Every command except `config` first locates the host project and checks
//! that it is allowed to use the linker.

mod actions;
mod branch;
pub mod common;
mod config;
mod configure;
pub mod panel;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::actions::{InstallCommand, OpenCommand, PlanCommand, PlanKind, StartCommand};
use crate::cli::common::CommandContext;

/// Top-level parser
#[derive(Parser)]
#[command(
    name = "ngx-link",
    about = "Switch branches of, build, and npm-link @vfde-care/ngx-lib into a host project",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file to use instead of ~/.ngx-linker/config.toml
    #[arg(short, long, global = true, env = "NGX_LINKER_CONFIG")]
    config: Option<PathBuf>,

    /// Host project directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the module branch and link state
    Status(status::StatusCommand),

    /// Interactive panel with all actions
    Panel(panel::PanelCommand),

    /// Show or set the ngx module path
    Configure(configure::ConfigureCommand),

    /// Check out a branch of the ngx module
    SwitchBranch(branch::SwitchBranchCommand),

    /// List branches of the ngx module
    Branches(branch::BranchesCommand),

    /// npm run build:lib in the ngx module
    Build(PlanCommand),

    /// npm link the built module into the host project
    Link(PlanCommand),

    /// Build, then link
    BuildAndLink(PlanCommand),

    /// Open the ngx module in a new editor window
    Open(OpenCommand),

    /// npm start in the ngx module
    Start(StartCommand),

    /// npm install in the ngx module
    Install(InstallCommand),

    /// Inspect or edit the settings file
    Config(config::ConfigCommand),
}

impl Cli {
    /// `tracing` filter implied by `-v`/`-q`, if any
    #[must_use]
    pub fn log_filter(&self) -> Option<String> {
        if self.verbose {
            Some(crate::constants::log_directives("debug"))
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Whatever the command fails with; `main` turns it into a report.
    pub async fn execute(self) -> Result<()> {
        let settings = crate::config::manager_for(self.config)?;

        match self.command {
            Commands::Config(cmd) => cmd.execute(settings).await,
            command => command.run(CommandContext::resolve(self.project, settings).await?).await,
        }
    }
}

impl Commands {
    async fn run(self, ctx: CommandContext) -> Result<()> {
        match self {
            Self::Status(cmd) => cmd.execute(ctx).await,
            Self::Panel(cmd) => cmd.execute(ctx).await,
            Self::Configure(cmd) => cmd.execute(ctx).await,
            Self::SwitchBranch(cmd) => cmd.execute(ctx).await,
            Self::Branches(cmd) => cmd.execute(ctx).await,
            Self::Build(cmd) => cmd.execute(PlanKind::Build, ctx).await,
            Self::Link(cmd) => cmd.execute(PlanKind::Link, ctx).await,
            Self::BuildAndLink(cmd) => cmd.execute(PlanKind::BuildAndLink, ctx).await,
            Self::Open(cmd) => cmd.execute(ctx).await,
            Self::Start(cmd) => cmd.execute(ctx).await,
            Self::Install(cmd) => cmd.execute(ctx).await,
            Self::Config(cmd) => cmd.execute(ctx.settings).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ngx-link", "status", "--json", "-v", "--project", "/work/account"])
            .unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/work/account")));
        assert!(cli.log_filter().is_some_and(|f| f.contains("ngx_linker=debug") && f.contains("git=debug")));
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["ngx-link", "-v", "-q", "status"]).is_err());
    }

    #[test]
    fn test_parse_install_flags() {
        let cli =
            Cli::try_parse_from(["ngx-link", "install", "--legacy-peer-deps", "--clean", "--yes"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Install(_)));
    }

    #[test]
    fn test_parse_config_subcommands() {
        for args in [
            vec!["ngx-link", "config"],
            vec!["ngx-link", "config", "show"],
            vec!["ngx-link", "config", "path"],
            vec!["ngx-link", "config", "set-path", "/work/ngx"],
            vec!["ngx-link", "config", "clear-path"],
            vec!["ngx-link", "config", "allow", "new-portal"],
            vec!["ngx-link", "config", "disallow", "new-portal"],
        ] {
            let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
            assert!(matches!(cli.command, Commands::Config(_)), "{args:?}");
        }
    }

    #[test]
    fn test_parse_watch_flag() {
        for sub in ["build", "link", "build-and-link"] {
            assert!(Cli::try_parse_from(["ngx-link", sub, "--watch"]).is_ok());
        }
        assert!(Cli::try_parse_from(["ngx-link", "switch-branch", "origin/feature/x", "--no-fetch"]).is_ok());
    }
}
