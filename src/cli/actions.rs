//! npm-backed subcommands: build, link, build-and-link, start, install, open

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::common::{CommandContext, confirm, open_in_editor};
use crate::constants::POLL_MAX_DURATION;
use crate::core::LinkerError;
use crate::link::is_linked;
use crate::npm::{
    InstallOptions, LinkPlan, build_and_link_plan, build_plan, install_plan, link_plan, run_plan,
    spawn_plan_detached, start_plan,
};
use crate::refresh::{PollOutcome, poll_link_state};
use crate::ui::notify;

/// Which plan a [`PlanCommand`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// `npm run build:lib`
    Build,
    /// `npm link` in dist, then in the host
    Link,
    /// Both, in order
    BuildAndLink,
}

impl PlanKind {
    const fn links(self) -> bool {
        matches!(self, Self::Link | Self::BuildAndLink)
    }
}

/// Shared arguments of `build`, `link`, and `build-and-link`
#[derive(Args)]
pub struct PlanCommand {
    /// Run detached and watch link state until it changes (at most three minutes)
    #[arg(long)]
    watch: bool,
}

impl PlanCommand {
    pub async fn execute(self, kind: PlanKind, mut ctx: CommandContext) -> Result<()> {
        let Some(module) = ctx.require_module_path().await? else {
            return Ok(());
        };
        let npm = ctx.npm_command().await?;
        let plan = match kind {
            PlanKind::Build => build_plan(&npm, &module),
            PlanKind::Link => link_plan(&npm, &module, &ctx.host_root),
            PlanKind::BuildAndLink => build_and_link_plan(&npm, &module, &ctx.host_root),
        };
        if kind.links() {
            ctx.ensure_linking_allowed(&plan.name)?;
        }
        for line in plan.describe() {
            tracing::info!(target: "npm", "{}", line);
        }

        if self.watch {
            return watch_plan(plan, &mut ctx).await;
        }

        run_plan(&plan, true).await?;
        notify::info(format!("{} finished.", plan.name));
        println!("{}", ctx.state().await?.status_line());
        Ok(())
    }
}

/// Detached run plus link-state polling; the first of the two to finish wins
async fn watch_plan(plan: LinkPlan, ctx: &mut CommandContext) -> Result<()> {
    let Some(module) = ctx.module_path().await? else {
        return Ok(());
    };
    let host = ctx.host_root.clone();
    let log_path = ctx.log_path();
    let initial = is_linked(&host, &module);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let name = plan.name.clone();
    spawn_plan_detached(plan, log_path.clone(), tx);
    notify::info(format!("{name} started; output is appended to {}", log_path.display()));

    tokio::select! {
        outcome = poll_link_state(
            initial,
            || is_linked(&host, &module),
            |linked| tracing::debug!(target: "refresh", "linked={}", linked),
        ) => match outcome {
            PollOutcome::Changed { linked: true } => notify::info("ngx-lib is now linked."),
            PollOutcome::Changed { linked: false } => notify::info("ngx-lib is no longer linked."),
            PollOutcome::TimedOut => notify::warn(format!(
                "Link state unchanged after {} minutes; check {}",
                POLL_MAX_DURATION.as_secs() / 60,
                log_path.display()
            )),
            PollOutcome::Continue | PollOutcome::Idle => {}
        },
        Some(event) = rx.recv() => {
            if let Err(message) = event.result {
                return Err(LinkerError::Other { message }.into());
            }
            notify::info(format!("{} finished.", event.name));
        }
    }

    println!("{}", ctx.state().await?.status_line());
    Ok(())
}

/// `npm start` in the linked module, attached to this terminal
#[derive(Args)]
pub struct StartCommand {}

impl StartCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        let Some(module) = ctx.require_module_path().await? else {
            return Ok(());
        };
        let npm = ctx.npm_command().await?;
        run_plan(&start_plan(&npm, &module), true).await
    }
}

/// `npm install` in the linked module
#[derive(Args)]
pub struct InstallCommand {
    /// Pass --legacy-peer-deps to npm
    #[arg(long)]
    legacy_peer_deps: bool,

    /// Remove node_modules before installing
    #[arg(long)]
    clean: bool,

    /// Do not ask for confirmation of a clean install
    #[arg(long, short = 'y')]
    yes: bool,
}

/// Confirmation asked before removing `node_modules`
pub const CLEAN_INSTALL_QUESTION: &str = "This action will remove \"node_modules\" directory before installing dependencies. Do you want to continue?";

impl InstallCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        let Some(module) = ctx.require_module_path().await? else {
            return Ok(());
        };

        if self.clean && !self.yes {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            if !confirm(&mut lines, CLEAN_INSTALL_QUESTION).await? {
                notify::warn("Clean installation cancelled.");
                return Ok(());
            }
        }

        let npm = ctx.npm_command().await?;
        let plan = install_plan(
            &npm,
            &module,
            InstallOptions {
                legacy_peer_deps: self.legacy_peer_deps,
                clean: self.clean,
            },
        );
        run_plan(&plan, true).await?;
        notify::info(format!("{} finished.", plan.name));
        Ok(())
    }
}

/// Open the linked module in a new editor window
#[derive(Args)]
pub struct OpenCommand {}

impl OpenCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        ctx.ensure_linking_allowed("Open Window")?;
        let Some(module) = ctx.require_module_path().await? else {
            return Ok(());
        };
        let editor = ctx.settings.get().await?.editor_command.clone();
        open_in_editor(&editor, &module)?;
        notify::info(format!("Opening ngx-module at {}", module.display()));
        Ok(())
    }
}
