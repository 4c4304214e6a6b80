//! `ngx-link panel`: interactive terminal panel
//!
//! A single task owns everything mutable: the settings, the refresh
//! controller, and the one polling ticker. It waits on three sources at once:
//!
//! - input lines (one action key per line)
//! - ticks of the polling interval, while a window is open
//! - completion events from detached npm actions
//!
//! Each wakeup recomputes the full [`PanelState`] before re-rendering, so a
//! render never shows a mix of old and new values.

use anyhow::Result;
use clap::Args;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;

use crate::cli::actions::CLEAN_INSTALL_QUESTION;
use crate::cli::common::{
    CommandContext, apply_module_path, choose_branch, confirm, open_in_editor, prompt_line,
    switch_to_branch,
};
use crate::constants::POLL_INTERVAL;
use crate::core::user_friendly_error;
use crate::npm::{
    ActionEvent, InstallOptions, LinkPlan, build_and_link_plan, build_plan, install_plan,
    link_plan, spawn_plan_detached, start_plan,
};
use crate::refresh::{PollOutcome, RefreshController, RefreshTicker};
use crate::ui::{NGX_PROJECT_WARNING, PanelAction, PanelState, notify, render};

/// Open the interactive panel
#[derive(Args)]
pub struct PanelCommand {}

impl PanelCommand {
    pub async fn execute(self, ctx: CommandContext) -> Result<()> {
        let lines = BufReader::new(tokio::io::stdin()).lines();
        Panel::new(ctx).run(lines).await
    }
}

/// Panel session state
pub struct Panel {
    ctx: CommandContext,
    controller: RefreshController,
    state: Option<PanelState>,
}

impl Panel {
    /// New session over a resolved context
    #[must_use]
    pub const fn new(ctx: CommandContext) -> Self {
        Self {
            ctx,
            controller: RefreshController::new(),
            state: None,
        }
    }

    /// Run until `q` or end of input
    ///
    /// # Errors
    ///
    /// Only input failures and unreadable settings end the session; action
    /// failures are reported and the panel keeps running.
    pub async fn run<R>(mut self, mut lines: Lines<R>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let (events_tx, mut events) = mpsc::unbounded_channel::<ActionEvent>();
        let mut ticker = RefreshTicker::new();

        if let Some(reason) = self.ctx.clear_invalid_module_path().await? {
            notify::error(reason.to_string());
        }
        self.refresh_and_render().await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match PanelAction::parse(&line) {
                        Some(PanelAction::Quit) => break,
                        Some(action) => {
                            if let Err(e) = self.handle(action, &mut lines, &mut ticker, &events_tx).await {
                                user_friendly_error(e).display();
                            }
                        }
                        None if line.trim().is_empty() => self.refresh_and_render().await?,
                        None => notify::warn(format!("Unknown action '{}'", line.trim())),
                    }
                }
                now = ticker.tick() => {
                    let state = self.refresh().await?;
                    match self.controller.observe(state.linked, now) {
                        PollOutcome::Changed { linked } => {
                            ticker.stop();
                            notify::info(if linked { "ngx-lib is now linked." } else { "ngx-lib is no longer linked." });
                        }
                        PollOutcome::TimedOut => {
                            ticker.stop();
                            tracing::debug!(target: "refresh", "Stopped polling without a change");
                        }
                        PollOutcome::Continue | PollOutcome::Idle => {}
                    }
                    self.render();
                }
                Some(event) = events.recv() => {
                    match event.result {
                        Ok(()) => notify::info(format!("{} finished.", event.name)),
                        Err(message) => notify::error(message),
                    }
                    self.refresh_and_render().await?;
                }
            }
        }

        ticker.stop();
        Ok(())
    }

    async fn refresh(&mut self) -> Result<PanelState> {
        let state = self.ctx.state().await?;
        self.state = Some(state.clone());
        Ok(state)
    }

    fn render(&self) {
        if let Some(state) = &self.state {
            println!();
            for line in render(state, self.controller.is_polling()) {
                println!("{line}");
            }
        }
    }

    async fn refresh_and_render(&mut self) -> Result<()> {
        self.refresh().await?;
        self.render();
        Ok(())
    }

    async fn handle<R>(
        &mut self,
        action: PanelAction,
        lines: &mut Lines<R>,
        ticker: &mut RefreshTicker,
        events: &mpsc::UnboundedSender<ActionEvent>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let enabled = self.state.as_ref().is_none_or(|state| action.is_enabled(state));
        if !enabled {
            notify::warn(NGX_PROJECT_WARNING);
            return Ok(());
        }

        match action {
            PanelAction::Refresh | PanelAction::Quit => {}
            PanelAction::SetPath => {
                if let Some(input) = prompt_line(lines, "Path to the ngx module: ").await?
                    && !input.trim().is_empty()
                {
                    let root = apply_module_path(&mut self.ctx.settings, input.trim()).await?;
                    notify::info(format!("Using ngx-module at {}", root.display()));
                }
            }
            PanelAction::ChangeBranch => {
                let Some(module) = self.ctx.require_module_path().await? else {
                    return Ok(());
                };
                if let Some(branch) = choose_branch(&module, true, lines).await? {
                    switch_to_branch(&module, &branch).await?;
                }
            }
            PanelAction::OpenWindow => {
                let Some(module) = self.ctx.require_module_path().await? else {
                    return Ok(());
                };
                let editor = self.ctx.settings.get().await?.editor_command.clone();
                open_in_editor(&editor, &module)?;
            }
            PanelAction::Build
            | PanelAction::Link
            | PanelAction::BuildAndLink
            | PanelAction::Start
            | PanelAction::Install => {
                let Some(plan) = self.plan_for(action, lines).await? else {
                    return Ok(());
                };
                let log_path = self.ctx.log_path();
                notify::info(format!(
                    "{} started; output is appended to {}",
                    plan.name,
                    log_path.display()
                ));
                spawn_plan_detached(plan, log_path, events.clone());

                if action.starts_polling() {
                    let initial = self.state.as_ref().is_some_and(|state| state.linked);
                    self.controller.start(initial, Instant::now());
                    ticker.start(POLL_INTERVAL);
                }
            }
        }

        self.refresh_and_render().await
    }

    /// Build the plan for an npm action, asking install options as needed
    async fn plan_for<R>(&mut self, action: PanelAction, lines: &mut Lines<R>) -> Result<Option<LinkPlan>>
    where
        R: AsyncBufRead + Unpin,
    {
        let Some(module) = self.ctx.require_module_path().await? else {
            return Ok(None);
        };
        let npm = self.ctx.npm_command().await?;
        let host = &self.ctx.host_root;

        let plan = match action {
            PanelAction::Build => build_plan(&npm, &module),
            PanelAction::Link => link_plan(&npm, &module, host),
            PanelAction::BuildAndLink => build_and_link_plan(&npm, &module, host),
            PanelAction::Start => start_plan(&npm, &module),
            PanelAction::Install => {
                let legacy_peer_deps = confirm(lines, "Use --legacy-peer-deps?").await?;
                let clean = confirm(lines, "Clean installation?").await?;
                if clean && !confirm(lines, CLEAN_INSTALL_QUESTION).await? {
                    notify::warn("Clean installation cancelled.");
                    return Ok(None);
                }
                install_plan(
                    &npm,
                    &module,
                    InstallOptions {
                        legacy_peer_deps,
                        clean,
                    },
                )
            }
            _ => return Ok(None),
        };
        Ok(Some(plan))
    }
}
