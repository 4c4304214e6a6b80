//! npm build/link adapter
//!
//! Every npm-backed action is described first as a [`LinkPlan`], an ordered
//! list of [`PlanStep`]s, and only then executed. Keeping the plan as data
//! lets the CLI show what will run, lets tests assert the exact commands,
//! and gives both execution modes the same abort-on-first-failure
//! semantics:
//!
//! - [`run_plan`] runs supervised; the first failing step returns
//!   [`LinkerError::NpmCommandError`] with npm's stderr verbatim.
//! - [`spawn_plan_detached`] runs in a background task, appending all output
//!   to a log file, and reports completion over a channel.
//!
//! There is no rollback. Every step is safe to repeat, so re-running the
//! action is the retry.

pub mod command_builder;

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::{BUILD_SCRIPT, DEPENDENCY_DIR, NGX_DIST_RELATIVE, NGX_PACKAGE_NAME};
use crate::core::LinkerError;
use crate::npm::command_builder::NpmCommand;

/// One npm invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    /// Executable
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Short human label
    pub label: String,
}

impl PlanStep {
    fn npm(program: &str, cwd: &Path, args: &[&str]) -> Self {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        Self {
            label: format!("npm {}", args.join(" ")),
            program: program.to_string(),
            args,
            cwd: cwd.to_path_buf(),
        }
    }

    fn command(&self) -> NpmCommand {
        NpmCommand::new(&self.program, &self.cwd).args(self.args.iter().cloned()).label(&self.label)
    }
}

/// Ordered steps plus an optional directory removed before the first step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPlan {
    /// Action name shown to the user
    pub name: String,
    /// Removed (if present) before any step runs
    pub clean_dir: Option<PathBuf>,
    /// Steps, run in order
    pub steps: Vec<PlanStep>,
}

impl LinkPlan {
    fn new(name: &str, steps: Vec<PlanStep>) -> Self {
        Self {
            name: name.to_string(),
            clean_dir: None,
            steps,
        }
    }

    /// One line per step, for `--verbose` and the panel log
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(dir) = &self.clean_dir {
            lines.push(format!("remove {}", dir.display()));
        }
        lines.extend(self.steps.iter().map(|s| format!("{} (in {})", s.label, s.cwd.display())));
        lines
    }
}

/// Flags for [`install_plan`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Pass `--legacy-peer-deps`
    pub legacy_peer_deps: bool,
    /// Remove `node_modules` first
    pub clean: bool,
}

/// `npm run build:lib` in the module
#[must_use]
pub fn build_plan(npm: &str, module: &Path) -> LinkPlan {
    LinkPlan::new("Build", vec![PlanStep::npm(npm, module, &["run", BUILD_SCRIPT])])
}

/// `npm link` in the module's build output, then `npm link <package>` in the host
#[must_use]
pub fn link_plan(npm: &str, module: &Path, host: &Path) -> LinkPlan {
    LinkPlan::new(
        "Link",
        vec![
            PlanStep::npm(npm, &module.join(NGX_DIST_RELATIVE), &["link"]),
            PlanStep::npm(npm, host, &["link", NGX_PACKAGE_NAME]),
        ],
    )
}

/// [`build_plan`] followed by [`link_plan`]
#[must_use]
pub fn build_and_link_plan(npm: &str, module: &Path, host: &Path) -> LinkPlan {
    let mut steps = build_plan(npm, module).steps;
    steps.extend(link_plan(npm, module, host).steps);
    LinkPlan::new("Build & Link", steps)
}

/// `npm start` in the module
#[must_use]
pub fn start_plan(npm: &str, module: &Path) -> LinkPlan {
    LinkPlan::new("Start", vec![PlanStep::npm(npm, module, &["start"])])
}

/// `npm install` in the module
#[must_use]
pub fn install_plan(npm: &str, module: &Path, options: InstallOptions) -> LinkPlan {
    let mut args = vec!["install"];
    if options.legacy_peer_deps {
        args.push("--legacy-peer-deps");
    }
    let mut plan = LinkPlan::new("Install", vec![PlanStep::npm(npm, module, &args)]);
    if options.clean {
        plan.name = "Clean Install".to_string();
        plan.clean_dir = Some(module.join(DEPENDENCY_DIR));
    }
    plan
}

async fn clean(dir: &Path) -> Result<()> {
    if fs::symlink_metadata(dir).await.is_err() {
        return Ok(());
    }
    tracing::info!(target: "npm", "Removing {}", dir.display());
    fs::remove_dir_all(dir).await.with_context(|| format!("Failed to remove {}", dir.display()))
}

/// Run every step in order, stopping at the first failure
///
/// With `echo`, npm's stdout streams to the terminal.
///
/// # Errors
///
/// The first failing step's [`LinkerError::NpmCommandError`] (or
/// [`LinkerError::NpmNotFound`]); later steps do not run.
pub async fn run_plan(plan: &LinkPlan, echo: bool) -> Result<()> {
    tracing::info!(target: "npm", "Running {} ({} steps)", plan.name, plan.steps.len());
    if let Some(dir) = &plan.clean_dir {
        clean(dir).await?;
    }
    for step in &plan.steps {
        step.command().echo_stdout(echo).execute().await?;
    }
    Ok(())
}

/// Completion report of a detached plan
#[derive(Debug, Clone)]
pub struct ActionEvent {
    /// [`LinkPlan::name`]
    pub name: String,
    /// `Err` holds a printable failure description
    pub result: Result<(), String>,
}

/// One-line description of a plan failure for notifications
#[must_use]
pub fn describe_failure(error: &anyhow::Error) -> String {
    match error.downcast_ref::<LinkerError>() {
        Some(LinkerError::NpmCommandError {
            step,
            stderr,
            ..
        }) => format!("{step} failed: {}", stderr.trim()),
        Some(other) => other.to_string(),
        None => format!("{error:#}"),
    }
}

/// Open the action log for appending and write the plan header
///
/// Returns a std handle because child stdio needs one.
async fn open_log(plan: &LinkPlan, log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let mut log = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .await
        .with_context(|| format!("Failed to open action log: {}", log_path.display()))?;

    let mut header = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), plan.name);
    for line in plan.describe() {
        header.push_str(&format!("  $ {line}\n"));
    }
    log.write_all(header.as_bytes()).await?;
    log.flush().await?;

    Ok(log.into_std().await)
}

async fn run_plan_logged(plan: &LinkPlan, log_path: &Path) -> Result<()> {
    let log = open_log(plan, log_path).await?;

    if let Some(dir) = &plan.clean_dir {
        clean(dir).await?;
    }
    for step in &plan.steps {
        step.command().execute_logged(&log).await?;
    }
    Ok(())
}

/// Run `plan` in the background with output appended to `log_path`
///
/// Exactly one [`ActionEvent`] is sent when the plan ends; a closed channel
/// is ignored.
pub fn spawn_plan_detached(
    plan: LinkPlan,
    log_path: PathBuf,
    events: mpsc::UnboundedSender<ActionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = run_plan_logged(&plan, &log_path).await;
        if let Err(e) = &result {
            tracing::warn!(target: "npm", "{} failed: {:#}", plan.name, e);
        }
        let _ = events.send(ActionEvent {
            name: plan.name,
            result: result.map_err(|e| describe_failure(&e)),
        });
    })
}
