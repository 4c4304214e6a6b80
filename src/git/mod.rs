//! Git operations on the linked module checkout
//!
//! Like the rest of the tool, this drives the system `git` binary through
//! [`GitCommand`] instead of embedding a git library, so credentials helpers,
//! SSH agents, and the developer's own git configuration all apply.
//!
//! Three operations are exposed on [`GitRepo`]:
//!
//! - [`current_branch`](GitRepo::current_branch): best effort, never fails
//! - [`list_branches`](GitRepo::list_branches): optionally refreshes remotes first
//! - [`checkout_branch`](GitRepo::checkout_branch): local branch, then remote
//!   tracking fallback, then plain checkout
//!
//! ```rust,no_run
//! use ngx_linker::git::GitRepo;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GitRepo::new("/work/ngx-lib");
//! let branches = repo.list_branches(true).await?;
//! if let Some(first) = branches.first() {
//!     repo.checkout_branch(first).await?;
//! }
//! println!("now on {}", repo.current_branch().await);
//! # Ok(())
//! # }
//! ```

pub mod command_builder;


use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::constants::UNKNOWN_BRANCH;
use crate::core::LinkerError;
use crate::git::command_builder::GitCommand;

/// Handle on a local git checkout
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Wrap an existing checkout; nothing is verified until a command runs
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Checkout directory
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the checked-out branch, or [`UNKNOWN_BRANCH`]
    ///
    /// Any failure (not a repository, git missing, detached state reported as
    /// an empty string) degrades to the sentinel; callers only display it.
    pub async fn current_branch(&self) -> String {
        match GitCommand::current_branch().current_dir(&self.path).execute_stdout().await {
            Ok(branch) if !branch.is_empty() => branch,
            Ok(_) => UNKNOWN_BRANCH.to_string(),
            Err(e) => {
                tracing::debug!(target: "git", "Cannot read current branch: {:#}", e);
                UNKNOWN_BRANCH.to_string()
            }
        }
    }

    /// Local and remote-tracking branches, local first
    ///
    /// With `refresh`, `git fetch --all --prune` runs first; a failed fetch is
    /// logged and listing continues with whatever refs are known locally.
    ///
    /// # Errors
    ///
    /// Returns [`LinkerError::GitCommandError`] when the listing itself fails.
    pub async fn list_branches(&self, refresh: bool) -> Result<Vec<String>> {
        if refresh
            && let Err(e) = GitCommand::fetch_all()
                .current_dir(&self.path)
                .with_context("refresh remotes")
                .execute_success()
                .await
        {
            tracing::warn!(target: "git", "Fetching remotes failed, listing known branches: {:#}", e);
        }

        let stdout = GitCommand::list_branches().current_dir(&self.path).execute_stdout().await?;
        Ok(parse_branch_list(&stdout))
    }

    /// Check out `branch` using the three-tier policy
    ///
    /// 1. An existing local branch is checked out directly.
    /// 2. A name containing `/` (e.g. `origin/feature/x`) gets a local branch
    ///    named without its first segment (`feature/x`), created or reset to
    ///    track the given ref, avoiding a detached HEAD.
    /// 3. Anything else is passed to `git checkout` as is.
    ///
    /// # Errors
    ///
    /// [`LinkerError::GitCheckoutFailed`] carrying git's stderr, or without
    /// running git at all for names starting with `-`.
    pub async fn checkout_branch(&self, branch: &str) -> Result<()> {
        if branch.starts_with('-') {
            return Err(LinkerError::GitCheckoutFailed {
                reference: branch.to_string(),
                reason: "branch names cannot start with '-'".to_string(),
            }
            .into());
        }

        let local_ref = format!("refs/heads/{branch}");
        let is_local = GitCommand::verify_ref(&local_ref)
            .current_dir(&self.path)
            .execute_success()
            .await
            .is_ok();

        if is_local {
            tracing::debug!(target: "git", "Checking out local branch {}", branch);
            return GitCommand::checkout(branch).current_dir(&self.path).execute_success().await;
        }

        if let Some(local_name) = local_branch_for_remote(branch) {
            tracing::debug!(target: "git", "Tracking {} as local branch {}", branch, local_name);
            return GitCommand::checkout_tracking(local_name, branch)
                .current_dir(&self.path)
                .execute_success()
                .await;
        }

        GitCommand::checkout(branch).current_dir(&self.path).execute_success().await
    }
}

/// Local branch name for a remote-looking ref: everything after the first `/`
///
/// `origin/feature/x` becomes `feature/x`; names without `/`, or with nothing
/// after it, yield `None`.
#[must_use]
pub fn local_branch_for_remote(branch: &str) -> Option<&str> {
    branch.split_once('/').map(|(_, rest)| rest).filter(|rest| !rest.is_empty())
}

/// Parse `git branch -a --format=%(refname)` output into short names
///
/// Symbolic `*/HEAD` refs and detached-HEAD pseudo entries are dropped, as are
/// duplicates.
#[must_use]
pub fn parse_branch_list(stdout: &str) -> Vec<String> {
    let mut branches: Vec<String> = Vec::new();

    for line in stdout.lines().map(str::trim) {
        let short = if let Some(local) = line.strip_prefix("refs/heads/") {
            local
        } else if let Some(remote) = line.strip_prefix("refs/remotes/") {
            if remote.ends_with("/HEAD") {
                continue;
            }
            remote
        } else {
            continue;
        };

        if !short.is_empty() && !branches.iter().any(|known| known == short) {
            branches.push(short.to_string());
        }
    }

    branches
}
