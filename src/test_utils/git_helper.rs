//! Git test helper utilities
//!
//! Provides a safe, testable wrapper around Git operations for unit tests.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git command runner for tests
///
/// Use this instead of raw `std::process::Command` when preparing fixture
/// repositories.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    /// Create a new TestGit instance for the given repository path
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Repository directory
    pub fn path(&self) -> &Path {
        &self.repo_path
    }

    /// Initialize a repository whose first branch is `main`
    pub fn init(&self) -> Result<()> {
        self.run_git_command(&["init"], "Failed to initialize git repository")?;
        self.run_git_command(
            &["symbolic-ref", "HEAD", "refs/heads/main"],
            "Failed to set initial branch",
        )?;
        Ok(())
    }

    /// Configure git user for tests
    pub fn config_user(&self) -> Result<()> {
        self.run_git_command(
            &["config", "user.email", "test@ngx-linker.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(&["config", "user.name", "Test User"], "Failed to configure git user name")?;
        Ok(())
    }

    /// Stage everything and commit
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.run_git_command(&["add", "."], "Failed to add files to git")?;
        self.run_git_command(
            &["commit", "--allow-empty", "-m", message],
            "Failed to create git commit",
        )?;
        Ok(())
    }

    /// Create a branch without switching to it
    pub fn branch(&self, branch_name: &str) -> Result<()> {
        self.run_git_command(&["branch", branch_name], &format!("Failed to create branch: {branch_name}"))?;
        Ok(())
    }

    /// Clone this repository into `target` and return a helper for the clone
    pub fn clone_to(&self, target: &Path) -> Result<Self> {
        let source = self.repo_path.display().to_string();
        let destination = target.display().to_string();
        self.run_git_command(&["clone", &source, &destination], "Failed to clone repository")?;
        let clone = Self::new(target);
        clone.config_user()?;
        Ok(clone)
    }

    /// `git fetch --all`
    pub fn fetch(&self) -> Result<()> {
        self.run_git_command(&["fetch", "--all"], "Failed to fetch")?;
        Ok(())
    }

    /// Short name of the checked-out branch
    pub fn current_branch(&self) -> Result<String> {
        let output =
            self.run_git_command(&["rev-parse", "--abbrev-ref", "HEAD"], "Failed to read branch")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Upstream of the checked-out branch, if any
    pub fn upstream(&self) -> Result<String> {
        let output = self.run_git_command(
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"],
            "Failed to read upstream",
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
