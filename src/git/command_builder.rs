//! Type-safe Git command builder for consistent command execution
//!
//! Every git invocation in the crate goes through [`GitCommand`] so that
//! logging, timeouts, and the mapping from exit codes to [`LinkerError`] are
//! uniform.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::{GIT_FETCH_TIMEOUT, GIT_LOCAL_TIMEOUT};
use crate::core::LinkerError;
use crate::utils::platform::get_git_command;

/// Builder for a single git invocation
///
/// ```rust,ignore
/// use ngx_linker::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let branch = GitCommand::current_branch()
///     .current_dir("/work/ngx-lib")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// Defaults: output captured, 30 second timeout, process working directory.
/// A working directory is passed to git with `-C` so the parent process never
/// changes directory.
pub struct GitCommand {
    /// Command arguments passed to git
    args: Vec<String>,

    /// Repository to run in
    current_dir: Option<PathBuf>,

    /// Environment overrides for the git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = wait forever)
    timeout_duration: Option<Duration>,

    /// Optional context string for log lines
    context: Option<String>,

    /// For checkout commands, the reference the user asked for
    reference: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: Vec::new(),
            timeout_duration: Some(GIT_LOCAL_TIMEOUT),
            context: None,
            reference: None,
        }
    }
}

impl GitCommand {
    /// Create an empty command with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git inside `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the git process
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Override the timeout
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = Some(duration);
        self
    }

    /// Tag log lines with a short description of why the command runs
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn full_args(&self) -> Vec<String> {
        let mut full_args = Vec::with_capacity(self.args.len() + 2);
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());
        full_args
    }

    fn operation(&self) -> String {
        self.args.first().cloned().unwrap_or_else(|| "unknown".to_string())
    }

    /// Execute the command and return its output
    ///
    /// # Errors
    ///
    /// - [`LinkerError::GitNotFound`] when git cannot be spawned
    /// - [`LinkerError::GitCheckoutFailed`] for failed checkouts
    /// - [`LinkerError::GitCommandError`] for any other non-zero exit or timeout
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let full_args = self.full_args();
        let operation = self.operation();

        let mut cmd = Command::new(git_command);
        cmd.args(&full_args).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        match self.context {
            Some(ref ctx) => tracing::debug!(
                target: "git",
                "({}) Executing command: {} {}",
                ctx,
                git_command,
                full_args.join(" ")
            ),
            None => tracing::debug!(
                target: "git",
                "Executing command: {} {}",
                git_command,
                full_args.join(" ")
            ),
        }

        let output_future = cmd.output();
        let result = match self.timeout_duration {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        target: "git",
                        "Command timed out after {} seconds: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    );
                    return Err(LinkerError::GitCommandError {
                        operation,
                        stderr: format!(
                            "Git command timed out after {} seconds. Try running it manually: git {}",
                            duration.as_secs(),
                            full_args.join(" ")
                        ),
                    }
                    .into());
                }
            },
            None => output_future.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LinkerError::GitNotFound.into());
            }
            Err(e) => {
                return Err(e).context(format!("Failed to execute git {}", full_args.join(" ")));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "git",
                "Command failed with exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            );

            let error = if operation == "checkout" {
                LinkerError::GitCheckoutFailed {
                    reference: self.reference.unwrap_or_else(|| {
                        self.args.last().cloned().unwrap_or_default()
                    }),
                    reason: stderr,
                }
            } else {
                LinkerError::GitCommandError {
                    operation,
                    stderr: if stderr.is_empty() {
                        stdout
                    } else {
                        stderr
                    },
                }
            };
            return Err(error.into());
        }

        if !stdout.is_empty() {
            tracing::trace!(target: "git", "{}", stdout.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "git::perf", "Git {} took {:.2}s", operation, elapsed.as_secs_f64());
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "git::perf", "Git {} took {}ms", operation, elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute and return stdout trimmed
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute, discarding output
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a git command
pub struct GitCommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

// Convenience builders for the operations the linker needs

impl GitCommand {
    /// `git fetch --all --prune`, non-interactive
    #[must_use]
    pub fn fetch_all() -> Self {
        Self::new()
            .args(["fetch", "--all", "--prune"])
            .env("GIT_TERMINAL_PROMPT", "0")
            .timeout(GIT_FETCH_TIMEOUT)
    }

    /// `git rev-parse --abbrev-ref HEAD`
    #[must_use]
    pub fn current_branch() -> Self {
        Self::new().args(["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// List local and remote-tracking branches by full ref name
    #[must_use]
    pub fn list_branches() -> Self {
        Self::new().args(["branch", "-a", "--format=%(refname)"])
    }

    /// `git rev-parse --verify <ref>`
    #[must_use]
    pub fn verify_ref(ref_name: &str) -> Self {
        Self::new().args(["rev-parse", "--verify", "--quiet", ref_name])
    }

    /// `git checkout <ref>`
    #[must_use]
    pub fn checkout(ref_name: &str) -> Self {
        let mut cmd = Self::new().args(["checkout", ref_name]);
        cmd.reference = Some(ref_name.to_string());
        cmd
    }

    /// `git checkout -B <local> <remote_ref>`: create or reset a tracking branch
    #[must_use]
    pub fn checkout_tracking(local_name: &str, remote_ref: &str) -> Self {
        let mut cmd = Self::new().args(["checkout", "-B", local_name, remote_ref]);
        cmd.reference = Some(remote_ref.to_string());
        cmd
    }
}
