//! npm command builder
//!
//! Mirrors [`GitCommand`](crate::git::command_builder::GitCommand): one
//! builder, uniform logging, and a single place where exit codes become
//! [`LinkerError`]s. Unlike git, npm steps have no timeout; builds routinely
//! take minutes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::core::LinkerError;

/// Builder for a single npm invocation
pub struct NpmCommand {
    program: String,
    args: Vec<String>,
    current_dir: PathBuf,
    label: Option<String>,
    echo_stdout: bool,
}

/// Captured output of a finished npm step
#[derive(Debug)]
pub struct NpmCommandOutput {
    /// Standard output (empty when echoed)
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl NpmCommand {
    /// `program` is the npm executable, usually from the settings file
    pub fn new(program: impl Into<String>, current_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.as_ref().to_path_buf(),
            label: None,
            echo_stdout: false,
        }
    }

    /// Add arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Label used in log lines and errors; defaults to the command line
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Stream stdout to the terminal instead of capturing it
    #[must_use]
    pub const fn echo_stdout(mut self, echo: bool) -> Self {
        self.echo_stdout = echo;
        self
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn step_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.command_line())
    }

    fn missing_dir_error(&self) -> Option<LinkerError> {
        if self.current_dir.is_dir() {
            return None;
        }
        Some(LinkerError::NpmCommandError {
            step: self.step_label(),
            cwd: self.current_dir.display().to_string(),
            stderr: format!("Directory does not exist: {}", self.current_dir.display()),
        })
    }

    fn spawn_error(&self, e: std::io::Error) -> anyhow::Error {
        if e.kind() == std::io::ErrorKind::NotFound {
            LinkerError::NpmNotFound.into()
        } else {
            anyhow::Error::new(e).context(format!("Failed to execute {}", self.command_line()))
        }
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.current_dir).stdin(Stdio::null());
        cmd
    }

    /// Run to completion, capturing stderr
    ///
    /// # Errors
    ///
    /// - [`LinkerError::NpmNotFound`] when the program cannot be spawned
    /// - [`LinkerError::NpmCommandError`] for a missing working directory or a
    ///   non-zero exit, carrying stderr verbatim
    pub async fn execute(self) -> Result<NpmCommandOutput> {
        if let Some(error) = self.missing_dir_error() {
            return Err(error.into());
        }

        let start = std::time::Instant::now();
        tracing::debug!(
            target: "npm",
            "Executing command: {} (in {})",
            self.command_line(),
            self.current_dir.display()
        );

        let mut cmd = self.base_command();
        cmd.stdout(if self.echo_stdout { Stdio::inherit() } else { Stdio::piped() })
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| self.spawn_error(e))?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "npm",
                "Command failed with exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            );
            return Err(LinkerError::NpmCommandError {
                step: self.step_label(),
                cwd: self.current_dir.display().to_string(),
                stderr: if stderr.trim().is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        tracing::debug!(
            target: "npm",
            "{} finished in {:.1}s",
            self.step_label(),
            start.elapsed().as_secs_f64()
        );
        Ok(NpmCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Run to completion with stdout and stderr appended to `log`
    ///
    /// Used for detached actions: the user follows progress in the log file,
    /// so the error only points there.
    ///
    /// # Errors
    ///
    /// Same variants as [`execute`](Self::execute).
    pub async fn execute_logged(self, log: &std::fs::File) -> Result<()> {
        if let Some(error) = self.missing_dir_error() {
            return Err(error.into());
        }

        tracing::debug!(
            target: "npm",
            "Executing detached: {} (in {})",
            self.command_line(),
            self.current_dir.display()
        );

        let stdout = log.try_clone().context("Failed to attach action log")?;
        let stderr = log.try_clone().context("Failed to attach action log")?;
        let mut cmd = self.base_command();
        cmd.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));

        let status = cmd
            .spawn()
            .map_err(|e| self.spawn_error(e))?
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", self.command_line()))?;

        if !status.success() {
            return Err(LinkerError::NpmCommandError {
                step: self.step_label(),
                cwd: self.current_dir.display().to_string(),
                stderr: format!("exited with {status}; output is in the action log"),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_line_and_label() {
        let cmd = NpmCommand::new("npm", "/work").args(["run", "build:lib"]);
        assert_eq!(cmd.command_line(), "npm run build:lib");
        assert_eq!(cmd.step_label(), "npm run build:lib");
        let cmd = cmd.label("Build");
        assert_eq!(cmd.step_label(), "Build");
    }

    #[tokio::test]
    async fn test_missing_program_is_npm_not_found() {
        let temp = TempDir::new().unwrap();
        let err = NpmCommand::new("ngx-linker-no-such-npm", temp.path())
            .args(["install"])
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<LinkerError>(), Some(LinkerError::NpmNotFound)));
    }

    #[tokio::test]
    async fn test_missing_directory_is_step_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("distribution").join("ngx-lib");
        let err = NpmCommand::new("npm", &missing).args(["link"]).execute().await.unwrap_err();
        match err.downcast_ref::<LinkerError>() {
            Some(LinkerError::NpmCommandError {
                step,
                stderr,
                ..
            }) => {
                assert_eq!(step, "npm link");
                assert!(stderr.contains("does not exist"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_failure_keeps_stderr_verbatim() {
        let temp = TempDir::new().unwrap();
        let err = NpmCommand::new("sh", temp.path())
            .args(["-c", "echo 'npm ERR! missing script: build:lib' >&2; exit 1"])
            .execute()
            .await
            .unwrap_err();
        match err.downcast_ref::<LinkerError>() {
            Some(LinkerError::NpmCommandError {
                stderr,
                ..
            }) => assert_eq!(stderr, "npm ERR! missing script: build:lib\n"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_execute_logged_appends_output() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("actions.log");
        let log = std::fs::OpenOptions::new().create(true).append(true).open(&log_path).unwrap();

        NpmCommand::new("sh", temp.path())
            .args(["-c", "echo built; echo warn >&2"])
            .execute_logged(&log)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("built"));
        assert!(content.contains("warn"));
    }
}
