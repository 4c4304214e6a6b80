//! Shared plumbing for subcommands
//!
//! Every subcommand except `config` runs inside a [`CommandContext`]: the
//! host project root, the settings manager, and whether the host is the
//! linked module itself. The helpers below are used by both the one-shot
//! subcommands and the interactive panel.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncWriteExt, Lines};

use crate::config::SettingsManager;
use crate::constants::ACTION_LOG_FILE;
use crate::core::LinkerError;
use crate::git::GitRepo;
use crate::manifest::{
    ManifestError, find_project_root, is_eligible_project, is_ngx_project, validate_ngx_path,
};
use crate::ui::{self, PanelState, notify};
use crate::utils::platform::{command_exists, resolve_path};
use crate::utils::progress::Spinner;

/// Resolved environment for one invocation
pub struct CommandContext {
    /// Root of the host project
    pub host_root: PathBuf,
    /// Settings for this invocation
    pub settings: SettingsManager,
    /// Whether the host project is the linked module itself
    pub is_ngx_project: bool,
}

impl CommandContext {
    /// Locate the host project from `project` (or the working directory) and
    /// check it is eligible
    ///
    /// # Errors
    ///
    /// - [`LinkerError::NoWorkspaceRoot`] when no `package.json` is found
    /// - [`LinkerError::ProjectNotEligible`] when the host is not allow-listed
    pub async fn resolve(project: Option<PathBuf>, mut settings: SettingsManager) -> Result<Self> {
        let start = match project {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        let host_root = find_project_root(&start).map_err(|_| LinkerError::NoWorkspaceRoot)?;
        tracing::debug!("Host project root: {}", host_root.display());

        let allowed = settings.get().await?.allowed_projects.clone();
        if !is_eligible_project(&host_root, &allowed).await {
            return Err(LinkerError::ProjectNotEligible {
                path: host_root.display().to_string(),
            }
            .into());
        }

        let is_ngx_project = is_ngx_project(&host_root).await;
        Ok(Self {
            host_root,
            settings,
            is_ngx_project,
        })
    }

    /// Configured module path, expanded
    ///
    /// # Errors
    ///
    /// Fails when the settings file cannot be parsed.
    pub async fn module_path(&mut self) -> Result<Option<PathBuf>> {
        Ok(self.settings.get().await?.module_path())
    }

    /// Module path, or a "not configured" warning and `None`
    ///
    /// # Errors
    ///
    /// Fails when the settings file cannot be parsed.
    pub async fn require_module_path(&mut self) -> Result<Option<PathBuf>> {
        let path = self.module_path().await?;
        if path.is_none() {
            notify::warn(LinkerError::ModulePathNotConfigured.to_string());
        }
        Ok(path)
    }

    /// npm executable from the settings
    ///
    /// # Errors
    ///
    /// Fails when the settings file cannot be parsed.
    pub async fn npm_command(&mut self) -> Result<String> {
        Ok(self.settings.get().await?.npm_command.clone())
    }

    /// Refuse linking actions inside the linked module itself
    ///
    /// # Errors
    ///
    /// [`LinkerError::ActionDisabled`] when the host is the linked module.
    pub fn ensure_linking_allowed(&self, action: &str) -> Result<()> {
        if self.is_ngx_project {
            return Err(LinkerError::ActionDisabled {
                action: action.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Fresh [`PanelState`]
    ///
    /// # Errors
    ///
    /// Fails when the settings file cannot be parsed.
    pub async fn state(&mut self) -> Result<PanelState> {
        let module = self.module_path().await?;
        Ok(ui::load_state(&self.host_root, module.as_deref(), self.is_ngx_project).await)
    }

    /// Where detached actions write their output
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.settings
            .path()
            .parent()
            .map_or_else(|| PathBuf::from(ACTION_LOG_FILE), |dir| dir.join(ACTION_LOG_FILE))
    }

    /// Drop a configured path that no longer validates
    ///
    /// Returns the reason when the setting was cleared.
    ///
    /// # Errors
    ///
    /// Fails when the settings cannot be read or saved.
    pub async fn clear_invalid_module_path(&mut self) -> Result<Option<ManifestError>> {
        let Some(path) = self.module_path().await? else {
            return Ok(None);
        };
        match validate_ngx_path(&path).await {
            Ok(_) => Ok(None),
            Err(reason) => {
                tracing::info!("Clearing invalid module path {}: {}", path.display(), reason);
                self.settings.get_mut().await?.ngx_module_path = None;
                self.settings.save().await?;
                Ok(Some(reason))
            }
        }
    }
}

/// Validate `input` and store the validated project root
///
/// The setting is left untouched when validation fails.
///
/// # Errors
///
/// [`LinkerError::InvalidModulePath`] with the specific reason, or an I/O
/// error saving the settings.
pub async fn apply_module_path(settings: &mut SettingsManager, input: &str) -> Result<PathBuf> {
    let candidate = resolve_path(input)?;
    let root = validate_ngx_path(&candidate).await.map_err(|reason| LinkerError::InvalidModulePath {
        reason,
    })?;
    settings.get_mut().await?.ngx_module_path = Some(root.clone());
    settings.save().await?;
    Ok(root)
}

/// Launch `<editor> -n <module>` without waiting for it
///
/// # Errors
///
/// Fails when the editor cannot be found or spawned.
pub fn open_in_editor(editor: &str, module: &Path) -> Result<()> {
    if !command_exists(editor) {
        return Err(LinkerError::Other {
            message: format!("Editor command '{editor}' not found in PATH"),
        }
        .into());
    }
    tracing::debug!("Opening {} with {}", module.display(), editor);
    std::process::Command::new(editor)
        .arg("-n")
        .arg(module)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {editor}"))?;
    Ok(())
}

/// List branches behind a spinner
///
/// # Errors
///
/// Fails when git cannot list branches.
pub async fn fetch_branches(module: &Path, refresh: bool) -> Result<Vec<String>> {
    let spinner = Spinner::new("Fetching branches…");
    let result = GitRepo::new(module).list_branches(refresh).await;
    spinner.finish_and_clear();
    result.context("Failed to list branches")
}

/// Check out `branch` and report it
///
/// # Errors
///
/// [`LinkerError::GitCheckoutFailed`] with git's stderr.
pub async fn switch_to_branch(module: &Path, branch: &str) -> Result<()> {
    GitRepo::new(module).checkout_branch(branch).await?;
    notify::info(format!("Switched ngx-module to branch {branch}."));
    Ok(())
}

/// Match user input against a numbered list: `1`-based index or exact name
#[must_use]
pub fn parse_selection<'a>(input: &str, options: &'a [String]) -> Option<&'a str> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| options.get(i)).map(String::as_str);
    }
    options.iter().find(|option| *option == input).map(String::as_str)
}

/// Print `prompt` and read one line
///
/// # Errors
///
/// Fails on I/O errors; end of input is `Ok(None)`.
pub async fn prompt_line<R>(lines: &mut Lines<R>, prompt: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

/// Ask a yes/no question; anything but `y`/`yes` is no
///
/// # Errors
///
/// Fails on I/O errors.
pub async fn confirm<R>(lines: &mut Lines<R>, question: &str) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let answer = prompt_line(lines, &format!("{question} [y/N] ")).await?;
    Ok(answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
}

/// Show a numbered branch list and read a choice
///
/// Returns `None` when there are no branches (after saying so) or the input
/// matches nothing.
///
/// # Errors
///
/// Fails when listing branches or reading input fails.
pub async fn choose_branch<R>(
    module: &Path,
    refresh: bool,
    lines: &mut Lines<R>,
) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let branches = fetch_branches(module, refresh).await?;
    if branches.is_empty() {
        notify::info("No branches found.");
        return Ok(None);
    }

    let current = GitRepo::new(module).current_branch().await;
    for (i, branch) in branches.iter().enumerate() {
        let marker = if *branch == current { "*" } else { " " };
        println!("{marker} {:>3}) {branch}", i + 1);
    }

    let Some(input) = prompt_line(lines, "Select a branch to switch to: ").await? else {
        return Ok(None);
    };
    match parse_selection(&input, &branches) {
        Some(branch) => Ok(Some(branch.to_string())),
        None => {
            if !input.trim().is_empty() {
                notify::warn(format!("No branch matches '{}'.", input.trim()));
            }
            Ok(None)
        }
    }
}
