//! Derived link/branch state and its one-line rendering

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::git::GitRepo;
use crate::link::is_linked;

/// Everything the status line and the panel show
///
/// Never persisted; rebuilt from git and the filesystem on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct PanelState {
    /// Configured module root, if any
    pub module_path: Option<PathBuf>,
    /// Current branch of the module; `None` when not configured
    pub branch: Option<String>,
    /// Whether the host resolves the package to the module's build output
    pub linked: bool,
    /// Whether the host project is the linked module itself
    pub is_ngx_project: bool,
    /// When this state was computed
    pub refreshed_at: DateTime<Local>,
}

impl PanelState {
    /// Whether a module path is configured
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.module_path.is_some()
    }

    /// `Linked` or `Not Linked`
    #[must_use]
    pub const fn link_label(&self) -> &'static str {
        if self.linked { "Linked" } else { "Not Linked" }
    }

    /// `NGX: Not Configured` or `NGX: <branch> [Linked|Not Linked]`
    #[must_use]
    pub fn status_line(&self) -> String {
        match &self.branch {
            Some(branch) if self.is_configured() => {
                format!("NGX: {branch} [{}]", self.link_label())
            }
            _ => "NGX: Not Configured".to_string(),
        }
    }
}

/// Recompute the full state for `host_root`
pub async fn load_state(
    host_root: &Path,
    module_path: Option<&Path>,
    is_ngx_project: bool,
) -> PanelState {
    let Some(module) = module_path else {
        return PanelState {
            module_path: None,
            branch: None,
            linked: false,
            is_ngx_project,
            refreshed_at: Local::now(),
        };
    };

    let branch = GitRepo::new(module).current_branch().await;
    let linked = is_linked(host_root, module);
    tracing::debug!(target: "refresh", "State: branch={} linked={}", branch, linked);

    PanelState {
        module_path: Some(module.to_path_buf()),
        branch: Some(branch),
        linked,
        is_ngx_project,
        refreshed_at: Local::now(),
    }
}
