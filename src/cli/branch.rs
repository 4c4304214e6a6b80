//! `ngx-link switch-branch` and `ngx-link branches`

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::common::{CommandContext, choose_branch, fetch_branches, switch_to_branch};
use crate::git::GitRepo;
use crate::ui::notify;

/// Check out a branch of the linked module
#[derive(Args)]
pub struct SwitchBranchCommand {
    /// Branch to check out (e.g. `develop` or `origin/feature/x`); prompts when omitted
    branch: Option<String>,

    /// Skip `git fetch` before listing branches
    #[arg(long)]
    no_fetch: bool,
}

impl SwitchBranchCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        let Some(module) = ctx.require_module_path().await? else {
            return Ok(());
        };

        let branch = match self.branch {
            Some(branch) => branch,
            None => {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                match choose_branch(&module, !self.no_fetch, &mut lines).await? {
                    Some(branch) => branch,
                    None => return Ok(()),
                }
            }
        };

        switch_to_branch(&module, &branch).await
    }
}

/// List local and remote branches of the linked module
#[derive(Args)]
pub struct BranchesCommand {
    /// Skip `git fetch` before listing
    #[arg(long)]
    no_fetch: bool,
}

impl BranchesCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        let Some(module) = ctx.require_module_path().await? else {
            return Ok(());
        };

        let branches = fetch_branches(&module, !self.no_fetch).await?;
        if branches.is_empty() {
            notify::info("No branches found.");
            return Ok(());
        }

        let current = GitRepo::new(&module).current_branch().await;
        for branch in branches {
            let marker = if branch == current { "*" } else { " " };
            println!("{marker} {branch}");
        }
        Ok(())
    }
}
