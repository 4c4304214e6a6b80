//! `ngx-link configure [PATH]`

use anyhow::Result;
use clap::Args;

use crate::cli::common::{CommandContext, apply_module_path};
use crate::ui::notify;

/// Show or set the linked module path
#[derive(Args)]
pub struct ConfigureCommand {
    /// Any path inside the ngx-lib checkout; the enclosing project root is stored
    path: Option<String>,
}

impl ConfigureCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        let Some(input) = self.path else {
            if let Some(path) = ctx.require_module_path().await? {
                notify::info(format!("Using ngx-module at {}", path.display()));
            }
            return Ok(());
        };

        let root = apply_module_path(&mut ctx.settings, &input).await?;
        notify::info(format!("Using ngx-module at {}", root.display()));
        Ok(())
    }
}
