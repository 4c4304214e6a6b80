//! `ngx-link status`: the one-line status indicator

use anyhow::Result;
use clap::Args;

use crate::cli::common::CommandContext;

/// Print the module branch and link state
#[derive(Args)]
pub struct StatusCommand {
    /// Emit the full state as JSON
    #[arg(long)]
    json: bool,
}

impl StatusCommand {
    pub async fn execute(self, mut ctx: CommandContext) -> Result<()> {
        let state = ctx.state().await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&state)?);
        } else {
            println!("{}", state.status_line());
        }
        Ok(())
    }
}
