//! Terminal spinner for indeterminate work
//!
//! A thin wrapper over `indicatif` that hides itself when output is not
//! meant for a person: `NGX_LINKER_NO_PROGRESS` set, or stderr not a
//! terminal.
//!
//! ```rust
//! use ngx_linker::utils::progress::Spinner;
//!
//! let spinner = Spinner::new("Fetching branches…");
//! // let branches = repo.list_branches(true).await?;
//! spinner.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Environment variable that disables all progress output
pub const NO_PROGRESS_ENV: &str = "NGX_LINKER_NO_PROGRESS";

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some() || !std::io::stderr().is_terminal()
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Animated spinner; a no-op when progress is disabled
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Start spinning with `msg`
    pub fn new(msg: impl Into<String>) -> Self {
        let inner = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        inner.set_message(msg.into());
        Self {
            inner,
        }
    }

    /// Replace the message
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Stop and leave `msg` in place
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    /// Stop and erase the line
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether anything is actually drawn
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}
