//! Text rendering of the interactive panel
//!
//! The panel loop itself lives in [`crate::cli::panel`]; this module only
//! turns a [`PanelState`] into lines and maps keys to [`PanelAction`]s.

use colored::Colorize;

use crate::ui::status::PanelState;

/// Warning shown when the host project is the linked module itself
pub const NGX_PROJECT_WARNING: &str = "The currently opened window is the NGX module project. Open Window and Linking actions are disabled.";

/// Something the user can trigger from the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    /// `npm run build:lib`
    Build,
    /// `npm link` twice
    Link,
    /// Build, then link
    BuildAndLink,
    /// Pick and check out a branch
    ChangeBranch,
    /// Open the module in a new editor window
    OpenWindow,
    /// `npm start`
    Start,
    /// `npm install`, optionally clean or with `--legacy-peer-deps`
    Install,
    /// Set the module path
    SetPath,
    /// Recompute state
    Refresh,
    /// Leave the panel
    Quit,
}

impl PanelAction {
    /// In display order
    pub const ALL: [Self; 10] = [
        Self::Build,
        Self::Link,
        Self::BuildAndLink,
        Self::ChangeBranch,
        Self::OpenWindow,
        Self::Start,
        Self::Install,
        Self::SetPath,
        Self::Refresh,
        Self::Quit,
    ];

    /// Key that triggers the action
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Build => 'b',
            Self::Link => 'l',
            Self::BuildAndLink => 'a',
            Self::ChangeBranch => 'c',
            Self::OpenWindow => 'o',
            Self::Start => 's',
            Self::Install => 'i',
            Self::SetPath => 'p',
            Self::Refresh => 'r',
            Self::Quit => 'q',
        }
    }

    /// Button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Link => "Link",
            Self::BuildAndLink => "Build & Link",
            Self::ChangeBranch => "Change Git branch",
            Self::OpenWindow => "Open Window",
            Self::Start => "Start NGX",
            Self::Install => "Install dependencies",
            Self::SetPath => "Set ngx module path",
            Self::Refresh => "Refresh",
            Self::Quit => "Quit",
        }
    }

    /// Parse one input line; case-insensitive, surrounding blanks ignored
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let key = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.into_iter().find(|action| action.key() == key)
    }

    /// Whether the action is offered for `state`
    #[must_use]
    pub const fn is_enabled(self, state: &PanelState) -> bool {
        !(state.is_ngx_project && self.is_linking())
    }

    /// Actions that make no sense inside the linked module itself
    #[must_use]
    pub const fn is_linking(self) -> bool {
        matches!(self, Self::Link | Self::BuildAndLink | Self::OpenWindow)
    }

    /// Actions whose completion is only observable by polling link state
    #[must_use]
    pub const fn starts_polling(self) -> bool {
        matches!(self, Self::Build | Self::Link | Self::BuildAndLink | Self::Start)
    }
}

/// Render the panel to plain lines (colored when the terminal allows)
#[must_use]
pub fn render(state: &PanelState, polling: bool) -> Vec<String> {
    let mut lines = vec![format!("{}", "Ngx Module Linker".bold())];

    if state.is_ngx_project {
        lines.push(format!("{}", NGX_PROJECT_WARNING.yellow()));
    }

    let path = match &state.module_path {
        Some(path) => path.display().to_string(),
        None => "not configured".dimmed().to_string(),
    };
    lines.push(format!("  Ngx module path: {path}"));

    if state.is_configured() {
        let branch = state.branch.as_deref().unwrap_or_default();
        lines.push(format!("  Current branch:  {}", branch.cyan()));
        let pill = if state.linked {
            format!(" {} ", state.link_label()).black().on_green()
        } else {
            format!(" {} ", state.link_label()).white().on_red()
        };
        lines.push(format!("  Status:          {pill}"));
    }

    let suffix = if polling { "  (watching for changes…)" } else { "" };
    lines.push(format!(
        "  Refreshed {}{suffix}",
        state.refreshed_at.format("%H:%M:%S").to_string().dimmed()
    ));

    lines.push(String::new());
    let actions: Vec<String> = PanelAction::ALL
        .into_iter()
        .map(|action| {
            let item = format!("[{}] {}", action.key(), action.label());
            if action.is_enabled(state) { item } else { item.dimmed().strikethrough().to_string() }
        })
        .collect();
    for row in actions.chunks(4) {
        lines.push(format!("  {}", row.join("   ")));
    }
    lines
}
