//! Global constants used throughout the ngx-linker codebase.
//!
//! Package identity, filesystem layout assumptions, default settings, and the
//! timeouts that bound every external process and polling window.

use std::time::Duration;

/// Owner tag that every eligible `package.json` must carry in `repoOwner`.
pub const REPO_OWNER: &str = "@VFDE-Digital/team-webfactory-write";

/// npm package name of the linked module.
pub const NGX_PACKAGE_NAME: &str = "@vfde-care/ngx-lib";

/// Build output of the linked module, relative to its project root.
pub const NGX_DIST_RELATIVE: &str = "distribution/ngx-lib";

/// Manifest file that marks a project root.
pub const MANIFEST_FILE: &str = "package.json";

/// Directory npm installs (and links) dependencies into.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Branch label reported when git cannot tell us the current branch.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Prefix for every user-facing notification.
pub const NOTIFICATION_PREFIX: &str = "Ngx Module Linker";

/// npm script that builds the library into [`NGX_DIST_RELATIVE`].
pub const BUILD_SCRIPT: &str = "build:lib";

/// Projects allowed to use the linker when the settings file does not say otherwise.
pub const DEFAULT_ALLOWED_PROJECTS: &[&str] = &[
    "net-assistant",
    "onelogin",
    "after-sales",
    "account",
    "form-center",
    "payment",
    "ecare",
    "dsl-onboarding",
    "e-quotation",
    "cable-onboarding",
    "fiber-onboarding",
    "um-onboarding",
    NGX_PACKAGE_NAME,
];

/// Interval between link-state checks while a build or link is in flight.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Longest time the refresh controller keeps polling after an action.
pub const POLL_MAX_DURATION: Duration = Duration::from_secs(3 * 60);

/// Timeout for `git fetch --all --prune`.
pub const GIT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for quick local git queries (branch, rev-parse, checkout).
pub const GIT_LOCAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the log file detached actions write their output to.
pub const ACTION_LOG_FILE: &str = "actions.log";

/// Editor launched by `open` when the settings file does not name one.
pub const DEFAULT_EDITOR_COMMAND: &str = "code";

/// `tracing` targets this crate logs under: its module paths plus the
/// `git`, `npm`, and `refresh` targets.
pub const LOG_TARGETS: &[&str] = &["ngx_linker", "git", "npm", "refresh"];

/// `EnvFilter` directives enabling `level` for every [`LOG_TARGETS`] entry
pub fn log_directives(level: &str) -> String {
    LOG_TARGETS.iter().map(|target| format!("{target}={level}")).collect::<Vec<_>>().join(",")
}
