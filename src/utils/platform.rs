//! Platform-specific helpers
//!
//! Everything that differs between Windows and Unix-like systems lives here:
//! executable names, path comparison, and `~` expansion.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// True on Windows
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// User's home directory, with a platform hint when it cannot be found.
///
/// # Errors
///
/// Fails when neither `HOME` nor `USERPROFILE` resolves.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Git executable name for this platform
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() { "git.exe" } else { "git" }
}

/// Default npm executable name for this platform
///
/// npm ships as a `.cmd` shim on Windows, which `CreateProcess` will not
/// resolve from a bare `npm`.
#[must_use]
pub const fn get_npm_command() -> &'static str {
    if is_windows() { "npm.cmd" } else { "npm" }
}

/// Expand `~` and environment variables in a user-supplied path.
///
/// Relative results are left relative; callers decide what they are relative
/// to.
///
/// # Errors
///
/// Fails when the path references an unset environment variable or the home
/// directory cannot be determined.
///
/// # Examples
///
/// ```rust,no_run
/// use ngx_linker::utils::platform::resolve_path;
///
/// let module = resolve_path("~/work/ngx-lib")?;
/// assert!(module.is_absolute());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full_with_context(path, home_dir_string, |var| {
        std::env::var(var).map(Some)
    })
    .with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn home_dir_string() -> Option<String> {
    get_home_dir().ok().map(|home| home.to_string_lossy().into_owned())
}

/// Compare two paths the way the filesystem would
///
/// Trailing separators are ignored on all platforms; comparison is
/// case-insensitive on Windows.
#[must_use]
pub fn paths_equal(path1: &Path, path2: &Path) -> bool {
    let p1_str = path1.to_string_lossy();
    let p2_str = path2.to_string_lossy();
    if is_windows() {
        let p1 = p1_str.trim_end_matches(['/', '\\']).to_lowercase();
        let p2 = p2_str.trim_end_matches(['/', '\\']).to_lowercase();
        p1 == p2
    } else {
        p1_str.trim_end_matches('/') == p2_str.trim_end_matches('/')
    }
}

/// Absolute form of `path` with `.` and `..` folded lexically
///
/// Symlinks are not resolved and the path need not exist. A `..` at the
/// filesystem root stays at the root.
///
/// # Errors
///
/// Fails when `path` is relative and the working directory cannot be read.
pub fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to make {} absolute", path.display()))?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// True when `cmd` resolves on `PATH` (or is an existing path)
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}
