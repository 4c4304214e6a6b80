//! Cross-platform helpers and terminal progress

pub mod platform;
pub mod progress;

pub use platform::{
    command_exists, get_git_command, get_home_dir, get_npm_command, is_windows, normalize_path,
    paths_equal, resolve_path,
};
pub use progress::Spinner;
