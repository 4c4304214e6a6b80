//! One-line user notifications
//!
//! Every notification carries the tool's prefix so it stands out among npm
//! and git output in the same terminal.

use colored::Colorize;

use crate::constants::NOTIFICATION_PREFIX;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Success or neutral information
    Info,
    /// Something stopped the action but nothing is broken
    Warning,
    /// An action failed
    Error,
}

/// Uncolored notification text
#[must_use]
pub fn format_notification(level: Level, message: &str) -> String {
    let marker = match level {
        Level::Info => "✅",
        Level::Warning => "⚠️ ",
        Level::Error => "❌",
    };
    format!("{marker} {NOTIFICATION_PREFIX}: {message}")
}

/// Green line on stdout
pub fn info(message: impl AsRef<str>) {
    println!("{}", format_notification(Level::Info, message.as_ref()).green());
}

/// Yellow line on stdout
pub fn warn(message: impl AsRef<str>) {
    println!("{}", format_notification(Level::Warning, message.as_ref()).yellow());
}

/// Red line on stderr
pub fn error(message: impl AsRef<str>) {
    eprintln!("{}", format_notification(Level::Error, message.as_ref()).red());
}
