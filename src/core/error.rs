//! Error handling for ngx-linker
//!
//! Two layers, same as every command in the crate:
//! 1. [`LinkerError`] - strongly-typed failures raised by the adapters
//! 2. [`ErrorContext`] - a wrapper adding details and a suggestion for CLI users
//!
//! Every fallible operation returns [`anyhow::Result`]; `main` hands the final
//! error to [`user_friendly_error`] which downcasts back to [`LinkerError`] when
//! possible and prints a colored report.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ngx_linker::core::{LinkerError, ErrorContext, user_friendly_error};
//!
//! let err = anyhow::Error::from(LinkerError::ModulePathNotConfigured);
//! user_friendly_error(err).display();
//!
//! let ctx = ErrorContext::new(LinkerError::GitNotFound)
//!     .with_suggestion("Install git and make sure it is on PATH");
//! println!("{ctx}");
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::constants::{MANIFEST_FILE, NGX_PACKAGE_NAME};
use crate::manifest::ManifestError;

/// The main error type for ngx-linker operations
///
/// Variants map onto the failure taxonomy of the tool:
/// - configuration missing: [`ModulePathNotConfigured`](LinkerError::ModulePathNotConfigured)
/// - validation failure: [`InvalidModulePath`](LinkerError::InvalidModulePath),
///   [`ProjectNotEligible`](LinkerError::ProjectNotEligible)
/// - external tool failure: the `Git*` and `Npm*` variants, carrying stderr verbatim
#[derive(Error, Debug, Clone)]
pub enum LinkerError {
    /// A git command returned a non-zero exit code
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git subcommand that failed (e.g. "fetch", "branch")
        operation: String,
        /// Raw stderr from git
        stderr: String,
    },

    /// Git executable not found in PATH
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// `git checkout` failed for the requested reference
    #[error("Failed to checkout branch {reference}")]
    GitCheckoutFailed {
        /// The branch or ref that could not be checked out
        reference: String,
        /// Raw stderr from git
        reason: String,
    },

    /// An npm step of a build/link plan failed
    #[error("npm step failed: {step}")]
    NpmCommandError {
        /// Human label of the step (e.g. "npm run build:lib")
        step: String,
        /// Directory the step ran in
        cwd: String,
        /// Raw stderr from npm
        stderr: String,
    },

    /// npm executable not found in PATH
    #[error("npm is not installed or not found in PATH")]
    NpmNotFound,

    /// No linked module path has been configured yet
    #[error("ngx module path not configured.")]
    ModulePathNotConfigured,

    /// The host project directory could not be determined
    #[error("No workspace folder detected.")]
    NoWorkspaceRoot,

    /// A candidate module path failed validation
    #[error("{reason}")]
    InvalidModulePath {
        /// The validation failure
        reason: ManifestError,
    },

    /// The host project is not on the allow-list
    #[error("Project at {path} is not eligible for ngx-lib linking")]
    ProjectNotEligible {
        /// Host project root
        path: String,
    },

    /// An action is disabled because the host is the linked module itself
    #[error("{action} is disabled inside the {NGX_PACKAGE_NAME} project")]
    ActionDisabled {
        /// The action that was refused
        action: String,
    },

    /// Any other failure
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// An error together with optional details and a suggestion
///
/// Details are printed in yellow, suggestions in green, the error itself in
/// bold red.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: LinkerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion
    #[must_use]
    pub const fn new(error: LinkerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

impl From<ManifestError> for LinkerError {
    fn from(reason: ManifestError) -> Self {
        Self::InvalidModulePath {
            reason,
        }
    }
}

/// Convert any error into an [`ErrorContext`] with tailored suggestions
///
/// [`LinkerError`] values are recognised through the anyhow chain; I/O errors
/// get generic permission/not-found hints; anything else is reported with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(linker_error) = error.downcast_ref::<LinkerError>() {
        return create_error_context(linker_error.clone());
    }

    if let Some(ctx_error) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx_error.error.clone(),
            suggestion: ctx_error.suggestion.clone(),
            details: ctx_error.details.clone(),
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LinkerError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check ownership and permissions of the project directories");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LinkerError::Other {
                    message: format!("Not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(LinkerError::Other {
        message,
    })
}

fn create_error_context(error: LinkerError) -> ErrorContext {
    match &error {
        LinkerError::GitNotFound => ErrorContext::new(error.clone())
            .with_suggestion("Install git from https://git-scm.com/ or your package manager")
            .with_details("Branch switching runs git inside the ngx module checkout"),

        LinkerError::GitCommandError { stderr, .. } => ErrorContext::new(error.clone())
            .with_details(stderr.trim().to_string())
            .with_suggestion("Run the git command manually inside the ngx module to see the full output"),

        LinkerError::GitCheckoutFailed { reason, .. } => ErrorContext::new(error.clone())
            .with_details(reason.trim().to_string())
            .with_suggestion("Commit or stash local changes in the ngx module, then retry"),

        LinkerError::NpmCommandError { stderr, cwd, .. } => ErrorContext::new(error.clone())
            .with_details(format!("in {cwd}\n{}", stderr.trim()))
            .with_suggestion("Fix the failure and re-run the same action; completed steps are safe to repeat"),

        LinkerError::NpmNotFound => ErrorContext::new(error.clone())
            .with_suggestion("Install Node.js (which ships npm) or set `npm_command` in the settings file"),

        LinkerError::ModulePathNotConfigured => ErrorContext::new(error.clone())
            .with_suggestion("Run 'ngx-link configure <path-to-ngx-module>'"),

        LinkerError::NoWorkspaceRoot => ErrorContext::new(error.clone())
            .with_suggestion(format!("Run the command inside a project that has a {MANIFEST_FILE}, or pass --project")),

        LinkerError::InvalidModulePath { .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Point the setting at a checkout of {NGX_PACKAGE_NAME}")),

        LinkerError::ProjectNotEligible { .. } => ErrorContext::new(error.clone())
            .with_details("The project name must be on the allow-list and its repoOwner must match the team owner")
            .with_suggestion("Add the project with 'ngx-link config allow <name>' if it should be supported"),

        _ => ErrorContext::new(error),
    }
}
