//! Core types shared by every layer of ngx-linker.
//!
//! Currently this is the error vocabulary: [`LinkerError`] for typed failures,
//! [`ErrorContext`] for the user-facing rendering, and [`user_friendly_error`]
//! to bridge from `anyhow`.

pub mod error;

pub use error::{ErrorContext, LinkerError, user_friendly_error};
