//! Integration test suite for ngx-link
//!
//! These tests drive the compiled binary against temp-directory fixtures:
//! a host project, an ngx-lib checkout, and (on unix) a shell script
//! standing in for npm.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **status**: status line and JSON output
//! - **configure**: module path validation and persistence
//! - **config**: the settings subcommands
//! - **branches**: listing and switching branches of the checkout
//! - **actions**: build, link, and build-and-link through the fake npm

#[path = "../common/mod.rs"]
mod common;

mod actions;
mod branches;
mod config;
mod configure;
mod status;
