//! ngx-linker: branch switching, building, and npm-linking of
//! `@vfde-care/ngx-lib` into host projects
//!
//! The crate backs the `ngx-link` binary. A developer working in a host
//! project (an allow-listed Angular app) points the tool at a local checkout
//! of the shared library once; afterwards the tool can:
//!
//! - report which branch the checkout is on and whether the host currently
//!   resolves the package to the checkout's build output
//! - switch the checkout's branch, creating a tracking branch for remote refs
//! - run `npm run build:lib` and the two `npm link` steps, supervised or
//!   detached with link-state polling
//!
//! It never edits manifests or lockfiles; all real work is delegated to the
//! system `git` and `npm`.
//!
//! # Modules
//!
//! - [`manifest`] - project-root discovery and `package.json` validation
//! - [`link`] - symlink-chain based link detection
//! - [`git`] - branch listing and checkout through the git CLI
//! - [`npm`] - build/link plans and their execution
//! - [`refresh`] - the polling state machine used after detached actions
//! - [`ui`] - notifications, status line, panel rendering
//! - [`cli`] - clap command surface and the interactive panel loop
//! - [`config`] - the user settings file
//! - [`core`] - error types and user-facing error reports

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod git;
pub mod link;
pub mod manifest;
pub mod npm;
pub mod refresh;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
