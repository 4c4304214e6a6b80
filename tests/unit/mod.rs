//! Unit test suite for ngx-linker
//!
//! Exercises the library API directly, without the binary.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod link_workflow_tests;
mod settings_tests;
