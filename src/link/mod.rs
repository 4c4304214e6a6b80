//! Link-state detection
//!
//! After `npm link` the host's `node_modules/@vfde-care/ngx-lib` is a symlink
//! into npm's global prefix, which is in turn a symlink to the module's build
//! output. The host counts as linked only when that whole chain ends at
//! `<module>/distribution/ngx-lib`.
//!
//! Detection never fails: anything unexpected (missing entry, a real
//! directory installed from the registry, a dangling link) reads as "not
//! linked".

use std::path::{Path, PathBuf};

use crate::constants::{DEPENDENCY_DIR, NGX_DIST_RELATIVE, NGX_PACKAGE_NAME};
use crate::utils::platform::paths_equal;

/// `<host>/node_modules/@vfde-care/ngx-lib`
#[must_use]
pub fn dependency_link_path(host_root: &Path) -> PathBuf {
    host_root.join(DEPENDENCY_DIR).join(NGX_PACKAGE_NAME)
}

/// `<module>/distribution/ngx-lib`
#[must_use]
pub fn expected_link_target(module_root: &Path) -> PathBuf {
    module_root.join(NGX_DIST_RELATIVE)
}

/// Whether the host's dependency entry resolves to the module's build output
#[must_use]
pub fn is_linked(host_root: &Path, module_root: &Path) -> bool {
    let link_path = dependency_link_path(host_root);

    match std::fs::symlink_metadata(&link_path) {
        Ok(meta) if meta.file_type().is_symlink() => {}
        Ok(_) => {
            tracing::debug!("{} is not a symlink", link_path.display());
            return false;
        }
        Err(_) => return false,
    }

    let Ok(resolved) = std::fs::canonicalize(&link_path) else {
        tracing::debug!("{} is a dangling link", link_path.display());
        return false;
    };
    let Ok(expected) = std::fs::canonicalize(expected_link_target(module_root)) else {
        return false;
    };

    paths_equal(&resolved, &expected)
}
