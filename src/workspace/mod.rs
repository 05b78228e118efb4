// Author: Dustin Pilgrim
// License: MIT

//! Host-side adapters: reading theme files from disk, the
//! `theme-imports.json` manifest, and a cache of loaded documents.
//!
//! Nothing in the analysis core depends on this module; it only implements
//! [`ImportResolver`](crate::ImportResolver) and holds results.

use std::path::{Path, PathBuf};

mod cache;
mod fs;
mod manifest;

pub use cache::{Refresh, ThemeCache};
pub use fs::{FsImportResolver, SOURCE_EXTENSIONS};
pub use manifest::{MANIFEST_FILE_NAME, ThemeManifest, load_json_themes};

/// Expand `~/` and resolve relative paths against `base_dir`.
pub(crate) fn expand_path(raw_path: &str, base_dir: &Path) -> PathBuf {
    let path_str = raw_path.trim();

    if let Some(rest) = path_str.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }

    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        return path;
    }

    base_dir.join(path)
}

#[cfg(test)]
mod tests;
