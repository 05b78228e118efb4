// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use super::expand_path;
use super::manifest::ThemeManifest;
use crate::parser::parse;
use crate::resolver::ImportResolver;
use crate::syntax::SyntaxTree;

/// Extensions tried, in order, for a specifier without one.
pub const SOURCE_EXTENSIONS: [&str; 6] = ["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Resolves imports against the file system.
///
/// Handles relative specifiers (`./theme`, `../tokens/palette`), `~/` and
/// absolute paths, plus aliases registered from a [`ThemeManifest`]. Bare
/// package specifiers (`@mui/material`) never resolve.
#[derive(Debug, Clone, Default)]
pub struct FsImportResolver {
    aliases: HashMap<String, PathBuf>,
}

impl FsImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets each manifest alias be used as an import specifier.
    pub fn with_manifest(mut self, manifest: &ThemeManifest) -> Self {
        for (alias, path) in manifest.entries() {
            self.aliases.insert(alias.to_string(), path.to_path_buf());
        }
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.aliases.insert(alias.into(), path.into());
        self
    }

    /// The file a specifier points at, if it exists.
    pub fn find_file(&self, from: Option<&Path>, specifier: &str) -> Option<PathBuf> {
        let base = if let Some(path) = self.aliases.get(specifier) {
            path.clone()
        } else if specifier.starts_with("./") || specifier.starts_with("../") {
            let dir = from?.parent()?;
            dir.join(specifier)
        } else if specifier.starts_with("~/") || Path::new(specifier).is_absolute() {
            expand_path(specifier, Path::new("/"))
        } else {
            debug!("Not following package import '{}'", specifier);
            return None;
        };

        candidates(&normalize(&base)).into_iter().find(|candidate| candidate.is_file())
    }
}

/// Folds `.` and `..` lexically so the same file always has the same path.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `base` itself, `base.<ext>`, `base/index.<ext>`. A `.js` specifier also
/// tries the TypeScript source next to it.
fn candidates(base: &Path) -> Vec<PathBuf> {
    let mut out = vec![base.to_path_buf()];

    if matches!(base.extension().and_then(|e| e.to_str()), Some("js" | "jsx" | "mjs" | "cjs")) {
        out.push(base.with_extension("ts"));
        out.push(base.with_extension("tsx"));
    }

    for ext in SOURCE_EXTENSIONS {
        let mut with_ext = base.as_os_str().to_owned();
        with_ext.push(".");
        with_ext.push(ext);
        out.push(PathBuf::from(with_ext));
    }

    for ext in SOURCE_EXTENSIONS {
        out.push(base.join(format!("index.{}", ext)));
    }

    out
}

impl ImportResolver for FsImportResolver {
    fn resolve_import(&self, from: Option<&Path>, specifier: &str) -> Option<Arc<SyntaxTree>> {
        let path = match self.find_file(from, specifier) {
            Some(path) => path,
            None => {
                debug!("Import '{}' did not resolve to a file", specifier);
                return None;
            }
        };

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to read '{}': {}", path.display(), e);
                return None;
            }
        };

        match parse(&source, Some(path.clone())) {
            Ok(tree) => Some(Arc::new(tree)),
            Err(e) => {
                warn!("Failed to parse '{}': {}", path.display(), e);
                None
            }
        }
    }
}
