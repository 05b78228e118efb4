// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::expand_path;
use crate::{ThemeError, Value};

pub const MANIFEST_FILE_NAME: &str = "theme-imports.json";

/// `theme-imports.json`: a JSON object mapping aliases to theme file paths,
/// relative to the manifest's own directory.
///
/// ```json
/// { "dark": "themes/dark.json", "brand": "src/theme.ts" }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeManifest {
    path: Option<PathBuf>,
    entries: IndexMap<String, PathBuf>,
}

impl ThemeManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ThemeError::file_error(format!("Failed to read manifest: {}", e), path.display().to_string())
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut manifest = Self::parse(&content, base_dir).map_err(|e| match e {
            ThemeError::Manifest { message, hint, code, .. } => ThemeError::Manifest {
                message,
                path: path.display().to_string(),
                hint,
                code,
            },
            other => other,
        })?;
        manifest.path = Some(path.to_path_buf());

        info!("Loaded theme manifest {} ({} entries)", path.display(), manifest.entries.len());
        Ok(manifest)
    }

    /// Parses manifest text, resolving entry paths against `base_dir`.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self, ThemeError> {
        let raw: IndexMap<String, String> =
            serde_json::from_str(content).map_err(|e| ThemeError::Manifest {
                message: format!("Invalid manifest: {}", e),
                path: MANIFEST_FILE_NAME.into(),
                hint: Some("Expected a JSON object of \"alias\": \"relative/path\" pairs".into()),
                code: Some(310),
            })?;

        let entries = raw
            .into_iter()
            .map(|(alias, raw_path)| {
                let resolved = expand_path(&raw_path, base_dir);
                (alias, resolved)
            })
            .collect();

        Ok(ThemeManifest { path: None, entries })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `(alias, resolved path)` in manifest order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(alias, path)| (alias.as_str(), path.as_path()))
    }

    pub fn get(&self, alias: &str) -> Option<&Path> {
        self.entries.get(alias).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct file names of the entries, for filtering change events.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for path in self.entries.values() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && !names.iter().any(|existing| existing == name)
            {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Whether a change to `path` should trigger a theme refresh: it is the
    /// manifest itself or has the file name of one of its entries.
    pub fn watches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name == MANIFEST_FILE_NAME || self.file_names().iter().any(|n| n == name)
    }
}

/// Reads every `.json` entry of the manifest as a theme object, keyed by alias.
///
/// Entries that cannot be read, are not valid JSON, or are not a non-empty
/// object are skipped with a warning.
pub fn load_json_themes(manifest: &ThemeManifest) -> IndexMap<String, Value> {
    let mut themes = IndexMap::new();

    for (alias, path) in manifest.entries() {
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            debug!("Skipping non-JSON manifest entry '{}'", alias);
            continue;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("JSON theme '{}' could not be read from {}: {}", alias, path.display(), e);
                continue;
            }
        };

        let json: serde_json::Value = match serde_json::from_str(&content) {
            Ok(json) => json,
            Err(e) => {
                warn!("JSON theme '{}' at {} is invalid: {}", alias, path.display(), e);
                continue;
            }
        };

        match Value::from(json) {
            Value::Object(entries) if !entries.is_empty() => {
                themes.insert(alias.to_string(), Value::Object(entries));
            }
            _ => warn!("JSON theme '{}' at {} is not a non-empty object", alias, path.display()),
        }
    }

    info!("Loaded JSON themes: {:?}", themes.keys().collect::<Vec<_>>());
    themes
}
