// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::{ThemeError, Value};

/// Hex SHA-256 over one or more source texts.
///
/// Each part is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// An extracted theme: one root object plus where it came from.
///
/// Immutable once built. A refresh builds a new document; hosts swap the
/// `Arc` they publish instead of mutating this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDocument {
    root: Value,
    source_path: Option<PathBuf>,
    fingerprint: String,
}

impl ThemeDocument {
    /// Fails with [`ThemeError::Invariant`] when `root` is not an object; the
    /// loader only ever hands object literals to the converter, so anything
    /// else is a bug in the pipeline.
    pub fn new(root: Value, source_path: Option<PathBuf>, fingerprint: String) -> Result<Self, ThemeError> {
        if !root.is_object() {
            return Err(ThemeError::Invariant {
                message: format!(
                    "theme document root must be an object, got {}",
                    root.kind_name()
                ),
            });
        }
        Ok(ThemeDocument { root, source_path, fingerprint })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Top-level keys in declaration order.
    pub fn top_level_keys(&self) -> Vec<&str> {
        self.root
            .as_object()
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_fingerprint_is_stable_and_separates_parts() {
        assert_eq!(fingerprint(&["abc"]), fingerprint(&["abc"]));
        assert_ne!(fingerprint(&["ab", "c"]), fingerprint(&["a", "bc"]));
        assert_eq!(fingerprint(&["x"]).len(), 64);
    }

    #[test]
    fn test_non_object_root_is_an_invariant_violation() {
        let err = ThemeDocument::new(Value::List(vec![]), None, "fp".into()).unwrap_err();
        assert!(matches!(err, ThemeError::Invariant { .. }));
    }

    #[test]
    fn test_top_level_keys_in_order() {
        let mut entries = IndexMap::new();
        entries.insert("spacing".to_string(), Value::Number(8.0));
        entries.insert("palette".to_string(), Value::Object(IndexMap::new()));
        let doc = ThemeDocument::new(Value::Object(entries), None, "fp".into()).unwrap();
        assert_eq!(doc.top_level_keys(), vec!["spacing", "palette"]);
    }
}
