// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::ThemeError;
use crate::document::ThemeDocument;
use crate::engine::Engine;
use crate::present::flatten_entries;
use crate::resolver::ImportResolver;
use crate::Value;

/// Export a theme document to pretty-printed JSON.
///
/// The theme itself is written as plain JSON:
/// - Strings, numbers, booleans, null → direct mapping
/// - Objects keep declaration order
/// - Unevaluated expressions → their source text
///
/// Because unevaluated values are indistinguishable from strings once
/// exported, their dotted paths are listed under `"unresolved"`.
///
/// # Examples
/// ```no_run
/// use theme_lens::{Engine, NoImports, export};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::default();
/// let source = std::fs::read_to_string("src/theme.ts")?;
/// if let Some(doc) = engine.load_theme_source(None, &source, &NoImports)? {
///     println!("{}", export::export_document_to_json(&doc)?);
/// }
/// # Ok(())
/// # }
/// ```
pub fn export_document_to_json(doc: &ThemeDocument) -> Result<String, ThemeError> {
    let unresolved: Vec<String> = flatten_entries(doc.root())
        .into_iter()
        .filter(|(_, value)| value.is_unresolved())
        .map(|(path, _)| path.to_string())
        .collect();

    let out = json!({
        "source": doc.source_path().map(|p| p.display().to_string()),
        "fingerprint": doc.fingerprint(),
        "theme": doc.root(),
        "unresolved": unresolved,
    });

    to_pretty(&out)
}

/// Export every leaf as a `"dotted.key": value` pair, the shape used by the
/// legacy flat-key completion.
pub fn export_flat_keys(root: &Value) -> Result<String, ThemeError> {
    let flat: serde_json::Map<String, serde_json::Value> = flatten_entries(root)
        .into_iter()
        .map(|(path, value)| Ok((path.to_string(), serde_json::to_value(value).map_err(serialize_error)?)))
        .collect::<Result<_, ThemeError>>()?;

    to_pretty(&serde_json::Value::Object(flat))
}

/// Read a JS/TS theme file, locate its theme and export it to JSON.
///
/// `Ok(None)` when the file has no recognisable theme.
///
/// # Errors
/// Returns error if the file can't be read or fails to tokenize.
pub fn export_theme_file(
    engine: &Engine,
    path: &Path,
    imports: &dyn ImportResolver,
) -> Result<Option<String>, ThemeError> {
    let source = fs::read_to_string(path).map_err(|e| {
        ThemeError::file_error(format!("Failed to read file: {}", e), path.display().to_string())
    })?;

    match engine.load_theme_source(Some(path.to_path_buf()), &source, imports)? {
        Some(doc) => export_document_to_json(&doc).map(Some),
        None => Ok(None),
    }
}

fn to_pretty(value: &serde_json::Value) -> Result<String, ThemeError> {
    serde_json::to_string_pretty(value).map_err(serialize_error)
}

fn serialize_error(e: serde_json::Error) -> ThemeError {
    ThemeError::type_error(
        format!("Failed to serialize theme: {}", e),
        "Theme values must be representable as JSON",
        500,
    )
}
