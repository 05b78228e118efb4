// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::document::ThemeDocument;
#[cfg(test)]
use crate::options::ResolverOptions;
#[cfg(test)]
use crate::parser::parse;
#[cfg(test)]
use crate::resolver::{ImportResolver, locate};
#[cfg(test)]
use crate::{ThemeError, Value};
#[cfg(test)]
use std::fs;
#[cfg(test)]
use tempfile::TempDir;

fn write(dir: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    fs::write(&path, content).expect("Failed to write file");
    path
}

fn document(source: &str) -> ThemeDocument {
    let mut entries = indexmap::IndexMap::new();
    entries.insert("source".to_string(), Value::String(source.into()));
    ThemeDocument::new(Value::Object(entries), None, crate::document::fingerprint(&[source]))
        .expect("Failed to build document")
}

#[test]
fn test_expand_path() {
    let base = Path::new("/project");
    assert_eq!(expand_path("themes/dark.json", base), PathBuf::from("/project/themes/dark.json"));
    assert_eq!(expand_path("/etc/theme.json", base), PathBuf::from("/etc/theme.json"));
    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_path("~/theme.ts", base), home.join("theme.ts"));
    }
}

#[test]
fn test_fs_resolver_relative_and_extensions() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "src/main.ts", "");
    let theme = write(&dir, "src/theme.ts", "export default { a: 1 };");
    let index = write(&dir, "src/tokens/index.js", "export const palette = {};");
    let shared = write(&dir, "shared/base.tsx", "export const base = {};");

    let resolver = FsImportResolver::new();
    assert_eq!(resolver.find_file(Some(&main), "./theme"), Some(theme.clone()));
    assert_eq!(resolver.find_file(Some(&main), "./theme.ts"), Some(theme.clone()));
    assert_eq!(resolver.find_file(Some(&main), "./theme.js"), Some(theme.clone()));
    assert_eq!(resolver.find_file(Some(&main), "./tokens"), Some(index));
    assert_eq!(resolver.find_file(Some(&main), "../shared/base"), Some(shared));

    let tree = resolver.resolve_import(Some(&main), "./theme").expect("Expected a tree");
    assert_eq!(tree.path(), Some(theme.as_path()));
    assert_eq!(tree.statements().len(), 1);
}

#[test]
fn test_fs_resolver_misses() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "main.ts", "");
    write(&dir, "broken.ts", "const a = 'unclosed");

    let resolver = FsImportResolver::new();
    assert!(resolver.resolve_import(Some(&main), "@mui/material").is_none());
    assert!(resolver.resolve_import(Some(&main), "./missing").is_none());
    assert!(resolver.resolve_import(None, "./theme").is_none());
    assert!(resolver.resolve_import(Some(&main), "./broken").is_none());
}

#[test]
fn test_fs_resolver_follows_theme_across_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/base.ts", "export const palette = { primary: { main: '#1976d2' } };");
    let main = write(
        &dir,
        "src/theme.ts",
        "import { palette } from './base';\nexport default createTheme(palette);",
    );

    let source = fs::read_to_string(&main).unwrap();
    let tree = parse(&source, Some(main)).unwrap();
    let resolver = FsImportResolver::new();
    let found = locate(&tree, &resolver, &ResolverOptions::default()).expect("Expected a theme");

    assert_eq!(found.hops(), 1);
    assert_eq!(found.tree().text(found.node()), "{ primary: { main: '#1976d2' } }");
}

#[test]
fn test_manifest_parse() {
    let manifest = ThemeManifest::parse(
        r#"{ "dark": "themes/dark.json", "light": "other/dark.json", "brand": "src/theme.ts" }"#,
        Path::new("/project"),
    )
    .expect("Failed to parse manifest");

    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest.get("dark"), Some(Path::new("/project/themes/dark.json")));
    let aliases: Vec<&str> = manifest.entries().map(|(alias, _)| alias).collect();
    assert_eq!(aliases, vec!["dark", "light", "brand"]);
    assert_eq!(manifest.file_names(), vec!["dark.json", "theme.ts"]);

    assert!(manifest.watches(Path::new("/anywhere/theme.ts")));
    assert!(manifest.watches(Path::new("/project/theme-imports.json")));
    assert!(!manifest.watches(Path::new("/project/src/index.ts")));
}

#[test]
fn test_manifest_errors() {
    let err = ThemeManifest::parse("[\"not\", \"an object\"]", Path::new("/")).unwrap_err();
    assert!(matches!(err, ThemeError::Manifest { code: Some(310), .. }));

    let dir = TempDir::new().unwrap();
    let path = write(&dir, MANIFEST_FILE_NAME, "{ broken");
    match ThemeManifest::from_file(&path).unwrap_err() {
        ThemeError::Manifest { path: reported, .. } => assert_eq!(reported, path.display().to_string()),
        other => panic!("unexpected error: {}", other),
    }

    let missing = ThemeManifest::from_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(missing, ThemeError::File { .. }));
}

#[test]
fn test_manifest_aliases_as_specifiers() {
    let dir = TempDir::new().unwrap();
    let theme = write(&dir, "src/theme.ts", "const theme = { spacing: 8 };");
    let manifest_path = write(&dir, MANIFEST_FILE_NAME, r#"{ "@theme": "src/theme.ts" }"#);
    let manifest = ThemeManifest::from_file(&manifest_path).unwrap();
    assert_eq!(manifest.path(), Some(manifest_path.as_path()));

    let resolver = FsImportResolver::new().with_manifest(&manifest);
    let tree = resolver.resolve_import(None, "@theme").expect("Expected a tree");
    assert_eq!(tree.path(), Some(theme.as_path()));
}

#[test]
fn test_load_json_themes_skips_bad_entries() {
    let dir = TempDir::new().unwrap();
    write(&dir, "themes/dark.json", r##"{ "colors": { "primary": "#000" }, "size": 2 }"##);
    write(&dir, "themes/broken.json", "{ nope");
    write(&dir, "themes/list.json", "[1, 2]");
    write(&dir, "themes/empty.json", "{}");
    write(&dir, "src/theme.ts", "const theme = {};");
    let manifest_path = write(
        &dir,
        MANIFEST_FILE_NAME,
        r#"{
            "dark": "themes/dark.json",
            "broken": "themes/broken.json",
            "list": "themes/list.json",
            "empty": "themes/empty.json",
            "missing": "themes/missing.json",
            "source": "src/theme.ts"
        }"#,
    );

    let manifest = ThemeManifest::from_file(&manifest_path).unwrap();
    let themes = load_json_themes(&manifest);

    assert_eq!(themes.keys().collect::<Vec<_>>(), vec!["dark"]);
    let dark = &themes["dark"];
    assert_eq!(
        crate::present::flatten_keys(dark),
        vec!["colors.primary".to_string(), "size".to_string()]
    );
}

#[test]
fn test_cache_publish_and_refresh() {
    let mut cache = ThemeCache::new();
    assert!(cache.is_empty());

    assert_eq!(cache.publish("project", document("a")), Refresh::Updated);
    let first = cache.get("project").expect("Expected a document");

    assert_eq!(cache.publish("project", document("a")), Refresh::Unchanged);
    assert!(std::sync::Arc::ptr_eq(&first, &cache.get("project").unwrap()));

    assert_eq!(cache.publish("project", document("b")), Refresh::Updated);
    assert_ne!(cache.get("project").unwrap().fingerprint(), first.fingerprint());

    // readers holding the old Arc keep a consistent view
    assert_eq!(first.root().as_object().unwrap()["source"], Value::String("a".into()));

    cache.publish("other", document("c"));
    assert_eq!(cache.len(), 2);
    assert!(cache.remove("other").is_some());
    cache.clear();
    assert!(cache.get("project").is_none());
}
