// Author: Dustin Pilgrim
// License: MIT

//! The entry points a host calls: load a theme, then answer cursor queries
//! against it.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::context::{ThemeAccessContext, classify};
use crate::convert::convert;
use crate::document::ThemeDocument;
use crate::options::ResolverOptions;
use crate::parser::parse;
use crate::path::{CompletionQuery, Preview, PropertyPath, extract, resolve, suggest_children};
use crate::present::{self, Hover, Rgba};
use crate::resolver::{ImportResolver, locate};
use crate::syntax::{NodeId, SyntaxTree};
use crate::{ThemeError, Value};

/// Analysis bound to one set of [`ResolverOptions`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: ResolverOptions,
}

/// Everything known about the theme access under a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorQuery {
    pub member: NodeId,
    pub context: ThemeAccessContext,
    /// Full path of the expression; empty for `theme.` with nothing typed.
    pub path: PropertyPath,
    pub completion: Option<CompletionQuery>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionItem {
    pub label: String,
    pub type_text: String,
    pub preview: Preview,
    pub color: Option<Rgba>,
}

/// Hint placed right after a complete theme path.
#[derive(Debug, Clone, PartialEq)]
pub struct InlayHint {
    /// Byte offset of the end of the expression.
    pub offset: usize,
    pub path: PropertyPath,
    pub text: String,
}

impl Engine {
    pub fn new(options: ResolverOptions) -> Result<Self, ThemeError> {
        options.validate()?;
        Ok(Engine { options })
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Locates the theme literal in `tree` (following imports through
    /// `imports`) and converts it.
    ///
    /// `Ok(None)` when no theme is found. `Err` only for a broken invariant.
    pub fn load_theme(
        &self,
        tree: &SyntaxTree,
        imports: &dyn ImportResolver,
    ) -> Result<Option<ThemeDocument>, ThemeError> {
        let Some(found) = locate(tree, imports, &self.options) else {
            return Ok(None);
        };

        let root = convert(found.tree(), found.node());
        let source_path = found.tree().path().map(Path::to_path_buf);
        let document = ThemeDocument::new(root, source_path, found.fingerprint())?;

        info!(
            path = ?document.source_path(),
            rule = ?found.rule(),
            keys = ?document.top_level_keys(),
            "theme loaded"
        );
        Ok(Some(document))
    }

    /// Parses `source` then runs [`Engine::load_theme`]. Statements the
    /// parser recovers from are skipped; only tokenizer errors fail.
    pub fn load_theme_source(
        &self,
        path: Option<PathBuf>,
        source: &str,
        imports: &dyn ImportResolver,
    ) -> Result<Option<ThemeDocument>, ThemeError> {
        let tree = parse(source, path)?;
        if !tree.errors().is_empty() {
            debug!(path = ?tree.path(), errors = tree.errors().len(), "parsed with recovered errors");
        }
        self.load_theme(&tree, imports)
    }

    pub fn classify(&self, tree: &SyntaxTree, member_expr: NodeId) -> ThemeAccessContext {
        classify(tree, member_expr, &self.options)
    }

    pub fn resolve_path<'d>(&self, document: &'d ThemeDocument, path: &PropertyPath) -> Option<&'d Value> {
        resolve(document.root(), path)
    }

    pub fn suggest_children(&self, document: &ThemeDocument, query: &CompletionQuery) -> Vec<(String, Preview)> {
        suggest_children(document.root(), &query.parent, &query.prefix)
    }

    /// Finds the member expression at `offset` and, when it reads from the
    /// theme, extracts its path.
    pub fn query_at(&self, tree: &SyntaxTree, offset: usize) -> Option<CursorQuery> {
        let member = tree.member_expression_at(offset)?;
        let context = self.classify(tree, member);
        if !context.is_theme_access {
            return None;
        }

        let completion = CompletionQuery::from_member(tree, member, &context);
        let path = extract(tree, member, &context);
        if path.is_empty() && completion.is_none() {
            return None;
        }

        Some(CursorQuery { member, context, path, completion })
    }

    /// Completion items for the cursor, in theme declaration order.
    pub fn completions(&self, tree: &SyntaxTree, offset: usize, document: &ThemeDocument) -> Vec<CompletionItem> {
        let Some(query) = self.query_at(tree, offset).and_then(|q| q.completion) else {
            return Vec::new();
        };

        self.suggest_children(document, &query)
            .into_iter()
            .map(|(label, preview)| {
                let value = resolve(document.root(), &query.parent.child(label.as_str()));
                let type_text = value.map(present::completion_type_text).unwrap_or_default();
                let color = value.and_then(Value::as_str).and_then(present::parse_hex_color);
                CompletionItem { label, type_text, preview, color }
            })
            .collect()
    }

    pub fn hover(&self, tree: &SyntaxTree, offset: usize, document: &ThemeDocument) -> Option<Hover> {
        let query = self.query_at(tree, offset)?;
        let value = self.resolve_path(document, &query.path)?;
        debug!(path = %query.path, "hover");
        Some(present::hover(&query.path, value))
    }

    /// Hints for every complete theme path in `tree` that resolves to a
    /// scalar or unevaluated value.
    pub fn inlay_hints(&self, tree: &SyntaxTree, document: &ThemeDocument) -> Vec<InlayHint> {
        tree.member_expressions()
            .into_iter()
            .filter(|id| tree.outermost_member(*id) == *id)
            .filter_map(|member| {
                let context = self.classify(tree, member);
                let path = extract(tree, member, &context);
                let value = self.resolve_path(document, &path)?;
                let text = present::inlay_text(value, self.options.inlay_max_len)?;
                Some(InlayHint { offset: tree.span(member).end, path, text })
            })
            .collect()
    }
}

/// Flat-key completion over legacy JSON themes: `dark.` lists every dotted
/// leaf key of the theme registered under `dark`.
pub fn json_theme_keys(themes: &IndexMap<String, Value>, alias: &str) -> Vec<String> {
    themes.get(alias).map(present::flatten_keys).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{MemoryImports, NoImports};
    use std::sync::Arc;

    fn load(source: &str) -> ThemeDocument {
        Engine::default()
            .load_theme_source(None, source, &NoImports)
            .expect("Failed to load theme")
            .expect("Expected a theme")
    }

    fn path(segments: &[&str]) -> PropertyPath {
        PropertyPath::from(segments)
    }

    const SCENARIO_A: &str = r##"const theme = { palette: { primary: { main: "#1976d2" } } }"##;

    #[test]
    fn test_scenario_a_resolves_nested_string() {
        let engine = Engine::default();
        let doc = load(SCENARIO_A);
        assert_eq!(
            engine.resolve_path(&doc, &path(&["palette", "primary", "main"])),
            Some(&Value::String("#1976d2".into()))
        );
    }

    #[test]
    fn test_scenario_b_unwraps_create_theme() {
        let engine = Engine::default();
        let doc = load("export default createTheme({ shape: { borderRadius: 4 } })");
        assert_eq!(
            engine.resolve_path(&doc, &path(&["shape", "borderRadius"])),
            Some(&Value::Number(4.0))
        );
    }

    #[test]
    fn test_scenario_c_function_value_is_unresolved() {
        let engine = Engine::default();
        let doc = load("const theme = { spacing: (n) => n * 8 }");
        assert_eq!(
            engine.resolve_path(&doc, &path(&["spacing"])),
            Some(&Value::Unresolved("(n) => n * 8".into()))
        );
    }

    #[test]
    fn test_scenario_d_suggests_children() {
        let engine = Engine::default();
        let doc = load(SCENARIO_A);
        let query = CompletionQuery { parent: path(&["palette"]), prefix: String::new() };
        assert_eq!(
            engine.suggest_children(&doc, &query),
            vec![("primary".to_string(), Preview::Object { len: 1 })]
        );
    }

    #[test]
    fn test_scenario_e_identical_sources_share_a_fingerprint() {
        let first = load(SCENARIO_A);
        let second = load(SCENARIO_A);
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_ne!(first.fingerprint(), load("const theme = { a: 1 }").fingerprint());
    }

    #[test]
    fn test_load_theme_none_and_errors() {
        let engine = Engine::default();
        assert_eq!(engine.load_theme_source(None, "export const x = 1;", &NoImports), Ok(None));
        assert!(engine.load_theme_source(None, "const theme = 'open", &NoImports).is_err());

        // a broken statement elsewhere does not hide the theme
        let doc = engine
            .load_theme_source(None, "const broken = (1 + ;\nexport const theme = { ok: true };", &NoImports)
            .unwrap()
            .expect("Expected a theme");
        assert_eq!(doc.top_level_keys(), vec!["ok"]);
    }

    #[test]
    fn test_load_theme_records_provenance_of_imported_literal() {
        let base = Arc::new(parse("export default { spacing: 8 };", Some("/p/base.ts".into())).unwrap());
        let imports = MemoryImports::new().with("./base", base);
        let doc = Engine::default()
            .load_theme_source(
                Some("/p/theme.ts".into()),
                "import base from './base';\nexport default createTheme(base);",
                &imports,
            )
            .unwrap()
            .expect("Expected a theme");

        assert_eq!(doc.source_path(), Some(Path::new("/p/base.ts")));
        assert_eq!(doc.top_level_keys(), vec!["spacing"]);
    }

    #[test]
    fn test_engine_rejects_invalid_options() {
        let options = ResolverOptions { styled_prefix: String::new(), ..ResolverOptions::default() };
        assert!(Engine::new(options).is_err());
    }

    const COMPONENT: &str = r#"import styled from 'styled-components';

export const Button = styled.button`
  color: ${({ theme }) => theme.palette.primary.main};
  padding: ${(props) => props.theme.spacing}px;
`;

const Card = styled(Paper)(({ theme }) => ({
  mode: theme.palette.mode,
}));
"#;

    fn component_theme() -> ThemeDocument {
        load("const theme = { palette: { primary: { main: '#1976d2', light: '#42a5f5' }, mode: 'light' }, spacing: 8 };")
    }

    fn offset_after(source: &str, needle: &str) -> usize {
        source.find(needle).expect("needle present") + needle.len()
    }

    #[test]
    fn test_query_at_cursor() {
        let engine = Engine::default();
        let tree = parse(COMPONENT, None).unwrap();

        let query = engine
            .query_at(&tree, offset_after(COMPONENT, "theme.palette.primary.main"))
            .expect("Expected a theme access");
        assert_eq!(query.path, path(&["palette", "primary", "main"]));
        assert_eq!(
            query.completion,
            Some(CompletionQuery { parent: path(&["palette", "primary"]), prefix: "main".into() })
        );

        // cursor inside `palette` sees only `theme.palette`
        let inside = COMPONENT.find("palette.primary").unwrap() + 3;
        assert_eq!(engine.query_at(&tree, inside).unwrap().path, path(&["palette"]));

        assert!(engine.query_at(&tree, offset_after(COMPONENT, "styled.button")).is_none());
    }

    #[test]
    fn test_completions_for_partial_path() {
        let engine = Engine::default();
        let doc = component_theme();
        let source = "const B = styled.div`color: ${({ theme }) => theme.palette.primary.l}`;";
        let tree = parse(source, None).unwrap();

        let items = engine.completions(&tree, offset_after(source, "primary.l"), &doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "light");
        assert_eq!(items[0].type_text, "\"#42a5f5\"");
        assert_eq!(items[0].color, Some(Rgba { r: 0x42, g: 0xa5, b: 0xf5, a: 255 }));

        let source = "const B = styled.div`${({ theme }) => theme.}`;";
        let tree = parse(source, None).unwrap();
        let labels: Vec<String> = engine
            .completions(&tree, offset_after(source, "theme."), &doc)
            .into_iter()
            .map(|item| item.label)
            .collect();
        assert_eq!(labels, vec!["palette", "spacing"]);
    }

    #[test]
    fn test_hover() {
        let engine = Engine::default();
        let doc = component_theme();
        let tree = parse(COMPONENT, None).unwrap();

        let card = engine
            .hover(&tree, offset_after(COMPONENT, "props.theme.spacing"), &doc)
            .expect("Expected a hover");
        assert_eq!(card.to_string(), "MUI Theme Path: theme.spacing\nResolved Value: 8");

        let card = engine
            .hover(&tree, offset_after(COMPONENT, "theme.palette.primary.main"), &doc)
            .unwrap();
        assert!(card.color.is_some());

        assert!(engine.hover(&tree, offset_after(COMPONENT, "styled(Paper"), &doc).is_none());
    }

    #[test]
    fn test_inlay_hints() {
        let engine = Engine::default();
        let doc = component_theme();
        let tree = parse(COMPONENT, None).unwrap();

        let hints: Vec<(String, String)> = engine
            .inlay_hints(&tree, &doc)
            .into_iter()
            .map(|hint| (hint.path.to_string(), hint.text))
            .collect();
        assert_eq!(
            hints,
            vec![
                ("palette.primary.main".to_string(), ":\"#1976d2\"".to_string()),
                ("spacing".to_string(), ":8".to_string()),
                ("palette.mode".to_string(), ":\"light\"".to_string()),
            ]
        );

        let first = &engine.inlay_hints(&tree, &doc)[0];
        assert_eq!(first.offset, offset_after(COMPONENT, "theme.palette.primary.main"));
    }

    #[test]
    fn test_inlay_hints_respect_styled_only_option() {
        let options = ResolverOptions { require_styled_context: true, ..ResolverOptions::default() };
        let engine = Engine::new(options).unwrap();
        let doc = component_theme();
        let source = "function f(theme) { return theme.spacing; }";
        let tree = parse(source, None).unwrap();
        assert!(engine.inlay_hints(&tree, &doc).is_empty());
        assert_eq!(Engine::default().inlay_hints(&tree, &doc).len(), 1);
    }

    #[test]
    fn test_json_theme_keys() {
        let mut themes = IndexMap::new();
        themes.insert(
            "dark".to_string(),
            Value::from(serde_json::json!({ "colors": { "bg": "#000" }, "radius": 2 })),
        );
        assert_eq!(json_theme_keys(&themes, "dark"), vec!["colors.bg", "radius"]);
        assert!(json_theme_keys(&themes, "light").is_empty());
    }
}
