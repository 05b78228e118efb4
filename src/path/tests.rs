// Author: Dustin Pilgrim
// License: MIT

#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::context::{BindingStyle, StructuralContext, ThemeAccessContext, classify};
#[cfg(test)]
use crate::options::ResolverOptions;
#[cfg(test)]
use crate::parser::parse;
#[cfg(test)]
use crate::syntax::SyntaxTree;
#[cfg(test)]
use crate::Value;
#[cfg(test)]
use indexmap::IndexMap;
#[cfg(test)]
use proptest::prelude::*;

fn path(segments: &[&str]) -> PropertyPath {
    PropertyPath::from(segments)
}

fn member(tree: &SyntaxTree, text: &str) -> crate::syntax::NodeId {
    tree.member_expressions()
        .into_iter()
        .find(|id| tree.text(*id) == text)
        .unwrap_or_else(|| panic!("no member expression `{}`", text))
}

/// Parses `source`, classifies the member expression `text` and extracts it.
fn extract_in(source: &str, text: &str) -> PropertyPath {
    let tree = parse(source, None).expect("Failed to parse");
    let id = member(&tree, text);
    let context = classify(&tree, id, &ResolverOptions::default());
    extract(&tree, id, &context)
}

fn query_in(source: &str, text: &str) -> Option<CompletionQuery> {
    let tree = parse(source, None).expect("Failed to parse");
    let id = member(&tree, text);
    let context = classify(&tree, id, &ResolverOptions::default());
    CompletionQuery::from_member(&tree, id, &context)
}

fn sample_theme() -> Value {
    serde_json::json!({
        "palette": {
            "primary": { "main": "#1976d2", "light": "#42a5f5" },
            "mode": "light"
        },
        "spacing": 8,
        "breakpoints": ["xs", "sm"]
    })
    .into()
}

#[test]
fn test_property_path_basics() {
    let p = path(&["palette", "primary", "main"]);
    assert_eq!(p.to_string(), "palette.primary.main");
    assert_eq!(p.parent(), path(&["palette", "primary"]));
    assert_eq!(p.last(), Some("main"));
    assert_eq!(p.len(), 3);
    assert_eq!(PropertyPath::empty().parent(), PropertyPath::empty());
    assert_eq!(path(&["a"]).child("b"), path(&["a", "b"]));
}

#[test]
fn test_parse_dotted() {
    let p: PropertyPath = "palette.primary.main".parse().expect("Failed to parse path");
    assert_eq!(p, path(&["palette", "primary", "main"]));
    assert!(PropertyPath::parse_dotted("").expect("Failed to parse path").is_empty());

    let err = PropertyPath::parse_dotted("palette..main").unwrap_err();
    assert_eq!(err.code(), Some(301));
    assert!(PropertyPath::parse_dotted(".palette").is_err());
}

#[test]
fn test_extract_direct_and_destructured() {
    let source = "const B = styled.div`${({ theme }) => theme.palette.primary.main}`;";
    assert_eq!(
        extract_in(source, "theme.palette.primary.main"),
        path(&["palette", "primary", "main"])
    );

    let source = "const C = styled(Card)((props) => ({ padding: props.theme.spacing }));";
    assert_eq!(extract_in(source, "props.theme.spacing"), path(&["spacing"]));
}

#[test]
fn test_extract_through_optional_and_non_null() {
    assert_eq!(
        extract_in("const a = theme?.palette!.mode;", "theme?.palette!.mode"),
        path(&["palette", "mode"])
    );
}

#[test]
fn test_extract_empty_cases() {
    assert!(extract_in("const a = theme[key].main;", "theme[key].main").is_empty());
    assert!(extract_in("const a = notTheme.foo.bar;", "notTheme.foo.bar").is_empty());
    assert!(extract_in("const a = props.theme;", "props.theme").is_empty());
    assert_eq!(query_in("const a = props.theme;", "props.theme"), None);

    // context claims a direct binding but the chain is rooted at `props`
    let tree = parse("const a = props.theme.x;", None).expect("Failed to parse");
    let id = member(&tree, "props.theme.x");
    let mismatched = ThemeAccessContext {
        is_theme_access: true,
        binding_style: BindingStyle::Direct,
        structural_context: StructuralContext::Plain,
    };
    assert!(extract(&tree, id, &mismatched).is_empty());
}

#[test]
fn test_partial_tail_is_still_a_segment() {
    assert_eq!(extract_in("const a = theme.palette.pri;", "theme.palette.pri"), path(&["palette", "pri"]));
}

#[test]
fn test_trailing_dot_contributes_no_segment() {
    assert_eq!(extract_in("const a = theme.palette.", "theme.palette."), path(&["palette"]));
}

#[test]
fn test_completion_queries() {
    assert_eq!(
        query_in("const a = theme.palette.", "theme.palette."),
        Some(CompletionQuery { parent: path(&["palette"]), prefix: String::new() })
    );
    assert_eq!(
        query_in("const a = theme.palette.pri", "theme.palette.pri"),
        Some(CompletionQuery { parent: path(&["palette"]), prefix: "pri".into() })
    );
    assert_eq!(
        query_in("const a = theme.pal", "theme.pal"),
        Some(CompletionQuery { parent: PropertyPath::empty(), prefix: "pal".into() })
    );
    assert_eq!(
        query_in("const a = theme.", "theme."),
        Some(CompletionQuery { parent: PropertyPath::empty(), prefix: String::new() })
    );
    assert_eq!(query_in("const a = other.pal", "other.pal"), None);
}

#[test]
fn test_resolve() {
    let theme = sample_theme();
    assert_eq!(
        resolve(&theme, &path(&["palette", "primary", "main"])),
        Some(&Value::String("#1976d2".into()))
    );
    assert_eq!(resolve(&theme, &path(&["spacing"])), Some(&Value::Number(8.0)));
    assert!(matches!(resolve(&theme, &path(&["palette"])), Some(Value::Object(_))));
    assert!(matches!(resolve(&theme, &path(&["breakpoints"])), Some(Value::List(_))));

    assert_eq!(resolve(&theme, &PropertyPath::empty()), None);
    assert_eq!(resolve(&theme, &path(&["palette", "secondary"])), None);
    // lists are not indexed by path segments
    assert_eq!(resolve(&theme, &path(&["breakpoints", "0"])), None);
    assert_eq!(resolve(&theme, &path(&["spacing", "unit"])), None);
}

#[test]
fn test_resolve_returns_unresolved_as_is() {
    let mut entries = IndexMap::new();
    entries.insert("spacing".to_string(), Value::Unresolved("(n) => n * 8".into()));
    let theme = Value::Object(entries);
    assert_eq!(
        resolve(&theme, &path(&["spacing"])),
        Some(&Value::Unresolved("(n) => n * 8".into()))
    );
    assert_eq!(resolve(&theme, &path(&["spacing", "x"])), None);
}

#[test]
fn test_suggest_children() {
    let theme = sample_theme();

    let root = suggest_children(&theme, &PropertyPath::empty(), "");
    let names: Vec<&str> = root.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["palette", "spacing", "breakpoints"]);
    assert_eq!(root[0].1, Preview::Object { len: 2 });
    assert_eq!(root[1].1, Preview::Scalar(Value::Number(8.0)));
    assert_eq!(root[2].1, Preview::List { len: 2 });

    let primary = suggest_children(&theme, &path(&["palette", "primary"]), "l");
    assert_eq!(primary, vec![("light".to_string(), Preview::Scalar(Value::String("#42a5f5".into())))]);

    assert!(suggest_children(&theme, &path(&["spacing"]), "").is_empty());
    assert!(suggest_children(&theme, &path(&["missing"]), "").is_empty());
}

// ── Properties ──────────────────────────────────────────────────────────

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(|n| Value::Number(n as f64)),
        "[a-z#0-9]{0,8}".prop_map(Value::String),
        "[a-z]{1,6}".prop_map(Value::Unresolved),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec(("[a-e]{1,3}", inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn theme_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-e]{1,3}", value_strategy()), 0..6)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

fn path_strategy() -> impl Strategy<Value = PropertyPath> {
    prop::collection::vec("[a-e]{1,3}", 1..5).prop_map(PropertyPath::new)
}

proptest! {
    #[test]
    fn prop_absent_segment_never_resolves(
        theme in theme_strategy(),
        mut segments in prop::collection::vec("[a-e]{1,3}", 0..4),
        absent in "[x-z]{1,3}",
        position in 0usize..4,
    ) {
        // keys are drawn from a-e, so this segment exists nowhere in the tree
        let index = position.min(segments.len());
        segments.insert(index, absent);
        prop_assert_eq!(resolve(&theme, &PropertyPath::new(segments)), None);
    }

    #[test]
    fn prop_resolve_is_idempotent(theme in theme_strategy(), p in path_strategy()) {
        prop_assert_eq!(resolve(&theme, &p), resolve(&theme, &p));
    }

    #[test]
    fn prop_resolve_composes(theme in theme_strategy(), p in path_strategy(), key in "[a-e]{1,3}") {
        let whole = resolve(&theme, &p.child(key.clone()));
        let stepwise = resolve(&theme, &p).and_then(|v| resolve(v, &PropertyPath::new(vec![key])));
        prop_assert_eq!(whole, stepwise);
    }

    #[test]
    fn prop_suggestions_resolve(theme in theme_strategy(), p in path_strategy()) {
        let parent = p.parent();
        for (name, preview) in suggest_children(&theme, &parent, "") {
            let value = resolve(&theme, &parent.child(name));
            prop_assert!(value.is_some());
            prop_assert_eq!(Preview::of(value.unwrap()), preview);
        }
    }
}
