// Author: Dustin Pilgrim
// License: MIT

//! Decides whether a member expression reads from the theme.

use crate::options::ResolverOptions;
use crate::syntax::{MemberProp, NodeId, NodeKind, SyntaxTree, WrapKind};

/// How the theme reached the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingStyle {
    /// `theme.x`, typically from a destructured `({ theme }) => ...`.
    #[default]
    Direct,
    /// `props.theme.x`
    DestructuredProp,
}

/// Where the expression sits relative to styled-component code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructuralContext {
    /// Inside the template of ``styled.div`...` ``.
    StyledTag,
    /// Inside the arguments of `styled(Button)(...)` or `styled.div(...)`.
    StyledCallArgument,
    #[default]
    Plain,
}

/// Result of [`classify`]. Only meaningful when `is_theme_access` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeAccessContext {
    pub is_theme_access: bool,
    pub binding_style: BindingStyle,
    pub structural_context: StructuralContext,
}

pub fn classify(tree: &SyntaxTree, member_expr: NodeId, options: &ResolverOptions) -> ThemeAccessContext {
    let structural_context = structural_context(tree, member_expr, &options.styled_prefix);

    let binding_style = match binding_style(tree, member_expr) {
        Some(style) if !(options.require_styled_context && structural_context == StructuralContext::Plain) => {
            style
        }
        _ => {
            return ThemeAccessContext {
                is_theme_access: false,
                structural_context,
                ..ThemeAccessContext::default()
            };
        }
    };

    ThemeAccessContext {
        is_theme_access: true,
        binding_style,
        structural_context,
    }
}

/// Walks left through the member chain to its root. Returns the root and the
/// member expression directly applied to it.
fn chain_root(tree: &SyntaxTree, member_expr: NodeId) -> Option<(NodeId, NodeId)> {
    let mut current = member_expr;
    let mut innermost_member = None;

    loop {
        match tree.kind(current) {
            NodeKind::Member { object, .. } => {
                innermost_member = Some(current);
                current = *object;
            }
            NodeKind::TsWrap { kind: WrapKind::NonNull, expr } => current = *expr,
            _ => return innermost_member.map(|member| (current, member)),
        }
    }
}

fn binding_style(tree: &SyntaxTree, member_expr: NodeId) -> Option<BindingStyle> {
    let (root, first_member) = chain_root(tree, member_expr)?;

    match tree.identifier_name(root)? {
        "theme" => Some(BindingStyle::Direct),
        // `props.theme` alone counts too; it extracts to the empty path
        "props" => match tree.kind(first_member) {
            NodeKind::Member { property: MemberProp::Name(name), .. } if name == "theme" => {
                Some(BindingStyle::DestructuredProp)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Innermost styled construct around `node`.
fn structural_context(tree: &SyntaxTree, node: NodeId, prefix: &str) -> StructuralContext {
    let mut child = node;
    for ancestor in tree.ancestors(node) {
        match tree.kind(ancestor) {
            NodeKind::TaggedTemplate { tag, quasi }
                if *quasi == child && tree.text(*tag).starts_with(prefix) =>
            {
                return StructuralContext::StyledTag;
            }
            NodeKind::Call { callee, .. }
                if *callee != child && tree.text(*callee).starts_with(prefix) =>
            {
                return StructuralContext::StyledCallArgument;
            }
            _ => {}
        }
        child = ancestor;
    }
    StructuralContext::Plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    /// Classifies the longest member expression whose text is `expr`.
    fn classify_in(source: &str, expr: &str, options: &ResolverOptions) -> ThemeAccessContext {
        let tree = parse(source, None).expect("Failed to parse");
        let member = tree
            .member_expressions()
            .into_iter()
            .find(|id| tree.text(*id) == expr)
            .unwrap_or_else(|| panic!("no member expression `{}`", expr));
        classify(&tree, member, options)
    }

    fn defaults() -> ResolverOptions {
        ResolverOptions::default()
    }

    #[test]
    fn test_direct_theme_in_styled_tag() {
        let ctx = classify_in(
            "const B = styled.button`color: ${({ theme }) => theme.palette.primary.main};`;",
            "theme.palette.primary.main",
            &defaults(),
        );
        assert_eq!(
            ctx,
            ThemeAccessContext {
                is_theme_access: true,
                binding_style: BindingStyle::Direct,
                structural_context: StructuralContext::StyledTag,
            }
        );
    }

    #[test]
    fn test_props_theme_in_curried_call() {
        let ctx = classify_in(
            "const C = styled(Card)((props) => ({ padding: props.theme.spacing }));",
            "props.theme.spacing",
            &defaults(),
        );
        assert!(ctx.is_theme_access);
        assert_eq!(ctx.binding_style, BindingStyle::DestructuredProp);
        assert_eq!(ctx.structural_context, StructuralContext::StyledCallArgument);
    }

    #[test]
    fn test_styled_call_with_object() {
        let ctx = classify_in(
            "const D = styled.div(({ theme }) => ({ color: theme.palette.text }));",
            "theme.palette.text",
            &defaults(),
        );
        assert_eq!(ctx.structural_context, StructuralContext::StyledCallArgument);
    }

    #[test]
    fn test_tag_expression_itself_is_not_inside_the_template() {
        let ctx = classify_in("const E = styled.div`a`;", "styled.div", &defaults());
        assert!(!ctx.is_theme_access);
        assert_eq!(ctx.structural_context, StructuralContext::Plain);
    }

    #[test]
    fn test_plain_access_is_eligible_by_default() {
        let source = "function f(theme) { return theme.spacing.unit; }";
        let ctx = classify_in(source, "theme.spacing.unit", &defaults());
        assert!(ctx.is_theme_access);
        assert_eq!(ctx.structural_context, StructuralContext::Plain);

        let narrow = ResolverOptions { require_styled_context: true, ..defaults() };
        assert!(!classify_in(source, "theme.spacing.unit", &narrow).is_theme_access);
    }

    #[test]
    fn test_non_theme_roots() {
        for source in [
            "const x = notTheme.foo.bar;",
            "const y = styled.div`${notTheme.foo.bar}`;",
            "const z = styled(A)(() => notTheme.foo.bar);",
        ] {
            let ctx = classify_in(source, "notTheme.foo.bar", &defaults());
            assert!(!ctx.is_theme_access, "{}", source);
        }

        assert!(!classify_in("const a = props.other.x;", "props.other.x", &defaults()).is_theme_access);
        assert!(!classify_in("const a = this.theme.x;", "this.theme.x", &defaults()).is_theme_access);
    }

    #[test]
    fn test_bare_props_theme_is_an_access_to_the_root() {
        let ctx = classify_in("const a = props.theme;", "props.theme", &defaults());
        assert!(ctx.is_theme_access);
        assert_eq!(ctx.binding_style, BindingStyle::DestructuredProp);
    }

    #[test]
    fn test_root_through_optional_and_non_null() {
        let ctx = classify_in("const a = theme?.palette!.mode;", "theme?.palette!.mode", &defaults());
        assert!(ctx.is_theme_access);
        assert_eq!(ctx.binding_style, BindingStyle::Direct);
    }

    #[test]
    fn test_custom_prefix() {
        let source = "const a = css`${({ theme }) => theme.x}`;";
        assert_eq!(
            classify_in(source, "theme.x", &defaults()).structural_context,
            StructuralContext::Plain
        );
        let options = ResolverOptions { styled_prefix: "css".into(), ..defaults() };
        assert_eq!(
            classify_in(source, "theme.x", &options).structural_context,
            StructuralContext::StyledTag
        );
    }
}
