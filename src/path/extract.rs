// Author: Dustin Pilgrim
// License: MIT

use super::PropertyPath;
use crate::context::{BindingStyle, ThemeAccessContext};
use crate::syntax::{MemberProp, NodeId, NodeKind, SyntaxTree, WrapKind};

/// Path below the theme root named by `member_expr`.
///
/// Empty when the context is not a theme access, when any member in the chain
/// is computed (`theme[key]`), or when the root does not match the binding
/// style. A trailing `theme.palette.` contributes no segment for the dot.
pub fn extract(tree: &SyntaxTree, member_expr: NodeId, context: &ThemeAccessContext) -> PropertyPath {
    chain_segments(tree, member_expr, context)
        .map(|(segments, _)| PropertyPath::new(segments))
        .unwrap_or_default()
}

/// Segments below the root plus whether the chain ends in a bare dot.
fn chain_segments(
    tree: &SyntaxTree,
    member_expr: NodeId,
    context: &ThemeAccessContext,
) -> Option<(Vec<String>, bool)> {
    if !context.is_theme_access {
        return None;
    }

    let mut segments = Vec::new();
    let mut trailing_dot = false;
    let mut current = member_expr;

    loop {
        match tree.kind(current) {
            NodeKind::Member { object, property, .. } => {
                match property {
                    MemberProp::Name(name) => segments.push(name.clone()),
                    MemberProp::Missing => trailing_dot |= current == member_expr,
                    MemberProp::Computed(_) => return None,
                }
                current = *object;
            }
            NodeKind::TsWrap { kind: WrapKind::NonNull, expr } => current = *expr,
            NodeKind::Identifier { name } => {
                segments.push(name.clone());
                break;
            }
            _ => return None,
        }
    }

    segments.reverse();

    let skip = match context.binding_style {
        BindingStyle::Direct if segments.first().map(String::as_str) == Some("theme") => 1,
        BindingStyle::DestructuredProp
            if segments.first().map(String::as_str) == Some("props")
                && segments.get(1).map(String::as_str) == Some("theme") =>
        {
            2
        }
        _ => return None,
    };

    Some((segments[skip..].to_vec(), trailing_dot))
}

/// What a completion popup should list: the children of `parent` whose names
/// start with `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionQuery {
    pub parent: PropertyPath,
    pub prefix: String,
}

impl CompletionQuery {
    /// `theme.palette.` asks for everything under `palette`;
    /// `theme.palette.pri` asks for children of `palette` starting with `pri`.
    ///
    /// `None` when the expression is not a usable theme access.
    pub fn from_member(tree: &SyntaxTree, member_expr: NodeId, context: &ThemeAccessContext) -> Option<Self> {
        let (segments, trailing_dot) = chain_segments(tree, member_expr, context)?;
        let path = PropertyPath::new(segments);

        if trailing_dot {
            return Some(CompletionQuery { parent: path, prefix: String::new() });
        }

        let prefix = path.last()?.to_string();
        Some(CompletionQuery { parent: path.parent(), prefix })
    }
}
