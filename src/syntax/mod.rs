// Author: Dustin Pilgrim
// License: MIT

//! Read-only view over a parsed JavaScript/TypeScript file.
//!
//! The tree is an arena of [`Node`]s with parent links, so classification can
//! walk upwards from any expression. It is built either by [`crate::parser`] or
//! by a host that already has its own parser, through [`TreeBuilder`].

use std::path::{Path, PathBuf};

use crate::ThemeError;
use crate::document::fingerprint;

mod node;

pub use node::{
    DeclKind, ExportSpecifier, ImportBinding, Imported, MemberProp, Node, NodeId, NodeKind,
    PropKey, Span, WrapKind,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    source: String,
    path: Option<PathBuf>,
    nodes: Vec<Node>,
    root: NodeId,
    fingerprint: String,
    errors: Vec<ThemeError>,
}

/// Collects nodes bottom-up and links parents when finished.
pub struct TreeBuilder {
    source: String,
    path: Option<PathBuf>,
    nodes: Vec<Node>,
    errors: Vec<ThemeError>,
}

impl TreeBuilder {
    pub fn new(source: impl Into<String>, path: Option<PathBuf>) -> Self {
        TreeBuilder {
            source: source.into(),
            path,
            nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span, parent: None });
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes pushed so far. Used with [`TreeBuilder::truncate`] to
    /// discard the nodes of a statement the parser had to skip.
    pub fn mark(&self) -> usize {
        self.nodes.len()
    }

    pub fn truncate(&mut self, mark: usize) {
        self.nodes.truncate(mark);
    }

    /// Records an error the parser recovered from.
    pub fn recover(&mut self, error: ThemeError) {
        self.errors.push(error);
    }

    pub fn finish(mut self, root: NodeId) -> SyntaxTree {
        for index in 0..self.nodes.len() {
            let parent = NodeId(index as u32);
            for child in self.nodes[index].kind.children() {
                self.nodes[child.index()].parent = Some(parent);
            }
        }

        let fingerprint = fingerprint(&[self.source.as_str()]);
        SyntaxTree {
            source: self.source,
            path: self.path,
            nodes: self.nodes,
            root,
            fingerprint,
            errors: self.errors,
        }
    }
}

impl SyntaxTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Hex SHA-256 of the source text.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Statements the parser could not understand and skipped.
    pub fn errors(&self) -> &[ThemeError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Source text covered by the node.
    pub fn text(&self, id: NodeId) -> &str {
        let span = self.span(id);
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Top-level statements of the program.
    pub fn statements(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Program { body } => body,
            _ => &[],
        }
    }

    /// Parent, grandparent, ... up to the program node.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(id) }
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Strips parentheses and TypeScript-only wrappers (`as`, `satisfies`, `!`).
    pub fn unwrap_expression(&self, mut id: NodeId) -> NodeId {
        loop {
            match self.kind(id) {
                NodeKind::Paren { expr } | NodeKind::TsWrap { expr, .. } => id = *expr,
                _ => return id,
            }
        }
    }

    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Smallest node of any kind whose span contains `offset`.
    pub fn node_at_offset(&self, offset: usize) -> Option<NodeId> {
        self.smallest_containing(offset, |_| true)
    }

    /// Smallest member-access expression containing the cursor offset.
    pub fn member_expression_at(&self, offset: usize) -> Option<NodeId> {
        self.smallest_containing(offset, NodeKind::is_member)
    }

    /// Walks up from a member expression to the outermost member of its chain:
    /// for the `theme.palette` part of `theme.palette.primary` this returns the
    /// whole expression.
    pub fn outermost_member(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.parent(id) {
            match self.kind(parent) {
                NodeKind::Member { object, .. } if *object == id => id = parent,
                _ => break,
            }
        }
        id
    }

    /// 1-based line and 0-based column of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.source.len());
        let before = &self.source[..clamped];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count());
        (line, column)
    }

    /// All member expressions in source order. Used for inlay hints.
    pub fn member_expressions(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = (0..self.nodes.len())
            .map(|i| NodeId(i as u32))
            .filter(|id| self.kind(*id).is_member() && self.is_attached(*id))
            .collect();
        out.sort_by_key(|id| (self.span(*id).start, self.span(*id).end));
        out
    }

    fn smallest_containing<F>(&self, offset: usize, accept: F) -> Option<NodeId>
    where
        F: Fn(&NodeKind) -> bool,
    {
        let mut best: Option<NodeId> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index as u32);
            if !node.span.contains_offset(offset) || !accept(&node.kind) || !self.is_attached(id) {
                continue;
            }
            match best {
                Some(b) if self.span(b).len() <= node.span.len() => {}
                _ => best = Some(id),
            }
        }
        best
    }

    fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.parent(id).is_some()
    }
}

pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SyntaxTree, NodeId, NodeId) {
        // theme.palette
        let mut b = TreeBuilder::new("theme.palette", None);
        let theme = b.push(NodeKind::Identifier { name: "theme".into() }, Span::new(0, 5));
        let member = b.push(
            NodeKind::Member {
                object: theme,
                property: MemberProp::Name("palette".into()),
                optional: false,
            },
            Span::new(0, 13),
        );
        let stmt = b.push(NodeKind::ExprStmt { expr: member }, Span::new(0, 13));
        let program = b.push(NodeKind::Program { body: vec![stmt] }, Span::new(0, 13));
        (b.finish(program), theme, member)
    }

    #[test]
    fn test_builder_links_parents() {
        let (tree, theme, member) = sample();
        assert_eq!(tree.parent(theme), Some(member));
        assert_eq!(tree.ancestors(theme).count(), 3);
        assert!(tree.is_ancestor(member, theme));
        assert_eq!(tree.text(member), "theme.palette");
    }

    #[test]
    fn test_member_expression_at_offset() {
        let (tree, _, member) = sample();
        assert_eq!(tree.member_expression_at(13), Some(member));
        assert_eq!(tree.member_expression_at(2), Some(member));
        assert_eq!(tree.member_expression_at(14), None);
    }

    #[test]
    fn test_line_col() {
        let tree = TreeBuilder::new("a\nbc\nd", None).finish(NodeId(0));
        assert_eq!(tree.line_col(0), (1, 0));
        assert_eq!(tree.line_col(3), (2, 1));
        assert_eq!(tree.line_col(5), (3, 0));
    }
}
