// Author: Dustin Pilgrim
// License: MIT

//! Finds the object literal that defines the theme.
//!
//! Rules, in priority order, over a file's top-level statements:
//!
//! 1. a variable named `theme` initialized with an object literal;
//! 2. a variable or default export initialized with a theme-constructor call
//!    (`createTheme({...})`) whose first argument is an object literal;
//! 3. a default export that is an object literal;
//! 4. an identifier in one of those positions, followed to a local variable
//!    or through an import into another file, plus re-exports of `theme` or
//!    `default`.
//!
//! The first rule that matches wins; within a rule, the first statement wins.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::document::fingerprint;
use crate::options::ResolverOptions;
use crate::syntax::{Imported, MemberProp, NodeId, NodeKind, SyntaxTree};

mod imports;

pub use imports::{ImportResolver, MemoryImports, NoImports};

/// How many local `const a = b` hops are followed before giving up.
const MAX_LOCAL_STEPS: usize = 16;

/// Which rule found the theme literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ThemeVariable,
    ConstructorCall,
    DefaultExport,
}

/// Either the caller's tree or one loaded through an [`ImportResolver`].
#[derive(Debug, Clone)]
pub enum TreeRef<'a> {
    Borrowed(&'a SyntaxTree),
    Shared(Arc<SyntaxTree>),
}

impl Deref for TreeRef<'_> {
    type Target = SyntaxTree;

    fn deref(&self) -> &SyntaxTree {
        match self {
            TreeRef::Borrowed(tree) => tree,
            TreeRef::Shared(tree) => tree,
        }
    }
}

/// The theme literal and the tree it lives in.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    tree: TreeRef<'a>,
    node: NodeId,
    rule: Rule,
    hops: usize,
    trail: Vec<String>,
}

impl Located<'_> {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The object literal node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Imports followed to reach the literal; 0 when it is in the starting file.
    pub fn hops(&self) -> usize {
        self.hops
    }

    /// Fingerprint of every file that contributed, starting file first.
    /// Equal to the starting tree's fingerprint when no import was followed.
    pub fn fingerprint(&self) -> String {
        match self.trail.as_slice() {
            [single] => single.clone(),
            parts => {
                let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                fingerprint(&parts)
            }
        }
    }
}

/// Runs the rules over `tree`, following imports through `imports`.
/// `None` is the normal "no theme here" outcome.
pub fn locate<'a>(
    tree: &'a SyntaxTree,
    imports: &dyn ImportResolver,
    options: &ResolverOptions,
) -> Option<Located<'a>> {
    let mut search = Search {
        imports,
        options,
        visited: HashSet::new(),
    };
    search.visited.insert(tree_key(tree));

    let frame = Frame {
        tree: TreeRef::Borrowed(tree),
        hops: 0,
        trail: vec![tree.fingerprint().to_string()],
    };

    let located = search.apply_rules(&frame);
    match &located {
        Some(found) => debug!(
            rule = ?found.rule,
            hops = found.hops,
            path = ?found.tree.path(),
            "located theme literal"
        ),
        None => debug!(path = ?tree.path(), "no theme literal found"),
    }
    located
}

/// Identifies a tree for cycle detection: its path, or its content.
fn tree_key(tree: &SyntaxTree) -> String {
    match tree.path() {
        Some(path) => path.display().to_string(),
        None => tree.fingerprint().to_string(),
    }
}

/// One file on the search path.
struct Frame<'a> {
    tree: TreeRef<'a>,
    hops: usize,
    trail: Vec<String>,
}

impl<'a> Frame<'a> {
    fn found(&self, node: NodeId, rule: Rule) -> Located<'a> {
        Located {
            tree: self.tree.clone(),
            node,
            rule,
            hops: self.hops,
            trail: self.trail.clone(),
        }
    }

    fn enter(&self, tree: Arc<SyntaxTree>) -> Frame<'a> {
        let mut trail = self.trail.clone();
        trail.push(tree.fingerprint().to_string());
        Frame {
            tree: TreeRef::Shared(tree),
            hops: self.hops + 1,
            trail,
        }
    }
}

struct Search<'r> {
    imports: &'r dyn ImportResolver,
    options: &'r ResolverOptions,
    visited: HashSet<String>,
}

impl Search<'_> {
    fn apply_rules<'a>(&mut self, frame: &Frame<'a>) -> Option<Located<'a>> {
        self.theme_variable(frame)
            .or_else(|| self.constructor_call(frame))
            .or_else(|| self.default_object(frame))
            .or_else(|| self.followed_reference(frame))
    }

    /// Rule 1: `const theme = { ... }`
    fn theme_variable<'a>(&mut self, frame: &Frame<'a>) -> Option<Located<'a>> {
        trace!("rule: theme variable");
        let tree = &*frame.tree;
        declarators(tree)
            .filter(|(name, _)| *name == Some("theme"))
            .find_map(|(_, init)| {
                let init = tree.unwrap_expression(init);
                is_object(tree, init).then(|| frame.found(init, Rule::ThemeVariable))
            })
    }

    /// Rule 2: `createTheme({ ... })` as any initializer or default export.
    fn constructor_call<'a>(&mut self, frame: &Frame<'a>) -> Option<Located<'a>> {
        trace!("rule: theme constructor call");
        let tree = &*frame.tree;
        theme_expressions(tree).into_iter().find_map(|expr| {
            let arg = self.constructor_argument(tree, expr)?;
            is_object(tree, arg).then(|| frame.found(arg, Rule::ConstructorCall))
        })
    }

    /// Rule 3: `export default { ... }`
    fn default_object<'a>(&mut self, frame: &Frame<'a>) -> Option<Located<'a>> {
        trace!("rule: default export object");
        let tree = &*frame.tree;
        tree.statements().iter().find_map(|stmt| match tree.kind(*stmt) {
            NodeKind::ExportDefault { expr } => {
                let expr = tree.unwrap_expression(*expr);
                is_object(tree, expr).then(|| frame.found(expr, Rule::DefaultExport))
            }
            _ => None,
        })
    }

    /// Rule 4: references in theme positions, followed locally or across
    /// imports, and re-exports of `theme` / `default`.
    fn followed_reference<'a>(&mut self, frame: &Frame<'a>) -> Option<Located<'a>> {
        trace!("rule: followed reference");
        let tree = frame.tree.clone();

        for stmt in tree.statements() {
            let found = match tree.kind(*stmt) {
                NodeKind::VarDecl { declarators, .. } => declarators.iter().find_map(|decl| {
                    let NodeKind::Declarator { name, init: Some(init), .. } = tree.kind(*decl) else {
                        return None;
                    };
                    if name.as_deref() == Some("theme") {
                        let init = tree.unwrap_expression(*init);
                        if let Some(found) = self.follow_site(frame, init, Rule::ThemeVariable, 0) {
                            return Some(found);
                        }
                    }
                    let arg = self.constructor_argument(&tree, *init)?;
                    self.follow_site(frame, arg, Rule::ConstructorCall, 0)
                }),
                NodeKind::ExportDefault { expr } => {
                    let expr = tree.unwrap_expression(*expr);
                    match self.constructor_argument(&tree, expr) {
                        Some(arg) => self.follow_site(frame, arg, Rule::ConstructorCall, 0),
                        None => self.follow_site(frame, expr, Rule::DefaultExport, 0),
                    }
                }
                NodeKind::ExportNamed { specifiers, source } => specifiers
                    .iter()
                    .filter(|s| s.exported == "theme" || s.exported == "default")
                    .find_map(|s| {
                        let rule = if s.exported == "theme" {
                            Rule::ThemeVariable
                        } else {
                            Rule::DefaultExport
                        };
                        match source {
                            Some(source) => self.follow_import(frame, source, &s.local, rule),
                            None => self.follow_reference(frame, &s.local, rule, 0),
                        }
                    }),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// A reference in a theme position: an identifier or `namespace.member`.
    fn follow_site<'a>(
        &mut self,
        frame: &Frame<'a>,
        expr: NodeId,
        rule: Rule,
        steps: usize,
    ) -> Option<Located<'a>> {
        let tree = frame.tree.clone();
        match tree.kind(expr) {
            NodeKind::Identifier { name } => self.follow_reference(frame, name, rule, steps),
            NodeKind::Member { object, property: MemberProp::Name(member), .. } => {
                let namespace = tree.identifier_name(tree.unwrap_expression(*object))?;
                let (source, Imported::Namespace) = import_binding(&tree, namespace)? else {
                    return None;
                };
                self.follow_import(frame, &source, member, rule)
            }
            _ => None,
        }
    }

    /// Resolves a name to a local declaration or an import binding.
    fn follow_reference<'a>(
        &mut self,
        frame: &Frame<'a>,
        name: &str,
        rule: Rule,
        steps: usize,
    ) -> Option<Located<'a>> {
        if steps >= MAX_LOCAL_STEPS {
            debug!(name, "too many local indirections");
            return None;
        }

        let tree = frame.tree.clone();
        if let Some(init) = local_init(&tree, name) {
            trace!(name, "following local variable");
            return self.theme_value(frame, init, rule, steps + 1);
        }

        let (source, imported) = import_binding(&tree, name)?;
        match imported {
            Imported::Default => self.follow_import(frame, &source, "default", rule),
            Imported::Named(export) => self.follow_import(frame, &source, &export, rule),
            Imported::Namespace => None,
        }
    }

    /// An expression that should evaluate to the theme object.
    fn theme_value<'a>(
        &mut self,
        frame: &Frame<'a>,
        expr: NodeId,
        rule: Rule,
        steps: usize,
    ) -> Option<Located<'a>> {
        let tree = frame.tree.clone();
        let expr = tree.unwrap_expression(expr);

        if is_object(&tree, expr) {
            return Some(frame.found(expr, rule));
        }
        if let Some(arg) = self.constructor_argument(&tree, expr) {
            if is_object(&tree, arg) {
                return Some(frame.found(arg, Rule::ConstructorCall));
            }
            return self.follow_site(frame, arg, rule, steps);
        }
        self.follow_site(frame, expr, rule, steps)
    }

    /// Follows `specifier` into another file and looks up `export` there,
    /// falling back to the rules when the export is not found directly.
    fn follow_import<'a>(
        &mut self,
        frame: &Frame<'a>,
        specifier: &str,
        export: &str,
        rule: Rule,
    ) -> Option<Located<'a>> {
        if frame.hops >= self.options.max_import_hops {
            debug!(specifier, hops = frame.hops, "import hop limit reached");
            return None;
        }

        let Some(target) = self.imports.resolve_import(frame.tree.path(), specifier) else {
            debug!(specifier, "import not resolved");
            return None;
        };
        if !self.visited.insert(tree_key(&target)) {
            debug!(specifier, "import cycle");
            return None;
        }

        trace!(specifier, export, "following import");
        let next = frame.enter(target);
        self.find_export(&next, export, rule)
            .or_else(|| self.apply_rules(&next))
    }

    /// The value exported under `name` (`"default"` for the default export).
    fn find_export<'a>(&mut self, frame: &Frame<'a>, name: &str, rule: Rule) -> Option<Located<'a>> {
        let tree = frame.tree.clone();
        let mut star_sources = Vec::new();

        for stmt in tree.statements() {
            match tree.kind(*stmt) {
                NodeKind::ExportDefault { expr } if name == "default" => {
                    return self.theme_value(frame, *expr, rule, 0);
                }
                NodeKind::VarDecl { declarators, exported: true, .. } => {
                    for decl in declarators {
                        if let NodeKind::Declarator { name: Some(decl_name), init: Some(init), .. } =
                            tree.kind(*decl)
                            && decl_name == name
                        {
                            return self.theme_value(frame, *init, rule, 0);
                        }
                    }
                }
                NodeKind::ExportNamed { specifiers, source } => {
                    for spec in specifiers {
                        if spec.local == "*" && spec.exported == "*" {
                            star_sources.extend(source.iter().cloned());
                        } else if spec.exported == name {
                            return match source {
                                Some(source) => self.follow_import(frame, source, &spec.local, rule),
                                None => self.follow_reference(frame, &spec.local, rule, 0),
                            };
                        }
                    }
                }
                _ => {}
            }
        }

        // `export * from` never re-exports `default`
        if name != "default" {
            for source in star_sources {
                if let Some(found) = self.follow_import(frame, &source, name, rule) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// First argument of a theme-constructor call, unwrapped.
    fn constructor_argument(&self, tree: &SyntaxTree, expr: NodeId) -> Option<NodeId> {
        let NodeKind::Call { callee, args, .. } = tree.kind(tree.unwrap_expression(expr)) else {
            return None;
        };
        let name = callee_name(tree, *callee)?;
        if !self.options.is_theme_constructor(name) {
            return None;
        }
        let first = *args.first()?;
        Some(tree.unwrap_expression(first))
    }
}

/// Last segment of a callee: `createTheme` for both `createTheme` and
/// `MUI.createTheme`.
fn callee_name(tree: &SyntaxTree, callee: NodeId) -> Option<&str> {
    match tree.kind(tree.unwrap_expression(callee)) {
        NodeKind::Identifier { name } => Some(name),
        NodeKind::Member { property: MemberProp::Name(name), .. } => Some(name),
        _ => None,
    }
}

fn is_object(tree: &SyntaxTree, id: NodeId) -> bool {
    matches!(tree.kind(id), NodeKind::Object { .. })
}

/// Named top-level declarators with an initializer, in source order.
fn declarators(tree: &SyntaxTree) -> impl Iterator<Item = (Option<&str>, NodeId)> + '_ {
    tree.statements()
        .iter()
        .filter_map(move |stmt| match tree.kind(*stmt) {
            NodeKind::VarDecl { declarators, .. } => Some(declarators),
            _ => None,
        })
        .flatten()
        .filter_map(move |decl| match tree.kind(*decl) {
            NodeKind::Declarator { name, init: Some(init), .. } => Some((name.as_deref(), *init)),
            _ => None,
        })
}

/// Expressions that may hold a constructor call: initializers and default
/// exports, in source order.
fn theme_expressions(tree: &SyntaxTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    for stmt in tree.statements() {
        match tree.kind(*stmt) {
            NodeKind::VarDecl { declarators, .. } => {
                out.extend(declarators.iter().filter_map(|decl| match tree.kind(*decl) {
                    NodeKind::Declarator { init: Some(init), .. } => Some(*init),
                    _ => None,
                }));
            }
            NodeKind::ExportDefault { expr } => out.push(*expr),
            _ => {}
        }
    }
    out
}

/// Initializer of the first top-level variable named `name`.
fn local_init(tree: &SyntaxTree, name: &str) -> Option<NodeId> {
    declarators(tree).find_map(|(decl_name, init)| (decl_name == Some(name)).then_some(init))
}

/// Module and imported name bound to a local import name.
fn import_binding(tree: &SyntaxTree, local: &str) -> Option<(String, Imported)> {
    tree.statements().iter().find_map(|stmt| match tree.kind(*stmt) {
        NodeKind::Import { source, bindings } => bindings
            .iter()
            .find(|b| b.local == local)
            .map(|b| (source.clone(), b.imported.clone())),
        _ => None,
    })
}
