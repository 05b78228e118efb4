// Author: Dustin Pilgrim
// License: MIT

/// Index of a node inside its [`SyntaxTree`](super::SyntaxTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte range into the tree's source text. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span { start: self.start, end: other.end }
    }

    /// Cursor containment: a cursor sitting right after the last character
    /// still counts, which is where completion usually happens.
    pub fn contains_offset(self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Imported {
    Default,
    Named(String),
    Namespace,
}

/// One local name introduced by an `import` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBinding {
    pub local: String,
    pub imported: Imported,
}

/// `export { local as exported }`, optionally re-exported `from` another module.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(f64),
    Computed(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Name(String),
    Computed(NodeId),
    /// `theme.` with nothing typed after the dot yet.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapKind {
    As,
    Satisfies,
    NonNull,
    TypeAssertion,
}

/// The closed set of node shapes the crate understands.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // --- statements ---
    Program { body: Vec<NodeId> },
    VarDecl { kind: DeclKind, declarators: Vec<NodeId>, exported: bool },
    /// `name` is `None` for destructuring patterns.
    Declarator { name: Option<String>, pattern: Option<NodeId>, init: Option<NodeId> },
    FunctionDecl { name: Option<String>, params: Vec<NodeId>, body: NodeId, exported: bool },
    ExportDefault { expr: NodeId },
    ExportNamed { specifiers: Vec<ExportSpecifier>, source: Option<String> },
    Import { source: String, bindings: Vec<ImportBinding> },
    ExprStmt { expr: NodeId },
    Block { body: Vec<NodeId> },
    Return { arg: Option<NodeId> },
    If { test: NodeId, cons: NodeId, alt: Option<NodeId> },
    /// Anything skipped without being modelled: type declarations, classes,
    /// loops, and statements the parser recovered from.
    Opaque,

    // --- expressions ---
    Identifier { name: String },
    This,
    StringLit { value: String },
    NumberLit { value: f64 },
    BoolLit { value: bool },
    NullLit,
    RegexLit { pattern: String },
    Template { quasis: Vec<String>, exprs: Vec<NodeId> },
    TaggedTemplate { tag: NodeId, quasi: NodeId },
    Object { props: Vec<NodeId> },
    Property { key: PropKey, value: NodeId, shorthand: bool, method: bool },
    Spread { arg: NodeId },
    Array { elements: Vec<Option<NodeId>> },
    Member { object: NodeId, property: MemberProp, optional: bool },
    Call { callee: NodeId, args: Vec<NodeId>, optional: bool },
    New { callee: NodeId, args: Vec<NodeId> },
    Arrow { params: Vec<NodeId>, body: NodeId, is_async: bool },
    Function { name: Option<String>, params: Vec<NodeId>, body: NodeId },
    Unary { op: String, arg: NodeId, prefix: bool },
    Binary { op: String, left: NodeId, right: NodeId },
    Conditional { test: NodeId, cons: NodeId, alt: NodeId },
    Sequence { exprs: Vec<NodeId> },
    Paren { expr: NodeId },
    TsWrap { kind: WrapKind, expr: NodeId },
    /// A binding pattern (function parameter or destructuring target) with
    /// the names it introduces.
    Pattern { names: Vec<String>, defaults: Vec<NodeId> },
}

impl NodeKind {
    /// Direct children, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program { body } | NodeKind::Block { body } => body.clone(),
            NodeKind::VarDecl { declarators, .. } => declarators.clone(),
            NodeKind::Declarator { pattern, init, .. } => {
                pattern.iter().chain(init.iter()).copied().collect()
            }
            NodeKind::FunctionDecl { params, body, .. } | NodeKind::Function { params, body, .. } => {
                let mut out = params.clone();
                out.push(*body);
                out
            }
            NodeKind::Arrow { params, body, .. } => {
                let mut out = params.clone();
                out.push(*body);
                out
            }
            NodeKind::ExportDefault { expr }
            | NodeKind::ExprStmt { expr }
            | NodeKind::Paren { expr }
            | NodeKind::TsWrap { expr, .. } => vec![*expr],
            NodeKind::Return { arg } => arg.iter().copied().collect(),
            NodeKind::If { test, cons, alt } => {
                let mut out = vec![*test, *cons];
                out.extend(alt.iter().copied());
                out
            }
            NodeKind::Template { exprs, .. } | NodeKind::Sequence { exprs } => exprs.clone(),
            NodeKind::TaggedTemplate { tag, quasi } => vec![*tag, *quasi],
            NodeKind::Object { props } => props.clone(),
            NodeKind::Property { key, value, .. } => match key {
                PropKey::Computed(k) => vec![*k, *value],
                _ => vec![*value],
            },
            NodeKind::Spread { arg } | NodeKind::Unary { arg, .. } => vec![*arg],
            NodeKind::Array { elements } => elements.iter().flatten().copied().collect(),
            NodeKind::Member { object, property, .. } => match property {
                MemberProp::Computed(p) => vec![*object, *p],
                _ => vec![*object],
            },
            NodeKind::Call { callee, args, .. } | NodeKind::New { callee, args } => {
                let mut out = vec![*callee];
                out.extend(args.iter().copied());
                out
            }
            NodeKind::Binary { left, right, .. } => vec![*left, *right],
            NodeKind::Conditional { test, cons, alt } => vec![*test, *cons, *alt],
            NodeKind::Pattern { defaults, .. } => defaults.clone(),
            NodeKind::ExportNamed { .. }
            | NodeKind::Import { .. }
            | NodeKind::Opaque
            | NodeKind::Identifier { .. }
            | NodeKind::This
            | NodeKind::StringLit { .. }
            | NodeKind::NumberLit { .. }
            | NodeKind::BoolLit { .. }
            | NodeKind::NullLit
            | NodeKind::RegexLit { .. } => Vec::new(),
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, NodeKind::Member { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}
