// Author: Dustin Pilgrim
// License: MIT

//! Turns literal syntax into [`Value`]s without evaluating anything.
//!
//! Pure and total: every node converts to something. What cannot be known
//! statically becomes [`Value::Unresolved`] holding the node's source text.

use indexmap::IndexMap;

use crate::Value;
use crate::syntax::{NodeId, NodeKind, PropKey, SyntaxTree};
use crate::value::format_number;

/// Object and array nesting beyond this depth is left unresolved.
pub const MAX_DEPTH: usize = 64;

pub fn convert(tree: &SyntaxTree, node: NodeId) -> Value {
    convert_at(tree, node, 0)
}

fn convert_at(tree: &SyntaxTree, node: NodeId, depth: usize) -> Value {
    let node = tree.unwrap_expression(node);
    if depth > MAX_DEPTH {
        return unresolved(tree, node);
    }

    match tree.kind(node) {
        NodeKind::Object { props } => Value::Object(convert_object(tree, props, depth)),
        NodeKind::Array { elements } => Value::List(
            elements
                .iter()
                .map(|element| match element {
                    None => Value::Null,
                    Some(id) if matches!(tree.kind(*id), NodeKind::Spread { .. }) => {
                        unresolved(tree, *id)
                    }
                    Some(id) => convert_at(tree, *id, depth + 1),
                })
                .collect(),
        ),
        NodeKind::StringLit { value } => Value::String(value.clone()),
        NodeKind::Template { quasis, exprs } if exprs.is_empty() => {
            Value::String(quasis.concat())
        }
        NodeKind::NumberLit { value } => Value::Number(*value),
        NodeKind::Unary { op, arg, prefix: true } if op == "-" || op == "+" => {
            match tree.kind(tree.unwrap_expression(*arg)) {
                NodeKind::NumberLit { value } if op == "-" => Value::Number(-value),
                NodeKind::NumberLit { value } => Value::Number(*value),
                _ => unresolved(tree, node),
            }
        }
        NodeKind::BoolLit { value } => Value::Bool(*value),
        NodeKind::NullLit => Value::Null,
        NodeKind::Identifier { name } if name == "undefined" => Value::Null,
        _ => unresolved(tree, node),
    }
}

fn convert_object(tree: &SyntaxTree, props: &[NodeId], depth: usize) -> IndexMap<String, Value> {
    let mut entries = IndexMap::new();

    for prop in props {
        match tree.kind(*prop) {
            NodeKind::Property { key, value, shorthand, method } => {
                let (name, converted) = match key {
                    PropKey::Computed(expr) => {
                        (format!("[{}]", tree.text(*expr)), unresolved(tree, *value))
                    }
                    _ if *shorthand || *method => (static_key(key), unresolved(tree, *value)),
                    _ => (static_key(key), convert_at(tree, *value, depth + 1)),
                };
                // a later duplicate replaces the value and keeps the first position
                entries.insert(name, converted);
            }
            NodeKind::Spread { arg } => {
                let inner = tree.unwrap_expression(*arg);
                match tree.kind(inner) {
                    NodeKind::Object { props } => {
                        for (name, value) in convert_object(tree, props, depth + 1) {
                            entries.insert(name, value);
                        }
                    }
                    _ => {
                        let text = tree.text(*arg).to_string();
                        entries.insert(format!("...{}", text), Value::Unresolved(text));
                    }
                }
            }
            _ => {
                let text = tree.text(*prop).to_string();
                entries.insert(text.clone(), Value::Unresolved(text));
            }
        }
    }

    entries
}

fn static_key(key: &PropKey) -> String {
    match key {
        PropKey::Ident(name) | PropKey::Str(name) => name.clone(),
        PropKey::Num(n) => format_number(*n),
        PropKey::Computed(_) => String::new(),
    }
}

fn unresolved(tree: &SyntaxTree, node: NodeId) -> Value {
    Value::Unresolved(tree.text(node).to_string())
}
