// Author: Dustin Pilgrim
// License: MIT

use super::PropertyPath;
use crate::Value;

/// Walks `path` from `root`. Every intermediate value must be an object.
///
/// The empty path resolves to `None`: callers wanting the root already have it.
pub fn resolve<'a>(root: &'a Value, path: &PropertyPath) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    descend(root, path.segments())
}

fn descend<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// Completion-time summary of a child value.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Object { len: usize },
    List { len: usize },
    Scalar(Value),
    /// Source text of a value that could not be evaluated.
    Unresolved(String),
}

impl Preview {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(entries) => Preview::Object { len: entries.len() },
            Value::List(items) => Preview::List { len: items.len() },
            Value::Unresolved(text) => Preview::Unresolved(text.clone()),
            scalar => Preview::Scalar(scalar.clone()),
        }
    }
}

/// Children of the object at `parent` whose names start with `prefix`, in
/// declaration order. An empty `parent` lists the theme root itself.
pub fn suggest_children(root: &Value, parent: &PropertyPath, prefix: &str) -> Vec<(String, Preview)> {
    let Some(entries) = descend(root, parent.segments()).and_then(Value::as_object) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|(name, _)| name.starts_with(prefix))
        .map(|(name, value)| (name.clone(), Preview::of(value)))
        .collect()
}
