// Author: Dustin Pilgrim
// License: MIT

//! Text shown to the user: hover cards, inlay hints, completion type text and
//! the flattened key list used by the legacy JSON completion.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::Value;
use crate::path::PropertyPath;
use crate::utils::{single_line, truncate_preview};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").expect("valid hex color regex")
});

/// Longest completion type text before it is cut.
const TYPE_TEXT_MAX_LEN: usize = 50;

/// Dotted keys of every non-object leaf, depth first in declaration order.
/// Empty objects contribute nothing.
///
/// A key that itself contains a dot (`'font.size'`) is joined as is, so its
/// string no longer splits back into the same segments. Use
/// [`flatten_entries`] when the segments matter.
pub fn flatten_keys(root: &Value) -> Vec<String> {
    flatten_entries(root)
        .into_iter()
        .map(|(path, _)| path.to_string())
        .collect()
}

/// Like [`flatten_keys`], keeping the path segments and the leaf value.
pub fn flatten_entries(root: &Value) -> Vec<(PropertyPath, &Value)> {
    let mut out = Vec::new();
    collect_leaves(root, &PropertyPath::empty(), &mut out);
    out
}

fn collect_leaves<'a>(value: &'a Value, prefix: &PropertyPath, out: &mut Vec<(PropertyPath, &'a Value)>) {
    let Some(entries) = value.as_object() else {
        return;
    };
    for (key, child) in entries {
        let path = prefix.child(key.as_str());
        if child.is_object() {
            collect_leaves(child, &path, out);
        } else {
            out.push((path, child));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub fn is_hex_color(text: &str) -> bool {
    HEX_COLOR.is_match(text)
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`. Alpha defaults to opaque.
pub fn parse_hex_color(text: &str) -> Option<Rgba> {
    if !is_hex_color(text) {
        return None;
    }

    let digits = &text[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let bytes = hex::decode(expanded).ok()?;
    Some(Rgba {
        r: bytes[0],
        g: bytes[1],
        b: bytes[2],
        a: bytes.get(3).copied().unwrap_or(u8::MAX),
    })
}

/// Everything a host needs to render a hover card for a theme path.
#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    /// `theme.palette.primary.main`
    pub full_path: String,
    pub value: HoverValue,
    /// Set when the value is a hex color string.
    pub color: Option<Rgba>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverValue {
    Object,
    Array,
    String(String),
    /// Numbers, booleans, null and unevaluated source, as display text.
    Other(String),
}

pub fn hover(path: &PropertyPath, value: &Value) -> Hover {
    let (hover_value, color) = match value {
        Value::Object(_) => (HoverValue::Object, None),
        Value::List(_) => (HoverValue::Array, None),
        Value::String(s) => (HoverValue::String(s.clone()), parse_hex_color(s)),
        other => (HoverValue::Other(other.to_string()), None),
    };

    Hover {
        full_path: format!("theme.{}", path),
        value: hover_value,
        color,
    }
}

impl fmt::Display for Hover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MUI Theme Path: {}", self.full_path)?;
        write!(f, "Resolved Value: ")?;
        match &self.value {
            HoverValue::Object => write!(f, "Object {{...}}"),
            HoverValue::Array => write!(f, "Array [...]"),
            HoverValue::String(s) => write!(f, "\"{}\"", s),
            HoverValue::Other(text) => write!(f, "{}", text),
        }
    }
}

/// Hint text shown after a complete theme path, e.g. `:"#1976d2"`.
///
/// Objects, arrays and null get no hint. The value text is cut to `max_len`
/// characters before strings are quoted.
pub fn inlay_text(value: &Value, max_len: usize) -> Option<String> {
    match value {
        Value::Object(_) | Value::List(_) | Value::Null => None,
        Value::String(s) => Some(format!(":\"{}\"", truncate_preview(s, max_len))),
        Value::Unresolved(text) => Some(format!(":{}", truncate_preview(&single_line(text), max_len))),
        other => Some(format!(":{}", truncate_preview(&other.to_string(), max_len))),
    }
}

/// Right-hand text of a completion item.
pub fn completion_type_text(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", truncate_preview(s, TYPE_TEXT_MAX_LEN)),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        Value::Unresolved(text) => truncate_preview(&single_line(text), TYPE_TEXT_MAX_LEN),
        other => other.kind_name().to_string(),
    }
}
