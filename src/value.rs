// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::ThemeError;

/// A statically extracted theme value.
///
/// `Object` keeps source declaration order. Inserting a key that already exists
/// replaces the value but keeps the first key's position, which is exactly how a
/// JavaScript object literal with a duplicate key evaluates.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(IndexMap<String, Value>),
    List(Vec<Value>),
    /// Anything that cannot be known without running the code. Holds the
    /// original source text for display.
    Unresolved(String),
}

impl Value {
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Object(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Value::Unresolved(_))
    }

    /// True for null, booleans, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// Short name of the value's shape, used in completion type text.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::List(_) => "array",
            Value::Unresolved(_) => "unresolved",
        }
    }
}

/// Formats a number the way JavaScript prints it: integers without a fraction.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Object(entries) if entries.is_empty() => write!(f, "{{}}"),
            Value::Object(_) => write!(f, "{{...}}"),
            Value::List(items) if items.is_empty() => write!(f, "[]"),
            Value::List(_) => write!(f, "[...]"),
            Value::Unresolved(text) => write!(f, "{}", text),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) | Value::Unresolved(s) => serializer.serialize_str(s),
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(entries) => {
                Value::Object(entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ThemeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(ThemeError::type_error(
                format!("Expected string, got {}", value.kind_name()),
                "Only string theme values convert to String",
                401,
            )),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ThemeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => Ok(n),
            _ => Err(ThemeError::type_error(
                format!("Expected number, got {}", value.kind_name()),
                "Only numeric theme values convert to f64",
                402,
            )),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ThemeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(ThemeError::type_error(
                format!("Expected boolean, got {}", value.kind_name()),
                "Only true/false theme values convert to bool",
                404,
            )),
        }
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ThemeError>,
{
    type Error = ThemeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::List(items) => items.into_iter().map(T::try_from).collect(),
            _ => Err(ThemeError::type_error(
                format!("Expected array, got {}", value.kind_name()),
                "Only array theme values convert to Vec",
                405,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_keeps_first_position_and_last_value() {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), Value::Number(1.0));
        entries.insert("b".to_string(), Value::Number(2.0));
        entries.insert("a".to_string(), Value::Number(3.0));

        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(entries["a"], Value::Number(3.0));
    }

    #[test]
    fn test_display_previews() {
        assert_eq!(Value::Number(4.0).to_string(), "4");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::List(vec![Value::Null]).to_string(), "[...]");
        assert_eq!(Value::Object(IndexMap::new()).to_string(), "{}");
        assert_eq!(Value::Unresolved("(n) => n * 8".into()).to_string(), "(n) => n * 8");
    }

    #[test]
    fn test_serialize_to_json() {
        let mut inner = IndexMap::new();
        inner.insert("main".to_string(), Value::String("#1976d2".into()));
        let mut root = IndexMap::new();
        root.insert("primary".to_string(), Value::Object(inner));
        root.insert("radius".to_string(), Value::Number(4.0));
        root.insert("spacing".to_string(), Value::Unresolved("(n) => n * 8".into()));

        let json = serde_json::to_string(&Value::Object(root)).unwrap();
        assert_eq!(
            json,
            r##"{"primary":{"main":"#1976d2"},"radius":4,"spacing":"(n) => n * 8"}"##
        );
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value = serde_json::from_str(r#"{"b": [1, true], "a": null}"#).unwrap();
        let value = Value::from(json);
        let obj = value.as_object().unwrap();
        assert_eq!(obj["b"], Value::List(vec![Value::Number(1.0), Value::Bool(true)]));
        assert_eq!(obj["a"], Value::Null);
    }

    #[test]
    fn test_try_from_conversions() {
        let s: String = Value::String("hello".into()).try_into().unwrap();
        assert_eq!(s, "hello");

        let n: f64 = Value::Number(8.0).try_into().unwrap();
        assert_eq!(n, 8.0);

        let list: Vec<f64> = Value::List(vec![Value::Number(0.0), Value::Number(4.0)])
            .try_into()
            .unwrap();
        assert_eq!(list, vec![0.0, 4.0]);

        let err: Result<bool, ThemeError> = Value::Unresolved("x".into()).try_into();
        assert_eq!(err.unwrap_err().code(), Some(404));
    }
}
