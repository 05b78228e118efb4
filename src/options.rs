// Author: Dustin Pilgrim
// License: MIT

use serde::{Deserialize, Serialize};

use crate::ThemeError;

/// Knobs a host can set, typically from its JSON settings.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Callees whose first object-literal argument is the theme. Matched
    /// against the last segment of the callee, so `MUI.createTheme` counts.
    pub theme_constructors: Vec<String>,
    /// Tag or callee text prefix that marks styled-component code.
    pub styled_prefix: String,
    /// How many imports `locate` may follow from the starting file.
    pub max_import_hops: usize,
    /// Only report theme accesses inside styled tags or styled calls.
    pub require_styled_context: bool,
    /// Longest inlay hint, in characters, before it is cut with `...`.
    pub inlay_max_len: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            theme_constructors: vec!["createTheme".into(), "extendTheme".into()],
            styled_prefix: "styled".into(),
            max_import_hops: 1,
            require_styled_context: false,
            inlay_max_len: 50,
        }
    }
}

impl ResolverOptions {
    /// Parses options from a JSON object and validates them.
    pub fn from_json_str(input: &str) -> Result<Self, ThemeError> {
        let options: ResolverOptions =
            serde_json::from_str(input).map_err(|e| ThemeError::Options {
                message: format!("Failed to parse options: {}", e),
                hint: Some("Options must be a JSON object".into()),
            })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.styled_prefix.trim().is_empty() {
            return Err(ThemeError::Options {
                message: "styled_prefix must not be empty".into(),
                hint: Some("Use \"styled\" for styled-components and Emotion".into()),
            });
        }

        if let Some(index) = self.theme_constructors.iter().position(|c| c.trim().is_empty()) {
            return Err(ThemeError::Options {
                message: format!("theme_constructors[{}] is empty", index),
                hint: Some("Remove the empty entry".into()),
            });
        }

        // room for at least one character and the ellipsis
        if self.inlay_max_len < 4 {
            return Err(ThemeError::Options {
                message: format!("inlay_max_len must be at least 4, got {}", self.inlay_max_len),
                hint: None,
            });
        }

        Ok(())
    }

    /// Whether `name` (the last segment of a callee) is a theme constructor.
    pub fn is_theme_constructor(&self, name: &str) -> bool {
        self.theme_constructors.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResolverOptions::default();
        assert!(options.is_theme_constructor("createTheme"));
        assert!(options.is_theme_constructor("extendTheme"));
        assert!(!options.is_theme_constructor("makeStyles"));
        assert_eq!(options.styled_prefix, "styled");
        assert_eq!(options.max_import_hops, 1);
        assert_eq!(options.inlay_max_len, 50);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = ResolverOptions::from_json_str(r#"{ "max_import_hops": 3 }"#)
            .expect("Failed to parse options");
        assert_eq!(options.max_import_hops, 3);
        assert_eq!(options.styled_prefix, "styled");
        assert_eq!(options.theme_constructors.len(), 2);
    }

    #[test]
    fn test_validation_errors() {
        let err = ResolverOptions::from_json_str(r#"{ "styled_prefix": " " }"#).unwrap_err();
        assert!(matches!(err, ThemeError::Options { .. }));

        let err = ResolverOptions::from_json_str(r#"{ "theme_constructors": ["createTheme", ""] }"#)
            .unwrap_err();
        assert!(err.to_string().contains("theme_constructors[1]"));

        assert!(ResolverOptions::from_json_str("[1, 2]").is_err());
    }
}
