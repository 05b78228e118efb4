// Author: Dustin Pilgrim
// License: MIT

use thiserror::Error;

/// The main error type for theme parsing, loading and typed access.
///
/// "Not found" outcomes are never errors in this crate; they are `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThemeError {
    #[error("[THEME] Syntax Error at {line}:{column}: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for characters the lexer cannot start a token with.
    #[error("[THEME] Unexpected character '{character}' at {line}:{column}{}{}", hint_suffix(.hint), code_suffix(.code))]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a string literal is not closed.
    #[error("[THEME] Unclosed string starting with '{quote}' at {line}:{column}{}{}", hint_suffix(.hint), code_suffix(.code))]
    UnclosedString {
        quote: char,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[THEME] Unclosed template literal at {line}:{column}{}{}", hint_suffix(.hint), code_suffix(.code))]
    UnclosedTemplate {
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[THEME] Unexpected EOF at {line}:{column}: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    UnexpectedEof {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised by the `TryFrom<Value>` conversions.
    #[error("[THEME] Type Error: {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    Type {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[THEME] File Error '{path}': {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    File {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[THEME] Manifest Error '{path}': {message}{}{}", hint_suffix(.hint), code_suffix(.code))]
    Manifest {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    #[error("[THEME] Invalid options: {message}{}", hint_suffix(.hint))]
    Options {
        message: String,
        hint: Option<String>,
    },
    /// A broken internal invariant, e.g. a document whose root is not an object.
    /// This is a bug in the loading pipeline, not a problem with user content.
    #[error("[THEME] Invariant violated: {message}")]
    Invariant { message: String },
}

pub type Result<T> = std::result::Result<T, ThemeError>;

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h))
}

fn code_suffix(code: &Option<u32>) -> String {
    code.map_or(String::new(), |c| format!(" Code: {}", c))
}

impl ThemeError {
    /// Helper for file-related errors raised by the host adapters.
    pub fn file_error(message: String, path: String) -> Self {
        ThemeError::File {
            message,
            path,
            hint: Some("Check file path and permissions".into()),
            code: Some(300),
        }
    }

    pub fn type_error(message: String, hint: &str, code: u32) -> Self {
        ThemeError::Type {
            message,
            hint: Some(hint.into()),
            code: Some(code),
        }
    }

    /// Numeric code, when the variant carries one.
    pub fn code(&self) -> Option<u32> {
        match self {
            ThemeError::Syntax { code, .. }
            | ThemeError::UnexpectedCharacter { code, .. }
            | ThemeError::UnclosedString { code, .. }
            | ThemeError::UnclosedTemplate { code, .. }
            | ThemeError::UnexpectedEof { code, .. }
            | ThemeError::Type { code, .. }
            | ThemeError::File { code, .. }
            | ThemeError::Manifest { code, .. } => *code,
            ThemeError::Options { .. } | ThemeError::Invariant { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_hint_and_code() {
        let err = ThemeError::Syntax {
            message: "Expected ')'".into(),
            line: 3,
            column: 7,
            hint: Some("Close the argument list".into()),
            code: Some(202),
        };
        assert_eq!(
            err.to_string(),
            "[THEME] Syntax Error at 3:7: Expected ')' Hint: Close the argument list Code: 202"
        );
    }

    #[test]
    fn test_display_without_hint() {
        let err = ThemeError::Invariant { message: "root is a list".into() };
        assert_eq!(err.to_string(), "[THEME] Invariant violated: root is a list");
        assert_eq!(err.code(), None);
    }
}
