// Author: Dustin Pilgrim
// License: MIT

//! Property paths relative to the theme root, and how they are pulled out of
//! member expressions and walked against a theme value.

use std::fmt;
use std::str::FromStr;

use crate::ThemeError;

mod extract;
mod resolve;

pub use extract::{CompletionQuery, extract};
pub use resolve::{Preview, resolve, suggest_children};

/// Dotted path below the theme root: `palette.primary.main` is
/// `["palette", "primary", "main"]`. Never includes `theme` or `props`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn new(segments: Vec<String>) -> Self {
        PropertyPath(segments)
    }

    pub fn empty() -> Self {
        PropertyPath(Vec::new())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// All but the last segment.
    pub fn parent(&self) -> PropertyPath {
        match self.0.split_last() {
            Some((_, rest)) => PropertyPath(rest.to_vec()),
            None => PropertyPath::empty(),
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> PropertyPath {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        PropertyPath(segments)
    }

    /// Parses `a.b.c`. The empty string is the empty path; empty segments
    /// (`a..b`, `.a`) are rejected.
    pub fn parse_dotted(input: &str) -> Result<Self, ThemeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(PropertyPath::empty());
        }

        let mut segments = Vec::new();
        let mut column = 0;
        for segment in trimmed.split('.') {
            if segment.is_empty() {
                return Err(ThemeError::Syntax {
                    message: format!("Empty segment in path '{}'", trimmed),
                    line: 1,
                    column,
                    hint: Some("Paths look like palette.primary.main".into()),
                    code: Some(301),
                });
            }
            column += segment.chars().count() + 1;
            segments.push(segment.to_string());
        }
        Ok(PropertyPath(segments))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for PropertyPath {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse_dotted(s)
    }
}

impl From<Vec<String>> for PropertyPath {
    fn from(segments: Vec<String>) -> Self {
        PropertyPath(segments)
    }
}

impl From<&[&str]> for PropertyPath {
    fn from(segments: &[&str]) -> Self {
        PropertyPath(segments.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests;
