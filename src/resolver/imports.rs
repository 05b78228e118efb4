// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::syntax::SyntaxTree;

/// Turns an import specifier into the syntax tree of the imported module.
///
/// `from` is the path of the importing file, when known. Returning `None`
/// means "not available" and simply ends the search along that import.
pub trait ImportResolver {
    fn resolve_import(&self, from: Option<&Path>, specifier: &str) -> Option<Arc<SyntaxTree>>;
}

/// Never resolves anything. Theme lookup stays within the starting file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

impl ImportResolver for NoImports {
    fn resolve_import(&self, _from: Option<&Path>, _specifier: &str) -> Option<Arc<SyntaxTree>> {
        None
    }
}

/// Specifier-keyed trees held in memory, e.g. the host's open buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryImports {
    trees: HashMap<String, Arc<SyntaxTree>>,
}

impl MemoryImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, specifier: impl Into<String>, tree: impl Into<Arc<SyntaxTree>>) {
        self.trees.insert(specifier.into(), tree.into());
    }

    pub fn with(mut self, specifier: impl Into<String>, tree: impl Into<Arc<SyntaxTree>>) -> Self {
        self.insert(specifier, tree);
        self
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl ImportResolver for MemoryImports {
    fn resolve_import(&self, _from: Option<&Path>, specifier: &str) -> Option<Arc<SyntaxTree>> {
        self.trees.get(specifier).cloned()
    }
}
