// Author: Dustin Pilgrim
// License: MIT

pub mod context;
pub mod convert;
pub mod document;
pub mod engine;
pub mod error;
pub mod export;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod path;
pub mod present;
pub mod resolver;
pub mod syntax;
pub mod utils;
pub mod value;
pub mod workspace;

pub use context::{BindingStyle, StructuralContext, ThemeAccessContext};
pub use document::ThemeDocument;
pub use engine::{CompletionItem, CursorQuery, Engine, InlayHint};
pub use error::ThemeError;
pub use options::ResolverOptions;
pub use path::{CompletionQuery, Preview, PropertyPath};
pub use resolver::{ImportResolver, Located, MemoryImports, NoImports, Rule};
pub use syntax::{NodeId, SyntaxTree};
pub use value::Value;
pub use workspace::{FsImportResolver, ThemeCache, ThemeManifest};
