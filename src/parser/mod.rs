//! Java-family parser producing a position-preserving [`Ast`](crate::ast::Ast).
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Preprocessor → backslash-u escapes decoded, offset delta table
//!     ↓
//! Parser (core + grammar) → scratch arena, comments, tokens, problems
//!     ↓
//! Source → result arena: trimmed spans, javadoc attached, raw offsets
//! ```
//!
//! The grammar is a backtracking recursive-descent parser over the decoded
//! text. A rule that fails rolls back everything it created. Once a keyword
//! commits a construct, later failures are reported instead of backtracked
//! over, and the enclosing block or body skips the broken construct and
//! carries on, so a source with errors still yields a tree.

mod core;
mod grammar;
mod options;
mod preprocess;
mod source;

pub use options::ParseOptions;
pub use preprocess::Preprocessed;
pub use source::{ParseResult, Source, SourceStructure, parse_all};
