//! # jast-base
//!
//! Position-preserving parser and mutable AST for Java-family source code.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! template  → Snippet parsing, placeholder filling, generated positions
//!   ↓
//! parser    → Backslash-u preprocessing, PEG grammar, Source pipeline
//!   ↓
//! ast       → Node arena, typed wrappers, slots, visitor, syntax checks
//!   ↓
//! base      → Primitives (NodeId, Position, problems and errors)
//! ```

// ============================================================================
// MODULES (dependency order: base → ast → parser → template)
// ============================================================================

/// Foundation types: NodeId, Position, problems and errors
pub mod base;

/// The node arena, typed node wrappers and the visitor
pub mod ast;

/// Preprocessor, grammar and the per-source parse pipeline
pub mod parser;

/// Building subtrees from parsed snippets
pub mod template;

// Re-export foundation types
pub use base::{AstException, NodeId, ParseProblem, Position, SyntaxProblem, UsageError};

// Re-export the tree
pub use ast::{Ast, AstNode, AstVisitor, Category, ChildSlot, ListSlot, NodeKind};

// Re-export the parser surface
pub use parser::{ParseOptions, ParseResult, Source, SourceStructure, parse_all};

pub use template::Template;
