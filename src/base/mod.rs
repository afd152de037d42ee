//! Foundation types for the jast toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`NodeId`] - Stable index of a node inside an [`Ast`](crate::ast::Ast) arena
//! - [`Position`] - Half-open byte spans, optionally marked as generated
//! - [`ParseProblem`], [`SyntaxProblem`] - Recorded diagnostics
//! - [`AstException`], [`UsageError`] - Returned failures
//! - [`constants`] - Keywords and identifier character classes
//!
//! This module has NO dependencies on other jast modules.

pub mod constants;
mod error;
mod node_id;
mod position;

pub use error::{AstException, ParseProblem, SyntaxProblem, UsageError};
pub use node_id::NodeId;
pub use position::Position;

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
