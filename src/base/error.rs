//! Diagnostic and error types
//!
//! Three failure channels are kept apart:
//! - [`ParseProblem`]: the grammar could not match some input (recorded, never fatal)
//! - [`SyntaxProblem`] / [`AstException`]: a built tree violates a node's shape
//! - [`UsageError`]: calling code broke a tree-ownership rule

use std::fmt;

use thiserror::Error;

use super::{NodeId, Position};

/// A lexical or syntactic failure found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProblem {
    /// Where the failure occurred (raw-input offsets once exposed by a `Source`)
    pub position: Position,
    /// Human-readable message
    pub message: String,
}

impl ParseProblem {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }

    /// Create a problem at a single offset with a zero-width position
    pub fn at_offset(offset: usize, message: impl Into<String>) -> Self {
        Self::new(Position::at(offset), message)
    }
}

impl fmt::Display for ParseProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

/// A shape violation found by a syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxProblem {
    /// The offending node
    pub node: NodeId,
    /// Human-readable message
    pub message: String,
}

impl SyntaxProblem {
    pub fn new(node: NodeId, message: impl Into<String>) -> Self {
        Self {
            node,
            message: message.into(),
        }
    }

    /// Promote this problem to an exception for assert-mode callers.
    pub fn into_exception(self) -> AstException {
        AstException::new(Some(self.node), self.message)
    }
}

impl fmt::Display for SyntaxProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.node, self.message)
    }
}

/// A value or shape could not be produced from an otherwise well-formed tree.
///
/// Returned by strict accessors (e.g. decoding a literal) and by
/// assert-mode validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AstException {
    pub node: Option<NodeId>,
    pub message: String,
}

impl AstException {
    pub fn new(node: Option<NodeId>, message: impl Into<String>) -> Self {
        Self {
            node,
            message: message.into(),
        }
    }

    pub fn on(node: NodeId, message: impl Into<String>) -> Self {
        Self::new(Some(node), message)
    }
}

/// Calling code violated an ownership or list-membership rule.
///
/// These indicate a bug in the caller, not in the parsed source. The tree is
/// never modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("{child} already has a parent ({parent})")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("{child} is not a child of {owner}")]
    NotAChild { child: NodeId, owner: NodeId },

    #[error("{reference} is not in this list of {owner}")]
    NotInList { reference: NodeId, owner: NodeId },

    #[error("{id} is not a(n) {expected}")]
    WrongKind { id: NodeId, expected: &'static str },

    #[error("{0} can't be its own ancestor")]
    Cycle(NodeId),

    #[error("template: {0}")]
    TemplateMisuse(String),
}

impl UsageError {
    pub fn template(message: impl Into<String>) -> Self {
        Self::TemplateMisuse(message.into())
    }
}
