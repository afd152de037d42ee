//! Grammar rules, one module per area, all as methods on
//! [`Parser`](super::core::Parser).
//!
//! - `lexical` - whitespace, comments, identifiers, keywords, operators
//! - `literals` - null, boolean, number, char and string literals
//! - `types` - type references, type arguments, type variables
//! - `expressions` - primary expressions up to assignment
//! - `statements` - blocks and statements
//! - `structures` - modifiers, members, type declarations, compilation units
//!
//! Every rule either consumes input and returns a value, or misses and leaves
//! the cursor where it was. Rules consume the whitespace after themselves.

mod expressions;
mod lexical;
mod literals;
mod statements;
mod structures;
mod types;
