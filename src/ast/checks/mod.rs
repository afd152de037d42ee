//! Syntactic validity checks.
//!
//! These catch trees the grammar accepts (or a program builds) that the
//! language does not allow: missing mandatory children, misplaced modifiers,
//! `case` outside a switch, unreachable statements and so on. Nothing here
//! resolves names or types.
//!
//! ## Modes
//!
//! ```text
//! check(ast, root)        → Vec<SyntaxProblem>            every problem, in visit order
//! assert_valid(ast, root) → Result<(), AstException>      stops at the first problem
//! ```
//!
//! Both walk the tree pre-order with [`AstVisitor`], so a node's own slots are
//! validated before its children are visited.
//!
//! ## Check groups
//!
//! - `basic`: slot shape, identifiers, literals, operators, single-variable rules
//! - `statements`: statement placement and unreachable code
//! - `modifiers`: legal and exclusive keyword sets, static context
//! - `structure`: member-level rules (abstract, initializers, varargs, ...)
//! - `types`: primitives and `void` in illegal places

mod basic;
mod modifiers;
mod statements;
mod structure;
mod types;

use tracing::debug;

use crate::base::{AstException, NodeId, SyntaxProblem};

use super::visitor::AstVisitor;
use super::{Ast, NodeKind};

/// Collect every syntax problem in the subtree at `root`.
pub fn check(ast: &Ast, root: NodeId) -> Vec<SyntaxProblem> {
    let mut validator = Validator::new(false);
    ast.accept(root, &mut validator);
    debug!(
        problems = validator.problems.items.len(),
        "syntax check finished"
    );
    validator.problems.items
}

/// Validate the subtree at `root`, failing on the first problem.
pub fn assert_valid(ast: &Ast, root: NodeId) -> Result<(), AstException> {
    let mut validator = Validator::new(true);
    ast.accept(root, &mut validator);
    match validator.problems.items.into_iter().next() {
        Some(problem) => Err(problem.into_exception()),
        None => Ok(()),
    }
}

// ============================================================================
// Problem sink
// ============================================================================

/// Where individual checks report to.
pub(crate) struct Problems {
    items: Vec<SyntaxProblem>,
    stop_at_first: bool,
}

impl Problems {
    pub(crate) fn report(&mut self, node: NodeId, message: impl Into<String>) {
        if self.halted() {
            return;
        }
        self.items.push(SyntaxProblem::new(node, message));
    }

    fn halted(&self) -> bool {
        self.stop_at_first && !self.items.is_empty()
    }
}

// ============================================================================
// Visitor
// ============================================================================

struct Validator {
    problems: Problems,
}

impl Validator {
    fn new(stop_at_first: bool) -> Self {
        Self {
            problems: Problems {
                items: Vec::new(),
                stop_at_first,
            },
        }
    }
}

impl AstVisitor for Validator {
    fn visit_node(&mut self, ast: &Ast, id: NodeId) -> bool {
        if self.problems.halted() {
            return true;
        }
        run_checks(ast, id, &mut self.problems);
        self.problems.halted()
    }
}

/// Every check that applies to a node of this kind.
fn run_checks(ast: &Ast, id: NodeId, out: &mut Problems) {
    basic::check_slots(ast, id, out);

    let kind = ast.kind(id);
    if kind.is(super::Category::Literal) {
        basic::check_literal(ast, id, out);
    }

    match kind {
        NodeKind::Identifier => basic::check_identifier(ast, id, out),
        NodeKind::BinaryExpression => basic::check_binary_operator(ast, id, out),
        NodeKind::UnaryExpression => basic::check_unary_operator(ast, id, out),

        NodeKind::Try => statements::check_lone_try(ast, id, out),
        NodeKind::If | NodeKind::While | NodeKind::DoWhile | NodeKind::For | NodeKind::ForEach => {
            statements::check_declaration_as_body(ast, id, out);
        }
        NodeKind::Catch => statements::check_catch_variable(ast, id, out),
        NodeKind::Case => statements::check_in_switch(ast, id, "case", out),
        NodeKind::DefaultCase => statements::check_in_switch(ast, id, "default", out),
        NodeKind::Switch => statements::check_switch_starts_with_case(ast, id, out),
        NodeKind::Break | NodeKind::Continue | NodeKind::Return | NodeKind::Throw => {
            statements::check_unreachable_after(ast, id, out);
        }
        NodeKind::AlternateConstructorInvocation => {
            structure::check_constructor_call_first(ast, id, "this", out);
        }
        NodeKind::SuperConstructorInvocation => {
            structure::check_constructor_call_first(ast, id, "super", out);
        }

        NodeKind::Modifiers => modifiers::check_duplicates(ast, id, out),
        NodeKind::MethodDeclaration => {
            modifiers::check_method(ast, id, out);
            structure::check_abstract_method(ast, id, out);
            structure::check_parameters_simple(ast, id, "method", out);
        }
        NodeKind::ConstructorDeclaration => {
            structure::check_parameters_simple(ast, id, "constructor", out);
        }
        NodeKind::VariableDeclaration => modifiers::check_field(ast, id, out),
        NodeKind::VariableDefinition => {
            modifiers::check_local_variable(ast, id, out);
            statements::check_for_each_variable(ast, id, out);
            structure::check_not_empty(ast, id, out);
            structure::check_varargs_position(ast, id, out);
        }
        NodeKind::VariableDefinitionEntry => structure::check_varargs_dimensions(ast, id, out),
        NodeKind::ClassDeclaration
        | NodeKind::InterfaceDeclaration
        | NodeKind::EnumDeclaration
        | NodeKind::AnnotationDeclaration => modifiers::check_type(ast, id, out),
        NodeKind::StaticInitializer => {
            modifiers::check_static_initializer(ast, id, out);
            structure::check_initializer_completes(ast, id, out);
        }
        NodeKind::InstanceInitializer => structure::check_initializer_completes(ast, id, out),

        NodeKind::TypeReference => {
            types::check_no_primitive_arguments(ast, id, out);
            types::check_void_placement(ast, id, out);
        }
        _ => {}
    }
}
