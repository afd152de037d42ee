//! Statement placement rules.

use crate::base::NodeId;

use super::Problems;
use super::basic::check_simple_definition;
use crate::ast::{Ast, AstNode, Catch, Category, ForEach, NodeKind, Try};

pub(super) fn check_lone_try(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(node) = Try::cast(ast, id) else {
        return;
    };
    if node.catches().is_empty(ast) && !node.finally().is_set(ast) {
        out.report(id, "try statement with no catches and no finally");
    }
}

/// Declarations make no sense as the lone body of a loop or `if`.
pub(super) fn check_declaration_as_body(ast: &Ast, id: NodeId, out: &mut Problems) {
    let kind = ast.kind(id);
    let bodies = ["statement", "else_statement"]
        .into_iter()
        .filter_map(|name| kind.slot_index(name))
        .filter_map(|index| ast.child(id, index));
    for body in bodies {
        if ast.kind(body) == NodeKind::VariableDeclaration {
            out.report(
                body,
                "Variable declarations only make sense in the context of a block.",
            );
        } else if ast.is(body, Category::TypeDeclaration) {
            out.report(
                body,
                "Type declarations only make sense in the context of a block or other type.",
            );
        }
    }
}

pub(super) fn check_catch_variable(ast: &Ast, id: NodeId, out: &mut Problems) {
    if let Some(definition) = Catch::cast(ast, id).and_then(|c| c.exception_declaration().get(ast)) {
        check_simple_definition(ast, id, definition, "catch blocks", "exception", out);
    }
}

/// Runs on the definition so that it is reported once, from the loop's side.
pub(super) fn check_for_each_variable(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(each) = ast.parent(id).and_then(|p| ForEach::cast(ast, p)) else {
        return;
    };
    if each.variable().get(ast) == Some(id) {
        check_simple_definition(ast, each.id(), id, "for-each statements", "loop", out);
    }
}

/// `case` and `default` must sit directly in a switch body. A detached block
/// is given the benefit of the doubt.
pub(super) fn check_in_switch(ast: &Ast, id: NodeId, desc: &str, out: &mut Problems) {
    let Some(parent) = ast.parent(id) else {
        return;
    };
    let legal = ast.kind(parent) == NodeKind::Block
        && ast
            .parent(parent)
            .is_none_or(|gp| ast.kind(gp) == NodeKind::Switch);
    if !legal {
        out.report(
            id,
            format!("{desc} statements are only legal directly inside switch statements."),
        );
    }
}

pub(super) fn check_switch_starts_with_case(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(body) = crate::ast::Switch::cast(ast, id).and_then(|s| s.body().get(ast)) else {
        return;
    };
    if ast.kind(body) != NodeKind::Block {
        return;
    }
    let first = ast.list(body, 0).first().map(|s| ast.kind(*s));
    if first.is_some_and(|k| k != NodeKind::Case && k != NodeKind::DefaultCase) {
        out.report(
            id,
            "switch statements should start with a default or case statement.",
        );
    }
}

/// Statements after a jump in the same block are dead until the next switch label.
pub(super) fn check_unreachable_after(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(block) = ast.parent(id).filter(|p| ast.kind(*p) == NodeKind::Block) else {
        return;
    };
    let following = ast
        .list(block, 0)
        .iter()
        .skip_while(|s| **s != id)
        .skip(1)
        .take_while(|s| !matches!(ast.kind(**s), NodeKind::Case | NodeKind::DefaultCase));
    for statement in following {
        out.report(*statement, "Unreachable code");
    }
}
