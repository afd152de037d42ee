//! Shape, identifier, literal and operator checks.

use crate::base::NodeId;
use crate::base::constants::{is_identifier_part, is_identifier_start};

use super::Problems;
use crate::ast::literals::validate_literal;
use crate::ast::{
    Ast, AstNode, BinaryExpression, ChildSlot, Identifier, ListSlot, UnaryExpression,
    VariableDefinition, VariableDefinitionEntry,
};

/// Every slot of `id` against its schema: mandatory presence and type.
pub(super) fn check_slots(ast: &Ast, id: NodeId, out: &mut Problems) {
    for (index, spec) in ast.kind(id).slots().iter().enumerate() {
        if spec.many {
            for item in ListSlot::new(id, index).strict(ast) {
                if let Err(err) = item {
                    out.report(id, err.message);
                }
            }
        } else if let Err(err) = ChildSlot::new(id, index).strict(ast) {
            out.report(id, err.message);
        }
    }
}

pub(super) fn check_identifier(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(ident) = Identifier::cast(ast, id) else {
        return;
    };
    let mut chars = ident.value(ast).chars();
    let Some(first) = chars.next() else {
        out.report(id, "Empty identifier");
        return;
    };
    if !is_identifier_start(first) {
        out.report(
            id,
            format!("Not a legal start character for a java identifier: {first}"),
        );
        return;
    }
    if let Some(bad) = chars.find(|c| !is_identifier_part(*c)) {
        out.report(id, format!("Not a legal character in a java identifier: {bad}"));
    }
}

pub(super) fn check_literal(ast: &Ast, id: NodeId, out: &mut Problems) {
    if let Err(err) = validate_literal(ast, id) {
        out.report(id, err.message);
    }
}

pub(super) fn check_binary_operator(ast: &Ast, id: NodeId, out: &mut Problems) {
    if let Some(Err(err)) = BinaryExpression::cast(ast, id).map(|b| b.operator(ast)) {
        out.report(id, err.message);
    }
}

pub(super) fn check_unary_operator(ast: &Ast, id: NodeId, out: &mut Problems) {
    if UnaryExpression::cast(ast, id).is_some_and(|u| u.operator(ast).is_none()) {
        out.report(id, "Missing unary operator");
    }
}

/// A definition that may only introduce one variable, without an initializer,
/// as in a catch clause, a for-each loop or a parameter.
///
/// `desc` names the construct ("catch blocks") and `what` the variable role
/// ("exception").
pub(super) fn check_simple_definition(
    ast: &Ast,
    reported_on: NodeId,
    definition: NodeId,
    desc: &str,
    what: &str,
    out: &mut Problems,
) {
    let Some(definition) = VariableDefinition::cast(ast, definition) else {
        return;
    };
    let entries = definition.variables().raw(ast);
    match entries {
        [] => {}
        [entry] => {
            let has_initializer = VariableDefinitionEntry::cast(ast, *entry)
                .is_some_and(|e| e.initializer().is_set(ast));
            if has_initializer {
                out.report(
                    reported_on,
                    format!("{desc} can not declare a value for their {what} declaration."),
                );
            }
        }
        _ => out.report(
            reported_on,
            format!("{desc} can only declare one {what} variable."),
        ),
    }
}
