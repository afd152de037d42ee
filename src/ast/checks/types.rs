//! Type reference placement rules.

use crate::base::NodeId;

use super::Problems;
use crate::ast::{Ast, AstNode, NodeKind, TypeReference};

pub(super) fn check_no_primitive_arguments(ast: &Ast, id: NodeId, out: &mut Problems) {
    if !TypeReference::cast(ast, id).is_some_and(|t| t.is_primitive(ast)) {
        return;
    }
    let Some(parent) = ast.parent(id) else {
        return;
    };
    match ast.slot_of(parent, id) {
        Some((1, Some(_))) if ast.kind(parent) == NodeKind::TypeReferencePart => {
            out.report(id, "Primitive types aren't allowed in type arguments.");
        }
        Some((1, Some(_))) if ast.kind(parent) == NodeKind::TypeVariable => {
            out.report(id, "Primitive types aren't allowed in type variable bounds.");
        }
        _ => {}
    }
}

/// `void` is only a method return type or the operand of `void.class`.
pub(super) fn check_void_placement(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(reference) = TypeReference::cast(ast, id) else {
        return;
    };
    if !reference.is_void(ast) {
        return;
    }
    if reference.array_dimensions(ast) > 0 {
        out.report(id, "Array of void type is not legal.");
        return;
    }
    let Some(parent) = ast.parent(id) else {
        return;
    };
    let legal = match ast.kind(parent) {
        NodeKind::MethodDeclaration => ast.child(parent, 3) == Some(id),
        NodeKind::ClassLiteral => true,
        _ => false,
    };
    if !legal {
        out.report(id, "The void type is not legal here.");
    }
}
