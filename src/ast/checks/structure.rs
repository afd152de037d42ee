//! Member-level structural rules.

use crate::base::NodeId;

use super::Problems;
use super::basic::check_simple_definition;
use crate::ast::nodes::enclosing_type;
use crate::ast::{
    Ast, AstNode, MethodDeclaration, Modifiers, NodeKind, TypeDeclaration, VariableDefinition,
    VariableDefinitionEntry,
};

pub(super) fn check_abstract_method(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(modifiers) = MethodDeclaration::cast(ast, id)
        .and_then(|m| m.modifiers().get(ast))
        .and_then(|m| Modifiers::cast(ast, m))
    else {
        return;
    };
    if !modifiers.is_abstract(ast) {
        return;
    }
    let Some(container) = enclosing_type(ast, id).and_then(|t| TypeDeclaration::cast(ast, t)) else {
        return;
    };
    // Enum constants with bodies may implement abstract methods of their enum.
    if ast.kind(container.id()) == NodeKind::EnumDeclaration {
        return;
    }
    if container.modifiers(ast).is_some_and(|m| m.is_abstract(ast)) {
        return;
    }
    out.report(
        id,
        "Abstract methods are only allowed in interfaces and abstract classes",
    );
}

/// Initializer bodies may not end abruptly with `return` or `throw`.
pub(super) fn check_initializer_completes(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(body) = ast.child(id, 0).filter(|b| ast.kind(*b) == NodeKind::Block) else {
        return;
    };
    for statement in ast.list(body, 0) {
        match ast.kind(*statement) {
            NodeKind::Throw => out.report(
                *statement,
                "Initializers may not contain throws statements.",
            ),
            NodeKind::Return => out.report(
                *statement,
                "Initializers may not contain return statements.",
            ),
            _ => {}
        }
    }
}

/// `this(...)` and `super(...)` must open a constructor body.
pub(super) fn check_constructor_call_first(ast: &Ast, id: NodeId, desc: &str, out: &mut Problems) {
    let Some(block) = ast.parent(id) else {
        return;
    };
    let legal = ast.kind(block) == NodeKind::Block
        && ast
            .parent(block)
            .is_some_and(|c| ast.kind(c) == NodeKind::ConstructorDeclaration)
        && ast.list(block, 0).first() == Some(&id);
    if !legal {
        out.report(
            id,
            format!("Calling {desc} must be the first statement in a constructor."),
        );
    }
}

pub(super) fn check_not_empty(ast: &Ast, id: NodeId, out: &mut Problems) {
    if VariableDefinition::cast(ast, id).is_some_and(|d| d.variables().is_empty(ast)) {
        out.report(id, "Empty variable declaration.");
    }
}

pub(super) fn check_varargs_position(ast: &Ast, id: NodeId, out: &mut Problems) {
    if !VariableDefinition::cast(ast, id).is_some_and(|d| d.is_varargs(ast)) {
        return;
    }
    let Some(parent) = ast.parent(id) else {
        return;
    };
    let last_parameter = match ast.kind(parent) {
        NodeKind::MethodDeclaration => ast.list(parent, 5).last(),
        NodeKind::ConstructorDeclaration => ast.list(parent, 4).last(),
        _ => None,
    };
    if last_parameter != Some(&id) {
        out.report(
            id,
            "Varargs are only legal on the last parameter of a constructor or method.",
        );
    }
}

pub(super) fn check_varargs_dimensions(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(entry) = VariableDefinitionEntry::cast(ast, id) else {
        return;
    };
    let varargs = ast
        .parent(id)
        .and_then(|p| VariableDefinition::cast(ast, p))
        .is_some_and(|d| d.is_varargs(ast));
    if varargs && entry.array_dimensions(ast) > 0 {
        out.report(
            id,
            "Extended dimensions are not legal on a varargs declaration.",
        );
    }
}

pub(super) fn check_parameters_simple(ast: &Ast, id: NodeId, desc: &str, out: &mut Problems) {
    let index = match ast.kind(id) {
        NodeKind::MethodDeclaration => 5,
        NodeKind::ConstructorDeclaration => 4,
        _ => return,
    };
    let construct = format!("{desc} parameters");
    for parameter in ast.list(id, index) {
        check_simple_definition(ast, *parameter, *parameter, &construct, "parameter", out);
    }
}
