//! Keyword modifier rules.

use rustc_hash::FxHashSet;

use crate::base::NodeId;

use super::Problems;
use crate::ast::nodes::enclosing_type;
use crate::ast::{Ast, AstNode, KeywordModifier, ModifierFlags, Modifiers, NodeKind};

type Flags = ModifierFlags;

const METHOD_EXCLUSIVE: &[Flags] = &[
    Flags::PRIVATE.union(Flags::PROTECTED),
    Flags::PRIVATE.union(Flags::PUBLIC),
    Flags::PROTECTED.union(Flags::PUBLIC),
    Flags::NATIVE.union(Flags::STRICTFP),
    Flags::ABSTRACT.union(Flags::FINAL),
    Flags::ABSTRACT.union(Flags::NATIVE),
    Flags::ABSTRACT.union(Flags::STATIC),
    Flags::ABSTRACT.union(Flags::STRICTFP),
    Flags::ABSTRACT.union(Flags::SYNCHRONIZED),
];

const METHOD_LEGAL: Flags = Flags::PRIVATE
    .union(Flags::PROTECTED)
    .union(Flags::PUBLIC)
    .union(Flags::ABSTRACT)
    .union(Flags::FINAL)
    .union(Flags::NATIVE)
    .union(Flags::STATIC)
    .union(Flags::STRICTFP)
    .union(Flags::SYNCHRONIZED);

const FIELD_EXCLUSIVE: &[Flags] = &[
    Flags::PRIVATE.union(Flags::PROTECTED),
    Flags::PRIVATE.union(Flags::PUBLIC),
    Flags::PROTECTED.union(Flags::PUBLIC),
    Flags::FINAL.union(Flags::VOLATILE),
];

const FIELD_LEGAL: Flags = Flags::PRIVATE
    .union(Flags::PROTECTED)
    .union(Flags::PUBLIC)
    .union(Flags::STATIC)
    .union(Flags::FINAL)
    .union(Flags::TRANSIENT)
    .union(Flags::VOLATILE);

const TYPE_EXCLUSIVE: &[Flags] = &[
    Flags::PRIVATE.union(Flags::PROTECTED),
    Flags::PRIVATE.union(Flags::PUBLIC),
    Flags::PROTECTED.union(Flags::PUBLIC),
    Flags::FINAL.union(Flags::ABSTRACT),
];

const TYPE_LEGAL: Flags = Flags::PRIVATE
    .union(Flags::PROTECTED)
    .union(Flags::PUBLIC)
    .union(Flags::STATIC)
    .union(Flags::FINAL)
    .union(Flags::ABSTRACT)
    .union(Flags::STRICTFP);

fn keywords(ast: &Ast, modifiers: NodeId) -> impl Iterator<Item = (NodeId, &str)> + '_ {
    ast.list(modifiers, 1)
        .iter()
        .filter_map(|id| KeywordModifier::cast(ast, *id))
        .map(|kw| (kw.id(), kw.name(ast)))
        .filter(|(_, name)| !name.is_empty())
}

fn modifiers_of(ast: &Ast, declaration: NodeId) -> Option<NodeId> {
    let slot = ast.kind(declaration).slot_index("modifiers")?;
    ast.child(declaration, slot)
        .filter(|m| ast.kind(*m) == NodeKind::Modifiers)
}

pub(super) fn check_duplicates(ast: &Ast, id: NodeId, out: &mut Problems) {
    let mut seen = FxHashSet::default();
    for (kw, name) in keywords(ast, id) {
        if !seen.insert(name) {
            out.report(kw, format!("Duplicate modifier: {name}"));
        }
    }
}

/// Check keywords against a legal set and mutually exclusive pairs; returns
/// the flags that were legal.
fn check_set(
    ast: &Ast,
    modifiers: NodeId,
    exclusive: &[Flags],
    legal: Flags,
    desc: &str,
    out: &mut Problems,
) -> Flags {
    let mut flags = Flags::empty();
    for (kw, name) in keywords(ast, modifiers) {
        let Some(flag) = Flags::from_keyword(name) else {
            out.report(kw, format!("Unknown modifier: {name}"));
            continue;
        };
        if !legal.contains(flag) {
            out.report(kw, format!("Modifier not allowed on {desc}: {name}"));
            continue;
        }
        flags |= flag;
    }

    for pair in exclusive {
        if !flags.contains(*pair) {
            continue;
        }
        let mut hit: Option<&str> = None;
        for (kw, name) in keywords(ast, modifiers) {
            if !Flags::from_keyword(name).is_some_and(|f| pair.intersects(f)) {
                continue;
            }
            match hit {
                None => hit = Some(name),
                Some(first) => out.report(
                    kw,
                    format!("Modifier {name} cannot be used together with {first} here"),
                ),
            }
        }
    }
    flags
}

/// Report the keyword `name` with `message` when `flag` is set.
fn forbid(
    ast: &Ast,
    modifiers: NodeId,
    flags: Flags,
    flag: Flags,
    message: &str,
    out: &mut Problems,
) -> bool {
    if !flags.contains(flag) {
        return false;
    }
    let keyword = flag.keywords().next().unwrap_or_default();
    match keywords(ast, modifiers).find(|(_, name)| *name == keyword) {
        Some((kw, _)) => {
            out.report(kw, message);
            true
        }
        None => false,
    }
}

/// Top-level types, implicitly static nested types and `static` nested classes.
fn allows_static_members(ast: &Ast, container: NodeId) -> bool {
    match ast.parent(container).map(|p| ast.kind(p)) {
        None | Some(NodeKind::CompilationUnit) => true,
        Some(NodeKind::Block) => false,
        _ if ast.kind(container) != NodeKind::ClassDeclaration => true,
        _ => modifiers_of(ast, container)
            .and_then(|m| Modifiers::cast(ast, m))
            .is_some_and(|m| m.is_static(ast)),
    }
}

/// A static member of a non-static nested type.
fn check_static_context(ast: &Ast, declaration: NodeId, out: &mut Problems) {
    let Some(modifiers) = modifiers_of(ast, declaration).and_then(|m| Modifiers::cast(ast, m)) else {
        return;
    };
    if !modifiers.is_static(ast) {
        return;
    }
    let Some(container) = enclosing_type(ast, declaration) else {
        return;
    };
    if !allows_static_members(ast, container) {
        out.report(
            declaration,
            "This declaration is (effectively) static; static declarations are only legal in top-level and static declarations.",
        );
    }
}

pub(super) fn check_method(ast: &Ast, id: NodeId, out: &mut Problems) {
    if let Some(modifiers) = modifiers_of(ast, id) {
        check_set(ast, modifiers, METHOD_EXCLUSIVE, METHOD_LEGAL, "method declarations", out);
        check_static_context(ast, id, out);
    }
}

/// Fields only; locals are handled from their definition.
pub(super) fn check_field(ast: &Ast, id: NodeId, out: &mut Problems) {
    let in_type_body = ast
        .parent(id)
        .is_some_and(|p| ast.is(p, crate::ast::Category::TypeBody));
    if !in_type_body {
        return;
    }
    let definition = ast.child(id, 1).filter(|d| ast.kind(*d) == NodeKind::VariableDefinition);
    if let Some(modifiers) = definition.and_then(|d| modifiers_of(ast, d)) {
        check_set(ast, modifiers, FIELD_EXCLUSIVE, FIELD_LEGAL, "field declarations", out);
    }
}

/// Local variables, for-each variables and for-loop initializers may only be `final`.
pub(super) fn check_local_variable(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(parent) = ast.parent(id) else {
        return;
    };
    let local = match ast.kind(parent) {
        NodeKind::VariableDeclaration => ast
            .parent(parent)
            .is_some_and(|gp| ast.kind(gp) == NodeKind::Block),
        NodeKind::ForEach => ast.child(parent, 0) == Some(id),
        NodeKind::For => ast.child(parent, 0) == Some(id),
        _ => false,
    };
    if !local {
        return;
    }
    if let Some(modifiers) = modifiers_of(ast, id) {
        check_set(ast, modifiers, &[], Flags::FINAL, "local variable declarations", out);
    }
}

pub(super) fn check_type(ast: &Ast, id: NodeId, out: &mut Problems) {
    let kind = ast.kind(id);
    let desc = match kind {
        NodeKind::ClassDeclaration => "class declarations",
        NodeKind::InterfaceDeclaration => "interface declarations",
        NodeKind::EnumDeclaration => "enum declarations",
        _ => "annotation declarations",
    };
    let Some(modifiers) = modifiers_of(ast, id) else {
        return;
    };
    let flags = check_set(ast, modifiers, TYPE_EXCLUSIVE, TYPE_LEGAL, desc, out);

    let mut static_reported = false;
    match ast.parent(id).map(|p| ast.kind(p)) {
        Some(NodeKind::CompilationUnit) => {
            forbid(ast, modifiers, flags, Flags::PRIVATE, "Top-level types cannot be private.", out);
            forbid(ast, modifiers, flags, Flags::PROTECTED, "Top-level types cannot be protected.", out);
            static_reported =
                forbid(ast, modifiers, flags, Flags::STATIC, "Top-level types cannot be static.", out);
        }
        Some(NodeKind::Block) => {
            forbid(ast, modifiers, flags, Flags::PRIVATE, "Method-local types cannot be private.", out);
            forbid(ast, modifiers, flags, Flags::PROTECTED, "Method-local types cannot be protected.", out);
            forbid(ast, modifiers, flags, Flags::PUBLIC, "Method-local types cannot be public.", out);
            static_reported =
                forbid(ast, modifiers, flags, Flags::STATIC, "Method-local types cannot be static.", out);
        }
        _ => {}
    }
    if !static_reported {
        check_static_context(ast, id, out);
    }

    let final_message = match kind {
        NodeKind::InterfaceDeclaration => Some("Interfaces cannot be final"),
        NodeKind::AnnotationDeclaration => Some("Annotations cannot be final"),
        NodeKind::EnumDeclaration => Some("Enums cannot be marked final"),
        _ => None,
    };
    if let Some(message) = final_message {
        forbid(ast, modifiers, flags, Flags::FINAL, message, out);
    }
}

pub(super) fn check_static_initializer(ast: &Ast, id: NodeId, out: &mut Problems) {
    let Some(container) = enclosing_type(ast, id) else {
        return;
    };
    if !allows_static_members(ast, container) {
        out.report(
            id,
            "static initializers are only allowed in top-level or static types declarations.",
        );
    }
}
