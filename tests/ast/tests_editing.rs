//! AST Tests - Editing parsed trees
//!
//! Moving, replacing and copying nodes of a tree that came out of the parser.

use jast::ast::{AstNode, Block, Identifier, IntegralLiteral, MethodInvocation, NodeKind, Return};
use jast::{Source, UsageError};

use crate::helpers::{statement, text_of};

#[test]
fn test_parsed_nodes_know_their_parents() {
    let (result, root) = statement("{ a(); { b(); } }");
    let ast = result.ast();
    assert_eq!(ast.parent(root), None);
    for node in ast.descendants(root).into_iter().skip(1) {
        let parent = ast.parent(node).unwrap();
        assert!(ast.slot_of(parent, node).is_some(), "{node} is not held by {parent}");
    }
}

#[test]
fn test_move_statement_between_blocks() {
    let mut source = Source::new("{ a(); b(); } { }", "statements");
    let nodes = source.parse_statement().to_vec();
    let ast = source.ast_mut();
    let from = Block::cast(ast, nodes[0]).unwrap();
    let to = Block::cast(ast, nodes[1]).unwrap();
    let moving = from.contents().first(ast).unwrap();

    let err = to.contents().add_to_end(ast, moving).unwrap_err();
    assert!(matches!(err, UsageError::AlreadyParented { .. }));
    assert_eq!(to.contents().len(ast), 0);

    from.contents().remove(ast, moving).unwrap();
    to.contents().add_to_end(ast, moving).unwrap();
    assert_eq!(from.contents().len(ast), 1);
    assert_eq!(ast.parent(moving), Some(to.id()));
}

#[test]
fn test_replace_keeps_list_order() {
    let mut source = Source::new("{ a(); b(); c(); }", "statements");
    let root = source.parse_statement()[0];
    let block = Block::cast(source.ast(), root).unwrap();
    let ast = source.ast_mut();
    let old = block.contents().raw(ast)[1];

    let value = IntegralLiteral::of_int(ast, 7).id();
    let replacement = Return::create(ast);
    replacement.value().set(ast, Some(value)).unwrap();
    block.contents().replace(ast, old, replacement.id()).unwrap();

    let contents = block.contents().raw(ast).to_vec();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1], replacement.id());
    assert_eq!(ast.parent(old), None);
    assert_eq!(ast.kind(contents[2]), NodeKind::ExpressionStatement);
}

#[test]
fn test_rename_method_call() {
    let text = "foo(1);";
    let (mut result, root) = statement(text);
    let ast = result.ast_mut();
    let call = ast
        .descendants(root)
        .into_iter()
        .find_map(|id| MethodInvocation::cast(ast, id))
        .unwrap();
    let name = Identifier::cast(ast, call.name().get(ast).unwrap()).unwrap();
    name.set_value(ast, "bar");
    assert_eq!(name.value(ast), "bar");
    // Positions still point at the original text.
    assert_eq!(text_of(&result, text, name.id()), "foo");
}

#[test]
fn test_copy_is_detached_and_deep() {
    let (mut result, root) = statement("{ a(); b(); }");
    let ast = result.ast_mut();
    let copy = ast.copy(root);
    assert_ne!(copy, root);
    assert_eq!(ast.parent(copy), None);

    let original = Block::cast(ast, root).unwrap();
    let copied = Block::cast(ast, copy).unwrap();
    assert_eq!(copied.contents().len(ast), 2);
    for (a, b) in original.contents().raw(ast).iter().zip(copied.contents().raw(ast)) {
        assert_ne!(a, b);
        assert_eq!(ast.kind(*a), ast.kind(*b));
        assert_eq!(ast.position(*a), ast.position(*b));
    }

    let first = copied.contents().first(ast).unwrap();
    copied.contents().remove(ast, first).unwrap();
    assert_eq!(original.contents().len(ast), 2);
}

#[test]
fn test_detach_and_cycle() {
    let (mut result, root) = statement("{ { x(); } }");
    let ast = result.ast_mut();
    let outer = Block::cast(ast, root).unwrap();
    let inner = Block::cast(ast, outer.contents().first(ast).unwrap()).unwrap();

    let err = inner.contents().add_to_end(ast, outer.id()).unwrap_err();
    assert!(matches!(err, UsageError::Cycle(_)));

    assert_eq!(ast.detach(inner.id()), Some(outer.id()));
    assert!(outer.contents().is_empty(ast));
    assert_eq!(ast.detach(inner.id()), None);
}

#[test]
fn test_import_into_another_tree() {
    let (snippet, root) = statement("return a + b;");
    let mut source = Source::new("{ }", "statements");
    let host = source.parse_statement()[0];
    let block = Block::cast(source.ast(), host).unwrap();
    let ast = source.ast_mut();
    let imported = ast.import(snippet.ast(), root);
    block.contents().add_to_end(ast, imported).unwrap();
    assert_eq!(ast.kind(imported), NodeKind::Return);
    assert_eq!(ast.descendants(imported).len(), snippet.ast().descendants(root).len());
}
