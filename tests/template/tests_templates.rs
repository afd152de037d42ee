//! Template Tests - Generating code into parsed sources

use jast::ast::{Ast, AstNode, Block, If, MethodDeclaration, MethodInvocation, NodeKind};
use jast::template::{self, Template};
use jast::{NodeId, ParseResult};

use crate::helpers::{text_of, unit};

const HOST: &str = "class A { void f(Object o) { run(o); } }";

fn method_f(result: &ParseResult, root: NodeId) -> MethodDeclaration {
    let ast = result.ast();
    ast.descendants(root)
        .into_iter()
        .find_map(|id| MethodDeclaration::cast(ast, id))
        .unwrap()
}

fn call_argument(ast: &Ast, root: NodeId) -> NodeId {
    let call = ast
        .descendants(root)
        .into_iter()
        .find_map(|id| MethodInvocation::cast(ast, id))
        .unwrap();
    call.arguments().first(ast).unwrap()
}

#[test]
fn test_generated_guard_points_back_at_the_method() {
    let (mut result, root) = unit(HOST);
    let method = method_f(&result, root);
    let ast = result.ast_mut();
    let body = Block::cast(ast, method.body().get(ast).unwrap()).unwrap();
    let body_start = ast.position(body.id()).start();
    let original = call_argument(ast, root);
    let argument = ast.copy(original);

    let snippet = template::parse_statement(ast, "if (x == null) return;").unwrap();
    let guard = Template::of(ast, snippet)
        .start_position(body_start)
        .responsible(method.id())
        .replace_expression("x", argument)
        .finish(ast)
        .unwrap();
    body.contents().add_to_start(ast, guard).unwrap();

    assert_eq!(ast.kind(guard), NodeKind::If);
    assert_eq!(body.contents().len(ast), 2);
    let position = ast.position(guard);
    assert!(position.is_generated());
    assert_eq!(position.generated_by(), Some(method.id()));
    assert_eq!(position.start(), body_start);

    // The moved-in expression keeps the span it was parsed with.
    let condition = If::cast(ast, guard).unwrap().condition().get(ast).unwrap();
    assert!(ast.descendants(condition).contains(&argument));
    assert!(!ast.position(argument).is_generated());
    assert_eq!(text_of(&result, HOST, argument), "o");
}

#[test]
fn test_template_built_elsewhere_can_be_imported() {
    let mut scratch = Ast::new();
    let snippet = template::parse_statement(&mut scratch, "{ before(); body: ; after(); }").unwrap();
    let first = template::parse_statement(&mut scratch, "one();").unwrap();
    let second = template::parse_statement(&mut scratch, "two();").unwrap();
    let built = Template::of(&mut scratch, snippet)
        .replace_statements("body", vec![first, second])
        .finish(&mut scratch)
        .unwrap();

    let (mut result, root) = unit(HOST);
    let method = method_f(&result, root);
    let ast = result.ast_mut();
    let body = Block::cast(ast, method.body().get(ast).unwrap()).unwrap();
    let imported = ast.import(&scratch, built);
    body.contents().add_to_end(ast, imported).unwrap();

    let block = Block::cast(ast, imported).unwrap();
    assert_eq!(block.contents().len(ast), 4);
    assert_eq!(ast.parent(imported), Some(body.id()));
    assert!(
        block
            .contents()
            .raw(ast)
            .iter()
            .all(|s| ast.kind(*s) == NodeKind::ExpressionStatement)
    );
}

#[test]
fn test_method_snippet_becomes_a_member() {
    let (mut result, root) = unit(HOST);
    let ast = result.ast_mut();
    let snippet = template::parse_method(ast, "void name() { }").unwrap();
    let method = Template::of(ast, snippet)
        .replace_identifier("name", Some("generated"))
        .finish(ast)
        .unwrap();
    let class_body = ast
        .descendants(root)
        .into_iter()
        .find(|id| ast.kind(*id) == NodeKind::NormalTypeBody)
        .unwrap();
    let members = jast::ast::NormalTypeBody::cast(ast, class_body).unwrap().members();
    members.add_to_end(ast, method).unwrap();

    assert_eq!(members.len(ast), 2);
    let added = MethodDeclaration::cast(ast, members.last(ast).unwrap()).unwrap();
    assert_eq!(crate::helpers::name_of(ast, added.method_name().get(ast)), "generated");
}
