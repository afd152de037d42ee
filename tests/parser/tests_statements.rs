//! Parser Tests - Statements
//!
//! Every statement form, labels, local declarations and the rules the
//! grammar enforces once a statement keyword has been seen.

use jast::ast::{
    AstNode, Block, Break, For, ForEach, If, LabelledStatement, NodeKind, SuperConstructorInvocation,
    Switch, Try, VariableDeclaration, VariableDefinition, VariableDefinitionEntry,
};
use jast::Source;
use rstest::rstest;

use crate::helpers::{name_of, statement, text_of};

// ============================================================================
// Statement kinds
// ============================================================================

#[rstest]
#[case("{}", NodeKind::Block)]
#[case(";", NodeKind::EmptyStatement)]
#[case("int x = 1;", NodeKind::VariableDeclaration)]
#[case("final java.util.List<String> names = null, other;", NodeKind::VariableDeclaration)]
#[case("foo(1);", NodeKind::ExpressionStatement)]
#[case("x += 2;", NodeKind::ExpressionStatement)]
#[case("if (a) b(); else c();", NodeKind::If)]
#[case("assert x > 0 : \"positive\";", NodeKind::Assert)]
#[case("switch (x) { case 1: break; default: }", NodeKind::Switch)]
#[case("while (running) tick();", NodeKind::While)]
#[case("do i++; while (i < 3);", NodeKind::DoWhile)]
#[case("for (int i = 0, j = 1; i < 10; i++, j--) {}", NodeKind::For)]
#[case("for (i = 0; ; ) ;", NodeKind::For)]
#[case("for (final String s : list) {}", NodeKind::ForEach)]
#[case("break;", NodeKind::Break)]
#[case("continue outer;", NodeKind::Continue)]
#[case("return;", NodeKind::Return)]
#[case("synchronized (lock) { count++; }", NodeKind::Synchronized)]
#[case("throw new IllegalStateException();", NodeKind::Throw)]
#[case("try { a(); } catch (Exception e) { } finally { }", NodeKind::Try)]
#[case("this(1, 2);", NodeKind::AlternateConstructorInvocation)]
#[case("super();", NodeKind::SuperConstructorInvocation)]
#[case("outer.<T>super(x);", NodeKind::SuperConstructorInvocation)]
#[case("label: for (;;) break label;", NodeKind::LabelledStatement)]
#[case("class Local { }", NodeKind::ClassDeclaration)]
fn test_statement_kind(#[case] input: &str, #[case] expected: NodeKind) {
    let (result, root) = statement(input);
    assert_eq!(result.ast().kind(root), expected, "Wrong kind for: {}", input);
}

#[rstest]
#[case("if (a) ")]
#[case("while a) {}")]
#[case("return 1")]
#[case("try { }  catch () {}")]
#[case("int x = ;")]
fn test_statement_problems(#[case] input: &str) {
    let mut source = Source::new(input, "statement");
    source.parse_statement();
    assert!(!source.problems().is_empty(), "Expected a problem for: {}", input);
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_if_else_branches() {
    let text = "if (a) b(); else c();";
    let (result, root) = statement(text);
    let ast = result.ast();
    let node = If::cast(ast, root).unwrap();
    let statement = node.statement().get(ast).unwrap();
    let otherwise = node.else_statement().get(ast).unwrap();
    assert_eq!(text_of(&result, text, statement), "b();");
    assert_eq!(text_of(&result, text, otherwise), "c();");
}

#[test]
fn test_local_variable_with_several_entries() {
    let (result, root) = statement("int[] a = {1, 2}, b[];");
    let ast = result.ast();
    let declaration = VariableDeclaration::cast(ast, root).unwrap();
    let definition = VariableDefinition::cast(ast, declaration.definition().get(ast).unwrap()).unwrap();
    let entries = definition.variables().raw(ast).to_vec();
    assert_eq!(entries.len(), 2);

    let first = VariableDefinitionEntry::cast(ast, entries[0]).unwrap();
    assert_eq!(name_of(ast, first.name().get(ast)), "a");
    let initializer = first.initializer().get(ast).unwrap();
    assert_eq!(ast.kind(initializer), NodeKind::ArrayInitializer);

    let second = VariableDefinitionEntry::cast(ast, entries[1]).unwrap();
    assert_eq!(second.array_dimensions(ast), 1);
    assert_eq!(second.effective_dimensions(ast).unwrap(), 2);
}

#[test]
fn test_basic_for_with_declaration() {
    let (result, root) = statement("for (int i = 0; i < n; i++) total += i;");
    let ast = result.ast();
    let node = For::cast(ast, root).unwrap();
    assert!(node.variable_declaration().get(ast).is_some());
    assert!(node.expression_inits().is_empty(ast));
    assert!(node.condition().get(ast).is_some());
    assert_eq!(node.updates().len(ast), 1);
}

#[test]
fn test_basic_for_with_expression_inits() {
    let (result, root) = statement("for (i = 0, j = 0; ; ) {}");
    let ast = result.ast();
    let node = For::cast(ast, root).unwrap();
    assert!(node.variable_declaration().get(ast).is_none());
    assert_eq!(node.expression_inits().len(ast), 2);
    assert!(node.condition().get(ast).is_none());
}

#[test]
fn test_enhanced_for() {
    let (result, root) = statement("for (String s : names) print(s);");
    let ast = result.ast();
    let node = ForEach::cast(ast, root).unwrap();
    let variable = VariableDefinition::cast(ast, node.variable().get(ast).unwrap()).unwrap();
    assert_eq!(variable.variables().len(ast), 1);
    assert_eq!(ast.kind(node.iterable().get(ast).unwrap()), NodeKind::VariableReference);
}

#[test]
fn test_switch_body_is_flat() {
    let (result, root) = statement("switch (x) { case 1: a(); break; case 2: default: b(); }");
    let ast = result.ast();
    let node = Switch::cast(ast, root).unwrap();
    let body = Block::cast(ast, node.body().get(ast).unwrap()).unwrap();
    let kinds: Vec<NodeKind> = body.contents().raw(ast).iter().map(|id| ast.kind(*id)).collect();
    assert_eq!(
        kinds,
        [
            NodeKind::Case,
            NodeKind::ExpressionStatement,
            NodeKind::Break,
            NodeKind::Case,
            NodeKind::DefaultCase,
            NodeKind::ExpressionStatement,
        ]
    );
}

#[test]
fn test_try_with_catches() {
    let (result, root) = statement("try { } catch (IOException e) { } catch (final RuntimeException e) { }");
    let ast = result.ast();
    let node = Try::cast(ast, root).unwrap();
    assert_eq!(node.catches().len(ast), 2);
    assert!(node.finally().get(ast).is_none());
}

#[test]
fn test_nested_labels() {
    let text = "a: b: break a;";
    let (result, root) = statement(text);
    let ast = result.ast();
    let outer = LabelledStatement::cast(ast, root).unwrap();
    assert_eq!(name_of(ast, outer.label().get(ast)), "a");
    let inner = LabelledStatement::cast(ast, outer.statement().get(ast).unwrap()).unwrap();
    assert_eq!(name_of(ast, inner.label().get(ast)), "b");
    assert_eq!(text_of(&result, text, inner.id()), "b: break a;");

    let jump = Break::cast(ast, inner.statement().get(ast).unwrap()).unwrap();
    assert_eq!(name_of(ast, jump.label().get(ast)), "a");
}

#[rstest]
#[case("outer.super(1);", NodeKind::VariableReference, 1)]
#[case("a.b.super();", NodeKind::Select, 0)]
#[case("make().super(x, y);", NodeKind::MethodInvocation, 2)]
fn test_qualified_super_call(#[case] input: &str, #[case] qualifier_kind: NodeKind, #[case] arguments: usize) {
    let (result, root) = statement(input);
    let ast = result.ast();
    let node = SuperConstructorInvocation::cast(ast, root).unwrap();
    let qualifier = node.qualifier().get(ast).unwrap();
    assert_eq!(ast.kind(qualifier), qualifier_kind);
    assert_eq!(node.arguments().len(ast), arguments);
}

#[test]
fn test_statement_sequence() {
    let mut source = Source::new("a(); b(); { c(); }", "statements");
    let nodes = source.parse_statement().to_vec();
    assert!(source.problems().is_empty());
    assert_eq!(nodes.len(), 3);
    assert_eq!(source.ast().kind(nodes[2]), NodeKind::Block);
}

#[test]
fn test_block_recovers_at_next_statement() {
    let mut source = Source::new("{ int x = ; y(); }", "statements");
    let nodes = source.parse_statement().to_vec();
    assert!(!source.problems().is_empty());
    assert_eq!(nodes.len(), 1);

    let ast = source.ast();
    let block = Block::cast(ast, nodes[0]).unwrap();
    let last = block.contents().last(ast).unwrap();
    assert_eq!(ast.kind(last), NodeKind::ExpressionStatement);
}
