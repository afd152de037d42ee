//! Parser Tests - Expressions
//!
//! Precedence, associativity, cast disambiguation and the postfix chain.

use jast::ast::{
    Ast, AstNode, BinaryExpression, BinaryOperator, Cast, ConstructorInvocation, InlineIfExpression,
    MethodInvocation, NodeKind, Select, This, TypeReference, UnaryExpression, UnaryOperator,
};
use jast::{NodeId, Source};
use rstest::rstest;

use crate::helpers::{expression, name_of, text_of};

fn operator(ast: &Ast, id: NodeId) -> BinaryOperator {
    BinaryExpression::cast(ast, id).unwrap().operator(ast).unwrap()
}

fn left_right(ast: &Ast, id: NodeId) -> (NodeId, NodeId) {
    let node = BinaryExpression::cast(ast, id).unwrap();
    (node.left().get(ast).unwrap(), node.right().get(ast).unwrap())
}

// ============================================================================
// Acceptance
// ============================================================================

#[rstest]
#[case("a")]
#[case("a.b.c")]
#[case("a[1][j + 1]")]
#[case("foo(1, \"two\", '3', 4.0, null, true)")]
#[case("list.<String>get(0).length()")]
#[case("new int[] {1, 2, 3}")]
#[case("new int[3][]")]
#[case("new java.util.ArrayList<String>(10)")]
#[case("outer.new Inner()")]
#[case("new Runnable() { public void run() {} }")]
#[case("Outer.this.field")]
#[case("String[].class")]
#[case("int.class")]
#[case("x instanceof java.util.List<?>")]
#[case("a ? b : c")]
#[case("a = b += c")]
#[case("i++ + ++j")]
#[case("-(a) - -b")]
#[case("(java.lang.String) o")]
#[case("(List<String>) o")]
#[case("(int[]) o")]
#[case("~mask & 0xFF")]
#[case("a >>> 2 >> 1 << 3")]
#[case("super.toString()")]
fn test_expression_parses(#[case] input: &str) {
    let (result, _) = expression(input);
    assert!(result.problems().is_empty(), "Failed to parse: {}", input);
}

#[rstest]
#[case("a +")]
#[case("foo(")]
#[case("new")]
#[case("a b")]
fn test_expression_problems(#[case] input: &str) {
    let mut source = Source::new(input, "expression");
    source.parse_expression();
    assert!(!source.problems().is_empty(), "Expected a problem for: {}", input);
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    let (result, root) = expression("1 + 2 * 3");
    let ast = result.ast();
    assert_eq!(operator(ast, root), BinaryOperator::Plus);
    let (_, right) = left_right(ast, root);
    assert_eq!(operator(ast, right), BinaryOperator::Multiply);
}

#[test]
fn test_binary_is_left_associative() {
    let text = "a - b - c";
    let (result, root) = expression(text);
    let ast = result.ast();
    let (left, right) = left_right(ast, root);
    assert_eq!(operator(ast, left), BinaryOperator::Minus);
    assert_eq!(text_of(&result, text, left), "a - b");
    assert_eq!(text_of(&result, text, right), "c");
}

#[test]
fn test_assignment_is_right_associative() {
    let text = "a = b = c";
    let (result, root) = expression(text);
    let ast = result.ast();
    assert_eq!(operator(ast, root), BinaryOperator::Assign);
    let (left, right) = left_right(ast, root);
    assert_eq!(ast.kind(left), NodeKind::VariableReference);
    assert_eq!(operator(ast, right), BinaryOperator::Assign);
}

#[test]
fn test_ternary_nests_in_false_branch() {
    let (result, root) = expression("a ? b : c ? d : e");
    let ast = result.ast();
    let node = InlineIfExpression::cast(ast, root).unwrap();
    let if_false = node.if_false().get(ast).unwrap();
    assert_eq!(ast.kind(if_false), NodeKind::InlineIfExpression);
}

#[test]
fn test_logical_and_binds_tighter_than_or() {
    let (result, root) = expression("a || b && c");
    let ast = result.ast();
    assert_eq!(operator(ast, root), BinaryOperator::LogicalOr);
    let (_, right) = left_right(ast, root);
    assert_eq!(operator(ast, right), BinaryOperator::LogicalAnd);
}

#[test]
fn test_instanceof_binds_at_relational_level() {
    let (result, root) = expression("a == b instanceof String");
    let ast = result.ast();
    assert_eq!(operator(ast, root), BinaryOperator::Equals);
    let (_, right) = left_right(ast, root);
    assert_eq!(ast.kind(right), NodeKind::InstanceOf);
}

// ============================================================================
// Casts and parentheses
// ============================================================================

#[test]
fn test_reference_cast() {
    let (result, root) = expression("(String) x");
    let ast = result.ast();
    let cast = Cast::cast(ast, root).unwrap();
    let reference = TypeReference::cast(ast, cast.type_reference().get(ast).unwrap()).unwrap();
    assert_eq!(reference.type_name(ast), "String");
}

#[test]
fn test_primitive_cast_of_negative() {
    let (result, root) = expression("(int) -1");
    let ast = result.ast();
    let cast = Cast::cast(ast, root).unwrap();
    let operand = cast.operand().get(ast).unwrap();
    let unary = UnaryExpression::cast(ast, operand).unwrap();
    assert_eq!(unary.operator(ast), Some(UnaryOperator::UnaryMinus));
}

#[rstest]
#[case("(a) + b", BinaryOperator::Plus)]
#[case("(a) - b", BinaryOperator::Minus)]
fn test_parenthesized_name_before_sign_is_arithmetic(#[case] input: &str, #[case] expected: BinaryOperator) {
    let (result, root) = expression(input);
    let ast = result.ast();
    assert_eq!(operator(ast, root), expected);
    let (left, _) = left_right(ast, root);
    assert_eq!(ast.paren_count(left), 1);
}

#[test]
fn test_parentheses_are_recorded_on_the_inner_expression() {
    let text = "((a + b)) * c";
    let (result, root) = expression(text);
    let ast = result.ast();
    let (left, _) = left_right(ast, root);
    assert_eq!(ast.paren_count(left), 2);
    assert_eq!(text_of(&result, text, left), "a + b");
    assert_eq!(text_of(&result, text, root), text);
}

// ============================================================================
// Postfix chain
// ============================================================================

#[test]
fn test_select_over_method_invocation() {
    let (result, root) = expression("a.b(c).d");
    let ast = result.ast();
    let select = Select::cast(ast, root).unwrap();
    assert_eq!(name_of(ast, select.identifier().get(ast)), "d");
    let call = MethodInvocation::cast(ast, select.operand().get(ast).unwrap()).unwrap();
    assert_eq!(name_of(ast, call.name().get(ast)), "b");
    assert_eq!(call.arguments().len(ast), 1);
}

#[test]
fn test_explicit_method_type_arguments() {
    let (result, root) = expression("Collections.<String>emptyList()");
    let ast = result.ast();
    let call = MethodInvocation::cast(ast, root).unwrap();
    assert_eq!(call.method_type_arguments().len(ast), 1);
    assert!(call.operand().get(ast).is_some());
}

#[test]
fn test_postfix_increment() {
    let (result, root) = expression("i++");
    let ast = result.ast();
    let unary = UnaryExpression::cast(ast, root).unwrap();
    assert_eq!(unary.operator(ast), Some(UnaryOperator::PostfixIncrement));
}

#[test]
fn test_anonymous_class_instantiation() {
    let (result, root) = expression("new Foo<Bar>(1) { int x; }");
    let ast = result.ast();
    let node = ConstructorInvocation::cast(ast, root).unwrap();
    assert_eq!(node.arguments().len(ast), 1);
    assert!(node.anonymous_class_body().get(ast).is_some());
    let reference = TypeReference::cast(ast, node.type_reference().get(ast).unwrap()).unwrap();
    assert_eq!(reference.type_name(ast), "Foo<Bar>");
}

#[test]
fn test_qualified_this() {
    let (result, root) = expression("Outer.this");
    let ast = result.ast();
    let node = This::cast(ast, root).unwrap();
    assert!(node.qualifier().get(ast).is_some());
}

#[test]
fn test_qualified_super_member_access() {
    let (result, root) = expression("Outer.super.run()");
    let ast = result.ast();
    let call = MethodInvocation::cast(ast, root).unwrap();
    let operand = call.operand().get(ast).unwrap();
    let node = jast::ast::Super::cast(ast, operand).unwrap();
    assert!(node.qualifier().get(ast).is_some());
}

#[test]
fn test_array_creation_dimensions() {
    let (result, root) = expression("new int[3][]");
    let ast = result.ast();
    assert_eq!(ast.kind(root), NodeKind::ArrayCreation);
    let dimensions = jast::ast::ArrayCreation::cast(ast, root).unwrap().dimensions();
    assert_eq!(dimensions.len(ast), 2);
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_operand_positions() {
    let text = "alpha + beta  ";
    let (result, root) = expression(text);
    let (left, right) = left_right(result.ast(), root);
    assert_eq!(text_of(&result, text, root), "alpha + beta");
    assert_eq!(text_of(&result, text, left), "alpha");
    assert_eq!(text_of(&result, text, right), "beta");
}
