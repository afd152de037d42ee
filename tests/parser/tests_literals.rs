//! Parser Tests - Literals
//!
//! Raw text is kept as written; values are decoded on demand.

use jast::ast::{
    AstNode, BooleanLiteral, CharLiteral, FloatingPointLiteral, IntegralLiteral, NodeKind, StringLiteral,
    UnaryExpression,
};
use jast::{ParseOptions, Source};
use rstest::rstest;

use crate::helpers::expression;

#[rstest]
#[case("0", 0)]
#[case("42", 42)]
#[case("0x1F", 31)]
#[case("0XfF", 255)]
#[case("017", 15)]
#[case("2147483647", i32::MAX)]
#[case("0xFFFFFFFF", -1)]
fn test_int_values(#[case] input: &str, #[case] expected: i32) {
    let (result, root) = expression(input);
    let ast = result.ast();
    let literal = IntegralLiteral::cast(ast, root).unwrap();
    assert_eq!(literal.raw_value(ast), input);
    assert_eq!(literal.int_value(ast).unwrap(), expected);
}

#[test]
fn test_long_literal() {
    let (result, root) = expression("9223372036854775807L");
    let ast = result.ast();
    let literal = IntegralLiteral::cast(ast, root).unwrap();
    assert!(literal.is_long(ast));
    assert_eq!(literal.long_value(ast).unwrap(), i64::MAX);
    assert!(literal.int_value(ast).is_err());
}

#[test]
fn test_int_too_large_outside_unary_minus() {
    let (result, root) = expression("2147483648");
    let ast = result.ast();
    let err = IntegralLiteral::cast(ast, root).unwrap().value(ast).unwrap_err();
    assert_eq!(err.message, "Int literal too large: 2147483648");
}

#[test]
fn test_int_minimum_under_unary_minus() {
    let (result, root) = expression("-2147483648");
    let ast = result.ast();
    let minus = UnaryExpression::cast(ast, root).unwrap();
    let operand = minus.operand().get(ast).unwrap();
    assert!(IntegralLiteral::cast(ast, operand).unwrap().value(ast).is_ok());
}

#[rstest]
#[case("1.5", 1.5)]
#[case(".5", 0.5)]
#[case("1e3", 1000.0)]
#[case("2f", 2.0)]
#[case("3.25D", 3.25)]
#[case("0x1p4", 16.0)]
fn test_floating_point_values(#[case] input: &str, #[case] expected: f64) {
    let (result, root) = expression(input);
    let ast = result.ast();
    let literal = FloatingPointLiteral::cast(ast, root).unwrap();
    assert_eq!(literal.double_value(ast).unwrap(), expected);
}

#[rstest]
#[case("'a'", 'a')]
#[case("'\\n'", '\n')]
#[case("'\\''", '\'')]
#[case("'\\101'", 'A')]
#[case("'\\0'", '\0')]
fn test_char_values(#[case] input: &str, #[case] expected: char) {
    let (result, root) = expression(input);
    let ast = result.ast();
    assert_eq!(CharLiteral::cast(ast, root).unwrap().value(ast).unwrap(), expected);
}

#[rstest]
#[case("\"\"", "")]
#[case("\"plain\"", "plain")]
#[case("\"tab\\there\"", "tab\there")]
#[case("\"quote \\\" inside\"", "quote \" inside")]
#[case("\"\\101\\7\"", "A\u{7}")]
fn test_string_values(#[case] input: &str, #[case] expected: &str) {
    let (result, root) = expression(input);
    let ast = result.ast();
    assert_eq!(StringLiteral::cast(ast, root).unwrap().value(ast).unwrap(), expected);
}

#[test]
fn test_backslash_u_inside_string_is_decoded_first() {
    let (result, root) = expression(r#""\u0041\u0042""#);
    let ast = result.ast();
    let literal = StringLiteral::cast(ast, root).unwrap();
    assert_eq!(literal.raw_value(ast), "\"AB\"");
    assert_eq!(ast.position(root).end(), 14);
}

#[test]
fn test_booleans_and_null() {
    let (result, root) = expression("true");
    assert!(BooleanLiteral::cast(result.ast(), root).unwrap().value(result.ast()).unwrap());
    let (result, root) = expression("null");
    assert_eq!(result.ast().kind(root), NodeKind::NullLiteral);
}

#[test]
fn test_unterminated_string_is_a_problem() {
    let mut source = Source::new("\"open", "expression");
    source.parse_expression();
    assert!(!source.problems().is_empty());
}

#[test]
fn test_bad_literal_is_a_syntax_problem() {
    let options = ParseOptions::default().with_syntax_checks();
    let mut source = Source::with_options("int x = 99999999999;", "statement", options);
    source.parse_statement();
    assert!(source.problems().is_empty());
    let messages: Vec<&str> = source.syntax_problems().iter().map(|p| p.message.as_str()).collect();
    assert_eq!(messages, ["Int literal too large: 99999999999"]);
}
