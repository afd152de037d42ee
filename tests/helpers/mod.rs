//! Parse helpers shared by the integration tests.

#![allow(dead_code)]

use jast::ast::{Ast, AstNode, Identifier};
use jast::{NodeId, ParseResult, Source};

pub fn parse_unit(text: &str) -> ParseResult {
    let mut source = Source::new(text, "Test.java");
    source.parse_compilation_unit();
    source.into_result()
}

pub fn assert_no_problems(result: &ParseResult, text: &str) {
    assert!(
        result.problems().is_empty(),
        "Expected no problems in {:?}, got:\n{}",
        text,
        result
            .problems()
            .iter()
            .map(|p| format!("  {p}"))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn single(result: ParseResult, text: &str) -> (ParseResult, NodeId) {
    assert_no_problems(&result, text);
    assert_eq!(result.nodes().len(), 1, "Expected one node from {:?}", text);
    let node = result.nodes()[0];
    (result, node)
}

/// Parse a clean compilation unit and return it with its root.
pub fn unit(text: &str) -> (ParseResult, NodeId) {
    single(parse_unit(text), text)
}

pub fn expression(text: &str) -> (ParseResult, NodeId) {
    let mut source = Source::new(text, "expression");
    source.parse_expression();
    single(source.into_result(), text)
}

pub fn statement(text: &str) -> (ParseResult, NodeId) {
    let mut source = Source::new(text, "statement");
    source.parse_statement();
    single(source.into_result(), text)
}

pub fn member(text: &str) -> (ParseResult, NodeId) {
    let mut source = Source::new(text, "member");
    source.parse_member();
    single(source.into_result(), text)
}

/// The source text a node spans.
pub fn text_of<'a>(result: &ParseResult, text: &'a str, id: NodeId) -> &'a str {
    result.ast().position(id).slice(text).unwrap_or("")
}

/// Value of the identifier in a `one Identifier` slot.
pub fn name_of(ast: &Ast, id: Option<NodeId>) -> &str {
    id.and_then(|id| Identifier::cast(ast, id))
        .map(|id| id.value(ast))
        .unwrap_or("")
}
