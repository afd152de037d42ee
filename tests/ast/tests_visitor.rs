//! AST Tests - Visiting parsed trees

use jast::ast::{Ast, AstVisitor, Identifier, MethodDeclaration, MethodInvocation, NodeKind};
use jast::NodeId;

use crate::helpers::{name_of, unit};

const SOURCE: &str = "class A {\n\
                        void f() { a(); if (x) { b(); } }\n\
                        void g() { c(); }\n\
                      }";

#[derive(Default)]
struct CallCollector {
    calls: Vec<String>,
}

impl AstVisitor for CallCollector {
    fn visit_method_invocation(&mut self, ast: &Ast, node: MethodInvocation) -> bool {
        self.calls.push(name_of(ast, node.name().get(ast)).to_owned());
        false
    }
}

#[test]
fn test_visit_collects_calls_in_source_order() {
    let (result, root) = unit(SOURCE);
    let mut collector = CallCollector::default();
    result.ast().accept(root, &mut collector);
    assert_eq!(collector.calls, ["a", "b", "c"]);
}

/// Skips the body of every method named `f`.
#[derive(Default)]
struct SkipF {
    calls: Vec<String>,
}

impl AstVisitor for SkipF {
    fn visit_method_declaration(&mut self, ast: &Ast, node: MethodDeclaration) -> bool {
        name_of(ast, node.method_name().get(ast)) == "f"
    }

    fn visit_method_invocation(&mut self, ast: &Ast, node: MethodInvocation) -> bool {
        self.calls.push(name_of(ast, node.name().get(ast)).to_owned());
        true
    }
}

#[test]
fn test_returning_true_skips_children() {
    let (result, root) = unit(SOURCE);
    let mut visitor = SkipF::default();
    result.ast().accept(root, &mut visitor);
    assert_eq!(visitor.calls, ["c"]);
}

#[derive(Default)]
struct Trace {
    events: Vec<(&'static str, NodeKind)>,
    skip_identifiers: bool,
}

impl AstVisitor for Trace {
    fn visit_node(&mut self, ast: &Ast, id: NodeId) -> bool {
        self.events.push(("enter", ast.kind(id)));
        false
    }

    fn visit_identifier(&mut self, ast: &Ast, node: Identifier) -> bool {
        self.events.push(("enter", ast.kind(node.id())));
        self.skip_identifiers
    }

    fn end_visit(&mut self, ast: &Ast, id: NodeId) {
        self.events.push(("leave", ast.kind(id)));
    }
}

#[test]
fn test_end_visit_follows_children() {
    let (result, root) = crate::helpers::expression("a(b)");
    let mut trace = Trace::default();
    result.ast().accept(root, &mut trace);
    assert_eq!(
        trace.events,
        [
            ("enter", NodeKind::MethodInvocation),
            ("enter", NodeKind::Identifier),
            ("leave", NodeKind::Identifier),
            ("enter", NodeKind::VariableReference),
            ("enter", NodeKind::Identifier),
            ("leave", NodeKind::Identifier),
            ("leave", NodeKind::VariableReference),
            ("leave", NodeKind::MethodInvocation),
        ]
    );
}

#[test]
fn test_handled_nodes_get_no_end_visit() {
    let (result, root) = crate::helpers::expression("a(b)");
    let mut trace = Trace {
        skip_identifiers: true,
        ..Trace::default()
    };
    result.ast().accept(root, &mut trace);
    let leaves: Vec<NodeKind> = trace
        .events
        .iter()
        .filter(|(event, _)| *event == "leave")
        .map(|(_, kind)| *kind)
        .collect();
    assert_eq!(leaves, [NodeKind::VariableReference, NodeKind::MethodInvocation]);
}
