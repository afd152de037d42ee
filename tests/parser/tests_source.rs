//! Source Tests
//!
//! The whole pipeline: preprocessing, position trimming and mapping,
//! javadoc association, recovery, source structures and parallel parsing.

use jast::ast::{AstNode, ClassDeclaration, Comment, CompilationUnit, MethodDeclaration, NodeKind, NormalTypeBody};
use jast::{NodeId, ParseOptions, ParseResult, Source, parse_all};
use rstest::rstest;

use crate::helpers::{assert_no_problems, parse_unit, text_of, unit};

fn class_of(result: &ParseResult, root: NodeId) -> ClassDeclaration {
    let ast = result.ast();
    let unit = CompilationUnit::cast(ast, root).unwrap();
    ClassDeclaration::cast(ast, unit.type_declarations().first(ast).unwrap()).unwrap()
}

fn methods_of(result: &ParseResult, class: ClassDeclaration) -> Vec<MethodDeclaration> {
    let ast = result.ast();
    let body = NormalTypeBody::cast(ast, class.body().get(ast).unwrap()).unwrap();
    body.members()
        .raw(ast)
        .iter()
        .filter_map(|id| MethodDeclaration::cast(ast, *id))
        .collect()
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_positions_exclude_trailing_comments_and_whitespace() {
    let text = "class A { int x; /* note */ }\n// trailing\n";
    let (result, root) = unit(text);
    let class = class_of(&result, root);
    assert_eq!(text_of(&result, text, class.id()), "class A { int x; /* note */ }");

    let body = class.body().get(result.ast()).unwrap();
    let field = NormalTypeBody::cast(result.ast(), body).unwrap().members().first(result.ast()).unwrap();
    assert_eq!(text_of(&result, text, field), "int x;");
}

#[test]
fn test_raw_positions_keep_trailing_whitespace() {
    let text = "class A {}   ";
    let mut trimmed = Source::new(text, "A.java");
    let mut raw = Source::with_options(text, "A.java", ParseOptions::raw());
    let trimmed_root = trimmed.parse_compilation_unit()[0];
    let raw_root = raw.parse_compilation_unit()[0];

    assert_eq!(trimmed.ast().position(trimmed_root).end(), 10);
    assert_eq!(raw.ast().position(raw_root).end(), text.len());
}

#[test]
fn test_empty_modifiers_have_zero_width_inside_parent() {
    let text = "class A {}";
    let (result, root) = unit(text);
    let ast = result.ast();
    let class = class_of(&result, root);
    let modifiers = class.modifiers().get(ast).unwrap();
    let position = ast.position(modifiers);
    assert!(position.is_empty());
    assert!(ast.position(class.id()).contains(&position));
}

#[test]
fn test_backslash_u_positions_map_to_raw_input() {
    let text = r"class \u0041 { }";
    let (result, root) = unit(text);
    let ast = result.ast();
    let class = class_of(&result, root);
    let name = class.name().get(ast).unwrap();
    let identifier = jast::ast::Identifier::cast(ast, name).unwrap();
    assert_eq!(identifier.value(ast), "A");
    assert_eq!(text_of(&result, text, name), r"\u0041");
    assert_eq!(result.map_position(7), 12);
    assert_eq!(ast.position(class.id()).end(), text.len());
}

#[test]
fn test_invalid_backslash_u_is_reported_at_raw_offset() {
    let result = parse_unit(r#"class A { String s = "\u00G1"; }"#);
    let problem = result
        .problems()
        .iter()
        .find(|p| p.message.starts_with("Invalid backslash-u escape"))
        .unwrap();
    assert_eq!(problem.position.start(), 22);
}

// ============================================================================
// Comments and javadoc
// ============================================================================

#[test]
fn test_javadoc_attaches_to_the_following_declaration() {
    let text = "/** The class. */\n\
                class A {\n\
                  /** Runs. */\n\
                  void run() {}\n\
                  // not javadoc\n\
                  void stop() {}\n\
                }";
    let (result, root) = unit(text);
    let ast = result.ast();
    assert_eq!(result.comments().len(), 3);

    let class = class_of(&result, root);
    let javadoc = Comment::cast(ast, class.javadoc().get(ast).unwrap()).unwrap();
    assert!(javadoc.is_javadoc(ast));
    assert_eq!(javadoc.content(ast).trim_start_matches('*').trim(), "The class.");

    let methods = methods_of(&result, class);
    assert!(methods[0].javadoc().get(ast).is_some());
    assert!(methods[1].javadoc().get(ast).is_none());
}

#[test]
fn test_only_the_nearest_javadoc_is_kept() {
    let text = "/** first */ /** second */ class A {}";
    let (result, root) = unit(text);
    let ast = result.ast();
    let class = class_of(&result, root);
    let javadoc = Comment::cast(ast, class.javadoc().get(ast).unwrap()).unwrap();
    assert_eq!(javadoc.content(ast).trim_start_matches('*').trim(), "second");
}

#[test]
fn test_javadoc_association_can_be_disabled() {
    let options = ParseOptions {
        associate_javadoc: false,
        ..ParseOptions::default()
    };
    let mut source = Source::with_options("/** doc */ class A {}", "A.java", options);
    let root = source.parse_compilation_unit()[0];
    let result = source.into_result();
    let class = class_of(&result, root);
    assert!(class.javadoc().get(result.ast()).is_none());
    assert_eq!(result.comments().len(), 1);
}

#[test]
fn test_deprecated_tag() {
    let (result, root) = unit("/**\n * @deprecated use B\n */\nclass A {}");
    let ast = result.ast();
    let class = class_of(&result, root);
    let javadoc = Comment::cast(ast, class.javadoc().get(ast).unwrap()).unwrap();
    assert!(javadoc.is_marked_deprecated(ast));
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_broken_member_does_not_lose_its_neighbours() {
    let text = "class A { void f() { int x = ; } int = 3; void g() {} }";
    let result = parse_unit(text);
    assert!(!result.problems().is_empty());
    let root = result.nodes()[0];
    let class = class_of(&result, root);
    let names: Vec<String> = methods_of(&result, class)
        .iter()
        .map(|m| crate::helpers::name_of(result.ast(), m.method_name().get(result.ast())).to_owned())
        .collect();
    assert_eq!(names, ["f", "g"]);
}

#[test]
fn test_stray_closing_brace() {
    let result = parse_unit("class A {} } class B {}");
    let messages: Vec<&str> = result.problems().iter().map(|p| p.message.as_str()).collect();
    assert_eq!(messages, ["Unexpected '}'"]);
    let root = result.nodes()[0];
    let unit = CompilationUnit::cast(result.ast(), root).unwrap();
    assert_eq!(unit.type_declarations().len(result.ast()), 2);
}

#[test]
fn test_missing_closing_brace() {
    let result = parse_unit("class A { void f() {}");
    let messages: Vec<&str> = result.problems().iter().map(|p| p.message.as_str()).collect();
    assert_eq!(messages, ["Missing '}' at end of input"]);
    let root = result.nodes()[0];
    let class = class_of(&result, root);
    assert_eq!(methods_of(&result, class).len(), 1);
}

#[test]
fn test_problems_are_capped() {
    let options = ParseOptions::default().with_max_problems(2);
    let text = "class A { int = ; int = ; int = ; int = ; }";
    let mut source = Source::with_options(text, "A.java", options);
    source.parse_compilation_unit();
    assert!(source.problems().len() <= 2);
}

#[test]
fn test_statement_between_members_dangles_on_the_body() {
    let text = "class A { void f() {} x = 5; void g() {} }";
    let result = parse_unit(text);
    assert!(!result.problems().is_empty());
    let root = result.nodes()[0];
    let class = class_of(&result, root);
    assert_eq!(methods_of(&result, class).len(), 2);

    let ast = result.ast();
    let body = class.body().get(ast).unwrap();
    let strays = result.dangling_of(body);
    assert_eq!(strays.len(), 1);
    assert_eq!(ast.kind(strays[0]), NodeKind::ExpressionStatement);
    assert_eq!(ast.parent(strays[0]), None);
    assert_eq!(text_of(&result, text, strays[0]), "x = 5;");
}

#[test]
fn test_method_inside_block_dangles_on_the_block() {
    let text = "{ a(); void g() { h(); } b(); }";
    let mut source = Source::new(text, "statements");
    let root = source.parse_statement()[0];
    let result = source.into_result();
    assert!(!result.problems().is_empty());

    let ast = result.ast();
    let block = jast::ast::Block::cast(ast, root).unwrap();
    assert_eq!(block.contents().len(ast), 2);
    let strays = result.dangling_of(root);
    assert_eq!(strays.len(), 1);
    let method = MethodDeclaration::cast(ast, strays[0]).unwrap();
    assert_eq!(crate::helpers::name_of(ast, method.method_name().get(ast)), "g");
    assert_eq!(text_of(&result, text, strays[0]), "void g() { h(); }");
}

#[test]
fn test_clean_parse_has_no_dangling_nodes() {
    let (result, _) = unit("class A { void f() { g(); } }");
    assert!(result.dangling().is_empty());
}

#[rstest]
#[case(400)]
#[case(5000)]
fn test_deep_nesting_is_a_problem_not_a_crash(#[case] depth: usize) {
    let text = format!(
        "class A {{ int x = {}1{}; void f() {{}} }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let result = parse_unit(&text);
    let messages: Vec<&str> = result.problems().iter().map(|p| p.message.as_str()).collect();
    assert_eq!(messages.len(), 1, "{messages:?}");
    assert!(messages[0].starts_with("Nesting too deep"), "{messages:?}");

    let root = result.nodes()[0];
    let class = class_of(&result, root);
    assert_eq!(methods_of(&result, class).len(), 1);
}

#[test]
fn test_deep_prefix_chains_and_blocks_are_bounded() {
    let negations = format!("boolean b = {}x;", "!".repeat(3000));
    let mut source = Source::new(negations, "statement");
    source.parse_statement();
    assert!(source.problems().iter().any(|p| p.message.starts_with("Nesting too deep")));

    let blocks = format!("{}{}", "{".repeat(3000), "}".repeat(3000));
    let mut source = Source::new(blocks, "statement");
    source.parse_statement();
    assert!(source.problems().iter().any(|p| p.message.starts_with("Nesting too deep")));
}

#[test]
fn test_nesting_within_the_limit_parses() {
    let text = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    let (result, root) = crate::helpers::expression(&text);
    assert_eq!(result.ast().paren_count(root), 40);

    let options = ParseOptions::default().with_max_depth(3);
    let mut source = Source::with_options("(((1)))", "expression", options);
    assert!(source.parse_expression().is_empty());
    assert_eq!(source.problems().len(), 1);
}

// ============================================================================
// Source structures
// ============================================================================

#[test]
fn test_structures_of_if() {
    let text = "if (a) b(); else c();";
    let mut source = Source::new(text, "statement");
    let root = source.parse_statement()[0];
    let result = source.into_result();
    let contents: Vec<&str> = result.structures_of(root).iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, ["if", "(", ")", "else"]);
    for structure in result.structures_of(root) {
        assert_eq!(structure.position.slice(text), Some(structure.content.as_str()));
    }
}

#[test]
fn test_structures_of_method() {
    let text = "class A { void f(int a, int b) {} }";
    let (result, root) = unit(text);
    let class = class_of(&result, root);
    let method = methods_of(&result, class)[0];
    let contents: Vec<&str> = result.structures_of(method.id()).iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, ["(", ",", ")"]);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_first_parse_wins() {
    let mut source = Source::new("a + b", "snippet");
    assert_eq!(source.parse_expression().len(), 1);
    let root = source.nodes()[0];
    let kind = source.ast().kind(root);
    source.parse_compilation_unit();
    let again = source.nodes()[0];
    assert_eq!(again, root);
    assert_eq!(source.ast().kind(again), kind);
    assert_eq!(kind, NodeKind::BinaryExpression);
}

#[test]
fn test_lazy_accessors_parse_a_compilation_unit() {
    let mut source = Source::new("class A {}", "A.java");
    assert!(!source.is_parsed());
    let root = source.nodes()[0];
    let kind = source.ast().kind(root);
    assert!(source.is_parsed());
    assert_eq!(kind, NodeKind::CompilationUnit);
}

#[test]
fn test_parse_all() {
    let mut sources: Vec<Source> = (0..8)
        .map(|i| Source::new(format!("class C{i} {{ void m{i}() {{}} }}"), format!("C{i}.java")))
        .collect();
    parse_all(&mut sources);
    for (i, source) in sources.iter_mut().enumerate() {
        assert!(source.is_parsed());
        let raw = source.raw_input().to_owned();
        let result = source.result();
        assert_no_problems(result, &raw);
        let root = result.nodes()[0];
        assert_eq!(
            jast::ast::TypeDeclaration::cast(result.ast(), class_of(result, root).id())
                .unwrap()
                .name(result.ast()),
            Some(format!("C{i}").as_str())
        );
    }
}
