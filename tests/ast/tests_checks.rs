//! AST Tests - Syntax checks over parsed sources
//!
//! The grammar is lenient; these are the problems it leaves to the checks.

use jast::ast::checks::{assert_valid, check};
use jast::{ParseOptions, Source};
use rstest::rstest;

use crate::helpers::unit;

fn syntax_messages(text: &str) -> Vec<String> {
    let options = ParseOptions::default().with_syntax_checks();
    let mut source = Source::with_options(text, "Test.java", options);
    source.parse_compilation_unit();
    assert!(source.problems().is_empty(), "Unexpected parse problems in {:?}", text);
    source.syntax_problems().iter().map(|p| p.message.clone()).collect()
}

#[rstest]
#[case("class A { void f() { return; } }")]
#[case("public abstract class A { abstract void f(); }")]
#[case("interface I { void f(); int X = 1; }")]
#[case("class A { A() { super(); } }")]
#[case("class A { void f(String... args) {} }")]
#[case("enum E { A; private E() {} }")]
#[case("class A { void f() { switch (x) { case 1: break; default: } } }")]
#[case("class A { static int f() { return -2147483648; } }")]
fn test_valid_sources(#[case] input: &str) {
    assert_eq!(syntax_messages(input), Vec::<String>::new(), "For: {}", input);
}

#[rstest]
#[case("class A { void f() { return; x(); } }", "Unreachable code")]
#[case("class A { public private int x; }", "Modifier private cannot be used together with public here")]
#[case("class A { final final int x; }", "Duplicate modifier: final")]
#[case("class A { abstract void f(); }", "Abstract methods are only allowed in interfaces and abstract classes")]
#[case("class A { void f(int... a, int b) {} }", "Varargs are only legal on the last parameter of a constructor or method.")]
#[case("class A { void f() { case 1: } }", "case statements are only legal directly inside switch statements.")]
#[case("class A { void f() { if (x) int y; } }", "Variable declarations only make sense in the context of a block.")]
#[case("class A { List<int> list; }", "Primitive types aren't allowed in type arguments.")]
#[case("class A { void[] f; }", "Array of void type is not legal.")]
#[case("private class A {}", "Top-level types cannot be private.")]
#[case("class A { static { return; } }", "Initializers may not contain return statements.")]
#[case("class A { A() { x(); this(1); } }", "Calling this must be the first statement in a constructor.")]
fn test_reported_problems(#[case] input: &str, #[case] expected: &str) {
    let messages = syntax_messages(input);
    assert!(
        messages.iter().any(|m| m == expected),
        "Expected {:?} for {:?}, got {:?}",
        expected,
        input,
        messages
    );
}

#[test]
fn test_checks_are_off_by_default() {
    let mut source = Source::new("class A { final final int x; }", "A.java");
    source.parse_compilation_unit();
    assert!(source.syntax_problems().is_empty());
}

#[test]
fn test_check_and_assert_valid_on_demand() {
    let (result, root) = unit("class A { void f() { throw e; y(); } }");
    let problems = check(result.ast(), root);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].message, "Unreachable code");

    let err = assert_valid(result.ast(), root).unwrap_err();
    assert_eq!(err.message, "Unreachable code");
    assert_eq!(err.node, Some(problems[0].node));
}
