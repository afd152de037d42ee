//! Parser Tests - Declarations
//!
//! Compilation units, type declarations, members, modifiers and annotations.

use jast::ast::{
    Annotation, AnnotationDeclaration, AnnotationMethodDeclaration, AstNode, ClassDeclaration,
    CompilationUnit, ConstructorDeclaration, EnumDeclaration, EnumTypeBody, ImportDeclaration,
    InterfaceDeclaration, MethodDeclaration, ModifierFlags, Modifiers, NodeKind, NormalTypeBody,
    PackageDeclaration, TypeDeclaration, TypeReference, TypeVariable, VariableDefinition,
};
use jast::{NodeId, ParseResult, Source};
use rstest::rstest;

use crate::helpers::{member, name_of, parse_unit, text_of, unit};

fn types_of(result: &ParseResult, root: NodeId) -> Vec<NodeId> {
    let ast = result.ast();
    CompilationUnit::cast(ast, root).unwrap().type_declarations().raw(ast).to_vec()
}

fn first_type(result: &ParseResult, root: NodeId) -> NodeId {
    types_of(result, root)[0]
}

// ============================================================================
// Compilation units
// ============================================================================

#[test]
fn test_package_and_imports() {
    let text = "package com.example.app;\n\
                import java.util.List;\n\
                import java.util.*;\n\
                import static java.lang.Math.max;\n\
                class A {}\n";
    let (result, root) = unit(text);
    let ast = result.ast();
    let node = CompilationUnit::cast(ast, root).unwrap();

    let package = PackageDeclaration::cast(ast, node.package_declaration().get(ast).unwrap()).unwrap();
    assert_eq!(package.package_name(ast), "com.example.app");

    let imports: Vec<ImportDeclaration> = node
        .import_declarations()
        .raw(ast)
        .iter()
        .map(|id| ImportDeclaration::cast(ast, *id).unwrap())
        .collect();
    assert_eq!(imports.len(), 3);
    assert_eq!(imports[0].as_fully_qualified_name(ast), "java.util.List");
    assert!(imports[1].is_star_import(ast));
    assert_eq!(imports[1].as_fully_qualified_name(ast), "java.util.*");
    assert!(imports[2].is_static_import(ast));
    assert!(!imports[2].is_star_import(ast));

    assert_eq!(types_of(&result, root).len(), 1);
}

#[test]
fn test_empty_unit() {
    let (result, root) = unit("");
    let ast = result.ast();
    let node = CompilationUnit::cast(ast, root).unwrap();
    assert!(node.package_declaration().get(ast).is_none());
    assert!(node.type_declarations().is_empty(ast));
}

#[test]
fn test_stray_semicolons_are_empty_declarations() {
    let (result, root) = unit("class A {};");
    let kinds: Vec<NodeKind> = types_of(&result, root).iter().map(|id| result.ast().kind(*id)).collect();
    assert_eq!(kinds, [NodeKind::ClassDeclaration, NodeKind::EmptyDeclaration]);
}

#[rstest]
#[case("class A {}", NodeKind::ClassDeclaration)]
#[case("public final class A<T> extends B<T> implements C, D {}", NodeKind::ClassDeclaration)]
#[case("interface I extends J, K {}", NodeKind::InterfaceDeclaration)]
#[case("enum E { A, B, }", NodeKind::EnumDeclaration)]
#[case("@interface Marker {}", NodeKind::AnnotationDeclaration)]
#[case("@Deprecated public abstract class A {}", NodeKind::ClassDeclaration)]
fn test_type_declaration_kind(#[case] input: &str, #[case] expected: NodeKind) {
    let (result, root) = unit(input);
    assert_eq!(result.ast().kind(first_type(&result, root)), expected);
}

// ============================================================================
// Classes and interfaces
// ============================================================================

#[test]
fn test_class_supertypes() {
    let (result, root) = unit("class A<T extends Comparable<T>> extends Base implements X, Y<T> {}");
    let ast = result.ast();
    let class = ClassDeclaration::cast(ast, first_type(&result, root)).unwrap();
    assert_eq!(name_of(ast, class.name().get(ast)), "A");

    let variable = TypeVariable::cast(ast, class.type_variables().first(ast).unwrap()).unwrap();
    assert_eq!(name_of(ast, variable.name().get(ast)), "T");
    assert_eq!(variable.extending().len(ast), 1);

    let extending = TypeReference::cast(ast, class.extending().get(ast).unwrap()).unwrap();
    assert_eq!(extending.type_name(ast), "Base");
    let names: Vec<String> = class
        .implementing()
        .raw(ast)
        .iter()
        .map(|id| TypeReference::cast(ast, *id).unwrap().type_name(ast))
        .collect();
    assert_eq!(names, ["X", "Y<T>"]);
}

#[test]
fn test_interface_extends_many() {
    let (result, root) = unit("interface I extends J, K<String> { void run(); int SIZE = 3; }");
    let ast = result.ast();
    let interface = InterfaceDeclaration::cast(ast, first_type(&result, root)).unwrap();
    assert_eq!(interface.extending().len(ast), 2);
    let body = NormalTypeBody::cast(ast, interface.body().get(ast).unwrap()).unwrap();
    assert_eq!(body.members().len(ast), 2);

    let method = body.members().first(ast).unwrap();
    let modifiers = MethodDeclaration::cast(ast, method)
        .and_then(|m| m.modifiers().get(ast))
        .and_then(|m| Modifiers::cast(ast, m))
        .unwrap();
    assert!(modifiers.explicit_flags(ast).is_empty());
    assert!(modifiers.effective_flags(ast).contains(ModifierFlags::ABSTRACT));
    assert!(modifiers.effective_flags(ast).contains(ModifierFlags::PUBLIC));
}

#[test]
fn test_class_members() {
    let text = "class A {\n\
                  private int x = 1, y;\n\
                  static { init(); }\n\
                  { count++; }\n\
                  A(int x) throws E { this.x = x; }\n\
                  <T> T get(Class<T> type) { return null; }\n\
                  abstract void run();\n\
                  class Inner {}\n\
                  ;\n\
                }";
    let (result, root) = unit(text);
    let ast = result.ast();
    let class = ClassDeclaration::cast(ast, first_type(&result, root)).unwrap();
    let body = NormalTypeBody::cast(ast, class.body().get(ast).unwrap()).unwrap();
    let kinds: Vec<NodeKind> = body.members().raw(ast).iter().map(|id| ast.kind(*id)).collect();
    assert_eq!(
        kinds,
        [
            NodeKind::VariableDeclaration,
            NodeKind::StaticInitializer,
            NodeKind::InstanceInitializer,
            NodeKind::ConstructorDeclaration,
            NodeKind::MethodDeclaration,
            NodeKind::MethodDeclaration,
            NodeKind::ClassDeclaration,
            NodeKind::EmptyDeclaration,
        ]
    );

    let members = body.members().raw(ast).to_vec();
    let constructor = ConstructorDeclaration::cast(ast, members[3]).unwrap();
    assert_eq!(name_of(ast, constructor.type_name().get(ast)), "A");
    assert_eq!(constructor.thrown_type_references().len(ast), 1);

    let generic = MethodDeclaration::cast(ast, members[4]).unwrap();
    assert_eq!(generic.type_variables().len(ast), 1);
    assert_eq!(text_of(&result, text, generic.id()), "<T> T get(Class<T> type) { return null; }");

    let abstract_method = MethodDeclaration::cast(ast, members[5]).unwrap();
    assert!(abstract_method.body().get(ast).is_none());
}

#[test]
fn test_trailing_method_dimensions_join_the_return_type() {
    let (result, root) = member("int values()[] { return null; }");
    let ast = result.ast();
    let method = MethodDeclaration::cast(ast, root).unwrap();
    let reference = TypeReference::cast(ast, method.return_type_reference().get(ast).unwrap()).unwrap();
    assert_eq!(reference.array_dimensions(ast), 1);
    assert_eq!(reference.type_name(ast), "int[]");
}

#[test]
fn test_varargs_parameter() {
    let (result, root) = member("void log(String format, Object... args) {}");
    let ast = result.ast();
    let method = MethodDeclaration::cast(ast, root).unwrap();
    let parameters = method.parameters().raw(ast).to_vec();
    assert_eq!(parameters.len(), 2);
    assert!(!VariableDefinition::cast(ast, parameters[0]).unwrap().is_varargs(ast));
    assert!(VariableDefinition::cast(ast, parameters[1]).unwrap().is_varargs(ast));
}

#[test]
fn test_wildcards() {
    let (result, root) = member("java.util.Map<? extends Number, ? super T> m;");
    let ast = result.ast();
    let reference = ast
        .descendants(root)
        .into_iter()
        .find(|id| ast.kind(*id) == NodeKind::TypeReference)
        .and_then(|id| TypeReference::cast(ast, id))
        .unwrap();
    assert_eq!(reference.type_name(ast), "java.util.Map<? extends Number, ? super T>");
}

// ============================================================================
// Enums and annotations
// ============================================================================

#[test]
fn test_enum_constants_and_members() {
    let text = "enum Planet { MERCURY(1), VENUS(2) { void f() {} }, EARTH; private final int order; }";
    let (result, root) = unit(text);
    let ast = result.ast();
    let declaration = EnumDeclaration::cast(ast, first_type(&result, root)).unwrap();
    let body = EnumTypeBody::cast(ast, declaration.body().get(ast).unwrap()).unwrap();
    assert_eq!(body.constants().len(ast), 3);
    assert_eq!(body.members().len(ast), 1);

    let venus = jast::ast::EnumConstant::cast(ast, body.constants().raw(ast)[1]).unwrap();
    assert_eq!(venus.arguments().len(ast), 1);
    assert!(venus.body().get(ast).is_some());

    let members = TypeDeclaration::cast(ast, declaration.id()).unwrap().members(ast).to_vec();
    assert_eq!(members.len(), 1);
}

#[test]
fn test_annotation_declaration() {
    let text = "@interface Config { String name() default \"x\"; int[] sizes() default {1, 2}; int LIMIT = 1; }";
    let (result, root) = unit(text);
    let ast = result.ast();
    let declaration = AnnotationDeclaration::cast(ast, first_type(&result, root)).unwrap();
    let body = NormalTypeBody::cast(ast, declaration.body().get(ast).unwrap()).unwrap();
    let members = body.members().raw(ast).to_vec();
    assert_eq!(members.len(), 3);

    let name = AnnotationMethodDeclaration::cast(ast, members[0]).unwrap();
    let default = name.default_value().get(ast).unwrap();
    assert_eq!(ast.kind(default), NodeKind::StringLiteral);
    let sizes = AnnotationMethodDeclaration::cast(ast, members[1]).unwrap();
    assert_eq!(ast.kind(sizes.default_value().get(ast).unwrap()), NodeKind::AnnotationValueArray);
    assert_eq!(ast.kind(members[2]), NodeKind::VariableDeclaration);
}

#[test]
fn test_annotation_usages() {
    let text = "@SuppressWarnings({\"unchecked\", \"rawtypes\"}) @Target(value = ElementType.TYPE, other = @Nested) class A {}";
    let (result, root) = unit(text);
    let ast = result.ast();
    let class = ClassDeclaration::cast(ast, first_type(&result, root)).unwrap();
    let modifiers = Modifiers::cast(ast, class.modifiers().get(ast).unwrap()).unwrap();
    let annotations = modifiers.annotations().raw(ast).to_vec();
    assert_eq!(annotations.len(), 2);

    let suppress = Annotation::cast(ast, annotations[0]).unwrap();
    assert_eq!(suppress.value_values(ast).len(), 2);

    let target = Annotation::cast(ast, annotations[1]).unwrap();
    assert_eq!(target.elements().len(ast), 2);
    let nested = target.values(ast, Some("other"));
    assert_eq!(nested.len(), 1);
    assert_eq!(ast.kind(nested[0]), NodeKind::Annotation);
    assert_eq!(target.value_values(ast).len(), 1);
}

#[test]
fn test_modifiers_keep_keyword_order() {
    let (result, root) = member("public static final int X = 1;");
    let ast = result.ast();
    let modifiers = ast
        .descendants(root)
        .into_iter()
        .find_map(|id| Modifiers::cast(ast, id))
        .unwrap();
    let flags = modifiers.explicit_flags(ast);
    assert!(flags.contains(ModifierFlags::PUBLIC | ModifierFlags::STATIC | ModifierFlags::FINAL));
    assert_eq!(modifiers.keywords().len(ast), 3);
}

// ============================================================================
// Member snippets and failures
// ============================================================================

#[test]
fn test_member_sequence() {
    let mut source = Source::new("int a; void f() {} class B {}", "members");
    let nodes = source.parse_member().to_vec();
    assert!(source.problems().is_empty());
    assert_eq!(nodes.len(), 3);
}

#[rstest]
#[case("class {}")]
#[case("class A extends {}")]
#[case("enum E { A B }")]
#[case("package a.b")]
#[case("import ;")]
#[case("class A { void f( {} }")]
fn test_declaration_problems(#[case] input: &str) {
    let result = parse_unit(input);
    assert!(!result.problems().is_empty(), "Expected a problem for: {}", input);
    assert_eq!(result.nodes().len(), 1);
}
