//! The closed set of node kinds.
//!
//! Every concrete kind is declared exactly once, in [`with_node_kinds!`]. The
//! table lists, per kind, its visitor method, the categories it belongs to
//! and its child slots in source order. Other modules feed the table to their
//! own generator macros (see `visitor.rs`), so adding a kind updates the
//! schema, the typed wrappers and the visitor together.
//!
//! ```text
//! with_node_kinds!(define_kinds)   → NodeKind, SlotSpec schema, typed wrappers
//! with_node_kinds!(define_visitor) → AstVisitor, exhaustive dispatch
//! ```

use crate::base::NodeId;

use super::Ast;
use super::slots::{ChildSlot, ListSlot};

// ============================================================================
// Schema types
// ============================================================================

/// Node categories. A kind may belong to several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Expression,
    Statement,
    TypeMember,
    TypeDeclaration,
    Literal,
    JavadocContainer,
    TypeBody,
    AnnotationValue,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Self::Expression => "Expression",
            Self::Statement => "Statement",
            Self::TypeMember => "TypeMember",
            Self::TypeDeclaration => "TypeDeclaration",
            Self::Literal => "Literal",
            Self::JavadocContainer => "JavadocContainer",
            Self::TypeBody => "TypeBody",
            Self::AnnotationValue => "AnnotationValue",
        }
    }
}

/// What a slot is allowed to hold in the strict view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expect {
    Category(Category),
    Kind(NodeKind),
}

impl Expect {
    /// Whether a node of `kind` satisfies this expectation.
    pub fn accepts(self, kind: NodeKind) -> bool {
        match self {
            // Every expression is also a legal annotation value.
            Self::Category(Category::AnnotationValue) => {
                kind.is(Category::AnnotationValue) || kind.is(Category::Expression)
            }
            Self::Category(category) => kind.is(category),
            Self::Kind(expected) => kind == expected,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Category(category) => category.name(),
            Self::Kind(kind) => kind.name(),
        }
    }
}

/// Static description of one child slot of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: &'static str,
    /// `true` for child lists, `false` for single children
    pub many: bool,
    pub expect: Expect,
    /// Single children only: absence is a syntax problem
    pub mandatory: bool,
}

/// Trait for typed wrappers around a [`NodeId`] of one kind.
pub trait AstNode: Copy {
    fn can_cast(kind: NodeKind) -> bool;
    fn cast(ast: &Ast, id: NodeId) -> Option<Self>;
    fn id(self) -> NodeId;
}

// ============================================================================
// The kind table
// ============================================================================

/// Invoke `$callback!` with the full node-kind table.
///
/// Row syntax: `Kind visit_method [Categories] { slot(index): one|many Expected [mandatory], ... }`
macro_rules! with_node_kinds {
    ($callback:ident) => {
        $callback! {
            // ---------------------------------------------------------------- statements
            Assert visit_assert [Statement] {
                assertion(0): one Expression mandatory,
                message(1): one Expression,
            }
            Catch visit_catch [] {
                exception_declaration(0): one VariableDefinition mandatory,
                body(1): one Block mandatory,
            }
            Block visit_block [Statement] {
                contents(0): many Statement,
            }
            DoWhile visit_do_while [Statement] {
                statement(0): one Statement mandatory,
                condition(1): one Expression mandatory,
            }
            While visit_while [Statement] {
                condition(0): one Expression mandatory,
                statement(1): one Statement mandatory,
            }
            For visit_for [Statement] {
                variable_declaration(0): one VariableDefinition,
                expression_inits(1): many Expression,
                condition(2): one Expression,
                updates(3): many Expression,
                statement(4): one Statement mandatory,
            }
            ForEach visit_for_each [Statement] {
                variable(0): one VariableDefinition mandatory,
                iterable(1): one Expression mandatory,
                statement(2): one Statement mandatory,
            }
            If visit_if [Statement] {
                condition(0): one Expression mandatory,
                statement(1): one Statement mandatory,
                else_statement(2): one Statement,
            }
            Synchronized visit_synchronized [Statement] {
                lock(0): one Expression mandatory,
                body(1): one Block mandatory,
            }
            Try visit_try [Statement] {
                body(0): one Block mandatory,
                catches(1): many Catch,
                finally(2): one Block,
            }
            EmptyStatement visit_empty_statement [Statement] {}
            LabelledStatement visit_labelled_statement [Statement] {
                label(0): one Identifier mandatory,
                statement(1): one Statement mandatory,
            }
            Switch visit_switch [Statement] {
                condition(0): one Expression mandatory,
                body(1): one Block mandatory,
            }
            Case visit_case [Statement] {
                condition(0): one Expression mandatory,
            }
            DefaultCase visit_default_case [Statement] {}
            Break visit_break [Statement] {
                label(0): one Identifier,
            }
            Continue visit_continue [Statement] {
                label(0): one Identifier,
            }
            Return visit_return [Statement] {
                value(0): one Expression,
            }
            Throw visit_throw [Statement] {
                throwable(0): one Expression mandatory,
            }
            ExpressionStatement visit_expression_statement [Statement] {
                expression(0): one Expression mandatory,
            }
            VariableDeclaration visit_variable_declaration [Statement, TypeMember, JavadocContainer] {
                javadoc(0): one Comment,
                definition(1): one VariableDefinition mandatory,
            }
            AlternateConstructorInvocation visit_alternate_constructor_invocation [Statement] {
                constructor_type_arguments(0): many TypeReference,
                arguments(1): many Expression,
            }
            SuperConstructorInvocation visit_super_constructor_invocation [Statement] {
                qualifier(0): one Expression,
                constructor_type_arguments(1): many TypeReference,
                arguments(2): many Expression,
            }

            // ---------------------------------------------------------------- annotations & modifiers
            Annotation visit_annotation [AnnotationValue] {
                annotation_type_reference(0): one TypeReference mandatory,
                elements(1): many AnnotationElement,
            }
            AnnotationElement visit_annotation_element [] {
                name(0): one Identifier,
                value(1): one AnnotationValue mandatory,
            }
            AnnotationValueArray visit_annotation_value_array [AnnotationValue] {
                values(0): many AnnotationValue,
            }
            Modifiers visit_modifiers [] {
                annotations(0): many Annotation,
                keywords(1): many KeywordModifier,
            }
            KeywordModifier visit_keyword_modifier [] {}

            // ---------------------------------------------------------------- variables
            VariableDefinition visit_variable_definition [] {
                modifiers(0): one Modifiers mandatory,
                type_reference(1): one TypeReference mandatory,
                variables(2): many VariableDefinitionEntry,
            }
            VariableDefinitionEntry visit_variable_definition_entry [] {
                name(0): one Identifier mandatory,
                initializer(1): one Expression,
            }

            // ---------------------------------------------------------------- expressions
            InlineIfExpression visit_inline_if_expression [Expression] {
                condition(0): one Expression mandatory,
                if_true(1): one Expression mandatory,
                if_false(2): one Expression mandatory,
            }
            VariableReference visit_variable_reference [Expression] {
                identifier(0): one Identifier mandatory,
            }
            Identifier visit_identifier [] {}
            BinaryExpression visit_binary_expression [Expression] {
                left(0): one Expression mandatory,
                right(1): one Expression mandatory,
            }
            UnaryExpression visit_unary_expression [Expression] {
                operand(0): one Expression mandatory,
            }
            Cast visit_cast [Expression] {
                type_reference(0): one TypeReference mandatory,
                operand(1): one Expression mandatory,
            }
            InstanceOf visit_instance_of [Expression] {
                object_reference(0): one Expression mandatory,
                type_reference(1): one TypeReference mandatory,
            }
            ConstructorInvocation visit_constructor_invocation [Expression] {
                qualifier(0): one Expression,
                constructor_type_arguments(1): many TypeReference,
                type_reference(2): one TypeReference mandatory,
                arguments(3): many Expression,
                anonymous_class_body(4): one NormalTypeBody,
            }
            MethodInvocation visit_method_invocation [Expression] {
                operand(0): one Expression,
                method_type_arguments(1): many TypeReference,
                name(2): one Identifier mandatory,
                arguments(3): many Expression,
            }
            Select visit_select [Expression] {
                operand(0): one Expression mandatory,
                identifier(1): one Identifier mandatory,
            }
            ArrayAccess visit_array_access [Expression] {
                operand(0): one Expression mandatory,
                index_expression(1): one Expression mandatory,
            }
            ArrayCreation visit_array_creation [Expression] {
                component_type_reference(0): one TypeReference mandatory,
                dimensions(1): many ArrayDimension,
                initializer(2): one ArrayInitializer,
            }
            ArrayDimension visit_array_dimension [] {
                dimension(0): one Expression,
            }
            ArrayInitializer visit_array_initializer [Expression] {
                expressions(0): many Expression,
            }
            This visit_this [Expression] {
                qualifier(0): one TypeReference,
            }
            Super visit_super [Expression] {
                qualifier(0): one TypeReference,
            }
            ClassLiteral visit_class_literal [Expression] {
                type_reference(0): one TypeReference mandatory,
            }
            BooleanLiteral visit_boolean_literal [Expression, Literal] {}
            CharLiteral visit_char_literal [Expression, Literal] {}
            StringLiteral visit_string_literal [Expression, Literal] {}
            IntegralLiteral visit_integral_literal [Expression, Literal] {}
            FloatingPointLiteral visit_floating_point_literal [Expression, Literal] {}
            NullLiteral visit_null_literal [Expression, Literal] {}

            // ---------------------------------------------------------------- types
            TypeVariable visit_type_variable [] {
                name(0): one Identifier mandatory,
                extending(1): many TypeReference,
            }
            TypeReference visit_type_reference [] {
                parts(0): many TypeReferencePart,
            }
            TypeReferencePart visit_type_reference_part [] {
                identifier(0): one Identifier mandatory,
                type_arguments(1): many TypeReference,
            }

            // ---------------------------------------------------------------- comments
            Comment visit_comment [] {}

            // ---------------------------------------------------------------- members & declarations
            AnnotationMethodDeclaration visit_annotation_method_declaration [TypeMember, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                return_type_reference(2): one TypeReference mandatory,
                method_name(3): one Identifier mandatory,
                default_value(4): one AnnotationValue,
            }
            MethodDeclaration visit_method_declaration [TypeMember, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                type_variables(2): many TypeVariable,
                return_type_reference(3): one TypeReference mandatory,
                method_name(4): one Identifier mandatory,
                parameters(5): many VariableDefinition,
                thrown_type_references(6): many TypeReference,
                body(7): one Block,
            }
            ConstructorDeclaration visit_constructor_declaration [TypeMember, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                type_variables(2): many TypeVariable,
                type_name(3): one Identifier mandatory,
                parameters(4): many VariableDefinition,
                thrown_type_references(5): many TypeReference,
                body(6): one Block mandatory,
            }
            InstanceInitializer visit_instance_initializer [TypeMember] {
                body(0): one Block mandatory,
            }
            StaticInitializer visit_static_initializer [TypeMember] {
                body(0): one Block mandatory,
            }
            NormalTypeBody visit_normal_type_body [TypeBody] {
                members(0): many TypeMember,
            }
            EnumTypeBody visit_enum_type_body [TypeBody] {
                constants(0): many EnumConstant,
                members(1): many TypeMember,
            }
            AnnotationDeclaration visit_annotation_declaration [TypeMember, Statement, TypeDeclaration, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                name(2): one Identifier mandatory,
                body(3): one NormalTypeBody mandatory,
            }
            EmptyDeclaration visit_empty_declaration [TypeMember, TypeDeclaration] {}
            ClassDeclaration visit_class_declaration [TypeMember, Statement, TypeDeclaration, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                name(2): one Identifier mandatory,
                type_variables(3): many TypeVariable,
                extending(4): one TypeReference,
                implementing(5): many TypeReference,
                body(6): one NormalTypeBody mandatory,
            }
            InterfaceDeclaration visit_interface_declaration [TypeMember, Statement, TypeDeclaration, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                name(2): one Identifier mandatory,
                type_variables(3): many TypeVariable,
                extending(4): many TypeReference,
                body(5): one NormalTypeBody mandatory,
            }
            EnumConstant visit_enum_constant [TypeMember, JavadocContainer] {
                javadoc(0): one Comment,
                annotations(1): many Annotation,
                name(2): one Identifier mandatory,
                arguments(3): many Expression,
                body(4): one NormalTypeBody,
            }
            EnumDeclaration visit_enum_declaration [TypeMember, Statement, TypeDeclaration, JavadocContainer] {
                javadoc(0): one Comment,
                modifiers(1): one Modifiers mandatory,
                name(2): one Identifier mandatory,
                implementing(3): many TypeReference,
                body(4): one EnumTypeBody mandatory,
            }

            // ---------------------------------------------------------------- compilation units
            PackageDeclaration visit_package_declaration [JavadocContainer] {
                javadoc(0): one Comment,
                annotations(1): many Annotation,
                parts(2): many Identifier,
            }
            ImportDeclaration visit_import_declaration [] {
                parts(0): many Identifier,
            }
            CompilationUnit visit_compilation_unit [] {
                package_declaration(0): one PackageDeclaration,
                import_declarations(1): many ImportDeclaration,
                type_declarations(2): many TypeDeclaration,
            }
        }
    };
}

// ============================================================================
// Generator: kinds, schema and typed wrappers
// ============================================================================

macro_rules! expect {
    (Expression) => {
        Expect::Category(Category::Expression)
    };
    (Statement) => {
        Expect::Category(Category::Statement)
    };
    (TypeMember) => {
        Expect::Category(Category::TypeMember)
    };
    (TypeDeclaration) => {
        Expect::Category(Category::TypeDeclaration)
    };
    (AnnotationValue) => {
        Expect::Category(Category::AnnotationValue)
    };
    ($kind:ident) => {
        Expect::Kind(NodeKind::$kind)
    };
}

macro_rules! is_many {
    (one) => {
        false
    };
    (many) => {
        true
    };
}

macro_rules! is_mandatory {
    () => {
        false
    };
    (mandatory) => {
        true
    };
}

macro_rules! slot_accessor {
    (one, $slot:ident, $idx:literal) => {
        #[doc = concat!("Handle to the `", stringify!($slot), "` child.")]
        pub fn $slot(self) -> ChildSlot {
            ChildSlot::new(self.0, $idx)
        }
    };
    (many, $slot:ident, $idx:literal) => {
        #[doc = concat!("Handle to the `", stringify!($slot), "` list.")]
        pub fn $slot(self) -> ListSlot {
            ListSlot::new(self.0, $idx)
        }
    };
}

macro_rules! define_kinds {
    (
        $(
            $kind:ident $visit:ident [$($cat:ident),*] {
                $( $slot:ident ($idx:literal) : $arity:ident $expect:ident $($mand:ident)? ),* $(,)?
            }
        )*
    ) => {
        /// Every concrete node kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }

            /// Child slots in source order.
            pub fn slots(self) -> &'static [SlotSpec] {
                match self {
                    $(NodeKind::$kind => &[
                        $(SlotSpec {
                            name: stringify!($slot),
                            many: is_many!($arity),
                            expect: expect!($expect),
                            mandatory: is_mandatory!($($mand)?),
                        },)*
                    ],)*
                }
            }

            pub fn categories(self) -> &'static [Category] {
                match self {
                    $(NodeKind::$kind => &[$(Category::$cat),*],)*
                }
            }
        }

        $(
            #[doc = concat!("Typed handle to a `", stringify!($kind), "` node.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $kind(pub(crate) NodeId);

            impl $kind {
                /// Allocate a new, parentless, unplaced node of this kind.
                pub fn create(ast: &mut Ast) -> Self {
                    Self(ast.alloc(NodeKind::$kind))
                }

                pub fn id(self) -> NodeId {
                    self.0
                }

                $( slot_accessor!($arity, $slot, $idx); )*
            }

            impl AstNode for $kind {
                fn can_cast(kind: NodeKind) -> bool {
                    kind == NodeKind::$kind
                }

                fn cast(ast: &Ast, id: NodeId) -> Option<Self> {
                    if Self::can_cast(ast.kind(id)) {
                        Some(Self(id))
                    } else {
                        None
                    }
                }

                fn id(self) -> NodeId {
                    self.0
                }
            }

            impl From<$kind> for NodeId {
                fn from(node: $kind) -> NodeId {
                    node.0
                }
            }
        )*
    };
}

with_node_kinds!(define_kinds);

impl NodeKind {
    pub fn is(self, category: Category) -> bool {
        self.categories().contains(&category)
    }

    pub fn is_expression(self) -> bool {
        self.is(Category::Expression)
    }

    pub fn is_statement(self) -> bool {
        self.is(Category::Statement)
    }

    /// Index of the slot called `name`, if this kind has one.
    pub fn slot_index(self, name: &str) -> Option<usize> {
        self.slots().iter().position(|spec| spec.name == name)
    }

    /// Index of the javadoc slot for javadoc containers.
    pub fn javadoc_slot(self) -> Option<usize> {
        if self.is(Category::JavadocContainer) {
            self.slot_index("javadoc")
        } else {
            None
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
