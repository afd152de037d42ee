//! Hand-written accessors layered over the generated typed wrappers.
//!
//! The wrappers from `kinds.rs` only know about child slots. Everything that
//! reads or writes a node's [`Props`], or derives something from its shape,
//! lives here.

use std::ops::{BitOr, BitOrAssign};

use smol_str::SmolStr;

use crate::base::constants::PRIMITIVE_TYPES;
use crate::base::{AstException, NodeId};

use super::kinds::*;
use super::operators::{BinaryOperator, UnaryOperator};
use super::props::{Props, WildcardKind};
use super::Ast;

// ============================================================================
// Identifiers & keywords
// ============================================================================

impl Identifier {
    pub fn value(self, ast: &Ast) -> &str {
        ast.props(self.0).text()
    }

    pub fn set_value(self, ast: &mut Ast, value: impl Into<SmolStr>) {
        *ast.props_mut(self.0) = Props::Text(value.into());
    }

    /// Allocate a detached identifier holding `value`.
    pub fn of(ast: &mut Ast, value: impl Into<SmolStr>) -> Self {
        let node = Self::create(ast);
        node.set_value(ast, value);
        node
    }
}

impl KeywordModifier {
    pub fn name(self, ast: &Ast) -> &str {
        ast.props(self.0).text()
    }

    pub fn set_name(self, ast: &mut Ast, name: impl Into<SmolStr>) {
        *ast.props_mut(self.0) = Props::Text(name.into());
    }

    pub fn of(ast: &mut Ast, name: impl Into<SmolStr>) -> Self {
        let node = Self::create(ast);
        node.set_name(ast, name);
        node
    }

    /// The flag this keyword sets, or empty for an unknown keyword.
    pub fn flag(self, ast: &Ast) -> ModifierFlags {
        ModifierFlags::from_keyword(self.name(ast)).unwrap_or_default()
    }
}

// ============================================================================
// Modifier flags
// ============================================================================

/// Keyword modifier bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierFlags(u16);

impl ModifierFlags {
    pub const PUBLIC: Self = Self(1);
    pub const PRIVATE: Self = Self(1 << 1);
    pub const PROTECTED: Self = Self(1 << 2);
    pub const STATIC: Self = Self(1 << 3);
    pub const FINAL: Self = Self(1 << 4);
    pub const SYNCHRONIZED: Self = Self(1 << 5);
    pub const VOLATILE: Self = Self(1 << 6);
    pub const TRANSIENT: Self = Self(1 << 7);
    pub const NATIVE: Self = Self(1 << 8);
    pub const ABSTRACT: Self = Self(1 << 10);
    pub const STRICTFP: Self = Self(1 << 11);

    pub const KEYWORDS: &'static [(&'static str, ModifierFlags)] = &[
        ("public", Self::PUBLIC),
        ("private", Self::PRIVATE),
        ("protected", Self::PROTECTED),
        ("static", Self::STATIC),
        ("final", Self::FINAL),
        ("synchronized", Self::SYNCHRONIZED),
        ("volatile", Self::VOLATILE),
        ("transient", Self::TRANSIENT),
        ("native", Self::NATIVE),
        ("abstract", Self::ABSTRACT),
        ("strictfp", Self::STRICTFP),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, flag)| *flag)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Keyword names of every set flag, in declaration order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        Self::KEYWORDS
            .iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
    }
}

impl BitOr for ModifierFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ============================================================================
// Modifiers
// ============================================================================

impl Modifiers {
    /// Flags of the keywords that are literally present.
    pub fn explicit_flags(self, ast: &Ast) -> ModifierFlags {
        self.keywords()
            .raw(ast)
            .iter()
            .filter_map(|id| KeywordModifier::cast(ast, *id))
            .fold(ModifierFlags::empty(), |acc, kw| acc | kw.flag(ast))
    }

    /// Explicit flags plus those implied by where the declaration sits.
    ///
    /// Interfaces, enums and annotations are static; top-level classes count
    /// as static; interface-like types are abstract; types nested in an
    /// interface are static; non-static interface methods are public and
    /// abstract; interface fields are public, static and final.
    pub fn effective_flags(self, ast: &Ast) -> ModifierFlags {
        let explicit = self.explicit_flags(ast);
        let mut out = explicit;
        let Some(declaration) = ast.parent(self.0) else {
            return out;
        };
        let kind = ast.kind(declaration);

        if kind.is(Category::TypeDeclaration) && kind != NodeKind::ClassDeclaration {
            out |= ModifierFlags::STATIC;
        }
        if kind == NodeKind::ClassDeclaration
            && ast
                .parent(declaration)
                .is_some_and(|p| ast.kind(p) == NodeKind::CompilationUnit)
        {
            out |= ModifierFlags::STATIC;
        }
        if is_interface_kind(kind) {
            out |= ModifierFlags::ABSTRACT;
        }

        match kind {
            NodeKind::ClassDeclaration
            | NodeKind::InterfaceDeclaration
            | NodeKind::EnumDeclaration
            | NodeKind::AnnotationDeclaration => {
                if enclosing_interface(ast, declaration) {
                    out |= ModifierFlags::STATIC;
                }
            }
            NodeKind::MethodDeclaration | NodeKind::AnnotationMethodDeclaration => {
                if enclosing_interface(ast, declaration) && !explicit.contains(ModifierFlags::STATIC) {
                    out |= ModifierFlags::PUBLIC | ModifierFlags::ABSTRACT;
                }
            }
            NodeKind::VariableDefinition => {
                let field = ast
                    .parent(declaration)
                    .filter(|p| ast.kind(*p) == NodeKind::VariableDeclaration);
                if field.is_some_and(|decl| enclosing_interface(ast, decl)) {
                    out |= ModifierFlags::PUBLIC | ModifierFlags::STATIC | ModifierFlags::FINAL;
                }
            }
            _ => {}
        }
        out
    }

    fn has(self, ast: &Ast, flag: ModifierFlags) -> bool {
        self.effective_flags(ast).contains(flag)
    }

    pub fn is_public(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::PUBLIC)
    }

    pub fn is_protected(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::PROTECTED)
    }

    pub fn is_private(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::PRIVATE)
    }

    pub fn is_package_private(self, ast: &Ast) -> bool {
        !self.effective_flags(ast).intersects(
            ModifierFlags::PUBLIC | ModifierFlags::PRIVATE | ModifierFlags::PROTECTED,
        )
    }

    pub fn is_static(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::STATIC)
    }

    pub fn is_final(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::FINAL)
    }

    pub fn is_abstract(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::ABSTRACT)
    }

    pub fn is_transient(self, ast: &Ast) -> bool {
        self.has(ast, ModifierFlags::TRANSIENT)
    }

    /// No keywords and no annotations.
    pub fn is_empty(self, ast: &Ast) -> bool {
        self.keywords().is_empty(ast) && self.annotations().is_empty(ast)
    }
}

fn is_interface_kind(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::InterfaceDeclaration | NodeKind::AnnotationDeclaration
    )
}

/// The type declaration whose body directly holds `member`.
pub(crate) fn enclosing_type(ast: &Ast, member: NodeId) -> Option<NodeId> {
    let body = ast.parent(member).filter(|b| ast.is(*b, Category::TypeBody))?;
    ast.parent(body).filter(|t| ast.is(*t, Category::TypeDeclaration))
}

fn enclosing_interface(ast: &Ast, member: NodeId) -> bool {
    enclosing_type(ast, member).is_some_and(|t| is_interface_kind(ast.kind(t)))
}

// ============================================================================
// Operators
// ============================================================================

impl BinaryExpression {
    /// Operator text as written, which may name no known operator.
    pub fn raw_operator(self, ast: &Ast) -> &str {
        ast.props(self.0).text()
    }

    pub fn set_raw_operator(self, ast: &mut Ast, raw: impl Into<SmolStr>) {
        *ast.props_mut(self.0) = Props::Text(raw.into());
    }

    pub fn operator(self, ast: &Ast) -> Result<BinaryOperator, AstException> {
        let raw = self.raw_operator(ast);
        BinaryOperator::from_symbol(raw.trim())
            .ok_or_else(|| AstException::on(self.0, format!("Unknown binary operator: {raw}")))
    }

    pub fn set_operator(self, ast: &mut Ast, operator: BinaryOperator) {
        self.set_raw_operator(ast, operator.symbol());
    }
}

impl UnaryExpression {
    pub fn operator(self, ast: &Ast) -> Option<UnaryOperator> {
        match ast.props(self.0) {
            Props::Unary(op) => *op,
            _ => None,
        }
    }

    pub fn set_operator(self, ast: &mut Ast, operator: UnaryOperator) {
        *ast.props_mut(self.0) = Props::Unary(Some(operator));
    }
}

/// Whether the expression at `id` may stand alone as a statement.
pub fn is_statement_expression(ast: &Ast, id: NodeId) -> bool {
    match ast.kind(id) {
        NodeKind::MethodInvocation | NodeKind::ConstructorInvocation => true,
        NodeKind::BinaryExpression => BinaryExpression(id)
            .operator(ast)
            .is_ok_and(BinaryOperator::is_assignment),
        NodeKind::UnaryExpression => matches!(
            UnaryExpression(id).operator(ast),
            Some(
                UnaryOperator::PrefixIncrement
                    | UnaryOperator::PrefixDecrement
                    | UnaryOperator::PostfixIncrement
                    | UnaryOperator::PostfixDecrement
            )
        ),
        _ => false,
    }
}

// ============================================================================
// Comments
// ============================================================================

impl Comment {
    pub fn is_block_comment(self, ast: &Ast) -> bool {
        matches!(ast.props(self.0), Props::Comment { block: true, .. })
    }

    /// Text between the delimiters (`/*`..`*/` or `//`..end of line).
    pub fn content(self, ast: &Ast) -> &str {
        match ast.props(self.0) {
            Props::Comment { content, .. } => content,
            _ => "",
        }
    }

    pub fn set(self, ast: &mut Ast, block: bool, content: impl Into<SmolStr>) {
        *ast.props_mut(self.0) = Props::Comment {
            block,
            content: content.into(),
        };
    }

    pub fn of(ast: &mut Ast, block: bool, content: impl Into<SmolStr>) -> Self {
        let node = Self::create(ast);
        node.set(ast, block, content);
        node
    }

    pub fn is_javadoc(self, ast: &Ast) -> bool {
        self.is_block_comment(ast) && self.content(ast).starts_with('*')
    }

    /// Javadoc carrying an `@deprecated` tag (case-insensitive).
    pub fn is_marked_deprecated(self, ast: &Ast) -> bool {
        if !self.is_javadoc(ast) {
            return false;
        }
        let content = self.content(ast).to_ascii_lowercase();
        let boundary = |c: char| c.is_whitespace() || matches!(c, '*' | '{' | '}');
        content.match_indices("@deprecated").any(|(at, tag)| {
            let before_ok = content[..at].chars().next_back().is_none_or(boundary);
            let after_ok = content[at + tag.len()..].chars().next().is_none_or(boundary);
            before_ok && after_ok
        })
    }
}

// ============================================================================
// Types
// ============================================================================

pub(crate) fn is_primitive_name(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

impl TypeReference {
    fn props(self, ast: &Ast) -> (WildcardKind, u32) {
        match ast.props(self.0) {
            Props::TypeReference {
                wildcard,
                dimensions,
            } => (*wildcard, *dimensions),
            _ => (WildcardKind::None, 0),
        }
    }

    pub fn wildcard(self, ast: &Ast) -> WildcardKind {
        self.props(ast).0
    }

    pub fn set_wildcard(self, ast: &mut Ast, wildcard: WildcardKind) {
        let dimensions = self.array_dimensions(ast);
        *ast.props_mut(self.0) = Props::TypeReference {
            wildcard,
            dimensions,
        };
    }

    pub fn array_dimensions(self, ast: &Ast) -> u32 {
        self.props(ast).1
    }

    pub fn set_array_dimensions(self, ast: &mut Ast, dimensions: u32) {
        let wildcard = self.wildcard(ast);
        *ast.props_mut(self.0) = Props::TypeReference {
            wildcard,
            dimensions,
        };
    }

    /// Name of the single part, if there is exactly one.
    fn sole_name(self, ast: &Ast) -> Option<&str> {
        match self.parts().raw(ast) {
            [part] => TypeReferencePart::cast(ast, *part)
                .and_then(|p| p.identifier().get(ast))
                .and_then(|id| Identifier::cast(ast, id))
                .map(|id| id.value(ast)),
            _ => None,
        }
    }

    pub fn is_primitive(self, ast: &Ast) -> bool {
        self.array_dimensions(ast) == 0 && self.sole_name(ast).is_some_and(is_primitive_name)
    }

    pub fn is_void(self, ast: &Ast) -> bool {
        self.sole_name(ast) == Some("void")
    }

    /// Dotted name with type arguments and `[]` per dimension, e.g.
    /// `java.util.Map<String, ? extends Number>[]`.
    pub fn type_name(self, ast: &Ast) -> String {
        let mut out = String::new();
        for part in self.parts().raw(ast) {
            if !out.is_empty() {
                out.push('.');
            }
            if let Some(part) = TypeReferencePart::cast(ast, *part) {
                out.push_str(&part.type_name(ast));
            }
        }
        for _ in 0..self.array_dimensions(ast) {
            out.push_str("[]");
        }
        out
    }

    /// Whether the last part carries type arguments.
    pub fn has_type_arguments(self, ast: &Ast) -> bool {
        self.parts()
            .last(ast)
            .and_then(|part| TypeReferencePart::cast(ast, part))
            .is_some_and(|part| !part.type_arguments().is_empty(ast))
    }

    /// Build a detached reference from a dotted name such as `java.lang.String`.
    pub fn from_name(ast: &mut Ast, name: &str) -> Self {
        let node = Self::create(ast);
        for segment in name.split('.') {
            let part = TypeReferencePart::create(ast);
            let ident = Identifier::of(ast, segment);
            ast.put(part.id(), 0, Some(ident.id()));
            ast.data_mut(ident.id()).parent = Some(part.id());
            ast.push(node.id(), 0, part.id());
            ast.data_mut(part.id()).parent = Some(node.id());
        }
        node
    }
}

impl TypeReferencePart {
    /// Identifier plus rendered type arguments.
    pub fn type_name(self, ast: &Ast) -> String {
        let mut out = self
            .identifier()
            .get(ast)
            .and_then(|id| Identifier::cast(ast, id))
            .map(|id| id.value(ast).to_owned())
            .unwrap_or_default();
        let args = self.type_arguments().raw(ast);
        if args.is_empty() {
            return out;
        }
        out.push('<');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let Some(arg) = TypeReference::cast(ast, *arg) else {
                continue;
            };
            match arg.wildcard(ast) {
                WildcardKind::Unbound => out.push('?'),
                WildcardKind::Extends => {
                    out.push_str("? extends ");
                    out.push_str(&arg.type_name(ast));
                }
                WildcardKind::Super => {
                    out.push_str("? super ");
                    out.push_str(&arg.type_name(ast));
                }
                WildcardKind::None => out.push_str(&arg.type_name(ast)),
            }
        }
        out.push('>');
        out
    }
}

impl TypeDeclaration {
    pub fn is_interface(self, ast: &Ast) -> bool {
        is_interface_kind(ast.kind(self.0))
    }
}

/// Any node in the `TypeDeclaration` category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDeclaration(NodeId);

impl AstNode for TypeDeclaration {
    fn can_cast(kind: NodeKind) -> bool {
        kind.is(Category::TypeDeclaration)
    }

    fn cast(ast: &Ast, id: NodeId) -> Option<Self> {
        Self::can_cast(ast.kind(id)).then_some(Self(id))
    }

    fn id(self) -> NodeId {
        self.0
    }
}

impl TypeDeclaration {
    /// The declared name, if the declaration has one.
    pub fn name(self, ast: &Ast) -> Option<&str> {
        let slot = ast.kind(self.0).slot_index("name")?;
        ast.child(self.0, slot)
            .and_then(|id| Identifier::cast(ast, id))
            .map(|id| id.value(ast))
    }

    pub fn modifiers(self, ast: &Ast) -> Option<Modifiers> {
        let slot = ast.kind(self.0).slot_index("modifiers")?;
        ast.child(self.0, slot).and_then(|id| Modifiers::cast(ast, id))
    }

    /// Members of the body, including an enum body's non-constant members.
    pub fn members(self, ast: &Ast) -> &[NodeId] {
        let Some(slot) = ast.kind(self.0).slot_index("body") else {
            return &[];
        };
        match ast.child(self.0, slot) {
            Some(body) if ast.kind(body) == NodeKind::NormalTypeBody => ast.list(body, 0),
            Some(body) if ast.kind(body) == NodeKind::EnumTypeBody => ast.list(body, 1),
            _ => &[],
        }
    }
}

// ============================================================================
// Variables
// ============================================================================

impl VariableDefinition {
    pub fn is_varargs(self, ast: &Ast) -> bool {
        matches!(ast.props(self.0), Props::Varargs(true))
    }

    pub fn set_varargs(self, ast: &mut Ast, varargs: bool) {
        *ast.props_mut(self.0) = Props::Varargs(varargs);
    }
}

impl VariableDefinitionEntry {
    /// Extra dimensions written after the name, as in `int x[]`.
    pub fn array_dimensions(self, ast: &Ast) -> u32 {
        match ast.props(self.0) {
            Props::Dimensions(n) => *n,
            _ => 0,
        }
    }

    pub fn set_array_dimensions(self, ast: &mut Ast, dimensions: u32) {
        *ast.props_mut(self.0) = Props::Dimensions(dimensions);
    }

    /// Total dimensions of this variable's type: the declared type's, plus
    /// this entry's own, plus one for varargs.
    pub fn effective_dimensions(self, ast: &Ast) -> Result<u32, AstException> {
        let definition = ast
            .parent(self.0)
            .and_then(|p| VariableDefinition::cast(ast, p))
            .ok_or_else(|| {
                AstException::on(
                    self.0,
                    "Cannot calculate type reference of a VariableDefinitionEntry without a VariableDefinition as parent",
                )
            })?;
        let declared = definition
            .type_reference()
            .get(ast)
            .and_then(|t| TypeReference::cast(ast, t))
            .map_or(0, |t| t.array_dimensions(ast));
        Ok(declared + self.array_dimensions(ast) + u32::from(definition.is_varargs(ast)))
    }
}

// ============================================================================
// Compilation units
// ============================================================================

fn dotted(ast: &Ast, parts: &[NodeId]) -> String {
    parts
        .iter()
        .filter_map(|id| Identifier::cast(ast, *id))
        .map(|id| id.value(ast))
        .collect::<Vec<_>>()
        .join(".")
}

impl PackageDeclaration {
    pub fn package_name(self, ast: &Ast) -> String {
        dotted(ast, self.parts().raw(ast))
    }
}

impl ImportDeclaration {
    fn flags(self, ast: &Ast) -> (bool, bool) {
        match ast.props(self.0) {
            Props::Import { is_static, is_star } => (*is_static, *is_star),
            _ => (false, false),
        }
    }

    pub fn is_static_import(self, ast: &Ast) -> bool {
        self.flags(ast).0
    }

    pub fn is_star_import(self, ast: &Ast) -> bool {
        self.flags(ast).1
    }

    pub fn set_static_import(self, ast: &mut Ast, is_static: bool) {
        let is_star = self.is_star_import(ast);
        *ast.props_mut(self.0) = Props::Import { is_static, is_star };
    }

    pub fn set_star_import(self, ast: &mut Ast, is_star: bool) {
        let is_static = self.is_static_import(ast);
        *ast.props_mut(self.0) = Props::Import { is_static, is_star };
    }

    /// Dotted name, with a trailing `.*` for star imports.
    pub fn as_fully_qualified_name(self, ast: &Ast) -> String {
        let mut out = dotted(ast, self.parts().raw(ast));
        if self.is_star_import(ast) {
            out.push_str(".*");
        }
        out
    }
}

// ============================================================================
// Annotations
// ============================================================================

impl Annotation {
    /// Values of the element named `key`, or of the unnamed element when
    /// `key` is `None`. Array values are flattened one level.
    pub fn values(self, ast: &Ast, key: Option<&str>) -> Vec<NodeId> {
        for element in self.elements().raw(ast) {
            let Some(element) = AnnotationElement::cast(ast, *element) else {
                continue;
            };
            let name = element
                .name()
                .get(ast)
                .and_then(|id| Identifier::cast(ast, id))
                .map(|id| id.value(ast));
            if name == key {
                return element.values(ast);
            }
        }
        Vec::new()
    }

    /// Values of the unnamed element, falling back to the one named `value`.
    pub fn value_values(self, ast: &Ast) -> Vec<NodeId> {
        let unnamed = self.values(ast, None);
        if unnamed.is_empty() {
            self.values(ast, Some("value"))
        } else {
            unnamed
        }
    }
}

impl AnnotationElement {
    pub fn values(self, ast: &Ast) -> Vec<NodeId> {
        match self.value().get(ast) {
            None => Vec::new(),
            Some(v) if ast.kind(v) == NodeKind::AnnotationValueArray => ast.list(v, 0).to_vec(),
            Some(v) => vec![v],
        }
    }
}
