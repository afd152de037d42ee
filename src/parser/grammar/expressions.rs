//! Expression rules, loosest binding first.
//!
//! ```text
//! assignment → ternary (assignOp assignment)?            right-associative
//! ternary    → binary ('?' assignment ':' ternary)?
//! binary     → eleven left-associative levels, '||' down to '*'
//! unary      → prefixOp unary | '(' type ')' unary | postfix
//! postfix    → dotNew ('++' | '--')*
//! dotNew     → level1 ('.' 'new' typeArgs name typeArgs args body?)*
//! level1     → primary ('[' expr ']' | '.' typeArgs name args | '.' name)*
//! primary    → '(' expr ')' | literal | this | super | new ... | Type '.' (this|super|class) | name args?
//! ```
//!
//! Binary operator text is kept raw; `^^`, `===`, `!==` and `<<<` are
//! accepted here and reported by the syntax checks.

use crate::ast::{
    ArrayAccess, ArrayCreation, ArrayDimension, ArrayInitializer, BinaryExpression, Cast,
    ClassLiteral, ConstructorInvocation, InlineIfExpression, InstanceOf, MethodInvocation,
    NodeKind, Select, Super, This, TypeReference, TypeReferencePart, UnaryExpression,
    UnaryOperator, VariableReference,
};
use crate::base::{NodeId, Position};

use super::lexical::Operator;
use crate::parser::core::{Miss, PResult, Parser, Start};

const ASSIGNMENT: &[Operator] = &[
    ("=", true),
    ("*=", false),
    ("/=", false),
    ("+=", false),
    ("-=", false),
    ("%=", false),
    (">>>=", false),
    ("<<<=", false),
    ("<<=", false),
    (">>=", false),
    ("&=", false),
    ("^=", false),
    ("|=", false),
    ("&&=", false),
    ("^^=", false),
    ("||=", false),
];

/// Binary levels, loosest first.
const BINARY_LEVELS: &[&[Operator]] = &[
    &[("||", false)],
    &[("^^", false)],
    &[("&&", false)],
    &[("|", true)],
    &[("^", true)],
    &[("&", true)],
    &[("===", false), ("!==", false), ("==", false), ("!=", false)],
    &[("<=", false), (">=", false), ("<", true), (">", true)],
    &[(">>>", false), ("<<<", false), ("<<", false), (">>", false)],
    &[("+", true), ("-", true)],
    &[("*", false), ("/", true), ("%", false)],
];

/// Index of the relational level, which also takes a trailing `instanceof`.
const RELATIONAL_LEVEL: usize = 7;

const PREFIX: &[Operator] = &[
    ("++", false),
    ("--", false),
    ("!", false),
    ("~", false),
    ("+", true),
    ("-", true),
];

const INCREMENT: &[Operator] = &[("++", false), ("--", false)];

const SIGN: &[Operator] = &[("+", true), ("-", true)];

enum Prefix {
    Operator(UnaryOperator),
    Cast(NodeId),
}

enum Suffix {
    Index(NodeId),
    Call {
        type_arguments: Vec<NodeId>,
        name: NodeId,
        arguments: Vec<NodeId>,
    },
    Select(NodeId),
}

/// The pieces of a `new` expression after the keyword.
struct Instantiation {
    constructor_type_arguments: Vec<NodeId>,
    reference: NodeId,
    arguments: Vec<NodeId>,
    body: Option<NodeId>,
}

impl Parser<'_> {
    // =========================================================================
    // Assignment, conditional, binary
    // =========================================================================

    /// anyExpression = assignment
    pub(crate) fn expression(&mut self) -> PResult<NodeId> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let target = self.ternary()?;
        let tail = self.optional(|p| {
            let operator = p.operator(ASSIGNMENT)?;
            let value = p.expression()?;
            Ok((operator, value))
        })?;
        Ok(match tail {
            Some((operator, value)) => self.binary_node(start, target, operator, value),
            None => target,
        })
    }

    /// ternary = binary ('?' !('.' | ':' | '?') assignment ':' ternary)?
    pub(crate) fn ternary(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let condition = self.binary(0)?;
        let tail = self.optional(|p| {
            if !p.at("?") || p.rest()[1..].starts_with(['.', ':', '?']) {
                return Err(Miss::Soft);
            }
            p.punct("?")?;
            let if_true = p.expression()?;
            p.punct(":")?;
            let if_false = p.ternary()?;
            Ok((if_true, if_false))
        })?;
        let Some((if_true, if_false)) = tail else {
            return Ok(condition);
        };
        let node = InlineIfExpression::create(&mut self.ast);
        node.condition().put(&mut self.ast, Some(condition));
        node.if_true().put(&mut self.ast, Some(if_true));
        node.if_false().put(&mut self.ast, Some(if_false));
        Ok(self.finish_node(node.id(), start))
    }

    /// One left-associative binary level; past the last level, a unary expression.
    fn binary(&mut self, level: usize) -> PResult<NodeId> {
        let Some(operators) = BINARY_LEVELS.get(level) else {
            return self.unary();
        };
        let start = self.start();
        let mut left = self.binary(level + 1)?;
        while let Some((operator, right)) = self.optional(|p| {
            let operator = p.operator(operators)?;
            let right = p.binary(level + 1)?;
            Ok((operator, right))
        })? {
            left = self.binary_node(start, left, operator, right);
        }
        if level == RELATIONAL_LEVEL {
            if let Some(reference) = self.optional(|p| {
                p.keyword("instanceof")?;
                p.type_reference()
            })? {
                let node = InstanceOf::create(&mut self.ast);
                node.object_reference().put(&mut self.ast, Some(left));
                node.type_reference().put(&mut self.ast, Some(reference));
                left = self.finish_node(node.id(), start);
            }
        }
        Ok(left)
    }

    fn binary_node(&mut self, start: Start, left: NodeId, operator: &str, right: NodeId) -> NodeId {
        let node = BinaryExpression::create(&mut self.ast);
        node.set_raw_operator(&mut self.ast, operator);
        node.left().put(&mut self.ast, Some(left));
        node.right().put(&mut self.ast, Some(right));
        self.finish_node(node.id(), start)
    }

    // =========================================================================
    // Unary, cast, postfix
    // =========================================================================

    /// unary = (prefixOp | cast) unary | postfix
    fn unary(&mut self) -> PResult<NodeId> {
        match self.attempt(Self::prefixed) {
            Err(Miss::Soft) => self.postfix(),
            other => other,
        }
    }

    fn prefixed(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let prefix = self.prefix()?;
        let operand = self.nested(Self::unary)?;
        let id = match prefix {
            Prefix::Operator(operator) => {
                let node = UnaryExpression::create(&mut self.ast);
                node.set_operator(&mut self.ast, operator);
                node.operand().put(&mut self.ast, Some(operand));
                node.id()
            }
            Prefix::Cast(reference) => {
                let node = Cast::create(&mut self.ast);
                node.type_reference().put(&mut self.ast, Some(reference));
                node.operand().put(&mut self.ast, Some(operand));
                node.id()
            }
        };
        Ok(self.finish_node(id, start))
    }

    fn prefix(&mut self) -> PResult<Prefix> {
        let symbol = self.optional(|p| p.operator(PREFIX))?;
        if let Some(operator) = symbol.and_then(UnaryOperator::prefix) {
            return Ok(Prefix::Operator(operator));
        }
        self.punct("(")?;
        let reference = self.type_reference()?;
        self.punct(")")?;
        // `(a) + b` and `(a) - b` are arithmetic, not casts of `+b` / `-b`.
        if self.type_is_expression_like(reference) && self.test(|p| p.operator(SIGN)) {
            return Err(Miss::Soft);
        }
        Ok(Prefix::Cast(reference))
    }

    /// postfix = dotNew ('++' | '--')*
    fn postfix(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let operand = self.dot_new()?;
        self.postfix_operators(start, operand)
    }

    fn postfix_operators(&mut self, start: Start, mut operand: NodeId) -> PResult<NodeId> {
        while let Some(symbol) = self.optional(|p| p.operator(INCREMENT))? {
            let Some(operator) = UnaryOperator::postfix(symbol) else {
                break;
            };
            let node = UnaryExpression::create(&mut self.ast);
            node.set_operator(&mut self.ast, operator);
            node.operand().put(&mut self.ast, Some(operand));
            operand = self.finish_node(node.id(), start);
        }
        Ok(operand)
    }

    // =========================================================================
    // Chaining
    // =========================================================================

    /// dotNew = level1 ('.' 'new' typeArgs identifier typeArgs args typeBody?)*
    fn dot_new(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let mut current = self.level1()?;
        while let Some(tail) = self.optional(|p| {
            p.punct(".")?;
            p.keyword("new")?;
            p.instantiation(true)
        })? {
            let node = self.constructor_invocation(Some(current), tail);
            current = self.finish_node(node, start);
        }
        Ok(current)
    }

    /// level1 = primary (arrayAccess | methodCall | select)*
    pub(crate) fn level1(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let mut current = self.primary()?;
        loop {
            let suffix = if self.at("[") {
                self.optional(Self::index_suffix)?
            } else if self.at(".") {
                self.optional(Self::member_suffix)?
            } else {
                None
            };
            let Some(suffix) = suffix else {
                break;
            };
            let id = match suffix {
                Suffix::Index(index) => {
                    let node = ArrayAccess::create(&mut self.ast);
                    node.operand().put(&mut self.ast, Some(current));
                    node.index_expression().put(&mut self.ast, Some(index));
                    node.id()
                }
                Suffix::Call {
                    type_arguments,
                    name,
                    arguments,
                } => {
                    let node = MethodInvocation::create(&mut self.ast);
                    node.operand().put(&mut self.ast, Some(current));
                    node.method_type_arguments().push_all(&mut self.ast, type_arguments);
                    node.name().put(&mut self.ast, Some(name));
                    node.arguments().push_all(&mut self.ast, arguments);
                    node.id()
                }
                Suffix::Select(name) => {
                    let node = Select::create(&mut self.ast);
                    node.operand().put(&mut self.ast, Some(current));
                    node.identifier().put(&mut self.ast, Some(name));
                    node.id()
                }
            };
            current = self.finish_node(id, start);
        }
        Ok(current)
    }

    fn index_suffix(&mut self) -> PResult<Suffix> {
        self.punct("[")?;
        let index = self.expression()?;
        self.punct("]")?;
        Ok(Suffix::Index(index))
    }

    /// '.' typeArgs identifier args | '.' identifier !'('
    fn member_suffix(&mut self) -> PResult<Suffix> {
        self.punct(".")?;
        let call = self.attempt(|p| {
            let type_arguments = p.type_arguments()?;
            let name = p.identifier()?;
            let arguments = p.method_arguments()?;
            Ok(Suffix::Call {
                type_arguments,
                name,
                arguments,
            })
        });
        match call {
            Err(Miss::Soft) => {}
            other => return other,
        }
        let name = self.identifier()?;
        if self.at("(") {
            return Err(Miss::Soft);
        }
        Ok(Suffix::Select(name))
    }

    // =========================================================================
    // Primaries
    // =========================================================================

    fn primary(&mut self) -> PResult<NodeId> {
        self.summarize("expression", |p| {
            p.first_of(&[
                Self::parenthesized,
                Self::literal,
                Self::bare_this_or_super,
                Self::array_creation,
                Self::unqualified_new,
                Self::qualified_literal,
                Self::identifier_expression,
            ])
        })
    }

    /// '(' expression ')'; the parentheses are recorded on the inner expression.
    fn parenthesized(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("(")?;
        let inner = self.expression()?;
        self.punct(")")?;
        let end = self.start();
        self.ast.add_paren(inner, Position::new(start.pos, end.pos));
        self.claim(inner, start, end);
        Ok(inner)
    }

    /// ('this' | 'super') !'('
    fn bare_this_or_super(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let keyword = self.keyword_of(&["this", "super"])?;
        if self.at("(") {
            return Err(Miss::Soft);
        }
        let id = match keyword {
            "this" => This::create(&mut self.ast).id(),
            _ => Super::create(&mut self.ast).id(),
        };
        Ok(self.finish_node(id, start))
    }

    /// Type '.' ('this' !'(' | 'super' !'(' | 'class')
    ///
    /// `outer.super(...)` and `outer.this(...)` are constructor calls with a
    /// qualifier, which the statement grammar handles.
    fn qualified_literal(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let reference = self.type_reference()?;
        self.punct(".")?;
        let keyword = self.keyword_of(&["this", "super", "class"])?;
        if keyword != "class" && self.at("(") {
            return Err(Miss::Soft);
        }
        let id = match keyword {
            "this" => {
                let node = This::create(&mut self.ast);
                node.qualifier().put(&mut self.ast, Some(reference));
                node.id()
            }
            "super" => {
                let node = Super::create(&mut self.ast);
                node.qualifier().put(&mut self.ast, Some(reference));
                node.id()
            }
            _ => {
                let node = ClassLiteral::create(&mut self.ast);
                node.type_reference().put(&mut self.ast, Some(reference));
                node.id()
            }
        };
        Ok(self.finish_node(id, start))
    }

    /// identifier args?
    fn identifier_expression(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let name = self.identifier()?;
        let id = match self.optional(Self::method_arguments)? {
            Some(arguments) => {
                let node = MethodInvocation::create(&mut self.ast);
                node.name().put(&mut self.ast, Some(name));
                node.arguments().push_all(&mut self.ast, arguments);
                node.id()
            }
            None => {
                let node = VariableReference::create(&mut self.ast);
                node.identifier().put(&mut self.ast, Some(name));
                node.id()
            }
        };
        Ok(self.finish_node(id, start))
    }

    /// 'new' nonArrayType ('[' expression? ']')+ arrayInitializer?
    fn array_creation(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("new")?;
        let component = self.non_array_type()?;
        let dimensions = self.one_or_more(|p| {
            let start = p.start();
            p.punct("[")?;
            let size = p.optional(Self::expression)?;
            p.punct("]")?;
            let dimension = ArrayDimension::create(&mut p.ast);
            dimension.dimension().put(&mut p.ast, size);
            Ok(p.finish_node(dimension.id(), start))
        })?;
        let initializer = self.optional(Self::array_initializer)?;
        let node = ArrayCreation::create(&mut self.ast);
        node.component_type_reference().put(&mut self.ast, Some(component));
        node.dimensions().push_all(&mut self.ast, dimensions);
        node.initializer().put(&mut self.ast, initializer);
        Ok(self.finish_node(node.id(), start))
    }

    /// 'new' typeArgs type args typeBody?
    fn unqualified_new(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("new")?;
        let tail = self.instantiation(false)?;
        let node = self.constructor_invocation(None, tail);
        Ok(self.finish_node(node, start))
    }

    /// Everything after `new`. A qualified instantiation (`outer.new Inner()`)
    /// names a single simple type.
    fn instantiation(&mut self, qualified: bool) -> PResult<Instantiation> {
        let constructor_type_arguments = self.type_arguments()?;
        let reference = if qualified {
            let start = self.start();
            let name = self.identifier()?;
            let class_type_arguments = self.type_arguments()?;
            let part = TypeReferencePart::create(&mut self.ast);
            part.identifier().put(&mut self.ast, Some(name));
            part.type_arguments().push_all(&mut self.ast, class_type_arguments);
            self.finish_node(part.id(), start);
            let reference = TypeReference::create(&mut self.ast);
            reference.parts().push_all(&mut self.ast, [part.id()]);
            self.finish_node(reference.id(), start)
        } else {
            self.type_reference()?
        };
        let arguments = self.method_arguments()?;
        let body = self.optional(Self::type_body)?;
        Ok(Instantiation {
            constructor_type_arguments,
            reference,
            arguments,
            body,
        })
    }

    fn constructor_invocation(&mut self, qualifier: Option<NodeId>, tail: Instantiation) -> NodeId {
        let node = ConstructorInvocation::create(&mut self.ast);
        node.qualifier().put(&mut self.ast, qualifier);
        node.constructor_type_arguments()
            .push_all(&mut self.ast, tail.constructor_type_arguments);
        node.type_reference().put(&mut self.ast, Some(tail.reference));
        node.arguments().push_all(&mut self.ast, tail.arguments);
        node.anonymous_class_body().put(&mut self.ast, tail.body);
        node.id()
    }

    // =========================================================================
    // Argument lists and initializers
    // =========================================================================

    /// '(' (expression (',' expression)*)? ')', enforced after the '('.
    pub(crate) fn method_arguments(&mut self) -> PResult<Vec<NodeId>> {
        self.punct("(")?;
        let arguments = self.must(|p| p.optional(|p| p.comma_list(Self::expression)))?;
        self.must(|p| p.punct(")"))?;
        Ok(arguments.unwrap_or_default())
    }

    /// '{' ((arrayInitializer | expression) (',' ...)* ','?)? '}'
    pub(crate) fn array_initializer(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.punct("{")?;
        let items = self.optional(|p| {
            p.comma_list(|p| p.nested(|p| p.first_of(&[Self::array_initializer, Self::expression])))
        })?;
        self.optional(|p| p.punct(","))?;
        self.punct("}")?;
        let node = ArrayInitializer::create(&mut self.ast);
        node.expressions().push_all(&mut self.ast, items.unwrap_or_default());
        Ok(self.finish_node(node.id(), start))
    }

    // =========================================================================
    // Statement expressions
    // =========================================================================

    /// An expression allowed as a statement: an assignment, an increment or
    /// decrement, a method call or an instantiation.
    pub(crate) fn statement_expression(&mut self) -> PResult<NodeId> {
        let start = self.start();
        if self.at("++") || self.at("--") {
            let operators = self.one_or_more(|p| {
                let start = p.start();
                let symbol = p.operator(INCREMENT)?;
                Ok((start, symbol))
            })?;
            let mut operand = self.postfix()?;
            for (start, symbol) in operators.into_iter().rev() {
                let Some(operator) = UnaryOperator::prefix(symbol) else {
                    continue;
                };
                let node = UnaryExpression::create(&mut self.ast);
                node.set_operator(&mut self.ast, operator);
                node.operand().put(&mut self.ast, Some(operand));
                operand = self.finish_node(node.id(), start);
            }
            return Ok(operand);
        }

        let head = self.dot_new()?;
        let assignable = matches!(
            self.ast.kind(head),
            NodeKind::VariableReference | NodeKind::Select | NodeKind::ArrayAccess
        );
        if assignable {
            if let Some((operator, value)) = self.optional(|p| {
                let operator = p.operator(ASSIGNMENT)?;
                let value = p.expression()?;
                Ok((operator, value))
            })? {
                return Ok(self.binary_node(start, head, operator, value));
            }
        }
        if self.at("++") || self.at("--") {
            return self.postfix_operators(start, head);
        }
        match self.ast.kind(head) {
            NodeKind::MethodInvocation | NodeKind::ConstructorInvocation => Ok(head),
            _ => Err(self.expected_rule("statement")),
        }
    }
}
