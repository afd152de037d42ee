//! Building subtrees from parsed snippets.
//!
//! A [`Template`] owns a parentless copy of some subtree. Placeholders in it
//! are filled in strictly in the order they were registered:
//!
//! ```text
//! identifier          `name`          → another identifier (or nothing)
//! labelled empty stmt `label: ;`      → zero, one or many statements
//! variable reference  `name`          → an expression
//! ```
//!
//! [`Template::finish`] walks the copy, fills the placeholders and gives every
//! other node a zero-width generated position at the current location. The
//! location only moves when a replacement carries a span of its own, so the
//! result reads as if it had been written at one spot of a host source.
//!
//! ```ignore
//! let ast = &mut Ast::new();
//! let snippet = template::parse_statement(ast, "if (x != null) body: ;")?;
//! let built = Template::of(ast, snippet)
//!     .start_position(120)
//!     .replace_expression("x", argument)
//!     .replace_statements("body", statements)
//!     .finish(ast)?;
//! ```

use smol_str::SmolStr;
use tracing::debug;

use crate::ast::{
    Ast, AstNode, Category, ChildSlot, Identifier, LabelledStatement, ListSlot, NodeKind,
    VariableReference,
};
use crate::base::{AstException, NodeId, Position, UsageError};
use crate::parser::Source;

// ============================================================================
// Snippet parsing
// ============================================================================

/// Parse `text` with `parse` and copy the single resulting node into `ast`.
fn parse_one(
    ast: &mut Ast,
    text: &str,
    snippet: &str,
    name: &str,
    parse: fn(&mut Source) -> &[NodeId],
    accepts: fn(NodeKind) -> bool,
) -> Result<NodeId, AstException> {
    let mut source = Source::new(text, snippet);
    parse(&mut source);
    let result = source.into_result();
    if let Some(problem) = result.problems().first() {
        return Err(AstException::new(
            None,
            format!("Can't parse snippet: {}", problem.message),
        ));
    }
    let node = match result.nodes() {
        [] => {
            return Err(AstException::new(
                None,
                format!("Can't parse snippet: no {name} in snippet"),
            ));
        }
        [node] => *node,
        _ => {
            return Err(AstException::new(
                None,
                format!("Can't parse snippet: more than one {name} in snippet"),
            ));
        }
    };
    if !accepts(result.ast().kind(node)) {
        return Err(AstException::new(
            None,
            format!("Can't parse snippet: Not a {name}"),
        ));
    }
    Ok(ast.import(result.ast(), node))
}

/// Parse one type member: a field, method, constructor, initializer, type
/// declaration or lone `;`.
pub fn parse_member(ast: &mut Ast, text: &str) -> Result<NodeId, AstException> {
    parse_one(ast, text, "memberSnippet", "type member", Source::parse_member, |kind| {
        kind.is(Category::TypeMember)
    })
}

pub fn parse_method(ast: &mut Ast, text: &str) -> Result<NodeId, AstException> {
    parse_one(ast, text, "methodSnippet", "method", Source::parse_member, |kind| {
        kind == NodeKind::MethodDeclaration
    })
}

pub fn parse_field(ast: &mut Ast, text: &str) -> Result<NodeId, AstException> {
    parse_one(ast, text, "fieldSnippet", "field", Source::parse_member, |kind| {
        kind == NodeKind::VariableDeclaration
    })
}

pub fn parse_statement(ast: &mut Ast, text: &str) -> Result<NodeId, AstException> {
    parse_one(ast, text, "statementSnippet", "statement", Source::parse_statement, |kind| {
        kind.is(Category::Statement)
    })
}

pub fn parse_expression(ast: &mut Ast, text: &str) -> Result<NodeId, AstException> {
    parse_one(ast, text, "expressionSnippet", "expression", Source::parse_expression, |kind| {
        kind.is(Category::Expression)
    })
}

// ============================================================================
// Template
// ============================================================================

#[derive(Debug, Clone)]
enum Placeholder {
    Identifier(Option<SmolStr>),
    Statements(Vec<NodeId>),
    Expression(NodeId),
}

#[derive(Debug, Clone)]
struct Order {
    name: SmolStr,
    placeholder: Placeholder,
    position: Option<Position>,
}

/// A parentless subtree with placeholders waiting to be filled.
#[derive(Debug, Clone)]
pub struct Template {
    root: NodeId,
    location: usize,
    responsible: Option<NodeId>,
    orders: Vec<Order>,
    next: usize,
}

impl Template {
    /// Start a template from a copy of `source`; the original is never touched.
    pub fn of(ast: &mut Ast, source: NodeId) -> Self {
        Self {
            root: ast.copy(source),
            location: 0,
            responsible: None,
            orders: Vec::new(),
            next: 0,
        }
    }

    /// The offset generated positions are anchored at.
    pub fn start_position(mut self, location: usize) -> Self {
        self.location = location;
        self
    }

    /// The node generated positions point back to.
    pub fn responsible(mut self, node: NodeId) -> Self {
        self.responsible = Some(node);
        self
    }

    /// Replace the identifier `placeholder` with `replacement`, or drop it
    /// when `replacement` is `None`.
    pub fn replace_identifier(self, placeholder: &str, replacement: Option<&str>) -> Self {
        self.order(placeholder, Placeholder::Identifier(replacement.map(SmolStr::new)), None)
    }

    pub fn replace_identifier_at(self, placeholder: &str, replacement: Option<&str>, position: Position) -> Self {
        let placeholder_kind = Placeholder::Identifier(replacement.map(SmolStr::new));
        self.order(placeholder, placeholder_kind, Some(position))
    }

    /// Replace the statement `placeholder: ;` with `replacement`.
    pub fn replace_statement(self, placeholder: &str, replacement: NodeId) -> Self {
        self.order(placeholder, Placeholder::Statements(vec![replacement]), None)
    }

    /// Replace the statement `placeholder: ;` with any number of statements.
    /// More than one is only possible directly inside a block.
    pub fn replace_statements(self, placeholder: &str, replacements: Vec<NodeId>) -> Self {
        self.order(placeholder, Placeholder::Statements(replacements), None)
    }

    pub fn replace_statements_at(self, placeholder: &str, replacements: Vec<NodeId>, position: Position) -> Self {
        self.order(placeholder, Placeholder::Statements(replacements), Some(position))
    }

    /// Replace the variable reference `placeholder` with `replacement`.
    pub fn replace_expression(self, placeholder: &str, replacement: NodeId) -> Self {
        self.order(placeholder, Placeholder::Expression(replacement), None)
    }

    pub fn replace_expression_at(self, placeholder: &str, replacement: NodeId, position: Position) -> Self {
        self.order(placeholder, Placeholder::Expression(replacement), Some(position))
    }

    fn order(mut self, name: &str, placeholder: Placeholder, position: Option<Position>) -> Self {
        self.orders.push(Order {
            name: SmolStr::new(name),
            placeholder,
            position,
        });
        self
    }

    /// Fill every placeholder and position the tree. Returns the finished
    /// root, which is the template root unless that was itself replaced.
    pub fn finish(mut self, ast: &mut Ast) -> Result<NodeId, UsageError> {
        let root = self.root;
        self.walk(ast, root)?;
        if let Some(unused) = self.orders.get(self.next) {
            return Err(UsageError::template(format!(
                "placeholder '{}' was never used",
                unused.name
            )));
        }
        debug!(
            root = %self.root,
            placeholders = self.orders.len(),
            "template finished"
        );
        Ok(self.root)
    }

    fn current(&self) -> Option<&Order> {
        self.orders.get(self.next)
    }

    fn here(&self) -> Position {
        Position::generated(self.location, self.location, self.responsible)
    }

    fn walk(&mut self, ast: &mut Ast, id: NodeId) -> Result<(), UsageError> {
        if self.fill(ast, id)? {
            return Ok(());
        }
        let start = self.location;
        ast.set_position(id, self.here());
        let children: Vec<NodeId> = ast.children(id).collect();
        for child in children {
            self.walk(ast, child)?;
        }
        let span = Position::generated(start, self.location, self.responsible);
        ast.set_position(id, span);
        Ok(())
    }

    /// Fill the current placeholder if `id` is it. Returns whether it was.
    fn fill(&mut self, ast: &mut Ast, id: NodeId) -> Result<bool, UsageError> {
        let Some(order) = self.current().cloned() else {
            return Ok(false);
        };
        let matched = match (&order.placeholder, ast.kind(id)) {
            (Placeholder::Identifier(_), NodeKind::Identifier) => {
                Identifier::cast(ast, id).is_some_and(|n| n.value(ast) == order.name)
            }
            (Placeholder::Statements(_), NodeKind::LabelledStatement) => {
                LabelledStatement::cast(ast, id)
                    .and_then(|n| n.label().get(ast))
                    .and_then(|label| Identifier::cast(ast, label))
                    .is_some_and(|label| label.value(ast) == order.name)
            }
            (Placeholder::Expression(_), NodeKind::VariableReference) => {
                VariableReference::cast(ast, id)
                    .and_then(|n| n.identifier().get(ast))
                    .and_then(|name| Identifier::cast(ast, name))
                    .is_some_and(|name| name.value(ast) == order.name)
            }
            _ => false,
        };
        if !matched {
            return Ok(false);
        }

        match order.placeholder {
            Placeholder::Identifier(value) => {
                let (start, end) = order
                    .position
                    .map_or((self.location, self.location), |p| (p.start(), p.end()));
                let replacement = value.map(|value| {
                    let node = Identifier::of(ast, value).id();
                    ast.set_position(node, Position::generated(start, end, self.responsible));
                    node
                });
                self.substitute(ast, id, replacement)?;
                self.location = end;
            }
            Placeholder::Statements(replacements) => {
                self.fill_statements(ast, id, &replacements, order.position)?;
            }
            Placeholder::Expression(replacement) => {
                if !ast.is(replacement, Category::Expression) {
                    return Err(UsageError::WrongKind {
                        id: replacement,
                        expected: "Expression",
                    });
                }
                let (start, end) = self.span_for(ast, &[replacement], order.position);
                self.place(ast, replacement, start, end);
                self.substitute(ast, id, Some(replacement))?;
                self.location = end;
            }
        }
        self.next += 1;
        Ok(true)
    }

    fn fill_statements(
        &mut self,
        ast: &mut Ast,
        placeholder: NodeId,
        replacements: &[NodeId],
        position: Option<Position>,
    ) -> Result<(), UsageError> {
        let is_empty_statement = LabelledStatement::cast(ast, placeholder)
            .and_then(|n| n.statement().get(ast))
            .is_some_and(|s| ast.kind(s) == NodeKind::EmptyStatement);
        if !is_empty_statement {
            return Err(UsageError::template(
                "placeholder statements must be a labelled empty statement, as in \"label: ;\"",
            ));
        }
        if let Some(wrong) = replacements.iter().find(|r| !ast.is(**r, Category::Statement)) {
            return Err(UsageError::WrongKind {
                id: *wrong,
                expected: "Statement",
            });
        }
        let (start, end) = self.span_for(ast, replacements, position);

        match replacements {
            [] => {
                ast.detach(placeholder);
            }
            [single] => {
                self.place(ast, *single, start, end);
                self.substitute(ast, placeholder, Some(*single))?;
            }
            many => {
                let parent = ast
                    .parent(placeholder)
                    .filter(|p| ast.kind(*p) == NodeKind::Block)
                    .ok_or_else(|| {
                        UsageError::template(
                            "replacing one placeholder statement with several is only legal directly inside a block",
                        )
                    })?;
                let (index, _) = ast
                    .slot_of(parent, placeholder)
                    .ok_or(UsageError::NotAChild {
                        child: placeholder,
                        owner: parent,
                    })?;
                let contents = ListSlot::new(parent, index);
                let mut previous = placeholder;
                for statement in many {
                    contents.add_after(ast, previous, *statement)?;
                    previous = *statement;
                }
                contents.remove(ast, placeholder)?;
                for statement in many {
                    self.place(ast, *statement, start, end);
                }
            }
        }
        self.location = end;
        Ok(())
    }

    /// Where replacements go: the explicit position, or the span the
    /// replacements already have, or the current location.
    fn span_for(&self, ast: &Ast, replacements: &[NodeId], position: Option<Position>) -> (usize, usize) {
        if let Some(position) = position {
            return (position.start(), position.end());
        }
        let placed = |id: &NodeId| Some(ast.position(*id)).filter(|p| !p.is_unplaced());
        let start = replacements
            .first()
            .and_then(placed)
            .map_or(self.location, |p| p.start());
        let end = replacements
            .last()
            .and_then(placed)
            .map_or(self.location, |p| p.end());
        (start, end.max(start))
    }

    /// Give an unplaced replacement subtree a generated span.
    fn place(&self, ast: &mut Ast, replacement: NodeId, start: usize, end: usize) {
        if ast.position(replacement).is_unplaced() {
            let position = Position::generated(start, end, self.responsible);
            ast.set_all_positions(replacement, position);
        }
    }

    /// Put `replacement` where `old` sits. A replaced root becomes the new root.
    fn substitute(&mut self, ast: &mut Ast, old: NodeId, replacement: Option<NodeId>) -> Result<(), UsageError> {
        let Some(parent) = ast.parent(old) else {
            if old == self.root {
                self.root = replacement.ok_or_else(|| {
                    UsageError::template("the template root can't be replaced by nothing")
                })?;
            }
            return Ok(());
        };
        let Some((index, at)) = ast.slot_of(parent, old) else {
            return Err(UsageError::NotAChild { child: old, owner: parent });
        };
        match (at, replacement) {
            (None, replacement) => {
                ChildSlot::new(parent, index).set(ast, replacement)?;
            }
            (Some(_), Some(replacement)) => {
                ListSlot::new(parent, index).replace(ast, old, replacement)?;
            }
            (Some(_), None) => {
                ListSlot::new(parent, index).remove(ast, old)?;
            }
        }
        Ok(())
    }
}
