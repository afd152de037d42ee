//! Per-node properties that are not child nodes.

use smol_str::SmolStr;

use super::NodeKind;
use super::operators::UnaryOperator;

/// Wildcard form of a type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WildcardKind {
    #[default]
    None,
    /// `?`
    Unbound,
    /// `? extends T`
    Extends,
    /// `? super T`
    Super,
}

/// Non-child data carried by a node.
///
/// Which variant a node holds is fixed by its kind; see [`Props::default_for`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Props {
    #[default]
    None,
    /// Identifier value, keyword-modifier name, literal raw text or binary operator raw text
    Text(SmolStr),
    Unary(Option<UnaryOperator>),
    Comment { block: bool, content: SmolStr },
    TypeReference { wildcard: WildcardKind, dimensions: u32 },
    /// `VariableDefinition` varargs flag
    Varargs(bool),
    /// `VariableDefinitionEntry` extra array dimensions (`int x[]`)
    Dimensions(u32),
    Import { is_static: bool, is_star: bool },
}

impl Props {
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Identifier
            | NodeKind::KeywordModifier
            | NodeKind::BinaryExpression
            | NodeKind::BooleanLiteral
            | NodeKind::CharLiteral
            | NodeKind::StringLiteral
            | NodeKind::IntegralLiteral
            | NodeKind::FloatingPointLiteral
            | NodeKind::NullLiteral => Self::Text(SmolStr::default()),
            NodeKind::UnaryExpression => Self::Unary(None),
            NodeKind::Comment => Self::Comment {
                block: false,
                content: SmolStr::default(),
            },
            NodeKind::TypeReference => Self::TypeReference {
                wildcard: WildcardKind::None,
                dimensions: 0,
            },
            NodeKind::VariableDefinition => Self::Varargs(false),
            NodeKind::VariableDefinitionEntry => Self::Dimensions(0),
            NodeKind::ImportDeclaration => Self::Import {
                is_static: false,
                is_star: false,
            },
            _ => Self::None,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            _ => "",
        }
    }
}
