//! Operator tables.
//!
//! Precedence levels run from 1 (binds tightest) upward; all assignment
//! operators share the loosest level.

/// Binary and assignment operators recognized by [`BinaryOperator::from_symbol`].
///
/// The grammar also tolerates `^^`, `===`, `!==`, `<<<` and a few assignment
/// forms that do not exist in the language; those are kept as raw text on the
/// node and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    PlusAssign,
    MinusAssign,
    MultiplyAssign,
    DivideAssign,
    RemainderAssign,
    AndAssign,
    XorAssign,
    OrAssign,
    ShiftLeftAssign,
    ShiftRightAssign,
    BitwiseShiftRightAssign,
    Assign,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equals,
    NotEquals,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    ShiftLeft,
    ShiftRight,
    BitwiseShiftRight,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryOperator {
    pub const ALL: &'static [BinaryOperator] = &[
        Self::PlusAssign,
        Self::MinusAssign,
        Self::MultiplyAssign,
        Self::DivideAssign,
        Self::RemainderAssign,
        Self::AndAssign,
        Self::XorAssign,
        Self::OrAssign,
        Self::ShiftLeftAssign,
        Self::ShiftRightAssign,
        Self::BitwiseShiftRightAssign,
        Self::Assign,
        Self::LogicalOr,
        Self::LogicalAnd,
        Self::BitwiseOr,
        Self::BitwiseXor,
        Self::BitwiseAnd,
        Self::Equals,
        Self::NotEquals,
        Self::Greater,
        Self::GreaterOrEqual,
        Self::Less,
        Self::LessOrEqual,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::BitwiseShiftRight,
        Self::Plus,
        Self::Minus,
        Self::Multiply,
        Self::Divide,
        Self::Remainder,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::MultiplyAssign => "*=",
            Self::DivideAssign => "/=",
            Self::RemainderAssign => "%=",
            Self::AndAssign => "&=",
            Self::XorAssign => "^=",
            Self::OrAssign => "|=",
            Self::ShiftLeftAssign => "<<=",
            Self::ShiftRightAssign => ">>=",
            Self::BitwiseShiftRightAssign => ">>>=",
            Self::Assign => "=",
            Self::LogicalOr => "||",
            Self::LogicalAnd => "&&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::BitwiseAnd => "&",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::BitwiseShiftRight => ">>>",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.symbol() == symbol)
    }

    /// Precedence level; larger binds looser.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Multiply | Self::Divide | Self::Remainder => 3,
            Self::Plus | Self::Minus => 4,
            Self::ShiftLeft | Self::ShiftRight | Self::BitwiseShiftRight => 5,
            Self::Greater | Self::GreaterOrEqual | Self::Less | Self::LessOrEqual => 6,
            Self::Equals | Self::NotEquals => 7,
            Self::BitwiseAnd => 8,
            Self::BitwiseXor => 9,
            Self::BitwiseOr => 10,
            Self::LogicalAnd => 11,
            Self::LogicalOr => 12,
            _ => 14,
        }
    }

    pub fn is_assignment(self) -> bool {
        self.precedence() == Self::Assign.precedence()
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix and postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    BinaryNot,
    LogicalNot,
    UnaryPlus,
    UnaryMinus,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::BinaryNot => "~",
            Self::LogicalNot => "!",
            Self::UnaryPlus => "+",
            Self::UnaryMinus => "-",
            Self::PrefixIncrement | Self::PostfixIncrement => "++",
            Self::PrefixDecrement | Self::PostfixDecrement => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, Self::PostfixIncrement | Self::PostfixDecrement)
    }

    /// Look up a prefix operator by symbol.
    pub fn prefix(symbol: &str) -> Option<Self> {
        match symbol {
            "~" => Some(Self::BinaryNot),
            "!" => Some(Self::LogicalNot),
            "+" => Some(Self::UnaryPlus),
            "-" => Some(Self::UnaryMinus),
            "++" => Some(Self::PrefixIncrement),
            "--" => Some(Self::PrefixDecrement),
            _ => None,
        }
    }

    /// Look up a postfix operator by symbol.
    pub fn postfix(symbol: &str) -> Option<Self> {
        match symbol {
            "++" => Some(Self::PostfixIncrement),
            "--" => Some(Self::PostfixDecrement),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        if self.is_postfix() { 1 } else { 2 }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
