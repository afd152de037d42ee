//! Literal values.
//!
//! Literal nodes store their raw source text. Values are decoded only when
//! read, so a literal that parses but cannot be represented (e.g. an `int`
//! above 2^31) is only an error for the caller that asks for its value.

use smol_str::SmolStr;

use crate::base::AstException;

use super::kinds::{
    AstNode, BooleanLiteral, CharLiteral, FloatingPointLiteral, IntegralLiteral, NullLiteral,
    StringLiteral, UnaryExpression,
};
use super::operators::UnaryOperator;
use super::{Ast, NodeKind, Props};

const NEGATIVE_NUMBERS_NOT_POSSIBLE: &str =
    "Negative integral literals don't exist; wrap in a UnaryExpression with operator MINUS";

/// A decoded integral literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegralValue {
    /// Value as an unsigned bit pattern (`2^31` and `2^63` are representable)
    pub magnitude: u64,
    pub is_long: bool,
    pub radix: u32,
}

impl IntegralValue {
    pub fn as_i32(self) -> i32 {
        self.magnitude as u32 as i32
    }

    pub fn as_i64(self) -> i64 {
        if self.is_long {
            self.magnitude as i64
        } else {
            self.as_i32() as i64
        }
    }
}

/// A decoded floating point literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatValue {
    Float(f32),
    Double(f64),
}

impl FloatValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Float(v) => v as f64,
            Self::Double(v) => v,
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode integral raw text. `in_unary_minus` allows the one magnitude
/// (`2^31`, or `2^63` for longs) that only exists as a negated literal.
pub(crate) fn decode_integral(raw: &str, in_unary_minus: bool) -> Result<IntegralValue, String> {
    let v = raw.trim();
    if v.starts_with('-') {
        return Err(NEGATIVE_NUMBERS_NOT_POSSIBLE.to_string());
    }
    let is_long = v.ends_with('L') || v.ends_with('l');
    let digits = if is_long { &v[..v.len() - 1] } else { v };
    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if body.is_empty() || body.contains(['_', '+', '-']) {
        return Err(format!("Not a valid integral literal: {v}"));
    }
    let value = u128::from_str_radix(body, radix)
        .map_err(|_| format!("Not a valid integral literal: {v}"))?;

    let too_large = || {
        if is_long {
            format!("Long literal too large: {raw}")
        } else {
            format!("Int literal too large: {raw}")
        }
    };
    let (unsigned_limit, signed_limit) = if is_long {
        (u64::MAX as u128, i64::MAX as u128)
    } else {
        (u32::MAX as u128, i32::MAX as u128)
    };
    if radix == 10 {
        if value > signed_limit + 1 || (value == signed_limit + 1 && !in_unary_minus) {
            return Err(too_large());
        }
    } else if value > unsigned_limit {
        return Err(too_large());
    }
    Ok(IntegralValue {
        magnitude: value as u64,
        is_long,
        radix,
    })
}

pub(crate) fn decode_float(raw: &str) -> Result<FloatValue, String> {
    let v = raw.trim();
    let is_float = v.ends_with('f') || v.ends_with('F');
    let body = if is_float || v.ends_with('d') || v.ends_with('D') {
        &v[..v.len() - 1]
    } else {
        v
    };
    if body.starts_with('-') {
        return Err(format!(
            "Floating Point literals can't start with -; wrap them in a UnaryExpression: {body}"
        ));
    }
    let invalid = || format!("Not a valid floating point literal: {body}");
    let hex = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"));
    let value = if let Some(hex) = hex {
        decode_hex_float(hex).ok_or_else(invalid)?
    } else {
        let digits_only = body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
        if !digits_only || !body.chars().any(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        body.parse::<f64>().map_err(|_| invalid())?
    };
    if is_float {
        let narrowed = match hex {
            Some(_) => value as f32,
            None => body.parse::<f32>().map_err(|_| invalid())?,
        };
        if narrowed.is_infinite() {
            return Err(invalid());
        }
        Ok(FloatValue::Float(narrowed))
    } else if value.is_infinite() {
        Err(invalid())
    } else {
        Ok(FloatValue::Double(value))
    }
}

/// `1.8p3` style mantissa/exponent, without the `0x` prefix.
fn decode_hex_float(hex: &str) -> Option<f64> {
    let (mantissa, exponent) = hex.split_once(['p', 'P'])?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in whole.chars() {
        value = value * 16.0 + c.to_digit(16)? as f64;
    }
    let mut scale = 1.0 / 16.0;
    for c in fraction.chars() {
        value += c.to_digit(16)? as f64 * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

fn from_escape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{8}'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'f' => Some('\u{c}'),
        'r' => Some('\r'),
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        _ => None,
    }
}

pub(crate) fn decode_char(raw: &str) -> Result<char, String> {
    let v = raw.trim();
    let content = v
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .filter(|_| v.len() >= 2)
        .ok_or_else(|| format!("Character literals should be enclosed in single quotes: {v}"))?;
    let mut chars = content.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err("Empty character literal not allowed".to_string()),
        (Some('\\'), None) => Err("Incomplete backslash escape: '\\'".to_string()),
        (Some('\\'), Some(x)) => {
            let rest: String = chars.collect();
            if let Some(c) = from_escape(x).filter(|_| rest.is_empty()) {
                return Ok(c);
            }
            if x.is_digit(8) {
                let octal = format!("{x}{rest}");
                if let Ok(code) = u32::from_str_radix(&octal, 8) {
                    if code <= 0o377 {
                        if let Some(c) = char::from_u32(code) {
                            return Ok(c);
                        }
                    }
                }
            }
            Err(format!("Not a valid character literal: {v}"))
        }
        (Some(x), None) if !matches!(x, '\'' | '\n' | '\r') => Ok(x),
        _ => Err(format!("Not a valid character literal: {v}")),
    }
}

pub(crate) fn decode_string(raw: &str) -> Result<String, String> {
    let v = raw.trim();
    let content = v
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .filter(|_| v.len() >= 2)
        .ok_or_else(|| format!("String literals should be enclosed in double quotes: {v}"))?;
    let cs: Vec<char> = content.chars().collect();
    let mut value = String::with_capacity(content.len());
    let mut i = 0;
    while i < cs.len() {
        let c = cs[i];
        match c {
            '\n' | '\r' => return Err(format!("newlines not allowed in string literal: {v}")),
            '"' => {
                return Err(format!(
                    "unescaped double quotes not allowed in string literal: {v}"
                ));
            }
            '\\' => {
                let Some(&x) = cs.get(i + 1) else {
                    return Err(format!("Incomplete backslash escape: {v}"));
                };
                i += 2;
                if let Some(decoded) = from_escape(x) {
                    value.push(decoded);
                    continue;
                }
                let Some(first) = x.to_digit(8) else {
                    return Err(format!(
                        "Invalid string literal (invalid backslash escape): {v}"
                    ));
                };
                // Up to three octal digits, the first of which must be 0-3 for three.
                let max_len = if first > 3 { 2 } else { 3 };
                let mut code = first;
                let mut len = 1;
                while len < max_len {
                    match cs.get(i).and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            i += 1;
                            len += 1;
                        }
                        None => break,
                    }
                }
                value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            other => {
                value.push(other);
                i += 1;
            }
        }
    }
    Ok(value)
}

fn to_escape(c: char, for_char_literal: bool, next: char) -> String {
    match c {
        '\'' => if for_char_literal { "\\'" } else { "'" }.to_string(),
        '"' => if for_char_literal { "\"" } else { "\\\"" }.to_string(),
        '\u{8}' => "\\b".to_string(),
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        '\u{c}' => "\\f".to_string(),
        '\r' => "\\r".to_string(),
        '\\' => "\\\\".to_string(),
        c if (c as u32) < 0x20 || c as u32 == 127 => {
            let octal = format!("{:o}", c as u32);
            if next.is_digit(8) {
                format!("\\{octal:0>3}")
            } else {
                format!("\\{octal}")
            }
        }
        c => c.to_string(),
    }
}

pub(crate) fn encode_char(c: char) -> String {
    format!("'{}'", to_escape(c, true, 'a'))
}

pub(crate) fn encode_string(s: &str) -> String {
    let cs: Vec<char> = s.chars().collect();
    let mut raw = String::with_capacity(s.len() + 2);
    raw.push('"');
    for (i, c) in cs.iter().enumerate() {
        let next = cs.get(i + 1).copied().unwrap_or('a');
        raw.push_str(&to_escape(*c, false, next));
    }
    raw.push('"');
    raw
}

// ============================================================================
// Typed accessors
// ============================================================================

fn raw_of(ast: &Ast, id: crate::base::NodeId) -> &str {
    ast.props(id).text()
}

fn set_raw(ast: &mut Ast, id: crate::base::NodeId, raw: impl Into<SmolStr>) {
    *ast.props_mut(id) = Props::Text(raw.into());
}

macro_rules! raw_value_methods {
    ($($kind:ident),*) => {
        $(
            impl $kind {
                /// Raw source text of this literal.
                pub fn raw_value(self, ast: &Ast) -> &str {
                    raw_of(ast, self.id())
                }

                pub fn set_raw_value(self, ast: &mut Ast, raw: impl Into<SmolStr>) {
                    set_raw(ast, self.id(), raw);
                }
            }
        )*
    };
}

raw_value_methods!(
    IntegralLiteral,
    FloatingPointLiteral,
    BooleanLiteral,
    CharLiteral,
    StringLiteral,
    NullLiteral
);

impl IntegralLiteral {
    /// Whether this literal is the direct, unparenthesized operand of a unary minus.
    fn in_unary_minus(self, ast: &Ast) -> bool {
        ast.paren_count(self.id()) == 0
            && ast
                .parent(self.id())
                .and_then(|parent| UnaryExpression::cast(ast, parent))
                .is_some_and(|unary| unary.operator(ast) == Some(UnaryOperator::UnaryMinus))
    }

    pub fn value(self, ast: &Ast) -> Result<IntegralValue, AstException> {
        decode_integral(self.raw_value(ast), self.in_unary_minus(ast))
            .map_err(|message| AstException::on(self.id(), message))
    }

    pub fn is_long(self, ast: &Ast) -> bool {
        let raw = self.raw_value(ast).trim_end();
        raw.ends_with('L') || raw.ends_with('l')
    }

    pub fn int_value(self, ast: &Ast) -> Result<i32, AstException> {
        let value = self.value(ast)?;
        if value.is_long {
            return Err(AstException::on(self.id(), "This is a long literal, not an int"));
        }
        Ok(value.as_i32())
    }

    pub fn long_value(self, ast: &Ast) -> Result<i64, AstException> {
        Ok(self.value(ast)?.as_i64())
    }

    /// Create a decimal int literal. Negative values are not literals; wrap
    /// the magnitude in a unary minus instead.
    pub fn of_int(ast: &mut Ast, value: u32) -> Self {
        let node = Self::create(ast);
        node.set_raw_value(ast, value.to_string());
        node
    }

    pub fn of_long(ast: &mut Ast, value: u64) -> Self {
        let node = Self::create(ast);
        node.set_raw_value(ast, format!("{value}L"));
        node
    }
}

impl FloatingPointLiteral {
    pub fn value(self, ast: &Ast) -> Result<FloatValue, AstException> {
        decode_float(self.raw_value(ast)).map_err(|message| AstException::on(self.id(), message))
    }

    pub fn double_value(self, ast: &Ast) -> Result<f64, AstException> {
        Ok(self.value(ast)?.as_f64())
    }
}

impl BooleanLiteral {
    pub fn value(self, ast: &Ast) -> Result<bool, AstException> {
        match self.raw_value(ast).trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(AstException::on(self.id(), "Not a boolean value")),
        }
    }

    pub fn of(ast: &mut Ast, value: bool) -> Self {
        let node = Self::create(ast);
        node.set_raw_value(ast, if value { "true" } else { "false" });
        node
    }
}

impl NullLiteral {
    pub fn check(self, ast: &Ast) -> Result<(), AstException> {
        if self.raw_value(ast).trim() == "null" {
            Ok(())
        } else {
            Err(AstException::on(self.id(), "Only 'null' is a valid null literal"))
        }
    }

    pub fn of(ast: &mut Ast) -> Self {
        let node = Self::create(ast);
        node.set_raw_value(ast, "null");
        node
    }
}

impl CharLiteral {
    pub fn value(self, ast: &Ast) -> Result<char, AstException> {
        decode_char(self.raw_value(ast)).map_err(|message| AstException::on(self.id(), message))
    }

    pub fn of(ast: &mut Ast, value: char) -> Self {
        let node = Self::create(ast);
        node.set_raw_value(ast, encode_char(value));
        node
    }
}

impl StringLiteral {
    pub fn value(self, ast: &Ast) -> Result<String, AstException> {
        decode_string(self.raw_value(ast)).map_err(|message| AstException::on(self.id(), message))
    }

    pub fn of(ast: &mut Ast, value: &str) -> Self {
        let node = Self::create(ast);
        node.set_raw_value(ast, encode_string(value));
        node
    }
}

/// Check that the literal at `id` decodes, without keeping the value.
pub(crate) fn validate_literal(ast: &Ast, id: crate::base::NodeId) -> Result<(), AstException> {
    match ast.kind(id) {
        NodeKind::IntegralLiteral => IntegralLiteral::cast(ast, id).map(|n| n.value(ast).map(drop)),
        NodeKind::FloatingPointLiteral => {
            FloatingPointLiteral::cast(ast, id).map(|n| n.value(ast).map(drop))
        }
        NodeKind::BooleanLiteral => BooleanLiteral::cast(ast, id).map(|n| n.value(ast).map(drop)),
        NodeKind::CharLiteral => CharLiteral::cast(ast, id).map(|n| n.value(ast).map(drop)),
        NodeKind::StringLiteral => StringLiteral::cast(ast, id).map(|n| n.value(ast).map(drop)),
        NodeKind::NullLiteral => NullLiteral::cast(ast, id).map(|n| n.check(ast)),
        _ => None,
    }
    .unwrap_or(Ok(()))
}
