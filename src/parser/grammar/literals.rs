//! Literal rules. Only the raw text is kept; values are decoded on demand.

use crate::ast::{
    BooleanLiteral, CharLiteral, FloatingPointLiteral, IntegralLiteral, NullLiteral, StringLiteral,
};
use crate::base::NodeId;

use crate::parser::core::{PResult, Parser};

impl Parser<'_> {
    /// anyLiteral = null | boolean | number | char | string
    pub(crate) fn literal(&mut self) -> PResult<NodeId> {
        self.first_of(&[
            Self::null_literal,
            Self::boolean_literal,
            Self::number_literal,
            Self::char_literal,
            Self::string_literal,
        ])
    }

    fn null_literal(&mut self) -> PResult<NodeId> {
        let start = self.start();
        self.keyword("null")?;
        let node = NullLiteral::create(&mut self.ast);
        node.set_raw_value(&mut self.ast, "null");
        Ok(self.finish_node(node.id(), start))
    }

    fn boolean_literal(&mut self) -> PResult<NodeId> {
        let start = self.start();
        let raw = self.keyword_of(&["true", "false"])?;
        let node = BooleanLiteral::create(&mut self.ast);
        node.set_raw_value(&mut self.ast, raw);
        Ok(self.finish_node(node.id(), start))
    }

    /// number = &('.'? digit) (hexNumber | decimalNumber) typeSuffix?
    fn number_literal(&mut self) -> PResult<NodeId> {
        let rest = self.rest();
        let digits_from = usize::from(rest.starts_with('.'));
        if !rest[digits_from..].starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.expected_rule("literal"));
        }

        let length = scan_number(rest);
        let raw = &rest[..length];
        let start = self.start();
        self.pos += length;
        let id = if is_floating_point(raw) {
            let node = FloatingPointLiteral::create(&mut self.ast);
            node.set_raw_value(&mut self.ast, raw);
            node.id()
        } else {
            let node = IntegralLiteral::create(&mut self.ast);
            node.set_raw_value(&mut self.ast, raw);
            node.id()
        };
        self.skip_ws();
        Ok(self.finish_node(id, start))
    }

    /// char = '\'' (escape '\'' | (!['\'' lineTerminator] any)* '\'' | any)
    fn char_literal(&mut self) -> PResult<NodeId> {
        if !self.at("'") {
            return Err(self.expected_rule("literal"));
        }
        let start = self.start();
        self.pos += 1;
        let body = self.rest();
        let length = escape_length(body)
            .filter(|n| body[*n..].starts_with('\''))
            .map(|n| n + 1)
            .or_else(|| {
                let n = body.find(['\'', '\r', '\n']).unwrap_or(body.len());
                body[n..].starts_with('\'').then_some(n + 1)
            })
            .or_else(|| body.chars().next().map(char::len_utf8));
        let Some(length) = length else {
            return Err(self.expected_text("'"));
        };
        self.pos += length;
        let raw = &self.text[start.pos..self.pos];
        let node = CharLiteral::create(&mut self.ast);
        node.set_raw_value(&mut self.ast, raw);
        self.skip_ws();
        Ok(self.finish_node(node.id(), start))
    }

    /// string = '"' (escape | !["\r\n] any)* '"'
    fn string_literal(&mut self) -> PResult<NodeId> {
        if !self.at("\"") {
            return Err(self.expected_rule("literal"));
        }
        let start = self.start();
        self.pos += 1;
        loop {
            let rest = self.rest();
            if let Some(n) = escape_length(rest) {
                self.pos += n;
                continue;
            }
            match rest.chars().next() {
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\r' | '\n') | None => return Err(self.expected_text("\"")),
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        let raw = &self.text[start.pos..self.pos];
        let node = StringLiteral::create(&mut self.ast);
        node.set_raw_value(&mut self.ast, raw);
        self.skip_ws();
        Ok(self.finish_node(node.id(), start))
    }
}

/// Length of the escape sequence at the start of `text`, if there is one.
///
/// escape = '\\' ([0-3]? [0-7]? [0-7] | !lineTerminator any)
fn escape_length(text: &str) -> Option<usize> {
    let body = text.strip_prefix('\\')?;
    let octal = body
        .bytes()
        .take(3)
        .take_while(|b| (b'0'..=b'7').contains(b))
        .count();
    if octal > 0 {
        let digits = if octal == 3 && body.as_bytes()[0] > b'3' { 2 } else { octal };
        return Some(1 + digits);
    }
    match body.chars().next() {
        Some('\r' | '\n') | None => None,
        Some(c) => Some(1 + c.len_utf8()),
    }
}

/// Length of the numeric literal at the start of `text`. Requires a leading
/// digit, or a `.` followed by one.
fn scan_number(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits = |from: usize, hex: bool| {
        bytes[from..]
            .iter()
            .take_while(|b| if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
            .count()
    };
    let exponent = |at: usize, marker: &[u8]| -> usize {
        if at < bytes.len() && marker.contains(&bytes[at]) {
            let sign = usize::from(matches!(bytes.get(at + 1), Some(b'+' | b'-')));
            let n = digits(at + 1 + sign, false);
            if n > 0 {
                return 1 + sign + n;
            }
        }
        0
    };

    let hex = bytes.len() > 2
        && bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X')
        && (bytes[2].is_ascii_hexdigit() || bytes[2] == b'.');
    let mut at;
    if hex {
        at = 2 + digits(2, true);
        let integer_end = at;
        if bytes.get(at) == Some(&b'.') {
            at += 1 + digits(at + 1, true);
        }
        let exp = exponent(at, &b"pP"[..]);
        if exp > 0 {
            at += exp;
            if matches!(bytes.get(at), Some(b'f' | b'F' | b'd' | b'D')) {
                at += 1;
            }
            return at;
        }
        // Without a binary exponent only the integer part is a literal.
        at = integer_end;
    } else {
        at = digits(0, false);
        if bytes.get(at) == Some(&b'.') {
            at += 1 + digits(at + 1, false);
        }
        at += exponent(at, &b"eE"[..]);
    }
    if matches!(bytes.get(at), Some(b'l' | b'L' | b'f' | b'F' | b'd' | b'D')) {
        at += 1;
    }
    at
}

/// Hex literals are floating point only with a `p` exponent; decimal ones
/// with a fraction, an exponent or an `f`/`d` suffix.
fn is_floating_point(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("0x") {
        return lower.contains('p');
    }
    lower.contains('.') || lower.contains('e') || lower.ends_with('f') || lower.ends_with('d')
}
