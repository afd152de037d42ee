//! Whitespace, comments, identifiers, keywords and punctuation.
//!
//! Every token-level rule consumes trailing whitespace (and comments), so a
//! node's raw span ends after it. Spans are trimmed back once parsing is done.

use crate::ast::{Comment, Identifier};
use crate::base::constants::{is_identifier_part, is_identifier_start, is_keyword};
use crate::base::{NodeId, Position};

use crate::parser::core::{Miss, PResult, Parser};

/// An operator alternative: its text, and whether it may not be followed by
/// its own first character (`+` but not `++`).
pub(crate) type Operator = (&'static str, bool);

impl<'a> Parser<'a> {
    // =========================================================================
    // Whitespace and comments
    // =========================================================================

    /// optWS = (comment | ' ' | '\t' | '\f' | line terminator)*
    pub(crate) fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\u{c}' | '\r' | '\n' => self.pos += 1,
                '/' if self.at("//") || self.at("/*") => {
                    if !self.comment() {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Consume one comment and register it. An unterminated block comment is
    /// not a comment; nothing is consumed then.
    pub(crate) fn comment(&mut self) -> bool {
        let start = self.pos;
        let rest = self.rest();
        let (block, content, length) = if let Some(body) = rest.strip_prefix("//") {
            let length = body.find(['\r', '\n']).unwrap_or(body.len());
            (false, &body[..length], 2 + length)
        } else if let Some(body) = rest.strip_prefix("/*") {
            match body.find("*/") {
                Some(end) => (true, &body[..end], 2 + end + 2),
                None => return false,
            }
        } else {
            return false;
        };
        let comment = Comment::of(&mut self.ast, block, content).id();
        self.pos += length;
        self.ast.set_position(comment, Position::new(start, self.pos));
        self.comments.push(comment);
        true
    }

    // =========================================================================
    // Identifiers and keywords
    // =========================================================================

    /// The identifier-shaped word at the cursor, keyword or not.
    fn word(&self) -> Option<&'a str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;
        if !is_identifier_start(first) {
            return None;
        }
        let end = chars
            .find(|(_, c)| !is_identifier_part(*c))
            .map_or(rest.len(), |(at, _)| at);
        Some(&rest[..end])
    }

    /// identifier = !keyword identifierRaw optWS
    pub(crate) fn identifier(&mut self) -> PResult<NodeId> {
        let Some(word) = self.word().filter(|w| !is_keyword(w)) else {
            return Err(self.expected_rule("identifier"));
        };
        let start = self.pos;
        let id = Identifier::of(&mut self.ast, word).id();
        self.pos += word.len();
        self.ast.set_position(id, Position::new(start, self.pos));
        self.skip_ws();
        Ok(id)
    }

    /// Whether the cursor is at `kw` followed by a lexical break.
    pub(crate) fn at_keyword(&self, kw: &str) -> bool {
        self.at(kw) && !self.rest()[kw.len()..].starts_with(is_identifier_part)
    }

    /// `kw` followed by a lexical break, then optWS.
    pub(crate) fn keyword(&mut self, kw: &'static str) -> PResult<Position> {
        if !self.at_keyword(kw) {
            return Err(self.expected_text(kw));
        }
        Ok(self.take(kw))
    }

    /// The first of `keywords` present at the cursor.
    pub(crate) fn keyword_of(&mut self, keywords: &[&'static str]) -> PResult<&'static str> {
        match keywords.iter().find(|kw| self.at_keyword(kw)) {
            Some(kw) => {
                let kw = *kw;
                self.take(kw);
                Ok(kw)
            }
            None => {
                for kw in keywords {
                    self.expected_text(*kw);
                }
                Err(Miss::Soft)
            }
        }
    }

    // =========================================================================
    // Punctuation and operators
    // =========================================================================

    /// Consume `text` (already known to be present) as a token, then optWS.
    fn take(&mut self, text: &'static str) -> Position {
        let position = Position::new(self.pos, self.pos + text.len());
        self.pos += text.len();
        self.token(text, position);
        self.skip_ws();
        position
    }

    /// Exact punctuation, then optWS.
    pub(crate) fn punct(&mut self, text: &'static str) -> PResult<Position> {
        if !self.at(text) {
            return Err(self.expected_text(text));
        }
        Ok(self.take(text))
    }

    /// A one-character symbol not doubled (`&` but not `&&`), then optWS.
    pub(crate) fn solitary(&mut self, text: &'static str) -> PResult<Position> {
        if !self.solitary_at(text) {
            return Err(self.expected_text(text));
        }
        Ok(self.take(text))
    }

    fn solitary_at(&self, text: &str) -> bool {
        let Some(first) = text.chars().next() else {
            return false;
        };
        self.at(text) && !self.rest()[text.len()..].starts_with(first)
    }

    /// The first matching operator of `table`. Operators continue an
    /// expression that is already complete, so a miss records no expectation.
    pub(crate) fn operator(&mut self, table: &[Operator]) -> PResult<&'static str> {
        let found = table.iter().find(|(text, solitary)| {
            if *solitary {
                self.solitary_at(text)
            } else {
                self.at(text)
            }
        });
        match found {
            Some((text, _)) => {
                let text = *text;
                self.take(text);
                Ok(text)
            }
            None => Err(Miss::Soft),
        }
    }
}
