//! Backslash-u decoding.
//!
//! Java source may spell any character as `\uXXXX`, anywhere, so escapes are
//! decoded before the grammar sees the text. The grammar then works on the
//! decoded text and every position it produces is mapped back through a
//! delta table.
//!
//! ```text
//! raw:      a = "\u0041";     13 bytes, escape at 5..11
//! decoded:  a = "A";          8 bytes
//! deltas:   [(6, 5)]          decoded offset >= 6 → raw = decoded + 5
//! ```

use tracing::debug;

use crate::base::{ParseProblem, Position};

const INVALID_ESCAPE: &str =
    "Invalid backslash-u escape: \\u is supposed to be followed by 4 hex digits.";
const LONE_SURROGATE: &str = "Unpaired surrogate in backslash-u escape";

/// Decoded text plus what is needed to map its offsets back to the raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preprocessed {
    text: String,
    /// `(decoded offset, cumulative delta)`, sorted by offset
    deltas: Vec<(usize, usize)>,
    problems: Vec<ParseProblem>,
}

/// One well-formed escape: its raw length and UTF-16 code unit.
struct Escape {
    length: usize,
    unit: u16,
}

impl Preprocessed {
    pub fn new(raw: &str) -> Self {
        let mut out = Self {
            text: String::with_capacity(raw.len()),
            ..Self::default()
        };
        let mut backslashes = 0usize;
        let mut at = 0usize;
        while let Some(c) = raw[at..].chars().next() {
            if c != '\\' {
                backslashes = 0;
                out.text.push(c);
                at += c.len_utf8();
                continue;
            }
            if backslashes % 2 == 1 || !raw[at + 1..].starts_with('u') {
                backslashes += 1;
                out.text.push(c);
                at += 1;
                continue;
            }
            backslashes = 0;
            match escape_at(&raw[at..]) {
                Some(escape) => at = out.decode(raw, at, escape),
                None => {
                    out.problems.push(ParseProblem::new(
                        Position::new(at, invalid_escape_end(raw, at)),
                        INVALID_ESCAPE,
                    ));
                    out.text.push(c);
                    at += 1;
                }
            }
        }
        debug!(
            raw = raw.len(),
            decoded = out.text.len(),
            escapes = out.deltas.len(),
            "preprocessed source"
        );
        out
    }

    /// Emit the character for the escape at raw offset `at`, pairing it with
    /// a following low surrogate escape if needed. Returns the raw offset
    /// after what was consumed.
    fn decode(&mut self, raw: &str, at: usize, first: Escape) -> usize {
        let mut end = at + first.length;
        let decoded = match first.unit {
            0xD800..=0xDBFF => {
                let low = escape_at(&raw[end..])
                    .filter(|e| (0xDC00..=0xDFFF).contains(&e.unit));
                match low {
                    Some(low) => {
                        end += low.length;
                        let high = u32::from(first.unit - 0xD800);
                        let low = u32::from(low.unit - 0xDC00);
                        char::from_u32(0x10000 + (high << 10) + low)
                    }
                    None => None,
                }
            }
            0xDC00..=0xDFFF => None,
            unit => char::from_u32(u32::from(unit)),
        };
        let decoded = decoded.unwrap_or_else(|| {
            self.problems
                .push(ParseProblem::new(Position::new(at, end), LONE_SURROGATE));
            char::REPLACEMENT_CHARACTER
        });
        self.text.push(decoded);
        let delta = (end - at) - decoded.len_utf8();
        let total = self.deltas.last().map_or(0, |(_, d)| *d) + delta;
        self.deltas.push((self.text.len(), total));
        end
    }

    /// The decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Invalid escapes and unpaired surrogates, at raw offsets.
    pub fn problems(&self) -> &[ParseProblem] {
        &self.problems
    }

    /// Whether the raw input contained no escapes at all.
    pub fn is_identity(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Map an offset in the decoded text to the raw input.
    pub fn map_position(&self, offset: usize) -> usize {
        let index = self.deltas.partition_point(|(at, _)| *at <= offset);
        match index {
            0 => offset,
            n => offset + self.deltas[n - 1].1,
        }
    }

    /// Map both ends of a decoded span to the raw input. Unplaced spans
    /// stay unplaced.
    pub fn map(&self, position: Position) -> Position {
        if self.is_identity() {
            return position;
        }
        position.map(|offset| self.map_position(offset))
    }
}

/// The well-formed escape at the start of `text`: a backslash, one or more
/// `u`s and four hex digits.
fn escape_at(text: &str) -> Option<Escape> {
    let body = text.strip_prefix('\\')?;
    let us = body.bytes().take_while(|b| *b == b'u').count();
    if us == 0 {
        return None;
    }
    let digits = body.get(us..us + 4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u16::from_str_radix(digits, 16).ok()?;
    Some(Escape {
        length: 1 + us + 4,
        unit,
    })
}

/// End of a malformed escape starting at `at`: the `u`s and whatever hex
/// digits follow them.
fn invalid_escape_end(raw: &str, at: usize) -> usize {
    let body = &raw.as_bytes()[at + 1..];
    let us = body.iter().take_while(|b| **b == b'u').count();
    let hex = body[us..]
        .iter()
        .take(4)
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    at + 1 + us + hex
}
