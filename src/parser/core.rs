//! Backtracking parser state and combinators.
//!
//! Grammar rules are methods returning [`PResult`]. A rule that does not
//! match returns [`Miss::Soft`] and the caller tries its next alternative; a
//! rule that has committed (an enforced sequence) and then fails returns
//! [`Miss::Hard`], which unwinds to the nearest recovery point.
//!
//! ```text
//! attempt     → run a rule; on a miss roll back cursor, scratch nodes,
//!               comments, tokens and problems to the mark
//! recover     → record the failure, skip the broken construct, continue;
//!               a construct that only parses as something misplaced is kept
//!               as a dangling node of the enclosing node
//! nested      → count one level of nesting; too deep is a hard miss
//! finish/claim→ position a node from the matched span; the node claims the
//!               keyword and punctuation tokens its rule matched
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::ast::Ast;
use crate::base::{NodeId, ParseProblem, Position};

/// Why a rule did not produce a value.
#[derive(Debug)]
pub(crate) enum Miss {
    /// Not this alternative
    Soft,
    /// Committed input could not be completed
    Hard(ParseProblem),
}

pub(crate) type PResult<T> = Result<T, Miss>;

/// A point to roll back to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    pub(crate) pos: usize,
    nodes: usize,
    comments: usize,
    tokens: usize,
    problems: usize,
    dangling: usize,
    gave_up: bool,
}

/// Cursor offset and token index at the start of a rule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Start {
    pub(crate) pos: usize,
    token: usize,
}

/// A keyword or punctuation token waiting for the node that owns it.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub(crate) position: Position,
    pub(crate) text: &'static str,
    pub(crate) owner: Option<NodeId>,
}

/// Something the grammar would have accepted at the furthest failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expected {
    Text(&'static str),
    Rule(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "'{text}'"),
            Self::Rule(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Default)]
struct Furthest {
    pos: usize,
    expected: Vec<Expected>,
}

/// Everything a finished parse hands to the source orchestrator.
#[derive(Debug)]
pub(crate) struct ParseOutput {
    pub(crate) ast: Ast,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) comments: Vec<NodeId>,
    pub(crate) tokens: Vec<Token>,
    pub(crate) problems: Vec<ParseProblem>,
    /// (enclosing node, misplaced node) pairs, in input order
    pub(crate) dangling: Vec<(NodeId, NodeId)>,
}

const MAX_LISTED_EXPECTATIONS: usize = 6;

pub(crate) struct Parser<'a> {
    pub(crate) text: &'a str,
    pub(crate) pos: usize,
    /// Scratch arena; nodes from failed alternatives are truncated away.
    pub(crate) ast: Ast,
    pub(crate) comments: Vec<NodeId>,
    tokens: Vec<Token>,
    problems: Vec<ParseProblem>,
    dangling: Vec<(NodeId, NodeId)>,
    furthest: Furthest,
    max_problems: usize,
    depth: usize,
    max_depth: usize,
    gave_up: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, max_problems: usize, max_depth: usize) -> Self {
        Self {
            text,
            pos: 0,
            ast: Ast::new(),
            comments: Vec::new(),
            tokens: Vec::new(),
            problems: Vec::new(),
            dangling: Vec::new(),
            furthest: Furthest::default(),
            max_problems,
            depth: 0,
            max_depth,
            gave_up: false,
        }
    }

    pub(crate) fn finish(self, roots: Vec<NodeId>) -> ParseOutput {
        debug!(
            nodes = self.ast.len(),
            comments = self.comments.len(),
            problems = self.problems.len(),
            dangling = self.dangling.len(),
            "grammar pass complete"
        );
        ParseOutput {
            ast: self.ast,
            roots,
            comments: self.comments,
            tokens: self.tokens,
            problems: self.problems,
            dangling: self.dangling,
        }
    }

    // =========================================================================
    // Input inspection
    // =========================================================================

    pub(crate) fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    pub(crate) fn at_eoi(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn at(&self, text: &str) -> bool {
        self.rest().starts_with(text)
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(crate) fn gave_up(&self) -> bool {
        self.gave_up
    }

    // =========================================================================
    // Marks and combinators
    // =========================================================================

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            nodes: self.ast.len(),
            comments: self.comments.len(),
            tokens: self.tokens.len(),
            problems: self.problems.len(),
            dangling: self.dangling.len(),
            gave_up: self.gave_up,
        }
    }

    pub(crate) fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.ast.truncate(mark.nodes);
        self.comments.truncate(mark.comments);
        self.tokens.truncate(mark.tokens);
        self.problems.truncate(mark.problems);
        self.dangling.truncate(mark.dangling);
        self.gave_up = mark.gave_up;
    }

    /// Run `rule`, rolling back everything it did when it misses.
    pub(crate) fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let mark = self.mark();
        let result = rule(self);
        if result.is_err() {
            self.reset(mark);
        }
        result
    }

    /// `rule?`; a hard miss still propagates.
    pub(crate) fn optional<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<Option<T>> {
        match self.attempt(rule) {
            Ok(value) => Ok(Some(value)),
            Err(Miss::Soft) => Ok(None),
            Err(hard) => Err(hard),
        }
    }

    /// `rule*`. Stops after an iteration that consumed nothing.
    pub(crate) fn zero_or_more<T>(
        &mut self,
        mut rule: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut out = Vec::new();
        loop {
            let before = self.pos;
            match self.optional(&mut rule)? {
                Some(value) => {
                    out.push(value);
                    if self.pos == before {
                        break;
                    }
                }
                None => break,
            }
        }
        Ok(out)
    }

    /// `rule+`
    pub(crate) fn one_or_more<T>(
        &mut self,
        mut rule: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let first = self.attempt(&mut rule)?;
        let mut out = vec![first];
        out.extend(self.zero_or_more(rule)?);
        Ok(out)
    }

    /// item (',' item)*
    pub(crate) fn comma_list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let first = item(self)?;
        let mut out = vec![first];
        out.extend(self.zero_or_more(|p| {
            p.punct(",")?;
            item(p)
        })?);
        Ok(out)
    }

    /// Ordered choice: the first alternative that does not miss softly wins.
    pub(crate) fn first_of<T>(&mut self, alternatives: &[fn(&mut Self) -> PResult<T>]) -> PResult<T> {
        for alternative in alternatives {
            match self.attempt(alternative) {
                Err(Miss::Soft) => continue,
                result => return result,
            }
        }
        Err(Miss::Soft)
    }

    /// Positive lookahead; never consumes and never records expectations.
    pub(crate) fn test<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> bool {
        let mark = self.mark();
        let furthest = std::mem::take(&mut self.furthest);
        let matched = rule(self).is_ok();
        self.reset(mark);
        self.furthest = furthest;
        matched
    }

    /// Run `rule` one nesting level deeper. Past the configured depth the
    /// construct fails hard, so the stack stays bounded on pathological input.
    pub(crate) fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.max_depth {
            let at = self.pos;
            let width = self.peek().map_or(0, char::len_utf8);
            debug!(at, limit = self.max_depth, "nesting limit reached");
            return Err(Miss::Hard(ParseProblem::new(
                Position::new(at, at + width),
                format!("Nesting too deep; at most {} levels are supported", self.max_depth),
            )));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Failure bookkeeping
    // =========================================================================

    /// Note that `what` would have been accepted here; returns a soft miss.
    pub(crate) fn expected(&mut self, what: Expected) -> Miss {
        if self.pos > self.furthest.pos {
            self.furthest.pos = self.pos;
            self.furthest.expected.clear();
        }
        if self.pos == self.furthest.pos && !self.furthest.expected.contains(&what) {
            self.furthest.expected.push(what);
        }
        Miss::Soft
    }

    pub(crate) fn expected_text(&mut self, text: &'static str) -> Miss {
        self.expected(Expected::Text(text))
    }

    pub(crate) fn expected_rule(&mut self, name: &'static str) -> Miss {
        self.expected(Expected::Rule(name))
    }

    pub(crate) fn clear_furthest(&mut self) {
        self.furthest = Furthest {
            pos: self.pos,
            expected: Vec::new(),
        };
    }

    /// Describe the furthest failure seen since the last recovery point.
    pub(crate) fn failure(&self) -> ParseProblem {
        let at = self.furthest.pos.max(self.pos).min(self.text.len());
        let width = self.text[at..].chars().next().map_or(0, char::len_utf8);
        let mut listed: Vec<String> = self
            .furthest
            .expected
            .iter()
            .take(MAX_LISTED_EXPECTATIONS)
            .map(ToString::to_string)
            .collect();
        if self.furthest.expected.len() > MAX_LISTED_EXPECTATIONS {
            listed.push("...".to_string());
        }
        let message = match (listed.is_empty(), width == 0) {
            (true, true) => "Unexpected end of input".to_string(),
            (true, false) => "Unexpected input".to_string(),
            (false, true) => format!("Unexpected end of input; expected {}", listed.join(", ")),
            (false, false) => format!("Expected {}", listed.join(", ")),
        };
        ParseProblem::new(Position::new(at, at + width), message)
    }

    /// The enforced part of a sequence: once reached, a soft miss turns hard.
    pub(crate) fn must<T>(&mut self, rule: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        match rule(self) {
            Err(Miss::Soft) => Err(Miss::Hard(self.failure())),
            other => other,
        }
    }

    /// Run `rule`; when it misses softly right where it started, report the
    /// expectation as `name` instead of the tokens its alternatives wanted.
    pub(crate) fn summarize<T>(
        &mut self,
        name: &'static str,
        rule: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let start = self.pos;
        let before = (self.furthest.pos, self.furthest.expected.len());
        let result = rule(self);
        if matches!(result, Err(Miss::Soft)) && self.furthest.pos == start {
            if before.0 == start {
                self.furthest.expected.truncate(before.1);
            } else {
                self.furthest.expected.clear();
            }
            self.furthest.expected.push(Expected::Rule(name));
        }
        result
    }

    /// Record a problem. Past the limit nothing more is kept and the parser gives up.
    pub(crate) fn report(&mut self, problem: ParseProblem) {
        if self.gave_up {
            return;
        }
        if self.problems.len() >= self.max_problems {
            debug!(limit = self.max_problems, "problem limit reached, giving up");
            self.gave_up = true;
            return;
        }
        trace!(%problem, "parse problem");
        self.problems.push(problem);
        if self.problems.len() >= self.max_problems {
            debug!(limit = self.max_problems, "problem limit reached, giving up");
            self.gave_up = true;
        }
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// `item*` up to a closing `}` or the end of input. A broken item is
    /// recorded and skipped, and the loop carries on.
    pub(crate) fn recovering<T>(&mut self, item: fn(&mut Self) -> PResult<T>) -> Vec<T> {
        self.recovering_with(item, None).0
    }

    /// [`Parser::recovering`], except that a broken item which parses as
    /// `stray` is kept instead of skipped. Strays come back separately, for
    /// the caller to hang on the enclosing node with [`Parser::dangle`]. The
    /// problem is recorded either way.
    pub(crate) fn recovering_with<T>(
        &mut self,
        item: fn(&mut Self) -> PResult<T>,
        stray: Option<fn(&mut Self) -> PResult<T>>,
    ) -> (Vec<T>, Vec<T>) {
        let mut out = Vec::new();
        let mut strays = Vec::new();
        while !self.at("}") && !self.at_eoi() && !self.gave_up {
            let mark = self.mark();
            self.clear_furthest();
            match item(self) {
                Ok(value) => {
                    out.push(value);
                    if self.pos == mark.pos {
                        break;
                    }
                }
                Err(miss) => {
                    self.record_failure(mark, miss);
                    let salvaged = match stray {
                        Some(rule) if !self.gave_up => self.attempt(rule).ok(),
                        _ => None,
                    };
                    match salvaged {
                        Some(value) if self.pos > mark.pos => {
                            trace!(from = mark.pos, to = self.pos, "kept misplaced construct");
                            strays.push(value);
                        }
                        _ => self.skip_failed(mark),
                    }
                }
            }
        }
        (out, strays)
    }

    /// Hang misplaced nodes on `owner`.
    pub(crate) fn dangle(&mut self, owner: NodeId, strays: Vec<NodeId>) {
        self.dangling.extend(strays.into_iter().map(|stray| (owner, stray)));
    }

    /// [`Parser::recovering`] to the end of input; a stray `}` is reported and dropped.
    pub(crate) fn top_level<T>(&mut self, item: fn(&mut Self) -> PResult<T>) -> Vec<T> {
        let mut out = Vec::new();
        loop {
            let before = self.pos;
            out.extend(self.recovering(item));
            if self.at_eoi() || self.gave_up {
                break;
            }
            if self.at("}") {
                let at = self.pos;
                self.report(ParseProblem::new(Position::new(at, at + 1), "Unexpected '}'"));
                self.pos += 1;
                self.skip_ws();
            } else if self.pos == before {
                break;
            }
        }
        out
    }

    /// `}` closing a construct. A brace missing at the end of input is
    /// recorded rather than failing the whole construct.
    pub(crate) fn close_brace(&mut self) -> PResult<Position> {
        if self.at_eoi() {
            self.report(ParseProblem::at_offset(self.pos, "Missing '}' at end of input"));
            return Ok(Position::at(self.pos));
        }
        self.punct("}")
    }

    /// Roll back a failed item, record why it failed and skip past it.
    pub(crate) fn recover(&mut self, mark: Mark, miss: Miss) {
        self.record_failure(mark, miss);
        self.skip_failed(mark);
    }

    fn record_failure(&mut self, mark: Mark, miss: Miss) {
        self.reset(mark);
        let problem = match miss {
            Miss::Hard(problem) => problem,
            Miss::Soft => self.failure(),
        };
        self.report(problem);
    }

    fn skip_failed(&mut self, mark: Mark) {
        if self.gave_up {
            self.pos = self.text.len();
            return;
        }
        self.skip_construct();
        if self.pos == mark.pos && !self.at("}") {
            self.bump();
            self.skip_ws();
        }
    }

    /// Skip through the next `;` or balanced `{...}` at brace depth zero.
    /// Stops in front of an unbalanced `}`.
    fn skip_construct(&mut self) {
        let from = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' => self.skip_quoted(c),
                '/' if self.at("//") || self.at("/*") => {
                    if !self.comment() {
                        self.pos = self.text.len();
                    }
                }
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' if depth == 0 => break,
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        break;
                    }
                }
                ';' if depth == 0 => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += c.len_utf8(),
            }
        }
        trace!(from, to = self.pos, "skipped unparseable input");
        self.skip_ws();
    }

    fn skip_quoted(&mut self, quote: char) {
        self.pos += 1;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if self.peek().is_some_and(|n| n != '\r' && n != '\n') {
                        self.bump();
                    }
                }
                '\r' | '\n' => break,
                _ => {
                    self.pos += c.len_utf8();
                    if c == quote {
                        break;
                    }
                }
            }
        }
    }

    // =========================================================================
    // Node placement
    // =========================================================================

    pub(crate) fn start(&self) -> Start {
        Start {
            pos: self.pos,
            token: self.tokens.len(),
        }
    }

    /// Record a matched keyword or punctuation token.
    pub(crate) fn token(&mut self, text: &'static str, position: Position) {
        self.tokens.push(Token {
            position,
            text,
            owner: None,
        });
    }

    /// Place `node` over `[start, cursor)` and claim the tokens matched since `start`.
    pub(crate) fn finish_node(&mut self, node: NodeId, start: Start) -> NodeId {
        let end = self.start();
        self.finish_span(node, start, end)
    }

    pub(crate) fn finish_span(&mut self, node: NodeId, start: Start, end: Start) -> NodeId {
        self.ast.set_position(node, Position::new(start.pos, end.pos));
        self.claim(node, start, end);
        node
    }

    /// Hand every unowned token in `[from, to)` to `node`.
    pub(crate) fn claim(&mut self, node: NodeId, from: Start, to: Start) {
        let upto = to.token.min(self.tokens.len());
        for token in self.tokens.iter_mut().take(upto).skip(from.token) {
            if token.owner.is_none() {
                token.owner = Some(node);
            }
        }
    }
}
