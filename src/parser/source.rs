//! Drives one parse end to end and owns its result.
//!
//! ```text
//! raw text
//!     ↓ Preprocessed::new        backslash-u decoding, delta table
//! decoded text
//!     ↓ Parser (scratch arena)   grammar + recovery
//! ParseOutput
//!     ↓ import                   reachable nodes and dangling nodes only,
//!                                parent links rebuilt
//!     ↓ trim                     trailing whitespace/comments off every span
//!     ↓ javadoc                  attach to the following declaration
//!     ↓ remap                    decoded offsets → raw offsets
//! ParseResult
//! ```
//!
//! A [`Source`] parses at most once: the first entry point called (or the
//! first accessor touched) decides what the input is parsed as, until
//! [`Source::clear`] resets it.

use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::ast::{Ast, ChildSlot, Comment, checks};
use crate::base::{NodeId, ParseProblem, Position, SyntaxProblem};

use super::core::{ParseOutput, Parser, Token};
use super::options::ParseOptions;
use super::preprocess::Preprocessed;

/// A keyword or punctuation token recorded against the node it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStructure {
    pub position: Position,
    pub content: SmolStr,
}

/// What the input is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    CompilationUnit,
    Members,
    Statements,
    Expression,
}

/// Everything one parse produced. Positions are raw-input offsets.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    ast: Ast,
    nodes: Vec<NodeId>,
    problems: Vec<ParseProblem>,
    comments: Vec<NodeId>,
    structures: IndexMap<NodeId, Vec<SourceStructure>>,
    dangling: FxHashMap<NodeId, Vec<NodeId>>,
    syntax_problems: Vec<SyntaxProblem>,
    preprocessed: Preprocessed,
}

impl ParseResult {
    /// The arena owning every node below.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Top-level nodes: one compilation unit, or the parsed snippet items.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Parse problems ordered by position; empty on a clean parse.
    pub fn problems(&self) -> &[ParseProblem] {
        &self.problems
    }

    /// Every comment in offset order, attached javadoc included.
    pub fn comments(&self) -> &[NodeId] {
        &self.comments
    }

    pub fn source_structures(&self) -> &IndexMap<NodeId, Vec<SourceStructure>> {
        &self.structures
    }

    /// The keyword and punctuation tokens of `node`, if any were recorded.
    pub fn structures_of(&self, node: NodeId) -> &[SourceStructure] {
        self.structures.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Problems found by the syntax checks, when enabled in the options.
    pub fn syntax_problems(&self) -> &[SyntaxProblem] {
        &self.syntax_problems
    }

    /// Misplaced constructs by the node they were found in, such as a
    /// statement between two methods. Dangling nodes are parentless.
    pub fn dangling(&self) -> &FxHashMap<NodeId, Vec<NodeId>> {
        &self.dangling
    }

    pub fn dangling_of(&self, node: NodeId) -> &[NodeId] {
        self.dangling.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Map an offset of the decoded text back to the raw input.
    pub fn map_position(&self, offset: usize) -> usize {
        self.preprocessed.map_position(offset)
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }
}

/// One unit of source text and, once parsed, its AST.
#[derive(Debug, Clone)]
pub struct Source {
    name: String,
    raw: String,
    options: ParseOptions,
    parsed: Option<ParseResult>,
}

impl Source {
    pub fn new(raw: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_options(raw, name, ParseOptions::default())
    }

    pub fn with_options(raw: impl Into<String>, name: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
            options,
            parsed: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_input(&self) -> &str {
        &self.raw
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse the input as a whole compilation unit.
    pub fn parse_compilation_unit(&mut self) -> &[NodeId] {
        self.parse(Entry::CompilationUnit).nodes()
    }

    /// Parse the input as a sequence of type members.
    pub fn parse_member(&mut self) -> &[NodeId] {
        self.parse(Entry::Members).nodes()
    }

    /// Parse the input as a sequence of block statements.
    pub fn parse_statement(&mut self) -> &[NodeId] {
        self.parse(Entry::Statements).nodes()
    }

    /// Parse the input as exactly one expression.
    pub fn parse_expression(&mut self) -> &[NodeId] {
        self.parse(Entry::Expression).nodes()
    }

    /// The parse result, parsing as a compilation unit if nothing ran yet.
    pub fn result(&mut self) -> &ParseResult {
        self.parse(Entry::CompilationUnit)
    }

    pub fn result_mut(&mut self) -> &mut ParseResult {
        self.parse(Entry::CompilationUnit);
        self.parsed.get_or_insert_with(ParseResult::default)
    }

    /// Parse if needed and hand over the result.
    pub fn into_result(mut self) -> ParseResult {
        self.parse(Entry::CompilationUnit);
        self.parsed.take().unwrap_or_default()
    }

    pub fn nodes(&mut self) -> &[NodeId] {
        self.result().nodes()
    }

    pub fn problems(&mut self) -> &[ParseProblem] {
        self.result().problems()
    }

    pub fn comments(&mut self) -> &[NodeId] {
        self.result().comments()
    }

    pub fn source_structures(&mut self) -> &IndexMap<NodeId, Vec<SourceStructure>> {
        self.result().source_structures()
    }

    pub fn syntax_problems(&mut self) -> &[SyntaxProblem] {
        self.result().syntax_problems()
    }

    pub fn dangling_of(&mut self, node: NodeId) -> &[NodeId] {
        self.result().dangling_of(node)
    }

    pub fn ast(&mut self) -> &Ast {
        self.result().ast()
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        self.result_mut().ast_mut()
    }

    /// Map an offset of the decoded text back to the raw input.
    pub fn map_position(&mut self, offset: usize) -> usize {
        self.result().map_position(offset)
    }

    /// Drop the parse result; the next access parses again.
    pub fn clear(&mut self) {
        self.parsed = None;
    }

    fn parse(&mut self, entry: Entry) -> &ParseResult {
        if self.parsed.is_none() {
            self.parsed = Some(run(&self.name, &self.raw, self.options, entry));
        }
        self.parsed.get_or_insert_with(ParseResult::default)
    }
}

/// Parse every source as a compilation unit, in parallel.
pub fn parse_all(sources: &mut [Source]) {
    sources.par_iter_mut().for_each(|source| {
        source.result();
    });
}

// =============================================================================
// Pipeline
// =============================================================================

fn run(name: &str, raw: &str, options: ParseOptions, entry: Entry) -> ParseResult {
    let preprocessed = Preprocessed::new(raw);
    let output = {
        let mut parser = Parser::new(preprocessed.text(), options.max_problems, options.max_depth);
        let roots = match entry {
            Entry::CompilationUnit => vec![parser.compilation_unit()],
            Entry::Members => parser.member_sequence(),
            Entry::Statements => parser.statement_sequence(),
            Entry::Expression => parser.whole_expression().into_iter().collect(),
        };
        parser.finish(roots)
    };
    let mask = ignorable_mask(preprocessed.text(), &output);

    let (mut result, tokens) = import(output);
    if options.trim_positions {
        let mut roots = result.nodes.clone();
        roots.extend(result.dangling.values().flatten().copied());
        trim_positions(&mut result.ast, &roots, &mask);
    }
    if options.associate_javadoc {
        associate_javadoc(&mut result.ast, &result.nodes, &result.comments);
    }
    result.structures = collect_structures(&result.ast, tokens);

    // Decoded offsets → raw offsets, for everything a caller can see.
    result.ast.map_all_positions(|position| preprocessed.map(position));
    for structures in result.structures.values_mut() {
        for structure in structures {
            structure.position = preprocessed.map(structure.position);
        }
    }
    for problem in &mut result.problems {
        problem.position = preprocessed.map(problem.position);
    }
    result.problems.extend(preprocessed.problems().iter().cloned());
    result.problems.sort_by_key(|problem| problem.position.start());
    result.preprocessed = preprocessed;

    if options.check_syntax {
        for root in &result.nodes {
            result.syntax_problems.extend(checks::check(&result.ast, *root));
        }
    }

    if result.problems.is_empty() {
        debug!(name, nodes = result.ast.len(), "parsed source");
    } else {
        warn!(
            name,
            problems = result.problems.len(),
            first = %result.problems[0],
            "parsed source with problems"
        );
    }
    result
}

/// Copy the reachable trees and every comment out of the scratch arena.
fn import(output: ParseOutput) -> (ParseResult, Vec<(NodeId, Token)>) {
    let ParseOutput {
        ast: scratch,
        roots,
        comments,
        tokens,
        problems,
        dangling,
    } = output;

    let mut ast = Ast::new();
    let mut ids = FxHashMap::default();
    let mut nodes = Vec::with_capacity(roots.len());
    for root in roots {
        let (copy, map) = ast.import_with_map(&scratch, root);
        ast.relink_parents(copy);
        ids.extend(map);
        nodes.push(copy);
    }
    // A stray is recorded after everything inside it, so going backwards
    // imports every owner before the strays hung on it.
    let mut hung: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for (owner, stray) in dangling.into_iter().rev() {
        let Some(owner) = ids.get(&owner).copied() else {
            continue;
        };
        let (copy, map) = ast.import_with_map(&scratch, stray);
        ast.relink_parents(copy);
        ids.extend(map);
        hung.entry(owner).or_default().push(copy);
    }
    for strays in hung.values_mut() {
        strays.reverse();
    }
    let mut copied_comments = Vec::with_capacity(comments.len());
    for comment in comments {
        let (copy, _) = ast.import_with_map(&scratch, comment);
        copied_comments.push(copy);
    }
    copied_comments.sort_by_key(|comment| ast.position(*comment).start());

    let tokens = tokens
        .into_iter()
        .filter(|token| !token.text.is_empty())
        .filter_map(|token| {
            let owner = ids.get(&token.owner?).copied()?;
            Some((owner, token))
        })
        .collect();

    let result = ParseResult {
        ast,
        nodes,
        problems,
        comments: copied_comments,
        dangling: hung,
        ..ParseResult::default()
    };
    (result, tokens)
}

/// Per byte of the decoded text: whether it is whitespace or part of a comment.
fn ignorable_mask(text: &str, output: &ParseOutput) -> Vec<bool> {
    let mut mask: Vec<bool> = text
        .bytes()
        .map(|b| matches!(b, b' ' | b'\t' | b'\x0c' | b'\r' | b'\n'))
        .collect();
    for comment in &output.comments {
        let position = output.ast.position(*comment);
        let end = position.end().min(mask.len());
        for flag in mask.iter_mut().take(end).skip(position.start()) {
            *flag = true;
        }
    }
    mask
}

/// Cut trailing whitespace and comments off every span. A zero-width span is
/// moved inside its parent's span.
fn trim_positions(ast: &mut Ast, roots: &[NodeId], mask: &[bool]) {
    for root in roots {
        for node in ast.descendants(*root) {
            let parent = ast.parent(node).map(|p| ast.position(p));
            let data = ast.data_mut(node);
            data.position = trim(data.position, mask, parent);
            for paren in &mut data.parens {
                *paren = trim(*paren, mask, None);
            }
        }
    }
    debug!(roots = roots.len(), "trimmed positions");
}

fn trim(position: Position, mask: &[bool], parent: Option<Position>) -> Position {
    if position.is_unplaced() || position.is_generated() {
        return position;
    }
    let start = position.start();
    let mut end = position.end().min(mask.len());
    while end > start && mask[end - 1] {
        end -= 1;
    }
    match parent {
        Some(parent) if end == start && !parent.is_unplaced() => {
            let at = start.clamp(parent.start(), parent.end());
            Position::new(at, at)
        }
        _ => Position::new(start, end),
    }
}

/// Attach each javadoc comment to the nearest declaration starting after it.
/// A javadoc closer to the declaration wins over one further away.
fn associate_javadoc(ast: &mut Ast, roots: &[NodeId], comments: &[NodeId]) {
    let candidates: Vec<(usize, NodeId)> = roots
        .iter()
        .flat_map(|root| ast.descendants(*root))
        .filter(|node| {
            let position = ast.position(*node);
            !position.is_unplaced() && !position.is_generated()
        })
        .map(|node| (ast.position(node).start(), node))
        .collect();

    let mut claimed: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut attached = 0usize;
    for comment in comments {
        let is_javadoc = ast.get::<Comment>(*comment).is_some_and(|c| c.is_javadoc(ast));
        if !is_javadoc {
            continue;
        }
        let end = ast.position(*comment).end();
        // Pre-order, so on equal starts the outermost node comes first.
        let nearest = candidates
            .iter()
            .filter(|(start, _)| *start >= end)
            .min_by_key(|(start, _)| *start);
        let Some((_, target)) = nearest else {
            continue;
        };
        let Some(slot) = ast.kind(*target).javadoc_slot() else {
            continue;
        };
        if claimed.get(target).is_some_and(|previous| *previous >= end) {
            continue;
        }
        if ChildSlot::new(*target, slot).set(ast, Some(*comment)).is_ok() {
            claimed.insert(*target, end);
            attached += 1;
        }
    }
    debug!(attached, "associated javadoc");
}

/// Group the surviving tokens by owner, dropping tokens that span their
/// whole node.
fn collect_structures(ast: &Ast, tokens: Vec<(NodeId, Token)>) -> IndexMap<NodeId, Vec<SourceStructure>> {
    let mut structures: IndexMap<NodeId, Vec<SourceStructure>> = IndexMap::new();
    for (owner, token) in tokens {
        if token.position == ast.position(owner) {
            continue;
        }
        structures.entry(owner).or_default().push(SourceStructure {
            position: token.position,
            content: SmolStr::new_static(token.text),
        });
    }
    structures
}
