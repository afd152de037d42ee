//! Source positions for AST nodes.
//!
//! A [`Position`] is a half-open `[start, end)` byte span. Nodes that were
//! synthesized rather than parsed carry a `generated_by` back-reference to the
//! node responsible for them; their span then marks where they would have
//! appeared in the source.

use text_size::{TextRange, TextSize};

use super::NodeId;

/// A half-open byte span, optionally marked as generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    start: usize,
    end: usize,
    generated_by: Option<NodeId>,
}

impl Position {
    /// Sentinel for nodes that have not been placed yet.
    pub const UNPLACED: Position = Position {
        start: usize::MAX,
        end: usize::MAX,
        generated_by: None,
    };

    /// Create a span. `end` is clamped so that `start <= end` always holds.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
            generated_by: None,
        }
    }

    /// Create a span for a node synthesized on behalf of `responsible`.
    pub fn generated(start: usize, end: usize, responsible: Option<NodeId>) -> Self {
        Self {
            generated_by: responsible,
            ..Self::new(start, end)
        }
    }

    /// Zero-width span at `offset`.
    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn generated_by(&self) -> Option<NodeId> {
        self.generated_by
    }

    /// True for [`Position::UNPLACED`] and anything derived from it.
    pub fn is_unplaced(&self) -> bool {
        self.start == usize::MAX || self.end == usize::MAX
    }

    /// True when this position was produced by a template or a synthesized fix.
    pub fn is_generated(&self) -> bool {
        self.generated_by.is_some()
    }

    pub fn len(&self) -> usize {
        if self.is_unplaced() {
            0
        } else {
            self.end - self.start
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Position) -> bool {
        !self.is_unplaced()
            && !other.is_unplaced()
            && self.start <= other.start
            && other.end <= self.end
    }

    pub fn with_start(self, start: usize) -> Self {
        Self {
            start,
            end: self.end.max(start),
            ..self
        }
    }

    pub fn with_end(self, end: usize) -> Self {
        Self {
            end: end.max(self.start),
            ..self
        }
    }

    pub fn with_generated_by(self, responsible: Option<NodeId>) -> Self {
        Self {
            generated_by: responsible,
            ..self
        }
    }

    /// Apply `f` to both offsets, keeping the generated marker.
    ///
    /// Unplaced positions are returned unchanged.
    pub fn map(self, mut f: impl FnMut(usize) -> usize) -> Self {
        if self.is_unplaced() {
            return self;
        }
        let start = f(self.start);
        Self {
            start,
            end: f(self.end).max(start),
            generated_by: self.generated_by,
        }
    }

    /// The span as a `TextRange`, or `None` when unplaced or out of `u32` range.
    pub fn range(&self) -> Option<TextRange> {
        if self.is_unplaced() {
            return None;
        }
        let start = u32::try_from(self.start).ok()?;
        let end = u32::try_from(self.end).ok()?;
        Some(TextRange::new(TextSize::new(start), TextSize::new(end)))
    }

    /// Slice `text` by this span, if it is placed and in bounds.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.is_unplaced() {
            return None;
        }
        text.get(self.start..self.end)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::UNPLACED
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unplaced() {
            return f.write_str("[unplaced]");
        }
        write!(f, "[{}, {})", self.start, self.end)?;
        if let Some(by) = self.generated_by {
            write!(f, " generated by {by}")?;
        }
        Ok(())
    }
}
