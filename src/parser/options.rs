//! Parse configuration.

/// Switches for the post-processing a [`Source`](super::Source) runs after
/// the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Cut trailing whitespace and comments off node spans
    pub trim_positions: bool,
    /// Attach javadoc comments to the declaration they precede
    pub associate_javadoc: bool,
    /// Run the syntax checks over the result
    pub check_syntax: bool,
    /// Stop recording parse problems after this many and skip the rest
    pub max_problems: usize,
    /// Deepest nesting of statements and expressions the grammar descends into
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            trim_positions: true,
            associate_javadoc: true,
            check_syntax: false,
            max_problems: 100,
            max_depth: 100,
        }
    }
}

impl ParseOptions {
    /// Options that keep the grammar's raw spans and skip javadoc association.
    pub fn raw() -> Self {
        Self {
            trim_positions: false,
            associate_javadoc: false,
            ..Self::default()
        }
    }

    pub fn with_syntax_checks(mut self) -> Self {
        self.check_syntax = true;
        self
    }

    pub fn with_max_problems(mut self, max_problems: usize) -> Self {
        self.max_problems = max_problems.max(1);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
}
