//! Source position types for location tracking.
//!
//! The scanner stamps every token with the position of its first byte, and
//! diagnostics carry the same type so they can point back into the source.

use std::fmt;

/// A 1-based line number.
pub type Line = u32;

/// A column number. Column 0 is reserved for "before the first character".
pub type Column = u32;

/// A line and column in source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SourcePos {
    /// The line, starting at 1.
    pub line: Line,
    /// The column, starting at 1 for the first character of a line.
    pub column: Column,
}

impl SourcePos {
    /// Create a new source position.
    #[inline]
    pub fn new(line: Line, column: Column) -> Self {
        debug_assert!(line >= 1);
        Self { line, column }
    }

    /// The position of the first character of a source text.
    #[inline]
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// The position immediately after a character at this position,
    /// on the same line.
    #[inline]
    pub fn advance(self, width: Column) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_add(width),
        }
    }

    /// The first column of the following line.
    #[inline]
    pub fn next_line(self) -> Self {
        Self {
            line: self.line.saturating_add(1),
            column: 1,
        }
    }
}

impl Default for SourcePos {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Debug for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
