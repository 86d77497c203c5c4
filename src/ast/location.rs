use std::fmt;

/// A point in the source text.
///
/// Lines and columns both start at 1. Positions order lexicographically, line
/// first, so `begin <= end` holds for every well-formed [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line:   usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and a column.
    ///
    /// # Example
    /// ```
    /// use fhll::ast::location::Position;
    ///
    /// assert!(Position::new(1, 9) < Position::new(2, 1));
    /// ```
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A closed range of the source text, from the first character of a
/// construct to its last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Position of the first character.
    pub begin: Position,
    /// Position of the last character.
    pub end:   Position,
}

impl Location {
    /// Creates a location spanning `begin..=end`.
    #[must_use]
    pub const fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    /// A zero-width location at a single position.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self { begin: position,
               end:   position, }
    }

    /// Returns the location covering `self` through `other`.
    ///
    /// # Example
    /// ```
    /// use fhll::ast::location::{Location, Position};
    ///
    /// let left = Location::new(Position::new(1, 1), Position::new(1, 3));
    /// let right = Location::new(Position::new(1, 7), Position::new(1, 9));
    ///
    /// assert_eq!(left.to(right), Location::new(Position::new(1, 1), Position::new(1, 9)));
    /// ```
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self { begin: self.begin.min(other.begin),
               end:   self.end.max(other.end), }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.begin)
    }
}

/// Anything that knows which part of the source it came from.
pub trait Located {
    /// The span of source text this node was built from.
    fn location(&self) -> Location;
}
