use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range of char offsets in a flattened document.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Interval {
    /// First offset covered by the interval.
    pub start: usize,
    /// First offset past the interval.
    pub end:   usize,
}

impl Interval {
    /// Creates a new interval. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "interval start {start} is past its end {end}");
        Self { start, end }
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for zero-width intervals.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A source position: 1-based line, 0-based column.
///
/// Line `0` is the linters' way of saying "no specific position".
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Default, PartialOrd, Ord)]
pub struct Position {
    /// The line number, starting from 1.
    pub line:   usize,
    /// The column number, starting from 0.
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self { line, column }
    }
}

/// Serialized as a `[line, column]` pair, matching the tabular output format.
impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.line, self.column).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <(usize, usize)>::deserialize(deserializer).map(Position::from)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
