//! Line/column coordinates used throughout the diagnostic pipeline.
//!
//! Both fields of [`Position`] are 1-based and count *characters*, not
//! bytes, so a position is stable regardless of how many multi-byte
//! characters precede it on the line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single point in a source document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, counted in characters.
    pub column: u32,
}

impl Position {
    /// The first character of a document.
    pub const START: Position = Position { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Position {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A contiguous range of source text.
///
/// `end` names the *last* character of the range, so a one-character
/// span has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Span {
        Span { start, end }
    }

    /// A zero-width span sitting on a single character.
    pub fn point(at: Position) -> Span {
        Span { start: at, end: at }
    }

    /// True if the span does not cross a line break.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let a = Position::new(1, 10);
        let b = Position::new(2, 1);
        let c = Position::new(2, 5);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(Position::START, Position::new(1, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 11).to_string(), "3:11");
        let span = Span::new(Position::new(3, 11), Position::new(3, 13));
        assert_eq!(span.to_string(), "3:11-3:13");
        assert_eq!(Span::point(Position::START).to_string(), "1:1");
    }

    #[test]
    fn test_serde_round_trip() {
        let span = Span::new(Position::new(2, 3), Position::new(4, 1));
        let json = serde_json::to_value(span).unwrap();
        assert_eq!(json["start"]["line"], 2);
        assert_eq!(json["end"]["column"], 1);
        let back: Span = serde_json::from_value(json).unwrap();
        assert_eq!(back, span);
    }
}
