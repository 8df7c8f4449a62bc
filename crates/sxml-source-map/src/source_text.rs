//! Immutable source text with a precomputed line-break table.
//!
//! [`SourceText`] is built once per document and answers offset/position
//! queries in O(log n) via binary search over the line-start offsets.

use crate::types::{Position, Span};
use memchr::memchr_iter;
use std::sync::Arc;
use thiserror::Error;

/// Returned by [`SourceText::position_to_offset`] when the requested
/// position does not exist in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position {position} does not exist in the source text")]
pub struct OutOfRange {
    pub position: Position,
}

/// A source document plus its line index.
///
/// The text is held behind an `Arc` so the same document can be shared
/// between a parse result and the diagnostics that refer back into it.
#[derive(Debug, Clone)]
pub struct SourceText {
    text: Arc<str>,
    /// Byte offset of the first character of each line. Always starts
    /// with 0; a trailing newline does not open a phantom final line.
    line_starts: Vec<usize>,
    uri: Option<String>,
}

impl SourceText {
    pub fn new(text: impl Into<Arc<str>>) -> SourceText {
        SourceText::build(text.into(), None)
    }

    pub fn with_uri(text: impl Into<Arc<str>>, uri: impl Into<String>) -> SourceText {
        SourceText::build(text.into(), Some(uri.into()))
    }

    fn build(text: Arc<str>, uri: Option<String>) -> SourceText {
        let mut line_starts = vec![0];
        for nl in memchr_iter(b'\n', text.as_bytes()) {
            if nl + 1 < text.len() {
                line_starts.push(nl + 1);
            }
        }
        SourceText {
            text,
            line_starts,
            uri,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines. An empty document still has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Maps a byte offset to its line/column position.
    ///
    /// Offsets past the end of the text clamp to the end-of-input
    /// position, and offsets inside a multi-byte character snap back to
    /// the start of that character.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self.text[line_start..offset].chars().count() + 1;
        Position {
            line: (line_idx + 1) as u32,
            column: column as u32,
        }
    }

    /// Maps a position back to the byte offset of the character it
    /// names. The end-of-input position (one past the last character)
    /// is valid and maps to `self.len()`.
    pub fn position_to_offset(&self, position: Position) -> Result<usize, OutOfRange> {
        let err = OutOfRange { position };
        if position.line == 0 || position.column == 0 {
            return Err(err);
        }
        let line_idx = (position.line - 1) as usize;
        let line_start = *self.line_starts.get(line_idx).ok_or(err)?;
        let line_end = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(self.text.len());
        let target = (position.column - 1) as usize;
        let mut seen = 0;
        for (rel, _) in self.text[line_start..line_end].char_indices() {
            if seen == target {
                return Ok(line_start + rel);
            }
            seen += 1;
        }
        // One past the last character is only addressable on the final
        // line, where it is the end-of-input position.
        if seen == target && line_end == self.text.len() {
            return Ok(line_end);
        }
        Err(err)
    }

    /// The content of a 1-based line, without its line terminator.
    pub fn line_content(&self, line: u32) -> Option<&str> {
        let line_idx = (line.checked_sub(1)?) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(self.text.len());
        let content = self.text[start..end]
            .strip_suffix('\n')
            .unwrap_or(&self.text[start..end]);
        Some(content.strip_suffix('\r').unwrap_or(content))
    }

    /// The position one past the last character of the text.
    pub fn end_position(&self) -> Position {
        self.offset_to_position(self.text.len())
    }

    /// Builds an inclusive span from a half-open byte range. The span
    /// ends on the last character strictly before `end`; a degenerate
    /// range collapses to a point at `start`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        let start_pos = self.offset_to_position(start);
        if end > start {
            Span::new(start_pos, self.offset_to_position(end - 1))
        } else {
            Span::point(start_pos)
        }
    }
}
