//! Source position tracking for the sxml crates.
//!
//! Converts between byte offsets and 1-based line/column positions and
//! serves line content for diagnostic snippets. Line breaks are indexed
//! once at construction; all queries after that are cheap.

mod source_text;
mod types;

pub use source_text::{OutOfRange, SourceText};
pub use types::{Position, Span};
