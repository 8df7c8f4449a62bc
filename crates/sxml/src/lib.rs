//! XML parsing with exact source positions and rich diagnostics.
//!
//! The parser builds a plain document tree and, alongside it, a
//! [`Positioner`] that can resolve any node back to its line/column
//! span in the original text. Diagnostics rendered against those spans
//! show a line-numbered excerpt with a caret underline:
//!
//! ```text
//! Warning (XML validation)
//!  2| <list>
//!  3|     <list foo="&amp;"/>
//!               ^^^^^^^^^^^ unexpected attribute
//!
//!  4| </list>
//! ```
//!
//! # Example
//!
//! ```rust
//! use sxml::parse;
//!
//! let doc = parse(r#"<style version="1.0">
//!   <macro name="author"/>
//! </style>"#).unwrap();
//!
//! assert_eq!(doc.document.root.name, "style");
//! assert_eq!(doc.document.root.get_attribute("version"), Some("1.0"));
//!
//! let inner = doc.document.root.child_elements().next().unwrap();
//! let position = doc.positioner.start_position_of(inner);
//! assert_eq!((position.line, position.column), (2, 3));
//! ```
//!
//! Parsing never panics on malformed input: grammar violations surface
//! as a fatal [`XmlError`] carrying the rendered diagnostic and the
//! positions recorded up to the failure. Validation layered on top
//! reports through a [`Reporter`], which delivers messages of any
//! severity to a [`MessageSink`].

pub mod error;
pub mod parser;
pub mod positioner;
mod recorder;
pub mod reporter;
pub mod types;

pub use error::{Result, XmlError};
pub use parser::{ParseOptions, parse, parse_with};
pub use positioner::{PositionedDocument, Positioner};
pub use reporter::{At, Reporter};
pub use types::{Attribute, Document, Element, Located, NodeId, TextRun, XmlNode};

pub use sxml_error_reporting::{
    CollectingSink, Diagnostic, MessageFormat, MessageSink, MessageSpec, ReportConfig,
    Severity, SinkEntry, TracingSink, WriterSink, kind,
};
pub use sxml_source_map::{OutOfRange, Position, SourceText, Span};
