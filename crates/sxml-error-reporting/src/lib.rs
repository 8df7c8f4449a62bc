//! Diagnostic construction, rendering, and delivery for sxml.
//!
//! A message starts life as a [`MessageSpec`] (severity, span, text),
//! is rendered by a [`ReportConfig`] into one of three formats, and is
//! delivered to a [`MessageSink`]. Error and fatal messages are also
//! packaged as [`Diagnostic`] values so callers can hold on to both the
//! rendered text and the structured data behind it.

mod render;
mod severity;
mod sink;
mod spec;

pub use render::{MessageFormat, ReportConfig};
pub use severity::{Severity, kind};
pub use sink::{CollectingSink, MessageSink, SinkEntry, TracingSink, WriterSink};
pub use spec::{Diagnostic, MessageSpec};
