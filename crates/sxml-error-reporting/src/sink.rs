//! Destinations for rendered messages.

use crate::severity::Severity;
use std::io;

/// Receives every rendered message in emission order.
///
/// Sinks only see finished text; rendering decisions (format, context
/// lines, colors) are made upstream by
/// [`ReportConfig`](crate::ReportConfig), which consults
/// [`supports_ansi_colors`](MessageSink::supports_ansi_colors) before
/// rendering.
pub trait MessageSink {
    fn accept(&mut self, rendered: &str, severity: Severity, kind: Option<&str>);

    /// Whether color escapes should be embedded in messages rendered
    /// for this sink.
    fn supports_ansi_colors(&self) -> bool {
        false
    }
}

/// Writes each message to an [`io::Write`], one per line. Multi-line
/// messages keep their own trailing newline.
pub struct WriterSink<W: io::Write> {
    writer: W,
    colors: bool,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(writer: W) -> WriterSink<W> {
        WriterSink {
            writer,
            colors: false,
        }
    }

    pub fn with_colors(writer: W) -> WriterSink<W> {
        WriterSink {
            writer,
            colors: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> MessageSink for WriterSink<W> {
    fn accept(&mut self, rendered: &str, _severity: Severity, _kind: Option<&str>) {
        // A sink that cannot be written to cannot usefully report that
        // either; drop the error.
        let _ = self.writer.write_all(rendered.as_bytes());
        if !rendered.ends_with('\n') {
            let _ = self.writer.write_all(b"\n");
        }
    }

    fn supports_ansi_colors(&self) -> bool {
        self.colors
    }
}

/// One message captured by a [`CollectingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct SinkEntry {
    pub rendered: String,
    pub severity: Severity,
    pub kind: Option<String>,
}

/// Buffers messages in memory, mostly for tests and batch consumers.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Vec<SinkEntry>,
}

impl CollectingSink {
    pub fn new() -> CollectingSink {
        CollectingSink::default()
    }

    pub fn entries(&self) -> &[SinkEntry] {
        &self.entries
    }

    pub fn take_entries(&mut self) -> Vec<SinkEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any collected message is `Error` or worse.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.severity >= Severity::Error)
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.entries.iter().map(|entry| entry.severity).max()
    }
}

impl MessageSink for CollectingSink {
    fn accept(&mut self, rendered: &str, severity: Severity, kind: Option<&str>) {
        self.entries.push(SinkEntry {
            rendered: rendered.to_string(),
            severity,
            kind: kind.map(str::to_string),
        });
    }
}

/// Forwards messages to the `tracing` subscriber at a level matching
/// their severity.
#[derive(Debug, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn accept(&mut self, rendered: &str, severity: Severity, kind: Option<&str>) {
        match severity {
            Severity::Debug => tracing::debug!(kind, "{rendered}"),
            Severity::Info => tracing::info!(kind, "{rendered}"),
            Severity::Warning => tracing::warn!(kind, "{rendered}"),
            Severity::Error | Severity::Fatal => tracing::error!(kind, "{rendered}"),
        }
    }
}
