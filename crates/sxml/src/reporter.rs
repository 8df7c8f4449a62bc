//! Node-addressed message reporting.
//!
//! [`Reporter`] ties a [`Positioner`], a [`ReportConfig`] and a
//! [`MessageSink`] together so callers can report against *nodes*
//! instead of computing positions themselves. Reporting is two-stage:
//! [`Reporter::at`] captures the location, the severity method on the
//! returned [`At`] finishes the message.
//!
//! ```no_run
//! # use sxml::{parse, Reporter, ReportConfig, CollectingSink, kind};
//! let doc = parse("<a><b/></a>")?;
//! let config = ReportConfig::default();
//! let mut sink = CollectingSink::new();
//! let mut reporter = Reporter::new(&doc.positioner, &config, &mut sink);
//! let b = doc.document.root.child_elements().next().unwrap();
//! reporter.at(b).kind(kind::USER_VALIDATION).warn("suspicious element");
//! # Ok::<(), sxml::XmlError>(())
//! ```

use crate::positioner::Positioner;
use crate::types::Located;
use sxml_error_reporting::{
    Diagnostic, MessageSink, MessageSpec, ReportConfig, Severity,
};
use sxml_source_map::{Position, Span};

pub struct Reporter<'a> {
    positioner: &'a Positioner,
    config: &'a ReportConfig,
    sink: &'a mut dyn MessageSink,
}

impl<'a> Reporter<'a> {
    pub fn new(
        positioner: &'a Positioner,
        config: &'a ReportConfig,
        sink: &'a mut dyn MessageSink,
    ) -> Reporter<'a> {
        Reporter {
            positioner,
            config,
            sink,
        }
    }

    /// Starts a message pointing at `node`'s full span.
    pub fn at(&mut self, node: &impl Located) -> At<'_, 'a> {
        let span = self.positioner.span_of(node);
        self.at_span(span)
    }

    /// Starts a message pointing at an explicit span.
    pub fn at_span(&mut self, span: Span) -> At<'_, 'a> {
        At {
            span,
            kind: None,
            extra: Vec::new(),
            reporter: self,
        }
    }

    /// Starts a message pointing at a single position.
    pub fn at_position(&mut self, position: Position) -> At<'_, 'a> {
        self.at_span(Span::point(position))
    }
}

/// A captured location waiting for its message. Consumed by exactly one
/// severity method.
#[must_use = "a location does nothing until a severity method is called"]
pub struct At<'r, 'a> {
    span: Span,
    kind: Option<String>,
    extra: Vec<Span>,
    reporter: &'r mut Reporter<'a>,
}

impl At<'_, '_> {
    /// Tags the message with a kind, e.g.
    /// [`kind::SCHEMA_VALIDATION`](sxml_error_reporting::kind).
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Adds a related span carried alongside the primary one.
    pub fn related(mut self, span: Span) -> Self {
        self.extra.push(span);
        self
    }

    pub fn debug(self, message: impl Into<String>) {
        self.emit(Severity::Debug, message.into());
    }

    pub fn info(self, message: impl Into<String>) {
        self.emit(Severity::Info, message.into());
    }

    pub fn warn(self, message: impl Into<String>) {
        self.emit(Severity::Warning, message.into());
    }

    /// Reports at error severity; the diagnostic is returned so the
    /// caller can abort with it.
    pub fn error(self, message: impl Into<String>) -> Diagnostic {
        self.emit(Severity::Error, message.into())
    }

    pub fn fatal(self, message: impl Into<String>) -> Diagnostic {
        self.emit(Severity::Fatal, message.into())
    }

    fn emit(self, severity: Severity, message: String) -> Diagnostic {
        let mut spec = MessageSpec::new(severity, self.span, message);
        spec.kind = self.kind;
        spec.secondary_spans = self.extra;
        let reporter = self.reporter;
        let colors = reporter.sink.supports_ansi_colors();
        let diagnostic =
            reporter
                .config
                .diagnostic(spec, reporter.positioner.source(), colors);
        reporter
            .sink
            .accept(diagnostic.rendered(), severity, diagnostic.kind());
        diagnostic
    }
}
