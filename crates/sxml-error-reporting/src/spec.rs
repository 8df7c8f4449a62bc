//! The structured description of a message and its rendered form.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use sxml_source_map::{Position, Span};

/// Everything needed to render one message: where it points, how bad it
/// is, and what it says. Rendering is done by
/// [`ReportConfig`](crate::ReportConfig); this type is pure data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSpec {
    pub severity: Severity,
    /// Primary span the caret line points at.
    pub span: Span,
    pub message: String,
    /// Optional kind tag, e.g. [`kind::PARSING`](crate::kind::PARSING).
    pub kind: Option<String>,
    /// Additional spans related to the message. Carried for consumers
    /// that want them; the text renderer only draws the primary span.
    pub secondary_spans: Vec<Span>,
}

impl MessageSpec {
    pub fn new(severity: Severity, span: Span, message: impl Into<String>) -> MessageSpec {
        MessageSpec {
            severity,
            span,
            message: message.into(),
            kind: None,
            secondary_spans: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> MessageSpec {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_secondary_span(mut self, span: Span) -> MessageSpec {
        self.secondary_spans.push(span);
        self
    }

    /// Where the message points, i.e. the start of its primary span.
    pub fn position(&self) -> Position {
        self.span.start
    }
}

/// A fully rendered message paired with the spec it was rendered from.
///
/// `Diagnostic` is the value returned for error and fatal reports; its
/// `Display` is the rendered text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    rendered: String,
    spec: MessageSpec,
}

impl Diagnostic {
    pub fn new(rendered: String, spec: MessageSpec) -> Diagnostic {
        Diagnostic { rendered, spec }
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn spec(&self) -> &MessageSpec {
        &self.spec
    }

    pub fn severity(&self) -> Severity {
        self.spec.severity
    }

    pub fn kind(&self) -> Option<&str> {
        self.spec.kind.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.spec.message
    }

    pub fn position(&self) -> Position {
        self.spec.position()
    }

    /// JSON form for machine consumers.
    pub fn to_json(&self) -> Value {
        json!({
            "severity": self.spec.severity,
            "kind": self.spec.kind,
            "span": self.spec.span,
            "secondary_spans": self.spec.secondary_spans,
            "message": self.spec.message,
            "rendered": self.rendered,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::kind;

    fn sample_spec() -> MessageSpec {
        MessageSpec::new(
            Severity::Error,
            Span::new(Position::new(3, 11), Position::new(3, 13)),
            "unexpected attribute",
        )
        .with_kind(kind::USER_VALIDATION)
    }

    #[test]
    fn test_builder() {
        let spec = sample_spec();
        assert_eq!(spec.position(), Position::new(3, 11));
        assert_eq!(spec.kind.as_deref(), Some("XML validation"));
        assert!(spec.secondary_spans.is_empty());
    }

    #[test]
    fn test_to_json() {
        let diagnostic = Diagnostic::new("rendered text".to_string(), sample_spec());
        let value = diagnostic.to_json();
        assert_eq!(value["severity"], "error");
        assert_eq!(value["kind"], "XML validation");
        assert_eq!(value["span"]["start"]["line"], 3);
        assert_eq!(value["message"], "unexpected attribute");
        assert_eq!(value["rendered"], "rendered text");
    }

    #[test]
    fn test_display_is_rendered_text() {
        let diagnostic = Diagnostic::new("boom".to_string(), sample_spec());
        assert_eq!(diagnostic.to_string(), "boom");
    }
}
