//! The streaming parser.
//!
//! Wraps quick-xml's pull parser and records byte offsets for every
//! construct as events arrive. Offsets are captured from
//! `buffer_position()` before and after each event, so a node's span
//! covers exactly the markup that produced it. Attribute name/value
//! offsets are recovered by scanning the raw tag text, since quick-xml
//! does not report them.

use crate::error::{Result, XmlError};
use crate::positioner::PositionedDocument;
use crate::recorder::{Fallback, LocationRecorder};
use crate::types::{Attribute, Document, Element, NodeId, TextRun, XmlNode};
use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use sxml_error_reporting::{
    MessageSink, MessageSpec, ReportConfig, Severity, kind,
};
use sxml_source_map::{SourceText, Span};

/// Knobs controlling how a document is parsed.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Merge adjacent text and CDATA runs into a single text node.
    pub coalesce_text: bool,
    /// Copy the nearest ancestor's default-namespace declaration onto
    /// elements that do not declare one themselves. Synthesized
    /// attributes are marked as such and report at their element's
    /// position.
    pub inherit_default_ns: bool,
    /// Encoding the document is expected to declare. A conflicting
    /// declaration in the XML prolog fails the parse.
    pub declared_encoding: Option<String>,
    /// Identifier of the document shown in diagnostics, typically a
    /// path or URL.
    pub uri: Option<String>,
}

/// Parses `content` with default options, discarding non-fatal
/// messages.
pub fn parse(content: &str) -> Result<PositionedDocument> {
    let mut sink = DiscardSink;
    parse_with(
        content,
        &ParseOptions::default(),
        &ReportConfig::default(),
        &mut sink,
    )
}

/// Parses `content`, delivering messages to `sink` as they are
/// rendered.
///
/// A grammar violation stops the parse: the fatal diagnostic is
/// delivered to the sink and also returned as the error, together with
/// the positions recorded before the failure.
pub fn parse_with(
    content: &str,
    options: &ParseOptions,
    config: &ReportConfig,
    sink: &mut dyn MessageSink,
) -> Result<PositionedDocument> {
    let source = match &options.uri {
        Some(uri) => SourceText::with_uri(content, uri.clone()),
        None => SourceText::new(content),
    };
    let parser = XmlParser::new(content, options);
    let (positioner, outcome) = parser.run(source);
    match outcome {
        Ok(document) => {
            tracing::debug!(
                uri = positioner.source().uri(),
                "parsed document with root <{}>",
                document.root.qualified_name()
            );
            Ok(PositionedDocument {
                document,
                positioner,
            })
        }
        Err(issue) => {
            let span = Span::point(positioner.source().offset_to_position(issue.offset));
            let spec = MessageSpec::new(Severity::Fatal, span, issue.message)
                .with_kind(kind::PARSING);
            let colors = sink.supports_ansi_colors();
            let diagnostic = config.diagnostic(spec, positioner.source(), colors);
            if issue.report {
                sink.accept(diagnostic.rendered(), Severity::Fatal, diagnostic.kind());
            }
            Err(XmlError {
                diagnostic,
                positioner,
            })
        }
    }
}

/// Sink used by the [`parse`] shorthand.
struct DiscardSink;

impl MessageSink for DiscardSink {
    fn accept(&mut self, _rendered: &str, _severity: Severity, _kind: Option<&str>) {}
}

/// A grammar violation, positioned but not yet rendered.
struct Issue {
    message: String,
    offset: usize,
    /// Encoding mismatches are thrown without passing through the
    /// sink; everything else is reported first.
    report: bool,
}

impl Issue {
    fn fatal(message: impl Into<String>, offset: usize) -> Issue {
        Issue {
            message: message.into(),
            offset,
            report: true,
        }
    }

    fn thrown_only(message: impl Into<String>, offset: usize) -> Issue {
        Issue {
            message: message.into(),
            offset,
            report: false,
        }
    }
}

/// Text accumulated for the current element while coalescing.
struct PendingText {
    content: String,
    start: usize,
    end: usize,
}

/// An element whose closing tag has not been seen yet.
struct BuildNode {
    id: NodeId,
    name: String,
    prefix: Option<String>,
    attributes: Vec<Attribute>,
    children: Vec<XmlNode>,
    /// Default namespace in scope at this element, declared or
    /// inherited.
    default_ns: Option<String>,
    pending: Option<PendingText>,
}

impl BuildNode {
    fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

struct XmlParser<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    options: &'a ParseOptions,
    recorder: LocationRecorder,
    stack: Vec<BuildNode>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str, options: &'a ParseOptions) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            options,
            recorder: LocationRecorder::default(),
            stack: Vec::new(),
        }
    }

    /// Runs the parse to completion. The positioner is produced even on
    /// failure so the error can point into the source.
    fn run(
        mut self,
        source_text: SourceText,
    ) -> (crate::Positioner, std::result::Result<Document, Issue>) {
        let document_id = self.recorder.open(0);
        let outcome = self.parse(document_id);
        self.recorder.close(document_id, self.source.len());
        (self.recorder.freeze(source_text), outcome)
    }

    fn parse(&mut self, document_id: NodeId) -> std::result::Result<Document, Issue> {
        let mut root: Option<Element> = None;

        loop {
            // Capture position before reading the event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(e, event_start)?;
                }
                Ok(Event::Decl(e)) => {
                    self.check_encoding(&e, event_start)?;
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {
                    // Not part of the tree, but they do break up
                    // adjacent text runs.
                    self.flush_pending();
                }
                Ok(Event::Eof) => break,
                Err(err) => {
                    let offset = self.reader.error_position() as usize;
                    return Err(Issue::fatal(err.to_string(), offset));
                }
            }
        }

        if let Some(node) = self.stack.last() {
            return Err(Issue::fatal(
                format!(
                    "Premature end of file, expected closing tag </{}>.",
                    node.qualified_name()
                ),
                self.source.len(),
            ));
        }

        match root {
            Some(element) => Ok(Document {
                id: document_id,
                root: element,
            }),
            None => Err(Issue::fatal("Premature end of file.", self.source.len())),
        }
    }

    fn attach(
        &mut self,
        element: Element,
        root: &mut Option<Element>,
    ) -> std::result::Result<(), Issue> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(XmlNode::Element(element));
        } else if root.is_some() {
            let offset = self.recorder.start_of(element.id).unwrap_or(0);
            return Err(Issue::fatal("Multiple root elements.", offset));
        } else {
            *root = Some(element);
        }
        Ok(())
    }

    fn handle_start(
        &mut self,
        e: BytesStart<'_>,
        event_start: usize,
    ) -> std::result::Result<(), Issue> {
        self.flush_pending();

        let (name, prefix) = split_qname(e.name().as_ref());
        let id = self.recorder.open(event_start);
        let mut attributes = self.parse_attributes(&e, event_start)?;
        let default_ns = self.default_ns_for(&mut attributes, id);

        self.stack.push(BuildNode {
            id,
            name,
            prefix,
            attributes,
            children: Vec::new(),
            default_ns,
            pending: None,
        });

        Ok(())
    }

    fn handle_end(
        &mut self,
        e: BytesEnd<'_>,
        event_start: usize,
    ) -> std::result::Result<Element, Issue> {
        self.flush_pending();

        let end_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let node = self.stack.pop().ok_or_else(|| {
            Issue::fatal(format!("Unexpected closing tag </{end_name}>."), event_start)
        })?;

        // quick-xml rejects mismatched closing tags itself; this is the
        // backstop for the local-vs-qualified name edge.
        if node.qualified_name() != end_name {
            return Err(Issue::fatal(
                format!(
                    "Mismatched closing tag: expected </{}>, found </{end_name}>.",
                    node.qualified_name()
                ),
                event_start,
            ));
        }

        let end_offset = self.reader.buffer_position() as usize;
        self.recorder.close(node.id, end_offset);

        Ok(Element {
            id: node.id,
            name: node.name,
            prefix: node.prefix,
            attributes: node.attributes,
            children: node.children,
        })
    }

    fn handle_empty(
        &mut self,
        e: BytesStart<'_>,
        event_start: usize,
    ) -> std::result::Result<Element, Issue> {
        self.flush_pending();

        let (name, prefix) = split_qname(e.name().as_ref());
        let id = self.recorder.open(event_start);
        let mut attributes = self.parse_attributes(&e, event_start)?;
        let _ = self.default_ns_for(&mut attributes, id);

        let end_offset = self.reader.buffer_position() as usize;
        self.recorder.close(id, end_offset);

        Ok(Element {
            id,
            name,
            prefix,
            attributes,
            children: Vec::new(),
        })
    }

    /// Resolves the default namespace in scope for an element with the
    /// given attributes, synthesizing an inherited `xmlns` attribute
    /// when enabled.
    fn default_ns_for(
        &mut self,
        attributes: &mut Vec<Attribute>,
        owner: NodeId,
    ) -> Option<String> {
        let declared = attributes
            .iter()
            .find(|attr| attr.prefix.is_none() && attr.name == "xmlns")
            .map(|attr| attr.value.clone());
        let inherited = self
            .stack
            .last()
            .and_then(|node| node.default_ns.clone());

        if self.options.inherit_default_ns && declared.is_none() {
            if let Some(ns) = &inherited {
                let id = self.recorder.record_fallback(Fallback::StartOf(owner));
                attributes.push(Attribute {
                    id,
                    name: "xmlns".to_string(),
                    prefix: None,
                    value: ns.clone(),
                    synthesized: true,
                });
            }
        }

        declared.or(inherited)
    }

    fn handle_text(
        &mut self,
        e: BytesText<'_>,
        event_start: usize,
    ) -> std::result::Result<(), Issue> {
        let text = e
            .unescape()
            .map_err(|err| Issue::fatal(format!("Invalid text content: {err}"), event_start))?;
        let end_offset = self.reader.buffer_position() as usize;
        self.push_text(text.into_owned(), event_start, end_offset)
    }

    fn handle_cdata(
        &mut self,
        e: BytesCData<'_>,
        event_start: usize,
    ) -> std::result::Result<(), Issue> {
        // CDATA content is literal; nothing to unescape.
        let text = String::from_utf8_lossy(&e).into_owned();
        let end_offset = self.reader.buffer_position() as usize;
        if self.options.coalesce_text {
            return self.push_text(text, event_start, end_offset);
        }
        if let Some(node) = self.stack.last_mut() {
            let id = self.recorder.record_span(event_start, end_offset);
            node.children.push(XmlNode::Text(TextRun {
                id,
                content: text,
                cdata: true,
            }));
        }
        Ok(())
    }

    fn push_text(
        &mut self,
        text: String,
        start: usize,
        end: usize,
    ) -> std::result::Result<(), Issue> {
        // Text outside the root element is prolog/epilog whitespace.
        let Some(node) = self.stack.last_mut() else {
            return Ok(());
        };

        if self.options.coalesce_text {
            if let Some(pending) = node.pending.as_mut() {
                // Adjacent run joins the open one, whitespace included.
                pending.content.push_str(&text);
                pending.end = end;
                return Ok(());
            }
        }

        if text.trim().is_empty() {
            return Ok(());
        }

        if self.options.coalesce_text {
            node.pending = Some(PendingText {
                content: text,
                start,
                end,
            });
        } else {
            let id = self.recorder.record_span(start, end);
            node.children.push(XmlNode::Text(TextRun {
                id,
                content: text,
                cdata: false,
            }));
        }
        Ok(())
    }

    /// Closes the open text run of the innermost element, if any.
    fn flush_pending(&mut self) {
        if let Some(node) = self.stack.last_mut() {
            if let Some(pending) = node.pending.take() {
                let id = self.recorder.record_span(pending.start, pending.end);
                node.children.push(XmlNode::Text(TextRun {
                    id,
                    content: pending.content,
                    cdata: false,
                }));
            }
        }
    }

    fn check_encoding(
        &mut self,
        decl: &BytesDecl<'_>,
        event_start: usize,
    ) -> std::result::Result<(), Issue> {
        let Some(expected) = &self.options.declared_encoding else {
            return Ok(());
        };
        if let Some(Ok(declared)) = decl.encoding() {
            let declared = String::from_utf8_lossy(&declared);
            if !declared.eq_ignore_ascii_case(expected) {
                return Err(Issue::thrown_only(
                    format!(
                        "Declared encoding '{declared}' does not match expected encoding '{expected}'."
                    ),
                    event_start,
                ));
            }
        }
        Ok(())
    }

    fn parse_attributes(
        &mut self,
        e: &BytesStart<'_>,
        tag_start: usize,
    ) -> std::result::Result<Vec<Attribute>, Issue> {
        let mut attributes = Vec::new();

        // The tag content starts after the '<'.
        let content_start = tag_start + 1;
        let tag_str = String::from_utf8_lossy(e.as_ref()).into_owned();

        // Names are searched left to right, starting after the element
        // name and resuming after each attribute found.
        let mut search_from = e.name().as_ref().len();

        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| attr_issue(err, content_start, tag_start))?;

            let full_name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let (name, prefix) = split_qname(attr.key.as_ref());

            let value = attr.unescape_value().map_err(|err| {
                Issue::fatal(format!("Invalid attribute value: {err}"), tag_start)
            })?;

            let id = match find_attribute_offsets(&tag_str, search_from, &full_name) {
                Some((name_range, value_range)) => {
                    search_from = value_range.1.max(name_range.1);
                    self.recorder.record_attribute(
                        (content_start + name_range.0, content_start + name_range.1),
                        (content_start + value_range.0, content_start + value_range.1),
                    )
                }
                // Not present literally in the tag text; report at the
                // opening '<'.
                None => self
                    .recorder
                    .record_attribute((tag_start, tag_start + 1), (tag_start, tag_start + 1)),
            };

            attributes.push(Attribute {
                id,
                name,
                prefix,
                value: value.into_owned(),
                synthesized: false,
            });
        }

        Ok(attributes)
    }
}

/// Maps a quick-xml attribute error to an issue pointing at the
/// offending byte. quick-xml reports offsets relative to the tag
/// content.
fn attr_issue(err: AttrError, content_start: usize, tag_start: usize) -> Issue {
    let offset = match &err {
        AttrError::ExpectedEq(pos)
        | AttrError::ExpectedValue(pos)
        | AttrError::UnquotedValue(pos)
        | AttrError::ExpectedQuote(pos, _)
        | AttrError::Duplicated(pos, _) => content_start + pos,
        _ => tag_start,
    };
    Issue::fatal(err.to_string(), offset)
}

/// Splits a qualified name into `(local, prefix)`.
fn split_qname(raw: &[u8]) -> (String, Option<String>) {
    let full = String::from_utf8_lossy(raw);
    match full.find(':') {
        Some(pos) => (full[pos + 1..].to_string(), Some(full[..pos].to_string())),
        None => (full.into_owned(), None),
    }
}

/// Locates an attribute's name and value (quotes included) in the raw
/// tag text, as byte ranges relative to the tag content. Searching
/// starts at `search_from` so repeated names resolve in order.
fn find_attribute_offsets(
    tag_str: &str,
    search_from: usize,
    attr_name: &str,
) -> Option<((usize, usize), (usize, usize))> {
    let rel = tag_str[search_from..].find(attr_name)?;
    let name_start = search_from + rel;
    let name_end = name_start + attr_name.len();

    let mut cursor = name_end;
    let bytes = tag_str.as_bytes();
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if cursor < bytes.len() && bytes[cursor] == b'=' {
        cursor += 1;
    }
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }

    let value_range = match bytes.get(cursor).copied() {
        Some(quote @ (b'"' | b'\'')) => {
            match tag_str[cursor + 1..].find(quote as char) {
                Some(close) => (cursor, cursor + 1 + close + 1),
                // Unclosed quote; cover what is there.
                None => (cursor, tag_str.len()),
            }
        }
        Some(_) => {
            let end = tag_str[cursor..]
                .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .map_or(tag_str.len(), |p| cursor + p);
            (cursor, end)
        }
        // No value written; fall back to the name.
        None => (name_start, name_end),
    };

    Some(((name_start, name_end), value_range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxml_source_map::Position;

    const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>";

    #[test]
    fn test_parse_simple_document() {
        let doc = parse("<root><child>hello</child></root>").unwrap();
        let root = &doc.document.root;
        assert_eq!(root.name, "root");
        assert_eq!(root.children.len(), 1);
        let child = root.child_elements().next().unwrap();
        assert_eq!(child.name, "child");
        assert_eq!(child.text(), Some("hello"));
    }

    #[test]
    fn test_element_spans() {
        let doc = parse("<a>\n  <b/>\n</a>").unwrap();
        let positioner = &doc.positioner;
        let root = &doc.document.root;
        assert_eq!(positioner.start_position_of(root), Position::new(1, 1));
        assert_eq!(positioner.end_position_of(root), Position::new(3, 4));
        let b = root.child_elements().next().unwrap();
        let span = positioner.span_of(b);
        assert_eq!(span.start, Position::new(2, 3));
        assert_eq!(span.end, Position::new(2, 6));
    }

    #[test]
    fn test_document_spans_whole_source() {
        let source = "<a>x</a>";
        let doc = parse(source).unwrap();
        let span = doc.positioner.span_of(&doc.document);
        assert_eq!(span.start, Position::new(1, 1));
        assert_eq!(span.end, Position::new(1, source.len() as u32));
    }

    #[test]
    fn test_attribute_positions() {
        let source = format!("{HEADER}\n<list>\n    <list foo=\"&amp;\"/>\n</list>");
        let doc = parse(&source).unwrap();
        let inner = doc.document.root.child_elements().next().unwrap();
        let attr = inner.attribute("foo").unwrap();
        assert_eq!(attr.value, "&");
        let name_span = doc.positioner.name_span_of(attr);
        assert_eq!(name_span.start, Position::new(3, 11));
        assert_eq!(name_span.end, Position::new(3, 13));
        let value_span = doc.positioner.value_span_of(attr);
        assert_eq!(value_span.start, Position::new(3, 15));
        assert_eq!(value_span.end, Position::new(3, 21));
        let full = doc.positioner.span_of(attr);
        assert_eq!(full.start, Position::new(3, 11));
        assert_eq!(full.end, Position::new(3, 21));
    }

    #[test]
    fn test_qualified_attribute_name_span() {
        let doc = parse("<a xsi:foo=\"1\"/>").unwrap();
        let attr = &doc.document.root.attributes[0];
        assert_eq!(attr.name, "foo");
        assert_eq!(attr.prefix.as_deref(), Some("xsi"));
        assert_eq!(attr.qualified_name(), "xsi:foo");
        let span = doc.positioner.name_span_of(attr);
        // The span covers the full qualified name, prefix included.
        assert_eq!(span.start, Position::new(1, 4));
        assert_eq!(span.end, Position::new(1, 10));
    }

    #[test]
    fn test_repeated_attribute_names_resolve_in_order() {
        let doc = parse("<a b:x=\"1\" c:x=\"2\"/>").unwrap();
        let attrs = &doc.document.root.attributes;
        assert_eq!(attrs.len(), 2);
        let first = doc.positioner.name_span_of(&attrs[0]);
        let second = doc.positioner.name_span_of(&attrs[1]);
        assert_eq!(first.start, Position::new(1, 4));
        assert_eq!(second.start, Position::new(1, 12));
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let doc = parse("<a>\n  <b/>\n  <c/>\n</a>").unwrap();
        assert_eq!(doc.document.root.children.len(), 2);
        assert!(doc
            .document
            .root
            .children
            .iter()
            .all(|child| matches!(child, XmlNode::Element(_))));
    }

    #[test]
    fn test_text_and_cdata_stay_separate_by_default() {
        let doc = parse("<a>text<![CDATA[cdata]]></a>").unwrap();
        let children = &doc.document.root.children;
        assert_eq!(children.len(), 2);
        let (first, second) = match (&children[0], &children[1]) {
            (XmlNode::Text(first), XmlNode::Text(second)) => (first, second),
            other => panic!("expected two text runs, got {other:?}"),
        };
        assert_eq!(first.content, "text");
        assert!(!first.cdata);
        assert_eq!(second.content, "cdata");
        assert!(second.cdata);
        // Spans are disjoint and in order.
        let a = doc.positioner.span_of(first);
        let b = doc.positioner.span_of(second);
        assert_eq!(a.start, Position::new(1, 4));
        assert_eq!(a.end, Position::new(1, 7));
        assert_eq!(b.start, Position::new(1, 8));
        assert_eq!(b.end, Position::new(1, 24));
        assert!(a.end < b.start);
    }

    #[test]
    fn test_coalescing_merges_adjacent_runs() {
        let options = ParseOptions {
            coalesce_text: true,
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let doc = parse_with(
            "<a>text<![CDATA[cdata]]></a>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap();
        let children = &doc.document.root.children;
        assert_eq!(children.len(), 1);
        let XmlNode::Text(run) = &children[0] else {
            panic!("expected a text run");
        };
        assert_eq!(run.content, "textcdata");
        let span = doc.positioner.span_of(run);
        assert_eq!(span.start, Position::new(1, 4));
        // Ends at the '>' closing the CDATA section.
        assert_eq!(span.end, Position::new(1, 24));
    }

    #[test]
    fn test_coalescing_keeps_interior_whitespace() {
        let options = ParseOptions {
            coalesce_text: true,
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let doc = parse_with(
            "<a><![CDATA[x]]> <![CDATA[y]]></a>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap();
        let children = &doc.document.root.children;
        assert_eq!(children.len(), 1);
        let XmlNode::Text(run) = &children[0] else {
            panic!("expected a text run");
        };
        assert_eq!(run.content, "x y");
    }

    #[test]
    fn test_comment_breaks_coalescing() {
        let options = ParseOptions {
            coalesce_text: true,
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let doc = parse_with(
            "<a>one<!-- split -->two</a>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap();
        assert_eq!(doc.document.root.children.len(), 2);
    }

    #[test]
    fn test_inherited_default_namespace() {
        let options = ParseOptions {
            inherit_default_ns: true,
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let doc = parse_with(
            "<root xmlns=\"urn:x\">\n  <child/>\n</root>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap();
        let child = doc.document.root.child_elements().next().unwrap();
        let xmlns = child.attribute("xmlns").unwrap();
        assert!(xmlns.synthesized);
        assert_eq!(xmlns.value, "urn:x");
        // The synthesized attribute reports at its element's start.
        assert_eq!(
            doc.positioner.start_position_of(xmlns),
            doc.positioner.start_position_of(child)
        );
        assert_eq!(
            doc.positioner.start_position_of(xmlns),
            Position::new(2, 3)
        );
    }

    #[test]
    fn test_default_namespace_not_inherited_by_default() {
        let doc = parse("<root xmlns=\"urn:x\">\n  <child/>\n</root>").unwrap();
        let child = doc.document.root.child_elements().next().unwrap();
        assert!(child.attributes.is_empty());
    }

    #[test]
    fn test_declared_namespace_wins_over_inherited() {
        let options = ParseOptions {
            inherit_default_ns: true,
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let doc = parse_with(
            "<root xmlns=\"urn:x\"><child xmlns=\"urn:y\"/></root>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap();
        let child = doc.document.root.child_elements().next().unwrap();
        assert_eq!(child.attributes.len(), 1);
        assert!(!child.attributes[0].synthesized);
        assert_eq!(child.get_attribute("xmlns"), Some("urn:y"));
    }

    #[test]
    fn test_empty_document_fails_at_start() {
        let err = parse("").unwrap_err();
        assert_eq!(err.severity(), Severity::Fatal);
        assert_eq!(err.message(), "Premature end of file.");
        assert_eq!(err.position(), Position::new(1, 1));
        assert_eq!(
            err.to_string(),
            "Fatal error (XML parsing)\n 1| \n    ^ Premature end of file.\n\n"
        );
    }

    #[test]
    fn test_unclosed_element_names_expected_tag() {
        let err = parse("<list>\n  <item>").unwrap_err();
        assert_eq!(
            err.message(),
            "Premature end of file, expected closing tag </item>."
        );
        // Points at end of input.
        assert_eq!(err.position(), Position::new(2, 9));
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let err = parse("<a/>\n<b/>").unwrap_err();
        assert_eq!(err.message(), "Multiple root elements.");
        assert_eq!(err.position(), Position::new(2, 1));
    }

    #[test]
    fn test_encoding_mismatch_is_thrown_without_reporting() {
        let options = ParseOptions {
            declared_encoding: Some("UTF-8".to_string()),
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let err = parse_with(
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<a/>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap_err();
        assert!(err.message().contains("ISO-8859-1"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_matching_encoding_accepted_case_insensitively() {
        let options = ParseOptions {
            declared_encoding: Some("utf-8".to_string()),
            ..ParseOptions::default()
        };
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let doc = parse_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a/>",
            &options,
            &ReportConfig::default(),
            &mut sink,
        );
        assert!(doc.is_ok());
    }

    #[test]
    fn test_fatal_errors_reach_the_sink() {
        let mut sink = sxml_error_reporting::CollectingSink::new();
        let err = parse_with(
            "",
            &ParseOptions::default(),
            &ReportConfig::default(),
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(sink.entries().len(), 1);
        assert_eq!(sink.entries()[0].severity, Severity::Fatal);
        assert_eq!(sink.entries()[0].kind.as_deref(), Some("XML parsing"));
        assert_eq!(sink.entries()[0].rendered, err.to_string());
    }

    #[test]
    fn test_unterminated_start_tag() {
        let source = format!("{HEADER}\n<list>\n    <list\n        <str>oha</str>\n</list>");
        let err = parse(&source).unwrap_err();
        assert_eq!(err.severity(), Severity::Fatal);
        // Points at the '<' that interrupted the unterminated tag.
        assert_eq!(err.position().line, 4);
        let rendered = err.to_string();
        assert!(rendered.starts_with("Fatal error (XML parsing)\n"));
        assert!(rendered.contains(" 4|         <str>oha</str>\n"));
    }

    #[test]
    fn test_error_retains_partial_positions() {
        let err = parse("<a><b></b>").unwrap_err();
        let positioner = err.positioner();
        // The document record covers what was consumed.
        assert_eq!(positioner.source().text(), "<a><b></b>");
        assert_eq!(
            positioner.source().offset_to_position(3),
            Position::new(1, 4)
        );
    }

    #[test]
    fn test_positions_survive_tree_drop() {
        let doc = parse("<a><b/></a>").unwrap();
        let positioner = doc.positioner.clone();
        let b_id_span = {
            let b = doc.document.root.child_elements().next().unwrap();
            positioner.span_of(b)
        };
        drop(doc);
        assert_eq!(b_id_span.start, Position::new(1, 4));
    }
}
