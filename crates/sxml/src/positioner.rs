//! Read-only position queries over a parsed document.

use crate::recorder::{Fallback, SpanRecord};
use crate::types::{Attribute, Located, NodeId};
use std::collections::HashMap;
use sxml_source_map::{Position, SourceText, Span};

/// Resolves nodes to source positions.
///
/// Built by the parser, immutable afterwards, and independent of the
/// tree: it can outlive the document or be shared across threads.
/// Every query succeeds; nodes without a recorded span resolve through
/// their fallback chain, and a node the positioner has never heard of
/// resolves to the start of the document.
#[derive(Debug, Clone)]
pub struct Positioner {
    source: SourceText,
    records: HashMap<NodeId, SpanRecord>,
    fallbacks: HashMap<NodeId, Fallback>,
}

impl Positioner {
    pub(crate) fn new(
        source: SourceText,
        records: HashMap<NodeId, SpanRecord>,
        fallbacks: HashMap<NodeId, Fallback>,
    ) -> Positioner {
        Positioner {
            source,
            records,
            fallbacks,
        }
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    /// Resolves a node to raw byte offsets, following fallback links
    /// for synthesized nodes. Fallback chains are acyclic because a
    /// fallback can only point at a node that already existed when it
    /// was recorded.
    fn resolve(&self, mut id: NodeId) -> (usize, usize) {
        loop {
            if let Some(record) = self.records.get(&id) {
                return (record.start, record.end.unwrap_or(record.start));
            }
            match self.fallbacks.get(&id) {
                Some(Fallback::StartOf(owner)) => id = *owner,
                Some(Fallback::EndOf(previous)) => {
                    let (_, end) = self.resolve(*previous);
                    return (end, end);
                }
                None => return (0, 0),
            }
        }
    }

    pub(crate) fn start_position(&self, id: NodeId) -> Position {
        let (start, _) = self.resolve(id);
        self.source.offset_to_position(start)
    }

    pub(crate) fn end_position(&self, id: NodeId) -> Position {
        let (start, end) = self.resolve(id);
        self.source.span(start, end).end
    }

    pub(crate) fn span(&self, id: NodeId) -> Span {
        let (start, end) = self.resolve(id);
        self.source.span(start, end)
    }

    /// Position of the first character of a node.
    pub fn start_position_of(&self, node: &impl Located) -> Position {
        self.start_position(node.node_id())
    }

    /// Position of the last character of a node.
    pub fn end_position_of(&self, node: &impl Located) -> Position {
        self.end_position(node.node_id())
    }

    /// Full span of a node, end inclusive.
    pub fn span_of(&self, node: &impl Located) -> Span {
        self.span(node.node_id())
    }

    /// Span of an attribute's name token. Falls back to the
    /// attribute's own position for synthesized attributes.
    pub fn name_span_of(&self, attribute: &Attribute) -> Span {
        if let Some(record) = self.records.get(&attribute.node_id()) {
            if let Some((start, end)) = record.name {
                return self.source.span(start, end);
            }
        }
        Span::point(self.start_position_of(attribute))
    }

    /// Span of an attribute's value, surrounding quotes included.
    pub fn value_span_of(&self, attribute: &Attribute) -> Span {
        if let Some(record) = self.records.get(&attribute.node_id()) {
            if let Some((start, end)) = record.value {
                return self.source.span(start, end);
            }
        }
        Span::point(self.start_position_of(attribute))
    }

    /// Compact `uri:line:column` view of a node's start, for log lines
    /// and error prefixes. The uri part is omitted when the source has
    /// none.
    pub fn location_string(&self, node: &impl Located) -> String {
        let position = self.start_position_of(node);
        match self.source.uri() {
            Some(uri) => format!("{uri}:{position}"),
            None => position.to_string(),
        }
    }
}

/// A parse result: the tree plus the positioner that locates its nodes.
#[derive(Debug, Clone)]
pub struct PositionedDocument {
    pub document: crate::types::Document,
    pub positioner: Positioner,
}
