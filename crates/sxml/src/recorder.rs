//! Side-table accumulation of node spans during parsing.
//!
//! The parser never writes positions into tree nodes. It asks the
//! recorder for a fresh [`NodeId`] per construct and logs byte offsets
//! against that id; [`LocationRecorder::freeze`] then pairs the table
//! with the source text to produce the immutable
//! [`Positioner`](crate::Positioner).

use crate::positioner::Positioner;
use crate::types::NodeId;
use std::collections::HashMap;
use sxml_source_map::SourceText;

/// Raw byte offsets recorded for one node. `end` is exclusive and stays
/// `None` while the construct is still open.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpanRecord {
    pub start: usize,
    pub end: Option<usize>,
    /// Attribute name range, when the node is an attribute.
    pub name: Option<(usize, usize)>,
    /// Attribute value range, quotes included.
    pub value: Option<(usize, usize)>,
}

/// Where a node without a recorded span borrows its position from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Fallback {
    /// Report at the start of the given node.
    StartOf(NodeId),
    /// Report just past the end of the given node.
    EndOf(NodeId),
}

#[derive(Debug, Default)]
pub(crate) struct LocationRecorder {
    next_id: u32,
    records: HashMap<NodeId, SpanRecord>,
    fallbacks: HashMap<NodeId, Fallback>,
}

impl LocationRecorder {
    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Opens a construct at `start`; its end is not known yet.
    pub fn open(&mut self, start: usize) -> NodeId {
        let id = self.allocate();
        self.records.insert(
            id,
            SpanRecord {
                start,
                end: None,
                name: None,
                value: None,
            },
        );
        id
    }

    /// Closes a previously opened construct.
    pub fn close(&mut self, id: NodeId, end: usize) {
        if let Some(record) = self.records.get_mut(&id) {
            record.end = Some(end);
        }
    }

    /// Records a construct whose full extent is already known.
    pub fn record_span(&mut self, start: usize, end: usize) -> NodeId {
        let id = self.open(start);
        self.close(id, end);
        id
    }

    /// Records an attribute with its name and value sub-ranges.
    pub fn record_attribute(
        &mut self,
        name: (usize, usize),
        value: (usize, usize),
    ) -> NodeId {
        let id = self.allocate();
        self.records.insert(
            id,
            SpanRecord {
                start: name.0,
                end: Some(value.1.max(name.1)),
                name: Some(name),
                value: Some(value),
            },
        );
        id
    }

    /// Records a node that has no source extent of its own.
    pub fn record_fallback(&mut self, fallback: Fallback) -> NodeId {
        let id = self.allocate();
        self.fallbacks.insert(id, fallback);
        id
    }

    /// Start offset of a node, if one was recorded directly.
    pub fn start_of(&self, id: NodeId) -> Option<usize> {
        self.records.get(&id).map(|record| record.start)
    }

    pub fn freeze(self, source: SourceText) -> Positioner {
        Positioner::new(source, self.records, self.fallbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sxml_source_map::Position;

    #[test]
    fn test_open_close_and_freeze() {
        let mut recorder = LocationRecorder::default();
        let outer = recorder.open(0);
        let inner = recorder.record_span(3, 7);
        recorder.close(outer, 12);
        let positioner = recorder.freeze(SourceText::new("<a><b/>ab</a>"));
        assert_eq!(positioner.start_position(outer), Position::new(1, 1));
        assert_eq!(positioner.start_position(inner), Position::new(1, 4));
        assert_eq!(positioner.end_position(inner), Position::new(1, 7));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut recorder = LocationRecorder::default();
        let a = recorder.open(0);
        let b = recorder.record_fallback(Fallback::StartOf(a));
        let c = recorder.record_span(1, 2);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }
}
