//! The parsed document tree.
//!
//! Nodes carry no positions themselves; each node owns a [`NodeId`]
//! that keys into the [`Positioner`](crate::Positioner) built
//! alongside the tree. This keeps the tree cheap to clone and traverse
//! while positions stay available for any node on demand.

use std::fmt;

/// Opaque identity of a node, assigned at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

/// Anything that can be looked up in a
/// [`Positioner`](crate::Positioner).
pub trait Located {
    fn node_id(&self) -> NodeId;
}

/// A whole parsed document. Its span covers the entire source text.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) id: NodeId,
    pub root: Element,
}

/// An element and its contents.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) id: NodeId,
    /// Local name, without any namespace prefix.
    pub name: String,
    pub prefix: Option<String>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<XmlNode>,
}

/// A child of an element.
#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(Element),
    Text(TextRun),
}

/// A run of character data.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub(crate) id: NodeId,
    /// Decoded content, entities already resolved.
    pub content: String,
    /// True if this run came from a single CDATA section.
    pub cdata: bool,
}

/// An attribute of an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub(crate) id: NodeId,
    pub name: String,
    pub prefix: Option<String>,
    /// Decoded value, without the surrounding quotes.
    pub value: String,
    /// True if the attribute was not written in the source, e.g. an
    /// inherited default-namespace declaration.
    pub synthesized: bool,
}

impl Element {
    /// The name as written, prefix included.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Value of the attribute with the given local name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// The attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Child elements with the given local name.
    pub fn get_children(&self, name: &str) -> impl Iterator<Item = &Element> {
        self.child_elements()
            .filter(move |element| element.name == name)
    }

    /// The element's text if it contains exactly one text child and no
    /// element children.
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [XmlNode::Text(run)] => Some(&run.content),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Attribute {
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.qualified_name())
    }
}

impl Located for Document {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

impl Located for Element {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

impl Located for TextRun {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

impl Located for Attribute {
    fn node_id(&self) -> NodeId {
        self.id
    }
}

impl Located for XmlNode {
    fn node_id(&self) -> NodeId {
        match self {
            XmlNode::Element(element) => element.id,
            XmlNode::Text(run) => run.id,
        }
    }
}
