//! A minimal DOM-like node model.
//!
//! Nodes are immutable once wrapped in a [`Value`](crate::Value). They expose the
//! three capabilities the node comparer relies on: a node type, an attribute list
//! and a child node list.

use std::fmt;
use std::rc::Rc;

/// The type of a DOM-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Document,
    DocumentFragment,
}

impl NodeType {
    /// The numeric node type code used by DOM implementations.
    pub fn code(&self) -> u16 {
        match self {
            NodeType::Element => 1,
            NodeType::Text => 3,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentFragment => 11,
        }
    }

    /// The name of the class implementing this node type.
    pub fn class_name(&self) -> &'static str {
        match self {
            NodeType::Element => "Element",
            NodeType::Text => "Text",
            NodeType::Comment => "Comment",
            NodeType::Document => "Document",
            NodeType::DocumentFragment => "DocumentFragment",
        }
    }
}

/// A single `name="value"` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A DOM-like tree node.
#[derive(Debug, Clone)]
pub struct Node {
    node_type: NodeType,
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<NodeRef>,
    text: Option<String>,
}

impl Node {
    /// Create an element node with the given tag name.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Element,
            name: tag.into().to_uppercase(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            name: "#text".to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: Some(content.into()),
        }
    }

    /// Create a comment node.
    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Comment,
            name: "#comment".to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: Some(content.into()),
        }
    }

    /// Create an empty document fragment.
    pub fn fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            name: "#document-fragment".to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Add or replace an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(NodeRef::new(child));
        self
    }

    /// Append an already shared child node.
    pub fn with_shared_child(mut self, child: NodeRef) -> Self {
        self.children.push(child);
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Check whether this node is an instance of the named node class.
    pub fn is_instance_of(&self, class: &str) -> bool {
        class == "Node" || class == "Object" || class == self.node_type.class_name()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node_type {
            NodeType::Element => {
                write!(f, "<{}", self.name.to_lowercase())?;
                for attr in &self.attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                write!(f, ">")
            }
            NodeType::Text => write!(f, "#text \"{}\"", self.text.as_deref().unwrap_or("")),
            NodeType::Comment => write!(f, "<!--{}-->", self.text.as_deref().unwrap_or("")),
            _ => f.write_str(&self.name),
        }
    }
}

/// A shared handle to a [`Node`]. Clones share identity.
#[derive(Debug, Clone)]
pub struct NodeRef(Rc<Node>);

impl NodeRef {
    pub fn new(node: Node) -> Self {
        Self(Rc::new(node))
    }

    /// Stable identity of the underlying node.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::ops::Deref for NodeRef {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}
