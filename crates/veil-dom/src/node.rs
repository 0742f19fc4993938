//! DOM Node
//!
//! Arena node layout: parent/child/sibling links plus node-specific data.

use crate::shadow::ShadowRootData;
use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(TextData {
            content: content.to_string(),
        }))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a shadow root
    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }

    /// Get mutable shadow root data
    #[inline]
    pub fn as_shadow_root_mut(&mut self) -> Option<&mut ShadowRootData> {
        match &mut self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Shadow root (parentless subtree attached to a host element)
    ShadowRoot(ShadowRootData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name
    pub tag: Box<str>,
    /// Attributes
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<Box<str>>,
    /// Attached shadow root (NONE if none)
    pub shadow_root: NodeId,
    /// Reflected accessibility property slots
    properties: Vec<(Box<str>, PropertyValue)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            id: None,
            shadow_root: NodeId::NONE,
            properties: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.as_ref() == name)
            .map(|a| a.value.as_str())
    }

    /// Check whether an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name.as_ref() == name)
    }

    /// Set an attribute, keeping the id cache current
    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        if name == "id" {
            self.id = Some(value.into());
        }
        for attr in &mut self.attrs {
            if attr.name.as_ref() == name {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute, returning its old value
    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        if name == "id" {
            self.id = None;
        }
        let pos = self.attrs.iter().position(|a| a.name.as_ref() == name)?;
        Some(self.attrs.remove(pos).value)
    }

    /// Get a reflected property slot
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v)
    }

    pub(crate) fn set_property(&mut self, name: &str, value: PropertyValue) {
        for (n, v) in &mut self.properties {
            if n.as_ref() == name {
                *v = value;
                return;
            }
        }
        self.properties.push((name.into(), value));
    }

    pub(crate) fn clear_property(&mut self, name: &str) {
        self.properties.retain(|(n, _)| n.as_ref() != name);
    }

    /// Copy for subtree cloning: attributes only, no shadow attachment,
    /// no property slots
    pub(crate) fn clone_for_copy(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            id: self.id.clone(),
            shadow_root: NodeId::NONE,
            properties: Vec::new(),
        }
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: Box<str>,
    pub value: String,
}

/// Reflected accessibility property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// String-valued property
    Token(Box<str>),
    /// Ordered element references (ID-reference relationships)
    Elements(Vec<NodeId>),
}
