//! Veil DOM - Document substrate
//!
//! Arena-based DOM tree for the Veil component engine: elements with
//! attribute storage, shadow roots, reflected accessibility properties,
//! and mutation observation.

mod document;
mod node;
mod observer;
mod shadow;
mod tree;

pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData, PropertyValue, TextData};
pub use observer::{MutationObserverInit, MutationRecord, MutationType, ObserverId};
pub use shadow::{ShadowRootData, ShadowRootMode};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// DOM errors
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("Node is not an element")]
    NotAnElement,

    #[error("Element already has a shadow root")]
    ShadowAlreadyAttached,
}
