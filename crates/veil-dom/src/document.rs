//! Document - High-level document API
//!
//! Mutating facade over the arena tree. Every attribute write and
//! child-list change is routed through here so the observation
//! registry sees it.

use crate::node::{Node, PropertyValue};
use crate::observer::{MutationObserverInit, MutationRecord, ObserverId, ObserverRegistry};
use crate::shadow::{ShadowRootData, ShadowRootMode};
use crate::tree::DomTree;
use crate::{DomError, NodeId};

/// Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    observers: ObserverRegistry,
    root: NodeId,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let root = tree.create_document();
        Self {
            tree,
            observers: ObserverRegistry::default(),
            root,
        }
    }

    /// Document root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    // --- Creation & structure ---

    /// Create an element node (detached)
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a text node (detached)
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append a child under a parent. Moving a node records a removal
    /// on its old parent and an addition on the new one.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.tree.get(parent).is_none() || self.tree.get(child).is_none() || parent == child {
            return;
        }
        let old_parent = self.tree.get(child).map(|n| n.parent).unwrap_or(NodeId::NONE);
        if old_parent.is_valid() {
            self.tree.detach(child);
            self.observers
                .notify_child_list(&self.tree, old_parent, &[], &[child]);
        }
        self.tree.append_child(parent, child);
        self.observers
            .notify_child_list(&self.tree, parent, &[child], &[]);
    }

    /// Detach a node from its parent
    pub fn remove_child(&mut self, child: NodeId) {
        let parent = self.tree.get(child).map(|n| n.parent).unwrap_or(NodeId::NONE);
        if !parent.is_valid() {
            return;
        }
        self.tree.detach(child);
        self.observers
            .notify_child_list(&self.tree, parent, &[], &[child]);
    }

    // --- Attributes ---

    /// Get an attribute value
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.get(node)?.as_element()?.attr(name)
    }

    /// Element tag name
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.tree.get(node)?.as_element().map(|e| e.tag.as_ref())
    }

    /// Set an attribute. Same-value writes are coalesced and produce no
    /// record.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let old = match self.tree.get(node).and_then(Node::as_element) {
            Some(el) => {
                if el.attr(name) == Some(value) {
                    return;
                }
                el.attr(name).map(str::to_owned)
            }
            None => return,
        };
        if let Some(el) = self.tree.get_mut(node).and_then(Node::as_element_mut) {
            el.set_attr(name, value);
        }
        self.observers
            .notify_attribute(&self.tree, node, name, old.as_deref());
    }

    /// Remove an attribute. Removing an absent attribute is a no-op.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let old = match self.tree.get_mut(node).and_then(Node::as_element_mut) {
            Some(el) => el.remove_attr(name),
            None => None,
        };
        if let Some(old) = old {
            self.observers
                .notify_attribute(&self.tree, node, name, Some(&old));
        }
    }

    // --- Reflected properties ---

    /// Get a reflected accessibility property slot
    pub fn property(&self, node: NodeId, name: &str) -> Option<&PropertyValue> {
        self.tree.get(node)?.as_element()?.property(name)
    }

    /// Write a reflected property slot (no mutation record; properties
    /// are not attributes)
    pub fn set_property(&mut self, node: NodeId, name: &str, value: PropertyValue) {
        if let Some(el) = self.tree.get_mut(node).and_then(Node::as_element_mut) {
            el.set_property(name, value);
        }
    }

    /// Clear a reflected property slot
    pub fn clear_property(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.tree.get_mut(node).and_then(Node::as_element_mut) {
            el.clear_property(name);
        }
    }

    // --- Shadow roots ---

    /// Attach a shadow root to a host element
    pub fn attach_shadow(
        &mut self,
        host: NodeId,
        mode: ShadowRootMode,
    ) -> Result<NodeId, DomError> {
        let el = self
            .tree
            .get(host)
            .and_then(Node::as_element)
            .ok_or(DomError::NotAnElement)?;
        if el.shadow_root.is_valid() {
            return Err(DomError::ShadowAlreadyAttached);
        }
        let shadow = self.tree.create_shadow_root(host, mode);
        if let Some(el) = self.tree.get_mut(host).and_then(Node::as_element_mut) {
            el.shadow_root = shadow;
        }
        tracing::trace!("attached shadow root {shadow:?} to host {host:?}");
        Ok(shadow)
    }

    /// A host element's shadow root, if attached
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let el = self.tree.get(host)?.as_element()?;
        el.shadow_root.is_valid().then_some(el.shadow_root)
    }

    /// Shadow root state
    pub fn shadow_data(&self, shadow: NodeId) -> Option<&ShadowRootData> {
        self.tree.get(shadow)?.as_shadow_root()
    }

    /// Host element of a shadow root
    pub fn shadow_host(&self, shadow: NodeId) -> Option<NodeId> {
        self.shadow_data(shadow).map(|s| s.host)
    }

    /// Read the shadow root's delegated-attribute configuration
    pub fn delegates_aria(&self, shadow: NodeId) -> Option<&str> {
        self.shadow_data(shadow)?.delegates_aria()
    }

    /// Install the delegated-attribute configuration (write-once;
    /// later writes are silently ignored)
    pub fn set_delegates_aria(&mut self, shadow: NodeId, value: &str) {
        if let Some(data) = self.tree.get_mut(shadow).and_then(Node::as_shadow_root_mut) {
            data.set_delegates_aria(value);
        }
    }

    /// The shadow root containing a node, when its tree is rooted at one
    pub fn containing_shadow_root(&self, node: NodeId) -> Option<NodeId> {
        let root = self.tree.root_of(node);
        self.tree.get(root)?.is_shadow_root().then_some(root)
    }

    /// Topmost ancestor of a node (shadow root, document root, or the
    /// node itself when detached)
    pub fn root_of(&self, node: NodeId) -> NodeId {
        self.tree.root_of(node)
    }

    // --- Queries ---

    /// Find the first element with the given id inside a root's
    /// subtree. Does not descend into shadow roots attached below.
    pub fn get_element_by_id_in(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.tree.descendants(root).find(|&n| {
            self.tree
                .get(n)
                .and_then(Node::as_element)
                .is_some_and(|e| e.id.as_deref() == Some(id))
        })
    }

    /// Collect every element inside a root's subtree carrying the given
    /// attribute
    pub fn elements_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        self.tree
            .descendants(root)
            .filter(|&n| {
                self.tree
                    .get(n)
                    .and_then(Node::as_element)
                    .is_some_and(|e| e.has_attr(name))
            })
            .collect()
    }

    /// Deep-copy an element subtree (detached; attributes only)
    pub fn clone_subtree(&mut self, source: NodeId) -> NodeId {
        self.tree.clone_subtree(source)
    }

    // --- Observation ---

    /// Register a new observer
    pub fn register_observer(&mut self) -> ObserverId {
        self.observers.register()
    }

    /// Observe a target. Repeat calls for the same target replace its
    /// options.
    pub fn observe(&mut self, observer: ObserverId, target: NodeId, options: MutationObserverInit) {
        self.observers.observe(observer, target, options);
    }

    /// Drain an observer's queued records, in arrival order
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(observer)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
