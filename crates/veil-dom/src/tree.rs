//! DOM Tree (arena-based allocation)
//!
//! Nodes live in a flat arena addressed by `NodeId`. Shadow roots are
//! parentless nodes, so walking parent links never crosses a shadow
//! boundary.

use crate::node::{Node, NodeData, TextData};
use crate::shadow::{ShadowRootData, ShadowRootMode};
use crate::NodeId;

/// Arena-based DOM tree
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create an element node (detached)
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a text node (detached)
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    pub(crate) fn create_document(&mut self) -> NodeId {
        self.alloc(Node::document())
    }

    pub(crate) fn create_shadow_root(&mut self, host: NodeId, mode: ShadowRootMode) -> NodeId {
        self.alloc(Node::with_data(NodeData::ShadowRoot(ShadowRootData::new(
            host, mode,
        ))))
    }

    // --- Structure ---

    /// Append a child under a parent, detaching it from any old parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() || parent == child {
            return;
        }
        self.detach(child);

        let old_last = self.get(parent).map(|p| p.last_child).unwrap_or(NodeId::NONE);
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = old_last;
        }
        if old_last.is_valid() {
            if let Some(last) = self.get_mut(old_last) {
                last.next_sibling = child;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = child;
        }
        if let Some(p) = self.get_mut(parent) {
            p.last_child = child;
        }
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, node: NodeId) {
        let (parent, prev, next) = match self.get(node) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }
        if next.is_valid() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = NodeId::NONE;
            n.prev_sibling = NodeId::NONE;
            n.next_sibling = NodeId::NONE;
        }
    }

    // --- Traversal ---

    /// Iterate a node's children
    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(node).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Iterate a subtree in pre-order, excluding the root itself.
    /// Shadow roots attached to descendants are not entered.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Topmost ancestor reachable through parent links (the node itself
    /// when detached or already a root)
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(n) = self.get(current) {
            if !n.parent.is_valid() {
                break;
            }
            current = n.parent;
        }
        current
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map(|n| n.parent).unwrap_or(NodeId::NONE);
        }
        false
    }

    /// Deep-copy an element or text subtree. The copy is detached;
    /// shadow attachments and property slots do not carry over.
    pub fn clone_subtree(&mut self, source: NodeId) -> NodeId {
        let data = match self.get(source) {
            Some(n) => match &n.data {
                NodeData::Element(e) => NodeData::Element(e.clone_for_copy()),
                NodeData::Text(t) => NodeData::Text(TextData {
                    content: t.content.clone(),
                }),
                _ => return NodeId::NONE,
            },
            None => return NodeId::NONE,
        };
        let copy = self.alloc(Node::with_data(data));
        let kids: Vec<NodeId> = self.children(source).collect();
        for kid in kids {
            let kid_copy = self.clone_subtree(kid);
            if kid_copy.is_valid() {
                self.append_child(copy, kid_copy);
            }
        }
        copy
    }
}

/// Sibling-chain iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self
            .tree
            .get(current)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(current)
    }
}

/// Pre-order subtree iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let mut kids: Vec<NodeId> = self.tree.children(current).collect();
        kids.reverse();
        self.stack.extend(kids);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_chain() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        let c = tree.create_element("li");
        tree.append_child(parent, a);
        tree.append_child(parent, b);
        tree.append_child(parent, c);

        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
        assert_eq!(tree.get(parent).unwrap().last_child, c);
    }

    #[test]
    fn test_detach_fixes_siblings() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        let a = tree.create_element("p");
        let b = tree.create_element("p");
        let c = tree.create_element("p");
        tree.append_child(parent, a);
        tree.append_child(parent, b);
        tree.append_child(parent, c);

        tree.detach(b);

        assert_eq!(tree.get(a).unwrap().next_sibling, c);
        assert_eq!(tree.get(c).unwrap().prev_sibling, a);
        assert!(!tree.get(b).unwrap().parent.is_valid());
        assert_eq!(tree.children(parent).count(), 2);
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let a = tree.create_element("section");
        let a1 = tree.create_element("p");
        let b = tree.create_element("section");
        tree.append_child(root, a);
        tree.append_child(a, a1);
        tree.append_child(root, b);

        let order: Vec<NodeId> = tree.descendants(root).collect();
        assert_eq!(order, vec![a, a1, b]);
    }

    #[test]
    fn test_clone_subtree() {
        let mut tree = DomTree::new();
        let label = tree.create_element("label");
        let text = tree.create_text("Name");
        tree.append_child(label, text);

        let copy = tree.clone_subtree(label);
        assert_ne!(copy, label);
        assert!(!tree.get(copy).unwrap().parent.is_valid());

        let copy_kids: Vec<NodeId> = tree.children(copy).collect();
        assert_eq!(copy_kids.len(), 1);
        assert_eq!(tree.get(copy_kids[0]).unwrap().as_text(), Some("Name"));
    }

    #[test]
    fn test_root_of_stops_at_parentless_node() {
        let mut tree = DomTree::new();
        let root = tree.create_element("div");
        let child = tree.create_element("span");
        tree.append_child(root, child);

        assert_eq!(tree.root_of(child), root);
        assert_eq!(tree.root_of(root), root);
        assert!(tree.is_inclusive_ancestor(root, child));
        assert!(!tree.is_inclusive_ancestor(child, root));
    }
}
