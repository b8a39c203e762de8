//! Document - High-level document API
//!
//! Structural mutations made through [`Document`] keep the native selection
//! valid the way a browser keeps live ranges valid.

use crate::{DomResult, DomTree, NodeId, Selection};

/// HTML Document with its native selection
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    selection: Selection,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `html/head/body` skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the document node cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            selection: Selection::new(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    pub fn html(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Read access to the tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Raw tree access; structural edits made here bypass selection upkeep
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// The native selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    // --- Creation ---

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    // --- Mutation ---

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert as first child
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let first = self.tree.first_child(parent).filter(|f| *f != child);
        self.insert_before(parent, child, first)
    }

    /// Insert `child` directly after `node` in `node`'s parent
    pub fn insert_after(&mut self, node: NodeId, child: NodeId) -> DomResult<NodeId> {
        let parent = self
            .tree
            .parent(node)
            .ok_or(crate::DomError::Detached(node))?;
        let next = self.tree.next_sibling(node).filter(|n| *n != child);
        self.insert_before(parent, child, next)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        if self.tree.parent(child).is_some() && reference != Some(child) {
            self.adjust_for_removal(child);
        }
        self.tree.insert_before(parent, child, reference)?;
        if let Some(index) = self.tree.index_of(child) {
            for point in self.selection.boundaries_mut() {
                if point.node == parent && point.offset > index {
                    point.offset += 1;
                }
            }
        }
        Ok(child)
    }

    /// Detach a node from its parent
    pub fn remove_node(&mut self, node: NodeId) -> DomResult<NodeId> {
        let parent = self
            .tree
            .parent(node)
            .ok_or(crate::DomError::Detached(node))?;
        tracing::trace!("Removing node {} from {}", node, parent);
        self.adjust_for_removal(node);
        self.tree.remove_child(parent, node)
    }

    /// Remove every child of `parent`
    pub fn clear_children(&mut self, parent: NodeId) -> DomResult<()> {
        for child in self.tree.child_ids(parent) {
            self.remove_node(child)?;
        }
        Ok(())
    }

    /// Replace the data of a text node
    pub fn set_text(&mut self, node: NodeId, content: impl Into<String>) -> DomResult<()> {
        self.tree.set_text(node, content)?;
        for point in self.selection.boundaries_mut() {
            if point.node == node {
                point.offset = 0;
            }
        }
        Ok(())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.tree.element_mut(node) {
            element.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.tree.element_mut(node)?.remove_attr(name)
    }

    fn adjust_for_removal(&mut self, node: NodeId) {
        let (Some(parent), Some(index)) = (self.tree.parent(node), self.tree.index_of(node)) else {
            return;
        };
        let tree = &self.tree;
        for point in self.selection.boundaries_mut() {
            if tree.contains(node, point.node) {
                point.node = parent;
                point.offset = index;
            } else if point.node == parent && point.offset > index {
                point.offset -= 1;
            }
        }
    }
}
