//! TreeWalker
//!
//! Document-order traversal of a subtree, filtered by node type.

use crate::{DomTree, NodeId, NodeType};

/// What nodes to show in traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFF_FFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);

    /// Check if a node type should be shown
    pub fn includes(&self, node_type: NodeType) -> bool {
        let bit = 1u32 << ((node_type as u32) - 1);
        (self.0 & bit) != 0
    }

    /// Combine with another filter
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }
}

/// TreeWalker - walks the subtree below `root` in document order.
///
/// The root itself is never returned.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    pub root: NodeId,
    pub what_to_show: WhatToShow,
    current_node: NodeId,
}

impl TreeWalker {
    pub fn new(root: NodeId, what_to_show: WhatToShow) -> Self {
        Self {
            root,
            what_to_show,
            current_node: root,
        }
    }

    pub fn current_node(&self) -> NodeId {
        self.current_node
    }

    pub fn set_current_node(&mut self, node: NodeId) {
        self.current_node = node;
    }

    fn accepts(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.node_type(node)
            .is_some_and(|t| self.what_to_show.includes(t))
    }

    /// Move to the next accepted node in document order
    pub fn next_node(&mut self, tree: &DomTree) -> Option<NodeId> {
        let mut node = self.current_node;
        loop {
            node = self.following(tree, node)?;
            if self.accepts(tree, node) {
                self.current_node = node;
                return Some(node);
            }
        }
    }

    /// Move to the previous accepted node in document order
    pub fn previous_node(&mut self, tree: &DomTree) -> Option<NodeId> {
        let mut node = self.current_node;
        loop {
            node = self.preceding(tree, node)?;
            if self.accepts(tree, node) {
                self.current_node = node;
                return Some(node);
            }
        }
    }

    fn following(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if let Some(child) = tree.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        while current != self.root {
            if let Some(next) = tree.next_sibling(current) {
                return Some(next);
            }
            current = tree.parent(current)?;
        }
        None
    }

    fn preceding(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        if node == self.root {
            return None;
        }
        match tree.prev_sibling(node) {
            Some(mut prev) => {
                while let Some(last) = tree.last_child(prev) {
                    prev = last;
                }
                Some(prev)
            }
            None => tree.parent(node).filter(|p| *p != self.root),
        }
    }
}
