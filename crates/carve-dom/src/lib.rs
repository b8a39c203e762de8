//! Carve DOM - Document Object Model host
//!
//! Arena-backed DOM tree used as the editing surface of the Carve editor.
//! Besides the tree itself this crate provides the pieces an editor needs
//! from a browser-like host:
//! - a native [`Selection`] that follows node insertions and removals the
//!   way live DOM ranges do
//! - boundary point ordering in tree order
//! - a [`TreeWalker`] for document-order traversal
//! - geometry types for caret measurement

mod document;
mod geometry;
mod node;
mod operations;
mod range;
mod tree;
mod tree_walker;

pub use document::Document;
pub use geometry::{DOMRect, DOMRectList};
pub use node::{Attribute, ElementData, Node, NodeData, NodeType, TextData, VOID_ELEMENTS};
pub use operations::{DomError, DomResult};
pub use range::{BoundaryPoint, Range, RangeCompare, Selection, SelectionType};
pub use tree::{Children, DomTree};
pub use tree_walker::{TreeWalker, WhatToShow};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node of every tree
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
