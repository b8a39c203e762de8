//! Rich node tree
//!
//! A shadow tree over the editable DOM where every node knows the absolute
//! character range `[start, end)` it covers in the concatenated document
//! text. Nodes live in an arena; parents are plain indices.
//!
//! The tree is a snapshot: it does not follow DOM mutations. Rebuild it with
//! [`RichTree::build`] after structural edits.

use std::collections::HashMap;
use std::ops::Index;

use carve_dom::{DomTree, NodeData, NodeId};

/// Rich node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RichNodeId(u32);

impl RichNodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of DOM node a rich node mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RichNodeType {
    Text,
    Tag,
    Other,
}

/// Shadow node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichNode {
    pub dom_node: NodeId,
    pub kind: RichNodeType,
    pub start: usize,
    pub end: usize,
    pub parent: Option<RichNodeId>,
    pub children: Vec<RichNodeId>,
}

impl RichNode {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_text(&self) -> bool {
        self.kind == RichNodeType::Text
    }

    pub fn is_tag(&self) -> bool {
        self.kind == RichNodeType::Tag
    }

    /// Inclusive containment: a position on either edge belongs to the node
    pub fn contains_position(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Arena of rich nodes mirroring one DOM subtree
#[derive(Debug, Clone)]
pub struct RichTree {
    nodes: Vec<RichNode>,
    root: RichNodeId,
    lookup: HashMap<NodeId, RichNodeId>,
}

impl RichTree {
    /// Build the rich tree for the subtree rooted at `root`
    pub fn build(tree: &DomTree, root: NodeId) -> Self {
        let mut rich = Self {
            nodes: Vec::new(),
            root: RichNodeId(0),
            lookup: HashMap::new(),
        };
        rich.root = rich.build_node(tree, root, None, 0);
        rich
    }

    fn build_node(
        &mut self,
        tree: &DomTree,
        dom_node: NodeId,
        parent: Option<RichNodeId>,
        start: usize,
    ) -> RichNodeId {
        let kind = match tree.get(dom_node).map(|n| &n.data) {
            Some(NodeData::Text(_)) => RichNodeType::Text,
            Some(NodeData::Element(_))
            | Some(NodeData::Document)
            | Some(NodeData::DocumentFragment) => RichNodeType::Tag,
            _ => RichNodeType::Other,
        };
        let id = self.alloc(RichNode {
            dom_node,
            kind,
            start,
            end: start,
            parent,
            children: Vec::new(),
        });

        let end = match kind {
            RichNodeType::Text => start + tree.text_len(dom_node),
            RichNodeType::Tag => {
                let mut cursor = start;
                let mut children = Vec::new();
                for (child, _) in tree.children(dom_node) {
                    let child_id = self.build_node(tree, child, Some(id), cursor);
                    cursor = self.nodes[child_id.index()].end;
                    children.push(child_id);
                }
                self.nodes[id.index()].children = children;
                cursor
            }
            RichNodeType::Other => start,
        };
        self.nodes[id.index()].end = end;
        id
    }

    /// Add a node to the arena and index its DOM node
    pub(crate) fn alloc(&mut self, node: RichNode) -> RichNodeId {
        let id = RichNodeId(self.nodes.len() as u32);
        self.lookup.insert(node.dom_node, id);
        self.nodes.push(node);
        id
    }

    pub(crate) fn get_mut(&mut self, id: RichNodeId) -> Option<&mut RichNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn root(&self) -> RichNodeId {
        self.root
    }

    pub fn get(&self, id: RichNodeId) -> Option<&RichNode> {
        self.nodes.get(id.index())
    }

    /// Rich node mirroring a DOM node, if the DOM node was seen at build time
    pub fn node_for(&self, dom_node: NodeId) -> Option<RichNodeId> {
        self.lookup.get(&dom_node).copied()
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal of the subtree rooted at `id`, `id` included
    pub fn descendants(&self, id: RichNodeId) -> Vec<RichNodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.get(current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Leaves of the whole tree in document order
    pub fn leaves(&self) -> Vec<RichNodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self[*id].children.is_empty() && *id != self.root)
            .collect()
    }
}

impl Index<RichNodeId> for RichTree {
    type Output = RichNode;

    fn index(&self, id: RichNodeId) -> &RichNode {
        &self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId) {
        // <div>baz <span>bar</span><!--c-->foo</div>
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let baz = tree.create_text("baz ");
        let span = tree.create_element("span");
        let bar = tree.create_text("bar");
        let comment = tree.create_comment("c");
        let foo = tree.create_text("foo");
        tree.append_child(tree.root(), div).unwrap();
        for child in [baz, span, comment, foo] {
            tree.append_child(div, child).unwrap();
        }
        tree.append_child(span, bar).unwrap();
        (tree, div)
    }

    #[test]
    fn test_ranges() {
        let (tree, div) = sample();
        let rich = RichTree::build(&tree, div);
        let root = &rich[rich.root()];

        assert_eq!((root.start, root.end), (0, 10));
        let ranges: Vec<_> = root
            .children
            .iter()
            .map(|c| (rich[*c].kind, rich[*c].start, rich[*c].end))
            .collect();
        assert_eq!(
            ranges,
            vec![
                (RichNodeType::Text, 0, 4),
                (RichNodeType::Tag, 4, 7),
                (RichNodeType::Other, 7, 7),
                (RichNodeType::Text, 7, 10),
            ]
        );
    }

    #[test]
    fn test_lookup_and_parent() {
        let (tree, div) = sample();
        let rich = RichTree::build(&tree, div);
        let span = tree.child_at(div, 1).unwrap();
        let bar = tree.first_child(span).unwrap();

        let bar_rich = rich.node_for(bar).unwrap();
        assert_eq!(rich[bar_rich].parent, rich.node_for(span));
        assert_eq!(rich[bar_rich].dom_node, bar);
        assert!(rich.node_for(tree.root()).is_none());
    }

    #[test]
    fn test_leaves_in_document_order() {
        let (tree, div) = sample();
        let rich = RichTree::build(&tree, div);
        let texts: Vec<_> = rich
            .leaves()
            .into_iter()
            .filter_map(|id| tree.text(rich[id].dom_node))
            .collect();
        assert_eq!(texts, vec!["baz ", "bar", "foo"]);
    }
}
