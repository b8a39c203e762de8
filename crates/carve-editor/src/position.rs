//! Position algebra
//!
//! Conversions between DOM `(node, offset)` pairs and absolute positions,
//! both going through a [`RichTree`] snapshot.

use carve_dom::{DomTree, NodeId, Range};

use crate::{EditorError, EditorResult, Region, RichNodeId, RichNodeType, RichTree};

/// List containers never receive a caret directly
const LIST_CONTAINERS: &[&str] = &["ul", "ol"];

/// Absolute position of a DOM boundary point.
///
/// For text nodes the offset counts characters; for elements it counts the
/// children before the position.
pub fn dom_to_absolute(
    rich: &RichTree,
    node: NodeId,
    offset: usize,
) -> EditorResult<usize> {
    let id = rich.node_for(node).ok_or(EditorError::StaleNode(node))?;
    calculate_position(rich, id, offset)
}

/// Absolute position of `offset` inside the DOM node mirrored by `id`
pub fn calculate_position(rich: &RichTree, id: RichNodeId, offset: usize) -> EditorResult<usize> {
    let node = &rich[id];
    let unresolvable = || EditorError::UnresolvablePosition {
        node: node.dom_node,
        offset,
    };
    match node.kind {
        RichNodeType::Text if offset <= node.len() => Ok(node.start + offset),
        RichNodeType::Tag if offset == 0 => Ok(node.start),
        RichNodeType::Tag => node
            .children
            .get(offset - 1)
            .map(|child| rich[*child].end)
            .ok_or_else(unresolvable),
        _ => Err(unresolvable()),
    }
}

/// Absolute region covered by a DOM range
pub fn range_to_region(rich: &RichTree, range: &Range) -> EditorResult<Region> {
    let start = dom_to_absolute(rich, range.start_container(), range.start_offset())?;
    let end = dom_to_absolute(rich, range.end_container(), range.end_offset())?;
    Ok(Region::new(start, end))
}

/// Position relative to the start of a rich node, clamped to its length
pub fn relative_position(rich: &RichTree, id: RichNodeId, position: usize) -> usize {
    let node = &rich[id];
    position.saturating_sub(node.start).min(node.len())
}

fn in_list_container(rich: &RichTree, tree: &DomTree, id: RichNodeId) -> bool {
    rich[id]
        .parent
        .is_some_and(|parent| tree.has_tag(rich[parent].dom_node, LIST_CONTAINERS))
}

/// Text nodes below `scope` that can hold a caret at `position`
pub fn text_nodes_at(
    rich: &RichTree,
    tree: &DomTree,
    scope: RichNodeId,
    position: usize,
) -> Vec<RichNodeId> {
    rich.descendants(scope)
        .into_iter()
        .filter(|id| {
            let node = &rich[*id];
            node.is_text() && node.contains_position(position) && !in_list_container(rich, tree, *id)
        })
        .collect()
}

/// Find a text node to place a caret at `position`, starting the search in
/// `scope` and widening to its ancestors.
///
/// When several text nodes touch the position the one the position lies
/// inside (or at the end of) wins, so text typed at a boundary extends the
/// preceding node. When nothing touches the position the first text node
/// after it is used. `None` means the document has no usable text node.
pub fn resolve_text_node(
    rich: &RichTree,
    tree: &DomTree,
    scope: RichNodeId,
    position: usize,
) -> Option<RichNodeId> {
    let mut current = Some(scope);
    while let Some(id) = current {
        let candidates = text_nodes_at(rich, tree, id, position);
        if let [only] = candidates.as_slice() {
            return Some(*only);
        }
        if let Some(best) = candidates
            .iter()
            .find(|c| rich[**c].start < position)
            .or(candidates.first())
        {
            return Some(*best);
        }
        current = rich[id].parent;
    }

    rich.descendants(rich.root()).into_iter().find(|id| {
        let node = &rich[*id];
        node.is_text() && node.start >= position && !in_list_container(rich, tree, *id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, Vec<NodeId>) {
        // <div>baz <span>bar</span>foo</div>
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let baz = tree.create_text("baz ");
        let span = tree.create_element("span");
        let bar = tree.create_text("bar");
        let foo = tree.create_text("foo");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, baz).unwrap();
        tree.append_child(div, span).unwrap();
        tree.append_child(span, bar).unwrap();
        tree.append_child(div, foo).unwrap();
        (tree, div, vec![baz, span, bar, foo])
    }

    #[test]
    fn test_dom_to_absolute_text() {
        let (tree, div, nodes) = sample();
        let rich = RichTree::build(&tree, div);
        assert_eq!(dom_to_absolute(&rich, nodes[2], 2).unwrap(), 6);
        assert_eq!(dom_to_absolute(&rich, nodes[3], 0).unwrap(), 7);
        assert!(dom_to_absolute(&rich, nodes[3], 4).is_err());
    }

    #[test]
    fn test_dom_to_absolute_element() {
        let (tree, div, _) = sample();
        let rich = RichTree::build(&tree, div);
        assert_eq!(dom_to_absolute(&rich, div, 0).unwrap(), 0);
        assert_eq!(dom_to_absolute(&rich, div, 2).unwrap(), 7);
        assert_eq!(dom_to_absolute(&rich, div, 3).unwrap(), 10);
        assert!(matches!(
            dom_to_absolute(&rich, div, 4),
            Err(EditorError::UnresolvablePosition { offset: 4, .. })
        ));
    }

    #[test]
    fn test_stale_node() {
        let (mut tree, div, _) = sample();
        let rich = RichTree::build(&tree, div);
        let late = tree.create_text("late");
        assert!(matches!(
            dom_to_absolute(&rich, late, 0),
            Err(EditorError::StaleNode(_))
        ));
    }

    #[test]
    fn test_resolve_prefers_preceding_text() {
        let (tree, div, nodes) = sample();
        let rich = RichTree::build(&tree, div);
        let at = |p| rich[resolve_text_node(&rich, &tree, rich.root(), p).unwrap()].dom_node;
        assert_eq!(at(0), nodes[0]);
        assert_eq!(at(4), nodes[0]);
        assert_eq!(at(5), nodes[2]);
        assert_eq!(at(7), nodes[2]);
        assert_eq!(at(9), nodes[3]);
    }

    #[test]
    fn test_resolve_skips_list_containers() {
        // <div><ul>x<li>ab</li></ul></div>
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let ul = tree.create_element("ul");
        let stray = tree.create_text("x");
        let li = tree.create_element("li");
        let ab = tree.create_text("ab");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, ul).unwrap();
        tree.append_child(ul, stray).unwrap();
        tree.append_child(ul, li).unwrap();
        tree.append_child(li, ab).unwrap();

        let rich = RichTree::build(&tree, div);
        let found = resolve_text_node(&rich, &tree, rich.root(), 0).unwrap();
        assert_eq!(rich[found].dom_node, ab);
    }
}
