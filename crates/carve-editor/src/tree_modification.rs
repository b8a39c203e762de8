//! Rich node tree modification
//!
//! Low-level edits that change the DOM and the rich arena together. Ranges
//! of existing nodes are not recomputed; rebuild the tree with
//! [`crate::EditorController::update_rich_node`] after a batch of edits.

use carve_dom::{Document, NodeId};

use crate::{EditorError, EditorResult, RichNode, RichNodeId, RichNodeType, RichTree};

fn dom_parent(document: &Document, node: NodeId, action: &'static str) -> EditorResult<NodeId> {
    document
        .tree()
        .parent(node)
        .ok_or(EditorError::MissingParent { node, action })
}

fn rich_parent(rich: &RichTree, id: RichNodeId, action: &'static str) -> EditorResult<RichNodeId> {
    rich[id].parent.ok_or(EditorError::MissingParent {
        node: rich[id].dom_node,
        action,
    })
}

fn set_parent(rich: &mut RichTree, id: RichNodeId, parent: Option<RichNodeId>) {
    if let Some(node) = rich.get_mut(id) {
        node.parent = parent;
    }
}

fn replace_in_children(
    rich: &mut RichTree,
    parent: RichNodeId,
    old: RichNodeId,
    replacements: &[RichNodeId],
) {
    if let Some(parent) = rich.get_mut(parent) {
        match parent.children.iter().position(|c| *c == old) {
            Some(index) => {
                parent
                    .children
                    .splice(index..=index, replacements.iter().copied());
            }
            None => parent.children.extend_from_slice(replacements),
        }
    }
}

/// Split a text node at an absolute `position` strictly inside it.
///
/// Returns two new rich nodes backed by new, detached DOM text nodes. The
/// original node stays in place; use [`replace_rich_node_with`] to swap the
/// halves in.
pub fn split_rich_text_node(
    document: &mut Document,
    rich: &mut RichTree,
    id: RichNodeId,
    position: usize,
) -> EditorResult<(RichNodeId, RichNodeId)> {
    let node = rich[id].clone();
    if node.kind != RichNodeType::Text || position <= node.start || position >= node.end {
        return Err(EditorError::InvalidSplit {
            node: node.dom_node,
            position,
        });
    }

    let text = document.tree().text(node.dom_node).unwrap_or_default();
    let split_at = text
        .char_indices()
        .nth(position - node.start)
        .map_or(text.len(), |(byte, _)| byte);
    let (head, tail) = text.split_at(split_at);
    let (head, tail) = (head.to_string(), tail.to_string());

    let prefix_dom = document.create_text(&head);
    let postfix_dom = document.create_text(&tail);
    let prefix = rich.alloc(RichNode {
        dom_node: prefix_dom,
        kind: RichNodeType::Text,
        start: node.start,
        end: position,
        parent: node.parent,
        children: Vec::new(),
    });
    let postfix = rich.alloc(RichNode {
        dom_node: postfix_dom,
        kind: RichNodeType::Text,
        start: position,
        end: node.end,
        parent: node.parent,
        children: Vec::new(),
    });
    Ok((prefix, postfix))
}

/// Replace a node by a sequence of nodes, in the DOM and in its rich parent
pub fn replace_rich_node_with(
    document: &mut Document,
    rich: &mut RichTree,
    id: RichNodeId,
    replacements: &[RichNodeId],
) -> EditorResult<()> {
    const ACTION: &str = "replace node";
    let parent = rich_parent(rich, id, ACTION)?;
    let dom_node = rich[id].dom_node;
    let dom_parent = dom_parent(document, dom_node, ACTION)?;

    for replacement in replacements {
        document.insert_before(dom_parent, rich[*replacement].dom_node, Some(dom_node))?;
        set_parent(rich, *replacement, Some(parent));
    }
    document.remove_node(dom_node)?;
    replace_in_children(rich, parent, id, replacements);
    set_parent(rich, id, None);
    Ok(())
}

/// Wrap a node in `wrapper`, a new element, and return the wrapper's rich node
pub fn wrap_rich_node(
    document: &mut Document,
    rich: &mut RichTree,
    id: RichNodeId,
    wrapper: NodeId,
) -> EditorResult<RichNodeId> {
    const ACTION: &str = "wrap node";
    let parent = rich_parent(rich, id, ACTION)?;
    let node = rich[id].clone();
    let dom_parent = dom_parent(document, node.dom_node, ACTION)?;

    document.insert_before(dom_parent, wrapper, Some(node.dom_node))?;
    document.append_child(wrapper, node.dom_node)?;

    let wrapper_id = rich.alloc(RichNode {
        dom_node: wrapper,
        kind: RichNodeType::Tag,
        start: node.start,
        end: node.end,
        parent: Some(parent),
        children: vec![id],
    });
    replace_in_children(rich, parent, id, &[wrapper_id]);
    set_parent(rich, id, Some(wrapper_id));
    Ok(wrapper_id)
}

/// Replace an element by its children
pub fn unwrap_rich_node(
    document: &mut Document,
    rich: &mut RichTree,
    id: RichNodeId,
) -> EditorResult<()> {
    let children = rich[id].children.clone();
    replace_rich_node_with(document, rich, id, &children)?;
    if let Some(node) = rich.get_mut(id) {
        node.children.clear();
    }
    Ok(())
}

/// Drop a sibling from the rich parent, returning its last known range
fn detach_rich_sibling(
    rich: &mut RichTree,
    parent: Option<RichNodeId>,
    sibling: NodeId,
) -> Option<RichNode> {
    let sibling_id = rich.node_for(sibling)?;
    if let Some(parent) = parent.and_then(|p| rich.get_mut(p)) {
        parent.children.retain(|c| *c != sibling_id);
    }
    Some(rich[sibling_id].clone())
}

/// Merge adjacent text siblings into the text node of `id`
pub fn merge_sibling_text_nodes(
    document: &mut Document,
    rich: &mut RichTree,
    id: RichNodeId,
) -> EditorResult<()> {
    let text_node = rich[id].dom_node;
    let parent = rich[id].parent;
    let mut start = rich[id].start;
    let mut end = rich[id].end;
    let mut content = document.tree().text(text_node).unwrap_or_default().to_string();

    while let Some(previous) = document
        .tree()
        .prev_sibling(text_node)
        .filter(|n| document.tree().is_text(*n))
    {
        let previous_text = document.tree().text(previous).unwrap_or_default().to_string();
        content.insert_str(0, &previous_text);
        if let Some(merged) = detach_rich_sibling(rich, parent, previous) {
            start = merged.start;
        }
        document.remove_node(previous)?;
    }
    while let Some(next) = document
        .tree()
        .next_sibling(text_node)
        .filter(|n| document.tree().is_text(*n))
    {
        content.push_str(document.tree().text(next).unwrap_or_default());
        if let Some(merged) = detach_rich_sibling(rich, parent, next) {
            end = merged.end;
        }
        document.remove_node(next)?;
    }

    document.set_text(text_node, content)?;
    if let Some(node) = rich.get_mut(id) {
        node.start = start;
        node.end = end;
    }
    Ok(())
}

/// Move `child` to the end of `parent`
pub fn append_rich_child(
    document: &mut Document,
    rich: &mut RichTree,
    parent: RichNodeId,
    child: RichNodeId,
) -> EditorResult<()> {
    if let Some(old_parent) = rich[child].parent {
        if let Some(old_parent) = rich.get_mut(old_parent) {
            old_parent.children.retain(|c| *c != child);
        }
    }
    document.append_child(rich[parent].dom_node, rich[child].dom_node)?;
    if let Some(node) = rich.get_mut(parent) {
        node.children.push(child);
    }
    set_parent(rich, child, Some(parent));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, EditorController};

    fn controller(html: &str) -> EditorController {
        EditorController::from_html(html, Config::default()).unwrap()
    }

    fn text_leaf(controller: &EditorController, content: &str) -> RichNodeId {
        let rich = controller.rich_tree();
        rich.leaves()
            .into_iter()
            .find(|id| controller.tree().text(rich[*id].dom_node) == Some(content))
            .unwrap()
    }

    #[test]
    fn test_split_rejects_edges() {
        let mut controller = controller("abc");
        let leaf = text_leaf(&controller, "abc");
        let (document, rich) = controller.parts_mut();
        assert!(matches!(
            split_rich_text_node(document, rich, leaf, 0),
            Err(EditorError::InvalidSplit { position: 0, .. })
        ));
        assert!(split_rich_text_node(document, rich, leaf, 3).is_err());
    }

    #[test]
    fn test_split_and_replace() {
        let mut controller = controller("héllo");
        let leaf = text_leaf(&controller, "héllo");
        let (document, rich) = controller.parts_mut();
        let (head, tail) = split_rich_text_node(document, rich, leaf, 2).unwrap();
        assert_eq!((rich[head].start, rich[head].end), (0, 2));
        assert_eq!((rich[tail].start, rich[tail].end), (2, 5));
        replace_rich_node_with(document, rich, leaf, &[head, tail]).unwrap();

        let root = controller.root_node();
        let texts: Vec<_> = controller
            .tree()
            .child_ids(root)
            .into_iter()
            .filter_map(|c| controller.tree().text(c).map(str::to_string))
            .collect();
        assert_eq!(texts, vec!["hé", "llo"]);
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let mut controller = controller("abc");
        let leaf = text_leaf(&controller, "abc");
        let (document, rich) = controller.parts_mut();
        let strong = document.create_element("strong");
        let wrapper = wrap_rich_node(document, rich, leaf, strong).unwrap();
        assert_eq!(rich[wrapper].children, vec![leaf]);
        assert_eq!(rich[leaf].parent, Some(wrapper));
        assert_eq!(controller.inner_html(), "<strong>abc</strong>");

        let (document, rich) = controller.parts_mut();
        unwrap_rich_node(document, rich, wrapper).unwrap();
        assert_eq!(controller.inner_html(), "abc");
    }

    #[test]
    fn test_replace_root_fails() {
        let mut controller = controller("abc");
        let (document, rich) = controller.parts_mut();
        let root = rich.root();
        assert!(matches!(
            replace_rich_node_with(document, rich, root, &[]),
            Err(EditorError::MissingParent { .. })
        ));
    }

    #[test]
    fn test_merge_sibling_text_nodes() {
        let mut controller = controller("a<b>b</b>c");
        let root = controller.root_node();
        let bold_dom = controller.tree().child_at(root, 1).unwrap();
        let bold = controller.rich_tree().node_for(bold_dom).unwrap();
        let (document, rich) = controller.parts_mut();
        unwrap_rich_node(document, rich, bold).unwrap();

        let middle = text_leaf(&controller, "b");
        let (document, rich) = controller.parts_mut();
        merge_sibling_text_nodes(document, rich, middle).unwrap();
        assert_eq!((rich[middle].start, rich[middle].end), (0, 3));
        assert_eq!(controller.tree().child_count(root), 1);
        assert_eq!(controller.text_content(), "abc");
    }

    #[test]
    fn test_append_rich_child() {
        let mut controller = controller("<i></i>x");
        let root = controller.root_node();
        let italic_dom = controller.tree().child_at(root, 0).unwrap();
        let italic = controller.rich_tree().node_for(italic_dom).unwrap();
        let x = text_leaf(&controller, "x");
        let (document, rich) = controller.parts_mut();
        append_rich_child(document, rich, italic, x).unwrap();
        assert_eq!(rich[italic].children, vec![x]);
        assert_eq!(controller.inner_html(), "<i>x</i>");
    }
}
