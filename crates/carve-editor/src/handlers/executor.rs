//! Default manipulation executor

use carve_dom::NodeId;

use crate::{EditorController, EditorError, EditorResult, INVISIBLE_SPACE, Manipulation};

/// Parent and index of `node`, failing for a detached node
fn parent_and_index(
    controller: &EditorController,
    node: NodeId,
    action: &'static str,
) -> EditorResult<(NodeId, usize)> {
    let tree = controller.tree();
    match (tree.parent(node), tree.index_of(node)) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditorError::MissingParent { node, action }),
    }
}

/// Park the caret where `node` is and remove it
fn remove_behind_caret(
    controller: &mut EditorController,
    node: NodeId,
    action: &'static str,
) -> EditorResult<()> {
    let (parent, index) = parent_and_index(controller, node, action)?;
    controller.set_caret(parent, index)?;
    controller.document_mut().remove_node(node)?;
    controller.update_rich_node();
    Ok(())
}

fn remove_character(
    controller: &mut EditorController,
    node: NodeId,
    position: usize,
) -> EditorResult<()> {
    let Some(text) = controller.tree().text(node) else {
        return Err(EditorError::UnresolvablePosition {
            node,
            offset: position,
        });
    };
    let mut content: String = text
        .chars()
        .enumerate()
        .filter_map(|(index, c)| (index != position).then_some(c))
        .collect();
    if content.is_empty() {
        content.push(INVISIBLE_SPACE);
    }
    controller.document_mut().set_text(node, content)?;
    controller.update_rich_node();
    controller.set_caret(node, position)
}

/// Perform `manipulation` without plugin involvement.
///
/// Removals always relocate the caret before detaching the node.
pub fn execute_default(
    manipulation: &Manipulation,
    controller: &mut EditorController,
) -> EditorResult<()> {
    tracing::debug!("Executing default manipulation {}", manipulation);
    match *manipulation {
        Manipulation::RemoveCharacter { node, position } => {
            remove_character(controller, node, position)
        }
        Manipulation::RemoveEmptyTextNode { node } => {
            parent_and_index(controller, node, "remove empty text node")?;
            controller.document_mut().remove_node(node)?;
            controller.update_rich_node();
            Ok(())
        }
        Manipulation::RemoveEmptyElement { node } => {
            remove_behind_caret(controller, node, "remove empty element")
        }
        Manipulation::RemoveVoidElement { node } => {
            remove_behind_caret(controller, node, "remove void element")
        }
        Manipulation::RemoveOtherNode { node } => {
            remove_behind_caret(controller, node, "remove node")
        }
        Manipulation::RemoveElementWithChildrenThatArentVisible { node } => {
            remove_behind_caret(controller, node, "remove invisible element")
        }
        Manipulation::MoveCursorToEndOfNode { node }
        | Manipulation::MoveCursorToEndOfElement { node } => {
            let length = controller.tree().child_count(node);
            controller.set_caret(node, length)
        }
        Manipulation::MoveCursorToStartOfElement { node } => controller.set_caret(node, 0),
        Manipulation::MoveCursorBeforeElement { node } => {
            let (parent, index) = parent_and_index(controller, node, "move caret before")?;
            controller.set_caret(parent, index)
        }
        Manipulation::MoveCursorAfterElement { node } => {
            let (parent, index) = parent_and_index(controller, node, "move caret after")?;
            controller.set_caret(parent, index + 1)
        }
    }
}
