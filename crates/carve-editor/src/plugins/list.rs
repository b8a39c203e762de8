//! Tab navigation through lists

use carve_dom::{DomTree, NodeId};

use crate::handlers::TabInputPlugin;
use crate::plugins::lump_node::is_in_lump_node;
use crate::{EditorController, EditorError, EditorResult, Manipulation, ManipulationGuidance};

const LIST_TAGS: &[&str] = &["ul", "ol"];

fn is_list(tree: &DomTree, node: NodeId) -> bool {
    tree.has_tag(node, LIST_TAGS)
}

fn is_list_item(tree: &DomTree, node: NodeId) -> bool {
    tree.has_tag(node, &["li"])
}

fn next_item(tree: &DomTree, item: NodeId) -> Option<NodeId> {
    std::iter::successors(tree.next_sibling(item), |n| tree.next_sibling(*n))
        .find(|n| is_list_item(tree, *n))
}

fn previous_item(tree: &DomTree, item: NodeId) -> Option<NodeId> {
    std::iter::successors(tree.prev_sibling(item), |n| tree.prev_sibling(*n))
        .find(|n| is_list_item(tree, *n))
}

fn first_item(tree: &DomTree, list: NodeId) -> Option<NodeId> {
    tree.child_ids(list).into_iter().find(|n| is_list_item(tree, *n))
}

fn last_item(tree: &DomTree, list: NodeId) -> Option<NodeId> {
    tree.child_ids(list).into_iter().rev().find(|n| is_list_item(tree, *n))
}

fn position_of(tree: &DomTree, node: NodeId) -> EditorResult<(NodeId, usize)> {
    match (tree.parent(node), tree.index_of(node)) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditorError::MissingParent {
            node,
            action: "tab through list",
        }),
    }
}

/// Where the caret goes when leaving list item `item`
fn leave_item_forward(controller: &mut EditorController, item: NodeId) -> EditorResult<()> {
    let tree = controller.tree();
    if let Some(next) = next_item(tree, item) {
        return controller.set_caret(next, 0);
    }
    let (list, _) = position_of(tree, item)?;
    let (container, list_index) = position_of(tree, list)?;
    if !is_list_item(tree, container) {
        return controller.set_caret(container, list_index + 1);
    }
    // last item of a nested list: continue in the parent list
    match next_item(tree, container) {
        Some(next) => controller.set_caret(next, 0),
        None => {
            let item = controller.document_mut().create_element("li");
            controller.document_mut().insert_after(container, item)?;
            controller.update_rich_node();
            controller.set_caret(item, 0)
        }
    }
}

fn leave_item_backward(controller: &mut EditorController, item: NodeId) -> EditorResult<()> {
    let tree = controller.tree();
    if let Some(previous) = previous_item(tree, item) {
        let length = tree.child_count(previous);
        return controller.set_caret(previous, length);
    }
    let (list, _) = position_of(tree, item)?;
    let (container, list_index) = position_of(tree, list)?;
    controller.set_caret(container, list_index)
}

/// Keeps tab movement on list items instead of between them
#[derive(Debug, Clone, Copy, Default)]
pub struct ListTabInputPlugin;

impl TabInputPlugin for ListTabInputPlugin {
    fn label(&self) -> &str {
        "tab input plugin for handling lists"
    }

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        let tree = controller.tree();
        let node = manipulation.node();
        if is_in_lump_node(tree, node, controller.root_node()) {
            return None;
        }
        match *manipulation {
            Manipulation::MoveCursorAfterElement { node } if is_list_item(tree, node) => Some(
                ManipulationGuidance::execute_with(move |_, controller| {
                    leave_item_forward(controller, node)
                }),
            ),
            Manipulation::MoveCursorBeforeElement { node } if is_list_item(tree, node) => Some(
                ManipulationGuidance::execute_with(move |_, controller| {
                    leave_item_backward(controller, node)
                }),
            ),
            Manipulation::MoveCursorToStartOfElement { node } if is_list(tree, node) => {
                let item = first_item(tree, node)?;
                Some(ManipulationGuidance::execute_with(move |_, controller| {
                    controller.set_caret(item, 0)
                }))
            }
            Manipulation::MoveCursorToEndOfElement { node } if is_list(tree, node) => {
                let item = last_item(tree, node)?;
                Some(ManipulationGuidance::execute_with(move |_, controller| {
                    let length = controller.tree().child_count(item);
                    controller.set_caret(item, length)
                }))
            }
            _ => None,
        }
    }
}
