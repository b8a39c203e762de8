//! Lump nodes
//!
//! A lump node is an element edited as one unit. The caret never rests
//! inside it, and removing it takes two backspaces: the first flags it, the
//! second removes it.

use carve_dom::{DomTree, NodeId};

use crate::handlers::{BackspacePlugin, TabInputPlugin};
use crate::{
    EditorController, EditorError, EditorResult, INVISIBLE_SPACE, Manipulation, ManipulationGuidance,
};

/// RDFa property marking an element as a lump node
pub const LUMP_NODE_PROPERTY: &str = "http://lblod.data.gift/vocabularies/editor/isLumpNode";

/// Attribute flagging an element for removal on the next backspace
pub const FLAGGED_REMOVE: &str = "data-flagged-remove";

pub fn is_lump_node(tree: &DomTree, node: NodeId) -> bool {
    tree.get_attr(node, "property")
        .is_some_and(|value| value.split_whitespace().any(|p| p == LUMP_NODE_PROPERTY))
}

/// Outermost lump node containing `node` (inclusive), below `root`
pub fn get_parent_lump_node(tree: &DomTree, node: NodeId, root: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|n| *n != root)
        .filter(|n| is_lump_node(tree, *n))
        .last()
}

pub fn is_in_lump_node(tree: &DomTree, node: NodeId, root: NodeId) -> bool {
    get_parent_lump_node(tree, node, root).is_some()
}

/// Text node directly after `lump`, created when missing
pub fn text_after_lump_node(controller: &mut EditorController, lump: NodeId) -> EditorResult<NodeId> {
    if let Some(next) = controller.tree().next_sibling(lump).filter(|n| controller.tree().is_text(*n)) {
        return Ok(next);
    }
    let text = controller.document_mut().create_text(&INVISIBLE_SPACE.to_string());
    controller.document_mut().insert_after(lump, text)?;
    controller.update_rich_node();
    Ok(text)
}

/// Text node directly before `lump`, created when missing
pub fn text_before_lump_node(controller: &mut EditorController, lump: NodeId) -> EditorResult<NodeId> {
    if let Some(previous) = controller.tree().prev_sibling(lump).filter(|n| controller.tree().is_text(*n)) {
        return Ok(previous);
    }
    let text = controller.document_mut().create_text(&INVISIBLE_SPACE.to_string());
    let parent = controller.tree().parent(lump).ok_or(EditorError::MissingParent {
        node: lump,
        action: "insert text before lump node",
    })?;
    controller.document_mut().insert_before(parent, text, Some(lump))?;
    controller.update_rich_node();
    Ok(text)
}

fn is_flagged(tree: &DomTree, lump: NodeId) -> bool {
    tree.get_attr(lump, FLAGGED_REMOVE) == Some("complete")
}

/// Two-step removal of lump nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct LumpNodeBackspacePlugin;

impl LumpNodeBackspacePlugin {
    fn lump_for(manipulation: &Manipulation, controller: &EditorController) -> Option<NodeId> {
        get_parent_lump_node(controller.tree(), manipulation.node(), controller.root_node())
    }
}

impl BackspacePlugin for LumpNodeBackspacePlugin {
    fn label(&self) -> &str {
        "backspace plugin for handling lump nodes"
    }

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        let lump = Self::lump_for(manipulation, controller)?;
        Some(ManipulationGuidance::execute_with(move |_, controller| {
            if is_flagged(controller.tree(), lump) {
                let parent = controller.tree().parent(lump);
                let index = controller.tree().index_of(lump);
                if let (Some(parent), Some(index)) = (parent, index) {
                    controller.set_caret(parent, index)?;
                }
                controller.document_mut().remove_node(lump)?;
                controller.update_rich_node();
            } else {
                controller.document_mut().set_attr(lump, FLAGGED_REMOVE, "complete");
            }
            Ok(())
        }))
    }

    fn detect_change(&self, manipulation: &Manipulation, controller: &EditorController) -> bool {
        let tree = controller.tree();
        let node = manipulation.node();
        if !tree.contains(controller.root_node(), node) {
            // detached nodes keep their attributes, so the lump is found either way
            return std::iter::once(node)
                .chain(tree.ancestors(node))
                .any(|n| is_lump_node(tree, n));
        }
        Self::lump_for(manipulation, controller).is_some_and(|lump| is_flagged(tree, lump))
    }
}

/// Tab jumps over lump nodes instead of entering them
#[derive(Debug, Clone, Copy, Default)]
pub struct LumpNodeTabInputPlugin;

impl TabInputPlugin for LumpNodeTabInputPlugin {
    fn label(&self) -> &str {
        "tab input plugin for handling lump nodes"
    }

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        let forward = match manipulation {
            Manipulation::MoveCursorToStartOfElement { .. }
            | Manipulation::MoveCursorAfterElement { .. } => true,
            Manipulation::MoveCursorToEndOfElement { .. }
            | Manipulation::MoveCursorBeforeElement { .. } => false,
            _ => return None,
        };
        let lump = get_parent_lump_node(controller.tree(), manipulation.node(), controller.root_node())?;
        Some(ManipulationGuidance::execute_with(move |_, controller| {
            if forward {
                let text = text_after_lump_node(controller, lump)?;
                controller.set_caret(text, 0)
            } else {
                let text = text_before_lump_node(controller, lump)?;
                let length = controller.tree().text_len(text);
                controller.set_caret(text, length)
            }
        }))
    }
}
