//! Keeps the caret out of lump nodes

use crate::plugins::lump_node::{
    FLAGGED_REMOVE, get_parent_lump_node, is_in_lump_node, text_after_lump_node,
    text_before_lump_node,
};
use crate::{EditorController, EditorResult, EditorSelection, MovementObserver};

#[derive(Debug, Clone, Copy, Default)]
pub struct LumpNodeMovementObserver;

impl MovementObserver for LumpNodeMovementObserver {
    fn handle_movement(
        &mut self,
        controller: &mut EditorController,
        old: &EditorSelection,
        new: &EditorSelection,
    ) -> EditorResult<()> {
        let root = controller.root_node();

        // a removal flag left behind by backspace is stale once the caret moves on
        let previous = old.range.start_container();
        if controller.tree().parent(previous).is_some() && old.region.start != new.region.start {
            let flagged = controller
                .tree()
                .prev_sibling(previous)
                .and_then(|before| get_parent_lump_node(controller.tree(), before, root))
                .filter(|lump| controller.tree().get_attr(*lump, FLAGGED_REMOVE).is_some());
            if let Some(lump) = flagged {
                tracing::debug!("Clearing removal flag of lump node {}", lump);
                controller.document_mut().remove_attr(lump, FLAGGED_REMOVE);
            }
        }

        let start = new.range.start_container();
        if let Some(lump) = get_parent_lump_node(controller.tree(), start, root) {
            if old.region.start > new.region.start {
                let text = text_before_lump_node(controller, lump)?;
                let length = controller.tree().text_len(text);
                controller.set_caret(text, length)?;
            } else {
                let text = text_after_lump_node(controller, lump)?;
                controller.set_caret(text, 0)?;
            }
        } else if is_in_lump_node(controller.tree(), new.range.end_container(), root) {
            controller.set_caret(start, new.range.start_offset())?;
        }
        Ok(())
    }
}
