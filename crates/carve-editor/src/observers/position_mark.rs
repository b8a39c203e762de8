//! Marks the element ancestors of the caret
//!
//! Styling hooks: every element between the caret and the editor root gets
//! `data-editor-position-level` (0 is the innermost), and annotated elements
//! additionally get `data-editor-rdfa-position-level`.

use carve_dom::{NodeId, TreeWalker, WhatToShow};

use crate::plugins::rdfa::is_rdfa_node;
use crate::{EditorController, EditorResult, EditorSelection, MovementObserver};

pub const POSITION_LEVEL: &str = "data-editor-position-level";
pub const RDFA_POSITION_LEVEL: &str = "data-editor-rdfa-position-level";

#[derive(Debug, Clone, Copy, Default)]
pub struct PositionMarkMovementObserver;

impl PositionMarkMovementObserver {
    fn clear_marks(controller: &mut EditorController) {
        let mut marked: Vec<NodeId> = Vec::new();
        let mut walker = TreeWalker::new(NodeId::ROOT, WhatToShow::ELEMENT);
        while let Some(node) = walker.next_node(controller.tree()) {
            let tree = controller.tree();
            if tree.get_attr(node, POSITION_LEVEL).is_some()
                || tree.get_attr(node, RDFA_POSITION_LEVEL).is_some()
            {
                marked.push(node);
            }
        }
        for node in marked {
            controller.document_mut().remove_attr(node, POSITION_LEVEL);
            controller.document_mut().remove_attr(node, RDFA_POSITION_LEVEL);
        }
    }
}

impl MovementObserver for PositionMarkMovementObserver {
    fn handle_movement(
        &mut self,
        controller: &mut EditorController,
        _old: &EditorSelection,
        new: &EditorSelection,
    ) -> EditorResult<()> {
        Self::clear_marks(controller);
        if !new.range.collapsed() {
            return Ok(());
        }

        let root = controller.root_node();
        let tree = controller.tree();
        let start = new.range.start_container();
        let elements: Vec<NodeId> = std::iter::once(start)
            .chain(tree.ancestors(start))
            .take_while(|n| *n != root)
            .filter(|n| tree.is_element(*n))
            .collect();
        let annotated: Vec<NodeId> = elements
            .iter()
            .copied()
            .filter(|n| is_rdfa_node(tree, *n))
            .collect();

        for (level, node) in elements.into_iter().enumerate() {
            controller.document_mut().set_attr(node, POSITION_LEVEL, level.to_string());
        }
        for (level, node) in annotated.into_iter().enumerate() {
            controller.document_mut().set_attr(node, RDFA_POSITION_LEVEL, level.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_marks_follow_the_caret() {
        let mut controller = EditorController::from_html(
            r#"<div typeof="ex:Doc"><p>one <b>two</b></p></div><p>three</p>"#,
            Config::default(),
        )
        .unwrap();
        controller.register_movement_observer(PositionMarkMovementObserver);
        let root = controller.root_node();
        let div = controller.tree().first_child(root).unwrap();
        let paragraph = controller.tree().first_child(div).unwrap();
        let bold = controller.tree().child_at(paragraph, 1).unwrap();
        let two = controller.tree().first_child(bold).unwrap();

        controller.set_caret(two, 1).unwrap();
        let tree = controller.tree();
        assert_eq!(tree.get_attr(bold, POSITION_LEVEL), Some("0"));
        assert_eq!(tree.get_attr(paragraph, POSITION_LEVEL), Some("1"));
        assert_eq!(tree.get_attr(div, POSITION_LEVEL), Some("2"));
        assert_eq!(tree.get_attr(div, RDFA_POSITION_LEVEL), Some("0"));
        assert_eq!(tree.get_attr(root, POSITION_LEVEL), None);

        controller.set_current_position(9).unwrap();
        let tree = controller.tree();
        assert_eq!(tree.get_attr(bold, POSITION_LEVEL), None);
        assert_eq!(tree.get_attr(div, RDFA_POSITION_LEVEL), None);
        let second = tree.child_at(root, 1).unwrap();
        assert_eq!(tree.get_attr(second, POSITION_LEVEL), Some("0"));
    }
}
