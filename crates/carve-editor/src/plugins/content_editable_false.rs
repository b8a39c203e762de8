//! Non-editable elements

use carve_dom::{DomTree, NodeId};

use crate::handlers::BackspacePlugin;
use crate::{EditorController, EditorError, Manipulation, ManipulationGuidance, string_to_visible_text};

pub fn is_non_editable(tree: &DomTree, node: NodeId) -> bool {
    tree.get_attr(node, "contenteditable")
        .is_some_and(|value| value.eq_ignore_ascii_case("false"))
}

/// Backspace skips over non-editable elements instead of entering them
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentEditableFalseBackspacePlugin;

impl BackspacePlugin for ContentEditableFalseBackspacePlugin {
    fn label(&self) -> &str {
        "backspace plugin for handling non-editable elements"
    }

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        let Manipulation::MoveCursorToEndOfNode { node } = *manipulation else {
            return None;
        };
        let tree = controller.tree();
        // invisible ones are left to the empty element plugin
        let visible = !string_to_visible_text(&tree.text_content(node)).is_empty()
            || controller.client_width(node) > 0.0;
        if !is_non_editable(tree, node) || !visible {
            return None;
        }
        Some(ManipulationGuidance::execute_with(move |_, controller| {
            let tree = controller.tree();
            let (Some(parent), Some(index)) = (tree.parent(node), tree.index_of(node)) else {
                return Err(EditorError::MissingParent {
                    node,
                    action: "move caret before non-editable element",
                });
            };
            controller.set_caret(parent, index)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_jumps_before_non_editable_element() {
        let mut controller = EditorController::from_html(
            r#"ab<span contenteditable="false">locked</span>cd"#,
            Config::default(),
        )
        .unwrap();
        let root = controller.root_node();
        let span = controller.tree().child_at(root, 1).unwrap();
        let manipulation = Manipulation::MoveCursorToEndOfNode { node: span };
        let guidance = ContentEditableFalseBackspacePlugin
            .guidance_for_manipulation(&manipulation, &controller)
            .unwrap();
        (guidance.executor.unwrap())(&manipulation, &mut controller).unwrap();
        assert_eq!(controller.current_position(), Some(2));
        assert_eq!(controller.inner_html(), r#"ab<span contenteditable="false">locked</span>cd"#);
    }

    #[test]
    fn test_editable_elements_are_ignored() {
        let controller = EditorController::from_html("ab<b>x</b>", Config::default()).unwrap();
        let bold = controller.tree().child_at(controller.root_node(), 1).unwrap();
        assert!(ContentEditableFalseBackspacePlugin
            .guidance_for_manipulation(&Manipulation::MoveCursorToEndOfNode { node: bold }, &controller)
            .is_none());
    }
}
