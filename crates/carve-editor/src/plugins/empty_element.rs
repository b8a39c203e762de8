//! Removal of elements without visible content

use carve_dom::NodeId;

use crate::handlers::BackspacePlugin;
use crate::plugins::lump_node::is_in_lump_node;
use crate::{EditorController, EditorError, Manipulation, ManipulationGuidance, string_to_visible_text};

/// Backspacing into an element nobody can see removes it instead
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyElementBackspacePlugin;

fn is_invisible(controller: &EditorController, node: NodeId) -> bool {
    string_to_visible_text(&controller.tree().text_content(node)).is_empty()
        && controller.client_width(node) == 0.0
}

impl BackspacePlugin for EmptyElementBackspacePlugin {
    fn label(&self) -> &str {
        "backspace plugin for removing empty elements"
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
        let claim = tree.is_element(node)
            && is_invisible(controller, node)
            && !is_in_lump_node(tree, node, controller.root_node());
        if !claim {
            return None;
        }
        Some(ManipulationGuidance::execute_with(move |_, controller| {
            let tree = controller.tree();
            let (Some(parent), Some(index)) = (tree.parent(node), tree.index_of(node)) else {
                return Err(EditorError::MissingParent {
                    node,
                    action: "remove empty element",
                });
            };
            controller.set_caret(parent, index)?;
            controller.document_mut().remove_node(node)?;
            controller.update_rich_node();
            Ok(())
        }))
    }

    fn detect_change(&self, manipulation: &Manipulation, controller: &EditorController) -> bool {
        matches!(*manipulation, Manipulation::MoveCursorToEndOfNode { node }
            if controller.tree().is_element(node)
                && !controller.tree().contains(controller.root_node(), node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn controller(html: &str) -> EditorController {
        EditorController::from_html(html, Config::default()).unwrap()
    }

    fn guidance(controller: &EditorController, index: usize) -> Option<ManipulationGuidance> {
        let node = controller.tree().child_at(controller.root_node(), index).unwrap();
        EmptyElementBackspacePlugin
            .guidance_for_manipulation(&Manipulation::MoveCursorToEndOfNode { node }, controller)
    }

    #[test]
    fn test_claims_only_invisible_elements() {
        let controller = controller("a<span></span><span> \u{200B}</span><b>x</b><span><img></span>");
        assert!(guidance(&controller, 1).is_some());
        assert!(guidance(&controller, 2).is_some());
        assert!(guidance(&controller, 3).is_none());
        assert!(guidance(&controller, 4).is_none());
    }

    #[test]
    fn test_removes_element_and_reports_change() {
        let mut controller = controller("baz <span></span>foo");
        let span = controller.tree().child_at(controller.root_node(), 1).unwrap();
        let manipulation = Manipulation::MoveCursorToEndOfNode { node: span };
        let guidance = EmptyElementBackspacePlugin
            .guidance_for_manipulation(&manipulation, &controller)
            .unwrap();
        (guidance.executor.unwrap())(&manipulation, &mut controller).unwrap();
        assert_eq!(controller.inner_html(), "baz foo");
        assert_eq!(controller.current_position(), Some(4));
        assert!(EmptyElementBackspacePlugin.detect_change(&manipulation, &controller));
    }
}
