//! Tab handler
//!
//! Tab walks the caret into the next element, or out of the current one.
//! Shift+Tab walks backwards.

use carve_dom::NodeId;

use crate::handlers::execute_default;
use crate::manipulation::arbitrate;
use crate::plugins::{ListTabInputPlugin, LumpNodeTabInputPlugin};
use crate::{
    EditorController, EditorError, EditorResult, HandlerResponse, Key, KeyEvent, Manipulation,
    ManipulationGuidance,
};

/// Extension point for tab behaviour
pub trait TabInputPlugin {
    fn label(&self) -> &str;

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

impl TabDirection {
    fn of(event: &KeyEvent) -> Self {
        if event.shift {
            TabDirection::Backward
        } else {
            TabDirection::Forward
        }
    }
}

pub struct TabHandler {
    plugins: Vec<Box<dyn TabInputPlugin>>,
}

impl Default for TabHandler {
    fn default() -> Self {
        let mut handler = Self::without_plugins();
        handler.register_plugin(ListTabInputPlugin);
        handler.register_plugin(LumpNodeTabInputPlugin);
        handler
    }
}

impl TabHandler {
    pub fn without_plugins() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn register_plugin(&mut self, plugin: impl TabInputPlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    pub fn is_handler_for(&self, event: &KeyEvent, controller: &EditorController) -> bool {
        event.is_key_down()
            && event.key == Key::Tab
            && !event.ctrl
            && !event.alt
            && controller.current_selection_is_a_cursor()
            && controller
                .current_node()
                .is_some_and(|node| controller.tree().contains(controller.root_node(), node))
    }

    pub fn handle_event(
        &self,
        event: &KeyEvent,
        controller: &mut EditorController,
    ) -> EditorResult<HandlerResponse> {
        self.tab(TabDirection::of(event), controller)?;
        Ok(HandlerResponse::handled())
    }

    /// Move the caret one element in `direction`; `false` when nothing moved
    pub fn tab(&self, direction: TabDirection, controller: &mut EditorController) -> EditorResult<bool> {
        controller.update_rich_node();
        controller.refresh_selection_from_native();
        let node = controller.current_node().ok_or(EditorError::NoCursor)?;

        let Some(manipulation) = self.manipulation_for(direction, node, controller) else {
            tracing::debug!("Nothing to tab to from {}", node);
            return Ok(false);
        };

        let reports = self
            .plugins
            .iter()
            .filter_map(|plugin| {
                plugin
                    .guidance_for_manipulation(&manipulation, controller)
                    .map(|guidance| (plugin.label().to_string(), guidance))
            })
            .collect();
        let verdict = arbitrate(&manipulation, reports)?;
        if !verdict.may_execute {
            tracing::warn!("Not allowed to execute manipulation for tab: {}", manipulation);
            return Ok(false);
        }
        match verdict.executor {
            Some(executor) => executor(&manipulation, controller)?,
            None => execute_default(&manipulation, controller)?,
        }
        Ok(true)
    }

    /// Manipulation for a tab from `node`
    pub fn manipulation_for(
        &self,
        direction: TabDirection,
        node: NodeId,
        controller: &EditorController,
    ) -> Option<Manipulation> {
        let tree = controller.tree();
        let is_target = |candidate: &NodeId| tree.is_element(*candidate) && !tree.is_void(*candidate);
        let leave = tree.parent(node).filter(|parent| *parent != controller.root_node());

        match direction {
            TabDirection::Forward => {
                let next = std::iter::successors(tree.next_sibling(node), |n| tree.next_sibling(*n))
                    .find(is_target);
                match next {
                    Some(element) => Some(Manipulation::MoveCursorToStartOfElement { node: element }),
                    None => leave.map(|parent| Manipulation::MoveCursorAfterElement { node: parent }),
                }
            }
            TabDirection::Backward => {
                let previous =
                    std::iter::successors(tree.prev_sibling(node), |n| tree.prev_sibling(*n))
                        .find(is_target);
                match previous {
                    Some(element) => Some(Manipulation::MoveCursorToEndOfElement { node: element }),
                    None => leave.map(|parent| Manipulation::MoveCursorBeforeElement { node: parent }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn controller(html: &str) -> EditorController {
        let mut controller = EditorController::from_html(html, Config::default()).unwrap();
        controller.set_current_position(0).unwrap();
        controller
    }

    fn current_text(controller: &EditorController) -> String {
        let node = controller.current_node().unwrap();
        controller.tree().text(node).unwrap_or_default().to_string()
    }

    #[test]
    fn test_tab_through_paragraphs() {
        let mut controller = controller("<p>baz</p><p>foo</p>");
        let handler = TabHandler::default();
        assert!(handler.tab(TabDirection::Forward, &mut controller).unwrap());
        assert!(handler.tab(TabDirection::Forward, &mut controller).unwrap());
        assert_eq!(current_text(&controller), "foo");
        // the placeholder between the paragraphs takes one position
        assert_eq!(controller.current_position(), Some(4));
    }

    #[test]
    fn test_tab_exits_element() {
        let mut controller = controller("<div>baz</div>bar<span>foo</span>");
        TabHandler::default()
            .tab(TabDirection::Forward, &mut controller)
            .unwrap();
        assert_eq!(current_text(&controller), "bar");
        assert_eq!(controller.current_position(), Some(3));
    }

    #[test]
    fn test_tab_skips_void_elements() {
        let mut controller = controller("<div>baz <br> boom <span>foo</span>bar</div>");
        TabHandler::default()
            .tab(TabDirection::Forward, &mut controller)
            .unwrap();
        assert_eq!(current_text(&controller), "foo");
    }

    #[test]
    fn test_tab_at_editor_end_does_nothing() {
        let mut controller = controller("foo");
        assert!(!TabHandler::default()
            .tab(TabDirection::Forward, &mut controller)
            .unwrap());
        assert_eq!(controller.current_position(), Some(0));
    }

    #[test]
    fn test_shift_tab_enters_previous_element() {
        let mut controller = controller("<b>baz</b>foo");
        let root = controller.root_node();
        let foo = controller.tree().child_at(root, 1).unwrap();
        controller.set_caret(foo, 2).unwrap();
        TabHandler::default()
            .tab(TabDirection::Backward, &mut controller)
            .unwrap();
        assert_eq!(current_text(&controller), "baz");
        assert_eq!(controller.current_position(), Some(3));
    }

    #[test]
    fn test_is_handler_for() {
        let controller = controller("foo");
        let handler = TabHandler::default();
        assert!(handler.is_handler_for(&KeyEvent::key_down(Key::Tab), &controller));
        assert!(handler.is_handler_for(&KeyEvent::key_down(Key::Tab).with_shift(), &controller));
        assert!(!handler.is_handler_for(&KeyEvent::key_up(Key::Tab), &controller));
        assert!(!handler.is_handler_for(&KeyEvent::key_down(Key::Tab).with_ctrl(), &controller));
    }
}
