//! Backspace handler
//!
//! One keystroke runs a bounded loop: sync the selection, measure the caret,
//! classify what sits before it, arbitrate the resulting manipulation between
//! plugins, execute, wait for a paint and check whether anything visibly
//! changed. Invisible edits (placeholders, empty nodes) just go around again.

use carve_dom::{DOMRectList, NodeData, NodeId};

use crate::handlers::execute_default;
use crate::manipulation::arbitrate;
use crate::plugins::{EmptyElementBackspacePlugin, LumpNodeBackspacePlugin, RdfaBackspacePlugin};
use crate::{
    Config, DefaultVisibility, EditorController, EditorError, EditorResult, HandlerResponse, Key,
    KeyEvent, Manipulation, ManipulationGuidance, PaintCycle, VisibilityPolicy, YieldingPaint,
};

/// Extension point for backspace behaviour
pub trait BackspacePlugin {
    /// Name used in diagnostics
    fn label(&self) -> &str;

    /// Opinion on a manipulation; `None` means no opinion
    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance>;

    /// Report a change the caret geometry would not show
    fn detect_change(&self, _manipulation: &Manipulation, _controller: &EditorController) -> bool {
        false
    }
}

/// What sits directly before the caret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingBeforeCursor {
    /// A character at `position` inside text node `node`
    Character { node: NodeId, position: usize },
    EmptyTextNodeStart { node: NodeId },
    EmptyTextNodeEnd { node: NodeId },
    VoidElement { node: NodeId },
    ElementEnd { node: NodeId },
    ElementStart { node: NodeId },
    UncommonNodeEnd { node: NodeId },
    EditorRootStart,
}

/// Result of one backspace keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackspaceOutcome {
    /// A change was observed after `attempts` iterations
    Changed { attempts: usize },
    /// A plugin vetoed the manipulation
    Vetoed,
    /// Nothing left before the caret
    AtEditorStart,
    /// The retry budget ran out without an observed change
    RetriesExhausted,
}

/// Backspace state machine with its plugins
pub struct BackspaceHandler {
    plugins: Vec<Box<dyn BackspacePlugin>>,
    paint: Box<dyn PaintCycle>,
    visibility: Box<dyn VisibilityPolicy>,
    max_tries: usize,
}

impl BackspaceHandler {
    /// Handler with the default plugins
    pub fn new(config: &Config) -> Self {
        let mut handler = Self::without_plugins(config);
        handler.register_plugin(LumpNodeBackspacePlugin);
        handler.register_plugin(RdfaBackspacePlugin::new(config.rdfa_almost_complete_threshold));
        handler.register_plugin(EmptyElementBackspacePlugin);
        handler
    }

    pub fn without_plugins(config: &Config) -> Self {
        Self {
            plugins: Vec::new(),
            paint: Box::new(YieldingPaint),
            visibility: Box::new(DefaultVisibility),
            max_tries: config.max_backspace_retries,
        }
    }

    /// Plugins are consulted in registration order
    pub fn register_plugin(&mut self, plugin: impl BackspacePlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    pub fn with_paint_cycle(mut self, paint: impl PaintCycle + 'static) -> Self {
        self.paint = Box::new(paint);
        self
    }

    pub fn with_visibility_policy(mut self, policy: impl VisibilityPolicy + 'static) -> Self {
        self.visibility = Box::new(policy);
        self
    }

    pub fn plugin_labels(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.label()).collect()
    }

    pub fn is_handler_for(&self, event: &KeyEvent, controller: &EditorController) -> bool {
        event.is_key_down()
            && event.key == Key::Backspace
            && controller.current_selection_is_a_cursor()
            && controller
                .current_node()
                .is_some_and(|node| controller.tree().contains(controller.root_node(), node))
    }

    pub async fn handle_event(
        &self,
        controller: &mut EditorController,
    ) -> EditorResult<HandlerResponse> {
        let outcome = self.backspace(controller).await?;
        tracing::debug!("Backspace finished: {:?}", outcome);
        Ok(HandlerResponse::handled())
    }

    /// Remove whatever is before the caret, retrying until something visibly changed
    pub async fn backspace(&self, controller: &mut EditorController) -> EditorResult<BackspaceOutcome> {
        for attempt in 1..=self.max_tries {
            sync_selection(controller)?;
            let before = controller.caret_client_rects();

            let thing = self.thing_before_cursor(controller)?;
            let Some(manipulation) = self.manipulation_for(thing, controller) else {
                tracing::debug!("Caret is at the start of the editor");
                return Ok(BackspaceOutcome::AtEditorStart);
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
                tracing::warn!("Not allowed to execute manipulation for backspace: {}", manipulation);
                return Ok(BackspaceOutcome::Vetoed);
            }
            match verdict.executor {
                Some(executor) => executor(&manipulation, controller)?,
                None => execute_default(&manipulation, controller)?,
            }

            self.paint.after_next_paint().await;

            let reported = self
                .plugins
                .iter()
                .any(|plugin| plugin.detect_change(&manipulation, controller));
            if reported || visible_change(&before, &controller.caret_client_rects()) {
                return Ok(BackspaceOutcome::Changed { attempts: attempt });
            }
            tracing::trace!("No visible change after {}, retrying", manipulation);
        }
        tracing::warn!("Too many backspace tries, giving up removing content");
        Ok(BackspaceOutcome::RetriesExhausted)
    }

    /// Classify what sits before the caret
    pub fn thing_before_cursor(&self, controller: &EditorController) -> EditorResult<ThingBeforeCursor> {
        let (Some(node), Some(position)) = (controller.current_node(), controller.current_position())
        else {
            return Err(EditorError::NoCursor);
        };
        let tree = controller.tree();
        if !tree.is_text(node) {
            return Err(EditorError::UnresolvablePosition {
                node,
                offset: position,
            });
        }
        let rich = controller
            .get_rich_node_for(node)
            .ok_or(EditorError::StaleNode(node))?;
        let relative = position.saturating_sub(rich.start);

        if relative >= 1 {
            return Ok(ThingBeforeCursor::Character {
                node,
                position: relative - 1,
            });
        }
        if tree.text_len(node) == 0 {
            return Ok(ThingBeforeCursor::EmptyTextNodeStart { node });
        }

        let Some(previous) = tree.prev_sibling(node) else {
            let parent = tree.parent(node).ok_or(EditorError::MissingParent {
                node,
                action: "classify backspace",
            })?;
            return Ok(if parent == controller.root_node() {
                ThingBeforeCursor::EditorRootStart
            } else {
                ThingBeforeCursor::ElementStart { node: parent }
            });
        };

        let thing = match tree.get(previous).map(|n| &n.data) {
            Some(NodeData::Text(_)) => match tree.text_len(previous) {
                0 => ThingBeforeCursor::EmptyTextNodeEnd { node: previous },
                length => ThingBeforeCursor::Character {
                    node: previous,
                    position: length - 1,
                },
            },
            Some(NodeData::Element(_)) if tree.is_void(previous) => {
                ThingBeforeCursor::VoidElement { node: previous }
            }
            Some(NodeData::Element(_)) => ThingBeforeCursor::ElementEnd { node: previous },
            _ => ThingBeforeCursor::UncommonNodeEnd { node: previous },
        };
        Ok(thing)
    }

    /// Candidate manipulation for a classification, `None` at the editor start
    pub fn manipulation_for(
        &self,
        thing: ThingBeforeCursor,
        controller: &EditorController,
    ) -> Option<Manipulation> {
        let manipulation = match thing {
            ThingBeforeCursor::Character { node, position } => {
                Manipulation::RemoveCharacter { node, position }
            }
            ThingBeforeCursor::EmptyTextNodeStart { node }
            | ThingBeforeCursor::EmptyTextNodeEnd { node } => {
                Manipulation::RemoveEmptyTextNode { node }
            }
            ThingBeforeCursor::VoidElement { node } => Manipulation::RemoveVoidElement { node },
            ThingBeforeCursor::ElementEnd { node } => Manipulation::MoveCursorToEndOfNode { node },
            ThingBeforeCursor::ElementStart { node } => {
                if controller.tree().child_count(node) == 0 {
                    Manipulation::RemoveEmptyElement { node }
                } else if self.visibility.has_visible_children(controller, node) {
                    Manipulation::MoveCursorBeforeElement { node }
                } else {
                    Manipulation::RemoveElementWithChildrenThatArentVisible { node }
                }
            }
            ThingBeforeCursor::UncommonNodeEnd { node } => Manipulation::RemoveOtherNode { node },
            ThingBeforeCursor::EditorRootStart => return None,
        };
        Some(manipulation)
    }
}

/// Bring the editor selection in line with the native one before measuring
fn sync_selection(controller: &mut EditorController) -> EditorResult<()> {
    controller.update_rich_node();
    let Some(range) = controller.document().selection().get_range_at(0).copied() else {
        return Err(EditorError::NoCursor);
    };
    if controller.tree().is_element(range.start_container()) {
        controller.set_caret(range.start_container(), range.start_offset())
    } else {
        controller.update_current_selection(range);
        Ok(())
    }
}

/// Whether the caret moved, judged on the first client rect
fn visible_change(before: &DOMRectList, after: &DOMRectList) -> bool {
    match (before.item(0), after.item(0)) {
        (None, None) => false,
        (Some(old), Some(new)) => old.left() != new.left() || old.top() != new.top(),
        _ => true,
    }
}
