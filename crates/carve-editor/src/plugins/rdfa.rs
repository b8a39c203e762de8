//! Stepwise removal of RDFa-annotated elements
//!
//! Deleting into an annotated element flags it before it disappears:
//! `almost-complete` once little visible text is left, `complete` when the
//! last character goes, and removal of the element on the next backspace.

use carve_dom::{DomTree, NodeId};

use crate::handlers::BackspacePlugin;
use crate::plugins::lump_node::{FLAGGED_REMOVE, is_in_lump_node};
use crate::{
    EditorController, EditorError, EditorResult, Manipulation, ManipulationGuidance,
    string_to_visible_text,
};

/// Attributes that make an element carry RDFa
pub const RDFA_ATTRIBUTES: &[&str] = &[
    "about", "content", "datatype", "property", "rel", "resource", "rev", "typeof",
];

const ALMOST_COMPLETE: &str = "almost-complete";
const COMPLETE: &str = "complete";

pub fn is_rdfa_node(tree: &DomTree, node: NodeId) -> bool {
    tree.element(node)
        .is_some_and(|element| RDFA_ATTRIBUTES.iter().any(|attr| element.has_attr(attr)))
}

fn visible_length(tree: &DomTree, node: NodeId) -> usize {
    string_to_visible_text(&tree.text_content(node)).chars().count()
}

fn flag(tree: &DomTree, node: NodeId) -> Option<&str> {
    tree.get_attr(node, FLAGGED_REMOVE).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AlmostComplete,
    Complete,
    Remove,
}

/// What a manipulation acts on, from the plugin's point of view
#[derive(Debug, Clone, Copy)]
enum Target {
    /// A text manipulation inside annotated `element`
    Text { node: NodeId, element: NodeId },
    /// An element manipulation
    Element(NodeId),
}

#[derive(Debug, Clone, Copy)]
pub struct RdfaBackspacePlugin {
    threshold: usize,
}

impl Default for RdfaBackspacePlugin {
    fn default() -> Self {
        Self::new(5)
    }
}

impl RdfaBackspacePlugin {
    /// `threshold` is the visible length under which an element gets flagged
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    fn target(manipulation: &Manipulation, controller: &EditorController) -> Option<Target> {
        let tree = controller.tree();
        let root = controller.root_node();
        let target = match *manipulation {
            Manipulation::RemoveCharacter { node, .. } | Manipulation::RemoveEmptyTextNode { node } => {
                let element = tree.parent(node).filter(|parent| *parent != root)?;
                Target::Text { node, element }
            }
            Manipulation::RemoveEmptyElement { node }
            | Manipulation::RemoveVoidElement { node }
            | Manipulation::RemoveElementWithChildrenThatArentVisible { node } => Target::Element(node),
            _ => return None,
        };
        let element = match target {
            Target::Text { element, .. } => element,
            Target::Element(element) => element,
        };
        (!is_in_lump_node(tree, element, root)).then_some(target)
    }

    fn step_for(&self, target: Target, tree: &DomTree) -> Option<Step> {
        match target {
            Target::Text { element, .. } => {
                let length = visible_length(tree, element);
                match flag(tree, element) {
                    Some(COMPLETE) if length == 0 => Some(Step::Remove),
                    Some(ALMOST_COMPLETE) if length == 1 => Some(Step::Complete),
                    None if length < self.threshold && is_rdfa_node(tree, element) => {
                        Some(Step::AlmostComplete)
                    }
                    _ => None,
                }
            }
            Target::Element(element) if flag(tree, element) == Some(COMPLETE) => Some(Step::Remove),
            Target::Element(element) if is_rdfa_node(tree, element) => Some(Step::Complete),
            Target::Element(_) => None,
        }
    }
}

impl BackspacePlugin for RdfaBackspacePlugin {
    fn label(&self) -> &str {
        "backspace plugin for handling RDFa specific logic"
    }

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        let target = Self::target(manipulation, controller)?;
        let step = self.step_for(target, controller.tree())?;
        let threshold = self.threshold;
        tracing::debug!("RDFa step {:?} for {}", step, manipulation);
        Some(ManipulationGuidance::execute_with(move |_, controller| match step {
            Step::AlmostComplete => {
                if let Target::Text { element, .. } = target {
                    controller.document_mut().set_attr(element, FLAGGED_REMOVE, ALMOST_COMPLETE);
                }
                Ok(())
            }
            Step::Complete => execute_complete_step(controller, target),
            Step::Remove => execute_remove_step(controller, target, threshold),
        }))
    }

    fn detect_change(&self, manipulation: &Manipulation, controller: &EditorController) -> bool {
        let tree = controller.tree();
        match Self::target(manipulation, controller) {
            Some(Target::Text { element, .. }) => flag(tree, element) == Some(COMPLETE),
            Some(Target::Element(element)) => flag(tree, element) == Some(COMPLETE),
            // a text manipulation whose node was taken out of its element
            None if manipulation.targets_text() => {
                let node = manipulation.node();
                tree.parent(node).is_none() && tree.text(node).is_some_and(|t| !t.is_empty())
            }
            None => false,
        }
    }
}

fn execute_complete_step(controller: &mut EditorController, target: Target) -> EditorResult<()> {
    match target {
        Target::Text { node, element } => {
            controller.document_mut().remove_node(node)?;
            controller.document_mut().set_attr(element, FLAGGED_REMOVE, COMPLETE);
            controller.update_rich_node();
            controller.set_caret(element, 0)
        }
        Target::Element(element) => {
            controller.document_mut().set_attr(element, FLAGGED_REMOVE, COMPLETE);
            controller.update_rich_node();
            controller.set_caret(element, 0)
        }
    }
}

fn execute_remove_step(
    controller: &mut EditorController,
    target: Target,
    threshold: usize,
) -> EditorResult<()> {
    let element = match target {
        Target::Text { element, .. } => element,
        Target::Element(element) => element,
    };
    let tree = controller.tree();
    let (Some(parent), Some(index)) = (tree.parent(element), tree.index_of(element)) else {
        return Err(EditorError::MissingParent {
            node: element,
            action: "remove annotated element",
        });
    };
    controller.set_caret(parent, index)?;
    controller.document_mut().remove_node(element)?;
    controller.update_rich_node();

    // the enclosing annotated element may now be nearly empty itself
    let Some(anchor) = controller.current_node() else {
        return Ok(());
    };
    let tree = controller.tree();
    let enclosing = if tree.is_text(anchor) {
        tree.parent(anchor)
    } else {
        Some(anchor)
    };
    let Some(enclosing) = enclosing.filter(|e| *e != controller.root_node() && is_rdfa_node(tree, *e))
    else {
        return Ok(());
    };
    let length = visible_length(tree, enclosing);
    if length == 0 {
        controller.document_mut().set_attr(enclosing, FLAGGED_REMOVE, COMPLETE);
    } else if length < threshold {
        controller.document_mut().set_attr(enclosing, FLAGGED_REMOVE, ALMOST_COMPLETE);
    }
    Ok(())
}
