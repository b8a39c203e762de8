//! Visible content heuristics
//!
//! Decides whether an element holds anything a user would see. The answer
//! is approximate, so the check sits behind [`VisibilityPolicy`] and can be
//! replaced per content type.

use carve_dom::{NodeData, NodeId};

use crate::EditorController;

/// Zero-width placeholder used to anchor a caret inside otherwise empty text
pub const INVISIBLE_SPACE: char = '\u{200B}';

/// Whitespace the renderer collapses; U+00A0 is deliberately absent
fn is_collapsible_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\u{000C}'
            | '\n'
            | '\r'
            | '\t'
            | '\u{000B}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Strip caret placeholders and collapsible whitespace
pub fn string_to_visible_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c != INVISIBLE_SPACE && !is_collapsible_whitespace(*c))
        .collect()
}

/// Policy deciding whether an element has visible children
pub trait VisibilityPolicy {
    fn has_visible_children(&self, controller: &EditorController, node: NodeId) -> bool;
}

/// Text, trailing-br and width heuristics
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultVisibility;

impl VisibilityPolicy for DefaultVisibility {
    fn has_visible_children(&self, controller: &EditorController, node: NodeId) -> bool {
        let tree = controller.tree();
        tree.children(node).any(|(child, data)| match &data.data {
            NodeData::Text(text) => !string_to_visible_text(&text.content).is_empty(),
            NodeData::Element(element) if element.tag_name() == "br" => {
                // a trailing br does not render a line
                tree.next_sibling(child).is_some()
            }
            NodeData::Element(_) => {
                !string_to_visible_text(&tree.text_content(child)).is_empty()
                    || controller.client_width(child) > 0.0
            }
            _ => false,
        })
    }
}
