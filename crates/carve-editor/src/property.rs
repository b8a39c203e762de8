//! Editor properties
//!
//! A property is an element with a tag and attributes that marks up a
//! region of text (bold, highlight, ...). The applier here wraps text leaves
//! and unwraps matching elements; it works on absolute regions so it does
//! not care how the DOM is fragmented.

use carve_dom::{Document, DomTree, NodeId};

use crate::tree_modification::{
    merge_sibling_text_nodes, replace_rich_node_with, split_rich_text_node, unwrap_rich_node,
    wrap_rich_node,
};
use crate::{ChangeSource, EditorController, EditorResult, Region, RichNodeId};

/// Tag used when a property does not name one
pub const DEFAULT_TAG_NAME: &str = "span";

/// Editor bookkeeping attributes ignored when comparing elements
pub const IGNORABLE_ATTRIBUTES: &[&str] =
    &["data-editor-position-level", "data-editor-rdfa-position-level"];

/// Markup applied to a region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorProperty {
    pub tag_name: Option<String>,
    pub attributes: Vec<(String, String)>,
    /// Always create a new wrapper element
    pub new_context: bool,
}

impl EditorProperty {
    pub fn with_tag(tag_name: &str) -> Self {
        Self {
            tag_name: Some(tag_name.to_ascii_lowercase()),
            attributes: Vec::new(),
            new_context: true,
        }
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Highlight marker
    pub fn highlight() -> Self {
        Self::with_tag(DEFAULT_TAG_NAME).attribute("data-editor-highlight", "true")
    }

    fn effective_tag(&self) -> &str {
        self.tag_name.as_deref().unwrap_or(DEFAULT_TAG_NAME)
    }

    /// A property without tag and attributes matches every element
    fn is_meaningless(&self) -> bool {
        self.tag_name.is_none() && self.attributes.is_empty()
    }

    /// Element carries the property's tag (if any) and attribute values,
    /// possibly among other attributes
    pub fn dom_node_contains_property(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.element(node) else {
            return false;
        };
        let tag_matches = self
            .tag_name
            .as_deref()
            .is_none_or(|tag| tag == element.tag_name());
        tag_matches
            && self.attributes.iter().all(|(name, value)| {
                element
                    .get_attr(name)
                    .is_some_and(|current| current.contains(value.as_str()))
            })
    }

    /// Element is exactly the property: same tag, same attributes, nothing else
    pub fn dom_node_is_equal_to_property(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.element(node) else {
            return false;
        };
        let attributes_match = self
            .attributes
            .iter()
            .all(|(name, value)| element.get_attr(name) == Some(value.as_str()));
        let no_extra_attributes = element.attrs.iter().all(|attr| {
            IGNORABLE_ATTRIBUTES.contains(&attr.name.as_str())
                || self.attributes.iter().any(|(name, _)| *name == attr.name)
        });
        self.effective_tag() == element.tag_name() && attributes_match && no_extra_attributes
    }

    /// Whether the property applies at `node`, looking at its ancestors up to `root`
    pub fn enabled_at(&self, tree: &DomTree, root: NodeId, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .take_while(|n| *n != root)
            .any(|n| self.dom_node_contains_property(tree, n))
    }

    fn create_wrapper(&self, document: &mut Document) -> NodeId {
        let wrapper = document.create_element(self.effective_tag());
        for (name, value) in &self.attributes {
            document.set_attr(wrapper, name, value.as_str());
        }
        wrapper
    }
}

impl EditorController {
    /// Wrap the text of `region` in the property, removing earlier
    /// applications first
    pub fn apply_property(&mut self, region: Region, property: &EditorProperty) -> EditorResult<()> {
        if region.is_collapsed() || property.is_meaningless() {
            tracing::warn!("Can't apply property to an empty region");
            return Ok(());
        }
        let previous = self.current_selection();
        self.cancel_property_in(region, property)?;
        self.wrap_region(region, property)?;
        self.restore_selection(previous)?;
        self.generate_diff_events(ChangeSource::Property);
        Ok(())
    }

    /// Remove the property from `region`, keeping it on the parts of
    /// partially covered elements outside the region
    pub fn cancel_property(&mut self, region: Region, property: &EditorProperty) -> EditorResult<()> {
        if region.is_collapsed() || property.is_meaningless() {
            tracing::warn!("Can't cancel property on an empty region");
            return Ok(());
        }
        let previous = self.current_selection();
        self.cancel_property_in(region, property)?;
        self.restore_selection(previous)?;
        self.generate_diff_events(ChangeSource::Property);
        Ok(())
    }

    /// Cancel the property when visible text in `region` already has it,
    /// apply it otherwise
    pub fn toggle_property(&mut self, region: Region, property: &EditorProperty) -> EditorResult<()> {
        if region.is_collapsed() {
            tracing::debug!("Not toggling property on a collapsed region");
            return Ok(());
        }
        let rich = self.rich_tree();
        let tree = self.tree();
        let enabled = rich.leaves().into_iter().any(|id| {
            let node = &rich[id];
            node.is_text()
                && !node.is_empty()
                && region.overlaps(node.start, node.end)
                && property.enabled_at(tree, self.root_node(), node.dom_node)
        });
        if enabled {
            self.cancel_property(region, property)
        } else {
            self.apply_property(region, property)
        }
    }

    /// Highlight the text between `start` and `end`
    pub fn highlight_range(
        &mut self,
        start: usize,
        end: usize,
        data: &[(String, String)],
    ) -> EditorResult<()> {
        if !data.is_empty() {
            tracing::warn!(
                "Data attributes were supplied to highlight_range but this is not supported"
            );
        }
        self.apply_property(Region::new(start, end), &EditorProperty::highlight())
    }

    pub fn clear_highlight_for_locations(&mut self, locations: &[Region]) -> EditorResult<()> {
        let highlight = EditorProperty::highlight();
        for location in locations {
            self.cancel_property(*location, &highlight)?;
        }
        Ok(())
    }

    fn wrap_region(&mut self, region: Region, property: &EditorProperty) -> EditorResult<()> {
        let leaves: Vec<RichNodeId> = {
            let rich = self.rich_tree();
            rich.leaves()
                .into_iter()
                .filter(|id| rich[*id].is_text() && region.overlaps(rich[*id].start, rich[*id].end))
                .collect()
        };
        for leaf in leaves {
            self.wrap_text_leaf(leaf, region, property)?;
        }
        self.update_rich_node();
        Ok(())
    }

    fn wrap_text_leaf(
        &mut self,
        leaf: RichNodeId,
        region: Region,
        property: &EditorProperty,
    ) -> EditorResult<()> {
        let (document, rich) = self.parts_mut();
        let (leaf_start, leaf_end) = (rich[leaf].start, rich[leaf].end);
        let mut pieces = Vec::with_capacity(3);
        let mut target = leaf;

        if leaf_start < region.start {
            let (prefix, rest) = split_rich_text_node(document, rich, target, region.start)?;
            pieces.push(prefix);
            target = rest;
        }
        let postfix = if leaf_end > region.end {
            let (infix, postfix) = split_rich_text_node(document, rich, target, region.end)?;
            target = infix;
            Some(postfix)
        } else {
            None
        };
        pieces.push(target);
        pieces.extend(postfix);

        if target != leaf {
            replace_rich_node_with(document, rich, leaf, &pieces)?;
        }
        let wrapper = property.create_wrapper(document);
        wrap_rich_node(document, rich, target, wrapper)?;
        Ok(())
    }

    fn cancel_property_in(&mut self, region: Region, property: &EditorProperty) -> EditorResult<()> {
        while let Some(id) = self.find_property_element(region, property) {
            let (start, end) = (self.rich_tree()[id].start, self.rich_tree()[id].end);
            self.raw_cancel_property(id, property)?;
            self.update_rich_node();

            // re-apply on the parts of the element outside the region
            if start < region.start {
                self.wrap_region(Region::new(start, region.start), property)?;
            }
            if end > region.end {
                self.wrap_region(Region::new(region.end, end), property)?;
            }
        }
        Ok(())
    }

    fn find_property_element(&self, region: Region, property: &EditorProperty) -> Option<RichNodeId> {
        let rich = self.rich_tree();
        rich.descendants(rich.root()).into_iter().skip(1).find(|id| {
            let node = &rich[*id];
            node.is_tag()
                && region.overlaps(node.start, node.end)
                && property.dom_node_contains_property(self.tree(), node.dom_node)
        })
    }

    fn raw_cancel_property(&mut self, id: RichNodeId, property: &EditorProperty) -> EditorResult<()> {
        let element = self.rich_tree()[id].dom_node;
        if !property.dom_node_is_equal_to_property(self.tree(), element) {
            for (name, value) in &property.attributes {
                let Some(current) = self.tree().get_attr(element, name) else {
                    continue;
                };
                let remaining = current.replacen(value.as_str(), "", 1).trim().to_string();
                if remaining.is_empty() {
                    self.document_mut().remove_attr(element, name);
                } else {
                    self.document_mut().set_attr(element, name, remaining);
                }
            }
            if !property.dom_node_contains_property(self.tree(), element) {
                return Ok(());
            }
        }

        let children = self.rich_tree()[id].children.clone();
        let (document, rich) = self.parts_mut();
        unwrap_rich_node(document, rich, id)?;
        for child in children {
            let attached = rich[child].parent.is_some() && document.tree().is_text(rich[child].dom_node);
            if attached && document.tree().is_attached(rich[child].dom_node) {
                merge_sibling_text_nodes(document, rich, child)?;
            }
        }
        Ok(())
    }

    fn restore_selection(&mut self, previous: Region) -> EditorResult<()> {
        if previous.is_collapsed() {
            self.set_current_position(previous.start)
        } else {
            self.refresh_selection_from_native();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn controller(html: &str) -> EditorController {
        EditorController::from_html(html, Config::default()).unwrap()
    }

    #[test]
    fn test_property_matching() {
        let controller = controller(r#"<strong class="x">a</strong><strong>b</strong>"#);
        let tree = controller.tree();
        let children = tree.child_ids(controller.root_node());
        let bold = EditorProperty::with_tag("strong");
        assert!(bold.dom_node_contains_property(tree, children[0]));
        assert!(!bold.dom_node_is_equal_to_property(tree, children[0]));
        assert!(bold.dom_node_is_equal_to_property(tree, children[1]));
    }

    #[test]
    fn test_apply_wraps_region() {
        let mut controller = controller("baz bar foo");
        controller
            .apply_property(Region::new(4, 7), &EditorProperty::with_tag("strong"))
            .unwrap();
        assert_eq!(controller.inner_html(), "baz <strong>bar</strong> foo");
        assert_eq!(controller.text_content(), "baz bar foo");
    }

    #[test]
    fn test_apply_across_elements() {
        let mut controller = controller("ab<i>cd</i>ef");
        controller
            .apply_property(Region::new(1, 5), &EditorProperty::with_tag("b"))
            .unwrap();
        assert_eq!(controller.inner_html(), "a<b>b</b><i><b>cd</b></i><b>e</b>f");
    }

    #[test]
    fn test_cancel_partial_overlap() {
        let mut controller = controller("<b>abcdef</b>");
        controller
            .cancel_property(Region::new(2, 4), &EditorProperty::with_tag("b"))
            .unwrap();
        assert_eq!(controller.inner_html(), "<b>ab</b>cd<b>ef</b>");
    }

    #[test]
    fn test_cancel_strips_attributes_of_richer_element() {
        let mut controller = controller(r#"<span data-editor-highlight="true" class="x">ab</span>"#);
        controller
            .cancel_property(Region::new(0, 2), &EditorProperty::highlight())
            .unwrap();
        assert_eq!(controller.inner_html(), r#"<span class="x">ab</span>"#);
    }

    #[test]
    fn test_toggle() {
        let mut controller = controller("abc");
        let bold = EditorProperty::with_tag("strong");
        controller.toggle_property(Region::new(0, 3), &bold).unwrap();
        assert_eq!(controller.inner_html(), "<strong>abc</strong>");
        controller.toggle_property(Region::new(0, 3), &bold).unwrap();
        assert_eq!(controller.inner_html(), "abc");
    }

    #[test]
    fn test_highlight_and_clear() {
        let mut controller = controller("baz bar");
        controller.highlight_range(4, 7, &[]).unwrap();
        assert_eq!(
            controller.inner_html(),
            r#"baz <span data-editor-highlight="true">bar</span>"#
        );
        controller
            .clear_highlight_for_locations(&[Region::new(4, 7)])
            .unwrap();
        assert_eq!(controller.inner_html(), "baz bar");
    }
}
