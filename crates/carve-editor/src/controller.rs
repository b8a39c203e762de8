//! Editor controller
//!
//! Owns the host document, the rich node snapshot of the editable root and
//! the authoritative [`EditorSelection`]. Every caret placement goes through
//! here so the native selection, the rich tree and the absolute selection
//! never disagree for long.

use std::cmp::Ordering;
use std::fmt;

use carve_dom::{DOMRectList, Document, DomTree, NodeId, Range, RangeCompare};

use crate::position::{self, relative_position, resolve_text_node};
use crate::{
    CappedHistory, ChangeSource, Config, ContentObserver, EditorError, EditorResult,
    EditorSelection, HeadlessLayout, HistoryItem, INVISIBLE_SPACE, Layout, MovementObserver,
    ObserverId, Region, RichNode, RichNodeId, RichTree, TextChange, text_change,
};

/// Controller of one editable region
pub struct EditorController {
    document: Document,
    root: NodeId,
    rich_tree: RichTree,
    current_selection: EditorSelection,
    movement_observers: Vec<(ObserverId, Box<dyn MovementObserver>)>,
    content_observers: Vec<(ObserverId, Box<dyn ContentObserver>)>,
    next_observer_id: u64,
    history: CappedHistory,
    layout: Box<dyn Layout>,
    last_text_content: String,
    config: Config,
}

impl EditorController {
    /// Take control of `root` inside `document`.
    ///
    /// The selection starts collapsed at position 0; the native selection is
    /// left untouched.
    pub fn new(document: Document, root: NodeId, config: Config) -> Self {
        let rich_tree = RichTree::build(document.tree(), root);
        let last_text_content = document.tree().text_content(root);
        Self {
            document,
            root,
            rich_tree,
            current_selection: EditorSelection {
                region: Region::caret(0),
                range: Range::new(root, 0),
            },
            movement_observers: Vec::new(),
            content_observers: Vec::new(),
            next_observer_id: 1,
            history: CappedHistory::new(config.history_size),
            layout: Box::new(HeadlessLayout::new(config.layout)),
            last_text_content,
            config,
        }
    }

    /// Build a document with an editable `div` holding `html`
    pub fn from_html(html: &str, config: Config) -> EditorResult<Self> {
        let mut document = Document::new();
        let root = document.create_element("div");
        document.set_attr(root, "contenteditable", "true");
        let body = document.body();
        document.append_child(body, root)?;
        carve_html::parse_fragment_into(&mut document, root, html)?;

        let mut controller = Self::new(document, root, config);
        controller.move_caret(root, 0);
        controller.refresh_selection_from_native();
        Ok(controller)
    }

    /// Replace the layout backend
    pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    // --- Accessors ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable host access; call [`Self::update_rich_node`] after structural edits
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    /// The editable root element
    pub fn root_node(&self) -> NodeId {
        self.root
    }

    pub fn rich_tree(&self) -> &RichTree {
        &self.rich_tree
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Document and rich tree borrowed together for tree primitives
    pub fn parts_mut(&mut self) -> (&mut Document, &mut RichTree) {
        (&mut self.document, &mut self.rich_tree)
    }

    /// Serialized content of the editable root
    pub fn inner_html(&self) -> String {
        carve_html::inner_html(&self.document, self.root)
    }

    pub fn text_content(&self) -> String {
        self.tree().text_content(self.root)
    }

    // --- Selection ---

    /// Absolute region of the current selection
    pub fn current_selection(&self) -> Region {
        self.current_selection.region
    }

    pub fn selection(&self) -> &EditorSelection {
        &self.current_selection
    }

    pub fn current_selection_is_a_cursor(&self) -> bool {
        self.current_selection.region.is_collapsed()
    }

    /// Caret position, `None` for a non-collapsed selection
    pub fn current_position(&self) -> Option<usize> {
        self.current_selection_is_a_cursor()
            .then_some(self.current_selection.region.start)
    }

    /// DOM node holding the caret, `None` for a non-collapsed selection
    pub fn current_node(&self) -> Option<NodeId> {
        self.current_selection_is_a_cursor()
            .then(|| self.current_selection.range.start_container())
    }

    /// Recompute the editor selection from a DOM range.
    ///
    /// An unmappable range keeps the previous selection. Movement observers
    /// are notified when the end boundary moved.
    pub fn update_current_selection(&mut self, range: Range) {
        let region = match position::range_to_region(&self.rich_tree, &range) {
            Ok(region) => region,
            Err(err) => {
                tracing::warn!("Could not determine absolute region of selection: {}", err);
                return;
            }
        };
        let old = self.current_selection;
        let new = EditorSelection { region, range };
        self.current_selection = new;

        let end_moved = old
            .range
            .compare_boundary_points(RangeCompare::EndToEnd, &range, self.document.tree())
            != Some(Ordering::Equal);
        if end_moved {
            self.dispatch_movement(&old, &new);
        }
    }

    /// Re-read the native selection into the editor selection
    pub fn refresh_selection_from_native(&mut self) {
        if let Some(range) = self.document.selection().get_range_at(0).copied() {
            self.update_current_selection(range);
        }
    }

    /// Re-sync after input the editor did not perform itself
    pub fn update_selection_after_complex_input(&mut self) -> EditorResult<()> {
        let Some(range) = self.document.selection().get_range_at(0).copied() else {
            tracing::warn!("No native selection found");
            return Ok(());
        };
        if !self.tree().contains(self.root, range.start_container()) {
            return Ok(());
        }
        if range.collapsed() {
            self.set_caret(range.start_container(), range.start_offset())
        } else {
            self.update_current_selection(range);
            Ok(())
        }
    }

    /// Collapse the native selection, clamping the offset to the node length
    pub fn move_caret(&mut self, node: NodeId, offset: usize) {
        let offset = offset.min(self.tree().node_length(node));
        self.document.selection_mut().collapse(node, offset);
    }

    /// Place the caret at a DOM position and re-sync the editor state.
    ///
    /// For a text node `offset` counts characters, for an element it counts
    /// children. A caret between two elements gets a placeholder text node to
    /// live in.
    pub fn set_caret(&mut self, node: NodeId, offset: usize) -> EditorResult<()> {
        if !self.tree().contains(self.root, node) {
            tracing::warn!("Refusing to set caret in {} outside of the editor", node);
            return Ok(());
        }
        if self.tree().is_text(node) {
            self.ensure_valid_text_node_for_caret(node)?;
            self.move_caret(node, offset);
        } else if self.tree().is_element(node) {
            self.set_caret_in_element(node, offset)?;
        } else {
            tracing::warn!("Unsupported node {} passed to set_caret", node);
            return Ok(());
        }
        self.update_rich_node();
        self.refresh_selection_from_native();
        Ok(())
    }

    fn set_caret_in_element(&mut self, element: NodeId, offset: usize) -> EditorResult<()> {
        let tree = self.tree();
        let offset = offset.min(tree.child_count(element));
        let before = offset.checked_sub(1).and_then(|i| tree.child_at(element, i));
        let text_before = before.filter(|n| tree.is_text(*n));
        let text_after = tree.child_at(element, offset).filter(|n| tree.is_text(*n));

        if let Some(text) = text_before {
            self.ensure_valid_text_node_for_caret(text)?;
            let length = self.tree().text_len(text);
            self.move_caret(text, length);
        } else if let Some(text) = text_after {
            self.ensure_valid_text_node_for_caret(text)?;
            self.move_caret(text, 0);
        } else {
            let text = self.document.create_text(&INVISIBLE_SPACE.to_string());
            match before {
                None => self.document.prepend_child(element, text)?,
                Some(before) => self.document.insert_after(before, text)?,
            };
            self.move_caret(text, 0);
        }
        Ok(())
    }

    /// Empty text nodes cannot hold a visible caret
    fn ensure_valid_text_node_for_caret(&mut self, text: NodeId) -> EditorResult<()> {
        if self.tree().text_len(text) == 0 {
            self.document.set_text(text, INVISIBLE_SPACE.to_string())?;
        }
        Ok(())
    }

    /// Place the caret at an absolute position.
    ///
    /// A position outside the document falls back to its end.
    pub fn set_current_position(&mut self, position: usize) -> EditorResult<()> {
        let root = self.rich_tree.root();
        let scope = self
            .current_node()
            .and_then(|node| self.rich_tree.node_for(node))
            .filter(|id| self.rich_tree[*id].contains_position(position))
            .unwrap_or(root);

        let scope_node = &self.rich_tree[scope];
        let position = if scope_node.contains_position(position) {
            position
        } else {
            tracing::warn!(
                "Received invalid position {}, resetting to {}",
                position,
                scope_node.end
            );
            scope_node.end
        };

        let (node, offset) = self.absolute_to_dom_in(scope, position)?;
        self.set_caret(node, offset)
    }

    /// DOM position of an absolute position, creating a text node in an
    /// editor without one
    pub fn absolute_to_dom(&mut self, position: usize) -> EditorResult<(NodeId, usize)> {
        let root = self.rich_tree.root();
        self.absolute_to_dom_in(root, position)
    }

    fn absolute_to_dom_in(
        &mut self,
        scope: RichNodeId,
        position: usize,
    ) -> EditorResult<(NodeId, usize)> {
        let id = self.find_suitable_node_in_rich_node(scope, position)?;
        Ok((
            self.rich_tree[id].dom_node,
            relative_position(&self.rich_tree, id, position),
        ))
    }

    /// Text node best suited to hold a caret at `position`
    pub fn find_suitable_node_in_rich_node(
        &mut self,
        scope: RichNodeId,
        position: usize,
    ) -> EditorResult<RichNodeId> {
        if let Some(id) = resolve_text_node(&self.rich_tree, self.document.tree(), scope, position)
        {
            return Ok(id);
        }
        tracing::debug!("No text node for position {}, creating one", position);
        let text = self.document.create_text(&INVISIBLE_SPACE.to_string());
        self.document.append_child(self.root, text)?;
        self.update_rich_node();
        self.rich_tree
            .node_for(text)
            .ok_or(EditorError::StaleNode(text))
    }

    /// Absolute position of a DOM boundary point
    pub fn dom_to_absolute(&self, node: NodeId, offset: usize) -> EditorResult<usize> {
        position::dom_to_absolute(&self.rich_tree, node, offset)
    }

    // --- Rich tree ---

    /// Rebuild the rich tree from the DOM
    pub fn update_rich_node(&mut self) {
        self.rich_tree = RichTree::build(self.document.tree(), self.root);
    }

    pub fn get_rich_node_for(&self, node: NodeId) -> Option<&RichNode> {
        self.rich_tree
            .node_for(node)
            .map(|id| &self.rich_tree[id])
    }

    // --- Layout ---

    /// Client rects of the native selection
    pub fn caret_client_rects(&self) -> DOMRectList {
        match self.document.selection().get_range_at(0) {
            Some(range) => self.layout.client_rects(&self.document, self.root, range),
            None => DOMRectList::new(),
        }
    }

    pub fn client_width(&self, node: NodeId) -> f64 {
        self.layout.client_width(&self.document, node)
    }

    // --- Observers ---

    pub fn register_movement_observer(
        &mut self,
        observer: impl MovementObserver + 'static,
    ) -> ObserverId {
        let id = self.allocate_observer_id();
        self.movement_observers.push((id, Box::new(observer)));
        id
    }

    pub fn unregister_movement_observer(&mut self, id: ObserverId) -> bool {
        let before = self.movement_observers.len();
        self.movement_observers.retain(|(other, _)| *other != id);
        self.movement_observers.len() != before
    }

    pub fn register_content_observer(
        &mut self,
        observer: impl ContentObserver + 'static,
    ) -> ObserverId {
        let id = self.allocate_observer_id();
        self.content_observers.push((id, Box::new(observer)));
        id
    }

    pub fn unregister_content_observer(&mut self, id: ObserverId) -> bool {
        let before = self.content_observers.len();
        self.content_observers.retain(|(other, _)| *other != id);
        self.content_observers.len() != before
    }

    fn allocate_observer_id(&mut self) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        id
    }

    fn dispatch_movement(&mut self, old: &EditorSelection, new: &EditorSelection) {
        // Observers are detached while running, so caret moves they make are not re-dispatched
        let mut observers = std::mem::take(&mut self.movement_observers);
        for (id, observer) in observers.iter_mut() {
            if let Err(err) = observer.handle_movement(self, old, new) {
                tracing::warn!("Movement observer {:?} failed: {}", id, err);
            }
        }
        observers.append(&mut self.movement_observers);
        self.movement_observers = observers;
    }

    /// Notify content observers about the text change since the last notification
    pub fn generate_diff_events(&mut self, source: ChangeSource) {
        let current = self.text_content();
        let change = text_change(&self.last_text_content, &current);
        self.last_text_content = current;

        let mut observers = std::mem::take(&mut self.content_observers);
        for (id, observer) in observers.iter_mut() {
            if let Err(err) = notify_content(observer.as_mut(), change.as_ref(), &source) {
                tracing::warn!("Content observer {:?} failed: {}", id, err);
            }
        }
        observers.append(&mut self.content_observers);
        self.content_observers = observers;
    }

    // --- History ---

    /// Push the current content and selection on the undo history
    pub fn create_snapshot(&mut self) {
        self.history.push(HistoryItem {
            content: self.inner_html(),
            selection: self.current_selection.region,
        });
    }

    pub fn history(&self) -> &CappedHistory {
        &self.history
    }

    /// Restore the latest snapshot; `false` when there was nothing to undo
    pub fn undo(&mut self) -> EditorResult<bool> {
        let Some(snapshot) = self.history.pop() else {
            tracing::warn!("No more history to undo");
            return Ok(false);
        };
        self.replace_content(&snapshot.content)?;
        self.set_current_position(snapshot.selection.start)?;
        self.generate_diff_events(ChangeSource::Undo);
        Ok(true)
    }

    /// Replace the editor content and put the caret at the start
    pub fn set_html_content(&mut self, html: &str) -> EditorResult<()> {
        self.replace_content(html)?;
        self.set_current_position(0)?;
        self.generate_diff_events(ChangeSource::HtmlContent);
        Ok(())
    }

    fn replace_content(&mut self, html: &str) -> EditorResult<()> {
        self.document.clear_children(self.root)?;
        carve_html::parse_fragment_into(&mut self.document, self.root, html)?;
        self.update_rich_node();
        Ok(())
    }

    /// Run a DOM transformation from outside the editor and restore a
    /// consistent state afterwards
    pub fn external_dom_update<F>(
        &mut self,
        description: &str,
        update: F,
        maintain_cursor: bool,
    ) -> EditorResult<()>
    where
        F: FnOnce(&mut Document) -> EditorResult<()>,
    {
        tracing::debug!("Executing an external dom update: {}", description);
        self.create_snapshot();
        let selection = self.document.selection();
        let anchor = selection
            .is_collapsed()
            .then(|| selection.anchor_node().map(|node| (node, selection.anchor_offset())))
            .flatten();

        update(&mut self.document)?;
        self.update_rich_node();

        match anchor {
            Some((node, offset)) if maintain_cursor && self.tree().contains(self.root, node) => {
                self.set_caret(node, offset)?
            }
            _ => self.update_selection_after_complex_input()?,
        }
        self.generate_diff_events(ChangeSource::External(description.to_string()));
        Ok(())
    }
}

fn notify_content(
    observer: &mut dyn ContentObserver,
    change: Option<&TextChange>,
    source: &ChangeSource,
) -> EditorResult<()> {
    if let Some(change) = change {
        if change.removed > 0 {
            observer.handle_text_removal(change.position, change.position + change.removed, source)?;
        }
        if !change.inserted.is_empty() {
            observer.handle_text_insert(change.position, &change.inserted, source)?;
        }
    }
    observer.handle_full_content_update(source)
}

impl fmt::Debug for EditorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorController")
            .field("root", &self.root)
            .field("selection", &self.current_selection)
            .field("movement_observers", &self.movement_observers.len())
            .field("content_observers", &self.content_observers.len())
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_html_places_caret_at_start() {
        let controller = EditorController::from_html("baz <b>bar</b>", Config::default()).unwrap();
        assert_eq!(controller.current_selection(), Region::caret(0));
        assert_eq!(controller.inner_html(), "baz <b>bar</b>");
        assert_eq!(controller.rich_tree()[controller.rich_tree().root()].end, 7);
    }

    #[test]
    fn test_set_caret_between_elements_creates_placeholder() {
        let mut controller =
            EditorController::from_html("<b>a</b><i>b</i>", Config::default()).unwrap();
        let root = controller.root_node();
        controller.set_caret(root, 1).unwrap();

        let placeholder = controller.tree().child_at(root, 1).unwrap();
        assert_eq!(controller.tree().text(placeholder), Some("\u{200B}"));
        assert_eq!(controller.current_node(), Some(placeholder));
        assert_eq!(controller.current_position(), Some(1));
    }

    #[test]
    fn test_set_caret_prefers_adjacent_text() {
        let mut controller = EditorController::from_html("ab<b>c</b>", Config::default()).unwrap();
        let root = controller.root_node();
        let text = controller.tree().first_child(root).unwrap();
        controller.set_caret(root, 1).unwrap();
        assert_eq!(controller.current_node(), Some(text));
        assert_eq!(controller.current_position(), Some(2));
        assert_eq!(controller.tree().child_count(root), 2);
    }

    #[test]
    fn test_set_caret_outside_root_is_ignored() {
        let mut controller = EditorController::from_html("ab", Config::default()).unwrap();
        let head = controller.document().head();
        controller.set_caret(head, 0).unwrap();
        assert_eq!(controller.current_selection(), Region::caret(0));
    }

    #[test]
    fn test_invalid_position_resets_to_end() {
        let mut controller = EditorController::from_html("abc", Config::default()).unwrap();
        controller.set_current_position(42).unwrap();
        assert_eq!(controller.current_position(), Some(3));
    }

    #[test]
    fn test_empty_editor_gets_a_text_node() {
        let mut controller = EditorController::from_html("", Config::default()).unwrap();
        controller.set_current_position(0).unwrap();
        let root = controller.root_node();
        let text = controller.tree().first_child(root).unwrap();
        assert_eq!(controller.tree().text(text), Some("\u{200B}"));
        assert_eq!(controller.current_node(), Some(text));
    }

    #[test]
    fn test_unmappable_range_keeps_selection() {
        let mut controller = EditorController::from_html("abc", Config::default()).unwrap();
        controller.set_current_position(2).unwrap();
        let loose = controller.document_mut().create_text("loose");
        controller.update_current_selection(Range::new(loose, 1));
        assert_eq!(controller.current_position(), Some(2));
    }
}
