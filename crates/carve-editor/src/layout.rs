//! Layout measurement
//!
//! The editor only needs two measurements from a renderer: the client rects
//! of a caret and the width of an element. [`HeadlessLayout`] answers both
//! with a fixed-advance inline flow so the editor can run without a browser.

use carve_dom::{BoundaryPoint, DOMRect, DOMRectList, Document, DomTree, NodeData, NodeId, Range};

use crate::LayoutConfig;

/// Layout capability of the host
pub trait Layout {
    /// Client rects of `range`; empty when the range is not rendered under `root`
    fn client_rects(&self, document: &Document, root: NodeId, range: &Range) -> DOMRectList;

    /// Rendered width of a node
    fn client_width(&self, document: &Document, node: NodeId) -> f64;
}

/// Block-level tags start and end a line
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "dl",
    "dd",
    "dt",
    "fieldset",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Replaced elements take up one advance
const REPLACED_ELEMENTS: &[&str] = &["img", "input", "embed", "hr"];

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{FEFF}')
}

fn collapses(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t' | '\u{000C}')
}

/// Pen state of the inline flow
#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    x: f64,
    line: usize,
    at_line_start: bool,
    after_space: bool,
    max_x: f64,
}

struct Flow<'a> {
    tree: &'a DomTree,
    metrics: LayoutConfig,
    pen: Pen,
    target: Option<BoundaryPoint>,
    hit: Option<(f64, usize)>,
}

impl<'a> Flow<'a> {
    fn new(tree: &'a DomTree, metrics: LayoutConfig, target: Option<BoundaryPoint>) -> Self {
        Self {
            tree,
            metrics,
            pen: Pen {
                at_line_start: true,
                ..Pen::default()
            },
            target,
            hit: None,
        }
    }

    fn mark(&mut self, node: NodeId, offset: usize) {
        if self.hit.is_none() && self.target == Some(BoundaryPoint::new(node, offset)) {
            self.hit = Some((self.pen.x, self.pen.line));
        }
    }

    fn advance(&mut self) {
        self.pen.x += self.metrics.char_width;
        self.pen.max_x = self.pen.max_x.max(self.pen.x);
        self.pen.at_line_start = false;
        self.pen.after_space = false;
    }

    fn break_line(&mut self) {
        self.pen.x = 0.0;
        self.pen.line += 1;
        self.pen.at_line_start = true;
        self.pen.after_space = false;
    }

    fn walk(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(data) = tree.get(node).map(|n| &n.data) else {
            return;
        };
        match data {
            NodeData::Text(text) => {
                let mut count = 0;
                for (index, c) in text.content.chars().enumerate() {
                    self.mark(node, index);
                    count = index + 1;
                    if is_zero_width(c) {
                        continue;
                    }
                    if collapses(c) {
                        if self.pen.at_line_start || self.pen.after_space {
                            continue;
                        }
                        self.advance();
                        self.pen.after_space = true;
                    } else {
                        self.advance();
                    }
                }
                self.mark(node, count);
            }
            NodeData::Element(element) => {
                let tag = element.tag_name();
                if tag == "br" {
                    self.break_line();
                    return;
                }
                if REPLACED_ELEMENTS.contains(&tag) {
                    self.advance();
                    return;
                }
                let block = BLOCK_ELEMENTS.contains(&tag);
                if block && !self.pen.at_line_start {
                    self.break_line();
                }
                self.walk_children(node);
                if block && !self.pen.at_line_start {
                    self.break_line();
                }
            }
            NodeData::Document | NodeData::DocumentFragment => self.walk_children(node),
            _ => {}
        }
    }

    fn walk_children(&mut self, node: NodeId) {
        let children = self.tree.child_ids(node);
        for (index, child) in children.iter().enumerate() {
            self.mark(node, index);
            self.walk(*child);
        }
        self.mark(node, children.len());
    }
}

/// Fixed-advance inline layout
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessLayout {
    metrics: LayoutConfig,
}

impl HeadlessLayout {
    pub fn new(metrics: LayoutConfig) -> Self {
        Self { metrics }
    }
}

impl Layout for HeadlessLayout {
    fn client_rects(&self, document: &Document, root: NodeId, range: &Range) -> DOMRectList {
        let tree = document.tree();
        if !tree.is_attached(root) || !tree.contains(root, range.start_container()) {
            return DOMRectList::new();
        }
        let mut flow = Flow::new(tree, self.metrics, Some(range.start()));
        flow.walk_children(root);
        match flow.hit {
            Some((x, line)) => vec![DOMRect::from_xywh(
                x,
                line as f64 * self.metrics.line_height,
                0.0,
                self.metrics.line_height,
            )]
            .into(),
            None => DOMRectList::new(),
        }
    }

    fn client_width(&self, document: &Document, node: NodeId) -> f64 {
        let mut flow = Flow::new(document.tree(), self.metrics, None);
        flow.walk(node);
        flow.pen.max_x
    }
}
