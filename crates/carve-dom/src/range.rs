//! Range and Selection API
//!
//! Range represents a contiguous part of the document.
//! Selection represents the user's caret or text selection; it is the
//! "native" selection that editors read from and write to.

use std::cmp::Ordering;

use crate::{DomTree, NodeId};

/// Range boundary point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    /// The container node
    pub node: NodeId,
    /// Offset within the container (character offset for text, child index for elements)
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Range comparison types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCompare {
    StartToStart,
    StartToEnd,
    EndToEnd,
    EndToStart,
}

/// Range - a contiguous part of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl Range {
    /// Create a new range at the given position (collapsed)
    pub fn new(container: NodeId, offset: usize) -> Self {
        let point = BoundaryPoint::new(container, offset);
        Self {
            start: point,
            end: point,
        }
    }

    /// Create a range between two points
    pub fn between(
        start_container: NodeId,
        start_offset: usize,
        end_container: NodeId,
        end_offset: usize,
    ) -> Self {
        Self {
            start: BoundaryPoint::new(start_container, start_offset),
            end: BoundaryPoint::new(end_container, end_offset),
        }
    }

    // --- Getters ---

    pub fn start(&self) -> BoundaryPoint {
        self.start
    }

    pub fn end(&self) -> BoundaryPoint {
        self.end
    }

    pub fn start_container(&self) -> NodeId {
        self.start.node
    }

    pub fn start_offset(&self) -> usize {
        self.start.offset
    }

    pub fn end_container(&self) -> NodeId {
        self.end.node
    }

    pub fn end_offset(&self) -> usize {
        self.end.offset
    }

    /// Check if the range is collapsed
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    // --- Setters ---

    pub fn set_start(&mut self, node: NodeId, offset: usize) {
        self.start = BoundaryPoint::new(node, offset);
    }

    pub fn set_end(&mut self, node: NodeId, offset: usize) {
        self.end = BoundaryPoint::new(node, offset);
    }

    /// Collapse the range to one of its boundaries
    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    pub(crate) fn boundaries_mut(&mut self) -> [&mut BoundaryPoint; 2] {
        [&mut self.start, &mut self.end]
    }

    // --- Comparison ---

    /// Compare boundary points of two ranges in tree order.
    ///
    /// `None` means the points are not in the same tree.
    pub fn compare_boundary_points(
        &self,
        how: RangeCompare,
        source: &Range,
        tree: &DomTree,
    ) -> Option<Ordering> {
        let (this_point, source_point) = match how {
            RangeCompare::StartToStart => (&self.start, &source.start),
            RangeCompare::StartToEnd => (&self.start, &source.end),
            RangeCompare::EndToEnd => (&self.end, &source.end),
            RangeCompare::EndToStart => (&self.end, &source.start),
        };
        if this_point == source_point {
            return Some(Ordering::Equal);
        }
        tree.compare_points(this_point, source_point)
    }
}

/// Selection type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionType {
    #[default]
    None,
    Caret,
    Range,
}

/// Selection - the document's current caret or selection
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ranges: Vec<Range>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    // --- Getters ---

    pub fn anchor_node(&self) -> Option<NodeId> {
        self.ranges.first().map(Range::start_container)
    }

    pub fn anchor_offset(&self) -> usize {
        self.ranges.first().map_or(0, Range::start_offset)
    }

    pub fn focus_node(&self) -> Option<NodeId> {
        self.ranges.last().map(Range::end_container)
    }

    pub fn focus_offset(&self) -> usize {
        self.ranges.last().map_or(0, Range::end_offset)
    }

    /// A selection without ranges counts as collapsed
    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(Range::collapsed)
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn selection_type(&self) -> SelectionType {
        match self.ranges.first() {
            None => SelectionType::None,
            Some(r) if r.collapsed() => SelectionType::Caret,
            Some(_) => SelectionType::Range,
        }
    }

    pub fn get_range_at(&self, index: usize) -> Option<&Range> {
        self.ranges.get(index)
    }

    // --- Manipulation ---

    pub fn add_range(&mut self, range: Range) {
        self.ranges.push(range);
    }

    pub fn remove_all_ranges(&mut self) {
        self.ranges.clear();
    }

    /// Collapse the selection to a point
    pub fn collapse(&mut self, node: NodeId, offset: usize) {
        self.ranges.clear();
        self.ranges.push(Range::new(node, offset));
    }

    /// Replace the selection with a single range
    pub fn set_range(&mut self, range: Range) {
        self.ranges.clear();
        self.ranges.push(range);
    }

    pub(crate) fn boundaries_mut(&mut self) -> impl Iterator<Item = &mut BoundaryPoint> {
        self.ranges.iter_mut().flat_map(|r| r.boundaries_mut())
    }
}
