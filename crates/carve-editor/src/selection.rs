//! Editor selection: an absolute region plus the DOM range it came from

use carve_dom::Range;

/// Half-open region of absolute positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Collapsed region at a position
    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `[start, end)` shares at least one position with this region
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && end > self.start
    }
}

impl From<(usize, usize)> for Region {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// The editor's view of the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSelection {
    pub region: Region,
    pub range: Range,
}
