//! Geometry APIs
//!
//! DOMRect and DOMRectList as returned by range measurement.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge (same as y)
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Left edge (same as x)
    pub fn left(&self) -> f64 {
        self.x
    }
}

/// DOMRectList - collection of rects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DOMRectList {
    rects: Vec<DOMRect>,
}

impl DOMRectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&DOMRect> {
        self.rects.get(index)
    }

    pub fn push(&mut self, rect: DOMRect) {
        self.rects.push(rect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DOMRect> {
        self.rects.iter()
    }
}

impl From<Vec<DOMRect>> for DOMRectList {
    fn from(rects: Vec<DOMRect>) -> Self {
        Self { rects }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 0.0, 16.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 10.0);
        assert_eq!(rect.bottom(), 36.0);
    }

    #[test]
    fn test_rect_list() {
        let mut list = DOMRectList::new();
        assert!(list.is_empty());
        list.push(DOMRect::from_xywh(1.0, 2.0, 3.0, 4.0));
        assert_eq!(list.length(), 1);
        assert_eq!(list.item(0).map(|r| r.top()), Some(2.0));
    }
}
