//! Screen rectangles.

use tokenscope_style::types::Edges;

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge coordinate.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge coordinate.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Check whether a point lies inside (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Grow outward by per-edge amounts.
    pub fn grow(&self, amounts: &Edges<f64>) -> Self {
        Self {
            top: self.top - amounts.top,
            left: self.left - amounts.left,
            width: self.width + amounts.horizontal(),
            height: self.height + amounts.vertical(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_and_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.right(), 110.0);
        assert!(rect.contains(10.0, 70.0));
        assert!(!rect.contains(9.0, 30.0));

        let grown = rect.grow(&Edges::new(4.0, 1.0, 2.0, 3.0));
        assert_eq!(grown, Rect::new(7.0, 16.0, 104.0, 56.0));
    }
}
