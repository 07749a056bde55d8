//! Axis-aligned pixel rectangles.

use std::fmt;

use serde::Serialize;

/// A full-resolution bounding box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a box from inclusive-exclusive edges.
    ///
    /// Edges are expected in order; an inverted edge yields zero extent.
    pub fn from_edges(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            x: left,
            y: top,
            w: right.saturating_sub(left),
            h: bottom.saturating_sub(top),
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Clip the box to a `width` x `height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let left = self.x.min(width);
        let top = self.y.min(height);
        Self::from_edges(left, top, self.right().min(width), self.bottom().min(height))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({},{})", self.w, self.h, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let b = BoundingBox::new(2, 3, 10, 5);
        assert_eq!(b.right(), 12);
        assert_eq!(b.bottom(), 8);
        assert_eq!(b.area(), 50);
        assert!(!b.is_empty());
    }

    #[test]
    fn test_from_edges_inverted_is_empty() {
        let b = BoundingBox::from_edges(10, 10, 5, 20);
        assert_eq!(b.w, 0);
        assert!(b.is_empty());
    }

    #[test]
    fn test_clamp_to() {
        let b = BoundingBox::new(90, 40, 20, 20).clamp_to(100, 50);
        assert_eq!(b, BoundingBox::new(90, 40, 10, 10));

        let outside = BoundingBox::new(120, 0, 5, 5).clamp_to(100, 50);
        assert!(outside.is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(BoundingBox::new(4, 8, 16, 32).to_string(), "16x32 at (4,8)");
    }
}
