//! Axis-aligned bounding box.

use super::Point;
use crate::Coord;
use serde::{Deserialize, Serialize};

/// An axis-aligned 2D bounding box with integer coordinates.
///
/// A freshly created box is empty (min > max) and grows as points are merged
/// into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    /// Create a new, empty bounding box.
    pub fn new() -> Self {
        Self {
            min: Point::new(Coord::MAX, Coord::MAX),
            max: Point::new(Coord::MIN, Coord::MIN),
        }
    }

    /// Create a bounding box covering the given points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut bbox = Self::new();
        for p in points {
            bbox.merge_point(*p);
        }
        bbox
    }

    /// Check if the bounding box is empty (contains no points).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grow the bounding box to include a point.
    pub fn merge_point(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grow the bounding box to include another bounding box.
    pub fn merge(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.merge_point(other.min);
            self.merge_point(other.max);
        }
    }

    /// Expand the bounding box by a margin on all sides.
    pub fn expand(&mut self, margin: Coord) {
        if !self.is_empty() {
            self.min.x -= margin;
            self.min.y -= margin;
            self.max.x += margin;
            self.max.y += margin;
        }
    }

    /// Check if a point lies within the bounding box (inclusive).
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Check if two bounding boxes intersect (inclusive).
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let bbox = BoundingBox::new();
        assert!(bbox.is_empty());
        assert!(!bbox.contains(&Point::zero()));
    }

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(&[Point::new(10, 20), Point::new(-5, 40)]);
        assert_eq!(bbox.min, Point::new(-5, 20));
        assert_eq!(bbox.max, Point::new(10, 40));
        assert!(bbox.contains(&Point::new(0, 30)));
        assert!(!bbox.contains(&Point::new(0, 50)));
    }

    #[test]
    fn test_intersects() {
        let a = BoundingBox::from_points(&[Point::new(0, 0), Point::new(100, 100)]);
        let b = BoundingBox::from_points(&[Point::new(50, 50), Point::new(150, 150)]);
        let c = BoundingBox::from_points(&[Point::new(200, 200), Point::new(300, 300)]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_expand() {
        let mut bbox = BoundingBox::from_points(&[Point::new(0, 0), Point::new(10, 10)]);
        bbox.expand(5);
        assert_eq!(bbox.min, Point::new(-5, -5));
        assert_eq!(bbox.max, Point::new(15, 15));
    }
}
