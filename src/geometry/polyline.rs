//! Open paths.

use super::{Line, Point};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// An open path through a sequence of vertices.
///
/// What matters to the print planners are the two endpoints, `front` and
/// `back`: ordering chains polylines together where endpoints coincide, and
/// picks which endpoint to start printing from. A polyline is never
/// implicitly closed; closed contours are [`Polygon`](super::Polygon)s.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// An empty polyline.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Wrap a vertex sequence as a polyline.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The vertices, front to back.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Take the vertices out of the polyline.
    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no vertices at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a vertex at the back.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// The first endpoint. Panics on an empty polyline.
    #[inline]
    pub fn front(&self) -> Point {
        self.points[0]
    }

    /// The last endpoint. Panics on an empty polyline.
    #[inline]
    pub fn back(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Iterate over the segments between consecutive vertices.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// Total path length from front to back.
    pub fn length(&self) -> CoordF {
        self.segments().map(|s| s.length()).sum()
    }

    /// Whether this polyline is a loop in disguise: at least three vertices
    /// with front and back within `tolerance` of each other.
    pub fn is_loop(&self, tolerance: Coord) -> bool {
        self.points.len() >= 3 && self.front().coincides_with(&self.back(), tolerance)
    }

    /// Swap front and back by reversing the vertex order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// The location on the polyline nearest to `p`, or `None` when there are
    /// no vertices.
    pub fn closest_point(&self, p: Point) -> Option<Point> {
        if self.points.len() < 2 {
            return self.points.first().copied();
        }
        self.segments()
            .map(|segment| segment.project_point(&p))
            .min_by_key(|candidate| p.distance_squared(candidate))
    }
}

impl fmt::Debug for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polyline({} points)", self.points.len())
    }
}

impl Deref for Polyline {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl DerefMut for Polyline {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.points
    }
}

/// Type alias for a collection of polylines.
pub type Polylines = Vec<Polyline>;

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Polyline {
        Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(1_000, 0),
            Point::new(1_000, 800),
            Point::new(2_500, 800),
        ])
    }

    #[test]
    fn test_endpoints() {
        let pl = zigzag();
        assert_eq!(pl.len(), 4);
        assert_eq!(pl.front(), Point::new(0, 0));
        assert_eq!(pl.back(), Point::new(2_500, 800));
    }

    #[test]
    fn test_empty() {
        let mut pl = Polyline::new();
        assert!(pl.is_empty());
        assert_eq!(pl.segments().count(), 0);
        pl.push(Point::new(5, 5));
        assert_eq!(pl.len(), 1);
        assert_eq!(pl.front(), pl.back());
    }

    #[test]
    fn test_segments() {
        let pl = zigzag();
        let segments: Vec<Line> = pl.segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Line::new(Point::new(0, 0), Point::new(1_000, 0)));
        assert_eq!(segments[2].b, pl.back());
    }

    #[test]
    fn test_length() {
        // 1000 right, 800 up, 1500 right.
        assert!((zigzag().length() - 3_300.0).abs() < 1.0);
    }

    #[test]
    fn test_is_loop() {
        assert!(!zigzag().is_loop(10));

        let nearly_closed = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(1_000, 0),
            Point::new(500, 900),
            Point::new(3, 4),
        ]);
        assert!(nearly_closed.is_loop(10));
        assert!(!nearly_closed.is_loop(2));

        // Two coincident endpoints alone do not make a loop.
        let degenerate = Polyline::from_points(vec![Point::new(0, 0), Point::new(1, 1)]);
        assert!(!degenerate.is_loop(10));
    }

    #[test]
    fn test_reverse() {
        let mut pl = zigzag();
        pl.reverse();
        assert_eq!(pl.front(), Point::new(2_500, 800));
        assert_eq!(pl.back(), Point::new(0, 0));
    }

    #[test]
    fn test_closest_point() {
        let pl = zigzag();
        // Below the first segment.
        assert_eq!(pl.closest_point(Point::new(400, -300)), Some(Point::new(400, 0)));
        // Right of the vertical segment.
        assert_eq!(pl.closest_point(Point::new(1_200, 400)), Some(Point::new(1_000, 400)));
        assert_eq!(Polyline::new().closest_point(Point::new(0, 0)), None);
    }

    #[test]
    fn test_deref_gives_slice_access() {
        let pl = zigzag();
        assert_eq!(pl[1], Point::new(1_000, 0));
        assert_eq!(pl.first(), Some(&Point::new(0, 0)));
    }
}
