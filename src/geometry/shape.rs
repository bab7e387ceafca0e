//! Multi-polygon region with even-odd semantics.
//!
//! A [`Shape`] is the planner's region type: a flat list of closed polygons
//! where containment follows the even-odd rule, so holes are simply polygons
//! nested inside outlines. A [`PartsView`] groups the polygons of a Shape
//! into connected parts (one outline plus the holes nested in it).

use super::{perp, BoundingBox, Line, Point, Polygon};
use crate::Coord;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut, Index};

/// Closest point on the boundary of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosestPointResult {
    /// The closest location on the boundary.
    pub point: Point,
    /// Index of the polygon the location lies on.
    pub poly_idx: usize,
    /// Index of the segment within that polygon.
    pub segment_idx: usize,
    /// Squared distance from the query point.
    pub distance_squared: i128,
}

/// A possibly multiply-connected region: outlines plus holes, all stored as
/// a flat polygon list with even-odd containment.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    polygons: Vec<Polygon>,
}

impl Shape {
    /// Create an empty shape.
    #[inline]
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }

    /// Create a shape from polygons.
    #[inline]
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Get the polygons of this shape.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Add a polygon.
    #[inline]
    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Number of polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Whether the shape has no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total number of vertices over all polygons.
    pub fn point_count(&self) -> usize {
        self.polygons.iter().map(|p| p.len()).sum()
    }

    /// Bounding box over all polygons.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();
        for poly in &self.polygons {
            bbox.merge(&poly.bounding_box());
        }
        bbox
    }

    /// Check if a point is inside the region (even-odd over all polygons).
    pub fn inside(&self, p: Point) -> bool {
        let mut inside = false;
        for poly in &self.polygons {
            if poly.contains_point(&p) {
                inside = !inside;
            }
        }
        inside
    }

    /// Find the closest point on any boundary polygon to `p`.
    pub fn closest_point(&self, p: Point) -> Option<ClosestPointResult> {
        let all: Vec<usize> = (0..self.polygons.len()).collect();
        self.closest_point_among(&all, p)
    }

    /// Find the closest boundary point to `p`, restricted to the given polygons.
    pub fn closest_point_among(&self, poly_indices: &[usize], p: Point) -> Option<ClosestPointResult> {
        let mut best: Option<ClosestPointResult> = None;
        for &poly_idx in poly_indices {
            let poly = &self.polygons[poly_idx];
            if poly.len() < 2 {
                continue;
            }
            for segment_idx in 0..poly.len() {
                let edge = poly.edge(segment_idx);
                let proj = edge.project_point(&p);
                let distance_squared = p.distance_squared(&proj);
                if best.map_or(true, |b| distance_squared < b.distance_squared) {
                    best = Some(ClosestPointResult {
                        point: proj,
                        poly_idx,
                        segment_idx,
                        distance_squared,
                    });
                }
            }
        }
        best
    }

    /// Check whether a segment crosses any boundary edge.
    pub fn collides_with_segment(&self, a: Point, b: Point) -> bool {
        let travel = Line::new(a, b);
        self.polygons
            .iter()
            .any(|poly| poly.edges().iter().any(|edge| travel.intersects(edge)))
    }

    /// Project `p` onto the nearest boundary segment and nudge it inward by
    /// `nudge`, if the boundary is within `max_distance_squared`.
    ///
    /// Returns the moved point and the polygon it was projected onto.
    pub fn move_inside(
        &self,
        p: Point,
        max_distance_squared: i128,
        nudge: Coord,
    ) -> Option<(Point, usize)> {
        let closest = self.closest_point(p)?;
        if closest.distance_squared > max_distance_squared {
            return None;
        }
        self.nudge_inside(closest, nudge)
            .map(|moved| (moved, closest.poly_idx))
    }

    /// Move a boundary location slightly into the region.
    ///
    /// The nudge side is picked by containment testing, so the caller does
    /// not need to know the winding conventions of whatever produced the
    /// shape.
    pub fn nudge_inside(&self, at: ClosestPointResult, nudge: Coord) -> Option<Point> {
        self.nudge_off_boundary(at, nudge, true)
    }

    /// Move a boundary location slightly out of the region.
    pub fn nudge_outside(&self, at: ClosestPointResult, nudge: Coord) -> Option<Point> {
        self.nudge_off_boundary(at, nudge, false)
    }

    fn nudge_off_boundary(
        &self,
        at: ClosestPointResult,
        nudge: Coord,
        want_inside: bool,
    ) -> Option<Point> {
        let edge = self.polygons[at.poly_idx].edge(at.segment_idx);
        let dir = edge.direction();
        if dir == Point::zero() {
            return (self.inside(at.point) == want_inside).then_some(at.point);
        }
        let normal = perp(dir).with_length(nudge);
        let candidate = at.point + normal;
        if self.inside(candidate) == want_inside {
            return Some(candidate);
        }
        let candidate = at.point - normal;
        if self.inside(candidate) == want_inside {
            return Some(candidate);
        }
        None
    }

    /// Group the polygons of this shape into connected parts.
    ///
    /// Each part is one outline polygon together with the hole polygons
    /// directly nested inside it. Islands inside holes become parts of their
    /// own. Polygons are assigned by even-odd nesting depth of a
    /// representative vertex.
    pub fn parts_view(&self) -> PartsView {
        let n = self.polygons.len();
        let mut depth = vec![0usize; n];
        for i in 0..n {
            let Some(rep) = self.polygons[i].points().first().copied() else {
                continue;
            };
            for j in 0..n {
                if i != j && self.polygons[j].contains_point(&rep) {
                    depth[i] += 1;
                }
            }
        }

        let mut part_of = vec![usize::MAX; n];
        let mut parts: Vec<Vec<usize>> = Vec::new();
        // Outlines (even depth) found in polygon order each start a part.
        for i in 0..n {
            if depth[i] % 2 == 0 {
                part_of[i] = parts.len();
                parts.push(vec![i]);
            }
        }
        // Holes (odd depth) join the innermost outline containing them.
        for i in 0..n {
            if depth[i] % 2 == 1 {
                let Some(rep) = self.polygons[i].points().first().copied() else {
                    continue;
                };
                let parent = (0..n)
                    .filter(|&j| {
                        j != i && depth[j] == depth[i] - 1 && self.polygons[j].contains_point(&rep)
                    })
                    .max_by_key(|&j| depth[j]);
                if let Some(parent) = parent {
                    part_of[i] = part_of[parent];
                    parts[part_of[parent]].push(i);
                } else {
                    // No identifiable parent; degenerate input, isolate it.
                    part_of[i] = parts.len();
                    parts.push(vec![i]);
                }
            }
        }

        PartsView { parts, part_of }
    }

    /// Assemble the polygons of one part into a standalone shape.
    pub fn assemble_part(&self, parts_view: &PartsView, part_idx: usize) -> Shape {
        Shape::from_polygons(
            parts_view.parts[part_idx]
                .iter()
                .map(|&i| self.polygons[i].clone())
                .collect(),
        )
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Shape({} polygons)", self.polygons.len())
    }
}

impl Deref for Shape {
    type Target = [Polygon];

    fn deref(&self) -> &Self::Target {
        &self.polygons
    }
}

impl DerefMut for Shape {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.polygons
    }
}

impl Index<usize> for Shape {
    type Output = Polygon;

    fn index(&self, index: usize) -> &Self::Output {
        &self.polygons[index]
    }
}

impl From<Vec<Polygon>> for Shape {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self::from_polygons(polygons)
    }
}

impl FromIterator<Polygon> for Shape {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::from_polygons(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Shape {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

/// Grouping of a [`Shape`]'s polygons into connected parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartsView {
    /// For each part, the polygon indices belonging to it (outline first).
    pub parts: Vec<Vec<usize>>,
    /// For each polygon, the part it belongs to.
    pub part_of: Vec<usize>,
}

impl PartsView {
    /// The part a polygon belongs to.
    #[inline]
    pub fn part_containing(&self, poly_idx: usize) -> usize {
        self.part_of[poly_idx]
    }

    /// The polygon indices of a part (outline first).
    #[inline]
    pub fn polygons_of(&self, part_idx: usize) -> &[usize] {
        &self.parts[part_idx]
    }

    /// Number of parts.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: Coord, y: Coord, size: Coord) -> Polygon {
        Polygon::rectangle(Point::new(x, y), Point::new(x + size, y + size))
    }

    #[test]
    fn test_inside_with_hole() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000), square(200, 200, 100)]);
        assert!(shape.inside(Point::new(100, 100)));
        assert!(!shape.inside(Point::new(250, 250))); // in the hole
        assert!(!shape.inside(Point::new(2000, 0)));
    }

    #[test]
    fn test_closest_point() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000)]);
        let closest = shape.closest_point(Point::new(500, -200)).unwrap();
        assert_eq!(closest.point, Point::new(500, 0));
        assert_eq!(closest.distance_squared, 200 * 200);
    }

    #[test]
    fn test_collides_with_segment() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000)]);
        assert!(shape.collides_with_segment(Point::new(500, 500), Point::new(1500, 500)));
        assert!(!shape.collides_with_segment(Point::new(100, 100), Point::new(900, 900)));
        assert!(!shape.collides_with_segment(Point::new(1500, 0), Point::new(1500, 1000)));
    }

    #[test]
    fn test_move_inside() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000)]);
        // A point just outside the left edge.
        let (moved, poly_idx) = shape
            .move_inside(Point::new(-50, 500), 100 * 100, 40)
            .unwrap();
        assert_eq!(poly_idx, 0);
        assert!(shape.inside(moved));
        assert_eq!(moved, Point::new(40, 500));

        // Too far away.
        assert!(shape.move_inside(Point::new(-500, 500), 100 * 100, 40).is_none());
    }

    #[test]
    fn test_parts_view_two_parts_with_hole() {
        let shape = Shape::from_polygons(vec![
            square(0, 0, 1000),     // part 0 outline
            square(5000, 0, 1000),  // part 1 outline
            square(200, 200, 100),  // hole of part 0
        ]);
        let view = shape.parts_view();
        assert_eq!(view.part_count(), 2);
        assert_eq!(view.part_containing(0), 0);
        assert_eq!(view.part_containing(1), 1);
        assert_eq!(view.part_containing(2), 0);
        assert_eq!(view.polygons_of(0), &[0, 2]);
    }

    #[test]
    fn test_parts_view_island_in_hole() {
        let shape = Shape::from_polygons(vec![
            square(0, 0, 1000),     // outline
            square(100, 100, 800),  // hole
            square(300, 300, 200),  // island inside the hole
        ]);
        let view = shape.parts_view();
        assert_eq!(view.part_count(), 2);
        assert_eq!(view.part_containing(2), 1);
    }

    #[test]
    fn test_assemble_part() {
        let shape = Shape::from_polygons(vec![
            square(0, 0, 1000),
            square(5000, 0, 1000),
            square(200, 200, 100),
        ]);
        let view = shape.parts_view();
        let part = shape.assemble_part(&view, 0);
        assert_eq!(part.len(), 2);
        assert!(part.inside(Point::new(100, 100)));
        assert!(!part.inside(Point::new(250, 250)));
        assert!(!part.inside(Point::new(5500, 500)));
    }
}
