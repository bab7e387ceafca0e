//! Crossings of a straight travel segment with a region boundary, and
//! boundary-hugging detours around them.
//!
//! Given a segment from `start` to `end` and a [`Shape`], this module finds
//! where the segment crosses the boundary and replaces the blocked stretches
//! with walks along the boundary, a small distance off it. The result is the
//! comb path: the shortest practical route from `start` to `end` that
//! respects the boundary.

use crate::geometry::{perp, vsize2, Line, Point, Shape};
use crate::{Coord, CoordF};

/// A path computed by combing.
///
/// The point list excludes the (implicit) start point of the move and
/// includes its destination, so consecutive comb paths concatenate without
/// duplicated points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombPath {
    /// The points to travel through, ending at the destination.
    pub points: Vec<Point>,
    /// Whether this path travels through air, outside all parts.
    pub through_air: bool,
    /// Whether the path could not fully avoid the boundary and crosses it.
    pub cross_boundary: bool,
}

/// One crossing of the scanline with a polygon.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Transformed x coordinate of the crossing.
    x: Coord,
    /// Index of the segment's start vertex within the polygon.
    segment_idx: usize,
}

/// The extreme crossings of one polygon along the scanline.
#[derive(Debug, Clone, Copy)]
struct PolyCrossings {
    poly_idx: usize,
    min: Crossing,
    max: Crossing,
}

/// Rotation that maps the travel direction onto the +X axis, so the travel
/// segment becomes a horizontal scanline.
#[derive(Debug, Clone, Copy)]
struct RotationMatrix {
    cos: CoordF,
    sin: CoordF,
}

impl RotationMatrix {
    fn new(direction: Point) -> Self {
        let len = direction.length();
        if len == 0.0 {
            return Self { cos: 1.0, sin: 0.0 };
        }
        Self {
            cos: direction.x as CoordF / len,
            sin: direction.y as CoordF / len,
        }
    }

    fn apply(&self, p: Point) -> Point {
        Point::new(
            (self.cos * p.x as CoordF + self.sin * p.y as CoordF).round() as Coord,
            (-self.sin * p.x as CoordF + self.cos * p.y as CoordF).round() as Coord,
        )
    }

    fn unapply(&self, p: Point) -> Point {
        Point::new(
            (self.cos * p.x as CoordF - self.sin * p.y as CoordF).round() as Coord,
            (self.sin * p.x as CoordF + self.cos * p.y as CoordF).round() as Coord,
        )
    }
}

/// Computes the crossings of one travel segment with a boundary shape and
/// builds the comb path around them.
pub struct LinePolygonsCrossings<'a> {
    boundary: &'a Shape,
    start: Point,
    end: Point,
    /// Signed distance to keep off the boundary: positive stays on the
    /// outside of the region, negative on the inside.
    offset: Coord,
    matrix: RotationMatrix,
    t_start: Point,
    t_end: Point,
}

impl<'a> LinePolygonsCrossings<'a> {
    /// Compute a comb path from `start` to `end` that respects `boundary`.
    ///
    /// `offset` is the distance to keep off the boundary; its sign selects
    /// the side (negative: inside the region, positive: outside). Travels
    /// shorter than `max_comb_distance_ignored` or not blocked by the
    /// boundary yield a straight path.
    ///
    /// Returns `None` when `fail_on_unavoidable_obstacles` is set and an
    /// endpoint turns out to be trapped inside a boundary polygon.
    pub fn comb(
        boundary: &'a Shape,
        start: Point,
        end: Point,
        offset: Coord,
        max_comb_distance_ignored: Coord,
        fail_on_unavoidable_obstacles: bool,
    ) -> Option<CombPath> {
        let matrix = RotationMatrix::new(end - start);
        let t_start = matrix.apply(start);
        let mut t_end = matrix.apply(end);
        t_end.y = t_start.y; // The travel is the scanline; rounding may drift a unit.
        let crossings = Self {
            boundary,
            start,
            end,
            offset,
            matrix,
            t_start,
            t_end,
        };
        crossings.get_combing_path(max_comb_distance_ignored, fail_on_unavoidable_obstacles)
    }

    fn get_combing_path(
        &self,
        max_comb_distance_ignored: Coord,
        fail_on_unavoidable_obstacles: bool,
    ) -> Option<CombPath> {
        let ignored2 = max_comb_distance_ignored as i128 * max_comb_distance_ignored as i128;
        if vsize2(self.end - self.start) < ignored2 || !self.collides_with_segment(self.start, self.end)
        {
            return Some(CombPath {
                points: vec![self.end],
                ..CombPath::default()
            });
        }

        let crossings = self.calc_scanline_crossings(fail_on_unavoidable_obstacles)?;
        let basic = self.get_basic_combing_path(&crossings);
        let (points, cross_boundary) = self.optimize_path(&basic);
        Some(CombPath {
            points,
            through_air: false,
            cross_boundary,
        })
    }

    /// Whether a segment crosses any boundary edge.
    fn collides_with_segment(&self, a: Point, b: Point) -> bool {
        let travel = Line::new(a, b);
        self.boundary
            .iter()
            .any(|poly| (0..poly.len()).any(|i| travel.intersects(&poly.edge(i))))
    }

    /// Find, per polygon, the extreme crossings of the scanline within the
    /// travel's x range.
    ///
    /// Returns `None` when failing on unavoidable obstacles and some polygon
    /// is crossed an odd number of times, meaning one of the travel
    /// endpoints is trapped inside it.
    fn calc_scanline_crossings(
        &self,
        fail_on_unavoidable_obstacles: bool,
    ) -> Option<Vec<PolyCrossings>> {
        let ty = self.t_start.y;
        let mut crossings: Vec<PolyCrossings> = Vec::new();
        for (poly_idx, poly) in self.boundary.iter().enumerate() {
            let n = poly.len();
            if n < 3 {
                continue;
            }
            let mut crossing_count = 0usize;
            let mut min: Option<Crossing> = None;
            let mut max: Option<Crossing> = None;
            let mut p0 = self.matrix.apply(poly[n - 1]);
            for (i, &vertex) in poly.points().iter().enumerate() {
                let p1 = self.matrix.apply(vertex);
                let segment_idx = (i + n - 1) % n;
                let crosses =
                    (p0.y >= ty && p1.y <= ty) || (p1.y >= ty && p0.y <= ty);
                if crosses && p0.y != p1.y {
                    let x = p0.x
                        + ((p1.x - p0.x) as i128 * (ty - p0.y) as i128 / (p1.y - p0.y) as i128)
                            as Coord;
                    if x >= self.t_start.x && x <= self.t_end.x {
                        crossing_count += 1;
                        if min.map_or(true, |c| x < c.x) {
                            min = Some(Crossing { x, segment_idx });
                        }
                        if max.map_or(true, |c| x > c.x) {
                            max = Some(Crossing { x, segment_idx });
                        }
                    }
                }
                p0 = p1;
            }
            if let (Some(min), Some(max)) = (min, max) {
                if fail_on_unavoidable_obstacles && crossing_count % 2 == 1 {
                    return None; // An endpoint is inside this polygon; no way around.
                }
                crossings.push(PolyCrossings { poly_idx, min, max });
            }
        }
        Some(crossings)
    }

    /// Next polygon whose crossing interval starts after `x` along the scanline.
    fn next_polygon_along_scanline<'c>(
        crossings: &'c [PolyCrossings],
        x: Coord,
    ) -> Option<&'c PolyCrossings> {
        crossings
            .iter()
            .filter(|pc| pc.min.x > x)
            .min_by_key(|pc| pc.min.x)
    }

    /// Walk the scanline from start to end, inserting a boundary walk around
    /// every blocking polygon. The result still hugs every corner; it is
    /// shortened by [`optimize_path`](Self::optimize_path) afterwards.
    fn get_basic_combing_path(&self, crossings: &[PolyCrossings]) -> Vec<Point> {
        let mut path: Vec<Point> = Vec::new();
        let mut x = self.t_start.x;
        while let Some(pc) = Self::next_polygon_along_scanline(crossings, x) {
            self.append_walk_around(&mut path, pc);
            x = pc.max.x;
        }
        path.push(self.end);
        path
    }

    /// Append the walk around one polygon: the entry point just before its
    /// crossing interval, the boundary vertices along the shorter side, and
    /// the exit point just after.
    fn append_walk_around(&self, path: &mut Vec<Point>, pc: &PolyCrossings) {
        let off = self.offset.abs();
        let ty = self.t_start.y;
        let entry = self.matrix.unapply(Point::new(pc.min.x - off, ty));
        let exit = self.matrix.unapply(Point::new(pc.max.x + off, ty));
        path.push(entry);

        let poly = &self.boundary[pc.poly_idx];
        let n = poly.len();
        let min_seg = pc.min.segment_idx;
        let max_seg = pc.max.segment_idx;
        if min_seg != max_seg {
            // Walk from the entry crossing to the exit crossing along either
            // side of the polygon; take the shorter one.
            let forward_count = (max_seg + n - min_seg) % n;
            let forward: Vec<Point> = (1..=forward_count)
                .map(|step| self.offset_vertex(pc.poly_idx, (min_seg + step) % n))
                .collect();
            let backward_count = (min_seg + n - max_seg) % n;
            let backward: Vec<Point> = (0..backward_count)
                .map(|step| self.offset_vertex(pc.poly_idx, (min_seg + n - step) % n))
                .collect();

            if walk_length(entry, &forward, exit) <= walk_length(entry, &backward, exit) {
                path.extend(forward);
            } else {
                path.extend(backward);
            }
        }

        path.push(exit);
    }

    /// A polygon vertex moved off the boundary along its angle bisector, to
    /// the side selected by the sign of the offset.
    fn offset_vertex(&self, poly_idx: usize, vertex_idx: usize) -> Point {
        let off = self.offset.abs();
        if off == 0 {
            return self.boundary[poly_idx][vertex_idx];
        }
        let poly = &self.boundary[poly_idx];
        let n = poly.len();
        let prev = poly[(vertex_idx + n - 1) % n];
        let vertex = poly[vertex_idx];
        let next = poly[(vertex_idx + 1) % n];

        let resolution = 1_000;
        let mut bisector =
            perp(vertex - prev).with_length(resolution) + perp(next - vertex).with_length(resolution);
        if bisector == Point::zero() {
            bisector = perp(next - vertex);
        }
        let step = bisector.with_length(off);
        let want_inside = self.offset < 0;
        let candidate = vertex + step;
        if self.boundary.inside(candidate) == want_inside {
            return candidate;
        }
        let candidate = vertex - step;
        if self.boundary.inside(candidate) == want_inside {
            return candidate;
        }
        vertex
    }

    /// Drop every path point that can be skipped without colliding with the
    /// boundary. Marks the path as crossing the boundary when even adjacent
    /// points cannot see each other.
    fn optimize_path(&self, basic: &[Point]) -> (Vec<Point>, bool) {
        let mut optimized: Vec<Point> = Vec::new();
        let mut cross_boundary = false;
        let Some(&destination) = basic.last() else {
            return (optimized, cross_boundary);
        };
        let mut last = self.start;
        for (i, &point) in basic.iter().enumerate() {
            if optimized.last() == Some(&point) {
                continue;
            }
            if self.collides_with_segment(last, point) {
                if i == 0 {
                    // There is no earlier point to fall back on; keep this
                    // one as the waypoint so the rest of the path is checked
                    // from it rather than from the unreachable start.
                    cross_boundary = true;
                    optimized.push(point);
                    last = point;
                } else {
                    let prev = basic[i - 1];
                    if self.collides_with_segment(prev, point) {
                        cross_boundary = true;
                    }
                    if optimized.last() != Some(&prev) {
                        optimized.push(prev);
                        last = prev;
                    }
                }
            }
        }
        if optimized.last() != Some(&destination) {
            optimized.push(destination);
        }
        (optimized, cross_boundary)
    }
}

fn walk_length(entry: Point, vertices: &[Point], exit: Point) -> CoordF {
    let mut length = 0.0;
    let mut prev = entry;
    for &v in vertices {
        length += prev.distance(&v);
        prev = v;
    }
    length + prev.distance(&exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn square(x: Coord, y: Coord, size: Coord) -> Polygon {
        Polygon::rectangle(Point::new(x, y), Point::new(x + size, y + size))
    }

    #[test]
    fn test_straight_when_unobstructed() {
        let boundary = Shape::from_polygons(vec![square(0, 0, 10_000)]);
        let path = LinePolygonsCrossings::comb(
            &boundary,
            Point::new(2_000, 2_000),
            Point::new(8_000, 8_000),
            -40,
            0,
            false,
        )
        .unwrap();
        assert_eq!(path.points, vec![Point::new(8_000, 8_000)]);
        assert!(!path.cross_boundary);
    }

    #[test]
    fn test_short_travel_is_straight() {
        let boundary = Shape::from_polygons(vec![square(0, 0, 10_000)]);
        let path = LinePolygonsCrossings::comb(
            &boundary,
            Point::new(100, 100),
            Point::new(150, 100),
            -40,
            1_000,
            false,
        )
        .unwrap();
        assert_eq!(path.points, vec![Point::new(150, 100)]);
    }

    #[test]
    fn test_walk_around_obstacle() {
        // Travel across a square obstacle, combing on the outside of it.
        let boundary = Shape::from_polygons(vec![square(4_000, -2_000, 4_000)]);
        let start = Point::new(0, 0);
        let end = Point::new(12_000, 0);
        let path = LinePolygonsCrossings::comb(&boundary, start, end, 40, 0, false).unwrap();

        assert!(!path.cross_boundary);
        assert_eq!(*path.points.last().unwrap(), end);
        assert!(path.points.len() > 1);
        // No leg of the result may cross the obstacle.
        let mut prev = start;
        for &p in &path.points {
            assert!(
                !boundary.collides_with_segment(prev, p),
                "leg {:?} -> {:?} crosses the boundary",
                prev,
                p
            );
            prev = p;
        }
    }

    #[test]
    fn test_walk_around_concavity_stays_inside() {
        // A U-shaped region; travel between the two prongs must comb around
        // the notch, staying inside the region.
        let boundary = Shape::from_polygons(vec![Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(30_000, 0),
            Point::new(30_000, 30_000),
            Point::new(20_000, 30_000),
            Point::new(20_000, 10_000),
            Point::new(10_000, 10_000),
            Point::new(10_000, 30_000),
            Point::new(0, 30_000),
        ])]);
        let start = Point::new(5_000, 20_000);
        let end = Point::new(25_000, 20_000);
        let path = LinePolygonsCrossings::comb(&boundary, start, end, -40, 0, false).unwrap();

        assert!(!path.cross_boundary);
        assert_eq!(*path.points.last().unwrap(), end);
        let mut prev = start;
        for &p in &path.points {
            assert!(boundary.inside(p), "{:?} is not inside the region", p);
            assert!(!boundary.collides_with_segment(prev, p));
            prev = p;
        }
    }

    #[test]
    fn test_fail_when_endpoint_trapped() {
        // The start point lies inside the obstacle; with
        // fail_on_unavoidable_obstacles set this must fail.
        let boundary = Shape::from_polygons(vec![square(0, 0, 10_000)]);
        let result = LinePolygonsCrossings::comb(
            &boundary,
            Point::new(5_000, 5_000),
            Point::new(20_000, 5_000),
            40,
            0,
            true,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_two_obstacles_in_a_row() {
        let boundary =
            Shape::from_polygons(vec![square(2_000, -1_000, 2_000), square(8_000, -1_000, 2_000)]);
        let start = Point::new(0, 0);
        let end = Point::new(14_000, 0);
        let path = LinePolygonsCrossings::comb(&boundary, start, end, 40, 0, false).unwrap();

        assert_eq!(*path.points.last().unwrap(), end);
        let mut prev = start;
        for &p in &path.points {
            assert!(!boundary.collides_with_segment(prev, p));
            prev = p;
        }
    }
}
