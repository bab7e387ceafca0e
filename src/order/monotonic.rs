//! Monotonic print ordering.
//!
//! Reorders paths so that adjacent line strokes are printed in one consistent
//! direction projected onto a chosen axis. Printing adjacent lines in the
//! same direction makes them layer on top of each other the same way, which
//! keeps the surface looking uniform.
//!
//! # Overview
//!
//! Closed polygons are not reordered; they are emitted first, unchanged.
//! Open polylines are sorted by their projection on the monotonic vector and
//! partitioned into sequences:
//! - strings of polylines whose endpoints coincide are printed as one run,
//! - lines that overlap each other within `max_adjacent_distance` in the
//!   perpendicular direction are chained in projection order.
//!
//! Each sequence starts at a *starting line*; starting lines are emitted in
//! projection order, and each sequence is then followed through its
//! `connections` until it ends, hits another starting line, or loops.

use std::collections::{HashMap, HashSet, VecDeque};

use super::OrderedPath;
use crate::geometry::{dot2, perp, vsize2, Point, Polygon, Polyline};
use crate::grid::SparsePointGrid;
use crate::{Coord, Error, Result, MAX_PLANNING_COORD};

/// Orders paths so that adjacent lines print in one consistent direction.
///
/// Add polygons and polylines, call [`optimize`](Self::optimize), then print
/// the [`paths`](Self::paths) field front to back.
pub struct PathOrderMonotonic<'a> {
    /// The ordered output. Filled by [`optimize`](Self::optimize).
    pub paths: Vec<OrderedPath<'a>>,
    /// The direction in which to print monotonically, stored as an integer
    /// vector of length [`Self::MONOTONIC_VECTOR_RESOLUTION`].
    monotonic_vector: Point,
    /// Maximum distance at which lines are considered adjacent. The
    /// monotonicity constraint only holds for lines closer than this.
    max_adjacent_distance: Coord,
    /// Toolhead position before this run; start vertices are chosen to
    /// minimize travel from here onward.
    start_point: Point,
}

impl<'a> PathOrderMonotonic<'a> {
    /// Length of the stored monotonic vector. Long enough to give the
    /// direction sub-unit angular precision after rounding to integer
    /// coordinates, short enough that projections of any reasonable
    /// coordinate stay far from overflow.
    pub const MONOTONIC_VECTOR_RESOLUTION: Coord = 1000;

    /// Distance under which two endpoints count as the same point.
    pub const COINCIDENT_POINT_DISTANCE: Coord = 10;

    /// Cell size of the endpoint lookup grid (2 mm).
    const GRID_SIZE: Coord = 2_000;

    /// Create an orderer for one batch of paths.
    ///
    /// `monotonic_direction` is the angle (radians) of the axis along which
    /// adjacent lines must print in the same sense. `max_adjacent_distance`
    /// is typically one extrusion line width.
    pub fn new(monotonic_direction: f64, max_adjacent_distance: Coord, start_point: Point) -> Self {
        let resolution = Self::MONOTONIC_VECTOR_RESOLUTION as f64;
        // The monotonic vector rotates clockwise instead of counter-clockwise,
        // the same as how the infill patterns are generated.
        let monotonic_vector = Point::new(
            (-monotonic_direction.cos() * resolution).round() as Coord,
            (monotonic_direction.sin() * resolution).round() as Coord,
        );
        Self {
            paths: Vec::new(),
            monotonic_vector,
            max_adjacent_distance,
            start_point,
        }
    }

    /// Add a closed polygon to print.
    ///
    /// Coordinates must stay within [`MAX_PLANNING_COORD`] so that
    /// projections on the monotonic vector cannot overflow.
    pub fn add_polygon(&mut self, polygon: &'a Polygon) -> Result<()> {
        check_coordinates(polygon.points())?;
        self.paths.push(OrderedPath::from_polygon(polygon));
        Ok(())
    }

    /// Add an open polyline to print.
    ///
    /// Coordinates must stay within [`MAX_PLANNING_COORD`] so that
    /// projections on the monotonic vector cannot overflow.
    pub fn add_polyline(&mut self, polyline: &'a Polyline) -> Result<()> {
        check_coordinates(polyline.points())?;
        self.paths.push(OrderedPath::from_polyline(polyline));
        Ok(())
    }

    /// Compute the print order.
    ///
    /// Reorders [`paths`](Self::paths) and assigns every emitted path a
    /// start vertex and direction.
    pub fn optimize(&mut self) {
        if self.paths.is_empty() {
            return;
        }

        self.detect_loops();

        let mut reordered: Vec<OrderedPath<'a>> = Vec::with_capacity(self.paths.len());

        // First print all the looping polygons, if there are any.
        let mut polylines: Vec<usize> = Vec::new();
        for i in 0..self.paths.len() {
            if self.paths[i].is_closed || self.paths[i].vertices.len() <= 1 {
                reordered.push(self.paths[i]);
            } else {
                self.paths[i].start_vertex = None; // Starting point is not yet known.
                polylines.push(i);
            }
        }

        // Sort the polylines by their projection on the monotonic vector.
        // This helps find adjacent lines quickly.
        let m = self.monotonic_vector;
        polylines.sort_by_key(|&i| {
            let path = &self.paths[i];
            dot2(path.front(), m).min(dot2(path.back(), m))
        });
        let mut sorted_pos = vec![usize::MAX; self.paths.len()];
        for (pos, &i) in polylines.iter().enumerate() {
            sorted_pos[i] = pos;
        }

        // A bucket grid over the endpoints, to find adjacent lines quickly.
        let mut grid: SparsePointGrid<usize> = SparsePointGrid::new(Self::GRID_SIZE);
        for &i in &polylines {
            grid.insert(self.paths[i].front(), i);
            grid.insert(self.paths[i].back(), i);
        }

        // Create sequences of line segments that get printed together in a
        // monotonic direction. Strings of incident polylines print in
        // sequence, starting from the endpoint earliest in the monotonic
        // direction. A line overlapping another line in the perpendicular
        // direction within max_adjacent_distance must print in monotonic
        // order: the earlier line is connected to the later one, and the
        // later one stops being a starting point unless several lines lead
        // to it.
        let perpendicular = perp(m);

        let mut connected: HashSet<usize> = HashSet::new(); // Reachable through some connection.
        let mut starting: HashSet<usize> = HashSet::new(); // Heads of sequences.
        let mut connections: HashMap<usize, usize> = HashMap::new();

        for pos in 0..polylines.len() {
            let pi = polylines[pos];
            if connections.contains_key(&pi) {
                continue; // Already connected through a polyline string.
            }
            let polystring = self.find_polyline_string(pi, &grid);

            if polystring.len() > 1 {
                starting.insert(polystring[0]);
                for i in 0..polystring.len() - 1 {
                    connections.insert(polystring[i], polystring[i + 1]);
                    connected.insert(polystring[i + 1]);

                    // A string may interweave with other strings or loose
                    // lines, so order against those still has to be
                    // guaranteed: every line a string member touches becomes
                    // a possible starting point, and so does the next member
                    // of the string, which then acts as a junction.
                    let overlapping =
                        self.get_overlapping_lines(sorted_pos[polystring[i]], perpendicular, &polylines);
                    for overlapping_line in overlapping {
                        if !polystring.contains(&overlapping_line) {
                            starting.insert(overlapping_line);
                            starting.insert(polystring[i + 1]);
                        }
                    }
                }
            } else {
                // Not a string of polylines, but simply adjacent line segments.
                if !connected.contains(&pi) {
                    starting.insert(pi); // Nothing connects to this line yet.
                }
                let overlapping = self.get_overlapping_lines(pos, perpendicular, &polylines);
                if overlapping.len() == 1 {
                    let other = overlapping[0];
                    connections.insert(pi, other);
                    if connected.contains(&other) {
                        // Multiple lines lead to it, so it must be a possible start.
                        starting.insert(other);
                    } else {
                        connected.insert(other);
                    }
                } else {
                    // Zero or multiple overlapping lines; with multiple,
                    // every one of them needs to be a possible start.
                    for overlapping_line in overlapping {
                        starting.insert(overlapping_line);
                    }
                }
            }
        }

        // Order the sequence heads monotonically; that is the order in which
        // to print each sequence. Ties on the near endpoint are broken by the
        // far endpoint, which matters when multiple endpoints share a
        // position.
        let mut starting_monotonic: Vec<usize> = polylines
            .iter()
            .copied()
            .filter(|i| starting.contains(i))
            .collect();
        starting_monotonic.sort_by_key(|&i| {
            let path = &self.paths[i];
            let front = dot2(path.front(), m);
            let back = dot2(path.back(), m);
            (front.min(back), front.max(back))
        });

        // Emit each sequence, walking its connections.
        let mut current_pos = self.start_point;
        let mut emitted: HashSet<usize> = HashSet::new();
        for &start_line in &starting_monotonic {
            if emitted.contains(&start_line) {
                continue;
            }
            let mut line = start_line;
            self.optimize_closest_start_point(line, &mut current_pos);
            reordered.push(self.paths[line]);
            emitted.insert(line);

            let mut checked: HashSet<usize> = HashSet::new();
            while let Some(&next) = connections.get(&line) {
                if starting.contains(&next) {
                    break; // Next is the head of its own sequence.
                }
                if emitted.contains(&next) {
                    break; // Already printed through another sequence.
                }
                if checked.contains(&line) {
                    break; // Connections can be cyclic.
                }
                checked.insert(line);
                line = next;
                self.optimize_closest_start_point(line, &mut current_pos);
                reordered.push(self.paths[line]);
                emitted.insert(line);
            }
        }

        // Anything neither a sequence head nor reachable from one (possible
        // with cyclic or doubly-targeted connections) still has to print.
        for &pi in &polylines {
            if !emitted.contains(&pi) {
                self.optimize_closest_start_point(pi, &mut current_pos);
                reordered.push(self.paths[pi]);
                emitted.insert(pi);
            }
        }

        self.paths = reordered;
    }

    /// Reclassify polylines that are loops in disguise as closed paths.
    fn detect_loops(&mut self) {
        for path in &mut self.paths {
            if path.is_closed || path.vertices.len() < 3 {
                continue;
            }
            if path.vertices[0].coincides_with(
                &path.vertices[path.vertices.len() - 1],
                Self::COINCIDENT_POINT_DISTANCE,
            ) {
                path.is_closed = true;
                path.start_vertex = Some(0);
            }
        }
    }

    /// Configure a path to start printing from its best endpoint.
    ///
    /// If the path already has a start vertex (set by the string builder),
    /// only `current_pos` is advanced.
    fn optimize_closest_start_point(&mut self, idx: usize, current_pos: &mut Point) {
        let path = &mut self.paths[idx];
        let n = path.vertices.len();
        if path.start_vertex.is_none() {
            let dist_start = vsize2(*current_pos - path.vertices[0]);
            let dist_end = vsize2(*current_pos - path.vertices[n - 1]);
            if dist_start < dist_end {
                path.start_vertex = Some(0);
                path.backwards = false;
            } else {
                path.start_vertex = Some(n - 1);
                path.backwards = true;
            }
        }
        *current_pos = path.vertices[n - 1 - path.start_vertex.unwrap_or(0)];
    }

    /// Find the string of polylines that `pi` is part of: the maximal run of
    /// polylines whose endpoints coincide, in print order.
    ///
    /// All members of a string longer than one get their start vertex
    /// assigned. A string of one resets its start vertex to unassigned.
    fn find_polyline_string(&mut self, pi: usize, grid: &SparsePointGrid<usize>) -> Vec<usize> {
        let mut result: VecDeque<usize> = VecDeque::new();
        if self.paths[pi].vertices.is_empty() {
            return Vec::new();
        }

        result.push_back(pi);
        self.paths[pi].start_vertex = Some(0);
        self.paths[pi].backwards = false;
        let mut first_endpoint = self.paths[pi].front();
        let mut last_endpoint = self.paths[pi].back();

        // Grow the string backwards from the first endpoint.
        while let Some((found, found_point)) = self.find_connectable(first_endpoint, grid) {
            result.push_front(found);
            let farthest = self.farthest_endpoint(found, found_point);
            let path = &mut self.paths[found];
            // This line prints before the string, ending where it touches:
            // it starts at its far endpoint.
            path.start_vertex = Some(farthest);
            path.backwards = farthest != 0;
            first_endpoint = path.vertices[farthest];
        }

        // Grow the string forwards from the last endpoint.
        while let Some((found, found_point)) = self.find_connectable(last_endpoint, grid) {
            result.push_back(found);
            let farthest = self.farthest_endpoint(found, found_point);
            let path = &mut self.paths[found];
            let n = path.vertices.len();
            // This line prints after the string, starting where it touches:
            // it starts at its near endpoint and ends at the far one.
            path.start_vertex = Some(if farthest == 0 { n - 1 } else { 0 });
            path.backwards = farthest == 0;
            last_endpoint = path.vertices[farthest];
        }

        // Print from whichever end is monotonically earliest. If that is the
        // last endpoint, flip the whole string.
        let first_projection = dot2(first_endpoint, self.monotonic_vector);
        let last_projection = dot2(last_endpoint, self.monotonic_vector);
        let mut result: Vec<usize> = result.into();
        if last_projection < first_projection {
            result.reverse();
            for &idx in &result {
                let path = &mut self.paths[idx];
                let n = path.vertices.len();
                path.start_vertex = match path.start_vertex {
                    Some(0) => Some(n - 1),
                    _ => Some(0),
                };
                path.backwards = !path.backwards;
            }
        }

        if result.len() == 1 {
            // Not a string after all; the start vertex is unknown again.
            self.paths[result[0]].start_vertex = None;
        }
        result
    }

    /// Look up a polyline with an endpoint coincident to `endpoint` that is
    /// not part of any string yet. Returns the path index and the endpoint
    /// that was found to be nearby.
    fn find_connectable(
        &self,
        endpoint: Point,
        grid: &SparsePointGrid<usize>,
    ) -> Option<(usize, Point)> {
        let tolerance = Self::COINCIDENT_POINT_DISTANCE;
        grid.get_nearby(endpoint, tolerance)
            .into_iter()
            .find(|elem| {
                self.paths[elem.val].start_vertex.is_none()
                    && vsize2(elem.point - endpoint) < (tolerance as i128) * (tolerance as i128)
            })
            .map(|elem| (elem.val, elem.point))
    }

    /// The endpoint of a polyline farthest from `point`, as a vertex index.
    fn farthest_endpoint(&self, idx: usize, point: Point) -> usize {
        let path = &self.paths[idx];
        let front_dist = vsize2(path.front() - point);
        let back_dist = vsize2(path.back() - point);
        if front_dist < back_dist {
            path.vertices.len() - 1
        } else {
            0
        }
    }

    /// Find which lines overlap the line at `pos` in the sorted order.
    ///
    /// Only lines after `pos` are considered; since the list is sorted by
    /// projection, the search stops at the first candidate whose projected
    /// range cannot reach ours anymore.
    fn get_overlapping_lines(
        &self,
        pos: usize,
        perpendicular: Point,
        polylines: &[usize],
    ) -> Vec<usize> {
        let m = self.monotonic_vector;
        let path = &self.paths[polylines[pos]];
        let max_adjacent_projected_distance =
            self.max_adjacent_distance as i128 * Self::MONOTONIC_VECTOR_RESOLUTION as i128;

        // How far this line extends in the monotonic direction, padded by the
        // adjacency distance.
        let start_monotonic = dot2(path.front(), m);
        let end_monotonic = dot2(path.back(), m);
        let my_farthest_monotonic = start_monotonic.max(end_monotonic);
        let my_closest_monotonic = start_monotonic.min(end_monotonic);
        let my_farthest_monotonic_padded = my_farthest_monotonic + max_adjacent_projected_distance;
        let my_closest_monotonic_padded = my_closest_monotonic - max_adjacent_projected_distance;

        // How far this line reaches in the perpendicular direction -- the
        // range at which it overlaps other lines.
        let my_start = dot2(path.front(), perpendicular);
        let my_end = dot2(path.back(), perpendicular);
        let my_farthest = my_start.max(my_end);
        let my_closest = my_start.min(my_end);
        let my_farthest_padded = my_farthest + max_adjacent_projected_distance;
        let my_closest_padded = my_closest - max_adjacent_projected_distance;

        let mut overlapping_lines = Vec::new();
        for &candidate in &polylines[pos + 1..] {
            let other = &self.paths[candidate];

            // Don't go beyond the maximum adjacent distance.
            let start_their_projection = dot2(other.front(), m);
            let end_their_projection = dot2(other.back(), m);
            let their_farthest_projection = start_their_projection.max(end_their_projection);
            let their_closest_projection = start_their_projection.min(end_their_projection);
            if their_closest_projection > my_farthest_monotonic_padded
                || my_closest_monotonic_padded > their_farthest_projection
            {
                // Too far; this line and all later ones are not adjacent
                // anymore, even though they might be side by side.
                break;
            }

            // Does this one overlap in the perpendicular direction? Either
            // one of our padded extremes falls within their range, or their
            // whole range falls within our padded range.
            let their_start = dot2(other.front(), perpendicular);
            let their_end = dot2(other.back(), perpendicular);
            let their_farthest = their_start.max(their_end);
            let their_closest = their_start.min(their_end);
            if (my_closest_padded >= their_closest && my_closest_padded <= their_farthest)
                || (my_farthest_padded >= their_closest && my_farthest_padded <= their_farthest)
                || (their_closest >= my_closest_padded && their_farthest <= my_farthest_padded)
            {
                overlapping_lines.push(candidate);
            }
        }

        overlapping_lines
    }
}

fn check_coordinates(points: &[Point]) -> Result<()> {
    for p in points {
        if p.x.abs() > MAX_PLANNING_COORD {
            return Err(Error::CoordinateOutOfRange(p.x));
        }
        if p.y.abs() > MAX_PLANNING_COORD {
            return Err(Error::CoordinateOutOfRange(p.y));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as TestMap;
    use std::f64::consts::FRAC_PI_2;

    fn line(a: (Coord, Coord), b: (Coord, Coord)) -> Polyline {
        Polyline::from_points(vec![Point::new(a.0, a.1), Point::new(b.0, b.1)])
    }

    /// The multiset of vertex slices in the output must equal the input's.
    fn assert_permutation(orderer: &PathOrderMonotonic, inputs: &[&[Point]]) {
        assert_eq!(orderer.paths.len(), inputs.len());
        let mut expected: TestMap<&[Point], usize> = TestMap::new();
        for input in inputs {
            *expected.entry(*input).or_default() += 1;
        }
        let mut got: TestMap<&[Point], usize> = TestMap::new();
        for path in &orderer.paths {
            *got.entry(path.vertices).or_default() += 1;
        }
        assert_eq!(expected, got);
    }

    #[test]
    fn test_empty_input() {
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.optimize();
        assert!(orderer.paths.is_empty());
    }

    #[test]
    fn test_two_parallel_lines() {
        // Two horizontal lines 500 apart, ordered along the vertical axis.
        let a = line((0, 0), (10_000, 0));
        let b = line((0, 500), (10_000, 500));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&a).unwrap();
        orderer.add_polyline(&b).unwrap();
        orderer.optimize();

        assert_eq!(orderer.paths.len(), 2);
        // A prints first (lower projection), starting from its end nearest
        // the toolhead.
        assert_eq!(orderer.paths[0].vertices, a.points());
        assert_eq!(orderer.paths[0].start_vertex, Some(0));
        assert!(!orderer.paths[0].backwards);
        // B starts from the endpoint closest to where A finished: (10000, 0).
        assert_eq!(orderer.paths[1].vertices, b.points());
        assert_eq!(orderer.paths[1].start_vertex, Some(1));
        assert!(orderer.paths[1].backwards);
    }

    #[test]
    fn test_polyline_string() {
        // Three polylines whose endpoints coincide chain into one string.
        let p1 = line((0, 0), (100, 0));
        let p2 = line((100, 0), (200, 0));
        let p3 = line((200, 0), (300, 0));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&p1).unwrap();
        orderer.add_polyline(&p2).unwrap();
        orderer.add_polyline(&p3).unwrap();
        orderer.optimize();

        assert_eq!(orderer.paths.len(), 3);
        assert_eq!(orderer.paths[0].vertices, p1.points());
        assert_eq!(orderer.paths[1].vertices, p2.points());
        assert_eq!(orderer.paths[2].vertices, p3.points());
        for path in &orderer.paths {
            assert_eq!(path.start_vertex, Some(0));
            assert!(!path.backwards);
        }
    }

    #[test]
    fn test_polyline_string_reversed_direction() {
        // The same string, but the monotonic direction now favors starting
        // from the other end: the string must flip as a whole.
        let p1 = line((0, 0), (100, 0));
        let p2 = line((100, 0), (200, 0));
        let mut orderer = PathOrderMonotonic::new(0.0, 500, Point::zero());
        // Direction angle 0 gives monotonic vector (-1000, 0): projections
        // decrease with x, so the string starts from the high-x end.
        orderer.add_polyline(&p1).unwrap();
        orderer.add_polyline(&p2).unwrap();
        orderer.optimize();

        assert_eq!(orderer.paths[0].vertices, p2.points());
        assert_eq!(orderer.paths[0].start_vertex, Some(1));
        assert!(orderer.paths[0].backwards);
        assert_eq!(orderer.paths[1].vertices, p1.points());
        assert_eq!(orderer.paths[1].start_vertex, Some(1));
        assert!(orderer.paths[1].backwards);
    }

    #[test]
    fn test_closed_paths_first() {
        let q = Polygon::rectangle(Point::new(0, 0), Point::new(1_000, 1_000));
        let p = line((2_000, 0), (3_000, 0));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&p).unwrap();
        orderer.add_polygon(&q).unwrap();
        orderer.optimize();

        assert_eq!(orderer.paths.len(), 2);
        assert!(orderer.paths[0].is_closed);
        assert_eq!(orderer.paths[0].vertices, q.points());
        assert!(!orderer.paths[1].is_closed);
    }

    #[test]
    fn test_loop_detection() {
        // An open polyline whose ends coincide is printed as a loop, first.
        let looped = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(1_000, 0),
            Point::new(1_000, 1_000),
            Point::new(0, 3),
        ]);
        let open = line((5_000, 0), (6_000, 0));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&open).unwrap();
        orderer.add_polyline(&looped).unwrap();
        orderer.optimize();

        assert!(orderer.paths[0].is_closed);
        assert_eq!(orderer.paths[0].vertices, looped.points());
        assert!(!orderer.paths[1].is_closed);
    }

    #[test]
    fn test_single_vertex_treated_as_closed() {
        let dot = Polyline::from_points(vec![Point::new(500, 500)]);
        let open = line((2_000, 0), (3_000, 0));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&open).unwrap();
        orderer.add_polyline(&dot).unwrap();
        orderer.optimize();

        assert_eq!(orderer.paths.len(), 2);
        // The single vertex is emitted with the closed group, before the line.
        assert_eq!(orderer.paths[0].vertices, dot.points());
    }

    #[test]
    fn test_monotone_emission_order() {
        // Five parallel lines added in scrambled order come out sorted by
        // projection on the monotonic axis.
        let lines: Vec<Polyline> = [3_000, 0, 4_000, 1_000, 2_000]
            .iter()
            .map(|&y| line((0, y), (10_000, y)))
            .collect();
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 1_100, Point::zero());
        for l in &lines {
            orderer.add_polyline(l).unwrap();
        }
        orderer.optimize();

        let ys: Vec<Coord> = orderer.paths.iter().map(|p| p.vertices[0].y).collect();
        let mut sorted = ys.clone();
        sorted.sort();
        assert_eq!(ys, sorted);
        let inputs: Vec<&[Point]> = lines.iter().map(|l| l.points()).collect();
        assert_permutation(&orderer, &inputs);
    }

    #[test]
    fn test_far_lines_not_constrained() {
        // Lines farther apart than max_adjacent_distance form separate
        // sequences, each started from its own projection position.
        let a = line((0, 0), (10_000, 0));
        let b = line((0, 50_000), (10_000, 50_000));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&a).unwrap();
        orderer.add_polyline(&b).unwrap();
        orderer.optimize();

        assert_eq!(orderer.paths[0].vertices, a.points());
        assert_eq!(orderer.paths[1].vertices, b.points());
        assert_permutation(&orderer, &[a.points(), b.points()]);
    }

    #[test]
    fn test_junction_creates_restart_points() {
        // One long line overlapping two short ones: both short lines become
        // sequence heads and every path is emitted exactly once.
        let long = line((0, 0), (20_000, 0));
        let short_a = line((0, 400), (8_000, 400));
        let short_b = line((12_000, 400), (20_000, 400));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        orderer.add_polyline(&long).unwrap();
        orderer.add_polyline(&short_a).unwrap();
        orderer.add_polyline(&short_b).unwrap();
        orderer.optimize();

        assert_permutation(
            &orderer,
            &[long.points(), short_a.points(), short_b.points()],
        );
        // The long line projects lowest and prints first.
        assert_eq!(orderer.paths[0].vertices, long.points());
    }

    #[test]
    fn test_start_vertex_validity() {
        // Every emitted open path has an endpoint start vertex, and
        // backwards holds exactly for the far end.
        let lines: Vec<Polyline> = (0..6).map(|i| line((0, i * 450), (10_000, i * 450))).collect();
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::new(3_000, 0));
        for l in &lines {
            orderer.add_polyline(l).unwrap();
        }
        orderer.optimize();

        for path in &orderer.paths {
            let n = path.vertices.len();
            let start = path.start_vertex.expect("emitted path must have a start");
            assert!(start == 0 || start == n - 1);
            assert_eq!(path.backwards, start == n - 1);
        }
    }

    #[test]
    fn test_diagonal_direction() {
        // Ordering along a 45 degree axis: projections follow y - x up to
        // vector orientation, so the line with the smallest projection on
        // (-cos, sin) prints first.
        let a = line((0, 0), (10_000, 0));
        let b = line((400, 400), (10_400, 400));
        let mut orderer =
            PathOrderMonotonic::new(std::f64::consts::FRAC_PI_4, 800, Point::zero());
        orderer.add_polyline(&a).unwrap();
        orderer.add_polyline(&b).unwrap();
        orderer.optimize();

        assert_permutation(&orderer, &[a.points(), b.points()]);
        let m = Point::new(
            (-(std::f64::consts::FRAC_PI_4).cos() * 1000.0).round() as Coord,
            ((std::f64::consts::FRAC_PI_4).sin() * 1000.0).round() as Coord,
        );
        let proj_first = dot2(orderer.paths[0].vertices[0], m)
            .min(dot2(orderer.paths[0].vertices[1], m));
        let proj_second = dot2(orderer.paths[1].vertices[0], m)
            .min(dot2(orderer.paths[1].vertices[1], m));
        assert!(proj_first <= proj_second);
    }

    #[test]
    fn test_all_paths_emitted_with_dense_overlaps() {
        // A grid of many mutually overlapping lines stresses the
        // starting-line bookkeeping; the output must stay a permutation.
        let mut lines = Vec::new();
        for i in 0..10 {
            lines.push(line((0, i * 300), (10_000, i * 300)));
        }
        // A string crossing through the field.
        lines.push(line((10_000, 0), (10_100, 2_700)));
        let mut orderer = PathOrderMonotonic::new(FRAC_PI_2, 500, Point::zero());
        for l in &lines {
            orderer.add_polyline(l).unwrap();
        }
        orderer.optimize();

        let inputs: Vec<&[Point]> = lines.iter().map(|l| l.points()).collect();
        assert_permutation(&orderer, &inputs);
    }
}
