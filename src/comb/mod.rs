//! Combing: collision-avoiding travel planning.
//!
//! A travel move between two extrusions should not drag the nozzle across
//! printed walls. A [`Comb`] plans such moves for one layer: it keeps travels
//! inside part boundaries where it can, and when a travel has to go through
//! air it routes the move around the other printed parts, crossing part
//! boundaries roughly perpendicular and only where it has to.
//!
//! Typical output for a travel between two parts: a comb path to the
//! boundary of the starting part, a move through air that avoids the other
//! parts on the layer, and a comb path from the boundary of the ending part
//! to the destination. When no acceptable route exists, [`Comb::calc`]
//! reports failure and the caller is expected to retract and travel
//! straight instead.

mod crossings;

pub use crossings::{CombPath, LinePolygonsCrossings};

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use log::debug;

use crate::clipper::{offset_shape, union_all, OffsetJoinType};
use crate::geometry::{vsize2, Line, PartsView, Point, Shape};
use crate::grid::LocToLineGrid;
use crate::Coord;

/// The comb paths of one travel move, in travel order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombPaths {
    /// The sub-paths; concatenated they lead from just after the travel's
    /// start point to its destination.
    pub paths: Vec<CombPath>,
    /// Whether the travel leaves the part boundaries and moves through air.
    pub through_air: bool,
}

impl Deref for CombPaths {
    type Target = Vec<CombPath>;

    fn deref(&self) -> &Self::Target {
        &self.paths
    }
}

impl DerefMut for CombPaths {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.paths
    }
}

/// Per-extruder travel settings the comber consults.
#[derive(Debug, Clone)]
pub struct ExtruderTrain {
    /// Index of this extruder.
    pub extruder_nr: usize,
    /// Whether travels through air should detour around other printed parts.
    pub travel_avoid_other_parts: bool,
    /// Distance by which to stay away from other parts when avoiding them.
    pub travel_avoid_distance: Coord,
}

/// The printed outlines of one layer.
#[derive(Debug, Clone, Default)]
pub struct LayerOutlines {
    /// Outline shapes of everything printed on this layer, one per part.
    pub parts: Vec<Shape>,
}

/// Per-layer outline data the comber reads its surroundings from.
#[derive(Debug, Clone, Default)]
pub struct SliceDataStorage {
    /// Outlines per layer, bottom up.
    pub layers: Vec<LayerOutlines>,
}

impl SliceDataStorage {
    /// The aggregate outline of everything printed on a layer.
    pub fn layer_outlines(&self, layer_nr: usize) -> Shape {
        self.layers
            .get(layer_nr)
            .map(|layer| union_all(&layer.parts))
            .unwrap_or_default()
    }
}

/// A crossing from the inside of a part to the outside safety band, at one
/// end of a combing move.
#[derive(Debug, Clone)]
struct Crossing {
    /// The travel endpoint this crossing belongs to.
    dest_point: Point,
    /// The part of the inside boundary the endpoint is in. `None` when the
    /// endpoint is outside all parts, in which case there is nothing to
    /// cross on this side.
    dest_part: Option<usize>,
    /// The boundary polygon that will be crossed, when inside.
    dest_crossing_poly: Option<usize>,
    /// The point on the inside boundary to leave the part at, or the
    /// endpoint itself when it is not inside any part.
    in_or_mid: Point,
    /// The corresponding point on the outside boundary.
    out: Point,
}

impl Crossing {
    fn new(dest_point: Point, dest_part: Option<usize>) -> Self {
        Self {
            dest_point,
            dest_part,
            dest_crossing_poly: None,
            in_or_mid: dest_point,
            out: dest_point,
        }
    }

    fn is_inside(&self) -> bool {
        self.dest_part.is_some()
    }
}

/// Plans combing travel moves for one layer.
///
/// Construction takes the two inside comb boundaries (an optimal, well
/// inset one and a minimum, barely inset fallback). The outside boundary is
/// an outward offset of everything printed on the layer; it is only built
/// when a travel actually needs to go through air, and cached per extruder.
pub struct Comb<'a> {
    storage: &'a SliceDataStorage,
    layer_nr: usize,

    travel_avoid_distance: Coord,
    /// Offset from an inside boundary to the outside boundary: the width of
    /// the band a crossing has to jump.
    offset_from_inside_to_outside: Coord,
    /// Maximal squared distance of a point to the inside boundary that still
    /// counts as inside.
    max_move_inside_distance2: i128,
    /// Maximal squared distance by which to cross the band between the
    /// inside and the outside boundary.
    max_crossing_dist2: i128,
    move_inside_distance: Coord,

    boundary_inside_minimum: Shape,
    boundary_inside_optimal: Shape,
    parts_view_inside_minimum: PartsView,
    parts_view_inside_optimal: PartsView,
    inside_loc_to_line_minimum: LocToLineGrid,
    inside_loc_to_line_optimal: LocToLineGrid,

    // Built on first through-air travel, cached per extruder.
    boundary_outside: HashMap<usize, Shape>,
    model_boundary: HashMap<usize, Shape>,
    model_parts_view: HashMap<usize, PartsView>,
}

impl<'a> Comb<'a> {
    /// Distance to keep off a boundary polygon, to prevent on-boundary
    /// versus crossing-boundary confusion.
    const OFF_BOUNDARY_DISTANCE: Coord = 40;

    /// Extra tolerance when retrying a failed move-inside against the
    /// minimum boundary.
    const MOVE_INSIDE_ENLARGE_DISTANCE: Coord = 250;

    /// Distance to move the two ends of a direct in-between jump toward each
    /// other, as extra margin against the boundaries.
    const OFFSET_EXTRA_START_END: Coord = 100;

    /// Cell size of the boundary segment grids (2 mm).
    const GRID_SIZE: Coord = 2_000;

    /// Set up combing for one layer.
    ///
    /// `boundary_inside_optimal` is the preferred containment region (inset
    /// about half a nozzle width inward from the innermost wall);
    /// `boundary_inside_minimum` is a less inset fallback. Travels whose
    /// endpoints only reach the minimum boundary are routed in the band
    /// between the two and then pulled inward by `move_inside_distance`.
    pub fn new(
        storage: &'a SliceDataStorage,
        layer_nr: usize,
        boundary_inside_minimum: Shape,
        boundary_inside_optimal: Shape,
        offset_from_outlines: Coord,
        travel_avoid_distance: Coord,
        move_inside_distance: Coord,
    ) -> Self {
        let parts_view_inside_minimum = boundary_inside_minimum.parts_view();
        let parts_view_inside_optimal = boundary_inside_optimal.parts_view();
        let inside_loc_to_line_minimum = LocToLineGrid::new(&boundary_inside_minimum, Self::GRID_SIZE);
        let inside_loc_to_line_optimal = LocToLineGrid::new(&boundary_inside_optimal, Self::GRID_SIZE);
        let offset_from_inside_to_outside = offset_from_outlines + travel_avoid_distance;
        Self {
            storage,
            layer_nr,
            travel_avoid_distance,
            offset_from_inside_to_outside,
            max_move_inside_distance2: 2 * offset_from_outlines as i128 * offset_from_outlines as i128,
            max_crossing_dist2: 2 * offset_from_inside_to_outside as i128
                * offset_from_inside_to_outside as i128,
            move_inside_distance,
            boundary_inside_minimum,
            boundary_inside_optimal,
            parts_view_inside_minimum,
            parts_view_inside_optimal,
            inside_loc_to_line_minimum,
            inside_loc_to_line_optimal,
            boundary_outside: HashMap::new(),
            model_boundary: HashMap::new(),
            model_parts_view: HashMap::new(),
        }
    }

    /// Plan the comb paths for one travel move.
    ///
    /// On success, `comb_paths` holds the travel's sub-paths and the result
    /// is `true`. On failure the caller should retract and travel straight.
    /// `unretract_before_last_travel_move` is set when combing changed the
    /// actual travel destination, meaning an outer wall is involved and the
    /// writer should unretract before the final approach.
    #[allow(clippy::too_many_arguments)]
    pub fn calc(
        &mut self,
        perform_z_hops: bool,
        perform_z_hops_only_when_collides: bool,
        train: &ExtruderTrain,
        start_point: Point,
        end_point: Point,
        comb_paths: &mut CombPaths,
        start_inside: bool,
        end_inside: bool,
        max_comb_distance_ignored: Coord,
        unretract_before_last_travel_move: &mut bool,
    ) -> bool {
        let ignored2 = max_comb_distance_ignored as i128 * max_comb_distance_ignored as i128;
        if vsize2(end_point - start_point) < ignored2 {
            return true; // Close enough; the caller travels straight.
        }

        let fail_on_unavoidable_obstacles = perform_z_hops && perform_z_hops_only_when_collides;

        // Classify the two endpoints, moving them into the boundary they
        // belong to. Optimal first; when that fails, retry against the
        // minimum boundary with enlarged tolerance.
        let mut start = start_point;
        let mut end = end_point;
        let start_part_optimal = start_inside
            .then(|| self.move_inside_optimal(&mut start))
            .flatten();
        let end_part_optimal = end_inside
            .then(|| self.move_inside_optimal(&mut end))
            .flatten();
        let start_part_minimum = start_inside
            .then(|| self.move_inside_minimum(&mut start, start_part_optimal.is_some()))
            .flatten();
        let end_part_minimum = end_inside
            .then(|| self.move_inside_minimum(&mut end, end_part_optimal.is_some()))
            .flatten();

        // Both endpoints inside the same part: a single comb path along the
        // inside of that part does it.
        if let (Some(start_part), Some(end_part)) = (start_part_optimal, end_part_optimal) {
            if start_part == end_part {
                let part = self
                    .boundary_inside_optimal
                    .assemble_part(&self.parts_view_inside_optimal, start_part);
                if let Some(path) = LinePolygonsCrossings::comb(
                    &part,
                    start,
                    end,
                    -Self::OFF_BOUNDARY_DISTANCE,
                    max_comb_distance_ignored,
                    fail_on_unavoidable_obstacles,
                ) {
                    comb_paths.push(path);
                    *unretract_before_last_travel_move = end != end_point;
                    return true;
                }
            }
        }

        // Same part of the minimum boundary: comb there, then pull the path
        // points toward the optimal boundary.
        if let (Some(start_part), Some(end_part)) = (start_part_minimum, end_part_minimum) {
            if start_part == end_part {
                let part = self
                    .boundary_inside_minimum
                    .assemble_part(&self.parts_view_inside_minimum, start_part);
                if let Some(mut path) = LinePolygonsCrossings::comb(
                    &part,
                    start,
                    end,
                    -Self::OFF_BOUNDARY_DISTANCE,
                    max_comb_distance_ignored,
                    fail_on_unavoidable_obstacles,
                ) {
                    self.move_comb_path_inside(&mut path.points, end);
                    comb_paths.push(path);
                    *unretract_before_last_travel_move = end != end_point;
                    return true;
                }
            }
        }

        // The endpoints are in different parts, or outside all parts; the
        // travel goes through air.
        comb_paths.through_air = true;
        self.ensure_outside_boundaries(train);

        let start_is_inside = start_part_minimum.is_some();
        let end_is_inside = end_part_minimum.is_some();

        if !start_is_inside && !end_is_inside {
            return self.calc_through_air_only(
                perform_z_hops,
                perform_z_hops_only_when_collides,
                train,
                start,
                end,
                comb_paths,
                max_comb_distance_ignored,
            );
        }

        let mut start_crossing = Crossing::new(start, start_part_minimum);
        let mut end_crossing = Crossing::new(end, end_part_minimum);
        self.find_crossing_in_or_mid(&mut start_crossing, end);
        self.find_crossing_in_or_mid(&mut end_crossing, start);

        // When the two boundary points are close together, skip the outside
        // detour and jump the band directly.
        let band = self.offset_from_inside_to_outside as i128;
        let skip_avoid_other_parts_path =
            vsize2(start_crossing.in_or_mid - end_crossing.in_or_mid) < 4 * band * band;

        if !skip_avoid_other_parts_path && train.travel_avoid_other_parts {
            if !self.find_outside(train, &mut start_crossing, end, fail_on_unavoidable_obstacles) {
                debug!("combing failed: no acceptable outside crossing near the start");
                return false;
            }
            if !self.find_outside(train, &mut end_crossing, start, fail_on_unavoidable_obstacles) {
                debug!("combing failed: no acceptable outside crossing near the end");
                return false;
            }
            // The jump across the band between the boundaries must stay short.
            if start_crossing.is_inside()
                && vsize2(start_crossing.in_or_mid - start_crossing.out) > self.max_crossing_dist2
            {
                return false;
            }
            if end_crossing.is_inside()
                && vsize2(end_crossing.in_or_mid - end_crossing.out) > self.max_crossing_dist2
            {
                return false;
            }
        }

        // Comb inside the starting part up to the crossing.
        if let Some(start_part) = start_crossing.dest_part {
            let part = self
                .boundary_inside_minimum
                .assemble_part(&self.parts_view_inside_minimum, start_part);
            match LinePolygonsCrossings::comb(
                &part,
                start,
                start_crossing.in_or_mid,
                -Self::OFF_BOUNDARY_DISTANCE,
                max_comb_distance_ignored,
                fail_on_unavoidable_obstacles,
            ) {
                Some(path) => comb_paths.push(path),
                None => return false,
            }
        }

        // The through-air stretch.
        let mut air = CombPath {
            through_air: true,
            ..CombPath::default()
        };
        if skip_avoid_other_parts_path || !train.travel_avoid_other_parts {
            // Jump straight between the two boundary points, pulled toward
            // each other for extra margin against the boundaries.
            let (jump_start, jump_end) =
                shortened_jump(start_crossing.in_or_mid, end_crossing.in_or_mid, Self::OFFSET_EXTRA_START_END);
            air.points.push(jump_start);
            air.points.push(jump_end);
        } else {
            air.points.push(start_crossing.out);
            let outside = &self.boundary_outside[&train.extruder_nr];
            match LinePolygonsCrossings::comb(
                outside,
                start_crossing.out,
                end_crossing.out,
                Self::OFF_BOUNDARY_DISTANCE,
                max_comb_distance_ignored,
                fail_on_unavoidable_obstacles,
            ) {
                Some(path) => {
                    air.cross_boundary = path.cross_boundary;
                    air.points.extend(path.points);
                }
                None => return false,
            }
            if end_crossing.is_inside() {
                air.points.push(end_crossing.in_or_mid);
            }
        }
        comb_paths.push(air);

        // Comb inside the ending part from the crossing to the destination.
        if let Some(end_part) = end_crossing.dest_part {
            let part = self
                .boundary_inside_minimum
                .assemble_part(&self.parts_view_inside_minimum, end_part);
            match LinePolygonsCrossings::comb(
                &part,
                end_crossing.in_or_mid,
                end,
                -Self::OFF_BOUNDARY_DISTANCE,
                max_comb_distance_ignored,
                fail_on_unavoidable_obstacles,
            ) {
                Some(path) => comb_paths.push(path),
                None => return false,
            }
        }

        *unretract_before_last_travel_move = end != end_point;
        true
    }

    /// Travel with both endpoints outside all parts.
    #[allow(clippy::too_many_arguments)]
    fn calc_through_air_only(
        &mut self,
        perform_z_hops: bool,
        perform_z_hops_only_when_collides: bool,
        train: &ExtruderTrain,
        start: Point,
        end: Point,
        comb_paths: &mut CombPaths,
        max_comb_distance_ignored: Coord,
    ) -> bool {
        if perform_z_hops && !perform_z_hops_only_when_collides {
            return false; // The caller hops over everything anyway.
        }
        let collides = self.model_boundary[&train.extruder_nr].collides_with_segment(start, end);
        if !collides {
            comb_paths.push(CombPath {
                points: vec![end],
                through_air: true,
                cross_boundary: false,
            });
            return true;
        }
        if perform_z_hops_only_when_collides {
            return false; // Collision found; hop instead of combing.
        }
        let outside = &self.boundary_outside[&train.extruder_nr];
        match LinePolygonsCrossings::comb(
            outside,
            start,
            end,
            Self::OFF_BOUNDARY_DISTANCE,
            max_comb_distance_ignored,
            false,
        ) {
            Some(mut path) => {
                path.through_air = true;
                comb_paths.push(path);
                true
            }
            None => false,
        }
    }

    /// Try to place `point` inside the optimal boundary; returns the part it
    /// ended up in.
    fn move_inside_optimal(&self, point: &mut Point) -> Option<usize> {
        Self::move_inside(
            &self.boundary_inside_optimal,
            &self.parts_view_inside_optimal,
            &self.inside_loc_to_line_optimal,
            point,
            self.max_move_inside_distance2,
        )
    }

    /// Try to place `point` inside the minimum boundary, with enlarged
    /// tolerance when the optimal boundary already rejected it.
    fn move_inside_minimum(&self, point: &mut Point, already_inside_optimal: bool) -> Option<usize> {
        let max_distance2 = if already_inside_optimal {
            self.max_move_inside_distance2
        } else {
            let enlarged = (self.max_move_inside_distance2 as f64).sqrt()
                + Self::MOVE_INSIDE_ENLARGE_DISTANCE as f64;
            (enlarged * enlarged) as i128
        };
        Self::move_inside(
            &self.boundary_inside_minimum,
            &self.parts_view_inside_minimum,
            &self.inside_loc_to_line_minimum,
            point,
            max_distance2,
        )
    }

    /// Place `point` inside `boundary` if it is not already, and report the
    /// part it is in.
    fn move_inside(
        boundary: &Shape,
        parts_view: &PartsView,
        loc_to_line: &LocToLineGrid,
        point: &mut Point,
        max_distance_squared: i128,
    ) -> Option<usize> {
        if boundary.is_empty() {
            return None;
        }
        let search_radius = (max_distance_squared as f64).sqrt() as Coord + 1;
        let closest = loc_to_line
            .find_nearest(boundary, *point, search_radius)
            .or_else(|| boundary.closest_point(*point))?;
        if boundary.inside(*point) {
            return Some(parts_view.part_containing(closest.poly_idx));
        }
        if closest.distance_squared > max_distance_squared {
            return None;
        }
        let moved = boundary.nudge_inside(closest, Self::OFF_BOUNDARY_DISTANCE)?;
        *point = moved;
        Some(parts_view.part_containing(closest.poly_idx))
    }

    /// Pull the interior points of a minimum-boundary comb path toward the
    /// optimal boundary. The final point is left in place; it is the travel
    /// destination.
    fn move_comb_path_inside(&self, points: &mut Vec<Point>, destination: Point) {
        if self.boundary_inside_optimal.is_empty() {
            return;
        }
        let dist = self.move_inside_distance;
        let max_distance2 = 4 * dist as i128 * dist as i128;
        for point in points.iter_mut() {
            if *point == destination || self.boundary_inside_optimal.inside(*point) {
                continue;
            }
            if let Some((moved, _)) = self
                .boundary_inside_optimal
                .move_inside(*point, max_distance2, dist)
            {
                if self.boundary_inside_minimum.inside(moved) {
                    *point = moved;
                }
            }
        }
    }

    /// Find the point on the destination part's boundary to cross at: the
    /// point closest to the other end of the travel, pulled slightly inside.
    fn find_crossing_in_or_mid(&self, crossing: &mut Crossing, close_to: Point) {
        let Some(part) = crossing.dest_part else {
            return; // Outside destinations cross nothing; in_or_mid stays put.
        };
        let part_polys = self.parts_view_inside_minimum.polygons_of(part);
        if let Some(closest) = self
            .boundary_inside_minimum
            .closest_point_among(part_polys, close_to)
        {
            crossing.dest_crossing_poly = Some(closest.poly_idx);
            crossing.in_or_mid = self
                .boundary_inside_minimum
                .nudge_inside(closest, Self::OFF_BOUNDARY_DISTANCE)
                .unwrap_or(closest.point);
        }
    }

    /// Find the point on the outside boundary to cross to, preferring a
    /// short jump whose detour relative to `close_to` is small.
    ///
    /// Returns false when `fail_on_unavoidable_obstacles` is set and every
    /// acceptable crossing would pass over another part.
    fn find_outside(
        &self,
        train: &ExtruderTrain,
        crossing: &mut Crossing,
        close_to: Point,
        fail_on_unavoidable_obstacles: bool,
    ) -> bool {
        if !crossing.is_inside() {
            return true;
        }
        let outside = &self.boundary_outside[&train.extruder_nr];
        let Some(closest) = outside.closest_point(crossing.in_or_mid) else {
            // No outside boundary at all; nothing to avoid.
            crossing.out = crossing.in_or_mid;
            return true;
        };
        crossing.out = outside
            .nudge_outside(closest, Self::OFF_BOUNDARY_DISTANCE)
            .unwrap_or(closest.point);

        if self.crossing_obstructed(train, crossing.in_or_mid, crossing.out) {
            // The straight jump passes over another part; look for a better
            // crossing along the boundary polygon we are leaving through.
            if let Some((in_point, out_point)) = self.find_best_crossing(
                train,
                crossing.dest_crossing_poly,
                crossing.dest_point,
                close_to,
            ) {
                crossing.in_or_mid = in_point;
                crossing.out = out_point;
            } else if fail_on_unavoidable_obstacles {
                return false;
            }
        }
        true
    }

    /// Search the crossing polygon for the crossing with the best
    /// combination of a short jump and a small detour, skipping crossings
    /// that pass over other parts.
    fn find_best_crossing(
        &self,
        train: &ExtruderTrain,
        crossing_poly: Option<usize>,
        estimated_start: Point,
        estimated_end: Point,
    ) -> Option<(Point, Point)> {
        let poly_idx = crossing_poly?;
        let outside = &self.boundary_outside[&train.extruder_nr];
        let poly = &self.boundary_inside_minimum[poly_idx];

        let mut best: Option<(Point, Point, f64)> = None;
        for segment_idx in 0..poly.len() {
            let vertex = poly[segment_idx];
            let at = crate::geometry::ClosestPointResult {
                point: vertex,
                poly_idx,
                segment_idx,
                distance_squared: 0,
            };
            let Some(in_candidate) = self
                .boundary_inside_minimum
                .nudge_inside(at, Self::OFF_BOUNDARY_DISTANCE)
            else {
                continue;
            };
            let Some(closest_out) = outside.closest_point(in_candidate) else {
                continue;
            };
            let out_candidate = outside
                .nudge_outside(closest_out, Self::OFF_BOUNDARY_DISTANCE)
                .unwrap_or(closest_out.point);

            let crossing_dist2 = vsize2(out_candidate - in_candidate);
            if crossing_dist2 > self.max_crossing_dist2 * 2 {
                continue;
            }
            if self.crossing_obstructed(train, in_candidate, out_candidate) {
                continue;
            }
            let detour = in_candidate.distance(&estimated_start)
                + out_candidate.distance(&estimated_end);
            let score = (crossing_dist2 as f64).sqrt() + detour;
            if best.as_ref().map_or(true, |(_, _, s)| score < *s) {
                best = Some((in_candidate, out_candidate, score));
            }
        }
        best.map(|(in_point, out_point, _)| (in_point, out_point))
    }

    /// Whether the segment from `from` to `to` passes over a printed part
    /// other than the one `from` is in.
    fn crossing_obstructed(&self, train: &ExtruderTrain, from: Point, to: Point) -> bool {
        let model = &self.model_boundary[&train.extruder_nr];
        let parts = &self.model_parts_view[&train.extruder_nr];
        // The part `from` belongs to is the innermost polygon containing it;
        // outlines can be nested (a part printed inside a ring).
        let own_part = model
            .iter()
            .enumerate()
            .filter(|(_, poly)| poly.contains_point(&from))
            .min_by_key(|(_, poly)| poly.area2().abs())
            .map(|(idx, _)| parts.part_containing(idx));
        let travel = Line::new(from, to);
        model.iter().enumerate().any(|(idx, poly)| {
            Some(parts.part_containing(idx)) != own_part
                && (0..poly.len()).any(|i| travel.intersects(&poly.edge(i)))
        })
    }

    /// Build the outside and model boundaries for an extruder, if they have
    /// not been built yet.
    fn ensure_outside_boundaries(&mut self, train: &ExtruderTrain) {
        if self.boundary_outside.contains_key(&train.extruder_nr) {
            return;
        }
        let outlines = self.storage.layer_outlines(self.layer_nr);
        debug!(
            "building outside comb boundary for extruder {} on layer {} ({} polygons)",
            train.extruder_nr,
            self.layer_nr,
            outlines.len()
        );
        let avoid_distance = if train.travel_avoid_distance > 0 {
            train.travel_avoid_distance
        } else {
            self.travel_avoid_distance
        };
        let outside = offset_shape(&outlines, avoid_distance, OffsetJoinType::Miter);
        self.boundary_outside.insert(train.extruder_nr, outside);
        self.model_parts_view
            .insert(train.extruder_nr, outlines.parts_view());
        self.model_boundary.insert(train.extruder_nr, outlines);
    }
}

/// Both ends of a straight jump pulled toward each other by `margin`, capped
/// at the jump's midpoint.
fn shortened_jump(from: Point, to: Point, margin: Coord) -> (Point, Point) {
    let length2 = vsize2(to - from);
    if length2 <= 4 * margin as i128 * margin as i128 {
        let mid = Point::new((from.x + to.x) / 2, (from.y + to.y) / 2);
        return (mid, mid);
    }
    let step = (to - from).with_length(margin);
    (from + step, to - step)
}
