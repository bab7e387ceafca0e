//! Sparse spatial indexes over points and boundary segments.
//!
//! Two hash-bucketed uniform grids back the planner's proximity queries:
//! - [`SparsePointGrid`] stores arbitrary values keyed by a point and answers
//!   neighborhood queries around a location (endpoint adjacency during
//!   ordering).
//! - [`LocToLineGrid`] maps locations to the boundary segments of a
//!   [`Shape`] (nearest-wall queries during combing).
//!
//! Neither grid filters by exact distance; callers filter the returned
//! candidates by squared distance themselves.

use crate::geometry::{ClosestPointResult, Point, Shape};
use crate::Coord;
use std::collections::HashMap;

/// An entry stored in a [`SparsePointGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridElem<T> {
    /// The location this entry is keyed by.
    pub point: Point,
    /// The stored value.
    pub val: T,
}

/// A sparse uniform grid storing values keyed by 2D points.
///
/// Any two stored entries within `cell_size` of each other are guaranteed to
/// find one another through [`SparsePointGrid::get_nearby`].
#[derive(Debug, Clone)]
pub struct SparsePointGrid<T> {
    cell_size: Coord,
    buckets: HashMap<(Coord, Coord), Vec<GridElem<T>>>,
}

impl<T> SparsePointGrid<T> {
    /// Create a grid with the given cell size (must be positive).
    pub fn new(cell_size: Coord) -> Self {
        debug_assert!(cell_size > 0);
        Self {
            cell_size,
            buckets: HashMap::new(),
        }
    }

    #[inline]
    fn cell_of(&self, p: Point) -> (Coord, Coord) {
        (p.x.div_euclid(self.cell_size), p.y.div_euclid(self.cell_size))
    }

    /// Insert a value keyed by a point.
    pub fn insert(&mut self, point: Point, val: T) {
        let cell = self.cell_of(point);
        self.buckets.entry(cell).or_default().push(GridElem { point, val });
    }

    /// Return all entries stored in the cells that a disc of `radius` around
    /// `point` can touch (the 9-cell neighborhood for radii up to the cell
    /// size). No distance filtering is applied.
    pub fn get_nearby(&self, point: Point, radius: Coord) -> Vec<&GridElem<T>> {
        let min_cell = self.cell_of(Point::new(point.x - radius, point.y - radius));
        let max_cell = self.cell_of(Point::new(point.x + radius, point.y + radius));
        let mut result = Vec::new();
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(bucket) = self.buckets.get(&(cx, cy)) {
                    result.extend(bucket.iter());
                }
            }
        }
        result
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    /// Whether the grid holds no entries.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// A boundary segment of a [`Shape`], identified by polygon and segment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonSegment {
    pub poly_idx: usize,
    pub segment_idx: usize,
}

/// A sparse uniform grid mapping locations to nearby boundary segments.
///
/// Each segment is registered in every cell its bounding box overlaps, so a
/// neighborhood query returns every segment passing near the query point.
/// The grid stores indices only; the shape itself stays with the caller.
#[derive(Debug, Clone)]
pub struct LocToLineGrid {
    cell_size: Coord,
    buckets: HashMap<(Coord, Coord), Vec<PolygonSegment>>,
}

impl LocToLineGrid {
    /// Index all boundary segments of `shape` with the given cell size.
    pub fn new(shape: &Shape, cell_size: Coord) -> Self {
        debug_assert!(cell_size > 0);
        let mut grid = Self {
            cell_size,
            buckets: HashMap::new(),
        };
        for (poly_idx, poly) in shape.iter().enumerate() {
            if poly.len() < 2 {
                continue;
            }
            for segment_idx in 0..poly.len() {
                let edge = poly.edge(segment_idx);
                grid.insert_segment(
                    PolygonSegment {
                        poly_idx,
                        segment_idx,
                    },
                    edge.a,
                    edge.b,
                );
            }
        }
        grid
    }

    #[inline]
    fn cell_of(&self, p: Point) -> (Coord, Coord) {
        (p.x.div_euclid(self.cell_size), p.y.div_euclid(self.cell_size))
    }

    fn insert_segment(&mut self, segment: PolygonSegment, a: Point, b: Point) {
        let min_cell = self.cell_of(Point::new(a.x.min(b.x), a.y.min(b.y)));
        let max_cell = self.cell_of(Point::new(a.x.max(b.x), a.y.max(b.y)));
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                self.buckets.entry((cx, cy)).or_default().push(segment);
            }
        }
    }

    /// Return the segments registered in cells a disc of `radius` around
    /// `point` can touch, deduplicated.
    pub fn get_nearby(&self, point: Point, radius: Coord) -> Vec<PolygonSegment> {
        let min_cell = self.cell_of(Point::new(point.x - radius, point.y - radius));
        let max_cell = self.cell_of(Point::new(point.x + radius, point.y + radius));
        let mut result = Vec::new();
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(bucket) = self.buckets.get(&(cx, cy)) {
                    result.extend(bucket.iter().copied());
                }
            }
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Find the closest boundary point of `shape` to `p` among the segments
    /// within `radius`, if any.
    ///
    /// `shape` must be the shape this grid was built from.
    pub fn find_nearest(&self, shape: &Shape, p: Point, radius: Coord) -> Option<ClosestPointResult> {
        let mut best: Option<ClosestPointResult> = None;
        for segment in self.get_nearby(p, radius) {
            let edge = shape[segment.poly_idx].edge(segment.segment_idx);
            let proj = edge.project_point(&p);
            let distance_squared = p.distance_squared(&proj);
            if best.map_or(true, |b| distance_squared < b.distance_squared) {
                best = Some(ClosestPointResult {
                    point: proj,
                    poly_idx: segment.poly_idx,
                    segment_idx: segment.segment_idx,
                    distance_squared,
                });
            }
        }
        best
    }
}
