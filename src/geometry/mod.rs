//! Geometry primitives for the path planner.
//!
//! This module provides the fundamental geometric types used throughout the
//! planning core:
//! - [`Point`] and [`PointF`] - 2D points with integer (scaled) and floating-point coordinates
//! - [`Line`] - Line segment between two points
//! - [`Polygon`] - Closed polygon (boundary)
//! - [`Polyline`] - Open polyline (path)
//! - [`Shape`] - Multi-polygon region with even-odd semantics (outlines + holes)
//! - [`BoundingBox`] - Axis-aligned bounding box
//!
//! ## Coordinate System
//!
//! The planner uses scaled integer coordinates internally to avoid
//! floating-point precision issues. Coordinates are scaled by
//! `SCALING_FACTOR` (1,000), so 1 unit = 1 micrometer.
//!
//! - Use `scale()` to convert from mm to internal units
//! - Use `unscale()` to convert from internal units to mm

mod bounding_box;
mod line;
mod point;
mod polygon;
mod polyline;
mod shape;

pub use bounding_box::BoundingBox;
pub use line::{Line, Lines};
pub use point::{Point, PointF, Points};
pub use polygon::{Polygon, Polygons};
pub use polyline::{Polyline, Polylines};
pub use shape::{ClosestPointResult, PartsView, Shape};

/// Calculate the cross product of two 2D vectors (returns a scalar).
/// This is useful for determining the orientation of three points.
#[inline]
pub fn cross2(v1: Point, v2: Point) -> i128 {
    v1.x as i128 * v2.y as i128 - v1.y as i128 * v2.x as i128
}

/// Calculate the dot product of two 2D vectors.
#[inline]
pub fn dot2(v1: Point, v2: Point) -> i128 {
    v1.x as i128 * v2.x as i128 + v1.y as i128 * v2.y as i128
}

/// Squared length of a 2D vector.
#[inline]
pub fn vsize2(v: Point) -> i128 {
    v.length_squared()
}

/// Calculate the perpendicular vector (rotate 90 degrees counter-clockwise).
#[inline]
pub fn perp(v: Point) -> Point {
    Point::new(-v.y, v.x)
}

/// Orientation of three points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Counter-clockwise (left turn)
    CounterClockwise,
    /// Clockwise (right turn)
    Clockwise,
    /// Collinear (no turn)
    Collinear,
}

/// Determine the orientation of three points.
pub fn orientation(p1: Point, p2: Point, p3: Point) -> Orientation {
    let cross = cross2(p2 - p1, p3 - p2);
    if cross > 0 {
        Orientation::CounterClockwise
    } else if cross < 0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}
