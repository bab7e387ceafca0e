//! Line segment type.

use super::{cross2, Point};
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Get the direction vector (b - a).
    #[inline]
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    /// Get the midpoint of the line segment.
    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new((self.a.x + self.b.x) / 2, (self.a.y + self.b.y) / 2)
    }

    /// Get the squared length of the line segment.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.a.distance_squared(&self.b)
    }

    /// Get the length of the line segment.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.a.distance(&self.b)
    }

    /// Check if this line segment is a point (zero length).
    #[inline]
    pub fn is_point(&self) -> bool {
        self.a == self.b
    }

    /// Reverse the direction of the line segment.
    #[inline]
    pub fn reverse(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Project a point onto this line segment, clamping to the endpoints.
    pub fn project_point(&self, p: &Point) -> Point {
        let dir = self.direction();
        let len2 = dir.length_squared();
        if len2 == 0 {
            return self.a;
        }
        let ap = *p - self.a;
        let t = (ap.x as i128 * dir.x as i128 + ap.y as i128 * dir.y as i128).clamp(0, len2);
        // Interpolate in floating point; the result is rounded back to the grid.
        let f = t as CoordF / len2 as CoordF;
        Point::new(
            (self.a.x as CoordF + dir.x as CoordF * f).round() as i64,
            (self.a.y as CoordF + dir.y as CoordF * f).round() as i64,
        )
    }

    /// Squared distance from a point to this line segment.
    pub fn distance_to_point_squared(&self, p: &Point) -> i128 {
        let proj = self.project_point(p);
        p.distance_squared(&proj)
    }

    /// Distance from a point to this line segment.
    pub fn distance_to_point(&self, p: &Point) -> CoordF {
        (self.distance_to_point_squared(p) as CoordF).sqrt()
    }

    /// Check if two line segments intersect.
    ///
    /// Collinear overlapping segments are not reported as intersecting.
    pub fn intersects(&self, other: &Line) -> bool {
        let d1 = self.direction();
        let d2 = other.direction();

        let cross = cross2(d1, d2);
        if cross == 0 {
            return false;
        }

        let diff = other.a - self.a;
        let t_num = cross2(diff, d2);
        let u_num = cross2(diff, d1);

        // Intersection parameters must both lie in [0, 1]; compare numerators
        // against the (signed) denominator to stay in integer arithmetic.
        if cross > 0 {
            t_num >= 0 && t_num <= cross && u_num >= 0 && u_num <= cross
        } else {
            t_num <= 0 && t_num >= cross && u_num <= 0 && u_num >= cross
        }
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

/// Type alias for a collection of lines.
pub type Lines = Vec<Line>;
