//! Print-order planning for polygons and polylines.
//!
//! The slicer produces geometry in whatever order generation was convenient;
//! this module decides the order in which to actually print it. The output
//! unit is [`OrderedPath`]: a reference to the source geometry plus where to
//! start printing it and in which direction.

mod monotonic;

pub use monotonic::PathOrderMonotonic;

use crate::geometry::{Point, Polygon, Polyline};

/// One path in a planned print order.
///
/// Borrows its vertex data from the caller; the source polygons and
/// polylines must outlive the ordering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedPath<'a> {
    /// The vertices of the source polygon or polyline.
    pub vertices: &'a [Point],
    /// Whether the path is a closed loop.
    pub is_closed: bool,
    /// Index of the vertex to start printing from. `None` while the orderer
    /// has not decided yet; always set on emitted paths.
    pub start_vertex: Option<usize>,
    /// Whether to traverse the vertices in reverse order. For open paths
    /// this holds exactly when `start_vertex` is the last vertex.
    pub backwards: bool,
}

impl<'a> OrderedPath<'a> {
    /// Wrap a closed polygon.
    pub fn from_polygon(polygon: &'a Polygon) -> Self {
        Self {
            vertices: polygon.points(),
            is_closed: true,
            start_vertex: Some(0),
            backwards: false,
        }
    }

    /// Wrap an open polyline.
    pub fn from_polyline(polyline: &'a Polyline) -> Self {
        Self {
            vertices: polyline.points(),
            is_closed: false,
            start_vertex: None,
            backwards: false,
        }
    }

    /// First endpoint of the vertex data.
    #[inline]
    pub fn front(&self) -> Point {
        self.vertices[0]
    }

    /// Last endpoint of the vertex data.
    #[inline]
    pub fn back(&self) -> Point {
        self.vertices[self.vertices.len() - 1]
    }

    /// The point printing starts at, once a start vertex is assigned.
    pub fn start_point(&self) -> Point {
        self.vertices[self.start_vertex.unwrap_or(0)]
    }

    /// The point printing ends at.
    ///
    /// For closed paths this equals the start point; for open paths it is
    /// the endpoint opposite the start vertex.
    pub fn end_point(&self) -> Point {
        if self.is_closed {
            self.start_point()
        } else {
            self.vertices[self.vertices.len() - 1 - self.start_vertex.unwrap_or(0)]
        }
    }
}
