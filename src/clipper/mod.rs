//! Polygon offset and union operations.
//!
//! This module wraps the geo-clipper library for the two region operations
//! the planner needs:
//! - Offsetting a [`Shape`] inward or outward (comb boundaries)
//! - Unioning Shapes (aggregate printed outline of a layer)
//!
//! Coordinates cross the wrapper boundary as floating-point mm and come back
//! rounded to the integer grid.

use crate::geometry::{Point, Polygon, Shape};
use crate::{scale, unscale, Coord};
use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};

/// Factor by which clipper scales floating-point input to its internal
/// integer grid; 1000 maps 1 mm to 1000 clipper units, i.e. micrometers.
const CLIPPER_PRECISION: f64 = 1000.0;

/// Join type for offset corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetJoinType {
    /// Square corners
    Square,
    /// Round corners
    Round,
    /// Mitered corners
    #[default]
    Miter,
}

impl From<OffsetJoinType> for JoinType {
    fn from(jt: OffsetJoinType) -> Self {
        match jt {
            OffsetJoinType::Square => JoinType::Square,
            OffsetJoinType::Round => JoinType::Round(0.25), // Default arc tolerance
            OffsetJoinType::Miter => JoinType::Miter(2.0),  // Default miter limit
        }
    }
}

/// Convert a ring of scaled integer points to a geo LineString in mm.
fn ring_to_geo(points: &[Point]) -> LineString<f64> {
    let mut coords: Vec<GeoCoord<f64>> = points
        .iter()
        .map(|p| GeoCoord {
            x: unscale(p.x),
            y: unscale(p.y),
        })
        .collect();
    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(*first);
        }
    }
    LineString::new(coords)
}

/// Convert a geo ring back to a Polygon, dropping the closing point.
fn geo_to_polygon(ring: &LineString<f64>) -> Polygon {
    let points: Vec<Point> = ring
        .coords()
        .map(|c| Point::new(scale(c.x), scale(c.y)))
        .collect();
    Polygon::from_points(points)
}

/// Convert a Shape to a geo MultiPolygon, grouping holes under their outlines.
fn shape_to_geo_multi(shape: &Shape) -> MultiPolygon<f64> {
    let parts_view = shape.parts_view();
    let geo_polys: Vec<GeoPolygon<f64>> = parts_view
        .parts
        .iter()
        .map(|part| {
            let exterior = ring_to_geo(shape[part[0]].points());
            let interiors: Vec<LineString<f64>> = part[1..]
                .iter()
                .map(|&hole| ring_to_geo(shape[hole].points()))
                .collect();
            GeoPolygon::new(exterior, interiors)
        })
        .collect();
    MultiPolygon::new(geo_polys)
}

/// Flatten a geo MultiPolygon back to a Shape (outlines and holes as a flat list).
fn geo_multi_to_shape(multi: &MultiPolygon<f64>) -> Shape {
    let mut shape = Shape::new();
    for geo_poly in &multi.0 {
        let contour = geo_to_polygon(geo_poly.exterior());
        if contour.len() >= 3 {
            shape.push(contour);
        }
        for interior in geo_poly.interiors() {
            let hole = geo_to_polygon(interior);
            if hole.len() >= 3 {
                shape.push(hole);
            }
        }
    }
    shape
}

/// Offset a shape by a distance in internal units.
///
/// Positive delta grows the region, negative delta shrinks it. Shrinking a
/// region below its width yields an empty shape.
pub fn offset_shape(shape: &Shape, delta: Coord, join_type: OffsetJoinType) -> Shape {
    if shape.is_empty() {
        return Shape::new();
    }
    let geo_multi = shape_to_geo_multi(shape);
    let result = geo_multi.offset(
        unscale(delta),
        join_type.into(),
        EndType::ClosedPolygon,
        CLIPPER_PRECISION,
    );
    geo_multi_to_shape(&result)
}

/// Union two shapes.
pub fn union_shapes(a: &Shape, b: &Shape) -> Shape {
    if a.is_empty() {
        return b.clone();
    }
    if b.is_empty() {
        return a.clone();
    }
    let a_geo = shape_to_geo_multi(a);
    let b_geo = shape_to_geo_multi(b);
    let result = a_geo.union(&b_geo, CLIPPER_PRECISION);
    geo_multi_to_shape(&result)
}

/// Union a list of shapes into one.
pub fn union_all(shapes: &[Shape]) -> Shape {
    let mut result = Shape::new();
    for shape in shapes {
        result = union_shapes(&result, shape);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: Coord, y: Coord, size: Coord) -> Polygon {
        Polygon::rectangle(Point::new(x, y), Point::new(x + size, y + size))
    }

    #[test]
    fn test_offset_grow() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000)]);
        let grown = offset_shape(&shape, 100, OffsetJoinType::Miter);
        assert!(!grown.is_empty());
        assert!(grown.inside(Point::new(-50, 500)));
        assert!(grown.inside(Point::new(500, 500)));
        assert!(!grown.inside(Point::new(-200, 500)));
    }

    #[test]
    fn test_offset_shrink() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000)]);
        let shrunk = offset_shape(&shape, -100, OffsetJoinType::Miter);
        assert!(!shrunk.is_empty());
        assert!(shrunk.inside(Point::new(500, 500)));
        assert!(!shrunk.inside(Point::new(50, 500)));
    }

    #[test]
    fn test_offset_shrink_to_nothing() {
        let shape = Shape::from_polygons(vec![square(0, 0, 1000)]);
        let gone = offset_shape(&shape, -600, OffsetJoinType::Miter);
        assert!(gone.is_empty());
    }

    #[test]
    fn test_offset_keeps_hole() {
        let shape = Shape::from_polygons(vec![square(0, 0, 2000), square(500, 500, 1000)]);
        let shrunk = offset_shape(&shape, -100, OffsetJoinType::Miter);
        assert!(shrunk.inside(Point::new(300, 300)));
        assert!(!shrunk.inside(Point::new(1000, 1000)));
    }

    #[test]
    fn test_union_disjoint() {
        let a = Shape::from_polygons(vec![square(0, 0, 1000)]);
        let b = Shape::from_polygons(vec![square(5000, 0, 1000)]);
        let merged = union_shapes(&a, &b);
        assert_eq!(merged.parts_view().part_count(), 2);
        assert!(merged.inside(Point::new(500, 500)));
        assert!(merged.inside(Point::new(5500, 500)));
    }

    #[test]
    fn test_union_overlapping() {
        let a = Shape::from_polygons(vec![square(0, 0, 1000)]);
        let b = Shape::from_polygons(vec![square(500, 0, 1000)]);
        let merged = union_shapes(&a, &b);
        assert_eq!(merged.parts_view().part_count(), 1);
        assert!(merged.inside(Point::new(750, 500)));
    }
}
