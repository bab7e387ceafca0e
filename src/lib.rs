//! # pathplan
//!
//! Print-path planning core for fused-filament 3D printing.
//!
//! Given the polygons and polylines that slicing already produced, this crate
//! decides in what order and from which endpoints to traverse them:
//!
//! - [`PathOrderMonotonic`] reorders a bag of polygons and polylines so that
//!   adjacent line strokes are printed in one consistent direction projected
//!   onto a chosen axis, which keeps surfaces looking uniform.
//! - [`Comb`] computes collision-avoiding travel paths between two points,
//!   preferring to stay inside part boundaries and detouring around other
//!   printed parts when it has to go through air.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pathplan::{PathOrderMonotonic, Point};
//!
//! let mut orderer = PathOrderMonotonic::new(std::f64::consts::FRAC_PI_2, 500, Point::new(0, 0));
//! orderer.add_polyline(&infill_line_a)?;
//! orderer.add_polyline(&infill_line_b)?;
//! orderer.optimize();
//! for path in &orderer.paths {
//!     // print path.vertices starting at path.start_point()
//! }
//! ```

pub mod clipper;
pub mod comb;
pub mod geometry;
pub mod grid;
pub mod order;

// Re-export commonly used types
pub use comb::{
    Comb, CombPath, CombPaths, ExtruderTrain, LayerOutlines, LinePolygonsCrossings,
    SliceDataStorage,
};
pub use geometry::{
    BoundingBox, ClosestPointResult, Line, PartsView, Point, PointF, Polygon, Polyline, Shape,
};
pub use grid::{LocToLineGrid, SparsePointGrid};
pub use order::{OrderedPath, PathOrderMonotonic};

/// Coordinate type used throughout the planner.
/// Using i64 for integer coordinates (scaled by SCALING_FACTOR) to avoid floating-point issues.
pub type Coord = i64;

/// Floating-point coordinate type for unscaled values.
pub type CoordF = f64;

/// Scaling factor: coordinates are stored as integers scaled by this factor.
/// 1 unit = 1 micrometer, so 1mm = 1_000 units.
pub const SCALING_FACTOR: f64 = 1_000.0;

/// Scale a floating-point coordinate (in mm) to integer units.
#[inline]
pub fn scale(v: CoordF) -> Coord {
    (v * SCALING_FACTOR).round() as Coord
}

/// Unscale an integer coordinate to floating-point (in mm).
#[inline]
pub fn unscale(v: Coord) -> CoordF {
    v as CoordF / SCALING_FACTOR
}

/// Result type used throughout the planner.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for planner operations.
///
/// Expected planning outcomes (combing infeasible, empty input) are reported
/// through return values, not through this type. `Error` covers genuine
/// misuse of the API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Coordinate out of range: {0}")]
    CoordinateOutOfRange(Coord),

    #[error("Invalid geometry: {0}")]
    Geometry(String),
}

/// Largest coordinate magnitude for which monotonic projections are overflow-safe.
///
/// `dot(p, m)` with the scaled monotonic vector stays within i64 for
/// coordinates up to this bound (±2³¹ µm, i.e. about ±2 m).
pub const MAX_PLANNING_COORD: Coord = 1 << 31;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
