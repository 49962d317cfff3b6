//! Algorithms implemented on geometry trees.
//!
//! Read-only algorithms are traits implemented for [`GeometryRef`](crate::geometry::GeometryRef).
//! Algorithms that build or rewrite geometries are free functions taking the arena.

pub mod centroid;
pub mod contains;
pub mod distance;
pub mod extract;
pub mod linear_ref;
pub mod math;
pub mod measure;
pub mod primitives;
pub mod transform;

pub use centroid::Centroid;
pub use contains::PointInPolygon;
pub use distance::EuclideanDistance;
pub use linear_ref::{
    IsClosed, LineInterpolateMeasure, LineInterpolatePoint, LineLocatePoint,
};
pub use measure::{Area, EuclideanLength, MaxSurfaceDimension, Perimeter, TotalExtent, VertexCount};
