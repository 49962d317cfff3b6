//! Point-in-ring and point-in-polygon classification.

use crate::algorithm::primitives::{raycast_fast, Raycast};
use crate::geometry::{GeometryRef, GeometryType, VertexXY};
use crate::indexed;

/// Location of a vertex relative to a ring or polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointInPolygon {
    /// The ring is degenerate (fewer than 3 vertices) or not prepared.
    Invalid,
    Interior,
    Exterior,
    Boundary,
}

/// Classify `vertex` against a closed ring by ray casting.
///
/// Prepared rings answer through their index.
pub fn vertex_in_ring(ring: GeometryRef, vertex: &VertexXY) -> PointInPolygon {
    debug_assert_eq!(ring.geometry_type(), GeometryType::LineString);

    if ring.vertex_count() < 3 {
        return PointInPolygon::Invalid;
    }

    if ring.is_prepared() {
        return indexed::contains(ring, vertex);
    }

    let mut crossings = 0u32;
    for (prev, next) in ring.vertices().segments_xy() {
        match raycast_fast(&prev, &next, vertex) {
            Raycast::None => {}
            Raycast::Cross => crossings += 1,
            Raycast::Boundary => return PointInPolygon::Boundary,
        }
    }

    if crossings % 2 == 0 {
        PointInPolygon::Exterior
    } else {
        PointInPolygon::Interior
    }
}

/// Classify `vertex` against a polygon: inside the shell and outside every hole is interior,
/// touching any ring is boundary.
///
/// Empty polygons and polygons with a degenerate shell are [`PointInPolygon::Invalid`].
pub fn vertex_in_polygon(polygon: GeometryRef, vertex: &VertexXY) -> PointInPolygon {
    debug_assert_eq!(polygon.geometry_type(), GeometryType::Polygon);

    let mut rings = polygon.parts();
    let Some(shell) = rings.next() else {
        return PointInPolygon::Invalid;
    };

    match vertex_in_ring(shell, vertex) {
        PointInPolygon::Interior => {}
        other => return other,
    }

    for hole in rings {
        match vertex_in_ring(hole, vertex) {
            PointInPolygon::Interior => return PointInPolygon::Exterior,
            PointInPolygon::Boundary => return PointInPolygon::Boundary,
            PointInPolygon::Exterior | PointInPolygon::Invalid => {}
        }
    }

    PointInPolygon::Interior
}
