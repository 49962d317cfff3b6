//! Prepared geometries: trees whose linestrings carry a hierarchical bounding-box index for
//! repeated containment and distance queries.
//!
//! Only [`GeometryType::LineString`] nodes are indexed. Polygon rings are linestrings, so a
//! prepared polygon answers point-in-ring queries through its rings' indexes.

mod index;
mod pair;

pub use index::{PreparedIndex, MAX_DEPTH, NODE_SIZE};

use crate::algorithm::contains::PointInPolygon;
use crate::geometry::{ExtentXY, GeomId, GeometryArena, GeometryRef, GeometryType, VertexXY};

/// Deep-copy the tree rooted at `id` and index every non-empty linestring in the copy.
///
/// The copy shares the source's vertex arrays, so the source stays unprepared.
pub fn make(arena: &mut GeometryArena, id: GeomId) -> GeomId {
    let root = arena.push_shallow_copy(id);
    build(arena, root);

    // (source, copy) pairs whose children still have to be copied.
    let mut pending = vec![(id, root)];
    while let Some((source, copy)) = pending.pop() {
        let children: Vec<GeomId> = arena.parts(source).map(|part| part.id()).collect();
        for child in children {
            let child_copy = arena.push_shallow_copy(child);
            build(arena, child_copy);
            arena.append_part(copy, child_copy);
            if arena.geometry_type(child).is_multi_part() {
                pending.push((child, child_copy));
            }
        }
    }

    root
}

/// Index `id` in place. Returns whether an index was attached.
///
/// Anything but a non-empty linestring is left untouched.
pub fn build(arena: &mut GeometryArena, id: GeomId) -> bool {
    if arena.geometry_type(id) != GeometryType::LineString || arena.is_prepared(id) {
        return false;
    }
    match PreparedIndex::build(&arena.vertex_array(id)) {
        Some(index) => {
            arena.attach_index(id, index);
            true
        }
        None => false,
    }
}

/// Classify `vertex` against the prepared ring `geom`.
///
/// Returns [`PointInPolygon::Invalid`] when `geom` has not been prepared.
pub fn contains(geom: GeometryRef, vertex: &VertexXY) -> PointInPolygon {
    match geom.prepared_index() {
        Some(index) => index.contains(&geom.vertices(), vertex),
        None => PointInPolygon::Invalid,
    }
}

/// Distance from `vertex` to the nearest segment of the prepared linestring `geom`.
pub fn try_get_distance_to_vertex(geom: GeometryRef, vertex: &VertexXY) -> Option<f64> {
    geom.prepared_index()?
        .distance_to_vertex(&geom.vertices(), vertex)
}

/// Distance between the nearest segments of two prepared linestrings.
pub fn try_get_distance(lhs: GeometryRef, rhs: GeometryRef) -> Option<f64> {
    let lhs_index = lhs.prepared_index()?;
    let rhs_index = rhs.prepared_index()?;
    lhs_index.distance_to_index(&lhs.vertices(), rhs_index, &rhs.vertices())
}

/// The bounding box of a prepared linestring, read from the index root.
pub fn try_get_extent(geom: GeometryRef) -> Option<ExtentXY> {
    geom.prepared_index().map(PreparedIndex::extent)
}
