//! Moving every part of one dimension out of a geometry into a new multi geometry.
//!
//! Extraction is destructive: the extracted parts are unlinked from their containers and
//! relinked under the result, in document order. Matching containers that are visited along
//! the way (nested multi geometries and collections) are unlinked and left empty.

use crate::geometry::{GeomId, GeometryArena, GeometryType};

/// Move every POINT out of `geom` into a new MULTIPOINT.
pub fn extract_points(arena: &mut GeometryArena, geom: GeomId) -> GeomId {
    extract(arena, geom, GeometryType::Point, GeometryType::MultiPoint)
}

/// Move every LINESTRING out of `geom` into a new MULTILINESTRING.
///
/// Polygon rings are not lines and stay where they are.
pub fn extract_linestrings(arena: &mut GeometryArena, geom: GeomId) -> GeomId {
    extract(arena, geom, GeometryType::LineString, GeometryType::MultiLineString)
}

/// Move every POLYGON out of `geom` into a new MULTIPOLYGON.
pub fn extract_polygons(arena: &mut GeometryArena, geom: GeomId) -> GeomId {
    extract(arena, geom, GeometryType::Polygon, GeometryType::MultiPolygon)
}

fn extract(arena: &mut GeometryArena, geom: GeomId, leaf: GeometryType, multi: GeometryType) -> GeomId {
    let result = arena.push(multi, arena.has_z(geom), arena.has_m(geom));
    let selects = |kind: GeometryType| {
        kind == leaf || kind == multi || kind == GeometryType::GeometryCollection
    };

    let kind = arena.geometry_type(geom);
    if kind == leaf {
        // A lone root leaf moves as a whole.
        if arena.parent(geom).is_none() {
            arena.append_part(result, geom);
        }
        return result;
    }
    if !selects(kind) {
        return result;
    }

    // Containers are expanded in place on the stack so leaves keep their document order.
    let mut pending = vec![geom];
    while let Some(part) = pending.pop() {
        if arena.geometry_type(part) == leaf {
            arena.append_part(result, part);
            continue;
        }

        let mut removed = Vec::new();
        arena.filter_parts(
            part,
            |arena, child| selects(arena.geometry_type(child)),
            |_, child| removed.push(child),
        );
        pending.extend(removed.into_iter().rev());
    }

    result
}
