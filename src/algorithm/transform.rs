//! Vertex visitation and vertex-rewriting transforms.
//!
//! Every transform allocates fresh vertex arrays from the arena's allocator and repoints the
//! leaves at them. Source arrays are never written, since they may alias caller-owned input
//! such as a little-endian WKB buffer.

use crate::alloc::VertexBuffer;
use crate::geometry::traversal::{vertex_array_ids, vertex_arrays, visit_all_parts_mut};
use crate::geometry::{
    AffineMatrix, GeomId, GeometryArena, GeometryRef, GeometryType, VertexType, VertexXY,
    VertexXYZM,
};

/// Call `callback` with every vertex of every leaf, in tree order.
pub fn visit_vertices_xy<F>(geom: GeometryRef, mut callback: F)
where
    F: FnMut(&VertexXY),
{
    for part in geom.walk(vertex_arrays) {
        for vertex in part.vertices().iter_xy() {
            callback(&vertex);
        }
    }
}

/// Call `callback` with every vertex of every leaf, in tree order.
///
/// Ordinates are named: the measure of an XYM vertex arrives in `m`, and absent ordinates are 0.
pub fn visit_vertices_xyzm<F>(geom: GeometryRef, mut callback: F)
where
    F: FnMut(&VertexXYZM),
{
    for part in geom.walk(vertex_arrays) {
        let vertex_type = part.vertex_type();
        for raw in part.vertices().iter_xyzm() {
            callback(&vertex_type.unpack(raw));
        }
    }
}

/// Replace every leaf's vertex array with a copy in which each vertex has been passed through
/// `callback`.
///
/// Changes to ordinates the leaf does not store are discarded.
pub fn transform_vertices<F>(arena: &mut GeometryArena, root: GeomId, mut callback: F)
where
    F: FnMut(&mut VertexXYZM),
{
    for id in vertex_array_ids(arena, root) {
        let vertex_type = arena.vertex_type(id);
        rewrite_vertices(arena, id, vertex_type, |raw| {
            let mut vertex = vertex_type.unpack(raw);
            callback(&mut vertex);
            vertex_type.pack(&vertex)
        });
    }
}

/// Swap x and y of every vertex.
pub fn flip_vertices(arena: &mut GeometryArena, root: GeomId) {
    for id in vertex_array_ids(arena, root) {
        let vertex_type = arena.vertex_type(id);
        rewrite_vertices(arena, id, vertex_type, |raw| {
            let mut values = raw.to_array();
            values.swap(0, 1);
            values
        });
    }
}

/// Apply `matrix` to every vertex. Measures pass through untouched.
pub fn affine_transform(arena: &mut GeometryArena, root: GeomId, matrix: &AffineMatrix) {
    for id in vertex_array_ids(arena, root) {
        let vertex_type = arena.vertex_type(id);
        rewrite_vertices(arena, id, vertex_type, |raw| {
            let vertex = vertex_type.unpack(raw);
            let transformed = if vertex_type.has_z() {
                matrix.apply_xyz(&vertex)
            } else {
                let xy = matrix.apply_xy(&vertex.xy());
                VertexXYZM::new(xy.x, xy.y, vertex.z, vertex.m)
            };
            vertex_type.pack(&transformed)
        });
    }
}

/// Change the vertex layout of every leaf below `root` to include exactly the requested
/// ordinates.
///
/// Ordinates present in both layouts are preserved; newly added ones are filled with
/// `default_z` and `default_m`. Container nodes only have their flags updated.
pub fn force_zm(
    arena: &mut GeometryArena,
    root: GeomId,
    set_z: bool,
    set_m: bool,
    default_z: f64,
    default_m: f64,
) {
    let target = VertexType::new(set_z, set_m);

    visit_all_parts_mut(
        arena,
        root,
        |arena, part| {
            if arena.geometry_type(part).is_multi_part() || arena.is_empty_geometry(part) {
                return;
            }
            let source = arena.vertex_type(part);
            if source == target {
                return;
            }
            rewrite_vertices(arena, part, target, |raw| {
                let vertex = source.unpack(raw);
                let z = if source.has_z() { vertex.z } else { default_z };
                let m = if source.has_m() { vertex.m } else { default_m };
                target.pack(&VertexXYZM::new(vertex.x, vertex.y, z, m))
            });
        },
        |arena, part| {
            arena.set_z(part, set_z);
            arena.set_m(part, set_m);
        },
    );
}

/// A MULTIPOINT with one point per vertex of `geom`, in tree order.
///
/// The points reference the source vertex arrays directly; nothing is copied.
pub fn collect_vertices(arena: &mut GeometryArena, geom: GeomId) -> GeomId {
    let has_z = arena.has_z(geom);
    let has_m = arena.has_m(geom);
    let result = arena.push(GeometryType::MultiPoint, has_z, has_m);

    for id in vertex_array_ids(arena, geom) {
        let vertices = arena.vertex_array(id);
        let width = vertices.width();
        let data = vertices.as_bytes();
        for slot in data.chunks_exact(width) {
            let point = arena.push_with_vertices(GeometryType::Point, has_z, has_m, slot, 1);
            arena.append_part(result, point);
        }
    }

    result
}

/// Replace the vertex array of leaf `id` with a `target`-layout copy produced by `map`.
///
/// `map` receives each raw slot and returns the new slot values.
fn rewrite_vertices<F>(arena: &mut GeometryArena, id: GeomId, target: VertexType, mut map: F)
where
    F: FnMut(VertexXYZM) -> [f64; 4],
{
    let source = arena.vertex_array(id);
    let mut buffer = VertexBuffer::with_capacity(arena.allocator(), target.width(), source.len());
    for raw in source.iter_xyzm() {
        buffer.push(&map(raw));
    }
    let (data, count) = buffer.finish();

    // The layout flags must match the new array before it is attached.
    arena.set_z(id, target.has_z());
    arena.set_m(id, target.has_m());
    arena.set_vertex_array(id, data, count);
}
