//! Linear referencing along linestrings: fractional positions, measures and substrings.
//!
//! Positions are fractions of the planar length of a line. Measures are the M ordinates stored
//! with each vertex; the measure-based operations require them and yield nothing otherwise.

use crate::algorithm::primitives::vertex_array_length;
use crate::alloc::VertexBuffer;
use crate::geometry::traversal::leaf_geometries;
use crate::geometry::{
    GeomId, GeometryArena, GeometryRef, GeometryType, VertexArray, VertexType, VertexXY,
    VertexXYZM,
};

/// Whether a line ends where it starts.
///
/// A LINESTRING is closed when it has at least two vertices and the first and last agree in
/// every stored ordinate. A MULTILINESTRING is closed when it has parts and all of them are.
/// Every other kind is not closed.
pub trait IsClosed {
    fn is_closed(&self) -> bool;
}

impl IsClosed for GeometryRef<'_, '_> {
    fn is_closed(&self) -> bool {
        match self.geometry_type() {
            GeometryType::LineString => {
                let count = self.vertex_count();
                count >= 2 && self.vertex_xyzm(0) == self.vertex_xyzm(count - 1)
            }
            GeometryType::MultiLineString => {
                self.part_count() > 0 && self.parts().all(|line| line.is_closed())
            }
            _ => false,
        }
    }
}

/// The vertex at a fraction of a line's length.
///
/// # Examples
///
/// ```
/// use bumpalo::Bump;
/// use geoarena::algorithm::LineInterpolatePoint;
/// use geoarena::geometry::GeometryArena;
/// use geoarena::io::wkt::from_wkt;
///
/// let bump = Bump::new();
/// let mut arena = GeometryArena::new(&bump);
/// let line = from_wkt(&mut arena, "LINESTRING(0 0, 10 0, 10 10)").unwrap();
///
/// let vertex = arena.get(line).line_interpolate_point(0.75).unwrap();
/// assert_eq!((vertex.x, vertex.y), (10.0, 5.0));
/// ```
pub trait LineInterpolatePoint {
    /// `fraction` is clamped to `[0, 1]`. All four ordinates are interpolated linearly.
    ///
    /// Returns `None` for anything but a non-empty LINESTRING.
    fn line_interpolate_point(&self, fraction: f64) -> Option<VertexXYZM>;
}

impl LineInterpolatePoint for GeometryRef<'_, '_> {
    fn line_interpolate_point(&self, fraction: f64) -> Option<VertexXYZM> {
        if self.geometry_type() != GeometryType::LineString || self.is_empty() {
            return None;
        }

        let vertices = self.vertices();
        let count = vertices.len();
        let fraction = fraction.clamp(0.0, 1.0);

        let raw = if count == 1 || fraction == 0.0 {
            vertices.xyzm(0)
        } else if fraction == 1.0 {
            vertices.xyzm(count - 1)
        } else {
            let target = vertex_array_length(&vertices) * fraction;
            vertex_at_length(&vertices, target)?.1
        };

        Some(self.vertex_type().unpack(raw))
    }
}

/// Fraction of a line's length at which it comes closest to a point.
///
/// Returns `None` unless `self` is a non-empty LINESTRING and `point` a non-empty POINT. A line
/// of zero length locates every point at 0.
pub trait LineLocatePoint<Rhs> {
    fn line_locate_point(&self, point: &Rhs) -> Option<f64>;
}

impl LineLocatePoint<GeometryRef<'_, '_>> for GeometryRef<'_, '_> {
    fn line_locate_point(&self, point: &GeometryRef<'_, '_>) -> Option<f64> {
        if !is_line_and_point(self, point) {
            return None;
        }

        let target = point.vertex_xy(0);
        let vertices = self.vertices();

        let mut length = 0.0;
        let mut closest_length = 0.0;
        let mut closest_sq = f64::MAX;

        for (prev, next) in vertices.segments_xy() {
            let segment = next - prev;
            let segment_length_sq = segment.norm_sq();

            if segment_length_sq == 0.0 {
                let distance_sq = (target - prev).norm_sq();
                if distance_sq < closest_sq {
                    closest_sq = distance_sq;
                    closest_length = length;
                }
                continue;
            }

            let t = ((target - prev).dot(&segment) / segment_length_sq).clamp(0.0, 1.0);
            let distance_sq = (prev + segment * t - target).norm_sq();
            let segment_length = segment_length_sq.sqrt();

            if distance_sq < closest_sq {
                closest_sq = distance_sq;
                closest_length = length + t * segment_length;
            }
            length += segment_length;
        }

        if closest_length == 0.0 || length == 0.0 {
            return Some(0.0);
        }
        Some(closest_length / length)
    }
}

/// Measure of a line at the location closest to a point.
pub trait LineInterpolateMeasure<Rhs> {
    /// Returns `None` unless `self` is a LINESTRING with measures and at least one segment of
    /// non-zero length, and `point` is a non-empty POINT.
    fn line_interpolate_measure(&self, point: &Rhs) -> Option<f64>;
}

impl LineInterpolateMeasure<GeometryRef<'_, '_>> for GeometryRef<'_, '_> {
    fn line_interpolate_measure(&self, point: &GeometryRef<'_, '_>) -> Option<f64> {
        if !is_line_and_point(self, point) || !self.has_m() || self.vertex_count() < 2 {
            return None;
        }

        let target = point.vertex_xy(0);
        let vertex_type = self.vertex_type();
        let vertices = self.vertices();

        let mut closest_sq = f64::MAX;
        let mut measure = None;

        let mut prev = vertex_type.unpack(vertices.xyzm(0));
        for i in 1..vertices.len() {
            let next = vertex_type.unpack(vertices.xyzm(i));
            let segment = next.xy() - prev.xy();
            let segment_length_sq = segment.norm_sq();

            if segment_length_sq > 0.0 {
                let t = ((target - prev.xy()).dot(&segment) / segment_length_sq).clamp(0.0, 1.0);
                let distance_sq = (prev.xy() + segment * t - target).norm_sq();
                if distance_sq < closest_sq {
                    closest_sq = distance_sq;
                    measure = Some(prev.m + t * (next.m - prev.m));
                }
            }
            prev = next;
        }

        measure
    }
}

/// Points spaced every `fraction` of the length of `line`.
///
/// The result is a MULTIPOINT of freshly allocated vertices, except in the degenerate cases
/// where a single POINT referencing a vertex of `line` is returned: a line of one vertex or zero
/// length, or a `fraction` of 0 (first vertex) or 1 (last vertex). Anything but a non-empty
/// LINESTRING gives an empty POINT.
pub fn interpolate_points(arena: &mut GeometryArena, line: GeomId, fraction: f64) -> GeomId {
    let has_z = arena.has_z(line);
    let has_m = arena.has_m(line);

    if arena.geometry_type(line) != GeometryType::LineString || arena.is_empty_geometry(line) {
        return arena.push(GeometryType::Point, has_z, has_m);
    }

    let vertex_type = arena.vertex_type(line);
    let vertices = arena.vertex_array(line);
    let count = vertices.len();
    let width = vertices.width();
    let data = vertices.as_bytes();

    let fraction = fraction.clamp(0.0, 1.0);
    let step = fraction * vertex_array_length(&vertices);

    if count == 1 || fraction == 0.0 || step == 0.0 {
        return arena.push_with_vertices(GeometryType::Point, has_z, has_m, &data[..width], 1);
    }
    if fraction == 1.0 {
        let offset = (count - 1) * width;
        let last = &data[offset..offset + width];
        return arena.push_with_vertices(GeometryType::Point, has_z, has_m, last, 1);
    }

    let result = arena.push(GeometryType::MultiPoint, has_z, has_m);

    let mut length = 0.0;
    let mut target = step;
    let mut prev = vertices.xyzm(0);

    for i in 1..count {
        let next = vertices.xyzm(i);
        let segment_length = (next.xy() - prev.xy()).norm();

        // Several points can fall on one segment.
        while length + segment_length >= target {
            let t = (target - length) / segment_length;
            let point = push_point(arena, vertex_type, lerp(prev, next, t).to_array());
            arena.append_part(result, point);
            target += step;
        }

        length += segment_length;
        prev = next;
    }

    result
}

/// The part of `line` between two fractions of its length.
///
/// Both fractions are clamped to `[0, 1]`. The full range references the vertices of `line`
/// directly, equal fractions give a POINT, and a reversed range or a non-LINESTRING input gives
/// an empty LINESTRING.
pub fn substring(
    arena: &mut GeometryArena,
    line: GeomId,
    beg_fraction: f64,
    end_fraction: f64,
) -> GeomId {
    let vertex_type = arena.vertex_type(line);
    let result = arena.push(GeometryType::LineString, vertex_type.has_z(), vertex_type.has_m());

    if arena.geometry_type(line) != GeometryType::LineString {
        return result;
    }
    if arena.is_empty_geometry(line) {
        if beg_fraction == end_fraction {
            arena.set_type(result, GeometryType::Point);
        }
        return result;
    }
    if beg_fraction > end_fraction {
        return result;
    }

    let beg_fraction = beg_fraction.clamp(0.0, 1.0);
    let end_fraction = end_fraction.clamp(0.0, 1.0);
    let vertices = arena.vertex_array(line);

    if beg_fraction == 0.0 && end_fraction == 1.0 {
        arena.set_vertex_array(result, vertices.as_bytes(), vertices.len() as u32);
        return result;
    }

    if beg_fraction == end_fraction {
        arena.set_type(result, GeometryType::Point);
        if let Some(vertex) = arena.get(line).line_interpolate_point(beg_fraction) {
            let data = alloc_vertices(arena, vertex_type, &[vertex_type.pack(&vertex)]);
            arena.set_vertex_array(result, data, 1);
        }
        return result;
    }

    let total_length = vertex_array_length(&vertices);
    let Some((beg_index, beg)) = vertex_at_length(&vertices, total_length * beg_fraction) else {
        return result;
    };
    let (end_index, end) = vertex_at_length(&vertices, total_length * end_fraction)
        .unwrap_or_else(|| (vertices.len() - 2, vertices.xyzm(vertices.len() - 1)));

    let mut buffer = VertexBuffer::with_capacity(
        arena.allocator(),
        vertex_type.width(),
        end_index - beg_index + 2,
    );
    buffer.push(&beg.to_array());
    for i in beg_index + 1..=end_index {
        buffer.push(&vertices.xyzm(i).to_array());
    }
    buffer.push(&end.to_array());

    let (data, count) = buffer.finish();
    arena.set_vertex_array(result, data, count);
    result
}

/// Every location in `geom` whose measure equals `measure`, as a MULTIPOINT.
///
/// Points are matched by their own measure and keep referencing their vertex. Lines (and the
/// shells of polygons) contribute one interpolated point per segment whose measure range
/// contains `measure`, displaced `offset` units to the right of the segment direction.
/// Measures are expected to increase along each line. A geometry without measures gives an
/// empty MULTIPOINT.
pub fn locate_along(arena: &mut GeometryArena, geom: GeomId, measure: f64, offset: f64) -> GeomId {
    let result = arena.push(GeometryType::MultiPoint, arena.has_z(geom), arena.has_m(geom));
    if !arena.has_m(geom) {
        return result;
    }

    for part in leaf_ids(arena, geom) {
        match arena.geometry_type(part) {
            GeometryType::Point => {
                let vertex = arena.vertex_type(part).unpack(arena.vertex_xyzm(part, 0));
                if vertex.m == measure {
                    let point = alias_point(arena, part);
                    arena.append_part(result, point);
                }
            }
            GeometryType::LineString => line_locate_along(arena, part, measure, offset, result),
            GeometryType::Polygon => {
                if let Some(shell) = arena.first_part(part) {
                    line_locate_along(arena, shell, measure, offset, result);
                }
            }
            _ => {}
        }
    }

    result
}

/// Every piece of `geom` whose measure lies in `[lower, upper]`, as a GEOMETRYCOLLECTION.
///
/// Points are kept when their measure is in range. Lines (and the shells of polygons) are cut
/// where their measure enters and leaves the range; each run becomes a LINESTRING, or a POINT
/// if it holds a single vertex. Cut vertices are displaced `offset` units to the right of their
/// segment direction. A geometry without measures gives an empty collection.
pub fn locate_between(
    arena: &mut GeometryArena,
    geom: GeomId,
    lower: f64,
    upper: f64,
    offset: f64,
) -> GeomId {
    let result = arena.push(
        GeometryType::GeometryCollection,
        arena.has_z(geom),
        arena.has_m(geom),
    );
    if !arena.has_m(geom) {
        return result;
    }

    for part in leaf_ids(arena, geom) {
        match arena.geometry_type(part) {
            GeometryType::Point => {
                let vertex = arena.vertex_type(part).unpack(arena.vertex_xyzm(part, 0));
                if vertex.m >= lower && vertex.m <= upper {
                    let point = alias_point(arena, part);
                    arena.append_part(result, point);
                }
            }
            GeometryType::LineString => {
                line_locate_between(arena, part, lower, upper, offset, result)
            }
            GeometryType::Polygon => {
                if let Some(shell) = arena.first_part(part) {
                    line_locate_between(arena, shell, lower, upper, offset, result);
                }
            }
            _ => {}
        }
    }

    result
}

fn line_locate_along(
    arena: &mut GeometryArena,
    line: GeomId,
    measure: f64,
    offset: f64,
    out: GeomId,
) {
    let vertex_type = arena.vertex_type(line);
    let vertices = arena.vertex_array(line);
    let count = vertices.len();
    if !vertex_type.has_m() || count < 2 {
        return;
    }

    let mut prev = vertex_type.unpack(vertices.xyzm(0));
    for i in 1..count {
        let next = vertex_type.unpack(vertices.xyzm(i));
        let direction = next.xy() - prev.xy();
        let segment_length = direction.norm();
        if segment_length == 0.0 {
            prev = next;
            continue;
        }

        let located = if measure == prev.m {
            Some(prev)
        } else if prev.m < measure && measure < next.m {
            let t = (measure - prev.m) / (next.m - prev.m);
            let mut vertex = lerp(prev, next, t);
            vertex.m = measure;
            Some(vertex)
        } else if i == count - 1 && next.m == measure {
            Some(next)
        } else {
            None
        };

        if let Some(mut vertex) = located {
            apply_offset(&mut vertex, &direction, segment_length, offset);
            let point = push_point(arena, vertex_type, vertex_type.pack(&vertex));
            arena.append_part(out, point);
        }

        prev = next;
    }
}

fn line_locate_between(
    arena: &mut GeometryArena,
    line: GeomId,
    lower: f64,
    upper: f64,
    offset: f64,
    out: GeomId,
) {
    let vertex_type = arena.vertex_type(line);
    let vertices = arena.vertex_array(line);
    let count = vertices.len();
    if !vertex_type.has_m() || lower > upper || count < 2 {
        return;
    }

    let alloc = arena.allocator();
    let width = vertex_type.width();
    let mut run = VertexBuffer::new(alloc, width);

    let mut prev = vertex_type.unpack(vertices.xyzm(0));
    for i in 1..count {
        let next = vertex_type.unpack(vertices.xyzm(i));
        let direction = next.xy() - prev.xy();
        let segment_length = direction.norm();
        if segment_length == 0.0 {
            prev = next;
            continue;
        }

        let push = |run: &mut VertexBuffer, mut vertex: VertexXYZM| {
            apply_offset(&mut vertex, &direction, segment_length, offset);
            run.push(&vertex_type.pack(&vertex));
        };

        if prev.m < lower && next.m > lower {
            let mut entry = lerp(prev, next, (lower - prev.m) / (next.m - prev.m));
            entry.m = lower;
            push(&mut run, entry);
        }

        if prev.m >= lower && prev.m <= upper {
            push(&mut run, prev);
        }

        if prev.m < upper && next.m > upper {
            let mut exit = lerp(prev, next, (upper - prev.m) / (next.m - prev.m));
            exit.m = upper;
            push(&mut run, exit);

            let finished = std::mem::replace(&mut run, VertexBuffer::new(alloc, width));
            append_run(arena, vertex_type, finished, out);
        } else if i == count - 1 && next.m >= lower && next.m <= upper {
            push(&mut run, next);
        }

        prev = next;
    }

    if run.len() > 0 {
        append_run(arena, vertex_type, run, out);
    }
}

fn append_run<'a>(
    arena: &mut GeometryArena<'a>,
    vertex_type: VertexType,
    run: VertexBuffer<'a>,
    out: GeomId,
) {
    let kind = if run.len() == 1 {
        GeometryType::Point
    } else {
        GeometryType::LineString
    };
    let (data, count) = run.finish();
    let part = arena.push_with_vertices(kind, vertex_type.has_z(), vertex_type.has_m(), data, count);
    arena.append_part(out, part);
}

/// Find the segment where the running length of `vertices` reaches `target` and interpolate
/// the raw slots there. Returns the index of the segment's first vertex.
fn vertex_at_length(vertices: &VertexArray, target: f64) -> Option<(usize, VertexXYZM)> {
    let mut length = 0.0;
    let mut prev = vertices.xyzm(0);

    for i in 1..vertices.len() {
        let next = vertices.xyzm(i);
        let segment_length = (next.xy() - prev.xy()).norm();

        if length + segment_length >= target {
            let t = if segment_length > 0.0 {
                (target - length) / segment_length
            } else {
                0.0
            };
            return Some((i - 1, lerp(prev, next, t)));
        }

        length += segment_length;
        prev = next;
    }

    None
}

fn lerp(prev: VertexXYZM, next: VertexXYZM, t: f64) -> VertexXYZM {
    prev + (next - prev) * t
}

/// Move `vertex` `offset` units perpendicular to `direction`, to the right for positive offsets.
fn apply_offset(vertex: &mut VertexXYZM, direction: &VertexXY, length: f64, offset: f64) {
    if offset != 0.0 {
        vertex.x += offset * direction.y / length;
        vertex.y -= offset * direction.x / length;
    }
}

fn is_line_and_point(line: &GeometryRef, point: &GeometryRef) -> bool {
    line.geometry_type() == GeometryType::LineString
        && point.geometry_type() == GeometryType::Point
        && !line.is_empty()
        && !point.is_empty()
}

fn leaf_ids(arena: &GeometryArena, geom: GeomId) -> Vec<GeomId> {
    arena
        .walk(geom, leaf_geometries)
        .filter(|part| !part.is_empty())
        .map(|part| part.id())
        .collect()
}

/// A new POINT referencing the first vertex of `point`.
fn alias_point(arena: &mut GeometryArena, point: GeomId) -> GeomId {
    let data = arena.vertex_array(point).as_bytes();
    arena.push_with_vertices(
        GeometryType::Point,
        arena.has_z(point),
        arena.has_m(point),
        data,
        1,
    )
}

fn alloc_vertices<'a>(
    arena: &GeometryArena<'a>,
    vertex_type: VertexType,
    slots: &[[f64; 4]],
) -> &'a [u8] {
    let mut buffer = VertexBuffer::with_capacity(arena.allocator(), vertex_type.width(), slots.len());
    for values in slots {
        buffer.push(values);
    }
    buffer.finish().0
}

fn push_point(arena: &mut GeometryArena, vertex_type: VertexType, slots: [f64; 4]) -> GeomId {
    let data = alloc_vertices(arena, vertex_type, &[slots]);
    arena.push_with_vertices(
        GeometryType::Point,
        vertex_type.has_z(),
        vertex_type.has_m(),
        data,
        1,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::{from_wkt, to_wkt};
    use approx::assert_relative_eq;
    use bumpalo::Bump;

    #[test]
    fn closed_lines() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let cases = [
            ("LINESTRING(0 0, 1 1, 0 0)", true),
            ("LINESTRING(0 0, 1 1)", false),
            ("LINESTRING(0 0)", false),
            ("LINESTRING EMPTY", false),
            ("LINESTRING Z (0 0 0, 1 1 1, 0 0 1)", false),
            ("MULTILINESTRING((0 0, 1 1, 0 0), (2 2, 3 3, 2 2))", true),
            ("MULTILINESTRING((0 0, 1 1, 0 0), (2 2, 3 3))", false),
            ("MULTILINESTRING EMPTY", false),
            ("POINT(1 1)", false),
        ];
        for (wkt, expected) in cases {
            let geom = from_wkt(&mut arena, wkt).unwrap();
            assert_eq!(arena.get(geom).is_closed(), expected, "{wkt}");
        }
    }

    #[test]
    fn interpolate_point() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let line = from_wkt(&mut arena, "LINESTRING(0 0, 10 0, 10 10)").unwrap();
        let line = arena.get(line);

        assert_eq!(line.line_interpolate_point(0.25), Some(VertexXYZM::new(5.0, 0.0, 0.0, 0.0)));
        assert_eq!(line.line_interpolate_point(-3.0), Some(VertexXYZM::new(0.0, 0.0, 0.0, 0.0)));
        assert_eq!(line.line_interpolate_point(7.0), Some(VertexXYZM::new(10.0, 10.0, 0.0, 0.0)));

        let measured = from_wkt(&mut arena, "LINESTRING M (0 0 0, 10 0 10)").unwrap();
        let vertex = arena.get(measured).line_interpolate_point(0.5).unwrap();
        assert_eq!(vertex, VertexXYZM::new(5.0, 0.0, 0.0, 5.0));

        let single = from_wkt(&mut arena, "LINESTRING(3 4)").unwrap();
        let vertex = arena.get(single).line_interpolate_point(0.5).unwrap();
        assert_eq!(vertex.xy(), VertexXY::new(3.0, 4.0));

        for wkt in ["LINESTRING EMPTY", "POINT(1 1)"] {
            let geom = from_wkt(&mut arena, wkt).unwrap();
            assert!(arena.get(geom).line_interpolate_point(0.5).is_none(), "{wkt}");
        }
    }

    #[test]
    fn interpolate_points_along() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let line = from_wkt(&mut arena, "LINESTRING(0 0, 10 0)").unwrap();

        let points = interpolate_points(&mut arena, line, 0.25);
        assert_eq!(to_wkt(arena.get(points)), "MULTIPOINT (2.5 0,5 0,7.5 0,10 0)");

        let first = interpolate_points(&mut arena, line, 0.0);
        assert_eq!(to_wkt(arena.get(first)), "POINT (0 0)");

        let last = interpolate_points(&mut arena, line, 1.0);
        assert_eq!(to_wkt(arena.get(last)), "POINT (10 0)");

        let flat = from_wkt(&mut arena, "LINESTRING(1 1, 1 1)").unwrap();
        let point = interpolate_points(&mut arena, flat, 0.5);
        assert_eq!(to_wkt(arena.get(point)), "POINT (1 1)");

        let empty = from_wkt(&mut arena, "LINESTRING Z EMPTY").unwrap();
        let point = interpolate_points(&mut arena, empty, 0.5);
        assert_eq!(to_wkt(arena.get(point)), "POINT Z EMPTY");
    }

    #[test]
    fn locate_point_fraction() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let line = from_wkt(&mut arena, "LINESTRING(-1 0, 0 0, 0 1)").unwrap();

        let cases = [
            ("POINT(-1 0)", 0.0),
            ("POINT(-0.5 0)", 0.25),
            ("POINT(0 0)", 0.5),
            ("POINT(0 0.5)", 0.75),
            ("POINT(0 1)", 1.0),
            ("POINT(5 5)", 1.0),
        ];
        for (wkt, expected) in cases {
            let point = from_wkt(&mut arena, wkt).unwrap();
            let fraction = arena.get(line).line_locate_point(&arena.get(point));
            assert_eq!(fraction, Some(expected), "{wkt}");
        }

        let empty = from_wkt(&mut arena, "POINT EMPTY").unwrap();
        assert!(arena.get(line).line_locate_point(&arena.get(empty)).is_none());
    }

    #[test]
    fn interpolate_measure() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let point = from_wkt(&mut arena, "POINT(5 3)").unwrap();

        for wkt in [
            "LINESTRING M (0 0 10, 10 0 20)",
            "LINESTRING ZM (0 0 99 10, 10 0 99 20)",
            "LINESTRING M (0 0 10, 0 0 10, 10 0 20)",
        ] {
            let line = from_wkt(&mut arena, wkt).unwrap();
            let measure = arena.get(line).line_interpolate_measure(&arena.get(point));
            assert_relative_eq!(measure.unwrap(), 15.0);
        }

        let plain = from_wkt(&mut arena, "LINESTRING(0 0, 10 0)").unwrap();
        assert!(arena.get(plain).line_interpolate_measure(&arena.get(point)).is_none());
    }

    #[test]
    fn substrings() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let line = from_wkt(&mut arena, "LINESTRING(0 0, 10 0, 10 10)").unwrap();

        let part = substring(&mut arena, line, 0.25, 0.75);
        assert_eq!(to_wkt(arena.get(part)), "LINESTRING (5 0,10 0,10 5)");

        let part = substring(&mut arena, line, 0.1, 0.2);
        assert_eq!(to_wkt(arena.get(part)), "LINESTRING (2 0,4 0)");

        let point = substring(&mut arena, line, 0.5, 0.5);
        assert_eq!(to_wkt(arena.get(point)), "POINT (10 0)");

        let reversed = substring(&mut arena, line, 0.8, 0.2);
        assert_eq!(to_wkt(arena.get(reversed)), "LINESTRING EMPTY");

        let whole = substring(&mut arena, line, -1.0, 2.0);
        assert_eq!(
            arena.vertex_array(whole).as_bytes().as_ptr(),
            arena.vertex_array(line).as_bytes().as_ptr()
        );

        let empty = from_wkt(&mut arena, "LINESTRING EMPTY").unwrap();
        let point = substring(&mut arena, empty, 0.5, 0.5);
        assert_eq!(to_wkt(arena.get(point)), "POINT EMPTY");
    }

    #[test]
    fn locate_along_measures() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);

        let line = from_wkt(&mut arena, "LINESTRING M (0 0 0, 10 0 10)").unwrap();
        let along = locate_along(&mut arena, line, 5.0, 0.0);
        assert_eq!(to_wkt(arena.get(along)), "MULTIPOINT M (5 0 5)");

        let along = locate_along(&mut arena, line, 5.0, 1.0);
        assert_eq!(to_wkt(arena.get(along)), "MULTIPOINT M (5 -1 5)");

        let along = locate_along(&mut arena, line, 10.0, 0.0);
        assert_eq!(to_wkt(arena.get(along)), "MULTIPOINT M (10 0 10)");

        let points = from_wkt(&mut arena, "MULTIPOINT ZM (1 1 0 3, 2 2 0 4)").unwrap();
        let along = locate_along(&mut arena, points, 4.0, 0.0);
        assert_eq!(to_wkt(arena.get(along)), "MULTIPOINT ZM (2 2 0 4)");

        let plain = from_wkt(&mut arena, "LINESTRING(0 0, 10 0)").unwrap();
        let along = locate_along(&mut arena, plain, 5.0, 0.0);
        assert_eq!(to_wkt(arena.get(along)), "MULTIPOINT EMPTY");
    }

    #[test]
    fn locate_between_measures() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);

        let line = from_wkt(&mut arena, "LINESTRING M (0 0 0, 10 0 10, 20 0 20)").unwrap();
        let between = locate_between(&mut arena, line, 5.0, 15.0, 0.0);
        assert_eq!(
            to_wkt(arena.get(between)),
            "GEOMETRYCOLLECTION M (LINESTRING M (5 0 5,10 0 10,15 0 15))"
        );

        let between = locate_between(&mut arena, line, 12.0, 30.0, 0.0);
        assert_eq!(
            to_wkt(arena.get(between)),
            "GEOMETRYCOLLECTION M (LINESTRING M (12 0 12,20 0 20))"
        );

        let between = locate_between(&mut arena, line, 30.0, 40.0, 0.0);
        assert_eq!(to_wkt(arena.get(between)), "GEOMETRYCOLLECTION M EMPTY");

        let points = from_wkt(&mut arena, "MULTIPOINT M (1 1 1, 2 2 5, 3 3 9)").unwrap();
        let between = locate_between(&mut arena, points, 4.0, 10.0, 0.0);
        assert_eq!(
            to_wkt(arena.get(between)),
            "GEOMETRYCOLLECTION M (POINT M (2 2 5),POINT M (3 3 9))"
        );

        let polygon =
            from_wkt(&mut arena, "POLYGON M ((0 0 0, 0 10 10, 10 10 20, 0 0 30))").unwrap();
        let between = locate_between(&mut arena, polygon, 5.0, 10.0, 0.0);
        assert_eq!(
            to_wkt(arena.get(between)),
            "GEOMETRYCOLLECTION M (LINESTRING M (0 5 5,0 10 10))"
        );
    }

    #[test]
    fn bbox_polygon_is_a_closed_ring() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let polygon = arena.push_bbox_polygon(0.0, 1.0, 2.0, 3.0);
        assert_eq!(
            to_wkt(arena.get(polygon)),
            "POLYGON ((0 1,0 3,2 3,2 1,0 1))"
        );
        let shell = arena.get(polygon).first_part().unwrap();
        assert!(shell.is_closed());
    }
}
