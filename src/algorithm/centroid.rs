use crate::algorithm::measure::MaxSurfaceDimension;
use crate::algorithm::primitives::vertex_array_signed_area;
use crate::geometry::traversal::{lines, points, polygons};
use crate::geometry::{GeometryRef, VertexXYZM};

/// Calculation of the centroid.
///
/// The centroid is computed over the parts of highest dimension only: the area-weighted centroid
/// of the polygons if there are any, otherwise the length-weighted centroid of the lines,
/// otherwise the mean of the points. All four ordinates are averaged with the same weights.
///
/// Returns `None` when the geometry is empty or every part of that dimension is degenerate.
///
/// # Examples
///
/// ```
/// use bumpalo::Bump;
/// use geoarena::algorithm::Centroid;
/// use geoarena::geometry::GeometryArena;
/// use geoarena::io::wkt::from_wkt;
///
/// let bump = Bump::new();
/// let mut arena = GeometryArena::new(&bump);
/// let points = from_wkt(&mut arena, "MULTIPOINT(1 2, 3 4)").unwrap();
///
/// let centroid = arena.get(points).centroid().unwrap();
/// assert_eq!((centroid.x, centroid.y), (2.0, 3.0));
/// ```
pub trait Centroid {
    fn centroid(&self) -> Option<VertexXYZM>;
}

impl Centroid for GeometryRef<'_, '_> {
    fn centroid(&self) -> Option<VertexXYZM> {
        if self.is_empty() {
            return None;
        }
        match self.max_surface_dimension(true)? {
            0 => centroid_from_points(*self),
            1 => centroid_from_linestrings(*self),
            _ => centroid_from_polygons(*self),
        }
    }
}

/// Mean of every non-empty point.
pub fn centroid_from_points(geom: GeometryRef) -> Option<VertexXYZM> {
    let mut sum = VertexXYZM::default();
    let mut count = 0u32;

    for point in geom.walk(points).filter(|point| !point.is_empty()) {
        sum = sum + point.vertex_xyzm(0);
        count += 1;
    }

    (count > 0).then(|| sum / count as f64)
}

/// Segment midpoints weighted by segment length.
pub fn centroid_from_linestrings(geom: GeometryRef) -> Option<VertexXYZM> {
    let mut sum = VertexXYZM::default();
    let mut total_length = 0.0;

    for line in geom.walk(lines).filter(|line| !line.is_empty()) {
        let vertices = line.vertices();
        let mut prev = vertices.xyzm(0);
        for i in 1..vertices.len() {
            let next = vertices.xyzm(i);
            let segment_length = (next.xy() - prev.xy()).norm();

            sum = sum + (next + prev) * segment_length;
            total_length += segment_length;
            prev = next;
        }
    }

    (total_length != 0.0).then(|| sum / 2.0 / total_length)
}

/// Triangle fan centroids around the first shell vertex, weighted by signed area.
///
/// Holes wound the same way as their shell have their contribution negated, so winding order
/// does not matter.
pub fn centroid_from_polygons(geom: GeometryRef) -> Option<VertexXYZM> {
    let mut sum = VertexXYZM::default();
    let mut total_area2 = 0.0;

    for polygon in geom.walk(polygons) {
        let mut base = VertexXYZM::default();

        for (ring_index, ring) in polygon.parts().enumerate() {
            if ring.is_empty() {
                continue;
            }

            let vertices = ring.vertices();
            let is_shell = ring_index == 0;
            let is_clockwise = vertex_array_signed_area(&vertices) >= 0.0;

            if is_shell {
                base = vertices.xyzm(0);
            }

            let sign = if is_shell != is_clockwise { -1.0 } else { 1.0 };

            let mut prev = vertices.xyzm(0);
            for i in 1..vertices.len() {
                let next = vertices.xyzm(i);
                let area2 = (prev.x - base.x) * (next.y - base.y) - (next.x - base.x) * (prev.y - base.y);

                sum = sum + (base + next + prev) * (sign * area2);
                total_area2 += sign * area2;
                prev = next;
            }
        }
    }

    (total_area2 != 0.0).then(|| sum / 3.0 / total_area2)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::GeometryArena;
    use crate::io::wkt::from_wkt;
    use approx::assert_relative_eq;
    use bumpalo::Bump;

    fn centroid_of(wkt: &str) -> Option<VertexXYZM> {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let id = from_wkt(&mut arena, wkt).unwrap();
        arena.get(id).centroid()
    }

    fn assert_centroid(wkt: &str, x: f64, y: f64) {
        let centroid = centroid_of(wkt).unwrap_or_else(|| panic!("no centroid for {wkt}"));
        assert_relative_eq!(centroid.x, x, epsilon = 1e-12);
        assert_relative_eq!(centroid.y, y, epsilon = 1e-12);
    }

    #[test]
    fn points() {
        assert_centroid("POINT(1 2)", 1.0, 2.0);
        assert_centroid("MULTIPOINT(1 2, 3 4)", 2.0, 3.0);
        assert_centroid("MULTIPOINT(0 0, EMPTY, 2 2)", 1.0, 1.0);
    }

    #[test]
    fn lines() {
        assert_centroid("LINESTRING(0 0, 2 0)", 1.0, 0.0);
        assert_centroid("MULTILINESTRING((0 0, 2 0), (0 2, 0 4))", 0.5, 1.5);
        assert!(centroid_of("LINESTRING(1 1, 1 1)").is_none());
    }

    #[test]
    fn polygons() {
        assert_centroid("POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))", 1.0, 1.0);
        assert_centroid("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))", 1.0, 1.0);
        assert_centroid(
            "POLYGON((0 0, 0 4, 4 4, 4 0, 0 0), (0 0, 0 2, 2 2, 2 0, 0 0))",
            7.0 / 3.0,
            7.0 / 3.0,
        );
        assert_centroid(
            "POLYGON((0 0, 0 4, 4 4, 4 0, 0 0), (0 0, 2 0, 2 2, 0 2, 0 0))",
            7.0 / 3.0,
            7.0 / 3.0,
        );
    }

    #[test]
    fn highest_dimension_wins() {
        assert_centroid("GEOMETRYCOLLECTION(POINT(100 100), LINESTRING(3 4, 5 6))", 4.0, 5.0);
        assert_centroid(
            "GEOMETRYCOLLECTION(POINT(100 100), LINESTRING(50 50, 60 60), POLYGON((1 1, 1 3, 3 3, 3 1, 1 1)));",
            2.0,
            2.0,
        );
        assert_centroid("GEOMETRYCOLLECTION(POINT(1 1), LINESTRING EMPTY)", 1.0, 1.0);
    }

    #[test]
    fn empty_has_no_centroid() {
        for wkt in [
            "POINT EMPTY",
            "LINESTRING EMPTY",
            "POLYGON EMPTY",
            "MULTIPOINT EMPTY",
            "GEOMETRYCOLLECTION EMPTY",
            "GEOMETRYCOLLECTION(POINT EMPTY)",
        ] {
            assert!(centroid_of(wkt).is_none(), "{wkt}");
        }
    }

    #[test]
    fn measures_are_averaged() {
        let centroid = centroid_of("MULTIPOINT ZM (0 0 2 10, 2 2 4 20)").unwrap();
        assert_eq!(centroid, VertexXYZM::new(1.0, 1.0, 3.0, 15.0));
    }
}
