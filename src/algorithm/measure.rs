//! Scalar measurements over whole geometry trees.

use crate::algorithm::primitives::{vertex_array_length, vertex_array_signed_area};
use crate::geometry::traversal::{lines, polygons, vertex_arrays, Step};
use crate::geometry::{ExtentXY, ExtentXYZM, GeometryRef, GeometryType};

/// Unsigned planar area of every polygon in a geometry.
///
/// Each polygon contributes the area of its shell minus the areas of its holes. Everything that
/// is not a polygon has no area.
///
/// # Examples
///
/// ```
/// use bumpalo::Bump;
/// use geoarena::algorithm::Area;
/// use geoarena::geometry::GeometryArena;
/// use geoarena::io::wkt::from_wkt;
///
/// let bump = Bump::new();
/// let mut arena = GeometryArena::new(&bump);
/// let polygon = from_wkt(
///     &mut arena,
///     "POLYGON((1 1, 1 3, 3 3, 3 1, 1 1), (2 2, 2 2.5, 2.5 2.5, 2.5 2, 2 2))",
/// )
/// .unwrap();
///
/// assert_eq!(arena.get(polygon).unsigned_area(), 3.75);
/// ```
pub trait Area {
    fn unsigned_area(&self) -> f64;
}

impl Area for GeometryRef<'_, '_> {
    fn unsigned_area(&self) -> f64 {
        self.walk(polygons)
            .map(|polygon| {
                let mut rings = polygon.parts();
                let Some(shell) = rings.next() else {
                    return 0.0;
                };
                let shell_area = vertex_array_signed_area(&shell.vertices()).abs();
                rings.fold(shell_area, |area, hole| {
                    area - vertex_array_signed_area(&hole.vertices()).abs()
                })
            })
            .sum()
    }
}

/// Sum of the Euclidean segment lengths of every linestring in a geometry.
///
/// Polygon rings are not counted; see [`Perimeter`].
pub trait EuclideanLength {
    fn euclidean_length(&self) -> f64;
}

impl EuclideanLength for GeometryRef<'_, '_> {
    fn euclidean_length(&self) -> f64 {
        self.walk(lines)
            .map(|line| vertex_array_length(&line.vertices()))
            .sum()
    }
}

/// Sum of the ring lengths, shells and holes, of every polygon in a geometry.
pub trait Perimeter {
    fn perimeter(&self) -> f64;
}

impl Perimeter for GeometryRef<'_, '_> {
    fn perimeter(&self) -> f64 {
        self.walk(polygons)
            .flat_map(|polygon| polygon.parts())
            .map(|ring| vertex_array_length(&ring.vertices()))
            .sum()
    }
}

/// Number of vertices stored anywhere in a geometry, polygon rings included.
pub trait VertexCount {
    fn total_vertex_count(&self) -> u32;
}

impl VertexCount for GeometryRef<'_, '_> {
    fn total_vertex_count(&self) -> u32 {
        self.walk(vertex_arrays)
            .map(|part| part.vertex_count())
            .sum()
    }
}

/// Accumulate the bounding box of every vertex in a geometry.
///
/// The extent is expanded, not replaced, so callers can seed it with
/// [`ExtentXY::smallest`] and fold several geometries into one box. The return value is the
/// number of vertices visited; zero means the extent was left untouched.
pub trait TotalExtent {
    fn total_extent_xy(&self, extent: &mut ExtentXY) -> u32;

    fn total_extent_xyzm(&self, extent: &mut ExtentXYZM) -> u32;
}

impl TotalExtent for GeometryRef<'_, '_> {
    fn total_extent_xy(&self, extent: &mut ExtentXY) -> u32 {
        let mut count = 0;
        for part in self.walk(vertex_arrays) {
            let vertices = part.vertices();
            for vertex in vertices.iter_xy() {
                extent.update(&vertex);
            }
            count += vertices.len() as u32;
        }
        count
    }

    fn total_extent_xyzm(&self, extent: &mut ExtentXYZM) -> u32 {
        let mut count = 0;
        for part in self.walk(vertex_arrays) {
            let vertices = part.vertices();
            for vertex in vertices.iter_xyzm() {
                extent.update(&vertex);
            }
            count += vertices.len() as u32;
        }
        count
    }
}

/// Highest topological dimension present in a geometry.
pub trait MaxSurfaceDimension {
    /// 0 for points, 1 for lines, 2 for polygons, or `None` if nothing qualifies.
    ///
    /// With `ignore_empty`, empty parts do not count.
    fn max_surface_dimension(&self, ignore_empty: bool) -> Option<u8>;
}

impl MaxSurfaceDimension for GeometryRef<'_, '_> {
    fn max_surface_dimension(&self, ignore_empty: bool) -> Option<u8> {
        self.walk(|kind| match kind {
            GeometryType::GeometryCollection => Step::Descend,
            GeometryType::Invalid => Step::Skip,
            _ => Step::Yield,
        })
        .filter(|part| !(ignore_empty && part.is_empty()))
        .filter_map(|part| match part.geometry_type() {
            GeometryType::Point | GeometryType::MultiPoint => Some(0),
            GeometryType::LineString | GeometryType::MultiLineString => Some(1),
            GeometryType::Polygon | GeometryType::MultiPolygon => Some(2),
            GeometryType::GeometryCollection | GeometryType::Invalid => None,
        })
        .max()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{GeometryArena, VertexXY, VertexXYZM};
    use crate::io::wkt::from_wkt;
    use approx::assert_relative_eq;
    use bumpalo::Bump;

    fn with_geometry<R>(wkt: &str, f: impl FnOnce(GeometryRef) -> R) -> R {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let id = from_wkt(&mut arena, wkt).unwrap();
        f(arena.get(id))
    }

    #[test]
    fn length() {
        let cases = [
            ("POINT(1 2)", 0.0),
            ("LINESTRING(1 1, 1 3, 3 3)", 4.0),
            ("MULTILINESTRING((0 0, 3 4), (0 0, 0 1))", 6.0),
            ("GEOMETRYCOLLECTION(LINESTRING(0 0, 0 2), POLYGON((0 0, 0 5, 5 5, 0 0)))", 2.0),
            ("LINESTRING EMPTY", 0.0),
        ];
        for (wkt, expected) in cases {
            with_geometry(wkt, |geom| assert_eq!(geom.euclidean_length(), expected, "{wkt}"));
        }
    }

    #[test]
    fn area() {
        let cases = [
            ("POINT(1 2)", 0.0),
            ("LINESTRING(1 1, 1 3, 3 3)", 0.0),
            ("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))", 1.0),
            ("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))", 1.0),
            (
                "POLYGON((1 1, 1 3, 3 3, 3 1, 1 1), (2 2, 2 2.5, 2.5 2.5, 2.5 2, 2 2))",
                3.75,
            ),
            (
                "MULTIPOLYGON(((0 0, 0 1, 1 1, 1 0, 0 0)), ((5 5, 5 7, 7 7, 7 5, 5 5)))",
                5.0,
            ),
            ("POLYGON EMPTY", 0.0),
            ("POLYGON((0 0, 1 1, 0 0))", 0.0),
        ];
        for (wkt, expected) in cases {
            with_geometry(wkt, |geom| assert_eq!(geom.unsigned_area(), expected, "{wkt}"));
        }
    }

    #[test]
    fn perimeter() {
        with_geometry(
            "POLYGON((0 0, 0 4, 4 4, 4 0, 0 0), (1 1, 1 2, 2 2, 2 1, 1 1))",
            |geom| assert_eq!(geom.perimeter(), 20.0),
        );
        with_geometry("LINESTRING(0 0, 0 4)", |geom| assert_eq!(geom.perimeter(), 0.0));
        with_geometry(
            "GEOMETRYCOLLECTION(POLYGON((0 0, 0 1, 1 1, 1 0, 0 0)), MULTIPOLYGON(((0 0, 0 2, 2 2, 2 0, 0 0))))",
            |geom| assert_relative_eq!(geom.perimeter(), 12.0),
        );
    }

    #[test]
    fn vertex_count() {
        let cases = [
            ("POINT(1 2)", 1),
            ("POINT EMPTY", 0),
            ("LINESTRING(1 1, 1 3, 3 3)", 3),
            ("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0), (0.2 0.2, 0.2 0.4, 0.4 0.4, 0.2 0.2))", 9),
            ("MULTIPOINT(1 1, 2 2, 3 3)", 3),
            ("GEOMETRYCOLLECTION(POINT(1 1), LINESTRING(0 0, 1 1), GEOMETRYCOLLECTION EMPTY)", 3),
        ];
        for (wkt, expected) in cases {
            with_geometry(wkt, |geom| assert_eq!(geom.total_vertex_count(), expected, "{wkt}"));
        }
    }

    #[test]
    fn extent_xy() {
        with_geometry("MULTIPOINT(1 5, -2 3, 4 -1)", |geom| {
            let mut extent = ExtentXY::smallest();
            assert_eq!(geom.total_extent_xy(&mut extent), 3);
            assert_eq!(extent.min, VertexXY::new(-2.0, -1.0));
            assert_eq!(extent.max, VertexXY::new(4.0, 5.0));
        });

        with_geometry("POINT EMPTY", |geom| {
            let mut extent = ExtentXY::smallest();
            assert_eq!(geom.total_extent_xy(&mut extent), 0);
            assert_eq!(extent, ExtentXY::smallest());
        });
    }

    #[test]
    fn extent_xyzm() {
        with_geometry("LINESTRING ZM (1 2 3 4, 5 6 7 8)", |geom| {
            let mut extent = ExtentXYZM::smallest();
            assert_eq!(geom.total_extent_xyzm(&mut extent), 2);
            assert_eq!(extent.min, VertexXYZM::new(1.0, 2.0, 3.0, 4.0));
            assert_eq!(extent.max, VertexXYZM::new(5.0, 6.0, 7.0, 8.0));
        });

        // The measure of an XYM vertex occupies the third slot.
        with_geometry("POINT M (1 2 3)", |geom| {
            let mut extent = ExtentXYZM::smallest();
            assert_eq!(geom.total_extent_xyzm(&mut extent), 1);
            assert_eq!(extent.min, VertexXYZM::new(1.0, 2.0, 3.0, 0.0));
        });
    }

    #[test]
    fn surface_dimension() {
        let cases = [
            ("POINT(1 1)", true, Some(0)),
            ("MULTILINESTRING((0 0, 1 1))", true, Some(1)),
            ("GEOMETRYCOLLECTION(POINT(1 1), POLYGON((0 0, 0 1, 1 1, 0 0)))", true, Some(2)),
            ("GEOMETRYCOLLECTION(POINT(1 1), POLYGON EMPTY)", true, Some(0)),
            ("GEOMETRYCOLLECTION(POINT(1 1), POLYGON EMPTY)", false, Some(2)),
            ("GEOMETRYCOLLECTION EMPTY", false, None),
            ("POINT EMPTY", true, None),
        ];
        for (wkt, ignore_empty, expected) in cases {
            with_geometry(wkt, |geom| {
                assert_eq!(geom.max_surface_dimension(ignore_empty), expected, "{wkt}")
            });
        }
    }
}
