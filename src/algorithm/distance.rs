//! Minimum Euclidean distance between two geometry trees.

use crate::algorithm::contains::{vertex_in_ring, PointInPolygon};
use crate::algorithm::primitives::{segment_segment_distance, vertex_distance, vertex_segment_distance};
use crate::geometry::traversal::leaf_geometries;
use crate::geometry::{GeometryRef, GeometryType};
use crate::indexed;

/// Minimum Euclidean distance between any two parts of two geometries.
///
/// Every point, linestring and polygon of `self` is compared against every one of `other`.
/// Returns `None` when no pair of non-empty parts exists. An empty geometry has no distance to
/// anything; it is not at distance zero.
///
/// Polygons are treated as areas: a point or line inside a polygon (and outside its holes) is
/// at distance 0. Prepared linestrings, including prepared polygon rings, are searched through
/// their index.
pub trait EuclideanDistance<Rhs = Self> {
    fn euclidean_distance(&self, other: &Rhs) -> Option<f64>;
}

impl<'g, 'a> EuclideanDistance for GeometryRef<'g, 'a> {
    fn euclidean_distance(&self, other: &Self) -> Option<f64> {
        let mut tracker = MinDistance::new();
        for lhs in self.walk(leaf_geometries) {
            for rhs in other.walk(leaf_geometries) {
                if distance_dispatch(lhs, rhs, &mut tracker) {
                    tracker.found = true;
                }
            }
        }
        tracker.result()
    }
}

struct MinDistance {
    distance: f64,
    found: bool,
}

impl MinDistance {
    fn new() -> Self {
        Self {
            distance: f64::INFINITY,
            found: false,
        }
    }

    fn set(&mut self, distance: f64) {
        self.distance = self.distance.min(distance);
    }

    fn result(&self) -> Option<f64> {
        self.found.then_some(self.distance)
    }
}

fn distance_dispatch(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    use GeometryType::*;

    debug_assert!(!lhs.is_multi_geom() && !rhs.is_multi_geom());

    match (lhs.geometry_type(), rhs.geometry_type()) {
        (Point, Point) => distance_point_point(lhs, rhs, result),
        (Point, LineString) => distance_point_lines(lhs, rhs, result),
        (LineString, Point) => distance_point_lines(rhs, lhs, result),
        (Point, Polygon) => distance_point_polygon(lhs, rhs, result),
        (Polygon, Point) => distance_point_polygon(rhs, lhs, result),
        (LineString, LineString) => distance_lines_lines(lhs, rhs, result),
        (LineString, Polygon) => distance_lines_polygon(lhs, rhs, result),
        (Polygon, LineString) => distance_lines_polygon(rhs, lhs, result),
        (Polygon, Polygon) => distance_polygon_polygon(lhs, rhs, result),
        _ => false,
    }
}

fn distance_point_point(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }
    result.set(vertex_distance(&lhs.vertex_xy(0), &rhs.vertex_xy(0)));
    true
}

fn distance_point_lines(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let vertex = lhs.vertex_xy(0);

    if rhs.vertex_count() == 1 {
        result.set(vertex_distance(&vertex, &rhs.vertex_xy(0)));
        return true;
    }

    if rhs.is_prepared() {
        return match indexed::try_get_distance_to_vertex(rhs, &vertex) {
            Some(distance) => {
                result.set(distance);
                true
            }
            None => false,
        };
    }

    for (prev, next) in rhs.vertices().segments_xy() {
        result.set(vertex_segment_distance(&vertex, &prev, &next));
    }
    true
}

fn distance_point_polygon(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let vertex = lhs.vertex_xy(0);
    let mut rings = rhs.parts();
    let Some(shell) = rings.next() else {
        return false;
    };

    match vertex_in_ring(shell, &vertex) {
        PointInPolygon::Exterior => return distance_point_lines(lhs, shell, result),
        PointInPolygon::Interior => {
            // Holes of a valid polygon do not overlap, so at most one can contain the point.
            for hole in rings {
                if vertex_in_ring(hole, &vertex) != PointInPolygon::Exterior {
                    return distance_point_lines(lhs, hole, result);
                }
            }
        }
        PointInPolygon::Boundary | PointInPolygon::Invalid => {}
    }

    result.set(0.0);
    true
}

fn distance_lines_lines(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    if lhs.is_prepared() && rhs.is_prepared() {
        return match indexed::try_get_distance(lhs, rhs) {
            Some(distance) => {
                result.set(distance);
                true
            }
            None => false,
        };
    }

    let lhs_vertices = lhs.vertices();
    let rhs_vertices = rhs.vertices();

    match (lhs_vertices.len(), rhs_vertices.len()) {
        (1, 1) => {
            result.set(vertex_distance(&lhs_vertices.xy(0), &rhs_vertices.xy(0)));
        }
        (1, _) => {
            let vertex = lhs_vertices.xy(0);
            for (prev, next) in rhs_vertices.segments_xy() {
                result.set(vertex_segment_distance(&vertex, &prev, &next));
            }
        }
        (_, 1) => {
            let vertex = rhs_vertices.xy(0);
            for (prev, next) in lhs_vertices.segments_xy() {
                result.set(vertex_segment_distance(&vertex, &prev, &next));
            }
        }
        _ => {
            for (lhs_prev, lhs_next) in lhs_vertices.segments_xy() {
                for (rhs_prev, rhs_next) in rhs_vertices.segments_xy() {
                    result.set(segment_segment_distance(
                        &lhs_prev, &lhs_next, &rhs_prev, &rhs_next,
                    ));
                }
            }
        }
    }

    true
}

fn distance_lines_polygon(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let vertex = lhs.vertex_xy(0);
    let Some(shell) = rhs.first_part() else {
        return false;
    };

    // A line that starts outside the shell is either entirely outside or crosses the shell.
    if vertex_in_ring(shell, &vertex) == PointInPolygon::Exterior {
        return distance_lines_lines(lhs, shell, result);
    }

    let holes = rhs.parts().skip(1);
    for hole in holes.clone() {
        if !distance_lines_lines(lhs, hole, result) {
            return false;
        }
    }

    // Starting inside or on a hole, the hole distance computed above is the answer.
    for hole in holes {
        if vertex_in_ring(hole, &vertex) != PointInPolygon::Exterior {
            return true;
        }
    }

    result.set(0.0);
    true
}

fn distance_polygon_polygon(lhs: GeometryRef, rhs: GeometryRef, result: &mut MinDistance) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }

    let (Some(lhs_shell), Some(rhs_shell)) = (lhs.first_part(), rhs.first_part()) else {
        return false;
    };
    if lhs_shell.is_empty() || rhs_shell.is_empty() {
        return false;
    }

    let lhs_vertex = lhs_shell.vertex_xy(0);
    let rhs_vertex = rhs_shell.vertex_xy(0);

    let lhs_location = vertex_in_ring(rhs_shell, &lhs_vertex);
    let rhs_location = vertex_in_ring(lhs_shell, &rhs_vertex);

    if lhs_location == PointInPolygon::Exterior && rhs_location == PointInPolygon::Exterior {
        return distance_lines_lines(lhs_shell, rhs_shell, result);
    }

    for lhs_hole in lhs.parts().skip(1) {
        if vertex_in_ring(lhs_hole, &rhs_vertex) != PointInPolygon::Exterior {
            return distance_lines_lines(lhs_hole, rhs_shell, result);
        }
    }

    for rhs_hole in rhs.parts().skip(1) {
        if vertex_in_ring(rhs_hole, &lhs_vertex) != PointInPolygon::Exterior {
            return distance_lines_lines(lhs_shell, rhs_hole, result);
        }
    }

    result.set(0.0);
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::GeometryArena;
    use crate::indexed;
    use crate::io::wkt::from_wkt;
    use crate::test::fixtures::{big_donut, big_donut_reversed, geometry_collection};
    use bumpalo::Bump;

    fn distance(lhs: &str, rhs: &str) -> Option<f64> {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let lhs = from_wkt(&mut arena, lhs).unwrap();
        let rhs = from_wkt(&mut arena, rhs).unwrap();
        let forward = arena.get(lhs).euclidean_distance(&arena.get(rhs));
        let backward = arena.get(rhs).euclidean_distance(&arena.get(lhs));
        assert_eq!(forward, backward);
        forward
    }

    /// Compare plain and prepared distances against the expected value.
    fn prepared_distance(lhs: &str, rhs: &str, expected: Option<f64>) {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let lhs = from_wkt(&mut arena, lhs).unwrap();
        let rhs = from_wkt(&mut arena, rhs).unwrap();

        assert_eq!(arena.get(lhs).euclidean_distance(&arena.get(rhs)), expected);

        let lhs_prepared = indexed::make(&mut arena, lhs);
        let rhs_prepared = indexed::make(&mut arena, rhs);
        assert_eq!(
            arena.get(lhs_prepared).euclidean_distance(&arena.get(rhs_prepared)),
            expected
        );
    }

    #[test]
    fn points() {
        assert_eq!(distance("POINT(0 0)", "POINT(3 4)"), Some(5.0));
        assert_eq!(distance("MULTIPOINT(5 5, 10 8)", "MULTIPOINT(8 8, 15 15)"), Some(2.0));
        assert_eq!(distance("POINT(1 2)", "POLYGON((2 2, 2 4, 4 4, 4 2, 2 2))"), Some(1.0));
        assert_eq!(distance("POINT(1 2)", "LINESTRING(0 0, 0 4)"), Some(1.0));
    }

    #[test]
    fn point_inside_polygon() {
        assert_eq!(
            distance("POINT(1 1)", "POLYGON((0 0, 0 4, 4 4, 4 0, 0 0))"),
            Some(0.0)
        );
        assert_eq!(
            distance("POINT(0 1)", "POLYGON((0 0, 0 4, 4 4, 4 0, 0 0))"),
            Some(0.0)
        );
        assert_eq!(
            distance(
                "POINT(1 1)",
                "POLYGON((-1 -1, -1 4, 4 4, 4 -1, -1 -1), (0 0, 0 3, 3 3, 3 0, 0 0))"
            ),
            Some(1.0)
        );
        assert_eq!(
            distance(
                "POINT(2 2)",
                "POLYGON((0 0, 0 4, 4 4, 4 0, 0 0), (1 1, 1 3, 3 3, 3 1, 1 1))"
            ),
            Some(1.0)
        );
    }

    #[test]
    fn lines() {
        assert_eq!(distance("LINESTRING(0 0, 0 10)", "LINESTRING(3 0, 3 10)"), Some(3.0));
        assert_eq!(distance("LINESTRING(0 0, 10 10)", "LINESTRING(0 10, 10 0)"), Some(0.0));
        assert_eq!(distance("LINESTRING(1 1)", "LINESTRING(1 3)"), Some(2.0));
        assert_eq!(distance("LINESTRING(1 1, 1 2)", "LINESTRING(1 3)"), Some(1.0));
    }

    #[test]
    fn line_and_polygon() {
        let polygon = "POLYGON((0 0, 0 10, 10 10, 10 0, 0 0), (2 2, 2 8, 8 8, 8 2, 2 2))";
        assert_eq!(distance("LINESTRING(12 0, 12 10)", polygon), Some(2.0));
        assert_eq!(distance("LINESTRING(1 1, 1 9)", polygon), Some(0.0));
        assert_eq!(distance("LINESTRING(4 4, 6 6)", polygon), Some(2.0));
        assert_eq!(distance("LINESTRING(-5 5, 5 5)", polygon), Some(0.0));
    }

    #[test]
    fn polygons() {
        let square = "POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))";
        assert_eq!(distance(square, "POLYGON((5 0, 5 2, 7 2, 7 0, 5 0))"), Some(3.0));
        assert_eq!(distance(square, "POLYGON((1 1, 1 3, 3 3, 3 1, 1 1))"), Some(0.0));
        assert_eq!(distance(square, "POLYGON((-5 -5, -5 5, 5 5, 5 -5, -5 -5))"), Some(0.0));
        assert_eq!(
            distance(
                "POLYGON((4 4, 4 5, 5 5, 5 4, 4 4))",
                "POLYGON((-10 -10, -10 10, 10 10, 10 -10, -10 -10), (-1 -1, -1 1, 1 1, 1 -1, -1 -1), (0 0, 0 9, 9 9, 9 0, 0 0))"
            ),
            Some(4.0)
        );
    }

    #[test]
    fn empty_and_invalid_have_no_distance() {
        assert_eq!(distance("POINT EMPTY", "POINT(1 1)"), None);
        assert_eq!(distance("POINT EMPTY", "POINT EMPTY"), None);
        assert_eq!(distance("GEOMETRYCOLLECTION EMPTY", "POLYGON((0 0, 0 1, 1 1, 0 0))"), None);
        assert_eq!(distance("LINESTRING EMPTY", "LINESTRING(0 0, 1 1)"), None);
        assert_eq!(distance("GEOMETRYCOLLECTION(POINT EMPTY, POINT(3 4))", "POINT(0 0)"), Some(5.0));
    }

    #[test]
    fn prepared_agrees_with_plain() {
        for donut in [big_donut(), big_donut_reversed()] {
            prepared_distance(donut, "POINT(0.5 0.5)", Some(0.0));
            prepared_distance("POINT(15 0)", donut, Some(5.0));
            prepared_distance(donut, "POINT(5 5)", Some(4.0));
            prepared_distance("POINT(2 10)", donut, Some(0.0));
            prepared_distance(donut, "POINT(9 5)", Some(0.0));
        }

        let line_a = "LINESTRING(0 0, 0 10, 10 10, 10 0)";
        let line_b = "LINESTRING(0 5, 5 5, 5 10, 10 10)";
        prepared_distance(line_a, line_b, Some(0.0));
        prepared_distance(line_b, line_a, Some(0.0));

        let line_c = "LINESTRING(0 0, 0 5, 0 10)";
        let line_d = "LINESTRING(5 0, 5 10)";
        prepared_distance(line_c, line_d, Some(5.0));
        prepared_distance(line_d, line_c, Some(5.0));

        prepared_distance("LINESTRING(1 1)", "LINESTRING(1 3)", Some(2.0));
        prepared_distance("LINESTRING(0 0, 0 0)", "LINESTRING(3 0, 3 0)", Some(3.0));
        prepared_distance("LINESTRING(0 0)", "LINESTRING(3 -1, 3 1)", Some(3.0));
        prepared_distance("MULTILINESTRING((3 -1, 3 1), (9 9))", "LINESTRING(0 0, 0 0)", Some(3.0));

        prepared_distance(geometry_collection(), "POINT(0 0)", Some(0.0));
        prepared_distance("POINT(5 5)", geometry_collection(), Some(0.0));
    }
}
