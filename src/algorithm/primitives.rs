//! Fast floating-point building blocks shared by the measurement, containment and distance
//! algorithms. None of these are robust against rounding; they classify exact coincidences only.

use crate::geometry::{ExtentXY, VertexArray, VertexXY};

/// Orientation of the triplet `(p, q, r)`: 0 when collinear, positive when the turn is
/// counter-clockwise, negative when clockwise.
pub fn orient2d_fast(p: &VertexXY, q: &VertexXY, r: &VertexXY) -> i32 {
    let det_l = (p.x - r.x) * (q.y - r.y);
    let det_r = (p.y - r.y) * (q.x - r.x);
    let det = det_l - det_r;
    (det > 0.0) as i32 - (det < 0.0) as i32
}

/// How a rightward horizontal ray from a vertex interacts with one ring segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Raycast {
    None,
    Cross,
    Boundary,
}

/// Classify the ray from `vertex` against the segment `prev -> next`.
///
/// Shared vertices and points on horizontal segments are reported as [`Raycast::Boundary`].
pub fn raycast_fast(prev: &VertexXY, next: &VertexXY, vertex: &VertexXY) -> Raycast {
    if prev.x < vertex.x && next.x < vertex.x {
        return Raycast::None;
    }

    if next.x == vertex.x && next.y == vertex.y {
        return Raycast::Boundary;
    }

    if prev.y == vertex.y && next.y == vertex.y {
        let (min_x, max_x) = if prev.x <= next.x {
            (prev.x, next.x)
        } else {
            (next.x, prev.x)
        };
        if vertex.x >= min_x && vertex.x <= max_x {
            return Raycast::Boundary;
        }
        return Raycast::None;
    }

    if (prev.y > vertex.y && next.y <= vertex.y) || (next.y > vertex.y && prev.y <= vertex.y) {
        let mut sign = orient2d_fast(prev, next, vertex);
        if sign == 0 {
            return Raycast::Boundary;
        }
        if next.y < prev.y {
            sign = -sign;
        }
        if sign > 0 {
            return Raycast::Cross;
        }
    }

    Raycast::None
}

pub fn vertex_distance_sq(lhs: &VertexXY, rhs: &VertexXY) -> f64 {
    (*lhs - *rhs).norm_sq()
}

pub fn vertex_distance(lhs: &VertexXY, rhs: &VertexXY) -> f64 {
    vertex_distance_sq(lhs, rhs).sqrt()
}

/// Squared distance from `p` to the segment `a -> b`.
pub fn vertex_segment_distance_sq(p: &VertexXY, a: &VertexXY, b: &VertexXY) -> f64 {
    let ab = *b - *a;
    let ap = *p - *a;

    let ab_len_sq = ab.norm_sq();
    if ab_len_sq == 0.0 {
        return ap.norm_sq();
    }

    let t = (ap.dot(&ab) / ab_len_sq).clamp(0.0, 1.0);
    let projected = *a + ab * t;
    (*p - projected).norm_sq()
}

/// Distance from `p` to the segment `a -> b`.
pub fn vertex_segment_distance(p: &VertexXY, a: &VertexXY, b: &VertexXY) -> f64 {
    vertex_segment_distance_sq(p, a, b).sqrt()
}

fn endpoint_distance(a: &VertexXY, b: &VertexXY, c: &VertexXY, d: &VertexXY) -> f64 {
    let dist_a = vertex_segment_distance(a, c, d);
    let dist_b = vertex_segment_distance(b, c, d);
    let dist_c = vertex_segment_distance(c, a, b);
    let dist_d = vertex_segment_distance(d, a, b);
    dist_a.min(dist_b).min(dist_c.min(dist_d))
}

/// Distance between the segments `a -> b` and `c -> d`, 0 when they intersect.
pub fn segment_segment_distance(a: &VertexXY, b: &VertexXY, c: &VertexXY, d: &VertexXY) -> f64 {
    if a == b {
        return vertex_segment_distance(a, c, d);
    }
    if c == d {
        return vertex_segment_distance(c, a, b);
    }

    let denominator = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if denominator == 0.0 {
        // Parallel.
        return endpoint_distance(a, b, c, d);
    }

    let r = (a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y);
    let s = (a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y);

    let r_norm = r / denominator;
    let s_norm = s / denominator;

    if !(0.0..=1.0).contains(&r_norm) || !(0.0..=1.0).contains(&s_norm) {
        return endpoint_distance(a, b, c, d);
    }

    0.0
}

/// Whether `p` lies inside the bounding box of the segment `q -> r`.
fn within_segment_bounds(p: &VertexXY, q: &VertexXY, r: &VertexXY) -> bool {
    p.x >= q.x.min(r.x) && p.x <= q.x.max(r.x) && p.y >= q.y.min(r.y) && p.y <= q.y.max(r.y)
}

/// Whether the closed segments `a1 -> a2` and `b1 -> b2` share at least one point.
pub fn segment_intersects(a1: &VertexXY, a2: &VertexXY, b1: &VertexXY, b2: &VertexXY) -> bool {
    let a_is_point = a1 == a2;
    let b_is_point = b1 == b2;

    if a_is_point && b_is_point {
        return a1 == b1;
    }
    if a_is_point {
        return orient2d_fast(b1, b2, a1) == 0 && within_segment_bounds(a1, b1, b2);
    }
    if b_is_point {
        return orient2d_fast(a1, a2, b1) == 0 && within_segment_bounds(b1, a1, a2);
    }

    let o1 = orient2d_fast(a1, a2, b1);
    let o2 = orient2d_fast(a1, a2, b2);
    let o3 = orient2d_fast(b1, b2, a1);
    let o4 = orient2d_fast(b1, b2, a2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && within_segment_bounds(b1, a1, a2))
        || (o2 == 0 && within_segment_bounds(b2, a1, a2))
        || (o3 == 0 && within_segment_bounds(a1, b1, b2))
        || (o4 == 0 && within_segment_bounds(a2, b1, b2))
}

/// Squared distance between two segments, 0 when they intersect.
pub fn segment_segment_distance_sq(
    a1: &VertexXY,
    a2: &VertexXY,
    b1: &VertexXY,
    b2: &VertexXY,
) -> f64 {
    if segment_intersects(a1, a2, b1, b2) {
        return 0.0;
    }
    vertex_segment_distance_sq(a1, b1, b2)
        .min(vertex_segment_distance_sq(a2, b1, b2))
        .min(vertex_segment_distance_sq(b1, a1, a2).min(vertex_segment_distance_sq(b2, a1, a2)))
}

/// Bounding box of a single segment.
pub fn segment_extent(a: &VertexXY, b: &VertexXY) -> ExtentXY {
    ExtentXY::new(
        VertexXY::new(a.x.min(b.x), a.y.min(b.y)),
        VertexXY::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Sum of segment lengths.
pub fn vertex_array_length(vertices: &VertexArray) -> f64 {
    vertices
        .segments_xy()
        .map(|(prev, next)| vertex_distance(&prev, &next))
        .sum()
}

/// Shoelace area of a ring, positive for clockwise rings. Rings with fewer than 3 vertices have
/// no area.
///
/// Coordinates are taken relative to the first x to keep the products small.
pub fn vertex_array_signed_area(vertices: &VertexArray) -> f64 {
    let count = vertices.len();
    if count < 3 {
        return 0.0;
    }

    let x0 = vertices.ordinate(0, 0);
    let mut area = 0.0;
    for i in 1..count - 1 {
        let x1 = vertices.ordinate(i, 0);
        let y1 = vertices.ordinate(i + 1, 1);
        let y2 = vertices.ordinate(i - 1, 1);
        area += (x1 - x0) * (y2 - y1);
    }
    area * 0.5
}

#[cfg(test)]
mod test {
    use super::*;

    fn v(x: f64, y: f64) -> VertexXY {
        VertexXY::new(x, y)
    }

    #[test]
    fn orientation() {
        assert_eq!(orient2d_fast(&v(0.0, 0.0), &v(1.0, 1.0), &v(2.0, 2.0)), 0);
        assert_eq!(orient2d_fast(&v(0.0, 0.0), &v(1.0, 0.0), &v(0.0, 1.0)), 1);
        assert_eq!(orient2d_fast(&v(0.0, 0.0), &v(0.0, 1.0), &v(1.0, 0.0)), -1);
    }

    #[test]
    fn raycast_cases() {
        let vertex = v(1.0, 1.0);
        // Segment left of the vertex.
        assert_eq!(raycast_fast(&v(0.0, 0.0), &v(0.0, 2.0), &vertex), Raycast::None);
        // Segment right of the vertex, straddling its y.
        assert_eq!(raycast_fast(&v(2.0, 0.0), &v(2.0, 2.0), &vertex), Raycast::Cross);
        assert_eq!(raycast_fast(&v(2.0, 2.0), &v(2.0, 0.0), &vertex), Raycast::Cross);
        // Shared vertex.
        assert_eq!(raycast_fast(&v(0.0, 0.0), &v(1.0, 1.0), &vertex), Raycast::Boundary);
        // Horizontal segment through the vertex.
        assert_eq!(raycast_fast(&v(0.0, 1.0), &v(3.0, 1.0), &vertex), Raycast::Boundary);
        assert_eq!(raycast_fast(&v(2.0, 1.0), &v(3.0, 1.0), &vertex), Raycast::None);
        // Vertex on a sloped segment.
        assert_eq!(raycast_fast(&v(0.0, 0.0), &v(2.0, 2.0), &vertex), Raycast::Boundary);
    }

    #[test]
    fn segment_distances() {
        assert_eq!(vertex_segment_distance(&v(0.0, 1.0), &v(-1.0, 0.0), &v(1.0, 0.0)), 1.0);
        assert_eq!(vertex_segment_distance(&v(3.0, 0.0), &v(-1.0, 0.0), &v(1.0, 0.0)), 2.0);
        assert_eq!(vertex_segment_distance(&v(3.0, 4.0), &v(0.0, 0.0), &v(0.0, 0.0)), 5.0);

        // Crossing.
        assert_eq!(
            segment_segment_distance(&v(0.0, 0.0), &v(2.0, 2.0), &v(0.0, 2.0), &v(2.0, 0.0)),
            0.0
        );
        // Parallel.
        assert_eq!(
            segment_segment_distance(&v(0.0, 0.0), &v(2.0, 0.0), &v(0.0, 1.0), &v(2.0, 1.0)),
            1.0
        );
        // Skew, apart.
        assert_eq!(
            segment_segment_distance(&v(0.0, 0.0), &v(1.0, 0.0), &v(3.0, -1.0), &v(3.0, 1.0)),
            2.0
        );
        // Degenerate first segment.
        assert_eq!(
            segment_segment_distance(&v(1.0, 6.0), &v(1.0, 6.0), &v(1.0, 2.0), &v(1.0, 4.0)),
            2.0
        );
    }

    #[test]
    fn intersections() {
        assert!(segment_intersects(&v(0.0, 0.0), &v(2.0, 2.0), &v(0.0, 2.0), &v(2.0, 0.0)));
        // Touching at an endpoint.
        assert!(segment_intersects(&v(0.0, 0.0), &v(1.0, 1.0), &v(1.0, 1.0), &v(2.0, 0.0)));
        // Collinear, overlapping.
        assert!(segment_intersects(&v(0.0, 0.0), &v(2.0, 0.0), &v(1.0, 0.0), &v(3.0, 0.0)));
        // Collinear, disjoint.
        assert!(!segment_intersects(&v(0.0, 0.0), &v(1.0, 0.0), &v(2.0, 0.0), &v(3.0, 0.0)));
        // Point on segment.
        assert!(segment_intersects(&v(1.0, 0.0), &v(1.0, 0.0), &v(0.0, 0.0), &v(2.0, 0.0)));
        assert!(!segment_intersects(&v(1.0, 1.0), &v(1.0, 1.0), &v(0.0, 0.0), &v(2.0, 0.0)));

        assert_eq!(
            segment_segment_distance_sq(&v(0.0, 0.0), &v(1.0, 0.0), &v(3.0, -1.0), &v(3.0, 1.0)),
            4.0
        );
    }
}
