use std::ops::Mul;

use crate::geometry::{VertexXY, VertexXYZM};

/// A 3D affine transform stored as the top three rows of a row-major 4x4 matrix.
///
/// ```text
/// | a b c xoff |
/// | d e f yoff |
/// | g h i zoff |
/// | 0 0 0 1    |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineMatrix {
    pub v: [f64; 16],
}

impl AffineMatrix {
    pub fn identity() -> Self {
        let mut v = [0.0; 16];
        v[0] = 1.0;
        v[5] = 1.0;
        v[10] = 1.0;
        v[15] = 1.0;
        Self { v }
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        let mut result = Self::identity();
        result.v[3] = x;
        result.v[7] = y;
        result.v[11] = z;
        result
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        let mut result = Self::identity();
        result.v[0] = x;
        result.v[5] = y;
        result.v[10] = z;
        result
    }

    /// Rotation about the x axis, `angle` in radians.
    pub fn rotate_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut result = Self::identity();
        result.v[5] = c;
        result.v[6] = -s;
        result.v[9] = s;
        result.v[10] = c;
        result
    }

    /// Rotation about the y axis, `angle` in radians.
    pub fn rotate_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut result = Self::identity();
        result.v[0] = c;
        result.v[2] = s;
        result.v[8] = -s;
        result.v[10] = c;
        result
    }

    /// Rotation about the z axis, `angle` in radians.
    pub fn rotate_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut result = Self::identity();
        result.v[0] = c;
        result.v[1] = -s;
        result.v[4] = s;
        result.v[5] = c;
        result
    }

    pub fn translate_scale(x: f64, y: f64, z: f64, sx: f64, sy: f64, sz: f64) -> Self {
        let mut result = Self::identity();
        result.v[0] = sx;
        result.v[5] = sy;
        result.v[10] = sz;
        result.v[3] = x;
        result.v[7] = y;
        result.v[11] = z;
        result
    }

    pub fn apply_xy(&self, vertex: &VertexXY) -> VertexXY {
        let v = &self.v;
        VertexXY::new(
            v[0] * vertex.x + v[1] * vertex.y + v[3],
            v[4] * vertex.x + v[5] * vertex.y + v[7],
        )
    }

    /// Transform x, y and z. The measure passes through untouched.
    pub fn apply_xyz(&self, vertex: &VertexXYZM) -> VertexXYZM {
        let v = &self.v;
        VertexXYZM::new(
            v[0] * vertex.x + v[1] * vertex.y + v[2] * vertex.z + v[3],
            v[4] * vertex.x + v[5] * vertex.y + v[6] * vertex.z + v[7],
            v[8] * vertex.x + v[9] * vertex.y + v[10] * vertex.z + v[11],
            vertex.m,
        )
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Composition: `(a * b).apply(p) == a.apply(b.apply(p))`.
impl Mul for AffineMatrix {
    type Output = AffineMatrix;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut v = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                v[row * 4 + col] = (0..4)
                    .map(|k| self.v[row * 4 + k] * rhs.v[k * 4 + col])
                    .sum();
            }
        }
        AffineMatrix { v }
    }
}
