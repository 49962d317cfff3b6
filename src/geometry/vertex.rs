use std::ops::{Add, Div, Mul, Sub};

use byteorder::{ByteOrder, LittleEndian};

/// A two-dimensional vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexXY {
    pub x: f64,
    pub y: f64,
}

impl VertexXY {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    pub fn dot(&self, other: &VertexXY) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for VertexXY {
    type Output = VertexXY;

    fn add(self, rhs: Self) -> Self::Output {
        VertexXY::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for VertexXY {
    type Output = VertexXY;

    fn sub(self, rhs: Self) -> Self::Output {
        VertexXY::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for VertexXY {
    type Output = VertexXY;

    fn mul(self, rhs: f64) -> Self::Output {
        VertexXY::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for VertexXY {
    type Output = VertexXY;

    fn div(self, rhs: f64) -> Self::Output {
        VertexXY::new(self.x / rhs, self.y / rhs)
    }
}

/// A four-dimensional vertex. Absent dimensions read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VertexXYZM {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m: f64,
}

impl VertexXYZM {
    pub fn new(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self { x, y, z, m }
    }

    pub fn xy(&self) -> VertexXY {
        VertexXY::new(self.x, self.y)
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.m]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

impl Add for VertexXYZM {
    type Output = VertexXYZM;

    fn add(self, rhs: Self) -> Self::Output {
        VertexXYZM::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.m + rhs.m,
        )
    }
}

impl Sub for VertexXYZM {
    type Output = VertexXYZM;

    fn sub(self, rhs: Self) -> Self::Output {
        VertexXYZM::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.m - rhs.m,
        )
    }
}

impl Mul<f64> for VertexXYZM {
    type Output = VertexXYZM;

    fn mul(self, rhs: f64) -> Self::Output {
        VertexXYZM::new(self.x * rhs, self.y * rhs, self.z * rhs, self.m * rhs)
    }
}

impl Div<f64> for VertexXYZM {
    type Output = VertexXYZM;

    fn div(self, rhs: f64) -> Self::Output {
        VertexXYZM::new(self.x / rhs, self.y / rhs, self.z / rhs, self.m / rhs)
    }
}

/// A read-only view over a packed little-endian vertex array.
///
/// Each vertex occupies `width` bytes: x and y, followed by z and/or m when present.
#[derive(Clone, Copy, Debug)]
pub struct VertexArray<'a> {
    data: &'a [u8],
    count: u32,
    width: usize,
}

impl<'a> VertexArray<'a> {
    pub fn new(data: &'a [u8], count: u32, width: usize) -> Self {
        debug_assert!(data.len() >= count as usize * width);
        Self { data, count, width }
    }

    pub fn empty(width: usize) -> Self {
        Self {
            data: &[],
            count: 0,
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The raw bytes backing this array.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.data[..self.count as usize * self.width]
    }

    pub fn xy(&self, index: usize) -> VertexXY {
        debug_assert!(index < self.len());
        let offset = index * self.width;
        VertexXY::new(
            LittleEndian::read_f64(&self.data[offset..]),
            LittleEndian::read_f64(&self.data[offset + 8..]),
        )
    }

    /// Read the first `width` bytes of a slot into a four-value vertex, zero-padding the rest.
    ///
    /// An XYM vertex therefore carries its measure in the `z` slot.
    pub fn xyzm(&self, index: usize) -> VertexXYZM {
        debug_assert!(index < self.len());
        let offset = index * self.width;
        let mut values = [0.0; 4];
        for (i, value) in values.iter_mut().enumerate().take(self.width / 8) {
            *value = LittleEndian::read_f64(&self.data[offset + i * 8..]);
        }
        VertexXYZM::from_array(values)
    }

    /// Read a single ordinate of a vertex.
    pub fn ordinate(&self, index: usize, ordinate: usize) -> f64 {
        debug_assert!(ordinate * 8 < self.width);
        LittleEndian::read_f64(&self.data[index * self.width + ordinate * 8..])
    }

    pub fn iter_xy(&self) -> impl Iterator<Item = VertexXY> + 'a {
        let array = *self;
        (0..array.len()).map(move |i| array.xy(i))
    }

    pub fn iter_xyzm(&self) -> impl Iterator<Item = VertexXYZM> + 'a {
        let array = *self;
        (0..array.len()).map(move |i| array.xyzm(i))
    }

    /// Consecutive vertex pairs.
    pub fn segments_xy(&self) -> impl Iterator<Item = (VertexXY, VertexXY)> + 'a {
        let array = *self;
        (1..array.len()).map(move |i| (array.xy(i - 1), array.xy(i)))
    }
}
