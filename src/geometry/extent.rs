use crate::geometry::{VertexXY, VertexXYZM};

/// An axis-aligned bounding box in XY.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtentXY {
    pub min: VertexXY,
    pub max: VertexXY,
}

impl ExtentXY {
    pub fn new(min: VertexXY, max: VertexXY) -> Self {
        Self { min, max }
    }

    /// An inverted box that any vertex expands, used to seed accumulation.
    pub fn smallest() -> Self {
        Self {
            min: VertexXY::new(f64::MAX, f64::MAX),
            max: VertexXY::new(f64::MIN, f64::MIN),
        }
    }

    pub fn zero() -> Self {
        Self {
            min: VertexXY::default(),
            max: VertexXY::default(),
        }
    }

    pub fn update(&mut self, vertex: &VertexXY) {
        self.min.x = self.min.x.min(vertex.x);
        self.min.y = self.min.y.min(vertex.y);
        self.max.x = self.max.x.max(vertex.x);
        self.max.y = self.max.y.max(vertex.y);
    }

    pub fn merge(&mut self, other: &ExtentXY) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    pub fn contains(&self, vertex: &VertexXY) -> bool {
        self.min.x <= vertex.x
            && self.max.x >= vertex.x
            && self.min.y <= vertex.y
            && self.max.y >= vertex.y
    }

    pub fn intersects(&self, other: &ExtentXY) -> bool {
        !(self.min.x > other.max.x
            || self.max.x < other.min.x
            || self.min.y > other.max.y
            || self.max.y < other.min.y)
    }

    /// Distance from the box to a vertex, 0 when the vertex is inside.
    pub fn distance_to(&self, vertex: &VertexXY) -> f64 {
        self.distance_to_sq(vertex).sqrt()
    }

    pub fn distance_to_sq(&self, vertex: &VertexXY) -> f64 {
        if self.contains(vertex) {
            return 0.0;
        }
        let dx = (self.min.x - vertex.x).max(vertex.x - self.max.x).max(0.0);
        let dy = (self.min.y - vertex.y).max(vertex.y - self.max.y).max(0.0);
        dx * dx + dy * dy
    }

    /// Squared gap between two boxes, 0 when they overlap.
    pub fn extent_distance_sq(&self, other: &ExtentXY) -> f64 {
        let dx = (self.min.x - other.max.x)
            .max(other.min.x - self.max.x)
            .max(0.0);
        let dy = (self.min.y - other.max.y)
            .max(other.min.y - self.max.y)
            .max(0.0);
        dx * dx + dy * dy
    }

    pub fn extent_distance(&self, other: &ExtentXY) -> f64 {
        self.extent_distance_sq(other).sqrt()
    }

    /// Upper bound on the squared distance from `vertex` to the nearest geometry inside the box.
    ///
    /// Every edge of a tight bounding box touches the enclosed geometry, so the nearest point can
    /// be no farther than the far corner of the closest edge.
    pub fn min_max_distance_sq(&self, vertex: &VertexXY) -> f64 {
        let dx_min = (vertex.x - self.min.x).abs();
        let dx_max = (vertex.x - self.max.x).abs();
        let dy_min = (vertex.y - self.min.y).abs();
        let dy_max = (vertex.y - self.max.y).abs();

        let far_x = dx_min.max(dx_max);
        let far_y = dy_min.max(dy_max);

        let near_x = dx_min.min(dx_max);
        let near_y = dy_min.min(dy_max);

        (near_x * near_x + far_y * far_y).min(far_x * far_x + near_y * near_y)
    }

    /// Area of the box, 0 for degenerate boxes.
    pub fn area(&self) -> f64 {
        if self.min.x >= self.max.x || self.min.y >= self.max.y {
            return 0.0;
        }
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }
}

impl Default for ExtentXY {
    fn default() -> Self {
        Self::smallest()
    }
}

/// An axis-aligned bounding box over all four ordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtentXYZM {
    pub min: VertexXYZM,
    pub max: VertexXYZM,
}

impl ExtentXYZM {
    pub fn smallest() -> Self {
        Self {
            min: VertexXYZM::new(f64::MAX, f64::MAX, f64::MAX, f64::MAX),
            max: VertexXYZM::new(f64::MIN, f64::MIN, f64::MIN, f64::MIN),
        }
    }

    pub fn zero() -> Self {
        Self {
            min: VertexXYZM::default(),
            max: VertexXYZM::default(),
        }
    }

    pub fn update(&mut self, vertex: &VertexXYZM) {
        self.min.x = self.min.x.min(vertex.x);
        self.min.y = self.min.y.min(vertex.y);
        self.min.z = self.min.z.min(vertex.z);
        self.min.m = self.min.m.min(vertex.m);
        self.max.x = self.max.x.max(vertex.x);
        self.max.y = self.max.y.max(vertex.y);
        self.max.z = self.max.z.max(vertex.z);
        self.max.m = self.max.m.max(vertex.m);
    }

    pub fn xy(&self) -> ExtentXY {
        ExtentXY::new(self.min.xy(), self.max.xy())
    }
}

impl Default for ExtentXYZM {
    fn default() -> Self {
        Self::smallest()
    }
}
