use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::geometry::VertexXYZM;

/// The kind of a geometry node.
///
/// The discriminants match the WKB base type codes, so a parsed type code maps directly onto a
/// variant via `TryFrom<u8>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum GeometryType {
    /// Placeholder for a node that has not been typed yet.
    Invalid = 0,
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryType {
    /// Whether nodes of this kind hold a list of child parts rather than a vertex array.
    pub fn is_multi_part(&self) -> bool {
        matches!(
            self,
            GeometryType::Polygon
                | GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
        )
    }

    /// Whether nodes of this kind hold whole geometries as children.
    pub fn is_multi_geom(&self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint
                | GeometryType::MultiLineString
                | GeometryType::MultiPolygon
                | GeometryType::GeometryCollection
        )
    }

    /// Upper-case WKT keyword for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Invalid => "INVALID",
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }
}

impl Default for GeometryType {
    fn default() -> Self {
        GeometryType::Invalid
    }
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The layout of a single vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum VertexType {
    XY = 0,
    XYZ = 1,
    XYM = 2,
    XYZM = 3,
}

impl VertexType {
    pub fn new(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => VertexType::XY,
            (true, false) => VertexType::XYZ,
            (false, true) => VertexType::XYM,
            (true, true) => VertexType::XYZM,
        }
    }

    pub fn has_z(&self) -> bool {
        matches!(self, VertexType::XYZ | VertexType::XYZM)
    }

    pub fn has_m(&self) -> bool {
        matches!(self, VertexType::XYM | VertexType::XYZM)
    }

    /// Byte width of one vertex of this layout.
    pub fn width(&self) -> usize {
        std::mem::size_of::<f64>() * (2 + self.has_z() as usize + self.has_m() as usize)
    }

    /// Name the ordinates of a raw slot, as read by [`VertexArray::xyzm`].
    ///
    /// Only XYM slots differ: their measure is stored third.
    ///
    /// [`VertexArray::xyzm`]: crate::geometry::VertexArray::xyzm
    pub fn unpack(&self, raw: VertexXYZM) -> VertexXYZM {
        match self {
            VertexType::XYM => VertexXYZM::new(raw.x, raw.y, 0.0, raw.z),
            _ => raw,
        }
    }

    /// Lay out named ordinates in slot order. The inverse of [`VertexType::unpack`].
    pub fn pack(&self, vertex: &VertexXYZM) -> [f64; 4] {
        match self {
            VertexType::XYM => [vertex.x, vertex.y, vertex.m, 0.0],
            _ => vertex.to_array(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn type_codes() {
        assert_eq!(GeometryType::try_from(3u8).unwrap(), GeometryType::Polygon);
        assert!(GeometryType::try_from(8u8).is_err());
        assert_eq!(u8::from(GeometryType::GeometryCollection), 7);
    }

    #[test]
    fn multi_part_kinds() {
        assert!(!GeometryType::Invalid.is_multi_part());
        assert!(!GeometryType::LineString.is_multi_part());
        assert!(GeometryType::Polygon.is_multi_part());
        assert!(!GeometryType::Polygon.is_multi_geom());
        assert!(GeometryType::GeometryCollection.is_multi_geom());
    }

    #[test]
    fn vertex_widths() {
        assert_eq!(VertexType::new(false, false).width(), 16);
        assert_eq!(VertexType::new(true, false).width(), 24);
        assert_eq!(VertexType::new(false, true).width(), 24);
        assert_eq!(VertexType::new(true, true).width(), 32);
        assert_eq!(u8::from(VertexType::XYM), 2);
    }

    #[test]
    fn measure_moves_to_third_slot() {
        let raw = VertexXYZM::new(1.0, 2.0, 3.0, 0.0);
        let named = VertexType::XYM.unpack(raw);
        assert_eq!(named, VertexXYZM::new(1.0, 2.0, 0.0, 3.0));
        assert_eq!(VertexType::XYM.pack(&named), [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(VertexType::XYZ.unpack(raw), raw);
    }
}
