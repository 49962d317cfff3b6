use std::io::Cursor;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use log::debug;

use crate::geometry::GeometryType;
use crate::io::wkb::WkbError;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Byte order marker at the start of every WKB geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    BigEndian,
    LittleEndian,
}

impl From<u8> for Endianness {
    fn from(value: u8) -> Self {
        match value {
            0 => Endianness::BigEndian,
            _ => Endianness::LittleEndian,
        }
    }
}

impl From<Endianness> for u8 {
    fn from(value: Endianness) -> Self {
        use Endianness::*;
        match value {
            BigEndian => 0,
            LittleEndian => 1,
        }
    }
}

/// ISO type code for a geometry kind and dimension: `kind + 1000 * z + 2000 * m`.
pub fn iso_type_code(kind: GeometryType, has_z: bool, has_m: bool) -> u32 {
    u8::from(kind) as u32 + 1000 * has_z as u32 + 2000 * has_m as u32
}

/// A decoded geometry header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WkbHeader {
    pub order: Endianness,
    pub type_id: u32,
    /// Base type code, `(type_id & 0xffff) % 1000`.
    pub code: u32,
    pub has_z: bool,
    pub has_m: bool,
    pub srid: Option<u32>,
}

impl WkbHeader {
    /// The geometry kind, if it is one we read.
    pub fn geometry_type(&self) -> Result<GeometryType, WkbError> {
        match self.code {
            1..=7 => GeometryType::try_from(self.code as u8).map_err(|_| self.unsupported()),
            _ => Err(self.unsupported()),
        }
    }

    pub fn unsupported(&self) -> WkbError {
        WkbError::UnsupportedType {
            type_id: self.type_id,
            srid: self.srid.unwrap_or(0),
        }
    }

    /// Number of doubles per vertex.
    pub fn dims(&self) -> usize {
        2 + self.has_z as usize + self.has_m as usize
    }
}

/// Read a byte order marker, type code and optional SRID.
///
/// Both the ISO (`/ 1000`) and the extended (high bit) dimension conventions are honored.
pub(crate) fn read_header(reader: &mut Cursor<&[u8]>) -> Result<WkbHeader, WkbError> {
    let order = Endianness::from(reader.read_u8().map_err(|_| WkbError::OutOfBounds)?);
    let type_id = read_u32(reader, order)?;

    let low = type_id & 0xffff;
    let flags = low / 1000;
    let iso_z = flags == 1 || flags == 3;
    let iso_m = flags == 2 || flags == 3;
    let ewkb_z = type_id & EWKB_Z != 0;
    let ewkb_m = type_id & EWKB_M != 0;

    if (iso_z || iso_m) && (ewkb_z || ewkb_m) && (iso_z != ewkb_z || iso_m != ewkb_m) {
        debug!("WKB type id {type_id} signals disagreeing Z/M flags, using their union");
    }

    let srid = if type_id & EWKB_SRID != 0 {
        Some(read_u32(reader, order)?)
    } else {
        None
    };

    Ok(WkbHeader {
        order,
        type_id,
        code: low % 1000,
        has_z: iso_z || ewkb_z,
        has_m: iso_m || ewkb_m,
        srid,
    })
}

pub(crate) fn read_u32(reader: &mut Cursor<&[u8]>, order: Endianness) -> Result<u32, WkbError> {
    match order {
        Endianness::LittleEndian => reader.read_u32::<LittleEndian>(),
        Endianness::BigEndian => reader.read_u32::<BigEndian>(),
    }
    .map_err(|_| WkbError::OutOfBounds)
}

/// Borrow the next `len` bytes of the input and advance past them.
pub(crate) fn take_bytes<'a>(
    reader: &mut Cursor<&'a [u8]>,
    len: usize,
) -> Result<&'a [u8], WkbError> {
    let buf: &'a [u8] = *reader.get_ref();
    let start = reader.position() as usize;
    let end = start.checked_add(len).ok_or(WkbError::OutOfBounds)?;
    if end > buf.len() {
        return Err(WkbError::OutOfBounds);
    }
    reader.set_position(end as u64);
    Ok(&buf[start..end])
}

/// Read the `index`th double of `bytes`.
pub(crate) fn read_f64_at(bytes: &[u8], index: usize, order: Endianness) -> f64 {
    let chunk = &bytes[index * 8..];
    match order {
        Endianness::LittleEndian => LittleEndian::read_f64(chunk),
        Endianness::BigEndian => BigEndian::read_f64(chunk),
    }
}

/// Byte length of `count` vertices of `dims` doubles, or `OutOfBounds` on overflow.
pub(crate) fn vertex_bytes(count: u32, dims: usize) -> Result<usize, WkbError> {
    (count as usize)
        .checked_mul(dims * 8)
        .ok_or(WkbError::OutOfBounds)
}

#[cfg(test)]
mod test {
    use super::*;

    fn header(bytes: &[u8]) -> Result<WkbHeader, WkbError> {
        read_header(&mut Cursor::new(bytes))
    }

    #[test]
    fn iso_and_extended_flags() {
        let h = header(&[1, 0xE9, 0x03, 0, 0]).unwrap();
        assert_eq!(h.code, 1);
        assert!(h.has_z && !h.has_m);
        assert_eq!(h.dims(), 3);

        let h = header(&[0, 0x40, 0, 0, 2]).unwrap();
        assert_eq!(h.order, Endianness::BigEndian);
        assert!(!h.has_z && h.has_m);
        assert_eq!(h.geometry_type().unwrap(), GeometryType::LineString);

        // Disagreeing conventions are merged.
        let h = header(&[1, 0xE9, 0x03, 0, 0x40]).unwrap();
        assert!(h.has_z && h.has_m);
    }

    #[test]
    fn srid() {
        let h = header(&[1, 3, 0, 0, 0x20, 0xE6, 0x10, 0, 0]).unwrap();
        assert_eq!(h.srid, Some(4326));
        assert_eq!(h.geometry_type().unwrap(), GeometryType::Polygon);

        assert_eq!(
            header(&[1, 3, 0, 0, 0x20, 0xE6]).unwrap_err(),
            WkbError::OutOfBounds
        );
    }

    #[test]
    fn unsupported_codes() {
        let h = header(&[1, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            h.geometry_type().unwrap_err(),
            WkbError::UnsupportedType { type_id: 0, srid: 0 }
        );
        let h = header(&[1, 17, 0, 0, 0]).unwrap();
        assert!(h.geometry_type().is_err());
    }

    #[test]
    fn type_codes() {
        assert_eq!(iso_type_code(GeometryType::Point, false, false), 1);
        assert_eq!(iso_type_code(GeometryType::Polygon, true, false), 1003);
        assert_eq!(iso_type_code(GeometryType::MultiPoint, false, true), 2004);
        assert_eq!(
            iso_type_code(GeometryType::GeometryCollection, true, true),
            3007
        );
    }
}
