//! Reading and writing geometries encoded as Well-Known Binary.
//!
//! The reader accepts both byte orders, ISO and extended (high bit) dimension flags and an
//! optional SRID. The writer always produces little-endian ISO WKB.

pub(crate) mod common;
mod error;
mod reader;
mod writer;

pub use common::{iso_type_code, Endianness};
pub use error::{WkbError, WkbErrorKind};
pub use reader::{WkbReader, WkbReaderOptions, WkbStats, MAX_STACK_DEPTH};
pub use writer::{geometry_wkb_size, write_geometry_as_wkb};

use crate::error::Result;
use crate::geometry::{GeomId, GeometryArena, GeometryRef};

/// Parse `buf` into `arena` with the given options.
///
/// ```
/// use bumpalo::Bump;
/// use geoarena::geometry::{GeometryArena, GeometryType};
/// use geoarena::io::wkb::{from_wkb, to_wkb, WkbReaderOptions};
/// use geoarena::io::wkt::from_wkt;
///
/// let bump = Bump::new();
/// let mut arena = GeometryArena::new(&bump);
/// let line = from_wkt(&mut arena, "LINESTRING (0 0, 3 4)").unwrap();
/// let buf = to_wkb(arena.get(line)).unwrap();
///
/// let parsed = from_wkb(&mut arena, &buf, WkbReaderOptions::default()).unwrap();
/// assert_eq!(arena.geometry_type(parsed), GeometryType::LineString);
/// assert_eq!(arena.vertex_count(parsed), 2);
/// ```
pub fn from_wkb<'a>(
    arena: &mut GeometryArena<'a>,
    buf: &'a [u8],
    options: WkbReaderOptions,
) -> Result<GeomId> {
    Ok(WkbReader::with_options(options).try_parse(arena, buf)?)
}

/// Encode `geom` as little-endian ISO WKB.
pub fn to_wkb(geom: GeometryRef) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(geometry_wkb_size(geom));
    write_geometry_as_wkb(&mut buf, geom)?;
    Ok(buf)
}
