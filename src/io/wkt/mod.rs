//! Reading and writing geometries as Well-Known Text.

mod reader;
mod writer;

pub use reader::{WktError, WktErrorReason, WktReader};
pub use writer::{to_wkt, write_wkt};

use crate::error::Result;
use crate::geometry::{GeomId, GeometryArena};

/// Parse `text` into `arena`, returning the root node.
///
/// ```
/// use bumpalo::Bump;
/// use geoarena::geometry::GeometryArena;
/// use geoarena::io::wkt::{from_wkt, to_wkt};
///
/// let bump = Bump::new();
/// let mut arena = GeometryArena::new(&bump);
/// let geom = from_wkt(&mut arena, "multipoint z ((1 2 3), (4 5 6))").unwrap();
/// assert_eq!(to_wkt(arena.get(geom)), "MULTIPOINT Z (1 2 3,4 5 6)");
///
/// let err = from_wkt(&mut arena, "POINT (1 2").unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "WKT error: Expected character: ')' at position '10' near: 'POINT (1 2'|<---"
/// );
/// ```
pub fn from_wkt(arena: &mut GeometryArena<'_>, text: &str) -> Result<GeomId> {
    Ok(WktReader::new(text).try_parse(arena)?)
}
