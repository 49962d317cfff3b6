use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use crate::geometry::GeometryType;
use crate::io::wkb::reader::MAX_STACK_DEPTH;

/// Errors returned by the WKB reader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WkbError {
    #[error("{}", unsupported_type_message(.type_id, .srid))]
    UnsupportedType { type_id: u32, srid: u32 },

    #[error("Out of bounds read (is the WKB corrupt?)")]
    OutOfBounds,

    #[error("Recursion limit '{0}' reached")]
    RecursionLimit(usize),

    #[error("Mixed Z and M values are not allowed")]
    MixedZM,

    #[error("Invalid child type: {child} in {parent}")]
    InvalidChildType {
        parent: GeometryType,
        child: GeometryType,
    },
}

/// Status codes of the WKB reader, one per [`WkbError`] variant plus `Ok`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum WkbErrorKind {
    Ok = 0,
    UnsupportedType = 1,
    OutOfBounds = 2,
    RecursionLimit = 3,
    MixedZM = 4,
    InvalidChildType = 5,
}

impl WkbError {
    pub fn kind(&self) -> WkbErrorKind {
        match self {
            WkbError::UnsupportedType { .. } => WkbErrorKind::UnsupportedType,
            WkbError::OutOfBounds => WkbErrorKind::OutOfBounds,
            WkbError::RecursionLimit(_) => WkbErrorKind::RecursionLimit,
            WkbError::MixedZM => WkbErrorKind::MixedZM,
            WkbError::InvalidChildType { .. } => WkbErrorKind::InvalidChildType,
        }
    }

    pub(crate) fn recursion_limit() -> Self {
        WkbError::RecursionLimit(MAX_STACK_DEPTH)
    }
}

/// Best-effort name of a base type code, including the curve and surface types we do not read.
fn guess_type_name(code: u32) -> &'static str {
    match code {
        1 => "POINT",
        2 => "LINESTRING",
        3 => "POLYGON",
        4 => "MULTIPOINT",
        5 => "MULTILINESTRING",
        6 => "MULTIPOLYGON",
        7 => "GEOMETRYCOLLECTION",
        8 => "CIRCULARSTRING",
        9 => "COMPOUNDCURVE",
        10 => "CURVEPOLYGON",
        11 => "MULTICURVE",
        12 => "MULTISURFACE",
        13 => "CURVE",
        14 => "SURFACE",
        15 => "POLYHEDRALSURFACE",
        16 => "TIN",
        17 => "TRIANGLE",
        18 => "CIRCLE",
        19 => "GEODESICSTRING",
        20 => "ELLIPTICALCURVE",
        21 => "NURBSCURVE",
        22 => "CLOTHOID",
        23 => "SPIRALCURVE",
        24 => "COMPOUNDSURFACE",
        25 => "ORIENTABLESURFACE",
        102 => "AFFINEPLACEMENT",
        _ => "UNKNOWN",
    }
}

fn unsupported_type_message(type_id: &u32, srid: &u32) -> String {
    let (type_id, srid) = (*type_id, *srid);
    let low = type_id & 0xffff;
    let flags = low / 1000;
    let has_z = flags == 1 || flags == 3 || type_id & 0x8000_0000 != 0;
    let has_m = flags == 2 || flags == 3 || type_id & 0x4000_0000 != 0;
    let suffix = match (has_z, has_m) {
        (true, true) => " ZM",
        (true, false) => " Z",
        (false, true) => " M",
        (false, false) => "",
    };
    format!(
        "WKB type '{}{}' is not supported! (type id: {}, SRID: {})",
        guess_type_name(low % 1000),
        suffix,
        type_id,
        srid
    )
}
