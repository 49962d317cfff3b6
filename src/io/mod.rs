//! Reader and writer implementations of the interchange formats.

pub mod wkb;
pub mod wkt;
