//! Defines [`GeoArenaError`], representing all errors returned by this crate.

use std::fmt::Debug;

use thiserror::Error;

use crate::io::wkb::WkbError;
use crate::io::wkt::WktError;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoArenaError {
    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// WKB error
    #[error("WKB error: {0}")]
    Wkb(#[from] WkbError),

    /// WKT error
    #[error("WKT error: {0}")]
    Wkt(#[from] WktError),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoArenaError>;
