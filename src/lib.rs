//! An arena-allocated geometry kernel.
//!
//! Geometries are trees of nodes stored in a [`GeometryArena`]. Vertex data lives in blocks
//! handed out by an [`Allocator`](alloc::Allocator), by default a [`bumpalo::Bump`], so a
//! whole batch of geometries is released at once when the arena and allocator are dropped.
//!
//! Geometries are read from and written to WKT ([`io::wkt`]) and WKB ([`io::wkb`]). Read-only
//! algorithms are traits implemented on [`GeometryRef`], and [`indexed`] adds a prepared
//! bounding-box hierarchy for repeated distance and containment queries against one shape.
//!
//! ```
//! use bumpalo::Bump;
//! use geoarena::algorithm::{Area, EuclideanDistance};
//! use geoarena::io::wkt::from_wkt;
//! use geoarena::GeometryArena;
//!
//! let bump = Bump::new();
//! let mut arena = GeometryArena::new(&bump);
//! let square = from_wkt(&mut arena, "POLYGON((0 0, 0 2, 2 2, 2 0, 0 0))").unwrap();
//! let point = from_wkt(&mut arena, "POINT(5 2)").unwrap();
//!
//! assert_eq!(arena.get(square).unsigned_area(), 4.0);
//! assert_eq!(arena.get(square).euclidean_distance(&arena.get(point)), Some(3.0));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use geometry::{GeomId, GeometryArena, GeometryRef};

pub mod algorithm;
pub mod alloc;
pub mod error;
pub mod geometry;
pub mod indexed;
pub mod io;
