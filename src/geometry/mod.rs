//! The geometry tree and the value types that live inside it.

mod affine;
mod arena;
mod extent;
pub mod traversal;
mod types;
mod vertex;

pub use affine::AffineMatrix;
pub use arena::{GeomId, GeometryArena, GeometryRef, Parts};
pub use extent::{ExtentXY, ExtentXYZM};
pub use traversal::{Step, Walk};
pub use types::{GeometryType, VertexType};
pub use vertex::{VertexArray, VertexXY, VertexXYZM};
