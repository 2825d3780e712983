// polytess: sweep-line polygon tessellation
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

mod dict;
pub mod error;
pub mod geom;
pub mod mesh;
mod priorityq;
pub mod sink;
mod sweep;
pub mod tess;

pub use error::{TessError, UsageError};
pub use mesh::{FaceClass, Mesh};
pub use sink::{CombineCall, Primitive, PrimitiveBuffer, PrimitiveKind, PrimitiveSink};
pub use tess::{
    tessellate_contours, Tessellator, TessellatorOptions, WindingRule, MAX_CACHE_SIZE, MAX_COORD,
};
