//! 2D geometric kernel: points, segments, polygons.
//!
//! Purpose
//! - Provide the small set of primitives the slab discretiser is built on,
//!   with explicit tolerances (`EPS`, `EPS_INTERSECT`, `EPS_NODE_SQ`) and
//!   no hidden state.
//!
//! Why this design
//! - Every operation the discretiser relies on (overlap detection, exterior
//!   culling, tributary-area clipping) reduces to segment intersection plus
//!   the directed-line clip walk, so those two live here and everything
//!   above is bookkeeping.

mod poly;
mod segment;
mod types;

pub use poly::Polygon;
pub use segment::{colinear, intersect, Segment};
pub use types::{cross, near, unit, EdgeKind, Vec2, EPS, EPS_INTERSECT, EPS_NODE_SQ};

#[cfg(test)]
mod tests;
