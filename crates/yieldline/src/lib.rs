//! Collapse-load analysis of slabs by discontinuity layout optimisation.
//!
//! Given a polygonal slab outline, support conditions, orthotropic yield
//! moments and loads, the crate discretises the slab into an over-connected
//! set of candidate yield-line segments, assembles the kinematic linear
//! program over the active subset, and runs a constraint-generation loop
//! that activates violated candidates until the collapse load factor λ
//! converges. The result is λ plus the yield-line pattern realising it.

pub mod domain;
pub mod error;
pub mod geom;
pub mod solver;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::Error;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::domain::{Domain, Edge, Node, YieldMoments};
    pub use crate::error::Error;
    pub use crate::geom::{EdgeKind, Polygon, Segment, Vec2};
    pub use crate::solver::{
        solve, solve_with_cfg, Collapse, InteriorPoint, LpBackend, LpSolution, SolveCfg, YieldLine,
    };
}
