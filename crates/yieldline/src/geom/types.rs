//! Basic 2D types and tolerances shared by the geometric kernel.
//!
//! - `Vec2`: the point/vector type (a nalgebra `Vector2<f64>`).
//! - Tolerance constants: `EPS` for point coincidence and containment,
//!   `EPS_INTERSECT` for segment-intersection parameters, `EPS_NODE_SQ` for
//!   squared-distance node deduplication.
//! - `EdgeKind`: boundary-condition tag carried by polygon edges and
//!   discontinuities.

/// 2D point / vector.
pub type Vec2 = nalgebra::Vector2<f64>;

/// General geometric tolerance: point coincidence, containment tests,
/// direction comparison.
pub const EPS: f64 = 1e-9;

/// Tolerance for segment-intersection parameters (cross products and the
/// [0,1] range checks). Intentionally tighter than `EPS`: intersection
/// parameters are compared at 1.1e-11 while point coincidence stays at 1e-9.
pub const EPS_INTERSECT: f64 = 1.1e-11;

/// Squared-distance threshold for node and vertex deduplication.
pub const EPS_NODE_SQ: f64 = 1e-20;

/// 2D cross product (scalar): `a.x * b.y - a.y * b.x`.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Unit vector in the direction of `v`; no-op when `|v| <= EPS`.
#[inline]
pub fn unit(v: Vec2) -> Vec2 {
    let l = v.norm();
    if l > EPS {
        v / l
    } else {
        v
    }
}

/// Component-wise tolerance equality of two points.
#[inline]
pub fn near(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
}

/// Support / boundary condition of an edge.
///
/// The integer codes are the persisted on-disk encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Free,
    Symmetry,
    Fixed,
    SimpleAnchored,
    SimpleNonanchored,
    KnifeAnchored,
    KnifeUnanchored,
    Internal,
}

impl EdgeKind {
    /// Decode the persisted integer tag.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(EdgeKind::Free),
            1 => Some(EdgeKind::Symmetry),
            2 => Some(EdgeKind::Fixed),
            3 => Some(EdgeKind::SimpleAnchored),
            4 => Some(EdgeKind::SimpleNonanchored),
            5 => Some(EdgeKind::KnifeAnchored),
            6 => Some(EdgeKind::KnifeUnanchored),
            7 => Some(EdgeKind::Internal),
            _ => None,
        }
    }

    /// Persisted integer tag.
    pub fn code(self) -> u32 {
        match self {
            EdgeKind::Free => 0,
            EdgeKind::Symmetry => 1,
            EdgeKind::Fixed => 2,
            EdgeKind::SimpleAnchored => 3,
            EdgeKind::SimpleNonanchored => 4,
            EdgeKind::KnifeAnchored => 5,
            EdgeKind::KnifeUnanchored => 6,
            EdgeKind::Internal => 7,
        }
    }

    /// Kinematic degrees of freedom of a discontinuity of this kind:
    /// 3 (normal rotation, tangential rotation, transverse displacement)
    /// when unrestrained, 1 (normal rotation only) otherwise.
    #[inline]
    pub fn dof(self) -> usize {
        if self.unrestrained() {
            3
        } else {
            1
        }
    }

    /// Free and symmetry edges carry all three kinematic variables.
    #[inline]
    pub fn unrestrained(self) -> bool {
        matches!(self, EdgeKind::Free | EdgeKind::Symmetry)
    }

    /// Whether the edge is assigned plastic multipliers (a yield-balance
    /// row) in the collapse LP.
    #[inline]
    pub fn yields(self) -> bool {
        !matches!(self, EdgeKind::Free | EdgeKind::SimpleAnchored)
    }
}
