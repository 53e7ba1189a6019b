//! Candidate discontinuities and their kinematics.

use crate::geom::{EdgeKind, Segment, Vec2};

/// Orthotropic plastic moment capacities per unit length: sagging (+) and
/// hogging (−) about each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YieldMoments {
    pub pos_x: f64,
    pub neg_x: f64,
    pub pos_y: f64,
    pub neg_y: f64,
}

impl Default for YieldMoments {
    fn default() -> Self {
        YieldMoments::isotropic(1.0)
    }
}

impl YieldMoments {
    pub fn new(pos_x: f64, neg_x: f64, pos_y: f64, neg_y: f64) -> Self {
        YieldMoments {
            pos_x,
            neg_x,
            pos_y,
            neg_y,
        }
    }

    pub fn isotropic(mp: f64) -> Self {
        YieldMoments::new(mp, mp, mp, mp)
    }
}

/// A candidate yield-line segment between two nodes of the domain.
///
/// Invariants:
/// - `n1`, `n2` are 1-based node ids; the unordered pair is unique among
///   `added` edges.
/// - `seg` caches the node coordinates at creation (nodes never move).
/// - `mp_pos`/`mp_neg` are the raw moments resolved onto the edge direction
///   `(c, s)`: `Mp = Mp_x c^2 + Mp_y s^2`.
#[derive(Clone, Debug)]
pub struct Edge {
    pub n1: usize,
    pub n2: usize,
    pub kind: EdgeKind,
    pub length: f64,
    pub moments: YieldMoments,
    pub mp_pos: f64,
    pub mp_neg: f64,
    pub seg: Segment,
    pub yield_ratio: f64,
    pub added: bool,
    pub removable: bool,
    pub delete: bool,
    /// Cached tributary load vector (normal, tangential, area); populated
    /// once by the parallel precomputation pass.
    pub udl: Option<[f64; 3]>,
}

impl Edge {
    pub fn new(n1: usize, n2: usize, kind: EdgeKind, p1: Vec2, p2: Vec2, moments: YieldMoments) -> Self {
        let length = (p2 - p1).norm();
        let v = (p2 - p1) / length;
        let (c, s) = (v.x, v.y);
        Edge {
            n1,
            n2,
            kind,
            length,
            moments,
            mp_pos: moments.pos_x * c * c + moments.pos_y * s * s,
            mp_neg: moments.neg_x * c * c + moments.neg_y * s * s,
            seg: Segment::new(p1, p2),
            yield_ratio: 0.0,
            added: false,
            removable: false,
            delete: false,
            udl: None,
        }
    }

    /// Kinematic variables carried by this edge.
    #[inline]
    pub fn dof(&self) -> usize {
        self.kind.dof()
    }

    /// Whether the edge gets plastic multipliers in the collapse LP.
    #[inline]
    pub fn yields(&self) -> bool {
        self.kind.yields()
    }

    #[inline]
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        (self.seg.p1(), self.seg.p2())
    }

    /// 6x3 compatibility matrix mapping (φn, φt, δ) to the global
    /// (x, y, rotation) components at the two end nodes; rows 0–2 are the
    /// `n1` block, rows 3–5 the `n2` block.
    ///
    /// With `apply_bc`, the tangential-rotation and displacement columns of
    /// restrained edges are suppressed.
    pub fn compatibility(&self, apply_bc: bool) -> [[f64; 3]; 6] {
        let v = self.seg.dir();
        let (c, s) = (v.x, v.y);
        let half = self.length / 2.0;
        let mut m = [
            [c, -s, 0.0],
            [s, c, 0.0],
            [0.0, half, 1.0],
            [-c, s, 0.0],
            [-s, -c, 0.0],
            [0.0, half, -1.0],
        ];
        if apply_bc && !self.kind.unrestrained() {
            for row in &mut m {
                row[1] = 0.0;
                row[2] = 0.0;
            }
        }
        m
    }
}
