//! Polygons over an ordered vertex ring.
//!
//! Purpose
//! - One polygon type carrying the vertex ring, per-edge support tags and a
//!   cached bounding box, with the operations the discretiser needs: area,
//!   centroid, orientation canonicalisation, containment, ordered line
//!   intersections, and directed-line clipping.
//!
//! Clipping design
//! - `clip_left`/`clip_right` split the ring along a directed segment and
//!   walk the pieces on one side; `clip_right` is `clip_left` on the
//!   reversed ring with the whole-polygon sign test flipped. The walk runs
//!   on a scratch ring of (point, mark) entries so the polygon itself is
//!   never mutated mid-traversal.

use super::segment::{intersect, Segment};
use super::types::{cross, unit, EdgeKind, Vec2, EPS, EPS_NODE_SQ};

/// Polygon with an implicit closing edge. Edge `i` connects vertex `i` to
/// vertex `i + 1` (mod n) and carries `kinds[i]`.
#[derive(Clone, Debug)]
pub struct Polygon {
    pts: Vec<Vec2>,
    kinds: Vec<EdgeKind>,
    min: Vec2,
    max: Vec2,
}

impl Default for Polygon {
    fn default() -> Self {
        Polygon {
            pts: Vec::new(),
            kinds: Vec::new(),
            min: Vec2::new(f64::MAX, f64::MAX),
            max: Vec2::new(-f64::MAX, -f64::MAX),
        }
    }
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a vertex list; all edges tagged `Free`.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut poly = Polygon::default();
        for &p in points {
            poly.add_point(p);
        }
        poly
    }

    /// Append a vertex. Returns its index.
    pub fn add_point(&mut self, p: Vec2) -> usize {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.pts.push(p);
        self.kinds.push(EdgeKind::Free);
        self.pts.len() - 1
    }

    /// Append a vertex unless one already sits within the node tolerance;
    /// returns the index of the (existing or new) vertex.
    pub fn add_point_deduped(&mut self, p: Vec2) -> usize {
        for (i, q) in self.pts.iter().enumerate() {
            if (*q - p).norm_squared() < EPS_NODE_SQ {
                return i;
            }
        }
        self.add_point(p)
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.pts.len()
    }
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.pts
    }
    #[inline]
    pub fn point(&self, i: usize) -> Vec2 {
        self.pts[i]
    }
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.min
    }
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.max
    }

    #[inline]
    pub fn kind(&self, i: usize) -> EdgeKind {
        self.kinds[i]
    }
    #[inline]
    pub fn set_kind(&mut self, i: usize, kind: EdgeKind) {
        self.kinds[i] = kind;
    }

    /// Replace the vertex ring. Edge tags are reset to `Free` and the
    /// bounding box recomputed.
    pub fn set_points(&mut self, points: Vec<Vec2>) {
        *self = Polygon::from_points(&points);
    }

    /// Signed area (shoelace); positive for an anti-clockwise ring.
    pub fn area(&self) -> f64 {
        if self.pts.len() < 3 {
            return 0.0;
        }
        let n = self.pts.len();
        let mut a = 0.0;
        for i in 0..n {
            let p1 = self.pts[i];
            let p2 = self.pts[(i + 1) % n];
            a += p1.x * p2.y - p2.x * p1.y;
        }
        0.5 * a
    }

    /// Area centroid; the origin for degenerate rings.
    pub fn centroid(&self) -> Vec2 {
        let a = self.area();
        if a.abs() < EPS * EPS {
            return Vec2::zeros();
        }
        let n = self.pts.len();
        let mut c = Vec2::zeros();
        for i in 0..n {
            let p1 = self.pts[i];
            let p2 = self.pts[(i + 1) % n];
            let w = p1.x * p2.y - p2.x * p1.y;
            c.x += (p1.x + p2.x) * w;
            c.y += (p1.y + p2.y) * w;
        }
        c / (6.0 * a)
    }

    /// Reverse the vertex ring, remapping the edge tags so each geometric
    /// edge keeps its tag.
    pub fn reverse(&mut self) {
        self.pts.reverse();
        let n = self.kinds.len();
        if n > 1 {
            self.kinds[..n - 1].reverse();
        }
    }

    /// Canonicalise to anti-clockwise orientation by sign of signed area.
    pub fn make_anticlockwise(&mut self) {
        if self.area() < 0.0 {
            self.reverse();
        }
    }

    /// Even-odd containment test (horizontal ray).
    pub fn point_in(&self, p: Vec2) -> bool {
        let n = self.pts.len();
        if n == 0 {
            return false;
        }
        let mut j = n - 1;
        let mut odd = false;
        for i in 0..n {
            let pi = self.pts[i];
            let pj = self.pts[j];
            if ((pi.y < p.y && pj.y >= p.y) || (pj.y < p.y && pi.y >= p.y))
                && (pi.x <= p.x || pj.x <= p.x)
            {
                odd ^= pi.x + (p.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x) < p.x;
            }
            j = i;
        }
        odd
    }

    /// Index of the first edge within `EPS` of `p`, or `None`.
    pub fn point_on(&self, p: Vec2) -> Option<usize> {
        let n = self.pts.len();
        for i in 1..n {
            if Segment::new(self.pts[i - 1], self.pts[i]).distance_to(p) < EPS {
                return Some(i - 1);
            }
        }
        if n > 1 && Segment::new(self.pts[n - 1], self.pts[0]).distance_to(p) < EPS {
            return Some(n - 1);
        }
        None
    }

    /// All distinct intersections of `seg` with the polygon edges, plus the
    /// endpoints of `seg` itself, sorted by distance from `seg.p1()`.
    pub fn ordered_intersections(&self, seg: &Segment) -> Vec<Vec2> {
        let n = self.pts.len();
        let mut out: Vec<Vec2> = Vec::new();
        for i in 0..n {
            let edge = Segment::new(self.pts[i], self.pts[(i + 1) % n]);
            for p in intersect(&edge, seg) {
                push_unique(&mut out, p);
            }
        }
        push_unique(&mut out, seg.p1());
        push_unique(&mut out, seg.p2());
        sort_along(&mut out, seg.p1());
        out
    }

    /// Intersect the polygon with `seg`, inserting every crossing into the
    /// vertex ring, and return the distinct crossings sorted by distance
    /// from `seg.p1()`. Edge tags are reset by the mutation.
    pub fn intersect_with(&mut self, seg: &Segment) -> Vec<Vec2> {
        let mut ring = ClipRing::from_polygon(self);
        let pts = ring.intersect_with(seg);
        self.set_points(ring.verts.iter().map(|v| v.p).collect());
        pts
    }

    /// Connected components of the polygon on one side of the directed
    /// segment, each re-oriented anti-clockwise. `clip_right` returns the
    /// complementary side.
    pub fn clip_left(&self, seg: &Segment) -> Vec<Polygon> {
        let mut ring = ClipRing::from_polygon(self);
        let points = ring.intersect_with(seg);
        clip_walk(ring, points, seg, false)
    }

    /// See [`Polygon::clip_left`].
    pub fn clip_right(&self, seg: &Segment) -> Vec<Polygon> {
        let mut ring = ClipRing::from_polygon(self);
        ring.verts.reverse();
        let points = ring.intersect_with(seg);
        clip_walk(ring, points, seg, true)
    }

    /// First polygon of `polys` containing `p` (on the boundary or inside).
    pub fn find_containing(polys: &[Polygon], p: Vec2) -> Option<&Polygon> {
        polys
            .iter()
            .find(|poly| poly.point_on(p).is_some() || poly.point_in(p))
    }
}

fn push_unique(list: &mut Vec<Vec2>, p: Vec2) {
    if !list.iter().any(|q| (*q - p).norm() < EPS) {
        list.push(p);
    }
}

fn sort_along(list: &mut [Vec2], origin: Vec2) {
    list.sort_by(|a, b| {
        let da = (origin - a).norm();
        let db = (origin - b).norm();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Scratch ring used by clipping: the polygon vertices plus inserted
/// intersection points, each tagged with a mark consumed by the walk.
struct ClipRing {
    verts: Vec<RingVert>,
}

#[derive(Clone, Copy)]
struct RingVert {
    p: Vec2,
    mark: bool,
}

impl ClipRing {
    fn from_polygon(poly: &Polygon) -> Self {
        ClipRing {
            verts: poly
                .points()
                .iter()
                .map(|&p| RingVert { p, mark: false })
                .collect(),
        }
    }

    fn find(&self, p: Vec2) -> Option<usize> {
        self.verts.iter().position(|v| (v.p - p).norm() < EPS)
    }

    /// Insert every intersection of `seg` with the ring edges as a marked
    /// vertex (existing vertices within `EPS` are marked in place). Returns
    /// the distinct intersections sorted by distance from `seg.p1()`.
    fn intersect_with(&mut self, seg: &Segment) -> Vec<Vec2> {
        let mut result: Vec<Vec2> = Vec::new();

        let mut i = 0;
        while i + 1 < self.verts.len() {
            let edge = Segment::new(self.verts[i].p, self.verts[i + 1].p);
            for p in intersect(&edge, seg) {
                if (p - self.verts[i].p).norm() < EPS {
                    self.verts[i].mark = true;
                } else if (p - self.verts[i + 1].p).norm() < EPS {
                    self.verts[i + 1].mark = true;
                } else {
                    self.verts.insert(i + 1, RingVert { p, mark: true });
                }
                push_unique(&mut result, p);
            }
            i += 1;
        }

        if !self.verts.is_empty() {
            let last = self.verts.len() - 1;
            let edge = Segment::new(self.verts[last].p, self.verts[0].p);
            for p in intersect(&edge, seg) {
                let last = self.verts.len() - 1;
                if (p - self.verts[last].p).norm() < EPS {
                    self.verts[last].mark = true;
                } else if (p - self.verts[0].p).norm() < EPS {
                    self.verts[0].mark = true;
                } else {
                    self.verts.push(RingVert { p, mark: true });
                }
                push_unique(&mut result, p);
            }
        }

        sort_along(&mut result, seg.p1());
        result
    }
}

/// Extract the clipped components: start at the intersection nearest
/// `seg.p1()`, follow the ring, and on each marked vertex jump to its pair
/// along the clipping segment, until the walk closes. With fewer than two
/// intersections the whole ring is kept or rejected by the side test.
fn clip_walk(mut ring: ClipRing, mut points: Vec<Vec2>, seg: &Segment, flip: bool) -> Vec<Polygon> {
    let mut out: Vec<Polygon> = Vec::new();
    let mut last_point = Vec2::zeros();

    if points.len() > 1 {
        loop {
            let p_begin = points.remove(0);
            let sz = ring.verts.len();

            let Some(start) = ring.find(p_begin) else {
                debug_assert!(false, "clip walk lost an intersection point");
                break;
            };
            ring.verts[start].mark = false;

            let mut piece = Polygon::default();
            piece.add_point(p_begin);

            let mut idx = (start + 1) % sz;
            while idx != start {
                let p = ring.verts[idx].p;
                if ring.verts[idx].mark {
                    let Some(pi) = points.iter().position(|q| (*q - p).norm() < EPS) else {
                        debug_assert!(false, "marked vertex missing from intersection list");
                        break;
                    };
                    ring.verts[idx].mark = false;
                    piece.add_point(p);

                    if pi == 0 {
                        last_point = points.remove(0);
                        break;
                    }

                    let pi = pi - 1;
                    let Some(j) = ring.find(points[pi]) else {
                        debug_assert!(false, "paired intersection missing from ring");
                        break;
                    };
                    ring.verts[j].mark = false;
                    piece.add_point(points[pi]);
                    points.remove(pi);
                    points.remove(pi);
                    idx = j;
                } else {
                    piece.add_point(p);
                }
                idx = (idx + 1) % sz;
            }

            if piece.num_points() > 2 {
                out.push(piece);
            } else if !points.is_empty() {
                points.insert(0, last_point);
            }

            if points.is_empty() {
                break;
            }
        }
    } else {
        // The segment misses the ring: keep the whole polygon when any
        // vertex lies strictly on the clipped side.
        let vl = unit(seg.p2() - seg.p1());
        let mut keep = false;
        for v in &ring.verts {
            let d = cross(vl, v.p - seg.p1());
            let on_side = if flip { d > 0.0 } else { d < 0.0 };
            if on_side && d.abs() > EPS {
                keep = true;
                break;
            }
        }
        if keep {
            let mut piece = Polygon::default();
            for v in &ring.verts {
                piece.add_point(v.p);
            }
            out.push(piece);
        }
    }

    for poly in &mut out {
        poly.make_anticlockwise();
    }
    out
}
