//! Line segments with cached direction, bounds and slope, plus the
//! colinearity predicate and the 0/1/2-point intersection routine.

use super::types::{cross, unit, Vec2, EPS, EPS_INTERSECT};

/// A 2D line segment. Direction, axis-aligned bounds and slope are computed
/// once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    p1: Vec2,
    p2: Vec2,
    dir: Vec2,
    min: Vec2,
    max: Vec2,
    slope: f64,
}

impl Segment {
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        let dx = p2.x - p1.x;
        // f64::MAX (not infinity) so that two vertical slopes still compare
        // equal under subtraction.
        let slope = if dx.abs() > EPS_INTERSECT {
            (p2.y - p1.y) / dx
        } else {
            f64::MAX
        };
        Segment {
            p1,
            p2,
            dir: unit(p2 - p1),
            min: Vec2::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Vec2::new(p1.x.max(p2.x), p1.y.max(p2.y)),
            slope,
        }
    }

    #[inline]
    pub fn p1(&self) -> Vec2 {
        self.p1
    }
    #[inline]
    pub fn p2(&self) -> Vec2 {
        self.p2
    }
    /// Unit direction from `p1` to `p2`.
    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.min
    }
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.max
    }
    /// dy/dx, or `f64::MAX` when the segment is vertical.
    #[inline]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }

    /// Distance from `p` to the segment: the perpendicular distance to the
    /// carrier line, clamped to the nearer endpoint when the foot of the
    /// perpendicular falls outside the segment.
    pub fn distance_to(&self, p: Vec2) -> f64 {
        let d = self.p2 - self.p1;
        let len_sq = d.norm_squared();
        if len_sq <= EPS * EPS {
            return (p - self.p1).norm();
        }
        let t = ((p - self.p1).dot(&d) / len_sq).clamp(0.0, 1.0);
        (p - (self.p1 + d * t)).norm()
    }
}

/// Two segments are colinear when their unit directions are equal or
/// opposite within `EPS` per component.
pub fn colinear(a: &Segment, b: &Segment) -> bool {
    let va = a.dir();
    let vb = b.dir();
    ((va.x - vb.x).abs() < EPS && (va.y - vb.y).abs() < EPS)
        || ((va.x + vb.x).abs() < EPS && (va.y + vb.y).abs() < EPS)
}

/// `p` must be colinear with `s`: it lies on the segment when the two
/// endpoint distances sum to (at most) the segment length.
fn on_segment(p: Vec2, s: &Segment) -> bool {
    let ma = (p - s.p1()).norm();
    let mb = (p - s.p2()).norm();
    let ml = (s.p2() - s.p1()).norm();
    ma + mb <= ml + EPS
}

fn dedup(points: &mut Vec<Vec2>) {
    let mut i = 0;
    while i < points.len() {
        let mut j = i + 1;
        while j < points.len() {
            if (points[i] - points[j]).norm_squared() < EPS {
                points.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

#[inline]
fn in_unit_range(s: f64) -> bool {
    (0.0 < s || s.abs() < EPS_INTERSECT) && (s < 1.0 || (s - 1.0).abs() < EPS_INTERSECT)
}

/// Segment intersection in origin/direction form.
///
/// Returns 0 points when the segments miss, 1 point when they cross, and
/// the endpoints of the overlap interval (1 or 2 distinct points) when they
/// are colinear and overlap.
pub fn intersect(a: &Segment, b: &Segment) -> Vec<Vec2> {
    let mut points = Vec::new();

    let oa = a.p1();
    let da = a.p2() - a.p1();
    let ob = b.p1();
    let db = b.p2() - b.p1();

    let denom = cross(da, db);

    if denom.abs() < EPS_INTERSECT && cross(ob - oa, da).abs() < EPS_INTERSECT {
        // Colinear: collect overlap endpoints.
        if on_segment(b.p1(), a) && on_segment(b.p2(), a) {
            points.push(b.p1());
            points.push(b.p2());
            dedup(&mut points);
            return points;
        }
        if on_segment(a.p1(), b) && on_segment(a.p2(), b) {
            points.push(a.p1());
            points.push(a.p2());
            dedup(&mut points);
            return points;
        }
        if on_segment(a.p1(), b) {
            points.push(a.p1());
        }
        if on_segment(a.p2(), b) {
            points.push(a.p2());
        }
        if on_segment(b.p1(), a) {
            points.push(b.p1());
        }
        if on_segment(b.p2(), a) {
            points.push(b.p2());
        }
        dedup(&mut points);
        return points;
    }

    if denom.abs() < EPS_INTERSECT {
        // Parallel but not colinear.
        return points;
    }

    let sa = cross(ob - oa, db) / denom;
    let sb = cross(oa - ob, da) / cross(db, da);

    if in_unit_range(sa) && in_unit_range(sb) {
        points.push(oa + da * sa);
    }
    points
}
