//! Tributary-area integration for uniformly distributed load.
//!
//! Each edge's work conjugate under unit UDL is obtained by clipping the
//! outline to the vertical strip over the edge, keeping the sub-polygon on
//! one side of the edge, stripping vertices whose downward vertical crosses
//! exterior spans, and taking (A·dn, A·dt, A) from the cleaned region's
//! area and centroid.

use rayon::prelude::*;

use super::edge::Edge;
use crate::geom::{Polygon, Segment, Vec2, EPS};

/// Populate the cached tributary vectors of all listed edges on the rayon
/// pool. Each vector is computed by exactly one worker and written back on
/// the calling thread.
pub(crate) fn compute_udl_factors(poly: &Polygon, edges: &mut [Edge], active: &[usize]) {
    let computed: Vec<(usize, [f64; 3])> = {
        let edges: &[Edge] = edges;
        active
            .par_iter()
            .filter(|&&i| edges[i].udl.is_none())
            .map(|&i| (i, tributary_vector(poly, &edges[i])))
            .collect()
    };
    for (i, v) in computed {
        edges[i].udl = Some(v);
    }
}

/// Tributary (normal, tangential, area) vector of one edge. Vertical edges
/// have no vertical strip and integrate to zero; restrained edges keep only
/// the normal component.
pub(crate) fn tributary_vector(poly: &Polygon, edge: &Edge) -> [f64; 3] {
    let mut out = [0.0, 0.0, 0.0];
    let ray = Vec2::new(0.0, 1e6);

    let (mut p1, mut p2) = edge.endpoints();
    if (p1.x - p2.x).abs() > EPS {
        if p1.x > p2.x {
            std::mem::swap(&mut p1, &mut p2);
        }
        let left_ray = Segment::new(p1 - ray, p1 + ray);
        let right_ray = Segment::new(p2 - ray, p2 + ray);
        let cut = Segment::new(p1, p2);
        let mid = (p1 + p2) / 2.0;

        let sub = clip_to_strip(poly, &left_ray, &right_ray, &cut, mid);
        if let Some(sub) = sub {
            let cleaned = strip_downward_cavities(sub, ray);
            if cleaned.num_points() > 0 {
                let area = cleaned.area();
                if area.abs() > EPS {
                    let c = cleaned.centroid();
                    let (p1, p2) = edge.endpoints();
                    let seg = Segment::new(p1, p2);
                    let mid = (p1 + p2) / 2.0;
                    let dn = seg.distance_to(c);
                    let dt = seg.dir().dot(&(c - mid));
                    out = [area * dn, area * dt, area];
                }
            }
        }
    }

    if !edge.kind.unrestrained() {
        out[1] = 0.0;
        out[2] = 0.0;
    }
    out
}

fn clip_to_strip(
    poly: &Polygon,
    left_ray: &Segment,
    right_ray: &Segment,
    cut: &Segment,
    mid: Vec2,
) -> Option<Polygon> {
    let parts = poly.clip_right(right_ray);
    let part = Polygon::find_containing(&parts, mid)?;
    let parts = part.clip_left(left_ray);
    let part = Polygon::find_containing(&parts, mid)?;
    let parts = part.clip_right(cut);
    Polygon::find_containing(&parts, mid).cloned()
}

/// Remove vertices whose downward vertical ray crosses a span outside the
/// sub-polygon, closing off cavities that the strip clipping left hanging.
fn strip_downward_cavities(mut work: Polygon, ray: Vec2) -> Polygon {
    // First refine the ring with every vertical crossing so the vertex list
    // contains the cavity boundaries.
    let snapshot = work.points().to_vec();
    for p in snapshot {
        work.intersect_with(&Segment::new(p - ray, p + ray));
    }

    let mut remaining = work.points().to_vec();
    let mut j = 0;
    while j < remaining.len() {
        let vline = Segment::new(remaining[j] - ray, remaining[j] + ray);
        let inters = work.intersect_with(&vline);
        let mut remove = false;
        for k in 0..inters.len().saturating_sub(1) {
            if inters[k].y - remaining[j].y < 0.0 {
                let mid = (inters[k] + inters[k + 1]) / 2.0;
                if work.point_on(mid).is_none() && !work.point_in(mid) {
                    remove = true;
                    break;
                }
            }
        }
        if remove {
            remaining.remove(j);
        } else {
            j += 1;
        }
    }

    let mut out = work;
    out.set_points(remaining);
    out
}
