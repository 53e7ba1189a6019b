//! Seam to the external triangulator.
//!
//! The mesher consumes the boundary node ring and returns interior edges as
//! point pairs; the domain inserts the endpoints back into its own node
//! store (deduplicated) and connects them. The triangulation itself is
//! delegated to `delaunator`; since that is an unconstrained Delaunay over a
//! point set, interior points are seeded here on a hexagonal lattice whose
//! spacing matches the (√3/8)·S² target element area, and triangulation
//! edges leaving the domain are dropped with the same midpoint test the
//! exterior pruning uses.

use delaunator::{next_halfedge, triangulate, Point, EMPTY};

use super::prune::segment_inside;
use super::Node;
use crate::error::Error;
use crate::geom::{Polygon, Segment, Vec2};

/// Interior mesh edges for the given boundary nodes, as point pairs.
pub(crate) fn interior_edges(
    nodes: &[Node],
    poly: &Polygon,
    size: f64,
) -> Result<Vec<(Vec2, Vec2)>, Error> {
    let mut pts: Vec<Vec2> = nodes.iter().map(|n| n.p).collect();
    pts.extend(seed_points(poly, size));

    if pts.len() < 3 {
        return Err(Error::Mesh("fewer than three mesh points".into()));
    }

    let dpts: Vec<Point> = pts.iter().map(|p| Point { x: p.x, y: p.y }).collect();
    let tri = triangulate(&dpts);
    if tri.triangles.is_empty() {
        return Err(Error::Mesh("triangulation produced no triangles".into()));
    }

    let mut edges = Vec::new();
    for i in 0..tri.triangles.len() {
        let opposite = tri.halfedges[i];
        if opposite != EMPTY && opposite < i {
            continue;
        }
        let a = pts[tri.triangles[i]];
        let b = pts[tri.triangles[next_halfedge(i)]];
        if segment_inside(poly, &Segment::new(a, b)) {
            edges.push((a, b));
        }
    }
    tracing::debug!(
        points = pts.len(),
        triangles = tri.triangles.len() / 3,
        edges = edges.len(),
        "triangulated interior"
    );
    Ok(edges)
}

/// Hexagonal lattice of interior points. Equilateral triangles of side `a`
/// have area (√3/4)a², so the (√3/8)S² element target gives a = S/√2.
fn seed_points(poly: &Polygon, size: f64) -> Vec<Vec2> {
    let spacing = size / 2f64.sqrt();
    let row_step = spacing * 3f64.sqrt() / 2.0;
    let margin = 0.45 * spacing;

    let min = poly.min();
    let max = poly.max();
    let mut out = Vec::new();
    let mut y = min.y + row_step;
    let mut odd = false;
    while y < max.y - margin + f64::EPSILON {
        let x0 = min.x + if odd { spacing } else { spacing / 2.0 };
        let mut x = x0;
        while x < max.x - margin + f64::EPSILON {
            let p = Vec2::new(x, y);
            if poly.point_in(p) && clear_of_boundary(poly, p, margin) {
                out.push(p);
            }
            x += spacing;
        }
        y += row_step;
        odd = !odd;
    }
    out
}

fn clear_of_boundary(poly: &Polygon, p: Vec2, margin: f64) -> bool {
    let n = poly.num_points();
    for i in 0..n {
        let seg = Segment::new(poly.point(i), poly.point((i + 1) % n));
        if seg.distance_to(p) < margin {
            return false;
        }
    }
    true
}
