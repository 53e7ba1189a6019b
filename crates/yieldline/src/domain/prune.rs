//! Candidate-set pruning: colinear overlaps and exterior segments.
//!
//! Overlap pruning partitions the slope-sorted candidate list, extending
//! each partition boundary until the slope strictly changes so a colinear
//! group never straddles workers. Workers scan their own slice and report
//! edge indices to delete; flags are applied afterwards on one thread, so
//! each edge's delete flag is written by exactly one place.

use rayon::prelude::*;

use super::edge::Edge;
use crate::geom::{colinear, intersect, Polygon, Segment, EPS};

const PARTITIONS: usize = 4;

pub(crate) fn prune_overlaps(edges: &mut [Edge], active: &mut Vec<usize>) {
    let mut order: Vec<usize> = active.clone();
    order.sort_by(|&a, &b| {
        edges[a]
            .seg
            .slope()
            .partial_cmp(&edges[b].seg.slope())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = order.len();
    let chunk = n / PARTITIONS;
    let mut bounds = [0usize; PARTITIONS + 1];
    bounds[PARTITIONS] = n;
    for k in 1..PARTITIONS {
        let target = (k * chunk).max(bounds[k - 1]);
        bounds[k] = extend_partition(edges, &order, target);
    }

    let ranges: Vec<(usize, usize)> = (0..PARTITIONS)
        .map(|k| (bounds[k], bounds[k + 1].max(bounds[k])))
        .collect();

    let doomed: Vec<usize> = {
        let edges: &[Edge] = edges;
        ranges
            .par_iter()
            .flat_map(|&(lo, hi)| scan_partition(edges, &order[lo..hi]))
            .collect()
    };

    for i in doomed {
        edges[i].delete = true;
    }
    active.retain(|&i| !edges[i].delete);
}

/// Push the partition end forward while the slope ties, so colinear runs
/// stay within one worker.
fn extend_partition(edges: &[Edge], order: &[usize], mut end: usize) -> usize {
    while end > 0
        && end < order.len()
        && (edges[order[end - 1]].seg.slope() - edges[order[end]].seg.slope()).abs() < EPS
    {
        end += 1;
    }
    end
}

fn scan_partition(edges: &[Edge], slice: &[usize]) -> Vec<usize> {
    let mut dead = vec![false; slice.len()];
    let mut out = Vec::new();
    for i in 0..slice.len() {
        if dead[i] {
            continue;
        }
        let ei = &edges[slice[i]];
        for j in (i + 1)..slice.len() {
            let ej = &edges[slice[j]];
            if (ei.seg.slope() - ej.seg.slope()).abs() > EPS {
                break;
            }
            if dead[j] {
                continue;
            }
            let disjoint = ej.seg.max().x < ei.seg.min().x
                || ej.seg.min().x > ei.seg.max().x
                || ej.seg.max().y < ei.seg.min().y
                || ej.seg.min().y > ei.seg.max().y;
            if disjoint || !colinear(&ei.seg, &ej.seg) {
                continue;
            }
            if intersect(&ei.seg, &ej.seg).len() > 1 {
                // true overlap: drop the longer of the pair
                if ei.length > ej.length {
                    dead[i] = true;
                    out.push(slice[i]);
                    break;
                } else {
                    dead[j] = true;
                    out.push(slice[j]);
                }
            }
        }
    }
    out
}

/// An edge survives when every span between consecutive boundary
/// intersections of its carrier segment has its midpoint inside or on the
/// outline.
pub(crate) fn segment_inside(poly: &Polygon, seg: &Segment) -> bool {
    let inters = poly.ordered_intersections(seg);
    for k in 0..inters.len().saturating_sub(1) {
        let mid = (inters[k] + inters[k + 1]) / 2.0;
        if poly.point_on(mid).is_none() && !poly.point_in(mid) {
            return false;
        }
    }
    true
}

pub(crate) fn prune_exterior(poly: &Polygon, edges: &mut [Edge], active: &mut Vec<usize>) {
    let doomed: Vec<usize> = active
        .iter()
        .copied()
        .filter(|&i| edges[i].removable && !segment_inside(poly, &edges[i].seg))
        .collect();
    for i in doomed {
        edges[i].delete = true;
    }
    active.retain(|&i| !edges[i].delete);
}
