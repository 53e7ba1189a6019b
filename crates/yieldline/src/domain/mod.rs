//! Slab domain: outline, supports, node arena and the candidate
//! discontinuity set.
//!
//! Purpose
//! - Own the geometry (anti-clockwise outline with per-edge support tags),
//!   the node arena (dense 1-based ids) and the edge arena, and run the
//!   discretisation pipeline: boundary tessellation → interior meshing →
//!   over-connection → overlap pruning → exterior pruning → tributary
//!   precomputation.
//!
//! Lifecycle
//! - Nodes and edges are append-only during discretisation. Pruning erases
//!   entries from the `active` iteration list; the outer solve loop only
//!   toggles the `added` flag.

mod edge;
mod mesh;
mod persist;
mod prune;
mod udl;

pub use edge::{Edge, YieldMoments};

use std::collections::HashMap;

use crate::error::Error;
use crate::geom::{EdgeKind, Polygon, Segment, Vec2, EPS, EPS_NODE_SQ};

/// A mesh node: position plus its dense, 1-based id (`id = index + 1`).
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub p: Vec2,
    pub id: usize,
}

/// A line support applied inside the domain.
#[derive(Clone, Debug)]
pub struct Support {
    pub seg: Segment,
    pub kind: EdgeKind,
}

/// The analysis domain.
#[derive(Clone, Debug)]
pub struct Domain {
    pub(crate) poly: Polygon,
    openings: Vec<Polygon>,
    supports: Vec<Support>,
    pub(crate) nodes: Vec<Node>,
    /// Edge arena in insertion order: boundary, then mesh, then additional.
    pub(crate) edges: Vec<Edge>,
    /// Surviving edges after pruning, in insertion order. This is the
    /// canonical iteration order for assembly and extraction.
    pub(crate) active: Vec<usize>,
    n_boundary: usize,
    n_mesh: usize,
    adjacency: HashMap<usize, Vec<usize>>,
    pub(crate) live_load: f64,
    pub(crate) dead_load: f64,
    moments: YieldMoments,
}

impl Default for Domain {
    fn default() -> Self {
        Self::new()
    }
}

impl Domain {
    pub fn new() -> Self {
        Domain {
            poly: Polygon::new(),
            openings: Vec::new(),
            supports: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            active: Vec::new(),
            n_boundary: 0,
            n_mesh: 0,
            adjacency: HashMap::new(),
            live_load: 1.0,
            dead_load: 0.0,
            moments: YieldMoments::default(),
        }
    }

    /// Append an outline vertex; the edge leaving it carries `kind`.
    /// Vertices within the node tolerance are merged.
    pub fn add_boundary_point(&mut self, p: Vec2, kind: EdgeKind) {
        let index = self.poly.add_point_deduped(p);
        self.poly.set_kind(index, kind);
    }

    /// Append a vertex to the opening with the given index, growing the
    /// opening list as needed. Openings are carried as data only.
    pub fn add_opening_point(&mut self, index: usize, p: Vec2) {
        while self.openings.len() <= index {
            self.openings.push(Polygon::new());
        }
        self.openings[index].add_point_deduped(p);
    }

    pub fn add_support(&mut self, p1: Vec2, p2: Vec2, kind: EdgeKind) {
        self.supports.push(Support {
            seg: Segment::new(p1, p2),
            kind,
        });
    }

    pub fn set_loads(&mut self, live: f64, dead: f64) {
        self.live_load = live;
        self.dead_load = dead;
    }

    /// Store the orthotropic yield moments. Edges resolve the moments onto
    /// their direction at creation, so this takes effect for the next
    /// `discretize` call.
    pub fn set_yield_moments(&mut self, moments: YieldMoments) {
        self.moments = moments;
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node by its 1-based id.
    #[inline]
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id - 1]
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.poly
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Indices of the surviving candidate edges, in insertion order.
    #[inline]
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Surviving candidate edges, in insertion order.
    pub fn active_edges(&self) -> impl Iterator<Item = &Edge> {
        self.active.iter().map(|&i| &self.edges[i])
    }

    #[inline]
    pub fn openings(&self) -> &[Polygon] {
        &self.openings
    }

    #[inline]
    pub fn supports(&self) -> &[Support] {
        &self.supports
    }

    #[inline]
    pub fn live_load(&self) -> f64 {
        self.live_load
    }
    #[inline]
    pub fn dead_load(&self) -> f64 {
        self.dead_load
    }
    #[inline]
    pub fn yield_moments(&self) -> YieldMoments {
        self.moments
    }
    #[inline]
    pub fn boundary_edge_count(&self) -> usize {
        self.n_boundary
    }
    #[inline]
    pub fn mesh_edge_count(&self) -> usize {
        self.n_mesh
    }

    /// Tessellate the outline and mesh the interior at the target segment
    /// size `size`. Clears any previous discretisation.
    pub fn discretize(&mut self, size: f64) -> Result<(), Error> {
        self.nodes.clear();
        self.edges.clear();
        self.active.clear();
        self.adjacency.clear();
        self.n_boundary = 0;
        self.n_mesh = 0;

        self.poly.make_anticlockwise();
        self.tesselate(size);

        for (a, b) in mesh::interior_edges(&self.nodes, &self.poly, size)? {
            let n1 = self.add_node(a);
            let n2 = self.add_node(b);
            if !self.connected(n1, n2) {
                if self.push_edge(n1, n2, EdgeKind::Internal, false) {
                    self.n_mesh += 1;
                }
            }
        }
        tracing::debug!(
            nodes = self.nodes.len(),
            boundary = self.n_boundary,
            mesh = self.n_mesh,
            "discretized"
        );
        Ok(())
    }

    /// Enumerate the over-connected candidate set, prune colinear overlaps
    /// and exterior segments, and precompute the tributary load vectors.
    pub fn build_edges(&mut self) {
        // additional candidates: every unconnected node pair
        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (n1, n2) = (i + 1, j + 1);
                if !self.connected(n1, n2) {
                    self.push_edge(n1, n2, EdgeKind::Internal, true);
                }
            }
        }

        let base = self.n_boundary + self.n_mesh;
        for (i, e) in self.edges.iter_mut().enumerate() {
            e.added = i < base;
        }
        self.active = (0..self.edges.len()).collect();

        let candidates = self.active.len();
        prune::prune_overlaps(&mut self.edges, &mut self.active);
        let after_overlap = self.active.len();
        prune::prune_exterior(&self.poly, &mut self.edges, &mut self.active);
        let after_exterior = self.active.len();

        udl::compute_udl_factors(&self.poly, &mut self.edges, &self.active);

        tracing::debug!(
            candidates,
            overlap_pruned = candidates - after_overlap,
            exterior_pruned = after_overlap - after_exterior,
            active = after_exterior,
            "edge set built"
        );
    }

    /// Place equally spaced nodes along each outline edge and emit the
    /// boundary discontinuities carrying the edge's support tag.
    fn tesselate(&mut self, size: f64) {
        let pts = self.poly.points().to_vec();
        let n = pts.len();
        for i in 0..n {
            let p1 = pts[i];
            let p2 = pts[(i + 1) % n];
            let kind = self.poly.kind(i);

            let v = p2 - p1;
            let length = v.norm();
            let v = v / length;
            let number = ((length / (size / 2.0) + 0.5).floor() as usize).max(1);
            let spacing = length / number as f64;

            let mut n1 = self.add_node(p1);
            for j in 0..number {
                let n2 = self.add_node(p1 + v * ((j + 1) as f64 * spacing));
                if self.push_edge(n1, n2, kind, false) {
                    self.n_boundary += 1;
                }
                n1 = n2;
            }
        }
    }

    /// Insert a node, deduplicated by squared distance; returns its 1-based
    /// id.
    fn add_node(&mut self, p: Vec2) -> usize {
        for node in &self.nodes {
            if (node.p - p).norm_squared() < EPS_NODE_SQ {
                return node.id;
            }
        }
        let id = self.nodes.len() + 1;
        self.nodes.push(Node { p, id });
        id
    }

    fn connected(&self, n1: usize, n2: usize) -> bool {
        self.adjacency
            .get(&n1)
            .is_some_and(|peers| peers.contains(&n2))
    }

    /// Append an edge to the arena and record both directions in the
    /// adjacency map. Degenerate (zero-length) candidates are dropped.
    fn push_edge(&mut self, n1: usize, n2: usize, kind: EdgeKind, removable: bool) -> bool {
        let p1 = self.node(n1).p;
        let p2 = self.node(n2).p;
        if (p2 - p1).norm() < EPS {
            tracing::debug!(n1, n2, "skipping degenerate edge");
            return false;
        }
        let mut edge = Edge::new(n1, n2, kind, p1, p2, self.moments);
        edge.removable = removable;
        self.edges.push(edge);
        self.adjacency.entry(n1).or_default().push(n2);
        self.adjacency.entry(n2).or_default().push(n1);
        true
    }
}

#[cfg(test)]
mod tests;
