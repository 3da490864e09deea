//! Prim minimum spanning tree over a particle subset

use serde::{Deserialize, Serialize};

use crate::sim::{Particle, ParticleId};

/// Undirected edge between two particles
///
/// The weight is the current distance between the endpoints and is never
/// cached, since particles keep moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: ParticleId,
    pub b: ParticleId,
}

impl Edge {
    pub fn new(a: ParticleId, b: ParticleId) -> Self {
        Self { a, b }
    }

    /// Euclidean length between the endpoints' positions
    ///
    /// Returns None if either endpoint is not in `particles`.
    pub fn weight(&self, particles: &[Particle]) -> Option<f64> {
        let a = particles.get(self.a.index())?;
        let b = particles.get(self.b.index())?;
        Some(a.pos.distance(b.pos))
    }

    pub fn connects(&self, x: ParticleId, y: ParticleId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// The endpoint opposite `id`, if `id` is on this edge
    pub fn other(&self, id: ParticleId) -> Option<ParticleId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Sum of edge weights; edges with unknown endpoints count as zero
pub fn total_weight(edges: &[Edge], particles: &[Particle]) -> f64 {
    edges.iter().filter_map(|e| e.weight(particles)).sum()
}

/// Build the minimum spanning tree of `points` with Prim's algorithm
///
/// The tree grows from `points[0]`. Each round scans included nodes in the
/// order they joined, and for each one the excluded candidates in input
/// order, keeping the first strictly shorter edge. Edges come back oriented
/// (tree side, new node) in the order they were added.
///
/// Empty and single-point inputs give no edges. Ids that repeat, or that do
/// not index into `particles`, are skipped.
pub fn build_mst(particles: &[Particle], points: &[ParticleId]) -> Vec<Edge> {
    let mut seen = vec![false; particles.len()];
    let nodes: Vec<ParticleId> = points
        .iter()
        .copied()
        .filter(|id| match seen.get_mut(id.index()) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        })
        .collect();

    let Some(&root) = nodes.first() else {
        return Vec::new();
    };

    let mut included = vec![false; particles.len()];
    let mut order = Vec::with_capacity(nodes.len());
    included[root.index()] = true;
    order.push(root);

    let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
    while order.len() < nodes.len() {
        let mut best: Option<(Edge, f64)> = None;
        for &from in &order {
            let from_pos = particles[from.index()].pos;
            for &to in &nodes {
                if included[to.index()] {
                    continue;
                }
                let distance = from_pos.distance(particles[to.index()].pos);
                if best.is_none_or(|(_, min)| distance < min) {
                    best = Some((Edge::new(from, to), distance));
                }
            }
        }

        let Some((edge, _)) = best else {
            break;
        };
        included[edge.b.index()] = true;
        order.push(edge.b);
        edges.push(edge);
    }

    log::debug!(
        "mst over {} points: {} edges",
        nodes.len(),
        edges.len()
    );
    edges
}
