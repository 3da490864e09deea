//! Breadth-first path search over MST edges

use std::collections::{HashMap, HashSet, VecDeque};

use super::mst::Edge;
use crate::sim::ParticleId;

/// Undirected adjacency; neighbours keep edge insertion order
fn adjacency(edges: &[Edge]) -> HashMap<ParticleId, Vec<ParticleId>> {
    let mut adj: HashMap<ParticleId, Vec<ParticleId>> = HashMap::new();
    for edge in edges {
        adj.entry(edge.a).or_default().push(edge.b);
        adj.entry(edge.b).or_default().push(edge.a);
    }
    adj
}

/// Fewest-hop path from `start` to `end`, both inclusive
///
/// On a tree this is the unique path between the two nodes. Returns None if
/// either id does not appear on any edge, or if the two are not connected.
pub fn shortest_path(edges: &[Edge], start: ParticleId, end: ParticleId) -> Option<Vec<ParticleId>> {
    let adj = adjacency(edges);
    if !adj.contains_key(&start) || !adj.contains_key(&end) {
        return None;
    }

    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([vec![start]]);

    while let Some(path) = queue.pop_front() {
        let node = *path.last()?;
        if node == end {
            return Some(path);
        }
        for &next in adj.get(&node).into_iter().flatten() {
            if visited.insert(next) {
                let mut extended = path.clone();
                extended.push(next);
                queue.push_back(extended);
            }
        }
    }

    None
}
