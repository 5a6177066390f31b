//! Strongest-relationship shortest paths
//!
//! Routing runs on the undirected aggregate with distance `1 / max(weight, ε)`,
//! so heavily weighted pairs are close. The reported weight of a path is the
//! sum of each hop's strongest directed edge, not the routing distance.

use crate::algo::{self, dijkstra_with};
use crate::graph::{EdgeRecord, EdgeType, RelationGraph};
use serde::Serialize;

/// One step of a path, represented by its strongest edge
#[derive(Debug, Clone, Serialize)]
pub struct PathHop {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
    pub weight: f64,
    /// Every directed record between the two entities
    pub edges: Vec<EdgeRecord>,
}

/// Outcome of a shortest-path query; `found == false` when either end is
/// unknown or the two are disconnected
#[derive(Debug, Clone, Serialize)]
pub struct PathReport {
    pub found: bool,
    pub source: String,
    pub target: String,
    pub path: Vec<String>,
    pub hop_count: usize,
    pub total_weight: f64,
    pub hops: Vec<PathHop>,
}

impl PathReport {
    fn not_found(source: &str, target: &str) -> Self {
        PathReport {
            found: false,
            source: source.to_string(),
            target: target.to_string(),
            path: Vec::new(),
            hop_count: 0,
            total_weight: 0.0,
            hops: Vec::new(),
        }
    }
}

impl RelationGraph {
    /// Shortest path between two entities, treating strong relationships as short distances
    pub fn shortest_path(&self, source: &str, target: &str) -> PathReport {
        let (Some(a), Some(b)) = (self.index_of(source), self.index_of(target)) else {
            return PathReport::not_found(source, target);
        };

        // Route from the lower index so (a, b) and (b, a) resolve ties identically
        let (from, to) = (a.min(b), a.max(b));
        let epsilon = self.config.min_distance_weight;
        let Some(result) = dijkstra_with(&self.undirected_view, from as u64, to as u64, |w| {
            1.0 / w.max(epsilon)
        }) else {
            return PathReport::not_found(source, target);
        };

        let mut indices: Vec<usize> = result.path.into_iter().map(algo::to_index).collect();
        if from != a {
            indices.reverse();
        }

        let hops: Vec<PathHop> = indices
            .windows(2)
            .map(|pair| self.path_hop(pair[0], pair[1]))
            .collect();

        PathReport {
            found: true,
            source: source.to_string(),
            target: target.to_string(),
            path: indices.iter().map(|&i| self.id_at(i).to_string()).collect(),
            hop_count: hops.len(),
            total_weight: hops.iter().map(|h| h.weight).sum(),
            hops,
        }
    }

    fn path_hop(&self, a: usize, b: usize) -> PathHop {
        let edges: Vec<EdgeRecord> = self.edges_between(a, b).into_iter().cloned().collect();

        // First strictly-heaviest edge wins; a -> b records are listed first
        let strongest = edges
            .iter()
            .fold(None::<&EdgeRecord>, |best, e| match best {
                Some(current) if current.weight >= e.weight => Some(current),
                _ => Some(e),
            });

        PathHop {
            source: self.id_at(a).to_string(),
            target: self.id_at(b).to_string(),
            edge_type: strongest.map_or_else(|| EdgeType::new(""), |e| e.edge_type.clone()),
            weight: strongest.map_or(0.0, |e| e.weight),
            edges,
        }
    }
}
