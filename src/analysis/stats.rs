//! Summary statistics

use crate::algo::weakly_connected_components;
use crate::graph::RelationGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whole-graph summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    /// Distinct `(source, target, edge_type)` records
    pub edge_count: usize,
    /// Distinct unordered pairs
    pub undirected_edge_count: usize,
    /// Undirected density, 0 for fewer than two nodes
    pub density: f64,
    pub connected_components: usize,
    pub largest_component_size: usize,
    pub node_types: BTreeMap<String, usize>,
    pub edge_types: BTreeMap<String, usize>,
    pub average_degree: f64,
    /// Input edges skipped for missing ids
    pub dropped_edges: usize,
}

impl RelationGraph {
    pub fn get_stats(&self) -> GraphStats {
        let n = self.node_count();
        let pairs = self.undirected_edge_count();

        let density = if n > 1 {
            2.0 * pairs as f64 / (n as f64 * (n - 1) as f64)
        } else {
            0.0
        };
        let average_degree = if n > 0 { 2.0 * pairs as f64 / n as f64 } else { 0.0 };

        let components = weakly_connected_components(&self.undirected_view);

        let mut node_types: BTreeMap<String, usize> = BTreeMap::new();
        for entity_type in self.entities.values() {
            *node_types.entry(entity_type.to_string()).or_default() += 1;
        }
        let mut edge_types: BTreeMap<String, usize> = BTreeMap::new();
        for key in self.edges.keys() {
            *edge_types.entry(key.edge_type.to_string()).or_default() += 1;
        }

        GraphStats {
            node_count: n,
            edge_count: self.edge_count(),
            undirected_edge_count: pairs,
            density,
            connected_components: components.components.len(),
            largest_component_size: components.largest_component_size(),
            node_types,
            edge_types,
            average_degree,
            dropped_edges: self.dropped_edge_count(),
        }
    }
}
