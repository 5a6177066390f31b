//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of the graph topology for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Undirected graphs are represented by storing every edge in both directions,
/// so `successors` and `predecessors` return the same neighbor set.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,

    /// Whether every edge was inserted in both directions
    pub undirected: bool,
}

impl GraphView {
    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Iterate outgoing `(target, weight)` pairs; unweighted views yield 1.0
    pub fn weighted_successors(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let weights = self.weights(idx);
        self.successors(idx)
            .iter()
            .enumerate()
            .map(move |(i, &t)| (t, weights.map_or(1.0, |w| w[i])))
    }

    /// Sum of outgoing edge weights of a node
    pub fn out_strength(&self, idx: usize) -> f64 {
        self.weighted_successors(idx).map(|(_, w)| w).sum()
    }

    /// Number of edges stored in the view. Undirected edges count once.
    pub fn edge_count(&self) -> usize {
        if self.undirected {
            let loops = (0..self.node_count)
                .map(|i| self.successors(i).iter().filter(|&&t| t == i).count())
                .sum::<usize>();
            (self.out_targets.len() - loops) / 2 + loops
        } else {
            self.out_targets.len()
        }
    }

    /// Build a view from a weighted edge list over dense indices `0..index_to_node.len()`.
    ///
    /// When `undirected` is set each `(u, v, w)` is stored as `u->v` and `v->u`
    /// (self-loops once). Parallel edges are kept as given; callers collapse
    /// them beforehand when a simple graph is required.
    pub fn from_edges(
        index_to_node: Vec<NodeId>,
        edges: &[(usize, usize, f64)],
        undirected: bool,
    ) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut weights: Vec<Vec<f64>> = vec![Vec::new(); node_count];

        for &(u, v, w) in edges {
            outgoing[u].push(v);
            incoming[v].push(u);
            weights[u].push(w);
            if undirected && u != v {
                outgoing[v].push(u);
                incoming[u].push(v);
                weights[v].push(w);
            }
        }

        let mut view = Self::from_adjacency_list(
            node_count,
            index_to_node,
            node_to_index,
            outgoing,
            incoming,
            Some(weights),
        );
        view.undirected = undirected;
        view
    }

    /// Flatten per-node adjacency lists (and optional aligned weight rows) into CSR arrays
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: flat_weights,
            undirected: false,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a view whose NodeIds equal their dense indices
    pub(crate) fn view_from(n: usize, edges: &[(usize, usize, f64)], undirected: bool) -> GraphView {
        GraphView::from_edges((0..n as u64).collect(), edges, undirected)
    }

    #[test]
    fn test_undirected_view_is_symmetric() {
        let view = view_from(3, &[(0, 1, 2.0), (1, 2, 3.0)], true);

        assert_eq!(view.successors(1).len(), 2);
        assert_eq!(view.predecessors(1).len(), 2);
        assert_eq!(view.edge_count(), 2);
        assert_eq!(view.out_strength(1), 5.0);
    }

    #[test]
    fn test_directed_view_degrees() {
        let view = view_from(3, &[(0, 1, 1.0), (0, 2, 4.0)], false);

        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.in_degree(2), 1);
        assert_eq!(view.edge_count(), 2);
        let pairs: Vec<_> = view.weighted_successors(0).collect();
        assert_eq!(pairs, vec![(1, 1.0), (2, 4.0)]);
    }

    #[test]
    fn test_self_loop_counted_once() {
        let view = view_from(2, &[(0, 0, 1.0), (0, 1, 1.0)], true);
        assert_eq!(view.edge_count(), 2);
    }
}
