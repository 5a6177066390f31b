//! Graph algorithm adapter
//!
//! Algorithms live in the `tendergraph-algorithms` crate and run on dense CSR
//! views. This module builds those views from the relationship graph's two
//! representations. Node index `i` maps to `NodeId` `i`.

use crate::graph::store::{EdgeKey, PairAggregate};
use crate::graph::EdgeRecord;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tendergraph_algorithms::{GraphView, NodeId as AlgoNodeId};

// Re-export algorithms
pub use tendergraph_algorithms::{
    betweenness_centrality, bfs_levels, dijkstra_with, label_propagation, louvain, page_rank,
    weakly_connected_components, BetweennessConfig, BetweennessResult, CommunityError,
    CommunityResult, LouvainConfig, PageRankConfig, PageRankResult, WccResult,
};

fn identity_ids(node_count: usize) -> Vec<AlgoNodeId> {
    (0..node_count as AlgoNodeId).collect()
}

/// Simple directed view: one edge per ordered pair, weights of all edge types summed
pub(crate) fn build_directed_view(node_count: usize, edges: &IndexMap<EdgeKey, EdgeRecord>) -> GraphView {
    let mut collapsed: Vec<(usize, usize, f64)> = Vec::with_capacity(edges.len());
    let mut slot: FxHashMap<(usize, usize), usize> = FxHashMap::default();

    for (key, record) in edges {
        match slot.get(&(key.source, key.target)) {
            Some(&pos) => collapsed[pos].2 += record.weight,
            None => {
                slot.insert((key.source, key.target), collapsed.len());
                collapsed.push((key.source, key.target, record.weight));
            }
        }
    }

    GraphView::from_edges(identity_ids(node_count), &collapsed, false)
}

/// Undirected view of the aggregate: one symmetric edge per pair with its accumulated weight
pub(crate) fn build_undirected_view(
    node_count: usize,
    pairs: &IndexMap<(usize, usize), PairAggregate>,
) -> GraphView {
    let edges: Vec<(usize, usize, f64)> = pairs
        .iter()
        .map(|(&(a, b), aggregate)| (a, b, aggregate.weight))
        .collect();

    GraphView::from_edges(identity_ids(node_count), &edges, true)
}

/// Dense index for an algorithm NodeId
pub(crate) fn to_index(id: AlgoNodeId) -> usize {
    id as usize
}
