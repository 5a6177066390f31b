//! Community detection
//!
//! Modularity-based Louvain clustering is the primary strategy. If it is
//! unavailable or fails on the graph, label propagation runs instead. The
//! strategy that produced the partition is reported with the result.

use crate::algo::{self, label_propagation, louvain, CommunityError, CommunityResult, LouvainConfig};
use crate::config::CommunitySettings;
use crate::graph::RelationGraph;
use serde::Serialize;
use std::collections::BTreeMap;
use tendergraph_algorithms::GraphView;
use thiserror::Error;
use tracing::warn;

/// Clustering method that produced a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityMethod {
    Louvain,
    LabelPropagation,
}

/// Why a strategy produced no partition
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("{0} strategy is unavailable")]
    Unavailable(&'static str),

    #[error(transparent)]
    Failed(#[from] CommunityError),
}

/// A clustering algorithm over the undirected aggregate view
pub trait CommunityDetectionStrategy {
    fn method(&self) -> CommunityMethod;

    fn detect(&self, view: &GraphView) -> Result<CommunityResult, StrategyError>;
}

/// Louvain modularity optimization with tunable resolution and a fixed seed
pub struct LouvainStrategy {
    pub config: LouvainConfig,
    pub enabled: bool,
}

impl CommunityDetectionStrategy for LouvainStrategy {
    fn method(&self) -> CommunityMethod {
        CommunityMethod::Louvain
    }

    fn detect(&self, view: &GraphView) -> Result<CommunityResult, StrategyError> {
        if !self.enabled {
            return Err(StrategyError::Unavailable("louvain"));
        }
        Ok(louvain(view, self.config)?)
    }
}

/// Label propagation; ignores resolution
pub struct LabelPropagationStrategy {
    pub max_iterations: usize,
}

impl CommunityDetectionStrategy for LabelPropagationStrategy {
    fn method(&self) -> CommunityMethod {
        CommunityMethod::LabelPropagation
    }

    fn detect(&self, view: &GraphView) -> Result<CommunityResult, StrategyError> {
        Ok(label_propagation(view, self.max_iterations))
    }
}

/// One detected community
#[derive(Debug, Clone, Serialize)]
pub struct Community {
    pub community_id: usize,
    /// Member ids, sorted
    pub members: Vec<String>,
    pub member_count: usize,
    /// Directed edges with both ends inside; parallel edge types count separately
    pub internal_edge_count: usize,
    pub edge_types: BTreeMap<String, usize>,
}

/// Partition of the graph into communities, largest first
#[derive(Debug, Clone, Serialize)]
pub struct CommunityReport {
    pub method: CommunityMethod,
    /// Resolution requested; only Louvain uses it
    pub resolution: f64,
    pub modularity: f64,
    pub community_count: usize,
    pub communities: Vec<Community>,
}

/// Node index groups, ordered by size descending then by smallest member id
struct Partition {
    method: CommunityMethod,
    modularity: f64,
    groups: Vec<Vec<usize>>,
}

impl RelationGraph {
    /// Detect communities using the configured resolution
    pub fn detect_communities(&self) -> CommunityReport {
        self.detect_communities_with_resolution(self.config.community.resolution)
    }

    /// Detect communities; higher resolution yields more, smaller communities
    pub fn detect_communities_with_resolution(&self, resolution: f64) -> CommunityReport {
        let partition = self.partition(resolution);

        let mut membership = vec![0usize; self.node_count()];
        for (cid, group) in partition.groups.iter().enumerate() {
            for &idx in group {
                membership[idx] = cid;
            }
        }

        let mut communities: Vec<Community> = partition
            .groups
            .iter()
            .enumerate()
            .map(|(cid, group)| {
                let mut members: Vec<String> =
                    group.iter().map(|&i| self.id_at(i).to_string()).collect();
                members.sort();
                Community {
                    community_id: cid,
                    member_count: members.len(),
                    members,
                    internal_edge_count: 0,
                    edge_types: BTreeMap::new(),
                }
            })
            .collect();

        for key in self.edges.keys() {
            let cid = membership[key.source];
            if cid == membership[key.target] {
                let community = &mut communities[cid];
                community.internal_edge_count += 1;
                *community.edge_types.entry(key.edge_type.to_string()).or_default() += 1;
            }
        }

        CommunityReport {
            method: partition.method,
            resolution,
            modularity: partition.modularity,
            community_count: communities.len(),
            communities,
        }
    }

    /// Bare entity -> community id map, with the same ids `detect_communities_with_resolution` assigns
    pub fn compute_community_map(&self, resolution: f64) -> BTreeMap<String, usize> {
        self.partition(resolution)
            .groups
            .iter()
            .enumerate()
            .flat_map(|(cid, group)| group.iter().map(move |&i| (self.id_at(i).to_string(), cid)))
            .collect()
    }

    fn partition(&self, resolution: f64) -> Partition {
        let settings: CommunitySettings = self.config.community;
        let primary = LouvainStrategy {
            config: LouvainConfig {
                resolution,
                seed: settings.seed,
                max_levels: settings.max_levels,
                max_sweeps: settings.max_sweeps,
            },
            enabled: settings.primary_enabled,
        };
        let fallback = LabelPropagationStrategy {
            max_iterations: settings.label_propagation_max_iterations,
        };

        let (method, result) = run_with_fallback(&primary, &fallback, &self.undirected_view);

        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); result.community_count];
        for (&node, &cid) in &result.node_community {
            groups[cid].push(algo::to_index(node));
        }
        for group in groups.iter_mut() {
            group.sort_by(|&a, &b| self.id_at(a).cmp(self.id_at(b)));
        }
        groups.retain(|g| !g.is_empty());
        groups.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| self.id_at(a[0]).cmp(self.id_at(b[0])))
        });

        Partition {
            method,
            modularity: result.modularity,
            groups,
        }
    }
}

/// Run `primary`, switching to `fallback` if it cannot produce a partition
pub fn run_with_fallback(
    primary: &dyn CommunityDetectionStrategy,
    fallback: &dyn CommunityDetectionStrategy,
    view: &GraphView,
) -> (CommunityMethod, CommunityResult) {
    match primary.detect(view) {
        Ok(result) => (primary.method(), result),
        Err(primary_err) => {
            warn!(
                "{:?} community detection failed ({}); falling back to {:?}",
                primary.method(),
                primary_err,
                fallback.method()
            );
            match fallback.detect(view) {
                Ok(result) => (fallback.method(), result),
                Err(fallback_err) => {
                    // Every node alone is always a valid partition
                    warn!("{:?} community detection failed ({}); using singletons", fallback.method(), fallback_err);
                    (fallback.method(), singletons(view))
                }
            }
        }
    }
}

fn singletons(view: &GraphView) -> CommunityResult {
    CommunityResult {
        node_community: view
            .index_to_node
            .iter()
            .enumerate()
            .map(|(cid, &node)| (node, cid))
            .collect(),
        community_count: view.node_count,
        modularity: 0.0,
        iterations: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::graph::RelationshipEdge;

    fn clusters() -> Vec<RelationshipEdge> {
        vec![
            RelationshipEdge::new("A1", "A2", "co_bidding").with_weight(3.0),
            RelationshipEdge::new("A2", "A3", "co_bidding").with_weight(3.0),
            RelationshipEdge::new("A1", "A3", "repeat_partnership").with_weight(3.0),
            RelationshipEdge::new("A1", "A3", "co_bidding").with_weight(1.0),
            RelationshipEdge::new("B1", "B2", "co_bidding").with_weight(3.0),
            RelationshipEdge::new("B2", "B3", "co_bidding").with_weight(3.0),
            RelationshipEdge::new("B3", "B1", "co_bidding").with_weight(3.0),
            RelationshipEdge::new("B3", "B4", "co_bidding").with_weight(3.0),
            RelationshipEdge::new("A3", "B1", "buyer_supplier").with_weight(0.2),
        ]
    }

    #[test]
    fn test_louvain_finds_two_clusters() {
        let graph = RelationGraph::build(clusters()).unwrap();
        let report = graph.detect_communities();

        assert_eq!(report.method, CommunityMethod::Louvain);
        assert_eq!(report.community_count, 2);

        let largest = &report.communities[0];
        assert_eq!(largest.members, vec!["B1", "B2", "B3", "B4"]);
        assert_eq!(largest.internal_edge_count, 4);

        let second = &report.communities[1];
        assert_eq!(second.members, vec!["A1", "A2", "A3"]);
        // Parallel A1->A3 edge types count separately
        assert_eq!(second.internal_edge_count, 4);
        assert_eq!(second.edge_types["co_bidding"], 3);
        assert_eq!(second.edge_types["repeat_partnership"], 1);
    }

    #[test]
    fn test_every_node_in_exactly_one_community() {
        let graph = RelationGraph::build(clusters()).unwrap();
        let report = graph.detect_communities();

        let total: usize = report.communities.iter().map(|c| c.member_count).sum();
        assert_eq!(total, graph.node_count());

        let mut seen: Vec<&String> = report.communities.iter().flat_map(|c| c.members.iter()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), graph.node_count());
    }

    #[test]
    fn test_disabled_primary_falls_back_to_label_propagation() {
        let mut config = AnalyticsConfig::default();
        config.community.primary_enabled = false;
        let graph = RelationGraph::with_config(clusters(), config).unwrap();

        let report = graph.detect_communities();
        assert_eq!(report.method, CommunityMethod::LabelPropagation);
        let total: usize = report.communities.iter().map(|c| c.member_count).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_weightless_graph_falls_back() {
        let graph = RelationGraph::build(vec![
            RelationshipEdge::new("A", "B", "co_bidding").with_weight(0.0),
            RelationshipEdge::new("C", "D", "co_bidding").with_weight(0.0),
        ])
        .unwrap();

        let report = graph.detect_communities();
        assert_eq!(report.method, CommunityMethod::LabelPropagation);
        assert_eq!(report.community_count, 2);
    }

    #[test]
    fn test_community_map_matches_report_ids() {
        let graph = RelationGraph::build(clusters()).unwrap();
        let report = graph.detect_communities_with_resolution(1.0);
        let map = graph.compute_community_map(1.0);

        assert_eq!(map.len(), graph.node_count());
        for community in &report.communities {
            for member in &community.members {
                assert_eq!(map[member], community.community_id);
            }
        }
    }

    #[test]
    fn test_communities_sorted_by_size() {
        let graph = RelationGraph::build(clusters()).unwrap();
        let report = graph.detect_communities_with_resolution(2.0);
        for pair in report.communities.windows(2) {
            assert!(pair[0].member_count >= pair[1].member_count);
        }
    }

    #[test]
    fn test_empty_graph_has_no_communities() {
        let graph = RelationGraph::build(Vec::new()).unwrap();
        let report = graph.detect_communities();
        assert_eq!(report.community_count, 0);
        assert!(graph.compute_community_map(1.0).is_empty());
    }

    struct Broken;

    impl CommunityDetectionStrategy for Broken {
        fn method(&self) -> CommunityMethod {
            CommunityMethod::LabelPropagation
        }

        fn detect(&self, _view: &GraphView) -> Result<CommunityResult, StrategyError> {
            Err(StrategyError::Unavailable("broken"))
        }
    }

    #[test]
    fn test_both_strategies_failing_yields_singletons() {
        let graph = RelationGraph::build(clusters()).unwrap();
        let (_, result) = run_with_fallback(&Broken, &Broken, &graph.undirected_view);
        assert_eq!(result.community_count, graph.node_count());
    }
}
