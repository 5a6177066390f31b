//! Centrality scores and gatekeeper detection

use crate::algo::{
    self, betweenness_centrality, page_rank, BetweennessConfig, BetweennessResult, PageRankConfig,
    PageRankResult,
};
use crate::graph::{EntityType, RelationGraph};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tendergraph_algorithms::NodeId as AlgoNodeId;
use tracing::{debug, warn};

/// A node brokering connections, ranked by betweenness
#[derive(Debug, Clone, Serialize)]
pub struct Gatekeeper {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub betweenness: f64,
    /// Distinct neighbors in the undirected aggregate
    pub degree: usize,
    /// Directed edges touching the node, by edge type
    pub edge_types: BTreeMap<String, usize>,
}

/// Per-node scores for callers that persist derived metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralityScores {
    pub pagerank: f64,
    pub betweenness: f64,
    pub degree: usize,
}

impl RelationGraph {
    /// PageRank over the directed graph with parallel edge types collapsed.
    ///
    /// If the configured budget does not converge, one retry runs with twice
    /// the iterations and the relaxed tolerance; its scores are returned
    /// whether or not it converged.
    pub fn compute_pagerank(&self) -> BTreeMap<String, f64> {
        let scores = self.pagerank_by_index();
        self.by_id(&scores)
    }

    /// Normalized betweenness on the undirected aggregate, sampled per the sampling policy
    pub fn compute_betweenness(&self) -> BTreeMap<String, f64> {
        let scores = self.betweenness_by_index();
        self.by_id(&scores)
    }

    /// Up to `top_n` nodes with positive betweenness, highest first
    pub fn detect_gatekeepers(&self, top_n: usize) -> Vec<Gatekeeper> {
        let scores = self.betweenness_by_index();

        let mut ranked: Vec<(usize, f64)> = (0..self.node_count())
            .map(|idx| (idx, scores.get(&(idx as AlgoNodeId)).copied().unwrap_or(0.0)))
            .filter(|&(_, score)| score > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(top_n)
            .map(|(idx, betweenness)| Gatekeeper {
                entity_id: self.id_at(idx).to_string(),
                entity_type: self.type_at(idx).clone(),
                betweenness,
                degree: self.undirected_degree(idx),
                edge_types: self.edge_type_breakdown(idx),
            })
            .collect()
    }

    /// PageRank, betweenness and undirected degree for every node
    pub fn centrality_scores(&self) -> BTreeMap<String, CentralityScores> {
        let pagerank = self.pagerank_by_index();
        let betweenness = self.betweenness_by_index();

        (0..self.node_count())
            .map(|idx| {
                let id = idx as AlgoNodeId;
                (
                    self.id_at(idx).to_string(),
                    CentralityScores {
                        pagerank: pagerank.get(&id).copied().unwrap_or(0.0),
                        betweenness: betweenness.get(&id).copied().unwrap_or(0.0),
                        degree: self.undirected_degree(idx),
                    },
                )
            })
            .collect()
    }

    fn pagerank_by_index(&self) -> HashMap<AlgoNodeId, f64> {
        self.pagerank_result().scores
    }

    /// PageRank with the single retry applied; the returned result is the retry's when one ran
    pub(crate) fn pagerank_result(&self) -> PageRankResult {
        let settings = self.config.pagerank;
        let config = PageRankConfig {
            damping_factor: settings.damping_factor,
            iterations: settings.max_iterations,
            tolerance: settings.tolerance,
        };

        let result = page_rank(&self.directed_view, config);
        if result.converged {
            return result;
        }

        let retry_iterations = settings.retry_iterations();
        warn!(
            "PageRank did not converge in {} iterations; retrying with {} iterations at tolerance {}",
            result.iterations, retry_iterations, settings.retry_tolerance
        );
        let retry = page_rank(
            &self.directed_view,
            PageRankConfig {
                iterations: retry_iterations,
                tolerance: settings.retry_tolerance,
                ..config
            },
        );
        if !retry.converged {
            warn!(
                "PageRank still unconverged after {} iterations; returning partial scores",
                retry.iterations
            );
        }
        retry
    }

    fn betweenness_by_index(&self) -> HashMap<AlgoNodeId, f64> {
        self.betweenness_result().scores
    }

    /// Betweenness with the sampling policy applied for the current node count
    pub(crate) fn betweenness_result(&self) -> BetweennessResult {
        let n = self.node_count();
        let config = BetweennessConfig {
            sample_size: self.config.sampling.sample_size_for(n),
            seed: self.config.sampling.seed,
        };
        let epsilon = self.config.min_distance_weight;

        let result = betweenness_centrality(&self.undirected_view, config, |w| 1.0 / w.max(epsilon));
        if result.sampled {
            debug!("Betweenness sampled {} of {} nodes as pivots", result.pivots, n);
        }
        result
    }

    fn by_id(&self, scores: &HashMap<AlgoNodeId, f64>) -> BTreeMap<String, f64> {
        scores
            .iter()
            .map(|(&id, &score)| (self.id_at(algo::to_index(id)).to_string(), score))
            .collect()
    }

    /// Counts of directed edges touching `idx` by type; self-loops count once
    pub(crate) fn edge_type_breakdown(&self, idx: usize) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        let incoming = self.incoming[idx].iter().filter(|&&e| {
            self.edge_at(e).map_or(false, |(key, _)| key.source != idx)
        });
        for &e in self.outgoing[idx].iter().chain(incoming) {
            if let Some((key, _)) = self.edge_at(e) {
                *counts.entry(key.edge_type.to_string()).or_default() += 1;
            }
        }
        counts
    }
}
