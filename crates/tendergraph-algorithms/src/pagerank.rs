//! PageRank algorithm implementation
//!
//! Weighted power iteration: a node passes rank to its successors in
//! proportion to edge weight. Rank held by dangling nodes (no outgoing weight)
//! is spread uniformly. Scores sum to 1.

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// PageRank configuration
#[derive(Debug, Clone, Copy)]
pub struct PageRankConfig {
    /// Damping factor (usually 0.85)
    pub damping_factor: f64,
    /// Maximum number of iterations
    pub iterations: usize,
    /// Convergence tolerance, scaled by node count
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Result of a PageRank run
#[derive(Debug, Clone)]
pub struct PageRankResult {
    pub scores: HashMap<NodeId, f64>,
    pub iterations: usize,
    /// False when the iteration budget ran out before the L1 change fell below `n * tolerance`
    pub converged: bool,
}

/// Calculate PageRank for the graph view
pub fn page_rank(view: &GraphView, config: PageRankConfig) -> PageRankResult {
    let n = view.node_count;

    if n == 0 {
        return PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let uniform = 1.0 / n as f64;
    let mut scores = vec![uniform; n];
    let mut next_scores = vec![0.0; n];
    let strength: Vec<f64> = (0..n).map(|i| view.out_strength(i)).collect();

    let d = config.damping_factor;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.iterations {
        iterations += 1;

        let dangling: f64 = (0..n)
            .filter(|&i| strength[i] <= 0.0)
            .map(|i| scores[i])
            .sum();
        let base = (1.0 - d) * uniform + d * dangling * uniform;
        next_scores.iter_mut().for_each(|s| *s = base);

        for u in 0..n {
            if strength[u] <= 0.0 {
                continue;
            }
            let share = d * scores[u] / strength[u];
            for (v, w) in view.weighted_successors(u) {
                next_scores[v] += share * w;
            }
        }

        let total_diff: f64 = scores
            .iter()
            .zip(next_scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        // Swap buffers
        std::mem::swap(&mut scores, &mut next_scores);

        if total_diff < n as f64 * config.tolerance {
            converged = true;
            break;
        }
    }

    let mut result = HashMap::with_capacity(n);
    for (idx, score) in scores.into_iter().enumerate() {
        result.insert(view.index_to_node[idx], score);
    }

    PageRankResult {
        scores: result,
        iterations,
        converged,
    }
}
