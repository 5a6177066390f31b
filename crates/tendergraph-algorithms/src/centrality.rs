//! Betweenness centrality (Brandes) over weighted views
//!
//! Shortest paths are found with Dijkstra using a caller-supplied cost per
//! edge weight. When a sample size is given only that many pivot sources are
//! expanded and the result is extrapolated by `n / k`.

use super::common::{GraphView, NodeId};
use super::pathfinding::State;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BinaryHeap, HashMap};

/// Betweenness configuration
#[derive(Debug, Clone, Copy)]
pub struct BetweennessConfig {
    /// Number of pivot sources; `None` (or a cap >= node count) means exact
    pub sample_size: Option<usize>,
    /// Seed for pivot selection
    pub seed: u64,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            sample_size: None,
            seed: 42,
        }
    }
}

/// Result of betweenness centrality
#[derive(Debug, Clone)]
pub struct BetweennessResult {
    /// Normalized scores, `1 / ((n-1)(n-2))` scaling as for pair fractions
    pub scores: HashMap<NodeId, f64>,
    /// Number of sources actually expanded
    pub pivots: usize,
    pub sampled: bool,
}

/// Betweenness centrality via Brandes' algorithm with weighted shortest paths.
pub fn betweenness_centrality<F>(
    view: &GraphView,
    config: BetweennessConfig,
    cost_of: F,
) -> BetweennessResult
where
    F: Fn(f64) -> f64,
{
    let n = view.node_count;
    if n == 0 {
        return BetweennessResult {
            scores: HashMap::new(),
            pivots: 0,
            sampled: false,
        };
    }

    let sources = select_pivots(n, config);
    let sampled = sources.len() < n;
    let mut bc = vec![0.0_f64; n];

    let mut delta = vec![0.0_f64; n];
    for &s in &sources {
        let (mut stack, predecessors, sigma) = shortest_path_dag(view, s, &cost_of);

        // Back-propagation
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                bc[w] += delta[w];
            }
        }

        for d in delta.iter_mut() {
            *d = 0.0;
        }
    }

    if n > 2 {
        let mut scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        if sampled {
            scale *= n as f64 / sources.len() as f64;
        }
        for b in bc.iter_mut() {
            *b *= scale;
        }
    }

    let scores = bc
        .into_iter()
        .enumerate()
        .map(|(idx, score)| (view.index_to_node[idx], score))
        .collect();

    BetweennessResult {
        scores,
        pivots: sources.len(),
        sampled,
    }
}

fn select_pivots(n: usize, config: BetweennessConfig) -> Vec<usize> {
    match config.sample_size {
        Some(k) if k < n => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let mut pivots = rand::seq::index::sample(&mut rng, n, k).into_vec();
            pivots.sort_unstable();
            pivots
        }
        _ => (0..n).collect(),
    }
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
}

/// Single-source Dijkstra recording every shortest-path predecessor.
///
/// Returns nodes in order of settlement, the predecessor lists and the
/// shortest-path counts.
fn shortest_path_dag<F>(
    view: &GraphView,
    source: usize,
    cost_of: &F,
) -> (Vec<usize>, Vec<Vec<usize>>, Vec<f64>)
where
    F: Fn(f64) -> f64,
{
    let n = view.node_count;
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0_f64; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut stack = Vec::new();
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    sigma[source] = 1.0;
    heap.push(State { cost: 0.0, node_idx: source });

    while let Some(State { cost, node_idx: v }) = heap.pop() {
        if settled[v] || cost > dist[v] {
            continue;
        }
        settled[v] = true;
        stack.push(v);

        for (w, weight) in view.weighted_successors(v) {
            if w == v || settled[w] {
                continue;
            }
            let alt = cost + cost_of(weight);
            if dist[w].is_finite() && nearly_equal(alt, dist[w]) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            } else if alt < dist[w] {
                dist[w] = alt;
                sigma[w] = sigma[v];
                predecessors[w] = vec![v];
                heap.push(State { cost: alt, node_idx: w });
            }
        }
    }

    (stack, predecessors, sigma)
}
