//! Community detection algorithms
//!
//! Weakly connected components (union-find), Louvain modularity optimization
//! and label propagation. Louvain and label propagation expect an undirected
//! view (every edge stored in both directions).

use super::common::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Result of WCC algorithm
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: HashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

impl WccResult {
    /// Size of the largest component, 0 for an empty graph
    pub fn largest_component_size(&self) -> usize {
        self.components.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut curr = i;
        while self.parent[curr] != root {
            let next = self.parent[curr];
            self.parent[curr] = root;
            curr = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let mut components = HashMap::new();
    let mut node_component = HashMap::new();

    for i in 0..n {
        let root = uf.find(i);
        let node_id = view.index_to_node[i];

        components.entry(root).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, root);
    }

    WccResult {
        components,
        node_component,
    }
}

/// Reasons a clustering run cannot produce a partition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommunityError {
    #[error("graph has nodes but no positive edge weight")]
    NoEdgeWeight,

    #[error("edge weight {0} is not a finite non-negative number")]
    InvalidWeight(f64),

    #[error("resolution {0} must be a finite positive number")]
    InvalidResolution(f64),
}

/// A partition of the nodes of a view
#[derive(Debug, Clone)]
pub struct CommunityResult {
    /// NodeId -> community id, ids contiguous from 0
    pub node_community: HashMap<NodeId, usize>,
    pub community_count: usize,
    /// Modularity of the partition on the input graph (resolution-scaled for Louvain)
    pub modularity: f64,
    /// Louvain: levels run. Label propagation: sweeps run.
    pub iterations: usize,
}

// ── Louvain ──────────────────────────────────────────────────────────────────

/// Louvain configuration
#[derive(Debug, Clone, Copy)]
pub struct LouvainConfig {
    /// Higher values favor more, smaller communities
    pub resolution: f64,
    /// Seed for node visiting order
    pub seed: u64,
    /// Maximum aggregation levels
    pub max_levels: usize,
    /// Maximum local-moving sweeps per level
    pub max_sweeps: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 42,
            max_levels: 10,
            max_sweeps: 100,
        }
    }
}

/// Weighted undirected adjacency used between Louvain levels.
/// Self-loops appear once in their node's list.
struct LevelGraph {
    adj: Vec<Vec<(usize, f64)>>,
}

impl LevelGraph {
    fn from_view(view: &GraphView) -> Result<Self, CommunityError> {
        let mut adj = vec![Vec::new(); view.node_count];
        for (u, row) in adj.iter_mut().enumerate() {
            for (v, w) in view.weighted_successors(u) {
                if !w.is_finite() || w < 0.0 {
                    return Err(CommunityError::InvalidWeight(w));
                }
                row.push((v, w));
            }
        }
        Ok(Self { adj })
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    /// Weighted degree, self-loops counted twice
    fn degree(&self, i: usize) -> f64 {
        self.adj[i]
            .iter()
            .map(|&(j, w)| if j == i { 2.0 * w } else { w })
            .sum()
    }

    fn aggregate(&self, community: &[usize], count: usize) -> Self {
        let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (i, row) in self.adj.iter().enumerate() {
            for &(j, w) in row {
                if i > j {
                    continue;
                }
                let (a, b) = (community[i], community[j]);
                let key = if a <= b { (a, b) } else { (b, a) };
                *merged.entry(key).or_default() += w;
            }
        }

        let mut adj = vec![Vec::new(); count];
        for ((a, b), w) in merged {
            adj[a].push((b, w));
            if a != b {
                adj[b].push((a, w));
            }
        }
        Self { adj }
    }
}

/// Louvain community detection.
///
/// Local moving with the resolution-scaled modularity gain, followed by
/// aggregation of communities into super-nodes, repeated until a level makes
/// no move.
pub fn louvain(view: &GraphView, config: LouvainConfig) -> Result<CommunityResult, CommunityError> {
    if !config.resolution.is_finite() || config.resolution <= 0.0 {
        return Err(CommunityError::InvalidResolution(config.resolution));
    }

    let n = view.node_count;
    if n == 0 {
        return Ok(empty_result());
    }

    let base = LevelGraph::from_view(view)?;
    let two_m: f64 = (0..n).map(|i| base.degree(i)).sum();
    if two_m <= 0.0 {
        return Err(CommunityError::NoEdgeWeight);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut membership: Vec<usize> = (0..n).collect();
    let mut graph = base;
    let mut levels = 0;

    while levels < config.max_levels {
        levels += 1;
        let (community, moved) = local_moving(&graph, two_m, config, &mut rng);
        let (community, count) = renumber(&community);

        for m in membership.iter_mut() {
            *m = community[*m];
        }
        if !moved || count == graph.len() {
            break;
        }
        graph = graph.aggregate(&community, count);
    }

    let (membership, community_count) = renumber(&membership);
    let modularity = modularity(view, &membership, config.resolution);

    Ok(CommunityResult {
        node_community: to_node_map(view, &membership),
        community_count,
        modularity,
        iterations: levels,
    })
}

fn local_moving(
    graph: &LevelGraph,
    two_m: f64,
    config: LouvainConfig,
    rng: &mut StdRng,
) -> (Vec<usize>, bool) {
    let n = graph.len();
    let degree: Vec<f64> = (0..n).map(|i| graph.degree(i)).collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut total: Vec<f64> = degree.clone();

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut moved_any = false;
    for _ in 0..config.max_sweeps {
        let mut moved = false;

        for &i in &order {
            let current = community[i];
            let k_i = degree[i];

            // Weight from i to each neighboring community, in adjacency order
            let mut links: Vec<(usize, f64)> = Vec::new();
            let mut slot: FxHashMap<usize, usize> = FxHashMap::default();
            for &(j, w) in &graph.adj[i] {
                if j == i {
                    continue;
                }
                let c = community[j];
                let pos = *slot.entry(c).or_insert_with(|| {
                    links.push((c, 0.0));
                    links.len() - 1
                });
                links[pos].1 += w;
            }

            total[current] -= k_i;
            let gain = |c: usize, w_ic: f64| w_ic - config.resolution * total[c] * k_i / two_m;

            let stay = slot.get(&current).map_or(0.0, |&p| links[p].1);
            let mut best = current;
            let mut best_gain = gain(current, stay);
            for &(c, w_ic) in &links {
                let g = gain(c, w_ic);
                if g > best_gain + 1e-12 || ((g - best_gain).abs() <= 1e-12 && c < best && best != current) {
                    best = c;
                    best_gain = g;
                }
            }

            total[best] += k_i;
            if best != current {
                community[i] = best;
                moved = true;
            }
        }

        if !moved {
            break;
        }
        moved_any = true;
    }

    (community, moved_any)
}

/// Modularity `Q = Σ_c [ L_c / m - γ (d_c / 2m)² ]` on the given view
pub fn modularity(view: &GraphView, membership: &[usize], resolution: f64) -> f64 {
    let n = view.node_count;
    let mut internal: FxHashMap<usize, f64> = FxHashMap::default();
    let mut degree_sum: FxHashMap<usize, f64> = FxHashMap::default();
    let mut two_m = 0.0;

    for u in 0..n {
        for (v, w) in view.weighted_successors(u) {
            let loop_factor = if u == v { 2.0 } else { 1.0 };
            two_m += w * loop_factor;
            *degree_sum.entry(membership[u]).or_default() += w * loop_factor;
            if membership[u] == membership[v] {
                // Each non-loop edge is visited from both ends
                *internal.entry(membership[u]).or_default() += w * loop_factor / 2.0;
            }
        }
    }

    if two_m <= 0.0 {
        return 0.0;
    }
    let m = two_m / 2.0;
    degree_sum
        .iter()
        .map(|(c, d)| {
            let l = internal.get(c).copied().unwrap_or(0.0);
            l / m - resolution * (d / two_m).powi(2)
        })
        .sum()
}

// ── Label Propagation ────────────────────────────────────────────────────────

/// Label Propagation community detection.
///
/// Each node adopts the most frequent label among its neighbors, keeping its
/// own label on ties that include it and otherwise taking the smallest tied
/// label. Deterministic for a given view.
pub fn label_propagation(view: &GraphView, max_iterations: usize) -> CommunityResult {
    let n = view.node_count;
    if n == 0 {
        return empty_result();
    }

    let mut labels: Vec<usize> = (0..n).collect();
    let mut iterations = 0;

    for _ in 0..max_iterations {
        iterations += 1;
        let mut changed = false;

        for i in 0..n {
            let mut label_counts: BTreeMap<usize, usize> = BTreeMap::new();
            for &j in view.successors(i) {
                if j != i {
                    *label_counts.entry(labels[j]).or_default() += 1;
                }
            }

            let Some(&max_count) = label_counts.values().max() else {
                continue;
            };
            if label_counts.get(&labels[i]) == Some(&max_count) {
                continue;
            }
            // BTreeMap iterates ascending: first hit is the smallest tied label
            if let Some((&best_label, _)) = label_counts.iter().find(|(_, &c)| c == max_count) {
                labels[i] = best_label;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    let (labels, community_count) = renumber(&labels);
    let modularity = modularity(view, &labels, 1.0);

    CommunityResult {
        node_community: to_node_map(view, &labels),
        community_count,
        modularity,
        iterations,
    }
}

fn empty_result() -> CommunityResult {
    CommunityResult {
        node_community: HashMap::new(),
        community_count: 0,
        modularity: 0.0,
        iterations: 0,
    }
}

/// Renumber labels to be contiguous, in order of first appearance
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut map: FxHashMap<usize, usize> = FxHashMap::default();
    let renumbered = labels
        .iter()
        .map(|l| {
            let next = map.len();
            *map.entry(*l).or_insert(next)
        })
        .collect();
    (renumbered, map.len())
}

fn to_node_map(view: &GraphView, labels: &[usize]) -> HashMap<NodeId, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, &c)| (view.index_to_node[idx], c))
        .collect()
}
