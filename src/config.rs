//! Analytics configuration
//!
//! Every field has a default, so an empty YAML document is a valid config.
//! `validate` runs when a graph is constructed; an invalid config aborts
//! construction with `GraphError::Configuration`.

use crate::graph::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the undirected aggregate weight of a pair is accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Sum the weights of the directed edges that survive key overwrites
    #[default]
    FinalEdges,
    /// Add every inserted edge's weight, including ones later overwritten
    Cumulative,
}

/// PageRank parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankSettings {
    pub damping_factor: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    /// Tolerance for the single retry, which also doubles `max_iterations`
    pub retry_tolerance: f64,
}

impl Default for PageRankSettings {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
            retry_tolerance: 1e-4,
        }
    }
}

impl PageRankSettings {
    /// Iteration budget of the retry run
    pub fn retry_iterations(&self) -> usize {
        self.max_iterations.saturating_mul(2)
    }
}

/// One sampling threshold: graphs with more than `min_nodes` nodes expand at
/// most `sample_cap` pivot sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingTier {
    pub min_nodes: usize,
    pub sample_cap: usize,
}

/// Threshold-triggered pivot sampling for betweenness centrality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingPolicy {
    pub tiers: Vec<SamplingTier>,
    pub seed: u64,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                SamplingTier { min_nodes: 5_000, sample_cap: 1_000 },
                SamplingTier { min_nodes: 1_000, sample_cap: 500 },
            ],
            seed: 42,
        }
    }
}

impl SamplingPolicy {
    /// Always compute exact betweenness
    pub fn exact() -> Self {
        Self {
            tiers: Vec::new(),
            ..Self::default()
        }
    }

    /// Pivot count for a graph of `node_count` nodes, `None` for exact computation.
    ///
    /// The tier with the highest threshold below `node_count` applies.
    pub fn sample_size_for(&self, node_count: usize) -> Option<usize> {
        self.tiers
            .iter()
            .filter(|tier| node_count > tier.min_nodes)
            .max_by_key(|tier| tier.min_nodes)
            .map(|tier| tier.sample_cap.min(node_count))
    }

    fn validate(&self) -> GraphResult<()> {
        if let Some(tier) = self.tiers.iter().find(|t| t.sample_cap == 0) {
            return Err(GraphError::Configuration(format!(
                "sampling tier above {} nodes has a zero sample cap",
                tier.min_nodes
            )));
        }
        Ok(())
    }
}

/// Community detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunitySettings {
    /// Default Louvain resolution; higher gives more, smaller communities
    pub resolution: f64,
    pub seed: u64,
    pub max_levels: usize,
    pub max_sweeps: usize,
    pub label_propagation_max_iterations: usize,
    /// When false the modularity strategy reports itself unavailable
    pub primary_enabled: bool,
}

impl Default for CommunitySettings {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            seed: 42,
            max_levels: 10,
            max_sweeps: 100,
            label_propagation_max_iterations: 100,
            primary_enabled: true,
        }
    }
}

/// Top-level analytics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub pagerank: PageRankSettings,
    pub sampling: SamplingPolicy,
    pub community: CommunitySettings,
    /// Floor applied before inverting weights into path distances
    pub min_distance_weight: f64,
    pub aggregation: AggregationMode,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            pagerank: PageRankSettings::default(),
            sampling: SamplingPolicy::default(),
            community: CommunitySettings::default(),
            min_distance_weight: 1e-9,
            aggregation: AggregationMode::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_yaml_str(yaml: &str) -> GraphResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| GraphError::Configuration(format!("invalid analytics config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            GraphError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Check parameter ranges
    pub fn validate(&self) -> GraphResult<()> {
        let pr = &self.pagerank;
        if !(pr.damping_factor > 0.0 && pr.damping_factor < 1.0) {
            return Err(GraphError::Configuration(format!(
                "pagerank damping factor {} must be in (0, 1)",
                pr.damping_factor
            )));
        }
        if pr.max_iterations == 0 {
            return Err(GraphError::Configuration(
                "pagerank max_iterations must be positive".to_string(),
            ));
        }
        if !(pr.tolerance > 0.0 && pr.retry_tolerance >= pr.tolerance) {
            return Err(GraphError::Configuration(format!(
                "pagerank tolerances must satisfy 0 < tolerance ({}) <= retry_tolerance ({})",
                pr.tolerance, pr.retry_tolerance
            )));
        }
        if !(self.min_distance_weight > 0.0 && self.min_distance_weight.is_finite()) {
            return Err(GraphError::Configuration(format!(
                "min_distance_weight {} must be a finite positive number",
                self.min_distance_weight
            )));
        }
        if !(self.community.resolution > 0.0 && self.community.resolution.is_finite()) {
            return Err(GraphError::Configuration(format!(
                "community resolution {} must be a finite positive number",
                self.community.resolution
            )));
        }
        self.sampling.validate()
    }
}
