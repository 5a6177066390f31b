//! Immutable relationship graph
//!
//! Built once from an edge sequence into two owned representations:
//! - a directed multi-relation map keyed by `(source, target, edge_type)`
//! - an undirected aggregate keyed by the unordered pair `{a, b}`
//!
//! Both share one node set. There is no mutation API; a new edge list means a
//! new graph.

use super::edge::{EdgeRecord, RelationshipEdge};
use super::types::{EdgeType, EntityType};
use crate::algo;
use crate::config::{AggregationMode, AnalyticsConfig};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use tendergraph_algorithms::GraphView;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while constructing a graph or loading its inputs
#[derive(Error, Debug)]
pub enum GraphError {
    /// Invalid or unreadable analytics configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Edge payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Key of the directed multi-relation map (dense node indices)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct EdgeKey {
    pub source: usize,
    pub target: usize,
    pub edge_type: EdgeType,
}

/// Accumulated state of an unordered node pair
#[derive(Debug, Clone, Default)]
pub(crate) struct PairAggregate {
    pub weight: f64,
    pub edge_types: BTreeSet<EdgeType>,
}

impl PairAggregate {
    fn absorb(&mut self, weight: f64, edge_type: &EdgeType) {
        self.weight += weight;
        self.edge_types.insert(edge_type.clone());
    }
}

pub(crate) fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Relationship graph between institutions and companies
///
/// Node indices follow first appearance in the edge sequence; the first entity
/// type seen for an id is kept.
#[derive(Debug)]
pub struct RelationGraph {
    pub(crate) config: AnalyticsConfig,

    /// id -> entity type, in first-seen order (index = dense node index)
    pub(crate) entities: IndexMap<String, EntityType>,

    /// Directed multi-relation view
    pub(crate) edges: IndexMap<EdgeKey, EdgeRecord>,

    /// Edge indices leaving / entering each node
    pub(crate) outgoing: Vec<Vec<usize>>,
    pub(crate) incoming: Vec<Vec<usize>>,

    /// Undirected aggregate view
    pub(crate) pairs: IndexMap<(usize, usize), PairAggregate>,

    /// Simple directed graph with parallel edge types collapsed by summing weights
    pub(crate) directed_view: GraphView,

    /// Undirected aggregate as a CSR view
    pub(crate) undirected_view: GraphView,

    dropped_edges: usize,
}

impl RelationGraph {
    /// Build a graph with the default analytics configuration
    pub fn build<I>(edges: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = RelationshipEdge>,
    {
        Self::with_config(edges, AnalyticsConfig::default())
    }

    /// Build a graph from an edge sequence in a single pass
    ///
    /// Edges without both ids are skipped. A later edge with the same
    /// `(source, target, edge_type)` replaces the earlier record.
    pub fn with_config<I>(edges: I, config: AnalyticsConfig) -> GraphResult<Self>
    where
        I: IntoIterator<Item = RelationshipEdge>,
    {
        config.validate()?;

        let mut entities: IndexMap<String, EntityType> = IndexMap::new();
        let mut records: IndexMap<EdgeKey, EdgeRecord> = IndexMap::new();
        let mut pairs: IndexMap<(usize, usize), PairAggregate> = IndexMap::new();
        let mut dropped_edges = 0;

        for edge in edges {
            let Some((source_id, target_id)) = edge.endpoints() else {
                debug!(
                    "Dropping malformed {} edge: source={:?} target={:?}",
                    edge.edge_type, edge.source_id, edge.target_id
                );
                dropped_edges += 1;
                continue;
            };
            let (source_id, target_id) = (source_id.to_string(), target_id.to_string());

            let source = register(&mut entities, &source_id, &edge.source_type);
            let target = register(&mut entities, &target_id, &edge.target_type);
            let weight = edge.sanitized_weight();

            if config.aggregation == AggregationMode::Cumulative {
                pairs
                    .entry(pair_key(source, target))
                    .or_default()
                    .absorb(weight, &edge.edge_type);
            }

            let key = EdgeKey {
                source,
                target,
                edge_type: edge.edge_type.clone(),
            };
            let record = EdgeRecord {
                source_id,
                target_id,
                edge_type: edge.edge_type,
                weight,
                tender_count: edge.tender_count,
                total_value: edge.total_value,
                metadata: edge.metadata,
            };
            // Overwrite keeps the original insertion position
            records.insert(key, record);
        }

        if config.aggregation == AggregationMode::FinalEdges {
            for (key, record) in &records {
                pairs
                    .entry(pair_key(key.source, key.target))
                    .or_default()
                    .absorb(record.weight, &key.edge_type);
            }
        }

        let node_count = entities.len();
        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];
        for (idx, key) in records.keys().enumerate() {
            outgoing[key.source].push(idx);
            incoming[key.target].push(idx);
        }

        let directed_view = algo::build_directed_view(node_count, &records);
        let undirected_view = algo::build_undirected_view(node_count, &pairs);

        info!(
            "Built relationship graph: {} nodes, {} directed edges, {} undirected pairs, {} malformed edges dropped",
            node_count,
            records.len(),
            pairs.len(),
            dropped_edges
        );

        Ok(RelationGraph {
            config,
            entities,
            edges: records,
            outgoing,
            incoming,
            pairs,
            directed_view,
            undirected_view,
            dropped_edges,
        })
    }

    /// Configuration the graph was built with
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Number of distinct entities
    pub fn node_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of distinct `(source, target, edge_type)` records
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct unordered pairs
    pub fn undirected_edge_count(&self) -> usize {
        self.pairs.len()
    }

    /// Edges skipped during construction for missing ids
    pub fn dropped_edge_count(&self) -> usize {
        self.dropped_edges
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn entity_type(&self, id: &str) -> Option<&EntityType> {
        self.entities.get(id)
    }

    /// Entity ids in first-seen order
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// All directed edge records in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &EdgeRecord> {
        self.edges.values()
    }

    /// Aggregate weight and edge types between two entities, in either order
    pub fn aggregate(&self, a: &str, b: &str) -> Option<(f64, Vec<&EdgeType>)> {
        let (a, b) = (self.index_of(a)?, self.index_of(b)?);
        self.pairs
            .get(&pair_key(a, b))
            .map(|p| (p.weight, p.edge_types.iter().collect()))
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.entities.get_index_of(id)
    }

    pub(crate) fn id_at(&self, idx: usize) -> &str {
        self.entities.get_index(idx).map_or("", |(id, _)| id.as_str())
    }

    pub(crate) fn type_at(&self, idx: usize) -> &EntityType {
        &self.entities[idx]
    }

    pub(crate) fn edge_at(&self, edge_idx: usize) -> Option<(&EdgeKey, &EdgeRecord)> {
        self.edges.get_index(edge_idx)
    }

    /// Every directed record between two nodes: `a -> b` first, then `b -> a`
    pub(crate) fn edges_between(&self, a: usize, b: usize) -> Vec<&EdgeRecord> {
        let forward = self.outgoing[a]
            .iter()
            .filter_map(|&e| self.edge_at(e))
            .filter(|(key, _)| key.target == b);
        let backward = self.outgoing[b]
            .iter()
            .filter_map(|&e| self.edge_at(e))
            .filter(|(key, _)| a != b && key.target == a);
        forward.chain(backward).map(|(_, record)| record).collect()
    }

    /// Number of distinct neighbors in the undirected aggregate (self-loops count twice)
    pub(crate) fn undirected_degree(&self, idx: usize) -> usize {
        self.undirected_view.out_degree(idx)
            + self
                .undirected_view
                .successors(idx)
                .iter()
                .filter(|&&n| n == idx)
                .count()
    }
}

/// Dense index of `id`, inserting it with `entity_type` on first sight
fn register(entities: &mut IndexMap<String, EntityType>, id: &str, entity_type: &EntityType) -> usize {
    if let Some(idx) = entities.get_index_of(id) {
        return idx;
    }
    entities.insert(id.to_string(), entity_type.clone());
    entities.len() - 1
}
