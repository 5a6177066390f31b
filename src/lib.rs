//! Tendergraph
//!
//! Relationship-graph analytics for public procurement. A `RelationGraph` is
//! built once from a flat list of relationship records between institutions
//! and companies and then answers read-only structural queries:
//!
//! - neighborhoods and direct connections
//! - strongest-relationship shortest paths
//! - PageRank, sampled betweenness and gatekeepers
//! - community detection (Louvain, with label propagation as fallback)
//! - revolving-door patterns
//! - summary statistics
//!
//! # Architecture
//!
//! - `graph`: data model and the dual-representation graph builder
//! - `analysis`: query methods, one module per concern
//! - `algo`: adapter onto the `tendergraph-algorithms` CSR crate
//! - `config`: YAML-loadable analytics configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use tendergraph::{RelationGraph, RelationshipEdge};
//!
//! let graph = RelationGraph::build(vec![
//!     RelationshipEdge::new("MIN", "ACME", "buyer_supplier")
//!         .with_types("institution", "company")
//!         .with_total_value(1200.0),
//!     RelationshipEdge::new("ACME", "BETA", "co_bidding").with_weight(3.0),
//! ])
//! .unwrap();
//!
//! let stats = graph.get_stats();
//! assert_eq!(stats.node_count, 3);
//!
//! let path = graph.shortest_path("MIN", "BETA");
//! assert_eq!(path.hop_count, 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod analysis;
pub mod config;
pub mod graph;

// Re-export main types for convenience
pub use graph::{
    load_edges_json, read_edges_json, EdgeRecord, EdgeType, EntityType, GraphError, GraphResult,
    PropertyMap, PropertyValue, RelationGraph, RelationshipEdge,
};

pub use analysis::{
    CentralityScores, Community, CommunityMethod, CommunityReport, Connection, Direction,
    Gatekeeper, GraphStats, Neighborhood, NeighborhoodNode, PathHop, PathReport, RevolvingDoor,
};

pub use config::{
    AggregationMode, AnalyticsConfig, CommunitySettings, PageRankSettings, SamplingPolicy,
    SamplingTier,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
