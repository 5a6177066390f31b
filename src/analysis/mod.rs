//! Read-only analytical queries over a built `RelationGraph`
//!
//! Each submodule adds an `impl RelationGraph` block:
//! - neighborhood expansion and direct connections
//! - strongest-relationship shortest paths
//! - PageRank, betweenness and gatekeepers
//! - community detection with a fallback strategy
//! - revolving-door patterns
//! - summary statistics

pub mod centrality;
pub mod community;
pub mod neighborhood;
pub mod path;
pub mod patterns;
pub mod stats;

pub use centrality::{CentralityScores, Gatekeeper};
pub use community::{
    run_with_fallback, Community, CommunityDetectionStrategy, CommunityMethod, CommunityReport,
    LabelPropagationStrategy, LouvainStrategy, StrategyError,
};
pub use neighborhood::{Connection, Direction, Neighborhood, NeighborhoodNode};
pub use path::{PathHop, PathReport};
pub use patterns::RevolvingDoor;
pub use stats::GraphStats;
