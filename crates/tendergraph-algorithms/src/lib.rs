//! Graph algorithms over a dense CSR `GraphView`.
//!
//! The crate knows nothing about entities or relationship types: callers map
//! their own identifiers onto `NodeId`s and edge weights before building a view.

pub mod centrality;
pub mod common;
pub mod community;
pub mod pagerank;
pub mod pathfinding;

pub use centrality::{betweenness_centrality, BetweennessConfig, BetweennessResult};
pub use common::{GraphView, NodeId};
pub use community::{
    label_propagation, louvain, modularity, weakly_connected_components, CommunityError,
    CommunityResult, LouvainConfig, WccResult,
};
pub use pagerank::{page_rank, PageRankConfig, PageRankResult};
pub use pathfinding::{bfs_levels, dijkstra_with, PathResult};
