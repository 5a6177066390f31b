//! Relationship graph data model
//!
//! - Entities identified by string ids, typed `company` / `institution` (open set)
//! - Directed edges keyed by `(source, target, edge_type)`; later duplicates overwrite
//! - An undirected aggregate per entity pair with summed weight and edge-type set
//! - JSON edge sources for loading inputs before construction

pub mod edge;
pub mod property;
pub mod source;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{EdgeRecord, RelationshipEdge};
pub use property::{PropertyMap, PropertyValue};
pub use source::{load_edges_json, read_edges_json};
pub use store::{GraphError, GraphResult, RelationGraph};
pub use types::{EdgeType, EntityType};
