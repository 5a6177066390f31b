//! Relationship edge records
//!
//! `RelationshipEdge` is the input record produced by an edge source.
//! `EdgeRecord` is what the graph stores per `(source, target, edge_type)` key
//! and hands back from queries.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeType, EntityType};
use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

/// A directed relationship between two entities, as supplied by an edge source
///
/// Ids are optional so that incomplete records deserialize; the graph builder
/// drops them instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    #[serde(default)]
    pub source_id: Option<String>,

    #[serde(default)]
    pub target_id: Option<String>,

    pub edge_type: EdgeType,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub source_type: EntityType,

    #[serde(default)]
    pub target_type: EntityType,

    #[serde(default)]
    pub tender_count: u64,

    #[serde(default)]
    pub total_value: f64,

    #[serde(default)]
    pub metadata: PropertyMap,
}

impl RelationshipEdge {
    /// Create an edge between two companies with weight 1.0
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        edge_type: impl Into<EdgeType>,
    ) -> Self {
        RelationshipEdge {
            source_id: Some(source_id.into()),
            target_id: Some(target_id.into()),
            edge_type: edge_type.into(),
            weight: default_weight(),
            source_type: EntityType::default(),
            target_type: EntityType::default(),
            tender_count: 0,
            total_value: 0.0,
            metadata: PropertyMap::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_types(mut self, source_type: impl Into<EntityType>, target_type: impl Into<EntityType>) -> Self {
        self.source_type = source_type.into();
        self.target_type = target_type.into();
        self
    }

    pub fn with_tender_count(mut self, tender_count: u64) -> Self {
        self.tender_count = tender_count;
        self
    }

    pub fn with_total_value(mut self, total_value: f64) -> Self {
        self.total_value = total_value;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Both endpoint ids, if present and non-empty
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let source = self.source_id.as_deref().filter(|s| !s.is_empty())?;
        let target = self.target_id.as_deref().filter(|s| !s.is_empty())?;
        Some((source, target))
    }

    /// Weight clamped to a finite non-negative number
    pub fn sanitized_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}

/// A stored directed relationship, unique per `(source_id, target_id, edge_type)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub source_id: String,
    pub target_id: String,
    pub edge_type: EdgeType,
    pub weight: f64,
    pub tender_count: u64,
    pub total_value: f64,
    pub metadata: PropertyMap,
}

impl EdgeRecord {
    /// Check if this edge connects two specific entities (in either direction)
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }
}
