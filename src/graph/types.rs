//! Core type definitions for the relationship graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type (e.g., "company", "institution")
///
/// Open-ended: any string is accepted. Defaults to "company".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub const COMPANY: &'static str = "company";
    pub const INSTITUTION: &'static str = "institution";

    pub fn new(entity_type: impl Into<String>) -> Self {
        EntityType(entity_type.into())
    }

    pub fn company() -> Self {
        EntityType::new(Self::COMPANY)
    }

    pub fn institution() -> Self {
        EntityType::new(Self::INSTITUTION)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityType {
    fn default() -> Self {
        EntityType::company()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        EntityType(s)
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType(s.to_string())
    }
}

/// Relationship type (e.g., "co_bidding", "buyer_supplier")
///
/// Never validated against a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeType(String);

impl EdgeType {
    pub const CO_BIDDING: &'static str = "co_bidding";
    pub const BUYER_SUPPLIER: &'static str = "buyer_supplier";
    pub const REPEAT_PARTNERSHIP: &'static str = "repeat_partnership";
    pub const VALUE_CONCENTRATION: &'static str = "value_concentration";

    pub fn new(edge_type: impl Into<String>) -> Self {
        EdgeType(edge_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_buyer_supplier(&self) -> bool {
        self.0 == Self::BUYER_SUPPLIER
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeType {
    fn from(s: String) -> Self {
        EdgeType(s)
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        EdgeType(s.to_string())
    }
}
