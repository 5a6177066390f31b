//! Neighborhood expansion and direct connections

use crate::algo::{self, bfs_levels};
use crate::graph::{EdgeRecord, EntityType, RelationGraph};
use serde::Serialize;
use std::collections::HashMap;

/// An entity reached by a neighborhood expansion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodNode {
    pub id: String,
    pub entity_type: EntityType,
    /// Hops from the center, 0 for the center itself
    pub depth: usize,
}

/// Entities within a hop bound of a center, with the edges among them
#[derive(Debug, Clone, Serialize)]
pub struct Neighborhood {
    pub center: String,
    pub hops: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<NeighborhoodNode>,
    pub edges: Vec<EdgeRecord>,
}

impl Neighborhood {
    fn empty(center: &str, hops: usize) -> Self {
        Neighborhood {
            center: center.to_string(),
            hops,
            node_count: 0,
            edge_count: 0,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Depth of `id`, if it was reached
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.depth)
    }
}

/// How a neighbor relates to the queried entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Only edges from the entity to the neighbor
    Outgoing,
    /// Only edges from the neighbor to the entity
    Incoming,
    Bidirectional,
}

/// A neighbor with every edge record between it and the queried entity
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub direction: Direction,
    pub total_weight: f64,
    pub edges: Vec<EdgeRecord>,
}

impl RelationGraph {
    /// Entities within `hops` of `center`, ignoring edge direction.
    ///
    /// Edges are the directed records whose endpoints were both reached,
    /// excluding self-loops. An unknown center yields an empty neighborhood.
    pub fn get_neighborhood(&self, center: &str, hops: usize) -> Neighborhood {
        let Some(center_idx) = self.index_of(center) else {
            return Neighborhood::empty(center, hops);
        };
        let Some(levels) = bfs_levels(&self.directed_view, center_idx as u64, hops) else {
            return Neighborhood::empty(center, hops);
        };

        let depth: HashMap<usize, usize> = levels
            .iter()
            .map(|&(id, d)| (algo::to_index(id), d))
            .collect();

        let nodes: Vec<NeighborhoodNode> = levels
            .iter()
            .map(|&(id, d)| {
                let idx = algo::to_index(id);
                NeighborhoodNode {
                    id: self.id_at(idx).to_string(),
                    entity_type: self.type_at(idx).clone(),
                    depth: d,
                }
            })
            .collect();

        let edges: Vec<EdgeRecord> = levels
            .iter()
            .flat_map(|&(id, _)| self.outgoing[algo::to_index(id)].iter())
            .filter_map(|&e| self.edge_at(e))
            .filter(|(key, _)| key.source != key.target && depth.contains_key(&key.target))
            .map(|(_, record)| record.clone())
            .collect();

        Neighborhood {
            center: center.to_string(),
            hops,
            node_count: nodes.len(),
            edge_count: edges.len(),
            nodes,
            edges,
        }
    }

    /// Every neighbor linked to `entity` by an outgoing or incoming edge,
    /// strongest (by summed weight) first. Unknown entities have no connections.
    pub fn get_direct_connections(&self, entity: &str) -> Vec<Connection> {
        let Some(idx) = self.index_of(entity) else {
            return Vec::new();
        };

        // neighbor -> (has outgoing, has incoming), in first-seen order
        let mut neighbors: Vec<(usize, bool, bool)> = Vec::new();
        let mut slot: HashMap<usize, usize> = HashMap::new();
        let outgoing = self.outgoing[idx].iter().map(|&e| (e, true));
        let incoming = self.incoming[idx].iter().map(|&e| (e, false));

        for (e, is_out) in outgoing.chain(incoming) {
            let Some((key, _)) = self.edge_at(e) else { continue };
            let other = if is_out { key.target } else { key.source };
            if other == idx {
                continue;
            }
            let pos = *slot.entry(other).or_insert_with(|| {
                neighbors.push((other, false, false));
                neighbors.len() - 1
            });
            if is_out {
                neighbors[pos].1 = true;
            } else {
                neighbors[pos].2 = true;
            }
        }

        let mut connections: Vec<Connection> = neighbors
            .into_iter()
            .map(|(other, has_out, has_in)| {
                let direction = match (has_out, has_in) {
                    (true, true) => Direction::Bidirectional,
                    (true, false) => Direction::Outgoing,
                    _ => Direction::Incoming,
                };
                let edges: Vec<EdgeRecord> =
                    self.edges_between(idx, other).into_iter().cloned().collect();
                Connection {
                    entity_id: self.id_at(other).to_string(),
                    entity_type: self.type_at(other).clone(),
                    direction,
                    total_weight: edges.iter().map(|e| e.weight).sum(),
                    edges,
                }
            })
            .collect();

        connections.sort_by(|a, b| b.total_weight.total_cmp(&a.total_weight));
        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationshipEdge;

    fn ring() -> RelationGraph {
        RelationGraph::build(vec![
            RelationshipEdge::new("A", "B", "buyer_supplier").with_weight(3.0),
            RelationshipEdge::new("B", "C", "buyer_supplier").with_weight(1.0),
            RelationshipEdge::new("C", "A", "buyer_supplier").with_weight(2.0),
            RelationshipEdge::new("C", "D", "co_bidding").with_weight(1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_one_hop_neighborhood_ignores_direction() {
        let hood = ring().get_neighborhood("A", 1);

        assert_eq!(hood.node_count, 3);
        assert_eq!(hood.depth_of("A"), Some(0));
        assert_eq!(hood.depth_of("B"), Some(1));
        assert_eq!(hood.depth_of("C"), Some(1));
        assert_eq!(hood.depth_of("D"), None);
        // A->B, B->C, C->A are all among visited nodes
        assert_eq!(hood.edge_count, 3);
    }

    #[test]
    fn test_two_hop_neighborhood_reaches_further() {
        let hood = ring().get_neighborhood("A", 2);
        assert_eq!(hood.depth_of("D"), Some(2));
        assert_eq!(hood.edge_count, 4);
    }

    #[test]
    fn test_zero_hops_is_center_only() {
        let graph = RelationGraph::build(vec![
            RelationshipEdge::new("A", "A", "co_bidding"),
            RelationshipEdge::new("A", "B", "co_bidding"),
        ])
        .unwrap();
        let hood = graph.get_neighborhood("A", 0);
        assert_eq!(hood.node_count, 1);
        assert!(hood.edges.is_empty());
    }

    #[test]
    fn test_unknown_center_is_empty() {
        let hood = ring().get_neighborhood("nobody", 3);
        assert_eq!(hood.node_count, 0);
        assert!(hood.nodes.is_empty());
        assert_eq!(hood.center, "nobody");
    }

    #[test]
    fn test_direct_connections_direction_and_order() {
        let graph = RelationGraph::build(vec![
            RelationshipEdge::new("A", "B", "co_bidding").with_weight(1.0),
            RelationshipEdge::new("B", "A", "buyer_supplier").with_weight(1.5),
            RelationshipEdge::new("A", "C", "co_bidding").with_weight(5.0),
            RelationshipEdge::new("D", "A", "buyer_supplier").with_weight(0.5),
        ])
        .unwrap();

        let connections = graph.get_direct_connections("A");
        let ids: Vec<&str> = connections.iter().map(|c| c.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "B", "D"]);

        assert_eq!(connections[0].direction, Direction::Outgoing);
        assert_eq!(connections[1].direction, Direction::Bidirectional);
        assert_eq!(connections[1].edges.len(), 2);
        assert_eq!(connections[1].total_weight, 2.5);
        assert_eq!(connections[2].direction, Direction::Incoming);
    }

    #[test]
    fn test_direct_connections_unknown_entity() {
        assert!(ring().get_direct_connections("nobody").is_empty());
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Bidirectional).unwrap();
        assert_eq!(json, "\"bidirectional\"");
    }
}
