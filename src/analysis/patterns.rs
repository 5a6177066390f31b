//! Structural procurement patterns
//!
//! Only the pattern is reported; no wrongdoing is inferred from it.

use crate::graph::{EntityType, RelationGraph};
use serde::Serialize;

/// An entity seen both as buyer (source) and supplier (target) of `buyer_supplier` edges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevolvingDoor {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub buyer_edges: usize,
    pub supplier_edges: usize,
    pub buyer_value: f64,
    pub supplier_value: f64,
    pub total_edges: usize,
}

#[derive(Default)]
struct Roles {
    buyer_edges: usize,
    supplier_edges: usize,
    buyer_value: f64,
    supplier_value: f64,
}

impl RelationGraph {
    /// Entities acting on both sides of `buyer_supplier` relationships,
    /// most active first
    pub fn detect_revolving_doors(&self) -> Vec<RevolvingDoor> {
        let mut roles: Vec<Roles> = Vec::new();
        roles.resize_with(self.node_count(), Roles::default);

        for (key, record) in &self.edges {
            if !key.edge_type.is_buyer_supplier() {
                continue;
            }
            let buyer = &mut roles[key.source];
            buyer.buyer_edges += 1;
            buyer.buyer_value += record.total_value;

            let supplier = &mut roles[key.target];
            supplier.supplier_edges += 1;
            supplier.supplier_value += record.total_value;
        }

        let mut doors: Vec<RevolvingDoor> = roles
            .into_iter()
            .enumerate()
            .filter(|(_, r)| r.buyer_edges > 0 && r.supplier_edges > 0)
            .map(|(idx, r)| RevolvingDoor {
                entity_id: self.id_at(idx).to_string(),
                entity_type: self.type_at(idx).clone(),
                buyer_edges: r.buyer_edges,
                supplier_edges: r.supplier_edges,
                buyer_value: r.buyer_value,
                supplier_value: r.supplier_value,
                total_edges: r.buyer_edges + r.supplier_edges,
            })
            .collect();

        // Stable: ties keep first-seen order
        doors.sort_by(|a, b| b.total_edges.cmp(&a.total_edges));
        doors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationshipEdge;

    #[test]
    fn test_cyclic_ring_is_all_revolving_doors() {
        let graph = RelationGraph::build(vec![
            RelationshipEdge::new("A", "B", "buyer_supplier").with_weight(3.0),
            RelationshipEdge::new("B", "C", "buyer_supplier").with_weight(1.0),
            RelationshipEdge::new("C", "A", "buyer_supplier").with_weight(2.0),
        ])
        .unwrap();

        let doors = graph.detect_revolving_doors();
        let mut ids: Vec<&str> = doors.iter().map(|d| d.entity_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert!(doors.iter().all(|d| d.buyer_edges == 1 && d.supplier_edges == 1));
    }

    #[test]
    fn test_role_counts_and_values() {
        let graph = RelationGraph::build(vec![
            RelationshipEdge::new("MIN", "ACME", "buyer_supplier").with_total_value(100.0),
            RelationshipEdge::new("AGENCY", "ACME", "buyer_supplier").with_total_value(50.0),
            RelationshipEdge::new("ACME", "SUB", "buyer_supplier").with_total_value(30.0),
            RelationshipEdge::new("SUB", "MIN", "buyer_supplier").with_total_value(5.0),
        ])
        .unwrap();

        let doors = graph.detect_revolving_doors();
        let ids: Vec<&str> = doors.iter().map(|d| d.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["ACME", "MIN", "SUB"]);

        let acme = &doors[0];
        assert_eq!(acme.buyer_edges, 1);
        assert_eq!(acme.supplier_edges, 2);
        assert_eq!(acme.buyer_value, 30.0);
        assert_eq!(acme.supplier_value, 150.0);
        assert_eq!(acme.total_edges, 3);
    }

    #[test]
    fn test_other_edge_types_ignored() {
        let graph = RelationGraph::build(vec![
            RelationshipEdge::new("A", "B", "buyer_supplier"),
            RelationshipEdge::new("B", "A", "co_bidding"),
            RelationshipEdge::new("C", "D", "repeat_partnership"),
        ])
        .unwrap();
        assert!(graph.detect_revolving_doors().is_empty());
    }

    #[test]
    fn test_no_buyer_supplier_edges() {
        let graph = RelationGraph::build(vec![RelationshipEdge::new("A", "B", "co_bidding")]).unwrap();
        assert!(graph.detect_revolving_doors().is_empty());
    }
}
