use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use tendergraph::{
    AnalyticsConfig, CommunityMethod, RelationGraph, RelationshipEdge, SamplingPolicy,
    SamplingTier,
};

const EDGE_TYPES: [&str; 4] = ["co_bidding", "buyer_supplier", "repeat_partnership", "value_concentration"];

/// Random procurement-like network; roughly one in twenty records is malformed
fn random_edges(seed: u64, nodes: usize, edges: usize) -> Vec<RelationshipEdge> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edges)
        .map(|_| {
            let s = rng.gen_range(0..nodes);
            let t = rng.gen_range(0..nodes);
            let edge_type = EDGE_TYPES[rng.gen_range(0..EDGE_TYPES.len())];
            let mut edge = RelationshipEdge::new(format!("E{}", s), format!("E{}", t), edge_type)
                .with_weight(rng.gen_range(0.0..5.0))
                .with_total_value(rng.gen_range(0.0..1_000.0));
            if rng.gen_ratio(1, 20) {
                edge.source_id = None;
            }
            edge
        })
        .collect()
}

#[test]
fn test_scenario_cyclic_buyer_supplier_ring() {
    let graph = RelationGraph::build(vec![
        RelationshipEdge::new("A", "B", "buyer_supplier").with_weight(3.0),
        RelationshipEdge::new("B", "C", "buyer_supplier").with_weight(1.0),
        RelationshipEdge::new("C", "A", "buyer_supplier").with_weight(2.0),
    ])
    .unwrap();

    let doors: BTreeSet<String> = graph
        .detect_revolving_doors()
        .into_iter()
        .map(|d| d.entity_id)
        .collect();
    assert_eq!(doors, ["A", "B", "C"].iter().map(|s| s.to_string()).collect());

    let hood = graph.get_neighborhood("A", 1);
    assert_eq!(hood.node_count, 3);
    assert_eq!(hood.depth_of("A"), Some(0));
    assert_eq!(hood.depth_of("B"), Some(1));
    assert_eq!(hood.depth_of("C"), Some(1));
}

#[test]
fn test_scenario_single_strong_edge() {
    let graph = RelationGraph::build(vec![
        RelationshipEdge::new("X", "Y", "co_bidding").with_weight(5.0),
    ])
    .unwrap();

    let path = graph.shortest_path("X", "Y");
    assert!(path.found);
    assert_eq!(path.path, vec!["X", "Y"]);
    assert_eq!(path.hop_count, 1);
    assert_eq!(path.total_weight, 5.0);
}

#[test]
fn test_scenario_empty_input() {
    let graph = RelationGraph::build(Vec::new()).unwrap();
    let stats = graph.get_stats();

    assert_eq!(stats.node_count, 0);
    assert_eq!(stats.edge_count, 0);
    assert_eq!(stats.undirected_edge_count, 0);
    assert_eq!(stats.connected_components, 0);
    assert!(stats.node_types.is_empty());
    assert!(stats.edge_types.is_empty());

    assert!(graph.detect_gatekeepers(5).is_empty());
    assert!(graph.detect_revolving_doors().is_empty());
    assert_eq!(graph.detect_communities().community_count, 0);
    assert!(!graph.shortest_path("A", "B").found);
}

#[test]
fn test_scenario_disjoint_pairs() {
    let graph = RelationGraph::build(vec![
        RelationshipEdge::new("A", "B", "co_bidding"),
        RelationshipEdge::new("B", "A", "buyer_supplier"),
        RelationshipEdge::new("C", "D", "co_bidding"),
    ])
    .unwrap();

    let stats = graph.get_stats();
    assert_eq!(stats.connected_components, 2);
    assert_eq!(stats.largest_component_size, 2);
}

#[test]
fn test_scenario_star_gatekeeper() {
    let edges: Vec<_> = (1..=5)
        .map(|i| RelationshipEdge::new("HUB", format!("LEAF{}", i), "buyer_supplier"))
        .collect();
    let graph = RelationGraph::build(edges).unwrap();

    let gatekeepers = graph.detect_gatekeepers(10);
    assert_eq!(gatekeepers.len(), 1);
    assert_eq!(gatekeepers[0].entity_id, "HUB");
    assert!(gatekeepers[0].betweenness > 0.0);

    let scores = graph.compute_betweenness();
    for i in 1..=5 {
        assert_eq!(scores[&format!("LEAF{}", i)], 0.0);
    }
}

#[test]
fn test_node_count_matches_distinct_ids() {
    for seed in 0..5 {
        let edges = random_edges(seed, 40, 120);
        let expected: HashSet<String> = edges
            .iter()
            .filter_map(|e| e.endpoints())
            .flat_map(|(s, t)| [s.to_string(), t.to_string()])
            .collect();

        let graph = RelationGraph::build(edges.clone()).unwrap();
        assert_eq!(graph.node_count(), expected.len());
        assert_eq!(graph.get_stats().node_count, expected.len());
        assert_eq!(
            graph.dropped_edge_count(),
            edges.iter().filter(|e| e.endpoints().is_none()).count()
        );
    }
}

#[test]
fn test_edge_count_matches_distinct_triples() {
    let edges = random_edges(11, 15, 200);
    let triples: HashSet<(String, String, String)> = edges
        .iter()
        .filter_map(|e| {
            e.endpoints()
                .map(|(s, t)| (s.to_string(), t.to_string(), e.edge_type.to_string()))
        })
        .collect();

    let graph = RelationGraph::build(edges).unwrap();
    assert_eq!(graph.get_stats().edge_count, triples.len());
}

#[test]
fn test_zero_hop_neighborhood_is_center_only() {
    let graph = RelationGraph::build(random_edges(3, 30, 90)).unwrap();
    for id in graph.entity_ids() {
        let hood = graph.get_neighborhood(id, 0);
        assert_eq!(hood.node_count, 1);
        assert_eq!(hood.depth_of(id), Some(0));
        assert!(hood.edges.is_empty());
    }
}

#[test]
fn test_neighborhood_grows_monotonically() {
    let graph = RelationGraph::build(random_edges(5, 50, 70)).unwrap();
    let center = graph.entity_ids().next().unwrap().to_string();

    let mut previous: HashSet<String> = HashSet::new();
    for hops in 0..6 {
        let current: HashSet<String> = graph
            .get_neighborhood(&center, hops)
            .nodes
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert!(previous.is_subset(&current));
        previous = current;
    }
}

#[test]
fn test_paths_are_direction_symmetric() {
    let graph = RelationGraph::build(random_edges(8, 25, 40)).unwrap();
    let ids: Vec<String> = graph.entity_ids().map(String::from).collect();

    for a in ids.iter().take(8) {
        for b in ids.iter().rev().take(8) {
            let forward = graph.shortest_path(a, b);
            let backward = graph.shortest_path(b, a);
            assert_eq!(forward.found, backward.found);
            assert_eq!(forward.hop_count, backward.hop_count);
            assert!((forward.total_weight - backward.total_weight).abs() < 1e-9);
        }
    }
}

#[test]
fn test_revolving_doors_are_exactly_both_roles() {
    let edges = random_edges(13, 30, 80);
    let graph = RelationGraph::build(edges.clone()).unwrap();

    let mut buyers = HashSet::new();
    let mut suppliers = HashSet::new();
    for e in &edges {
        if let Some((s, t)) = e.endpoints() {
            if e.edge_type.is_buyer_supplier() {
                buyers.insert(s.to_string());
                suppliers.insert(t.to_string());
            }
        }
    }
    let expected: HashSet<String> = buyers.intersection(&suppliers).cloned().collect();
    let found: HashSet<String> = graph
        .detect_revolving_doors()
        .into_iter()
        .map(|d| d.entity_id)
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_communities_partition_every_node() {
    for seed in 0..4 {
        let graph = RelationGraph::build(random_edges(seed, 40, 100)).unwrap();
        let report = graph.detect_communities();
        assert_eq!(report.method, CommunityMethod::Louvain);

        let total: usize = report.communities.iter().map(|c| c.member_count).sum();
        assert_eq!(total, graph.node_count());

        let members: HashSet<&String> = report.communities.iter().flat_map(|c| &c.members).collect();
        assert_eq!(members.len(), graph.node_count());
    }
}

#[test]
fn test_community_detection_is_reproducible() {
    let edges = random_edges(21, 60, 150);
    let first = RelationGraph::build(edges.clone()).unwrap().compute_community_map(1.0);
    let second = RelationGraph::build(edges).unwrap().compute_community_map(1.0);
    assert_eq!(first, second);
}

#[test]
fn test_sampled_betweenness_is_reproducible() {
    let config = AnalyticsConfig {
        sampling: SamplingPolicy {
            tiers: vec![SamplingTier { min_nodes: 20, sample_cap: 10 }],
            seed: 7,
        },
        ..Default::default()
    };
    let edges = random_edges(17, 50, 120);

    let first = RelationGraph::with_config(edges.clone(), config.clone()).unwrap();
    let second = RelationGraph::with_config(edges.clone(), config).unwrap();
    assert_eq!(first.compute_betweenness(), second.compute_betweenness());

    let exact = RelationGraph::with_config(
        edges,
        AnalyticsConfig {
            sampling: SamplingPolicy::exact(),
            ..Default::default()
        },
    )
    .unwrap();
    assert_ne!(first.compute_betweenness(), exact.compute_betweenness());
}

#[test]
fn test_yaml_config_drives_fallback() {
    let config = AnalyticsConfig::from_yaml_str("community:\n  primary_enabled: false\n").unwrap();
    let graph = RelationGraph::with_config(random_edges(2, 20, 40), config).unwrap();
    assert_eq!(graph.detect_communities().method, CommunityMethod::LabelPropagation);
}

#[test]
fn test_results_serialize_to_json() {
    let graph = RelationGraph::build(random_edges(1, 12, 30)).unwrap();
    let center = graph.entity_ids().next().unwrap().to_string();

    let json = serde_json::json!({
        "stats": graph.get_stats(),
        "neighborhood": graph.get_neighborhood(&center, 2),
        "connections": graph.get_direct_connections(&center),
        "communities": graph.detect_communities(),
        "doors": graph.detect_revolving_doors(),
    });
    assert_eq!(json["stats"]["node_count"], graph.node_count());
    assert!(json["communities"]["method"].is_string());
}
