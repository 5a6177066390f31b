use anyhow::Context;
use tendergraph::{load_edges_json, AnalyticsConfig, RelationGraph, RelationshipEdge};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    eprintln!("Tendergraph v{}", tendergraph::version());

    let mut args = std::env::args().skip(1);
    let edges = match args.next() {
        Some(path) => load_edges_json(&path).with_context(|| format!("loading edges from {}", path))?,
        None => {
            info!("No edge file given; using the built-in sample network");
            sample_network()
        }
    };
    let config = match args.next() {
        Some(path) => AnalyticsConfig::from_yaml_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => AnalyticsConfig::default(),
    };

    let graph = RelationGraph::with_config(edges, config).context("building relationship graph")?;

    let report = serde_json::json!({
        "stats": graph.get_stats(),
        "gatekeepers": graph.detect_gatekeepers(10),
        "revolving_doors": graph.detect_revolving_doors(),
        "communities": graph.detect_communities(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Two ministries buying from a small cluster of co-bidding suppliers,
/// one of which also buys from another
fn sample_network() -> Vec<RelationshipEdge> {
    let buy = |buyer: &str, supplier: &str, value: f64, tenders: u64| {
        RelationshipEdge::new(buyer, supplier, "buyer_supplier")
            .with_types("institution", "company")
            .with_total_value(value)
            .with_tender_count(tenders)
            .with_weight(tenders as f64)
    };

    vec![
        buy("MIN-HEALTH", "ACME", 420_000.0, 6),
        buy("MIN-HEALTH", "BETA", 95_000.0, 2),
        buy("MIN-TRANSPORT", "ACME", 1_150_000.0, 4),
        buy("MIN-TRANSPORT", "GAMMA", 310_000.0, 3),
        RelationshipEdge::new("ACME", "GAMMA", "buyer_supplier").with_total_value(80_000.0),
        RelationshipEdge::new("GAMMA", "ACME", "buyer_supplier").with_total_value(12_000.0),
        RelationshipEdge::new("ACME", "BETA", "co_bidding").with_weight(5.0),
        RelationshipEdge::new("BETA", "DELTA", "co_bidding").with_weight(3.0),
        RelationshipEdge::new("ACME", "DELTA", "repeat_partnership").with_weight(2.0),
        RelationshipEdge::new("GAMMA", "EPSILON", "value_concentration")
            .with_weight(0.8)
            .with_metadata("share", 0.8),
    ]
}
