//! JSON edge sources
//!
//! Decoding happens before construction; the graph itself never touches I/O.

use super::edge::RelationshipEdge;
use super::store::GraphResult;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Accepted payload shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgePayload {
    List(Vec<RelationshipEdge>),
    Wrapped { edges: Vec<RelationshipEdge> },
}

/// Decode edges from a JSON array or an `{"edges": [...]}` object
pub fn read_edges_json<R: Read>(reader: R) -> GraphResult<Vec<RelationshipEdge>> {
    let payload: EdgePayload = serde_json::from_reader(reader)?;
    Ok(match payload {
        EdgePayload::List(edges) | EdgePayload::Wrapped { edges } => edges,
    })
}

/// Load edges from a JSON file
pub fn load_edges_json(path: impl AsRef<Path>) -> GraphResult<Vec<RelationshipEdge>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let edges = read_edges_json(BufReader::new(file))?;
    debug!("Loaded {} edges from {}", edges.len(), path.display());
    Ok(edges)
}
