use anyhow::{Context, Result};
use petgraph::dot::Dot;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::relation_graph::{Relation, RelationGraph};

#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<String>,
    pub edges: Vec<Relation>,
}

impl GraphData {
    pub fn from_graph(graph: &RelationGraph) -> Self {
        Self {
            nodes: graph.nodes().map(str::to_string).collect(),
            edges: graph.relations(),
        }
    }
}

/// Graphviz rendering with verb labels on the edges
pub fn to_dot(graph: &RelationGraph) -> String {
    format!("{}", Dot::new(graph.inner()))
}

pub fn to_json(graph: &RelationGraph) -> Result<String> {
    serde_json::to_string_pretty(&GraphData::from_graph(graph))
        .context("Failed to serialize graph")
}

pub async fn write_dot(graph: &RelationGraph, path: &Path) -> Result<()> {
    tokio::fs::write(path, to_dot(graph))
        .await
        .context(format!("Failed to write DOT file: {:?}", path))?;

    info!(path = ?path, nodes = graph.node_count(), edges = graph.edge_count(), "Exported graph");
    Ok(())
}
