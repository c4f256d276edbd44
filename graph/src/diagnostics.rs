//! Optional dumps of a finished layout. Neither affects rendering.

use crate::core::{short_hash, GraphNode, LayoutGraph};
use crate::error::Result;
use crate::layout::ChildrenMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One entry of the position dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub hash: String,
    pub x_pos: usize,
    pub y_pos: usize,
    pub parents: Vec<String>,
    /// Summary line; routing nodes carry their origin hash here
    pub message: String,
}

impl From<&GraphNode> for PositionRecord {
    fn from(node: &GraphNode) -> Self {
        let message = match node {
            GraphNode::Commit(commit) => commit.message.clone(),
            GraphNode::Routing(routing) => routing.origin.clone(),
        };
        Self {
            hash: node.hash().to_string(),
            x_pos: node.column(),
            y_pos: node.row(),
            parents: node.parents().to_vec(),
            message,
        }
    }
}

pub fn position_records(graph: &LayoutGraph) -> Vec<PositionRecord> {
    graph.by_row().into_iter().map(PositionRecord::from).collect()
}

/// Write every node's position as a pretty JSON array
pub fn save_positions(graph: &LayoutGraph, path: impl AsRef<Path>) -> Result<()> {
    let records = position_records(graph);

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;

    fs::write(path.as_ref(), buffer)?;
    tracing::info!(path = %path.as_ref().display(), "saved commit positions");
    Ok(())
}

/// Human-readable dump of the whole layout, one node per line in row order
pub fn format_topology(graph: &LayoutGraph, children: &ChildrenMap) -> String {
    let mut result = String::new();

    for node in graph.by_row() {
        let parents: Vec<&str> = node.parents().iter().map(|p| short_hash(p)).collect();
        let node_children: Vec<&str> = children
            .get(node.hash())
            .map(|set| set.iter().map(|c| short_hash(c)).collect())
            .unwrap_or_default();

        let (kind, generation) = match node {
            GraphNode::Commit(commit) if commit.message.starts_with("Merge pull request") => ("(PR)", commit.generation),
            GraphNode::Commit(commit) => ("", commit.generation),
            GraphNode::Routing(_) => ("(RT)", 0),
        };

        result.push_str(&format!(
            " {:>8} {:>4} {{Y={:2} X={:2} G={:2}}} -- {:<26} c=[ {} ]\n",
            short_hash(node.hash()),
            kind,
            node.row(),
            node.column(),
            generation,
            format!("p=[ {} ]", parents.join(", ")),
            node_children.join(", "),
        ));
    }
    result
}
