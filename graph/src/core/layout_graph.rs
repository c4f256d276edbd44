use super::{commit::Commit, node::GraphNode, routing::RoutingNode};
use std::collections::HashMap;

/// The ancestry graph after routing nodes have been spliced in.
///
/// Real commits whose merge edges were rerouted name the routing hash in
/// the matching parent slot.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    pub nodes: HashMap<String, GraphNode>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: GraphNode) {
        self.nodes.insert(node.hash().to_string(), node);
    }

    pub fn get(&self, hash: &str) -> Option<&GraphNode> {
        self.nodes.get(hash)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes ordered by row, then column, then hash
    pub fn by_row(&self) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = self.nodes.values().collect();
        nodes.sort_by(|a, b| {
            a.row()
                .cmp(&b.row())
                .then_with(|| a.column().cmp(&b.column()))
                .then_with(|| a.hash().cmp(b.hash()))
        });
        nodes
    }

    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.nodes.values().filter_map(GraphNode::as_commit)
    }

    pub fn routing_nodes(&self) -> impl Iterator<Item = &RoutingNode> {
        self.nodes.values().filter_map(GraphNode::as_routing)
    }

    /// Largest column of any node
    pub fn max_column(&self) -> usize {
        self.nodes.values().map(GraphNode::column).max().unwrap_or(0)
    }
}
