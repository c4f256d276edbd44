use super::{commit::Commit, routing::RoutingNode};

/// A node of the spliced layout graph: either a real commit or a routing hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphNode {
    Commit(Commit),
    Routing(RoutingNode),
}

impl GraphNode {
    pub fn hash(&self) -> &str {
        match self {
            GraphNode::Commit(commit) => &commit.hash,
            GraphNode::Routing(node) => &node.hash,
        }
    }

    pub fn parents(&self) -> &[String] {
        match self {
            GraphNode::Commit(commit) => &commit.parents,
            GraphNode::Routing(node) => node.parents(),
        }
    }

    pub fn row(&self) -> usize {
        match self {
            GraphNode::Commit(commit) => commit.row,
            GraphNode::Routing(node) => node.row,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            GraphNode::Commit(commit) => commit.column,
            GraphNode::Routing(node) => node.column,
        }
    }

    pub fn is_routing(&self) -> bool {
        matches!(self, GraphNode::Routing(_))
    }

    /// Check if this node draws as a merge (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents().len() > 1
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            GraphNode::Commit(commit) => Some(commit),
            GraphNode::Routing(_) => None,
        }
    }

    pub fn as_routing(&self) -> Option<&RoutingNode> {
        match self {
            GraphNode::Routing(node) => Some(node),
            GraphNode::Commit(_) => None,
        }
    }
}

impl From<Commit> for GraphNode {
    fn from(commit: Commit) -> Self {
        GraphNode::Commit(commit)
    }
}

impl From<RoutingNode> for GraphNode {
    fn from(node: RoutingNode) -> Self {
        GraphNode::Routing(node)
    }
}
