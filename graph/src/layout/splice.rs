use crate::core::{CommitSet, GraphNode, LayoutGraph, RoutingNode};

/// Reroute merge edges through their routing nodes.
///
/// For each routing node the matching non-first parent slot of its origin
/// commit is rewritten to the routing hash and the node joins the graph.
/// Consumes the commit set; the result is only meant for rendering.
pub fn splice(commits: CommitSet, routing: Vec<RoutingNode>) -> LayoutGraph {
    let mut commits = commits.into_inner();
    let mut spliced = Vec::with_capacity(routing.len());

    for node in routing {
        let Some(origin) = commits.get_mut(&node.origin) else {
            tracing::warn!(routing = %node.hash, origin = %node.origin, "routing origin missing, dropped");
            continue;
        };

        let slot = origin
            .parents
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, parent)| **parent == node.destination)
            .map(|(idx, _)| idx);

        match slot {
            Some(idx) => {
                origin.parents[idx] = node.hash.clone();
                tracing::debug!(
                    "routing added {} -> {} -> {}",
                    crate::core::short_hash(&node.origin),
                    node.hash,
                    crate::core::short_hash(&node.destination)
                );
                spliced.push(node);
            }
            None => {
                tracing::warn!(
                    routing = %node.hash,
                    origin = %node.origin,
                    destination = %node.destination,
                    "no parent slot for routing node, dropped"
                );
            }
        }
    }

    let mut graph = LayoutGraph::new();
    for (_, commit) in commits {
        graph.insert(GraphNode::Commit(commit));
    }
    for node in spliced {
        graph.insert(GraphNode::Routing(node));
    }
    graph
}
