pub mod commit;
pub mod routing;
pub mod node;
pub mod commit_set;
pub mod layout_graph;

pub use commit::{short_hash, Commit};
pub use routing::{is_routing_hash, RoutingNode, ROUTING_PREFIX};
pub use node::GraphNode;
pub use commit_set::CommitSet;
pub use layout_graph::LayoutGraph;
