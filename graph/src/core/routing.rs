/// Prefix reserved for synthetic routing hashes. Real hashes are hex only.
pub const ROUTING_PREFIX: &str = "routing-";

/// A synthetic hop spliced into a merge edge so the edge can be drawn in its
/// own lane without crossing other lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingNode {
    pub hash: String,
    /// Real commit the merge edge starts from
    pub origin: String,
    /// Real parent the merge edge ends at
    pub destination: String,
    pub row: usize,
    pub column: usize,
}

impl RoutingNode {
    pub fn new(index: usize, origin: &str, destination: &str, row: usize, column: usize) -> Self {
        Self {
            hash: format!("{}{:04}", ROUTING_PREFIX, index),
            origin: origin.to_string(),
            destination: destination.to_string(),
            row,
            column,
        }
    }

    /// A routing node always has exactly one parent: its destination.
    pub fn parents(&self) -> &[String] {
        std::slice::from_ref(&self.destination)
    }
}

pub fn is_routing_hash(hash: &str) -> bool {
    hash.starts_with(ROUTING_PREFIX)
}
