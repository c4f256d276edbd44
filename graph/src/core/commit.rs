/// A real commit as supplied by the commit store.
///
/// `row`, `column` and `generation` are owned by the layout pass and are
/// zero until the corresponding stage has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Summary line
    pub message: String,
    /// Commit time in unix seconds
    pub timestamp: i64,
    /// Parent hashes; index 0 is the first parent
    pub parents: Vec<String>,
    /// Branch and tag names pointing at this commit
    pub branch_labels: Vec<String>,
    /// Temporal position (0 = top)
    pub row: usize,
    /// Lane
    pub column: usize,
    /// Longest parent chain down to a root
    pub generation: usize,
}

impl Commit {
    pub fn new(hash: impl Into<String>, message: impl Into<String>, timestamp: i64, parents: Vec<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            timestamp,
            parents,
            branch_labels: Vec::new(),
            row: 0,
            column: 0,
            generation: 0,
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.branch_labels = labels;
        self
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    /// Display form of the hash
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }
}

/// First eight characters of a hash, or the whole hash when shorter.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}
