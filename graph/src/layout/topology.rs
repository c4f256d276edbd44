use crate::core::CommitSet;
use std::collections::{BTreeSet, HashMap};

/// Commit hash -> child hashes, ordered for stable iteration
pub type ChildrenMap = HashMap<String, BTreeSet<String>>;

/// Reverse adjacency plus the root and tip sets of a commit set
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub children: ChildrenMap,
    /// Commits without parents, or with a parent outside the set
    pub roots: Vec<String>,
    /// Commits no other commit in the set names as a parent
    pub tips: Vec<String>,
}

impl Topology {
    pub fn build(commits: &CommitSet) -> Self {
        let mut children = ChildrenMap::new();
        for commit in commits.iter() {
            for parent in &commit.parents {
                children
                    .entry(parent.clone())
                    .or_default()
                    .insert(commit.hash.clone());
            }
        }

        let mut roots: Vec<String> = commits
            .iter()
            .filter(|commit| {
                commit.is_root() || commit.parents.iter().any(|parent| !commits.contains(parent))
            })
            .map(|commit| commit.hash.clone())
            .collect();
        roots.sort();

        let mut tips: Vec<String> = commits
            .iter()
            .filter(|commit| !children.contains_key(&commit.hash))
            .map(|commit| commit.hash.clone())
            .collect();
        tips.sort();

        tracing::debug!(?roots, ?tips, "topology built");

        Self { children, roots, tips }
    }

    /// A divergence point has more than one child
    pub fn is_divergence(&self, hash: &str) -> bool {
        self.child_count(hash) > 1
    }

    pub fn child_count(&self, hash: &str) -> usize {
        self.children.get(hash).map_or(0, BTreeSet::len)
    }

    pub fn children_of(&self, hash: &str) -> impl Iterator<Item = &String> {
        self.children.get(hash).into_iter().flatten()
    }
}
