use super::commit::Commit;
use std::collections::HashMap;

/// All real commits of one layout pass, indexed by hash.
///
/// The set is owned by the pass for its whole duration; stages mutate the
/// layout fields of the commits in place.
#[derive(Debug, Clone, Default)]
pub struct CommitSet {
    commits: HashMap<String, Commit>,
}

impl CommitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit, replacing any previous commit with the same hash
    pub fn insert(&mut self, commit: Commit) {
        self.commits.insert(commit.hash.clone(), commit);
    }

    pub fn get(&self, hash: &str) -> Option<&Commit> {
        self.commits.get(hash)
    }

    pub fn get_mut(&mut self, hash: &str) -> Option<&mut Commit> {
        self.commits.get_mut(hash)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.commits.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.commits.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Commit> {
        self.commits.values_mut()
    }

    /// Row of a commit in the set, if present
    pub fn row(&self, hash: &str) -> Option<usize> {
        self.commits.get(hash).map(|commit| commit.row)
    }

    /// First parent of a commit in the set. Missing commits and roots yield `None`.
    pub fn first_parent(&self, hash: &str) -> Option<&str> {
        self.commits.get(hash).and_then(Commit::first_parent)
    }

    /// Commits ordered by row, hash breaking ties
    pub fn by_row(&self) -> Vec<&Commit> {
        let mut commits: Vec<&Commit> = self.commits.values().collect();
        commits.sort_by(|a, b| a.row.cmp(&b.row).then_with(|| a.hash.cmp(&b.hash)));
        commits
    }

    pub(crate) fn into_inner(self) -> HashMap<String, Commit> {
        self.commits
    }
}

impl FromIterator<Commit> for CommitSet {
    fn from_iter<I: IntoIterator<Item = Commit>>(iter: I) -> Self {
        let mut set = CommitSet::new();
        for commit in iter {
            set.insert(commit);
        }
        set
    }
}
