use super::topology::Topology;
use crate::core::CommitSet;
use std::collections::{HashMap, HashSet};

/// Longest-path distance of every commit from a root
#[derive(Debug, Clone, Default)]
pub struct Generations {
    values: HashMap<String, usize>,
}

struct Frame<'a> {
    hash: &'a str,
    next_parent: usize,
}

impl Generations {
    /// Walk down from every tip with an explicit stack, computing each
    /// commit once. Parents outside the set are ignored; a parent that is
    /// still being resolved (a cycle) is ignored as well.
    pub fn compute(commits: &CommitSet, topology: &Topology) -> Self {
        let mut values: HashMap<String, usize> = HashMap::with_capacity(commits.len());
        let mut in_progress: HashSet<&str> = HashSet::new();

        let mut leftovers: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        leftovers.sort_unstable();
        let starts = topology.tips.iter().map(String::as_str).chain(leftovers);

        for start in starts {
            if values.contains_key(start) || !commits.contains(start) {
                continue;
            }

            in_progress.insert(start);
            let mut stack = vec![Frame { hash: start, next_parent: 0 }];

            while let Some(frame) = stack.last_mut() {
                let hash = frame.hash;
                let Some(commit) = commits.get(hash) else {
                    stack.pop();
                    continue;
                };

                let mut pending = None;
                while frame.next_parent < commit.parents.len() {
                    let parent = commit.parents[frame.next_parent].as_str();
                    frame.next_parent += 1;
                    if commits.contains(parent)
                        && !values.contains_key(parent)
                        && !in_progress.contains(parent)
                    {
                        pending = Some(parent);
                        break;
                    }
                }

                match pending {
                    Some(parent) => {
                        in_progress.insert(parent);
                        stack.push(Frame { hash: parent, next_parent: 0 });
                    }
                    None => {
                        let generation = commit
                            .parents
                            .iter()
                            .filter_map(|parent| values.get(parent))
                            .max()
                            .map_or(0, |max| max + 1);
                        values.insert(hash.to_string(), generation);
                        in_progress.remove(hash);
                        stack.pop();
                    }
                }
            }
        }

        Self { values }
    }

    pub fn get(&self, hash: &str) -> Option<usize> {
        self.values.get(hash).copied()
    }

    pub fn max(&self) -> usize {
        self.values.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Commit;

    fn compute(commits: &CommitSet) -> Generations {
        Generations::compute(commits, &Topology::build(commits))
    }

    #[test]
    fn test_longest_path_wins() {
        // a <- b <- c <- d, and d also merges a directly
        let set: CommitSet = [
            Commit::new("a", "a", 1, vec![]),
            Commit::new("b", "b", 2, vec!["a".into()]),
            Commit::new("c", "c", 3, vec!["b".into()]),
            Commit::new("d", "d", 4, vec!["c".into(), "a".into()]),
        ]
        .into_iter()
        .collect();
        let generations = compute(&set);

        assert_eq!(generations.get("a"), Some(0));
        assert_eq!(generations.get("b"), Some(1));
        assert_eq!(generations.get("c"), Some(2));
        assert_eq!(generations.get("d"), Some(3));
        assert_eq!(generations.max(), 3);
    }

    #[test]
    fn test_parents_are_lower_than_children() {
        let set: CommitSet = [
            Commit::new("r", "r", 1, vec![]),
            Commit::new("x", "x", 2, vec!["r".into()]),
            Commit::new("y", "y", 3, vec!["r".into()]),
            Commit::new("z", "z", 4, vec!["y".into()]),
            Commit::new("m", "m", 5, vec!["x".into(), "z".into()]),
        ]
        .into_iter()
        .collect();
        let generations = compute(&set);

        for commit in set.iter() {
            for parent in &commit.parents {
                assert!(generations.get(parent) < generations.get(&commit.hash));
            }
        }
        assert_eq!(generations.len(), set.len());
    }

    #[test]
    fn test_missing_parents_are_skipped() {
        let set: CommitSet = [
            Commit::new("b", "b", 2, vec!["gone".into()]),
            Commit::new("c", "c", 3, vec!["b".into(), "also-gone".into()]),
        ]
        .into_iter()
        .collect();
        let generations = compute(&set);

        assert_eq!(generations.get("b"), Some(0));
        assert_eq!(generations.get("c"), Some(1));
    }

    #[test]
    fn test_deep_history_does_not_recurse() {
        let depth = 50_000;
        let set: CommitSet = (0..depth)
            .map(|i| {
                let parents = if i == 0 { vec![] } else { vec![format!("c{}", i - 1)] };
                Commit::new(format!("c{}", i), "step", i as i64, parents)
            })
            .collect();
        let generations = compute(&set);

        assert_eq!(generations.get(&format!("c{}", depth - 1)), Some(depth - 1));
    }

    #[test]
    fn test_self_reference_terminates() {
        let set: CommitSet = [Commit::new("a", "a", 1, vec!["a".into()])].into_iter().collect();
        let generations = compute(&set);

        assert_eq!(generations.get("a"), Some(0));
    }
}
