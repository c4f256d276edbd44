use super::generation::Generations;
use crate::core::{Commit, CommitSet};
use std::cmp::Ordering;

/// Assign every commit a dense row.
///
/// Commits are ordered by distance from the newest generation, then
/// non-merges before merges, then newer before older. This approximates
/// reverse-chronological log order; it is a heuristic and does not promise
/// a topological order for every DAG shape.
///
/// Returns the number of rows assigned.
pub fn sequence(commits: &mut CommitSet, generations: &Generations) -> usize {
    let max_generation = generations.max();

    for commit in commits.iter_mut() {
        commit.generation = generations.get(&commit.hash).unwrap_or(0);
    }

    let mut order: Vec<&mut Commit> = commits.iter_mut().collect();
    order.sort_by(|a, b| presentation_order(a, b, max_generation));

    for (row, commit) in order.into_iter().enumerate() {
        commit.row = row;
    }

    commits.len()
}

fn presentation_order(a: &Commit, b: &Commit, max_generation: usize) -> Ordering {
    let display_a = max_generation - a.generation.min(max_generation);
    let display_b = max_generation - b.generation.min(max_generation);

    display_a
        .cmp(&display_b)
        .then_with(|| a.parents.len().cmp(&b.parents.len()))
        .then_with(|| b.timestamp.cmp(&a.timestamp))
        .then_with(|| a.hash.cmp(&b.hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::topology::Topology;
    use std::collections::BTreeSet;

    fn sequenced(commits: Vec<Commit>) -> CommitSet {
        let mut set: CommitSet = commits.into_iter().collect();
        let generations = Generations::compute(&set, &Topology::build(&set));
        sequence(&mut set, &generations);
        set
    }

    fn row(set: &CommitSet, hash: &str) -> usize {
        set.row(hash).unwrap()
    }

    #[test]
    fn test_rows_are_a_permutation() {
        let set = sequenced(vec![
            Commit::new("r", "r", 10, vec![]),
            Commit::new("x", "x", 20, vec!["r".into()]),
            Commit::new("y", "y", 30, vec!["r".into()]),
            Commit::new("z", "z", 25, vec!["y".into()]),
            Commit::new("m", "m", 40, vec!["x".into(), "z".into()]),
            Commit::new("o", "orphan", 5, vec![]),
        ]);

        let rows: BTreeSet<usize> = set.iter().map(|c| c.row).collect();
        assert_eq!(rows, (0..set.len()).collect());
    }

    #[test]
    fn test_newer_first_within_generation() {
        let set = sequenced(vec![
            Commit::new("r", "r", 10, vec![]),
            Commit::new("old", "old", 20, vec!["r".into()]),
            Commit::new("new", "new", 30, vec!["r".into()]),
        ]);

        assert_eq!(row(&set, "new"), 0);
        assert_eq!(row(&set, "old"), 1);
        assert_eq!(row(&set, "r"), 2);
    }

    #[test]
    fn test_non_merge_before_merge() {
        let set = sequenced(vec![
            Commit::new("a", "a", 10, vec![]),
            Commit::new("b", "b", 10, vec![]),
            Commit::new("merge", "merge", 50, vec!["a".into(), "b".into()]),
            Commit::new("plain", "plain", 20, vec!["a".into()]),
        ]);

        assert_eq!(row(&set, "plain"), 0);
        assert_eq!(row(&set, "merge"), 1);
    }

    #[test]
    fn test_generation_field_is_stored() {
        let set = sequenced(vec![
            Commit::new("a", "a", 1, vec![]),
            Commit::new("b", "b", 2, vec!["a".into()]),
        ]);

        assert_eq!(set.get("a").unwrap().generation, 0);
        assert_eq!(set.get("b").unwrap().generation, 1);
    }
}
