use super::{
    generation::Generations,
    lanes::{LaneAllocator, LaneIdx},
    sequencer::sequence,
    splice::splice,
    topology::Topology,
};
use crate::core::{CommitSet, LayoutGraph};
use crate::error::{GraphError, Result};

/// Grid extents gathered while the pass runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutContext {
    /// Number of real rows
    pub row_count: usize,
    /// Highest lane used by any node
    pub max_column: LaneIdx,
}

/// Output of one layout pass
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub graph: LayoutGraph,
    pub topology: Topology,
    pub context: LayoutContext,
}

/// Run topology, generations, sequencing, lane allocation and splicing over
/// a commit set.
pub fn layout(mut commits: CommitSet) -> Result<Layout> {
    let mut context = LayoutContext::default();

    let topology = Topology::build(&commits);
    let generations = Generations::compute(&commits, &topology);
    context.row_count = sequence(&mut commits, &generations);
    check_ancestry(&commits)?;

    let assignment = LaneAllocator::new(&commits, &topology).run();
    assignment.apply(&mut commits);
    context.max_column = assignment.max_column;

    tracing::debug!(
        commits = context.row_count,
        routing = assignment.routing.len(),
        max_column = context.max_column,
        "lanes allocated"
    );

    let graph = splice(commits, assignment.routing);
    context.max_column = context.max_column.max(graph.max_column());

    Ok(Layout { graph, topology, context })
}

/// No parent in the set may sit above its child. A self-parent shares the
/// child's row and is accepted.
fn check_ancestry(commits: &CommitSet) -> Result<()> {
    for commit in commits.iter() {
        for parent in &commit.parents {
            let Some(parent_row) = commits.row(parent) else {
                continue;
            };
            if parent_row < commit.row {
                return Err(GraphError::MalformedAncestry {
                    child: commit.hash.clone(),
                    parent: parent.clone(),
                    child_row: commit.row,
                    parent_row,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Commit;
    use std::collections::{BTreeSet, HashMap};

    fn positions(layout: &Layout) -> HashMap<String, (usize, usize)> {
        layout
            .graph
            .commits()
            .map(|c| (c.hash.clone(), (c.row, c.column)))
            .collect()
    }

    fn history() -> Vec<Commit> {
        vec![
            Commit::new("r", "root", 10, vec![]),
            Commit::new("a", "a", 20, vec!["r".into()]),
            Commit::new("b", "b", 30, vec!["r".into()]),
            Commit::new("c", "c", 40, vec!["b".into()]),
            Commit::new("m1", "merge a", 50, vec!["c".into(), "a".into()]),
            Commit::new("d", "d", 45, vec!["a".into()]),
            Commit::new("m2", "merge d", 60, vec!["m1".into(), "d".into()]),
            Commit::new("t", "tip", 70, vec!["m2".into()]),
        ]
    }

    #[test]
    fn test_layout_rows_and_bounds() {
        let layout = layout(history().into_iter().collect()).unwrap();

        let rows: BTreeSet<usize> = layout.graph.commits().map(|c| c.row).collect();
        assert_eq!(rows, (0..8).collect());
        assert_eq!(layout.context.row_count, 8);

        for node in layout.graph.nodes.values() {
            assert!(node.column() <= layout.context.max_column);
        }
    }

    fn octopus() -> Vec<Commit> {
        vec![
            Commit::new("a0000000", "a", 1, vec![]),
            Commit::new("b0000000", "b", 2, vec![]),
            Commit::new("c0000000", "c", 3, vec![]),
            Commit::new("e0000000", "t", 10, vec![]),
            Commit::new(
                "d0000000",
                "octopus",
                4,
                vec!["a0000000".into(), "b0000000".into(), "c0000000".into()],
            ),
        ]
    }

    #[test]
    fn test_splicing_leaves_real_positions_alone() {
        let mut commits: CommitSet = octopus().into_iter().collect();
        let topology = Topology::build(&commits);
        let generations = Generations::compute(&commits, &topology);
        sequence(&mut commits, &generations);
        let assignment = LaneAllocator::new(&commits, &topology).run();
        assert!(assignment.routing.len() >= 2);

        let before: HashMap<String, (usize, usize)> = commits
            .iter()
            .map(|c| (c.hash.clone(), (c.row, assignment.columns[&c.hash])))
            .collect();

        let layout = layout(octopus().into_iter().collect()).unwrap();
        assert_eq!(positions(&layout), before);
        assert_eq!(layout.graph.routing_nodes().count(), assignment.routing.len());

        let config = crate::config::RenderConfig::default().with_color(false);
        let output = crate::render::GridRenderer::new(&config).render(&layout).unwrap();
        let summary_lines = output.lines().filter(|line| line.contains("0000000 ")).count();
        assert_eq!(summary_lines, before.len());
        assert!(!output.contains("routing"));
    }

    #[test]
    fn test_self_parent_is_accepted() {
        let commits: CommitSet = [
            Commit::new("a0000000", "a", 1, vec!["a0000000".into()]),
            Commit::new("b0000000", "b", 2, vec!["a0000000".into()]),
        ]
        .into_iter()
        .collect();

        let layout = layout(commits).unwrap();
        assert_eq!(layout.graph.get("b0000000").unwrap().row(), 0);
        assert_eq!(layout.graph.get("a0000000").unwrap().row(), 1);

        let config = crate::config::RenderConfig::default().with_color(false);
        let output = crate::render::GridRenderer::new(&config).render(&layout).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("●        b0000000 b "));
        assert_eq!(lines[1], "│");
        assert!(lines[2].starts_with("●        a0000000 a "));
    }

    #[test]
    fn test_spliced_parents_point_at_routing() {
        let layout = layout(history().into_iter().collect()).unwrap();

        for routing in layout.graph.routing_nodes() {
            let origin = layout.graph.get(&routing.origin).unwrap();
            assert!(origin.parents().contains(&routing.hash));
            assert!(routing.row > origin.row());
        }
    }

    #[test]
    fn test_cycle_is_malformed() {
        let commits: CommitSet = [
            Commit::new("a", "a", 1, vec!["b".into()]),
            Commit::new("b", "b", 2, vec!["a".into()]),
        ]
        .into_iter()
        .collect();

        let err = layout(commits).unwrap_err();
        assert!(matches!(err, GraphError::MalformedAncestry { .. }));
    }

    #[test]
    fn test_empty_input() {
        let layout = layout(CommitSet::new()).unwrap();
        assert!(layout.graph.is_empty());
        assert_eq!(layout.context, LayoutContext::default());
    }
}
