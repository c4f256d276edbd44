use super::topology::Topology;
use crate::core::{Commit, CommitSet, RoutingNode};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A lane represents a vertical column in the graph
pub type LaneIdx = usize;

/// Result of lane allocation: a column per real commit plus the routing
/// nodes that survived the walk.
#[derive(Debug, Clone, Default)]
pub struct LaneAssignment {
    pub columns: HashMap<String, LaneIdx>,
    pub routing: Vec<RoutingNode>,
    /// Highest column used by any commit or routing node
    pub max_column: LaneIdx,
}

impl LaneAssignment {
    /// Write the resolved columns back onto the commits
    pub fn apply(&self, commits: &mut CommitSet) {
        for commit in commits.iter_mut() {
            if let Some(&column) = self.columns.get(&commit.hash) {
                commit.column = column;
            }
        }
    }
}

/// Assigns columns in a single walk from the newest row to the oldest.
///
/// The lane table records which hash each lane is waiting for. Merge edges
/// that cannot ride an existing lane get a routing node placed right of
/// every active lane.
pub struct LaneAllocator<'a> {
    commits: &'a CommitSet,
    topology: &'a Topology,
    lanes: Vec<Option<String>>,
    routing: BTreeMap<usize, RoutingNode>,
    active_routing: BTreeSet<usize>,
    next_routing: usize,
    columns: HashMap<String, LaneIdx>,
    max_column: LaneIdx,
}

impl<'a> LaneAllocator<'a> {
    pub fn new(commits: &'a CommitSet, topology: &'a Topology) -> Self {
        Self {
            commits,
            topology,
            lanes: Vec::new(),
            routing: BTreeMap::new(),
            active_routing: BTreeSet::new(),
            next_routing: 0,
            columns: HashMap::with_capacity(commits.len()),
            max_column: 0,
        }
    }

    pub fn run(mut self) -> LaneAssignment {
        let commits = self.commits;
        for commit in commits.by_row() {
            self.place(commit);
        }

        LaneAssignment {
            columns: self.columns,
            routing: self.routing.into_values().collect(),
            max_column: self.max_column,
        }
    }

    fn place(&mut self, commit: &'a Commit) {
        let lane = self.resolve_column(commit);
        self.columns.insert(commit.hash.clone(), lane);
        self.max_column = self.max_column.max(lane);

        self.retire_routing(commit);
        self.avoid_routing_collision(lane);

        if commit.is_root() {
            return;
        }

        if commit.is_merge() {
            self.route_merge(commit, lane);
        }

        self.propagate(commit, lane);
        self.max_column = self.max_column.max(self.highest_occupied_lane());
    }

    fn resolve_column(&mut self, commit: &Commit) -> LaneIdx {
        if self.topology.is_divergence(&commit.hash) {
            // Only one branch continues through a fork point; the others end here.
            let continuing: Vec<LaneIdx> = self
                .lanes
                .iter()
                .enumerate()
                .filter(|(_, occupant)| {
                    occupant
                        .as_deref()
                        .and_then(|hash| self.commits.first_parent(hash))
                        == Some(commit.hash.as_str())
                })
                .map(|(idx, _)| idx)
                .collect();

            if let Some(&keep) = continuing.iter().min() {
                for &idx in &continuing {
                    if idx != keep {
                        self.lanes[idx] = None;
                    }
                }
                self.set_lane(keep, Some(commit.hash.clone()));
                return keep;
            }
        } else if let Some(lane) = self.lane_of(&commit.hash) {
            return lane;
        }

        self.free_lane_from(0)
    }

    fn retire_routing(&mut self, commit: &Commit) {
        let row = commit.row;
        let mut retired = Vec::new();
        let mut superseded = Vec::new();

        for &id in &self.active_routing {
            let Some(node) = self.routing.get(&id) else {
                retired.push(id);
                continue;
            };
            let Some(destination_row) = self.commits.row(&node.destination) else {
                retired.push(id);
                continue;
            };

            if row == destination_row {
                let origin_row = self.commits.row(&node.origin).unwrap_or(0);
                if self.has_continuation_above(commit, origin_row) {
                    superseded.push(id);
                } else {
                    retired.push(id);
                }
            } else if row > destination_row {
                retired.push(id);
            }
        }

        for id in retired {
            self.active_routing.remove(&id);
        }
        for id in superseded {
            self.active_routing.remove(&id);
            if let Some(node) = self.routing.remove(&id) {
                tracing::debug!(
                    routing = %node.hash,
                    origin = %node.origin,
                    destination = %node.destination,
                    "routing superseded by branch continuation"
                );
            }
        }
    }

    /// A first-parent child above `origin_row` already carries a lane down
    /// to this commit.
    fn has_continuation_above(&self, commit: &Commit, origin_row: usize) -> bool {
        self.topology
            .children_of(&commit.hash)
            .filter_map(|child| self.commits.get(child))
            .any(|child| child.first_parent() == Some(commit.hash.as_str()) && child.row < origin_row)
    }

    fn avoid_routing_collision(&mut self, lane: LaneIdx) {
        let collides = self
            .active_routing
            .iter()
            .filter_map(|id| self.routing.get(id))
            .any(|node| node.column == lane);
        if !collides {
            return;
        }

        for id in &self.active_routing {
            if let Some(node) = self.routing.get_mut(id) {
                node.column += 1;
                self.max_column = self.max_column.max(node.column);
            }
        }
    }

    fn route_merge(&mut self, commit: &Commit, lane: LaneIdx) {
        let mut created = Vec::new();

        for parent in &commit.parents[1..] {
            let Some(parent_row) = self.commits.row(parent) else {
                continue;
            };
            // Directly below: the plain edge already reaches it, and a
            // routing node would land on the parent's own cell.
            if parent_row <= commit.row + 1 || self.lane_reaches(parent, commit.row) {
                continue;
            }

            let mut column = lane.max(self.highest_occupied_lane()) + 1;
            while self
                .active_routing
                .iter()
                .filter_map(|id| self.routing.get(id))
                .any(|node| node.column == column && node.destination != *parent)
            {
                column += 1;
            }

            let id = self.next_routing;
            self.next_routing += 1;
            let node = RoutingNode::new(id, &commit.hash, parent, commit.row + 1, column);
            tracing::debug!(
                routing = %node.hash,
                origin = %commit.hash,
                destination = %parent,
                destination_row = parent_row,
                column,
                "routing node created"
            );

            self.max_column = self.max_column.max(column);
            self.routing.insert(id, node);
            self.active_routing.insert(id);
            created.push(id);
        }

        if created.len() > 1 {
            self.order_by_destination(&created);
        }
    }

    /// Some lane occupied by an earlier commit continues to `parent` through
    /// its first parent.
    fn lane_reaches(&self, parent: &str, row: usize) -> bool {
        self.lanes.iter().flatten().any(|occupant| {
            self.commits.first_parent(occupant) == Some(parent)
                && self.commits.row(occupant).is_some_and(|occupant_row| occupant_row < row)
        })
    }

    /// Nearer destinations take the left columns so the shorter lines turn
    /// off before crossing the longer ones.
    ///
    /// Giving the farther destination the left column instead would make
    /// the shorter line cross the longer one.
    fn order_by_destination(&mut self, created: &[usize]) {
        let mut columns: Vec<LaneIdx> = created
            .iter()
            .filter_map(|id| self.routing.get(id))
            .map(|node| node.column)
            .collect();
        columns.sort_unstable();

        let mut by_distance: Vec<(usize, usize)> = created
            .iter()
            .filter_map(|&id| {
                let node = self.routing.get(&id)?;
                Some((self.commits.row(&node.destination)?, id))
            })
            .collect();
        by_distance.sort_unstable();

        for ((_, id), column) in by_distance.into_iter().zip(columns) {
            if let Some(node) = self.routing.get_mut(&id) {
                node.column = column;
            }
        }
    }

    fn propagate(&mut self, commit: &Commit, lane: LaneIdx) {
        let first = commit.parents[0].as_str();

        if !self.commits.contains(first) {
            // History range ends here; nothing below to wait for.
            self.set_lane(lane, None);
        } else if self.is_tracked(first) {
            if self.lanes.get(lane).and_then(Option::as_deref) == Some(commit.hash.as_str()) {
                self.set_lane(lane, None);
            }
        } else if self.topology.is_divergence(first) {
            // Keep our own hash so the fork point can find this lane.
            self.set_lane(lane, Some(commit.hash.clone()));
        } else {
            self.set_lane(lane, Some(first.to_string()));
        }

        for parent in &commit.parents[1..] {
            if !self.commits.contains(parent) {
                continue;
            }
            let parent_lane = self.free_lane_from(lane);
            if !self.is_tracked(parent) && !self.topology.is_divergence(parent) {
                self.set_lane(parent_lane, Some(parent.clone()));
            }
        }
    }

    fn lane_of(&self, hash: &str) -> Option<LaneIdx> {
        self.lanes
            .iter()
            .position(|occupant| occupant.as_deref() == Some(hash))
    }

    fn is_tracked(&self, hash: &str) -> bool {
        self.lane_of(hash).is_some()
    }

    fn free_lane_from(&self, start: LaneIdx) -> LaneIdx {
        (start..)
            .find(|&idx| self.lanes.get(idx).map_or(true, Option::is_none))
            .unwrap_or(start)
    }

    fn highest_occupied_lane(&self) -> LaneIdx {
        self.lanes
            .iter()
            .rposition(Option::is_some)
            .unwrap_or(0)
    }

    fn set_lane(&mut self, lane: LaneIdx, occupant: Option<String>) {
        if lane >= self.lanes.len() {
            if occupant.is_none() {
                return;
            }
            self.lanes.resize(lane + 1, None);
        }
        self.lanes[lane] = occupant;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{generation::Generations, sequencer::sequence};

    fn allocate(commits: Vec<Commit>) -> (CommitSet, LaneAssignment) {
        let mut set: CommitSet = commits.into_iter().collect();
        let topology = Topology::build(&set);
        let generations = Generations::compute(&set, &topology);
        sequence(&mut set, &generations);
        let assignment = LaneAllocator::new(&set, &topology).run();
        assignment.apply(&mut set);
        (set, assignment)
    }

    fn column(set: &CommitSet, hash: &str) -> usize {
        set.get(hash).unwrap().column
    }

    #[test]
    fn test_linear_chain_single_lane() {
        let commits = (0..6)
            .map(|i| {
                let parents = if i == 0 { vec![] } else { vec![format!("c{}", i - 1)] };
                Commit::new(format!("c{}", i), "step", i, parents)
            })
            .collect();
        let (set, assignment) = allocate(commits);

        assert!(set.iter().all(|c| c.column == 0));
        assert!(assignment.routing.is_empty());
        assert_eq!(assignment.max_column, 0);
    }

    #[test]
    fn test_merge_of_own_ancestor() {
        // c merges b (first parent) and a; b's first parent is a
        let (set, assignment) = allocate(vec![
            Commit::new("a", "a", 1, vec![]),
            Commit::new("b", "b", 2, vec!["a".into()]),
            Commit::new("c", "c", 3, vec!["b".into(), "a".into()]),
        ]);

        assert_eq!(set.row("c"), Some(0));
        assert_eq!(set.row("b"), Some(1));
        assert_eq!(set.row("a"), Some(2));
        assert_eq!(column(&set, "a"), 0);
        assert_eq!(column(&set, "b"), 0);
        assert_eq!(column(&set, "c"), 0);

        assert_eq!(assignment.routing.len(), 1);
        let routing = &assignment.routing[0];
        assert_eq!(routing.origin, "c");
        assert_eq!(routing.destination, "a");
        assert_eq!(routing.row, 1);
        assert_eq!(routing.column, 1);
    }

    #[test]
    fn test_fork_and_rejoin() {
        let (set, assignment) = allocate(vec![
            Commit::new("r", "root", 10, vec![]),
            Commit::new("x", "x", 30, vec!["r".into()]),
            Commit::new("y", "y", 20, vec!["r".into()]),
            Commit::new("m", "merge", 40, vec!["x".into(), "y".into()]),
        ]);

        assert_eq!(column(&set, "m"), 0);
        assert_eq!(column(&set, "x"), 0);
        assert_eq!(column(&set, "y"), 1);
        assert_eq!(column(&set, "r"), 0);

        assert_eq!(assignment.routing.len(), 1);
        assert_eq!(assignment.routing[0].destination, "y");
        assert_eq!(assignment.routing[0].column, 1);
        assert_eq!(assignment.max_column, 1);
    }

    #[test]
    fn test_existing_lane_suppresses_routing() {
        // x already holds a lane down to a when m merges a
        let (set, assignment) = allocate(vec![
            Commit::new("a", "a", 1, vec![]),
            Commit::new("h", "h", 2, vec![]),
            Commit::new("x", "x", 5, vec!["a".into()]),
            Commit::new("m", "merge", 6, vec!["h".into(), "a".into()]),
        ]);

        assert_eq!(set.row("x"), Some(0));
        assert_eq!(set.row("m"), Some(1));
        assert!(assignment.routing.is_empty(), "unexpected routing: {:?}", assignment.routing);
        assert_eq!(column(&set, "x"), 0);
        assert_eq!(column(&set, "m"), 1);
        assert_eq!(column(&set, "a"), 0);
    }

    #[test]
    fn test_newer_second_parent_needs_no_routing() {
        // y sorts directly below m, so the merge edge reaches it unaided
        let (set, assignment) = allocate(vec![
            Commit::new("r", "root", 10, vec![]),
            Commit::new("x", "x", 20, vec!["r".into()]),
            Commit::new("y", "y", 30, vec!["r".into()]),
            Commit::new("m", "merge", 40, vec!["x".into(), "y".into()]),
        ]);

        assert_eq!(set.row("y"), Some(1));
        assert_eq!(set.row("x"), Some(2));
        assert!(assignment.routing.is_empty(), "unexpected routing: {:?}", assignment.routing);
        assert_eq!(column(&set, "m"), 0);
        assert_eq!(column(&set, "y"), 1);
        assert_eq!(column(&set, "x"), 0);
        assert_eq!(column(&set, "r"), 0);
        assert_eq!(assignment.max_column, 1);
    }

    #[test]
    fn test_octopus_fan_out() {
        // t keeps every merged parent at least two rows below m
        let (set, assignment) = allocate(vec![
            Commit::new("a", "a", 1, vec![]),
            Commit::new("b", "b", 2, vec![]),
            Commit::new("c", "c", 3, vec![]),
            Commit::new("t", "t", 10, vec![]),
            Commit::new("m", "octopus", 4, vec!["a".into(), "b".into(), "c".into()]),
        ]);

        assert_eq!(set.row("t"), Some(1));
        assert_eq!(assignment.routing.len(), 2);

        let to_b = assignment.routing.iter().find(|r| r.destination == "b").unwrap();
        let to_c = assignment.routing.iter().find(|r| r.destination == "c").unwrap();
        // c is nearer than b
        assert!(set.row("c") < set.row("b"));
        assert!(to_c.column < to_b.column);
    }

    #[test]
    fn test_columns_within_bounds() {
        let (set, assignment) = allocate(vec![
            Commit::new("r", "r", 1, vec![]),
            Commit::new("a", "a", 2, vec!["r".into()]),
            Commit::new("b", "b", 3, vec!["r".into()]),
            Commit::new("c", "c", 4, vec!["r".into()]),
            Commit::new("ab", "ab", 5, vec!["a".into(), "b".into()]),
            Commit::new("abc", "abc", 6, vec!["ab".into(), "c".into()]),
            Commit::new("lone", "lone", 7, vec![]),
        ]);

        for commit in set.iter() {
            assert!(commit.column <= assignment.max_column);
        }
        for routing in &assignment.routing {
            assert!(routing.column <= assignment.max_column);
        }

        let mut cells: Vec<(usize, usize)> = set.iter().map(|c| (c.row, c.column)).collect();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), set.len());
    }

    #[test]
    fn test_missing_parents_are_skipped() {
        let (set, assignment) = allocate(vec![
            Commit::new("b", "b", 2, vec!["gone".into()]),
            Commit::new("c", "c", 3, vec!["b".into(), "also-gone".into()]),
        ]);

        assert!(assignment.routing.is_empty());
        assert_eq!(column(&set, "c"), 0);
        assert_eq!(column(&set, "b"), 0);
    }

    #[test]
    fn test_duplicate_parents_do_not_panic() {
        let (_set, assignment) = allocate(vec![
            Commit::new("a", "a", 1, vec![]),
            Commit::new("b", "b", 2, vec!["a".into(), "a".into()]),
        ]);

        assert!(assignment.routing.len() <= 1);
    }
}
