//! A* search over an agent's believed world.
//!
//! The planner only knows the grid's bounds and whatever obstacles the caller
//! believes in. Cells whose contents are unknown are treated as passable, so a
//! route may later turn out to run into a wall; the agent notices when it
//! senses the wall and replans.
//!
//! # Frontier ordering
//!
//! The frontier is a min-heap keyed on `f = g + h` with `h` the Manhattan
//! distance to the goal. Equal `f` values are ordered by ascending `x`, then
//! ascending `y`, so identical inputs always produce identical routes.

use crate::grid::{manhattan, Coordinate, Grid};
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use tracing::trace;

/// A frontier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    f: usize,
    g: usize,
    cell: Coordinate,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and we want the smallest key on top.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.cell.x.cmp(&self.cell.x))
            .then_with(|| other.cell.y.cmp(&self.cell.y))
            .then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest 4-connected route from `start` to `goal`.
///
/// Returns the cells after `start` up to and including `goal`. An empty route
/// means either `start == goal` or the goal is unreachable under `blocked`;
/// both are ordinary outcomes.
pub fn a_star(
    grid: &Grid,
    start: Coordinate,
    goal: Coordinate,
    blocked: &BTreeSet<Coordinate>,
) -> Vec<Coordinate> {
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Coordinate, Coordinate> = HashMap::new();
    let mut g_score: HashMap<Coordinate, usize> = HashMap::new();

    g_score.insert(start, 0);
    open.push(Frontier { f: manhattan(start, goal), g: 0, cell: start });

    while let Some(Frontier { g, cell, .. }) = open.pop() {
        if cell == goal {
            return reconstruct(&came_from, start, goal);
        }

        // Stale entry: a cheaper route to `cell` was pushed after this one.
        if g_score.get(&cell).is_some_and(|&best| g > best) {
            continue;
        }

        for neighbor in grid.adjacent(cell) {
            if blocked.contains(&neighbor) {
                continue;
            }
            let tentative = g + 1;
            if g_score.get(&neighbor).map_or(true, |&best| tentative < best) {
                came_from.insert(neighbor, cell);
                g_score.insert(neighbor, tentative);
                open.push(Frontier {
                    f: tentative + manhattan(neighbor, goal),
                    g: tentative,
                    cell: neighbor,
                });
            }
        }
    }

    trace!("No route from {} to {} ({} cells believed blocked)", start, goal, blocked.len());
    Vec::new()
}

/// Walks predecessor links from `goal` back to `start`, excluding `start`.
fn reconstruct(
    came_from: &HashMap<Coordinate, Coordinate>,
    start: Coordinate,
    goal: Coordinate,
) -> Vec<Coordinate> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(&prev) => current = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn c(x: usize, y: usize) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn open_grid(width: usize, height: usize) -> Grid {
        Grid::new(width, height, c(0, 0), [], []).unwrap()
    }

    /// Reference shortest distance by breadth-first search.
    fn bfs_distance(
        grid: &Grid,
        start: Coordinate,
        goal: Coordinate,
        blocked: &BTreeSet<Coordinate>,
    ) -> Option<usize> {
        let mut dist = HashMap::from([(start, 0usize)]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                return dist.get(&cell).copied();
            }
            let d = dist[&cell];
            for n in grid.adjacent(cell) {
                if !blocked.contains(&n) && !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn assert_valid_route(start: Coordinate, path: &[Coordinate], blocked: &BTreeSet<Coordinate>) {
        let mut prev = start;
        for &step in path {
            assert_eq!(manhattan(prev, step), 1, "non-adjacent step {} -> {}", prev, step);
            assert!(!blocked.contains(&step));
            prev = step;
        }
    }

    #[test]
    fn test_straight_line() {
        let grid = open_grid(5, 1);
        let path = a_star(&grid, c(0, 0), c(4, 0), &BTreeSet::new());
        assert_eq!(path, vec![c(1, 0), c(2, 0), c(3, 0), c(4, 0)]);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(3, 3);
        assert!(a_star(&grid, c(1, 1), c(1, 1), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_routes_around_believed_wall() {
        let grid = open_grid(3, 3);
        let blocked = BTreeSet::from([c(1, 0), c(1, 1)]);

        let path = a_star(&grid, c(0, 0), c(2, 0), &blocked);

        assert_eq!(path.len(), 6);
        assert_eq!(path.last(), Some(&c(2, 0)));
        assert_valid_route(c(0, 0), &path, &blocked);
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let grid = open_grid(5, 5);
        let blocked = BTreeSet::from([c(1, 2), c(3, 2), c(2, 1), c(2, 3)]);

        assert!(a_star(&grid, c(0, 0), c(2, 2), &blocked).is_empty());
    }

    #[test]
    fn test_ignores_unknown_obstacles() {
        // Ground truth has a wall, but nobody believes in it yet.
        let grid = Grid::new(3, 1, c(0, 0), [], [c(1, 0)]).unwrap();
        let path = a_star(&grid, c(0, 0), c(2, 0), &BTreeSet::new());
        assert_eq!(path, vec![c(1, 0), c(2, 0)]);
    }

    #[test]
    fn test_tie_break_prefers_low_coordinates() {
        // Both (1,0) and (0,1) lie on a shortest route to (1,1). The first step
        // popped with equal f is the smaller coordinate, (0,1).
        let grid = open_grid(2, 2);
        let path = a_star(&grid, c(0, 0), c(1, 1), &BTreeSet::new());
        assert_eq!(path, vec![c(0, 1), c(1, 1)]);
        assert_eq!(path, a_star(&grid, c(0, 0), c(1, 1), &BTreeSet::new()));
    }

    fn scenario() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize)>, (usize, usize), (usize, usize))> {
        (2usize..8, 2usize..8).prop_flat_map(|(w, h)| {
            (
                Just(w),
                Just(h),
                prop::collection::vec((0..w, 0..h), 0..(w * h / 2)),
                (0..w, 0..h),
                (0..w, 0..h),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_matches_bfs_length((w, h, walls, start, goal) in scenario()) {
            let grid = open_grid(w, h);
            let start = Coordinate::from(start);
            let goal = Coordinate::from(goal);
            let blocked: BTreeSet<Coordinate> = walls
                .into_iter()
                .map(Coordinate::from)
                .filter(|&cell| cell != start)
                .collect();

            let path = a_star(&grid, start, goal, &blocked);
            match bfs_distance(&grid, start, goal, &blocked) {
                Some(expected) => {
                    prop_assert_eq!(path.len(), expected);
                    if expected > 0 {
                        prop_assert_eq!(path.last().copied(), Some(goal));
                    }
                    assert_valid_route(start, &path, &blocked);
                }
                None => prop_assert!(path.is_empty()),
            }
        }

        #[test]
        fn prop_is_deterministic((w, h, walls, start, goal) in scenario()) {
            let grid = open_grid(w, h);
            let blocked: BTreeSet<Coordinate> = walls.into_iter().map(Coordinate::from).collect();
            let start = Coordinate::from(start);
            let goal = Coordinate::from(goal);

            let first = a_star(&grid, start, goal, &blocked);
            let second = a_star(&grid, start, goal, &blocked);
            prop_assert_eq!(first, second);
        }
    }
}
