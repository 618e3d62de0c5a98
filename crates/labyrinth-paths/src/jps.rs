//! Jump Point Search (JPS) on uniform-cost 8-way grids.
//!
//! JPS "jumps" along straight lines and only adds *jump points*
//! to the frontier: positions with a forced neighbour, the goal itself,
//! and diagonal positions whose orthogonal sub-jump finds one. The search is exposed as an
//! iterator of [`SearchStep`] snapshots so that callers can animate it.
//!
//! The frontier is a plain FIFO queue: points are expanded in discovery
//! order rather than by accumulated distance. Returned paths are always
//! valid but are not guaranteed to be the shortest possible.

use std::collections::{HashMap, VecDeque};

use labyrinth_core::Point;
use log::{debug, trace};

use crate::passable::{blocked, passable};
use crate::reconstruct::Reconstruct;
use crate::step::SearchStep;
use crate::traits::Terrain;

/// Neighbour order used when expanding the start point.
const START_DIRS: [Point; 8] = [
    Point::new(0, -1),
    Point::new(-1, 0),
    Point::new(-1, -1),
    Point::new(-1, 1),
    Point::new(1, -1),
    Point::new(0, 1),
    Point::new(1, 0),
    Point::new(1, 1),
];

/// How the expansion phase of a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The goal was dequeued.
    Reached,
    /// The frontier emptied without reaching the goal.
    Exhausted,
}

/// Per-search frontier state. Never shared between searches.
struct Frontier {
    preds: HashMap<Point, Option<Point>>,
    queue: VecDeque<Point>,
    trace: Vec<Point>,
    // dequeued point whose successors are identified on the next pull
    pending: Option<Point>,
}

enum Phase {
    Expanding(Frontier),
    Reconstructing(Reconstruct),
    Done,
}

/// A steppable Jump Point Search from `start` to `end`.
///
/// Every pull expands one frontier point and yields the trace so far with
/// `path == None`. When the goal is dequeued or the frontier runs dry the
/// search hands over to [`Reconstruct`], whose steps carry the path. The
/// last step holds the final path, or just `[end]` when there is none.
///
/// Dropping the iterator early discards all search state.
pub struct Search<T: Terrain> {
    terrain: T,
    end: Point,
    phase: Phase,
    outcome: Option<Outcome>,
}

/// Start a search over `terrain`. See [`Search`].
pub fn search<T: Terrain>(terrain: T, start: Point, end: Point) -> Search<T> {
    Search::new(terrain, start, end)
}

/// Run a search to completion and return the path, start first.
///
/// When `end` cannot be reached the result is `vec![end]`.
pub fn solve<T: Terrain>(terrain: T, start: Point, end: Point) -> Vec<Point> {
    search(terrain, start, end)
        .last()
        .and_then(|step| step.route())
        .unwrap_or_else(|| vec![end])
}

impl<T: Terrain> Search<T> {
    pub fn new(terrain: T, start: Point, end: Point) -> Self {
        let frontier = Frontier {
            preds: HashMap::from([(start, None)]),
            queue: VecDeque::from([start]),
            trace: Vec::new(),
            pending: None,
        };
        Self {
            terrain,
            end,
            phase: Phase::Expanding(frontier),
            outcome: None,
        }
    }

    /// How expansion ended, or `None` while it is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn finish(&mut self, outcome: Outcome) {
        let Phase::Expanding(frontier) = std::mem::replace(&mut self.phase, Phase::Done) else {
            return;
        };
        debug!(
            "jps: {:?} after expanding {} points",
            outcome,
            frontier.trace.len()
        );
        self.outcome = Some(outcome);
        self.phase = Phase::Reconstructing(Reconstruct::new(
            frontier.preds,
            self.end,
            frontier.trace,
        ));
    }
}

impl<T: Terrain> Iterator for Search<T> {
    type Item = SearchStep;

    fn next(&mut self) -> Option<SearchStep> {
        loop {
            match &mut self.phase {
                Phase::Expanding(frontier) => {
                    if let Some(current) = frontier.pending.take() {
                        let parent = frontier.preds.get(&current).copied().flatten();
                        let found = successors(&self.terrain, current, parent, self.end);
                        trace!("jps: expand {current}, {} successors", found.len());
                        for s in found {
                            // every discovered point is either queued or
                            // already in the trace
                            if frontier.preds.contains_key(&s) {
                                continue;
                            }
                            frontier.preds.insert(s, Some(current));
                            frontier.queue.push_back(s);
                        }
                    }
                    let Some(current) = frontier.queue.pop_front() else {
                        self.finish(Outcome::Exhausted);
                        continue;
                    };
                    frontier.trace.push(current);
                    if current == self.end {
                        self.finish(Outcome::Reached);
                        continue;
                    }
                    frontier.pending = Some(current);
                    return Some(SearchStep::searching(frontier.trace.clone()));
                }
                Phase::Reconstructing(rebuild) => {
                    if let Some(step) = rebuild.next() {
                        return Some(step);
                    }
                    self.phase = Phase::Done;
                }
                Phase::Done => return None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JPS internals
// ---------------------------------------------------------------------------

/// Jump points reachable from `current`, in pruned-neighbour order.
fn successors<T: Terrain>(
    terrain: &T,
    current: Point,
    parent: Option<Point>,
    goal: Point,
) -> Vec<Point> {
    prune(terrain, current, parent)
        .into_iter()
        .filter_map(|n| jump(terrain, current, n - current, goal))
        .collect()
}

/// Neighbours of `p` worth exploring given the direction we arrived from.
fn prune<T: Terrain>(terrain: &T, p: Point, parent: Option<Point>) -> Vec<Point> {
    if blocked(terrain, p) {
        return Vec::new();
    }
    let Some(parent) = parent else {
        return START_DIRS
            .into_iter()
            .filter(|&d| passable(terrain, p, d))
            .map(|d| p + d)
            .collect();
    };

    let d = (p - parent).signum();
    let mut out: Vec<Point> = forced(terrain, p, d).into_iter().flatten().collect();
    if passable(terrain, p, d) {
        out.push(p + d);
    }
    if d.is_diagonal() {
        for natural in [Point::new(0, d.y), Point::new(d.x, 0)] {
            if passable(terrain, p, natural) {
                out.push(p + natural);
            }
        }
    }
    out
}

/// Forced neighbours of `p` when travelling in direction `d`.
///
/// A neighbour is forced when it can be entered from `p` but the cell
/// beside `p` that would normally offer a shorter route to it is blocked.
fn forced<T: Terrain>(terrain: &T, p: Point, d: Point) -> [Option<Point>; 2] {
    let candidates = if d.is_diagonal() {
        [
            (Point::new(-d.x, d.y), p.shift(-d.x, 0)),
            (Point::new(d.x, -d.y), p.shift(0, -d.y)),
        ]
    } else if d.x == 0 {
        [
            (Point::new(-1, d.y), p.shift(-1, 0)),
            (Point::new(1, d.y), p.shift(1, 0)),
        ]
    } else {
        [
            (Point::new(d.x, -1), p.shift(0, -1)),
            (Point::new(d.x, 1), p.shift(0, 1)),
        ]
    };
    candidates.map(|(dir, side)| {
        (passable(terrain, p, dir) && blocked(terrain, side)).then_some(p + dir)
    })
}

/// Walk from `from` along `dir` until a jump point is found.
///
/// Returns `None` as soon as the next step is impassable.
fn jump<T: Terrain>(terrain: &T, from: Point, dir: Point, goal: Point) -> Option<Point> {
    let mut cur = from;
    loop {
        if !passable(terrain, cur, dir) {
            return None;
        }
        cur = cur + dir;
        if cur == goal || forced(terrain, cur, dir).iter().any(Option::is_some) {
            return Some(cur);
        }
        if dir.is_diagonal()
            && [Point::new(dir.x, 0), Point::new(0, dir.y)]
                .into_iter()
                .any(|sub| jump(terrain, cur, sub, goal).is_some())
        {
            return Some(cur);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::Grid;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn grid(rows: &[&[i32]]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    fn assert_valid_path(g: &Grid, path: &[Point], start: Point, end: Point) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(w[1]), "{} -> {} is not a unit step", w[0], w[1]);
            assert!(passable(g, w[0], w[1] - w[0]));
        }
        for (i, a) in path.iter().enumerate() {
            assert!(g.is_passage(*a));
            assert!(!path[i + 1..].contains(a), "{a} repeats");
        }
    }

    #[test]
    fn open_square_goes_diagonal() {
        let g = grid(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]);
        assert_eq!(solve(&g, p(0, 0), p(2, 2)), vec![p(0, 0), p(1, 1), p(2, 2)]);
    }

    #[test]
    fn routes_around_centre_pillar() {
        let g = grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        assert_eq!(
            solve(&g, p(0, 0), p(2, 2)),
            vec![p(0, 0), p(0, 1), p(1, 2), p(2, 2)]
        );
    }

    #[test]
    fn routes_along_top_when_column_blocked() {
        let g = grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 0, 1]]);
        assert_eq!(
            solve(&g, p(0, 0), p(2, 2)),
            vec![p(0, 0), p(1, 0), p(2, 1), p(2, 2)]
        );
    }

    #[test]
    fn crosses_pillar_sideways() {
        let g = grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        assert_eq!(solve(&g, p(0, 1), p(2, 1)), vec![p(0, 1), p(1, 0), p(2, 1)]);
    }

    #[test]
    fn corner_cut_is_unreachable() {
        let g = grid(&[&[1, 1, 1], &[1, 1, 0], &[1, 0, 1]]);
        assert_eq!(solve(&g, p(0, 0), p(2, 2)), vec![p(2, 2)]);
    }

    #[test]
    fn out_of_bounds_goal_is_unreachable() {
        let g = grid(&[&[1, 1, 1], &[1, 0, 0], &[1, 0, 1]]);
        assert_eq!(solve(&g, p(0, 0), p(-1, 0)), vec![p(-1, 0)]);
    }

    #[test]
    fn walled_or_outside_start_does_not_connect() {
        let g = grid(&[&[0, 1, 1], &[1, 1, 1], &[1, 1, 1]]);
        assert_eq!(solve(&g, p(0, 0), p(2, 2)), vec![p(2, 2)]);
        assert_eq!(solve(&g, p(-1, 1), p(2, 2)), vec![p(2, 2)]);
    }

    #[test]
    fn start_equals_end() {
        let g = grid(&[&[1, 1], &[1, 1]]);
        let steps: Vec<_> = search(&g, p(1, 0), p(1, 0)).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].trace, vec![p(1, 0)]);
        assert_eq!(steps[0].route(), Some(vec![p(1, 0)]));
    }

    #[test]
    fn walled_maze_with_detour() {
        let g = Grid::from_ascii(
            "\
#######
#.....#
#.#####
#..#..#
##.#.##
#.....#
#######",
        )
        .unwrap();
        let path = solve(&g, p(1, 1), p(5, 5));
        assert_eq!(
            path,
            vec![p(1, 1), p(1, 2), p(2, 3), p(2, 4), p(3, 5), p(4, 5), p(5, 5)]
        );
        assert_valid_path(&g, &path, p(1, 1), p(5, 5));
    }

    #[test]
    fn open_room_takes_diagonal_run() {
        let g = Grid::from_ascii(
            "\
#######
#.....#
#.#...#
#.#...#
#.###.#
#.....#
#######",
        )
        .unwrap();
        let path = solve(&g, p(1, 1), p(5, 5));
        assert_eq!(
            path,
            vec![p(1, 1), p(2, 1), p(3, 2), p(4, 3), p(5, 4), p(5, 5)]
        );
        assert_valid_path(&g, &path, p(1, 1), p(5, 5));
    }

    #[test]
    fn search_frames_then_reconstruction_frames() {
        let g = grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let mut s = search(&g, p(0, 0), p(2, 2));
        let steps: Vec<_> = s.by_ref().collect();
        assert_eq!(s.outcome(), Some(Outcome::Reached));

        let split = steps.iter().position(|st| st.path.is_some()).unwrap();
        assert!(split > 0);
        assert!(steps[split..].iter().all(|st| st.path.is_some()));
        // the trace only grows during expansion and is frozen afterwards
        for w in steps[..split].windows(2) {
            assert_eq!(w[1].trace.len(), w[0].trace.len() + 1);
        }
        let last_trace = &steps[split].trace;
        assert_eq!(last_trace.first(), Some(&p(0, 0)));
        assert_eq!(last_trace.last(), Some(&p(2, 2)));
        assert_eq!(steps[split].path, Some(vec![p(2, 2)]));
        // one frame per appended path cell
        assert_eq!(steps.len() - split, 4);
    }

    #[test]
    fn exhausted_search_reports_outcome() {
        let g = grid(&[&[1, 0, 1]]);
        let mut s = search(&g, p(0, 0), p(2, 0));
        let last = s.by_ref().last().unwrap();
        assert_eq!(s.outcome(), Some(Outcome::Exhausted));
        assert_eq!(last.path, Some(vec![p(2, 0)]));
        assert_eq!(last.trace, vec![p(0, 0)]);
    }

    #[test]
    fn abandoning_early_is_harmless() {
        let g = grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
        let first: Vec<_> = search(&g, p(0, 0), p(2, 2)).take(1).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].path, None);
        // a fresh search is unaffected
        assert_eq!(solve(&g, p(0, 0), p(2, 2)).len(), 4);
    }

    #[test]
    fn straight_corridor_jumps_to_goal() {
        let g = Grid::from_ascii("........").unwrap();
        let steps: Vec<_> = search(&g, p(0, 0), p(7, 0)).collect();
        // start expanded once, then goal dequeued
        assert_eq!(steps[0].trace, vec![p(0, 0)]);
        assert_eq!(steps.last().unwrap().trace, vec![p(0, 0), p(7, 0)]);
        assert_eq!(solve(&g, p(0, 0), p(7, 0)).len(), 8);
    }

    #[test]
    fn forced_neighbours_for_diagonal_travel() {
        let g = Grid::from_ascii(
            "\
...
#..
...",
        )
        .unwrap();
        // travelling (1,1) through (1,1): (0,1) is blocked so (0,2) is forced
        let f = forced(&g, p(1, 1), p(1, 1));
        assert_eq!(f, [Some(p(0, 2)), None]);
    }

    #[test]
    fn prune_keeps_natural_and_forced() {
        let g = Grid::from_ascii(
            "\
...
.#.
...",
        )
        .unwrap();
        // moving down the left column past the pillar
        let n = prune(&g, p(0, 1), Some(p(0, 0)));
        assert_eq!(n, vec![p(1, 2), p(0, 2)]);
        // start expands every passable neighbour in fixed order
        let n = prune(&g, p(0, 0), None);
        assert_eq!(n, vec![p(0, 1), p(1, 0)]);
    }
}
