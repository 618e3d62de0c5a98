//! Expansion of a jump-point predecessor chain into a cell-by-cell path.

use std::collections::HashMap;

use labyrinth_core::Point;

use crate::step::SearchStep;

/// Lazy walk from the goal back to the start.
///
/// Jump points can be several cells apart, so every segment of the
/// predecessor chain is filled in one cell at a time; each appended cell
/// produces a [`SearchStep`]. The first step is always `[end]` alone, and
/// it is also the only one when `end` was never discovered.
///
/// `preds` must describe a tree rooted at a point mapped to `None`, with
/// every point lying on a straight or diagonal line from its predecessor.
pub struct Reconstruct {
    preds: HashMap<Point, Option<Point>>,
    trace: Vec<Point>,
    end: Point,
    path: Vec<Point>,
    // jump point the tail is currently walking toward
    target: Option<Point>,
}

impl Reconstruct {
    pub fn new(preds: HashMap<Point, Option<Point>>, end: Point, trace: Vec<Point>) -> Self {
        Self {
            preds,
            trace,
            end,
            path: Vec::new(),
            target: None,
        }
    }

    fn predecessor(&self, p: Point) -> Option<Point> {
        self.preds.get(&p).copied().flatten()
    }

    fn step(&self) -> SearchStep {
        SearchStep {
            trace: self.trace.clone(),
            path: Some(self.path.clone()),
        }
    }
}

impl Iterator for Reconstruct {
    type Item = SearchStep;

    fn next(&mut self) -> Option<SearchStep> {
        let Some(&tail) = self.path.last() else {
            self.path.push(self.end);
            self.target = self.predecessor(self.end);
            return Some(self.step());
        };
        let target = self.target?;
        let next = tail + (target - tail).signum();
        self.path.push(next);
        if next == target {
            self.target = self.predecessor(target);
        }
        Some(self.step())
    }
}
