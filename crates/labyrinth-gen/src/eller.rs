//! Perfect-maze generation with Eller's algorithm.
//!
//! A maze of `W × H` logical cells is carved into a `(2W+1) × (2H+1)` grid:
//! logical cells sit at odd/odd positions, the slots between them are
//! corridors, and everything else is wall. Every candidate corridor starts
//! open; rows are processed top to bottom with a disjoint-set labelling of
//! the columns, closing corridors that would create cycles or that a coin
//! flip decides against, while making sure no set is cut off from the rows
//! below.

use labyrinth_core::{Cell, Grid, Point, RangeIter};
use log::{debug, trace};
use rand::Rng;

use crate::coin::Coin;

#[derive(Debug, Clone)]
enum Phase {
    Init(RangeIter),
    Row(usize),
    Horizontal { row: usize, col: usize },
    Vertical { row: usize, col: usize },
    Connect { row: usize, col: usize },
    Final { col: usize },
    Done,
}

/// Lazy maze carving. Yields a view of the grid after every cell write;
/// the last item is the finished maze.
///
/// Every row, the last included, flips one coin per column pair and one per
/// column. On the last row a closed downward corridor lands on the border,
/// which is already wall, so the write only shows up as an extra frame.
///
/// All yielded items share storage with the grid being carved, so a
/// collected item shows the state at the time it is *inspected*. Use
/// [`Grid::snapshot`] to freeze one.
pub struct Eller<'a, R: Rng, C: Coin> {
    rng: &'a mut R,
    coin: &'a mut C,
    grid: Grid,
    width: usize,
    height: usize,
    // set id per column of the current row, 0 = unassigned
    row_set: Vec<usize>,
    next_set: usize,
    phase: Phase,
    writes: usize,
}

impl<'a, R: Rng, C: Coin> Eller<'a, R, C> {
    pub(crate) fn new(rng: &'a mut R, coin: &'a mut C, width: i32, height: i32) -> Self {
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;
        let grid = Grid::new(2 * width as i32 + 1, 2 * height as i32 + 1);
        debug!("eller: carving {width}x{height} maze");
        Self {
            rng,
            coin,
            phase: Phase::Init(grid.bounds().iter()),
            grid,
            width,
            height,
            row_set: vec![0; width],
            next_set: 1,
            writes: 0,
        }
    }

    /// The grid being carved.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Whether the final maze has been produced.
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    fn initial_cell(&self, p: Point) -> Cell {
        let (w, h) = (self.grid.width(), self.grid.height());
        let odd_x = p.x % 2 == 1;
        let odd_y = p.y % 2 == 1;
        let open = (odd_x && odd_y)
            || (odd_y && !odd_x && p.x != 0 && p.x != w - 1)
            || (odd_x && !odd_y && p.y != 0 && p.y != h - 1);
        Cell::from(open)
    }

    fn write(&mut self, p: Point, cell: Cell) -> Grid {
        self.grid.set(p, cell);
        self.writes += 1;
        self.grid.clone()
    }

    /// Corridor between logical columns `col` and `col + 1`.
    fn right_of(row: usize, col: usize) -> Point {
        Point::new(2 * col as i32 + 2, 2 * row as i32 + 1)
    }

    /// Corridor below logical cell `(col, row)`.
    fn below(row: usize, col: usize) -> Point {
        Point::new(2 * col as i32 + 1, 2 * row as i32 + 2)
    }

    fn down_open(&self, row: usize, col: usize) -> bool {
        self.grid.is_passage(Self::below(row, col))
    }

    /// Relabel every column of set `from` as set `into`.
    fn merge(&mut self, into: usize, from: usize) {
        for s in self.row_set.iter_mut().filter(|s| **s == from) {
            *s = into;
        }
    }

    fn flip(&mut self) -> bool {
        self.coin.flip(&mut *self.rng)
    }

    fn finish(&mut self) {
        self.phase = Phase::Done;
        debug!(
            "eller: finished {}x{} grid after {} writes, {} passages",
            self.grid.width(),
            self.grid.height(),
            self.writes,
            self.grid.count(Cell::Passage)
        );
    }
}

impl<R: Rng, C: Coin> Iterator for Eller<'_, R, C> {
    type Item = Grid;

    fn next(&mut self) -> Option<Grid> {
        let last = self.height.saturating_sub(1);
        loop {
            match self.phase.clone() {
                Phase::Init(mut cells) => {
                    let Some(p) = cells.next() else {
                        if self.width == 0 || self.height == 0 {
                            self.finish();
                        } else {
                            self.phase = Phase::Row(0);
                        }
                        continue;
                    };
                    self.phase = Phase::Init(cells);
                    let cell = self.initial_cell(p);
                    return Some(self.write(p, cell));
                }
                Phase::Row(row) => {
                    for s in self.row_set.iter_mut().filter(|s| **s == 0) {
                        *s = self.next_set;
                        self.next_set += 1;
                    }
                    self.phase = Phase::Horizontal { row, col: 0 };
                }
                Phase::Horizontal { row, col } => {
                    if col + 1 >= self.width {
                        self.phase = Phase::Vertical { row, col: 0 };
                        continue;
                    }
                    self.phase = Phase::Horizontal { row, col: col + 1 };
                    let wall = self.flip();
                    let (left, right) = (self.row_set[col], self.row_set[col + 1]);
                    if wall || left == right {
                        return Some(self.write(Self::right_of(row, col), Cell::Wall));
                    }
                    self.merge(left, right);
                }
                Phase::Vertical { row, col } => {
                    if col >= self.width {
                        self.phase = if row == last {
                            Phase::Final { col: 0 }
                        } else {
                            Phase::Connect { row, col: 0 }
                        };
                        continue;
                    }
                    self.phase = Phase::Vertical { row, col: col + 1 };
                    let wall = self.flip();
                    let set = self.row_set[col];
                    let members = self.row_set.iter().filter(|&&s| s == set).count();
                    if wall && members > 1 {
                        return Some(self.write(Self::below(row, col), Cell::Wall));
                    }
                }
                Phase::Connect { row, col } => {
                    if col >= self.width {
                        for c in 0..self.width {
                            if !self.down_open(row, c) {
                                self.row_set[c] = 0;
                            }
                        }
                        self.phase = Phase::Row(row + 1);
                        continue;
                    }
                    self.phase = Phase::Connect { row, col: col + 1 };
                    let set = self.row_set[col];
                    let linked = (0..self.width)
                        .any(|c| self.row_set[c] == set && self.down_open(row, c));
                    if !linked {
                        trace!("eller: forcing link below ({col}, {row})");
                        return Some(self.write(Self::below(row, col), Cell::Passage));
                    }
                }
                Phase::Final { col } => {
                    if col + 1 >= self.width {
                        self.finish();
                        continue;
                    }
                    self.phase = Phase::Final { col: col + 1 };
                    let (left, right) = (self.row_set[col], self.row_set[col + 1]);
                    if left != right {
                        // merge so that a set split across the row is only joined once
                        self.merge(left, right);
                        trace!("eller: joining sets {left} and {right} on the last row");
                        return Some(self.write(Self::right_of(last, col), Cell::Passage));
                    }
                }
                Phase::Done => return None,
            }
        }
    }
}
