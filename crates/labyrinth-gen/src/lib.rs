//! Steppable perfect-maze generation.
//!
//! [`MazeGen`] carves mazes with Eller's algorithm. Each call to
//! [`generate`](MazeGen::generate) returns an [`Eller`] iterator that yields
//! the grid after every cell write, so the carving can be animated; use
//! [`build`](MazeGen::build) to skip straight to the result.

mod coin;
mod eller;

pub use coin::{Coin, FairCoin};
pub use eller::Eller;

use labyrinth_core::Grid;
use rand::Rng;

/// Maze generator owning its random source and decision coin.
pub struct MazeGen<R: Rng, C: Coin = FairCoin> {
    pub rng: R,
    pub coin: C,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator flipping a fair coin with `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            coin: FairCoin,
        }
    }
}

impl<R: Rng, C: Coin> MazeGen<R, C> {
    /// Create a generator with a custom coin.
    pub fn with_coin(rng: R, coin: C) -> Self {
        Self { rng, coin }
    }

    /// Start carving a maze of `width × height` logical cells.
    ///
    /// The resulting grid is `(2·width+1) × (2·height+1)`. Sizes below one
    /// produce an all-wall grid.
    pub fn generate(&mut self, width: i32, height: i32) -> Eller<'_, R, C> {
        Eller::new(&mut self.rng, &mut self.coin, width, height)
    }

    /// Carve a maze to completion and return it.
    pub fn build(&mut self, width: i32, height: i32) -> Grid {
        let mut steps = self.generate(width, height);
        steps.by_ref().for_each(drop);
        steps.grid().clone()
    }
}
