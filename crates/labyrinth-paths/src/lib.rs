//! Steppable Jump Point Search over labyrinth grids.
//!
//! - [`passable`]: the 8-way movement rule (no cutting solid corners)
//! - [`Search`]: JPS as an iterator of [`SearchStep`] snapshots
//! - [`Reconstruct`]: expands the jump-point chain into a full path
//! - [`solve`]: drain a search and return the final path
//!
//! Any map implementing [`Terrain`] can be searched; [`Grid`] does out of
//! the box.
//!
//! [`Grid`]: labyrinth_core::Grid

mod jps;
mod passable;
mod reconstruct;
mod step;
mod traits;

pub use jps::{Outcome, Search, search, solve};
pub use passable::passable;
pub use reconstruct::Reconstruct;
pub use step::SearchStep;
pub use traits::Terrain;
