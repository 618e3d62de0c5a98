//! **labyrinth-core**: the grid data model shared by the maze generator
//! and the pathfinder.
//!
//! This crate provides geometry primitives ([`Point`], [`Range`]), the
//! wall / passage [`Cell`], and the shared-buffer [`Grid`].

pub mod error;
pub mod geom;
pub mod grid;

pub use error::GridError;
pub use geom::{Point, Range, RangeIter};
pub use grid::{Cell, Grid};
