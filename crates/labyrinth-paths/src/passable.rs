//! The movement rule shared by every part of the search.

use labyrinth_core::Point;

use crate::traits::Terrain;

/// Whether an agent standing on `from` may step by `dir` (a unit vector).
///
/// The destination must be in bounds and open. A diagonal step additionally
/// needs at least one of the two orthogonal cells it passes between to be
/// open, so agents cannot squeeze through a solid corner.
pub fn passable<T: Terrain + ?Sized>(terrain: &T, from: Point, dir: Point) -> bool {
    let to = from + dir;
    if !terrain.is_open(to) {
        return false;
    }
    if dir.is_diagonal() {
        return terrain.is_open(from.shift(dir.x, 0)) || terrain.is_open(from.shift(0, dir.y));
    }
    true
}

/// Whether `p` is blocked (a wall or off the map).
#[inline]
pub(crate) fn blocked<T: Terrain + ?Sized>(terrain: &T, p: Point) -> bool {
    !terrain.is_open(p)
}
