use labyrinth_core::{Grid, Point, Range};

/// Read-only view of a walkable surface.
pub trait Terrain {
    /// Rectangle of addressable positions.
    fn bounds(&self) -> Range;

    /// Whether `p` is inside [`bounds`](Self::bounds) and walkable.
    fn is_open(&self, p: Point) -> bool;
}

impl Terrain for Grid {
    #[inline]
    fn bounds(&self) -> Range {
        Grid::bounds(self)
    }

    #[inline]
    fn is_open(&self, p: Point) -> bool {
        self.is_passage(p)
    }
}

impl<T: Terrain + ?Sized> Terrain for &T {
    #[inline]
    fn bounds(&self) -> Range {
        (**self).bounds()
    }

    #[inline]
    fn is_open(&self, p: Point) -> bool {
        (**self).is_open(p)
    }
}
