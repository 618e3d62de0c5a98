//! The [`Grid`] type: a 2D grid of wall / passage [`Cell`]s.
//!
//! A `Grid` is a *view* into a shared backing buffer. Cloning a `Grid` yields
//! another view of the **same** storage, which lets a generator hand out the
//! grid it is still carving without copying it. Use
//! [`snapshot`](Grid::snapshot) for an independent copy.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::GridError;
use crate::geom::{Point, Range};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single grid cell: either solid wall or walkable passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Wall,
    Passage,
}

impl Cell {
    /// Whether an agent may stand on this cell.
    #[inline]
    pub const fn is_passage(self) -> bool {
        matches!(self, Self::Passage)
    }

    /// Character used by [`Grid::from_ascii`] and `Display`.
    #[inline]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Passage => '.',
        }
    }
}

impl From<bool> for Cell {
    fn from(open: bool) -> Self {
        if open { Self::Passage } else { Self::Wall }
    }
}

impl From<Cell> for bool {
    fn from(c: Cell) -> Self {
        c.is_passage()
    }
}

impl From<u8> for Cell {
    fn from(v: u8) -> Self {
        Self::from(v != 0)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self::from(v != 0)
    }
}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct GridBuffer {
    cells: Vec<Cell>,
    width: usize,
}

impl GridBuffer {
    #[inline]
    fn index(&self, p: Point) -> usize {
        (p.y as usize) * self.width + (p.x as usize)
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A rectangular 2D grid of [`Cell`]s backed by shared storage.
///
/// Cloning produces another view into the same buffer.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<GridBuffer>>,
    bounds: Range,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with walls.
    /// Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self::from_buffer(
            GridBuffer {
                cells: vec![Cell::Wall; (w as usize) * (h as usize)],
                width: w as usize,
            },
            w,
            h,
        )
    }

    fn from_buffer(buffer: GridBuffer, width: i32, height: i32) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(buffer)),
            bounds: Range::new(0, 0, width, height),
        }
    }

    /// Build a grid from row-major data, `rows[y][x]`. Any value that
    /// converts into a [`Cell`] is accepted; for integers non-zero means
    /// passage.
    ///
    /// Fails with [`GridError::Ragged`] if the rows differ in length.
    pub fn from_rows<R, T>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[T]>,
        T: Copy + Into<Cell>,
    {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row.iter().map(|&v| v.into()));
        }
        Ok(Self::from_buffer(
            GridBuffer { cells, width },
            width as i32,
            rows.len() as i32,
        ))
    }

    /// Parse a grid drawn with `#` for walls and `.` (or space) for
    /// passages, one line per row.
    pub fn from_ascii(text: &str) -> Result<Self, GridError> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (y, line) in text.lines().enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                row.push(match ch {
                    '#' => Cell::Wall,
                    '.' | ' ' => Cell::Passage,
                    _ => {
                        return Err(GridError::InvalidChar {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                });
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the grid as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside this grid's bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Read the cell at `p`, or `None` if `p` is outside bounds.
    pub fn at(&self, p: Point) -> Option<Cell> {
        if !self.bounds.contains(p) {
            return None;
        }
        let buf = self.buffer.borrow();
        Some(buf.cells[buf.index(p)])
    }

    /// Whether `p` is inside bounds and a passage.
    #[inline]
    pub fn is_passage(&self, p: Point) -> bool {
        self.at(p).is_some_and(Cell::is_passage)
    }

    /// Write `cell` at `p`. Does nothing if `p` is outside bounds.
    pub fn set(&self, p: Point, cell: Cell) {
        if !self.bounds.contains(p) {
            return;
        }
        let mut buf = self.buffer.borrow_mut();
        let idx = buf.index(p);
        buf.cells[idx] = cell;
    }

    /// Count how many cells equal `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.buffer.borrow().cells.iter().filter(|&&c| c == cell).count()
    }

    /// Copy the cells out as `rows[y][x]` booleans (`true` = passage).
    pub fn rows(&self) -> Vec<Vec<bool>> {
        let buf = self.buffer.borrow();
        if buf.width == 0 {
            return vec![Vec::new(); self.height() as usize];
        }
        buf.cells
            .chunks(buf.width)
            .map(|row| row.iter().map(|&c| c.is_passage()).collect())
            .collect()
    }

    /// An independent deep copy that no longer shares storage with `self`.
    pub fn snapshot(&self) -> Grid {
        Self {
            buffer: Rc::new(RefCell::new(self.buffer.borrow().clone())),
            bounds: self.bounds,
        }
    }

    /// Whether `self` and `other` are views of the same storage.
    pub fn shares_buffer(&self, other: &Grid) -> bool {
        Rc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl PartialEq for Grid {
    /// Grids compare by content, not by storage identity.
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds && *self.buffer.borrow() == *other.buffer.borrow()
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buf = self.buffer.borrow();
        for y in 0..self.height() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() {
                let c = buf.cells[buf.index(Point::new(x, y))];
                write!(f, "{}", c.glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.rows(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = <Vec<Vec<bool>> as serde::Deserialize>::deserialize(deserializer)?;
        Grid::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_all_walls() {
        let g = Grid::new(4, 3);
        assert_eq!(g.size(), Point::new(4, 3));
        assert_eq!(g.count(Cell::Wall), 12);
        assert!(!g.is_passage(Point::new(1, 1)));
    }

    #[test]
    fn negative_size_clamps_to_empty() {
        let g = Grid::new(-3, 2);
        assert_eq!(g.width(), 0);
        assert_eq!(g.height(), 2);
        assert_eq!(g.count(Cell::Wall), 0);
    }

    #[test]
    fn set_and_at() {
        let g = Grid::new(4, 4);
        let p = Point::new(2, 3);
        g.set(p, Cell::Passage);
        assert_eq!(g.at(p), Some(Cell::Passage));
        assert_eq!(g.at(Point::new(0, 0)), Some(Cell::Wall));
        assert_eq!(g.at(Point::new(10, 10)), None);
        assert_eq!(g.at(Point::new(-1, 0)), None);
        // out of bounds writes are ignored
        g.set(Point::new(4, 0), Cell::Passage);
        assert_eq!(g.count(Cell::Passage), 1);
    }

    #[test]
    fn clones_share_storage() {
        let g = Grid::new(3, 3);
        let view = g.clone();
        g.set(Point::new(1, 1), Cell::Passage);
        assert!(view.is_passage(Point::new(1, 1)));
        assert!(view.shares_buffer(&g));
    }

    #[test]
    fn snapshot_is_independent() {
        let g = Grid::new(3, 3);
        let snap = g.snapshot();
        g.set(Point::new(1, 1), Cell::Passage);
        assert!(!snap.is_passage(Point::new(1, 1)));
        assert!(!snap.shares_buffer(&g));
        assert_ne!(snap, g);
    }

    #[test]
    fn from_rows_accepts_integers_and_bools() {
        let g = Grid::from_rows(&[[1i32, 1, 1], [1, 0, 1]]).unwrap();
        assert_eq!(g.size(), Point::new(3, 2));
        assert!(g.is_passage(Point::new(0, 1)));
        assert!(!g.is_passage(Point::new(1, 1)));

        let b = Grid::from_rows(&[vec![true, true, true], vec![true, false, true]]).unwrap();
        assert_eq!(g, b);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![1u8, 1, 1], vec![1, 1], vec![1, 1, 1]];
        let err = Grid::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn from_rows_empty() {
        let rows: Vec<Vec<u8>> = Vec::new();
        let g = Grid::from_rows(&rows).unwrap();
        assert!(g.bounds().is_empty());
    }

    #[test]
    fn ascii_round_trip() {
        let text = "#####\n#...#\n#.#.#\n#####";
        let g = Grid::from_ascii(text).unwrap();
        assert_eq!(g.size(), Point::new(5, 4));
        assert_eq!(g.count(Cell::Passage), 5);
        assert_eq!(g.to_string(), text);
    }

    #[test]
    fn ascii_rejects_unknown_glyph() {
        let err = Grid::from_ascii("##\n#x").unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidChar {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
    }

    #[test]
    fn rows_copy_out() {
        let g = Grid::from_ascii("#.\n..").unwrap();
        assert_eq!(g.rows(), vec![vec![false, true], vec![true, true]]);
    }
}
