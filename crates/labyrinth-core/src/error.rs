use std::fmt;

use crate::geom::Point;

/// Errors raised while building a [`Grid`](crate::Grid) from external data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A row does not have the same length as the first row.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character other than a wall or passage marker was found.
    InvalidChar { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid is not rectangular: row {row} has {found} cells, expected {expected}"
            ),
            Self::InvalidChar { ch, pos } => {
                write!(f, "grid contains invalid character \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}
