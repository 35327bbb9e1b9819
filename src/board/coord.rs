//! Physical board coordinates.

use serde::{Deserialize, Serialize};

/// A (row, column) location on the shared three-row grid.
///
/// Row 0 is Player 2's row, row 1 the shared lane, row 2 Player 1's row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardCoordinate {
    pub row: u8,
    pub col: u8,
}

impl BoardCoordinate {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for BoardCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(u8, u8)> for BoardCoordinate {
    fn from((row, col): (u8, u8)) -> Self {
        Self { row, col }
    }
}
