//! Piece identity and location.

use serde::{Deserialize, Serialize};

/// A piece number within one player's set, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Create a piece ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub(crate) const fn slot(self) -> usize {
        self.0 as usize - 1
    }

    pub(crate) const fn from_slot(slot: usize) -> Self {
        Self(slot as u8 + 1)
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "piece {}", self.0)
    }
}

/// Where a piece currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceLocation {
    /// Not yet entered, or captured and sent back.
    InHand,
    /// On the board at this track index.
    OnTrack(usize),
    /// Walked off the end of the path.
    Completed,
}

/// The piece a move refers to.
///
/// Pieces in hand are interchangeable, so a move from hand does not name
/// one; the lowest-numbered piece in hand is the one that enters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceRef {
    Hand,
    Board(PieceId),
}

impl std::fmt::Display for PieceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PieceRef::Hand => f.write_str("piece from hand"),
            PieceRef::Board(id) => write!(f, "{id}"),
        }
    }
}
