//! Move descriptors.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::PieceRef;

/// A move the engine has found to be legal.
///
/// Descriptors are plain values; a caller hands one back to
/// `TurnController::choose_move` and it is matched by equality against the
/// offered set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegalMove {
    /// The piece that moves.
    pub piece: PieceRef,

    /// Track index before the move; `None` when entering from hand.
    pub from: Option<usize>,

    /// Track index after the move; `path_length` means completion.
    pub target: usize,

    /// An opposing piece on the target square goes back to its hand.
    pub is_capture: bool,

    /// The piece walks off the end of the path.
    pub is_completion: bool,

    /// The target square is a rosette, so the mover rolls again.
    pub lands_on_rosette: bool,
}

impl LegalMove {
    /// Whether this move enters a new piece.
    #[must_use]
    pub fn is_entry(&self) -> bool {
        matches!(self.piece, PieceRef::Hand)
    }
}

impl std::fmt::Display for LegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{} {} -> {}", self.piece, from, self.target)?,
            None => write!(f, "{} -> {}", self.piece, self.target)?,
        }
        if self.is_capture {
            f.write_str(" (capture)")?;
        }
        if self.is_completion {
            f.write_str(" (home)")?;
        }
        if self.lands_on_rosette {
            f.write_str(" (rosette)")?;
        }
        Ok(())
    }
}

/// Legal moves for one roll.
///
/// At most one entry from hand plus one move per active piece, so the
/// common case fits inline without allocating.
pub type MoveList = SmallVec<[LegalMove; 8]>;
