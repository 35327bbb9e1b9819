//! Legal move generation.
//!
//! ## Rules
//!
//! For a roll of `n` (a roll of 0 offers nothing):
//! - A piece in hand may enter at track index `n - 1`. All pieces in hand
//!   count as a single candidate.
//! - A piece at track index `i` may advance to `i + n`.
//! - `i + n == path_length` completes the piece. Overshooting is illegal;
//!   pieces must bear off exactly.
//! - A square held by the mover's own piece blocks.
//! - A square held by an opponent is a capture, unless it is a rosette:
//!   rosettes are safe and block instead. Every rosette is treated the
//!   same way.
//!
//! Moves come out in a fixed order: entry from hand first, then board
//! pieces from furthest back to furthest forward.

use crate::board::{BoardState, PieceRef};
use crate::core::Player;

use super::moves::{LegalMove, MoveList};

/// Stateless legality oracle.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveResolver;

impl MoveResolver {
    /// Create a resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Every legal move for `player` with a roll of `roll_total`.
    ///
    /// Empty means the player must pass.
    #[must_use]
    pub fn legal_moves(&self, player: Player, roll_total: u8, board: &BoardState) -> MoveList {
        let mut moves = MoveList::new();
        if roll_total == 0 {
            return moves;
        }
        let roll = usize::from(roll_total);

        if board.hand_count(player) > 0 {
            moves.extend(self.evaluate(player, PieceRef::Hand, None, roll - 1, board));
        }

        for (piece, track_index) in board.active_pieces(player) {
            moves.extend(self.evaluate(
                player,
                PieceRef::Board(piece),
                Some(track_index),
                track_index + roll,
                board,
            ));
        }

        moves
    }

    /// Check a single candidate move, returning its descriptor if legal.
    #[must_use]
    pub fn evaluate(
        &self,
        player: Player,
        piece: PieceRef,
        from: Option<usize>,
        target: usize,
        board: &BoardState,
    ) -> Option<LegalMove> {
        let path = board.path();
        let path_length = path.path_length();

        if target > path_length {
            return None;
        }

        if target == path_length {
            return Some(LegalMove {
                piece,
                from,
                target,
                is_capture: false,
                is_completion: true,
                lands_on_rosette: false,
            });
        }

        let coordinate = path.coordinate_for(player, target).ok()?;
        let lands_on_rosette = path.is_rosette(coordinate);

        let is_capture = match board.piece_at(coordinate) {
            None => false,
            Some(occupant) if occupant.player == player => return None,
            Some(_) if lands_on_rosette => return None,
            Some(_) => true,
        };

        Some(LegalMove {
            piece,
            from,
            target,
            is_capture,
            is_completion: false,
            lands_on_rosette,
        })
    }
}
