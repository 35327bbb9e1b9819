//! Value snapshot of a game for transport and persistence layers.
//!
//! A snapshot holds no references into the engine. It serializes with serde
//! and can be fed back to `TurnController::restore` to continue the game
//! with the same future dice.

use serde::{Deserialize, Serialize};

use crate::board::{OccupiedSquare, PieceLocation};
use crate::core::{GameRngState, Player, PlayerMap};
use crate::dice::RollResult;
use crate::rules::LegalMove;

use super::phase::Phase;

/// Everything a caller needs to display or store a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Full phase, including the pending roll and moves.
    pub phase: Phase,

    /// Player to act (or the winner once the game is over).
    pub current_player: Player,

    /// Most recent roll; `None` before the first roll.
    pub last_roll: Option<RollResult>,

    /// Rolls resolved so far.
    pub turn_number: u32,

    /// Set once the game is over.
    pub winner: Option<Player>,

    /// Pieces not yet entered.
    pub hand_counts: PlayerMap<usize>,

    /// Pieces brought home.
    pub completed_counts: PlayerMap<usize>,

    /// Occupied squares as (player, piece, track index, coordinate).
    pub occupancy: Vec<OccupiedSquare>,

    /// Moves on offer; empty unless awaiting a move choice.
    pub legal_moves: Vec<LegalMove>,

    /// Every piece's location, indexed by piece number - 1.
    pub pieces: PlayerMap<Vec<PieceLocation>>,

    /// Dice stream position.
    pub dice: GameRngState,

    /// Grid size as (rows, cols).
    pub dimensions: (u8, u8),
}

impl GameSnapshot {
    /// Board as rows of cells, each holding the occupying player if any.
    #[must_use]
    pub fn grid(&self) -> Vec<Vec<Option<Player>>> {
        let (rows, cols) = self.dimensions;
        let mut grid = vec![vec![None; cols as usize]; rows as usize];
        for square in &self.occupancy {
            let (row, col) = (square.coordinate.row as usize, square.coordinate.col as usize);
            if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = Some(square.player);
            }
        }
        grid
    }
}
