//! Turn history.
//!
//! Every resolved roll appends one `TurnRecord`. A record carries the roll's
//! individual dice so a game can be replayed and checked move by move.

use serde::{Deserialize, Serialize};

use crate::core::Player;
use crate::dice::RollResult;
use crate::rules::LegalMove;

/// What the player did with a roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    /// No legal move; the turn passed automatically.
    Pass,
    /// The chosen move.
    Move(LegalMove),
}

/// One resolved roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Sequence number of the roll, starting at 1.
    pub turn: u32,

    /// The player who rolled.
    pub player: Player,

    /// The dice.
    pub roll: RollResult,

    /// Pass or the move played.
    pub action: TurnAction,
}

impl TurnRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(turn: u32, player: Player, roll: RollResult, action: TurnAction) -> Self {
        Self {
            turn,
            player,
            roll,
            action,
        }
    }

    /// The move played, if any.
    #[must_use]
    pub fn chosen_move(&self) -> Option<&LegalMove> {
        match &self.action {
            TurnAction::Move(mv) => Some(mv),
            TurnAction::Pass => None,
        }
    }
}
