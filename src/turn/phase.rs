//! Turn phases.

use serde::{Deserialize, Serialize};

use crate::core::{PhaseKind, Player};
use crate::dice::RollResult;
use crate::rules::{LegalMove, MoveList};

/// Where the turn machine is.
///
/// Each variant carries exactly the data that phase needs, so a finished
/// game always has a winner and a pending choice always has its roll and
/// offered moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// `player` must roll next.
    AwaitingRoll { player: Player },

    /// `player` rolled `roll` and must pick one of `legal_moves`.
    AwaitingMoveChoice {
        player: Player,
        roll: RollResult,
        legal_moves: MoveList,
    },

    /// `winner` brought every piece home. Terminal.
    GameOver { winner: Player },
}

impl Phase {
    /// The phase without its payload.
    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::AwaitingRoll { .. } => PhaseKind::AwaitingRoll,
            Phase::AwaitingMoveChoice { .. } => PhaseKind::AwaitingMoveChoice,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }

    /// The player to act, or the winner once the game is over.
    #[must_use]
    pub fn player(&self) -> Player {
        match self {
            Phase::AwaitingRoll { player } | Phase::AwaitingMoveChoice { player, .. } => *player,
            Phase::GameOver { winner } => *winner,
        }
    }

    /// Moves on offer; empty outside `AwaitingMoveChoice`.
    #[must_use]
    pub fn legal_moves(&self) -> &[LegalMove] {
        match self {
            Phase::AwaitingMoveChoice { legal_moves, .. } => legal_moves.as_slice(),
            _ => &[],
        }
    }

    /// The winner, if the game has ended.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match self {
            Phase::GameOver { winner } => Some(*winner),
            _ => None,
        }
    }
}
