//! Engine errors.
//!
//! Every error is local and synchronous. A call that returns an error has
//! left the board and turn state exactly as they were, so the caller may
//! retry with a corrected command.

use thiserror::Error;

use super::player::Player;

/// Which phase the turn machine was in when a command was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PhaseKind {
    /// Waiting for the current player to roll.
    AwaitingRoll,
    /// Waiting for the current player to pick one of the offered moves.
    AwaitingMoveChoice,
    /// A player has completed every piece.
    GameOver,
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PhaseKind::AwaitingRoll => "awaiting roll",
            PhaseKind::AwaitingMoveChoice => "awaiting move choice",
            PhaseKind::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Errors returned by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A track index outside `0..path_length` was looked up.
    #[error("track index {track_index} is outside a path of length {path_length}")]
    OutOfRange {
        track_index: usize,
        path_length: usize,
    },

    /// A command was issued in the wrong phase.
    #[error("cannot {command} while {phase}")]
    InvalidState {
        command: &'static str,
        phase: PhaseKind,
    },

    /// The requested move is not one the engine offered.
    #[error("illegal move for {player}: {reason}")]
    IllegalMove { player: Player, reason: String },

    /// The board's bookkeeping disagrees with itself.
    #[error("board invariant violated: {0}")]
    CorruptState(String),

    /// A game configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub(crate) fn illegal(player: Player, reason: impl Into<String>) -> Self {
        EngineError::IllegalMove {
            player,
            reason: reason.into(),
        }
    }
}
