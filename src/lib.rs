//! # royal-ur
//!
//! Rules engine for the Royal Game of Ur.
//!
//! Two players race seven pieces each along private entry and exit lanes
//! joined by a shared middle lane. Four binary dice decide how far a piece
//! moves. Landing on an opponent in the shared lane sends it home; landing
//! on a rosette is safe and earns another roll. First to bring every piece
//! off the board wins.
//!
//! ## Design Principles
//!
//! 1. **Geometry as data**: `PathModel` maps each player's track index to a
//!    board square once. Rules code never does coordinate arithmetic.
//!
//! 2. **Closed phases**: the turn machine is an enum (`AwaitingRoll`,
//!    `AwaitingMoveChoice`, `GameOver`) whose variants carry exactly the
//!    data each phase needs.
//!
//! 3. **Reject, never repair**: a bad command returns an `EngineError` and
//!    leaves the game untouched. The engine never substitutes a move.
//!
//! 4. **Owned instances**: a game is a plain value. No globals, no locks.
//!
//! ## Modules
//!
//! - `core`: players, configuration, errors, RNG
//! - `board`: path model and board state
//! - `dice`: four binary dice
//! - `rules`: legal move generation
//! - `turn`: turn state machine, history, snapshots
//! - `playout`: driving games with external move choosers
//!
//! ## Example
//!
//! ```
//! use royal_ur::{GameConfig, PhaseKind, TurnController};
//!
//! let mut game = TurnController::new(GameConfig::new().with_seed(42)).unwrap();
//! game.roll().unwrap();
//!
//! if game.phase().kind() == PhaseKind::AwaitingMoveChoice {
//!     let mv = game.legal_moves()[0];
//!     game.choose_move(&mv).unwrap();
//! }
//! ```

pub mod board;
pub mod core;
pub mod dice;
pub mod playout;
pub mod rules;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    EngineError, GameConfig, GameRng, GameRngState, PathLayout, PhaseKind, Player, PlayerMap,
};

pub use crate::board::{
    BoardCoordinate, BoardState, OccupiedSquare, Occupant, PathModel, PieceId, PieceLocation,
    PieceRef,
};

pub use crate::dice::{DiceEngine, RollResult};

pub use crate::rules::{LegalMove, MoveList, MoveResolver};

pub use crate::turn::{GameSnapshot, MoveOutcome, Phase, TurnAction, TurnController, TurnRecord};

pub use crate::playout::{FirstMoveChooser, MoveChooser, Playout, PlayoutResult, RandomMoveChooser};
