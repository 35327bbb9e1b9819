//! Driving whole games with external move choosers.
//!
//! The engine never decides which move to play. A `MoveChooser` is handed
//! the offered moves and answers with an index; `Playout` alternates rolls
//! and choices until someone wins or a turn cap is hit.
//!
//! ```
//! use royal_ur::core::GameConfig;
//! use royal_ur::playout::{FirstMoveChooser, Playout, RandomMoveChooser};
//! use royal_ur::turn::TurnController;
//!
//! let mut game = TurnController::new(GameConfig::new().with_seed(3)).unwrap();
//! let mut playout = Playout::new(
//!     Box::new(FirstMoveChooser),
//!     Box::new(RandomMoveChooser::new(11)),
//! );
//!
//! let result = playout.run(&mut game).unwrap();
//! assert!(result.winner.is_some());
//! ```

mod chooser;

pub use chooser::{FirstMoveChooser, MoveChooser, RandomMoveChooser};

use im::Vector;
use tracing::debug;

use crate::core::{EngineError, Player, PlayerMap};
use crate::turn::{Phase, TurnController, TurnRecord};

/// Configuration for a playout.
#[derive(Clone, Debug)]
pub struct PlayoutConfig {
    /// Stop after this many resolved rolls even without a winner.
    pub max_turns: u32,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self { max_turns: 10_000 }
    }
}

/// How a playout ended.
#[derive(Clone, Debug)]
pub struct PlayoutResult {
    /// `None` if the turn cap was reached first.
    pub winner: Option<Player>,

    /// Rolls resolved, passes included.
    pub turns: u32,

    /// The game's full turn history.
    pub history: Vector<TurnRecord>,
}

/// Runs games between two choosers.
pub struct Playout {
    choosers: PlayerMap<Box<dyn MoveChooser>>,
    config: PlayoutConfig,
}

impl Playout {
    /// Pair up a chooser for each player.
    pub fn new(player_one: Box<dyn MoveChooser>, player_two: Box<dyn MoveChooser>) -> Self {
        Self {
            choosers: PlayerMap::from_pair(player_one, player_two),
            config: PlayoutConfig::default(),
        }
    }

    /// Set the turn cap.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.config.max_turns = max_turns;
        self
    }

    /// Play `game` forward from its current phase.
    ///
    /// An out-of-range index from a chooser surfaces as `IllegalMove`.
    pub fn run(&mut self, game: &mut TurnController) -> Result<PlayoutResult, EngineError> {
        while game.turn_number() < self.config.max_turns {
            match game.phase() {
                Phase::GameOver { .. } => break,
                Phase::AwaitingRoll { .. } => {
                    game.roll()?;
                }
                Phase::AwaitingMoveChoice { player, .. } => {
                    let player = *player;
                    let index = self.choosers[player].choose(&*game, game.legal_moves());
                    game.choose_move_index(index)?;
                }
            }
        }

        debug!(winner = ?game.winner(), turns = game.turn_number(), "playout finished");

        Ok(PlayoutResult {
            winner: game.winner(),
            turns: game.turn_number(),
            history: game.history().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_playout_reaches_winner() {
        let mut game = TurnController::new(GameConfig::new().with_seed(1)).unwrap();
        let mut playout = Playout::new(Box::new(FirstMoveChooser), Box::new(FirstMoveChooser));

        let result = playout.run(&mut game).unwrap();
        let winner = result.winner.unwrap();
        assert_eq!(game.board().completed_count(winner), 7);
        assert_eq!(result.turns as usize, result.history.len());
    }

    #[test]
    fn test_turn_cap() {
        let mut game = TurnController::new(GameConfig::new().with_seed(1)).unwrap();
        let mut playout =
            Playout::new(Box::new(FirstMoveChooser), Box::new(FirstMoveChooser)).with_max_turns(5);

        let result = playout.run(&mut game).unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.turns, 5);
    }

    struct OutOfRange;

    impl MoveChooser for OutOfRange {
        fn choose(&mut self, _game: &TurnController, moves: &[crate::rules::LegalMove]) -> usize {
            moves.len()
        }
    }

    #[test]
    fn test_bad_chooser_is_rejected() {
        let mut game = TurnController::new(GameConfig::new().with_seed(1)).unwrap();
        let mut playout = Playout::new(Box::new(OutOfRange), Box::new(OutOfRange));

        let err = playout.run(&mut game).unwrap_err();
        assert!(matches!(err, EngineError::IllegalMove { .. }));
    }
}
