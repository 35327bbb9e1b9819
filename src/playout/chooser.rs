//! Move chooser seam.

use crate::core::GameRng;
use crate::rules::LegalMove;
use crate::turn::TurnController;

/// Picks one of the offered moves.
///
/// `moves` is never empty: the engine passes automatically when nothing is
/// legal. The return value is an index into `moves`.
pub trait MoveChooser {
    fn choose(&mut self, game: &TurnController, moves: &[LegalMove]) -> usize;
}

/// Always plays the first offered move.
///
/// Moves are ordered entry-first, so this keeps bringing pieces on.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstMoveChooser;

impl MoveChooser for FirstMoveChooser {
    fn choose(&mut self, _game: &TurnController, _moves: &[LegalMove]) -> usize {
        0
    }
}

/// Picks uniformly at random from a seeded stream.
#[derive(Clone, Debug)]
pub struct RandomMoveChooser {
    rng: GameRng,
}

impl RandomMoveChooser {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl MoveChooser for RandomMoveChooser {
    fn choose(&mut self, _game: &TurnController, moves: &[LegalMove]) -> usize {
        self.rng.gen_range_usize(0..moves.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::dice::RollResult;

    #[test]
    fn test_random_chooser_stays_in_range() {
        let mut game = TurnController::new(GameConfig::default()).unwrap();
        game.apply_roll(RollResult::from_total(1).unwrap()).unwrap();
        let moves = game.legal_moves().to_vec();

        let mut chooser = RandomMoveChooser::new(5);
        for _ in 0..50 {
            assert!(chooser.choose(&game, &moves) < moves.len());
        }
    }

    #[test]
    fn test_random_chooser_is_deterministic() {
        let game = TurnController::new(GameConfig::default()).unwrap();
        let moves = vec![
            LegalMove {
                piece: crate::board::PieceRef::Hand,
                from: None,
                target: 0,
                is_capture: false,
                is_completion: false,
                lands_on_rosette: false,
            };
            6
        ];

        let mut a = RandomMoveChooser::new(8);
        let mut b = RandomMoveChooser::new(8);
        for _ in 0..20 {
            assert_eq!(a.choose(&game, &moves), b.choose(&game, &moves));
        }
    }
}
