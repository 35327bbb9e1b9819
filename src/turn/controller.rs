//! The turn state machine.
//!
//! ```text
//! AwaitingRoll(p) --roll--> no legal move --------------> AwaitingRoll(other p)
//!                      \--> AwaitingMoveChoice(p, roll, moves)
//! AwaitingMoveChoice --choose--> 7th piece home --------> GameOver(p)
//!                           \--> landed on a rosette ---> AwaitingRoll(p)
//!                           \--> otherwise -------------> AwaitingRoll(other p)
//! ```
//!
//! A `TurnController` is a plain owned value: one per game, no globals, no
//! locking. Callers sharing a game between threads serialize access
//! themselves.

use std::sync::Arc;

use im::Vector;
use tracing::{debug, info, instrument, warn};

use crate::board::{BoardState, Occupant, PathModel, PieceId};
use crate::core::{EngineError, GameConfig, Player, PlayerMap};
use crate::dice::{DiceEngine, RollResult};
use crate::rules::{LegalMove, MoveResolver};

use super::phase::Phase;
use super::record::{TurnAction, TurnRecord};
use super::snapshot::GameSnapshot;

/// What happened when a move was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Who moved.
    pub player: Player,

    /// The move as offered.
    pub applied: LegalMove,

    /// The piece that actually moved (resolved from hand if entering).
    pub piece: PieceId,

    /// The opposing piece sent home, if any.
    pub captured: Option<Occupant>,

    /// The mover rolls again.
    pub bonus_turn: bool,

    /// Set when this move won the game.
    pub winner: Option<Player>,
}

/// One game of Ur.
#[derive(Clone, Debug)]
pub struct TurnController {
    config: GameConfig,
    board: BoardState,
    dice: DiceEngine,
    resolver: MoveResolver,
    phase: Phase,
    last_roll: Option<RollResult>,
    turn_number: u32,
    history: Vector<TurnRecord>,
}

impl TurnController {
    /// Start a new game: all pieces in hand, `starting_player` to roll.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let path = Arc::new(PathModel::new(&config.layout)?);
        let board = BoardState::new(path, config.pieces_per_player);

        Ok(Self {
            phase: Phase::AwaitingRoll {
                player: config.starting_player,
            },
            dice: DiceEngine::new(config.seed),
            board,
            resolver: MoveResolver::new(),
            last_roll: None,
            turn_number: 0,
            history: Vector::new(),
            config,
        })
    }

    // === Queries ===

    /// The configuration this game was started with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Read-only board.
    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// The player to act, or the winner once the game is over.
    #[must_use]
    pub fn current_player(&self) -> Player {
        self.phase.player()
    }

    /// Most recent roll.
    #[must_use]
    pub fn last_roll(&self) -> Option<RollResult> {
        self.last_roll
    }

    /// Rolls resolved so far.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Moves on offer; empty unless awaiting a move choice.
    #[must_use]
    pub fn legal_moves(&self) -> &[LegalMove] {
        self.phase.legal_moves()
    }

    /// The winner, once there is one.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.phase.winner()
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Every resolved roll, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<TurnRecord> {
        &self.history
    }

    /// Value snapshot of the whole game.
    #[must_use]
    pub fn current_state(&self) -> GameSnapshot {
        let board = &self.board;
        GameSnapshot {
            phase: self.phase.clone(),
            current_player: self.current_player(),
            last_roll: self.last_roll,
            turn_number: self.turn_number,
            winner: self.winner(),
            hand_counts: PlayerMap::new(|p| board.hand_count(p)),
            completed_counts: PlayerMap::new(|p| board.completed_count(p)),
            occupancy: board.occupied_squares(),
            legal_moves: self.legal_moves().to_vec(),
            pieces: PlayerMap::new(|p| board.locations(p).to_vec()),
            dice: self.dice.state(),
            dimensions: board.path().dimensions(),
        }
    }

    // === Commands ===

    /// Throw the dice for the current player.
    ///
    /// With no legal move the turn passes straight to the opponent;
    /// otherwise the game waits for a move choice.
    #[instrument(skip(self), fields(player = %self.current_player()))]
    pub fn roll(&mut self) -> Result<RollResult, EngineError> {
        let player = self.expect_roll("roll")?;
        let roll = self.dice.roll();
        self.resolve_roll(player, roll);
        Ok(roll)
    }

    /// Like [`TurnController::roll`], with dice supplied by the caller.
    ///
    /// Used for physical dice and for replaying recorded games.
    #[instrument(skip(self), fields(player = %self.current_player()))]
    pub fn apply_roll(&mut self, roll: RollResult) -> Result<(), EngineError> {
        let player = self.expect_roll("apply a roll")?;
        self.resolve_roll(player, roll);
        Ok(())
    }

    /// Play one of the offered moves.
    ///
    /// The descriptor must equal one returned by [`TurnController::legal_moves`].
    /// On error the game is unchanged.
    #[instrument(skip(self, mv), fields(player = %self.current_player(), mv = %mv))]
    pub fn choose_move(&mut self, mv: &LegalMove) -> Result<MoveOutcome, EngineError> {
        let Phase::AwaitingMoveChoice {
            player,
            roll,
            legal_moves,
        } = &self.phase
        else {
            return Err(self.reject("choose a move"));
        };

        if !legal_moves.contains(mv) {
            warn!(%mv, "move not in the offered set");
            return Err(EngineError::illegal(*player, format!("{mv} was not offered")));
        }

        let (player, roll) = (*player, *roll);
        self.apply(player, roll, *mv)
    }

    /// Play the offered move at `index`.
    pub fn choose_move_index(&mut self, index: usize) -> Result<MoveOutcome, EngineError> {
        let Phase::AwaitingMoveChoice {
            player,
            legal_moves,
            ..
        } = &self.phase
        else {
            return Err(self.reject("choose a move"));
        };

        let mv = *legal_moves.get(index).ok_or_else(|| {
            EngineError::illegal(
                *player,
                format!("no move at index {index}; {} offered", legal_moves.len()),
            )
        })?;
        self.choose_move(&mv)
    }

    /// An independent copy for what-if exploration.
    ///
    /// The copy's dice are a fork, so rolling it neither mirrors nor
    /// disturbs this game's future rolls.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            config: self.config.clone(),
            board: self.board.clone(),
            dice: self.dice.fork(),
            resolver: self.resolver,
            phase: self.phase.clone(),
            last_roll: self.last_roll,
            turn_number: self.turn_number,
            history: self.history.clone(),
        }
    }

    // === Persistence and replay ===

    /// Continue a game from a snapshot taken with [`TurnController::current_state`].
    ///
    /// The board is rebuilt from piece locations and every other field is
    /// checked against it: the phase must agree with the completed counts,
    /// offered moves must be exactly what the rules derive, and the derived
    /// counts, occupancy, player and roll must match the snapshot. Any
    /// disagreement is `CorruptState`. History before the snapshot is not
    /// restored.
    pub fn restore(config: GameConfig, snapshot: &GameSnapshot) -> Result<Self, EngineError> {
        config.validate()?;

        let pieces_per_player = usize::from(config.pieces_per_player);
        for (player, locations) in snapshot.pieces.iter() {
            if locations.len() != pieces_per_player {
                return Err(EngineError::CorruptState(format!(
                    "snapshot has {} pieces for {player}, configuration expects {pieces_per_player}",
                    locations.len()
                )));
            }
        }

        let path = Arc::new(PathModel::new(&config.layout)?);
        let board = BoardState::from_locations(path, snapshot.pieces.clone())?;
        let resolver = MoveResolver::new();
        check_phase(&snapshot.phase, &board, resolver)?;
        check_last_roll(snapshot)?;

        let game = Self {
            config,
            board,
            dice: DiceEngine::from_state(&snapshot.dice),
            resolver,
            phase: snapshot.phase.clone(),
            last_roll: snapshot.last_roll,
            turn_number: snapshot.turn_number,
            history: Vector::new(),
        };

        if game.current_state() != *snapshot {
            return Err(EngineError::CorruptState(
                "snapshot fields disagree with its board and phase".to_string(),
            ));
        }

        Ok(game)
    }

    /// Re-play recorded turns on a fresh game, checking each one.
    ///
    /// Fails with `IllegalMove` at the first record whose player, pass, or
    /// move disagrees with what the rules allow.
    pub fn replay<'a>(
        config: GameConfig,
        records: impl IntoIterator<Item = &'a TurnRecord>,
    ) -> Result<Self, EngineError> {
        let mut game = Self::new(config)?;

        for record in records {
            let expected = game.current_player();
            if record.player != expected {
                return Err(EngineError::illegal(
                    record.player,
                    format!("turn {} belongs to {expected}", record.turn),
                ));
            }

            game.apply_roll(record.roll)?;

            match &record.action {
                TurnAction::Pass => {
                    if !game.legal_moves().is_empty() {
                        return Err(EngineError::illegal(
                            record.player,
                            format!("turn {} passed with moves available", record.turn),
                        ));
                    }
                }
                TurnAction::Move(mv) => {
                    game.choose_move(mv)?;
                }
            }
        }

        Ok(game)
    }

    // === Internals ===

    fn expect_roll(&self, command: &'static str) -> Result<Player, EngineError> {
        match self.phase {
            Phase::AwaitingRoll { player } => Ok(player),
            _ => Err(self.reject(command)),
        }
    }

    fn reject(&self, command: &'static str) -> EngineError {
        let phase = self.phase.kind();
        warn!(command, %phase, "command rejected");
        EngineError::InvalidState { command, phase }
    }

    fn resolve_roll(&mut self, player: Player, roll: RollResult) {
        self.last_roll = Some(roll);
        let legal_moves = self.resolver.legal_moves(player, roll.total(), &self.board);

        if legal_moves.is_empty() {
            debug!(%roll, "no legal moves, turn passes");
            self.finish_turn(player, roll, TurnAction::Pass);
            self.phase = Phase::AwaitingRoll {
                player: player.other(),
            };
        } else {
            debug!(%roll, offered = legal_moves.len(), "awaiting move choice");
            self.phase = Phase::AwaitingMoveChoice {
                player,
                roll,
                legal_moves,
            };
        }
    }

    fn apply(&mut self, player: Player, roll: RollResult, mv: LegalMove) -> Result<MoveOutcome, EngineError> {
        // Work on a copy so capture and placement land together or not at all.
        let mut board = self.board.clone();

        let captured = if mv.is_capture {
            let coordinate = board.path().coordinate_for(player, mv.target)?;
            board.capture(player, coordinate)?
        } else {
            None
        };
        let placement = board.apply_move(player, mv.piece, mv.target)?;
        debug_assert!(board.check_invariants().is_ok());

        self.board = board;

        if let Some(victim) = captured {
            debug!(victim = %victim.player, piece = victim.piece.0, "capture");
        }

        let won = mv.is_completion
            && self.board.completed_count(player) == usize::from(self.config.pieces_per_player);
        let bonus_turn = !won && mv.lands_on_rosette;

        self.finish_turn(player, roll, TurnAction::Move(mv));

        self.phase = if won {
            info!(%player, turns = self.turn_number, "game over");
            Phase::GameOver { winner: player }
        } else if bonus_turn {
            debug!("rosette, roll again");
            Phase::AwaitingRoll { player }
        } else {
            Phase::AwaitingRoll {
                player: player.other(),
            }
        };

        Ok(MoveOutcome {
            player,
            applied: mv,
            piece: placement.piece,
            captured,
            bonus_turn,
            winner: won.then_some(player),
        })
    }

    fn finish_turn(&mut self, player: Player, roll: RollResult, action: TurnAction) {
        self.turn_number += 1;
        self.history
            .push_back(TurnRecord::new(self.turn_number, player, roll, action));
    }
}

/// The phase must be reachable from the board: a finished game has exactly
/// one player with every piece home, an unfinished one has none.
fn check_phase(phase: &Phase, board: &BoardState, resolver: MoveResolver) -> Result<(), EngineError> {
    let all_home = |player| board.completed_count(player) == board.pieces_per_player();
    let finished: Vec<Player> = Player::all().filter(|&p| all_home(p)).collect();

    match phase {
        Phase::GameOver { winner } => {
            if finished != [*winner] {
                return Err(EngineError::CorruptState(format!(
                    "game over with {winner} as winner, but {} of {} pieces are home",
                    board.completed_count(*winner),
                    board.pieces_per_player()
                )));
            }
        }
        Phase::AwaitingRoll { .. } | Phase::AwaitingMoveChoice { .. } => {
            if let Some(player) = finished.first() {
                return Err(EngineError::CorruptState(format!(
                    "{player} has every piece home but the game is still running"
                )));
            }
        }
    }

    if let Phase::AwaitingMoveChoice {
        player,
        roll,
        legal_moves,
    } = phase
    {
        if legal_moves.is_empty() || resolver.legal_moves(*player, roll.total(), board) != *legal_moves {
            return Err(EngineError::CorruptState(
                "offered moves do not match the board".to_string(),
            ));
        }
    }

    Ok(())
}

/// `last_roll` is the pending roll while a choice is open, absent only
/// before the first roll, and present otherwise.
fn check_last_roll(snapshot: &GameSnapshot) -> Result<(), EngineError> {
    let consistent = match &snapshot.phase {
        Phase::AwaitingMoveChoice { roll, .. } => snapshot.last_roll == Some(*roll),
        Phase::AwaitingRoll { .. } if snapshot.turn_number == 0 => snapshot.last_roll.is_none(),
        _ => snapshot.last_roll.is_some(),
    };

    if consistent {
        Ok(())
    } else {
        Err(EngineError::CorruptState(format!(
            "last roll {:?} does not fit phase {} at turn {}",
            snapshot.last_roll,
            snapshot.phase.kind(),
            snapshot.turn_number
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceRef;
    use crate::core::PhaseKind;

    fn game() -> TurnController {
        TurnController::new(GameConfig::default()).unwrap()
    }

    fn roll(total: u8) -> RollResult {
        RollResult::from_total(total).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let game = game();
        assert_eq!(game.phase(), &Phase::AwaitingRoll { player: Player::One });
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.last_roll(), None);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_starting_player_configurable() {
        let game = TurnController::new(GameConfig::new().with_starting_player(Player::Two)).unwrap();
        assert_eq!(game.current_player(), Player::Two);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = TurnController::new(GameConfig::new().with_pieces_per_player(0));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_roll_offers_moves() {
        let mut game = game();
        game.apply_roll(roll(2)).unwrap();

        assert_eq!(game.phase().kind(), PhaseKind::AwaitingMoveChoice);
        assert_eq!(game.legal_moves().len(), 1);
        assert_eq!(game.legal_moves()[0].target, 1);
        assert_eq!(game.last_roll(), Some(roll(2)));
    }

    #[test]
    fn test_zero_roll_passes() {
        let mut game = game();
        game.apply_roll(roll(0)).unwrap();

        assert_eq!(game.phase(), &Phase::AwaitingRoll { player: Player::Two });
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.history()[0].action, TurnAction::Pass);
    }

    #[test]
    fn test_cannot_roll_twice() {
        let mut game = game();
        game.apply_roll(roll(1)).unwrap();
        let err = game.roll().unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidState {
                command: "roll",
                phase: PhaseKind::AwaitingMoveChoice
            }
        );
    }

    #[test]
    fn test_cannot_move_before_rolling() {
        let mut game = game();
        let mv = LegalMove {
            piece: PieceRef::Hand,
            from: None,
            target: 0,
            is_capture: false,
            is_completion: false,
            lands_on_rosette: false,
        };
        assert!(matches!(
            game.choose_move(&mv),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_illegal_move_leaves_state() {
        let mut game = game();
        game.apply_roll(roll(2)).unwrap();
        let before = game.current_state();

        let mut bogus = game.legal_moves()[0];
        bogus.target = 5;
        assert!(matches!(
            game.choose_move(&bogus),
            Err(EngineError::IllegalMove { .. })
        ));
        assert!(matches!(
            game.choose_move_index(3),
            Err(EngineError::IllegalMove { .. })
        ));
        assert_eq!(game.current_state(), before);
    }

    #[test]
    fn test_plain_move_passes_turn() {
        let mut game = game();
        game.apply_roll(roll(2)).unwrap();
        let outcome = game.choose_move_index(0).unwrap();

        assert_eq!(outcome.piece, PieceId::new(1));
        assert!(!outcome.bonus_turn);
        assert_eq!(game.phase(), &Phase::AwaitingRoll { player: Player::Two });
        assert_eq!(game.board().hand_count(Player::One), 6);
    }

    #[test]
    fn test_rosette_grants_bonus_turn() {
        let mut game = game();
        game.apply_roll(roll(4)).unwrap();
        let outcome = game.choose_move_index(0).unwrap();

        assert!(outcome.bonus_turn);
        assert_eq!(game.phase(), &Phase::AwaitingRoll { player: Player::One });
    }

    #[test]
    fn test_fork_is_independent() {
        let mut game = game();
        let mut fork = game.fork();
        fork.apply_roll(roll(3)).unwrap();
        fork.choose_move_index(0).unwrap();

        assert_eq!(game.board().hand_count(Player::One), 7);
        assert_eq!(fork.board().hand_count(Player::One), 6);
    }

    #[test]
    fn test_controller_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TurnController>();
    }
}
