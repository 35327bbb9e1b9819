//! History replay and snapshot persistence.

use royal_ur::board::PieceLocation;
use royal_ur::core::{EngineError, GameConfig, Player};
use royal_ur::dice::RollResult;
use royal_ur::playout::{FirstMoveChooser, Playout, RandomMoveChooser};
use royal_ur::turn::{GameSnapshot, Phase, TurnAction, TurnController, TurnRecord};

fn played_game(seed: u64) -> TurnController {
    let mut game = TurnController::new(GameConfig::new().with_seed(seed)).unwrap();
    let mut playout = Playout::new(
        Box::new(RandomMoveChooser::new(seed + 1)),
        Box::new(RandomMoveChooser::new(seed + 2)),
    );
    playout.run(&mut game).unwrap();
    game
}

#[test]
fn test_replay_reproduces_final_board() {
    let game = played_game(17);
    let config = game.config().clone();

    let replayed = TurnController::replay(config, game.history().iter()).unwrap();

    assert_eq!(replayed.phase(), game.phase());
    assert_eq!(replayed.winner(), game.winner());
    assert_eq!(replayed.turn_number(), game.turn_number());
    assert_eq!(replayed.history(), game.history());
    assert_eq!(
        replayed.board().occupied_squares(),
        game.board().occupied_squares()
    );
    for player in Player::all() {
        assert_eq!(replayed.board().locations(player), game.board().locations(player));
    }
}

#[test]
fn test_replay_of_partial_history() {
    let game = played_game(5);
    let prefix: Vec<_> = game.history().iter().take(20).copied().collect();

    let replayed = TurnController::replay(game.config().clone(), &prefix).unwrap();
    assert_eq!(replayed.turn_number(), 20);
    assert_eq!(replayed.phase().kind(), royal_ur::PhaseKind::AwaitingRoll);
}

#[test]
fn test_replay_rejects_wrong_player() {
    let game = played_game(8);
    let mut records: Vec<_> = game.history().iter().copied().collect();
    records[0].player = records[0].player.other();

    let err = TurnController::replay(game.config().clone(), &records).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));
}

#[test]
fn test_replay_rejects_unoffered_move() {
    let game = played_game(9);
    let mut records: Vec<_> = game.history().iter().copied().collect();

    let index = records
        .iter()
        .position(|r| matches!(r.action, TurnAction::Move(_)))
        .unwrap();
    if let TurnAction::Move(mv) = &mut records[index].action {
        mv.target += 1;
    }

    let err = TurnController::replay(game.config().clone(), &records).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));
}

#[test]
fn test_replay_rejects_pass_with_moves_available() {
    let pass = TurnRecord::new(
        1,
        Player::One,
        RollResult::from_total(2).unwrap(),
        TurnAction::Pass,
    );

    let err = TurnController::replay(GameConfig::default(), [&pass]).unwrap_err();
    assert!(matches!(err, EngineError::IllegalMove { .. }));
}

#[test]
fn test_restore_continues_with_same_dice() {
    let mut game = TurnController::new(GameConfig::new().with_seed(21)).unwrap();
    let mut playout =
        Playout::new(Box::new(FirstMoveChooser), Box::new(FirstMoveChooser)).with_max_turns(30);
    playout.run(&mut game).unwrap();

    let snapshot = game.current_state();
    let mut restored = TurnController::restore(game.config().clone(), &snapshot).unwrap();
    assert_eq!(restored.current_state(), snapshot);

    let mut playout =
        Playout::new(Box::new(FirstMoveChooser), Box::new(FirstMoveChooser)).with_max_turns(80);
    playout.run(&mut game).unwrap();
    playout.run(&mut restored).unwrap();

    assert_eq!(restored.current_state(), game.current_state());
}

#[test]
fn test_snapshot_json_round_trip_restores() {
    let mut game = TurnController::new(GameConfig::new().with_seed(4)).unwrap();
    while game.phase().kind() != royal_ur::PhaseKind::AwaitingMoveChoice {
        game.roll().unwrap();
    }

    let json = serde_json::to_string(&game.current_state()).unwrap();
    let snapshot: GameSnapshot = serde_json::from_str(&json).unwrap();
    let mut restored = TurnController::restore(game.config().clone(), &snapshot).unwrap();

    assert_eq!(restored.legal_moves(), game.legal_moves());
    restored.choose_move_index(0).unwrap();
    game.choose_move_index(0).unwrap();
    assert_eq!(restored.current_state(), game.current_state());
}

#[test]
fn test_restore_rejects_tampered_moves() {
    let mut game = TurnController::new(GameConfig::default()).unwrap();
    game.apply_roll(RollResult::from_total(3).unwrap()).unwrap();

    let mut snapshot = game.current_state();
    if let Phase::AwaitingMoveChoice { legal_moves, .. } = &mut snapshot.phase {
        legal_moves[0].target = 9;
    }

    let err = TurnController::restore(GameConfig::default(), &snapshot).unwrap_err();
    assert!(matches!(err, EngineError::CorruptState(_)));
}

#[test]
fn test_restore_rejects_piece_count_mismatch() {
    let game = TurnController::new(GameConfig::default()).unwrap();
    let snapshot = game.current_state();

    let err =
        TurnController::restore(GameConfig::new().with_pieces_per_player(5), &snapshot).unwrap_err();
    assert!(matches!(err, EngineError::CorruptState(_)));
}

fn roll(total: u8) -> RollResult {
    RollResult::from_total(total).unwrap()
}

fn assert_corrupt(config: GameConfig, snapshot: &GameSnapshot) {
    let result = TurnController::restore(config, snapshot);
    assert!(
        matches!(result, Err(EngineError::CorruptState(_))),
        "expected CorruptState, got {:?}",
        result.map(|g| g.current_state())
    );
}

/// A one-piece game Player 1 wins: 4, 4, 4, pass, 3 home.
fn finished_single_piece_game() -> TurnController {
    let mut game = TurnController::new(GameConfig::new().with_pieces_per_player(1)).unwrap();
    for (total, from) in [(4, None), (4, Some(3)), (4, Some(7))] {
        game.apply_roll(roll(total)).unwrap();
        let mv = *game.legal_moves().iter().find(|m| m.from == from).unwrap();
        game.choose_move(&mv).unwrap();
    }
    game.apply_roll(roll(0)).unwrap();
    game.apply_roll(roll(3)).unwrap();
    game.choose_move_index(0).unwrap();
    assert_eq!(game.winner(), Some(Player::One));
    game
}

#[test]
fn test_restore_finished_game() {
    let game = finished_single_piece_game();
    let snapshot = game.current_state();

    let mut restored = TurnController::restore(game.config().clone(), &snapshot).unwrap();
    assert_eq!(restored.winner(), Some(Player::One));
    assert!(matches!(restored.roll(), Err(EngineError::InvalidState { .. })));
}

#[test]
fn test_restore_rejects_game_over_without_pieces_home() {
    let game = TurnController::new(GameConfig::default()).unwrap();
    let mut snapshot = game.current_state();
    snapshot.phase = Phase::GameOver {
        winner: Player::Two,
    };
    snapshot.current_player = Player::Two;
    snapshot.winner = Some(Player::Two);
    snapshot.last_roll = Some(roll(2));
    snapshot.turn_number = 1;

    assert_corrupt(GameConfig::default(), &snapshot);
}

#[test]
fn test_restore_rejects_running_game_after_a_win() {
    let config = GameConfig::new().with_pieces_per_player(1);
    let game = TurnController::new(config.clone()).unwrap();
    let mut snapshot = game.current_state();
    snapshot.pieces[Player::One] = vec![PieceLocation::Completed];
    snapshot.hand_counts[Player::One] = 0;
    snapshot.completed_counts[Player::One] = 1;

    assert_corrupt(config, &snapshot);
}

#[test]
fn test_restore_rejects_both_players_home() {
    let game = finished_single_piece_game();
    let mut snapshot = game.current_state();
    snapshot.pieces[Player::Two] = vec![PieceLocation::Completed];
    snapshot.hand_counts[Player::Two] = 0;
    snapshot.completed_counts[Player::Two] = 1;

    assert_corrupt(game.config().clone(), &snapshot);
}

#[test]
fn test_restore_rejects_wrong_winner() {
    let game = finished_single_piece_game();
    let mut snapshot = game.current_state();
    snapshot.phase = Phase::GameOver {
        winner: Player::Two,
    };
    snapshot.current_player = Player::Two;
    snapshot.winner = Some(Player::Two);

    assert_corrupt(game.config().clone(), &snapshot);
}

#[test]
fn test_restore_rejects_inconsistent_fields() {
    let mut game = TurnController::new(GameConfig::default()).unwrap();
    game.apply_roll(roll(2)).unwrap();
    game.choose_move_index(0).unwrap();
    game.apply_roll(roll(1)).unwrap();
    let clean = game.current_state();
    TurnController::restore(GameConfig::default(), &clean).unwrap();

    let tamperings: Vec<fn(&mut GameSnapshot)> = vec![
        |s| s.hand_counts[Player::One] = 0,
        |s| s.completed_counts[Player::Two] = 3,
        |s| s.current_player = Player::One,
        |s| s.winner = Some(Player::Two),
        |s| s.last_roll = None,
        |s| s.last_roll = Some(RollResult::from_total(4).unwrap()),
        |s| s.legal_moves.clear(),
        |s| s.occupancy.clear(),
        |s| s.dimensions = (3, 9),
    ];

    for tamper in tamperings {
        let mut snapshot = clean.clone();
        tamper(&mut snapshot);
        assert_corrupt(GameConfig::default(), &snapshot);
    }
}

#[test]
fn test_restore_rejects_missing_roll_after_first_turn() {
    let mut game = TurnController::new(GameConfig::default()).unwrap();
    game.apply_roll(roll(0)).unwrap();
    let mut snapshot = game.current_state();
    snapshot.last_roll = None;

    assert_corrupt(GameConfig::default(), &snapshot);
}

#[test]
fn test_restore_rejects_oversized_piece_list_without_panicking() {
    let game = TurnController::new(GameConfig::default()).unwrap();
    let mut snapshot = game.current_state();
    let mut pieces = vec![PieceLocation::InHand; 256];
    pieces[255] = PieceLocation::OnTrack(2);
    snapshot.pieces[Player::One] = pieces.clone();
    snapshot.pieces[Player::Two] = pieces;

    assert_corrupt(GameConfig::default(), &snapshot);
}
