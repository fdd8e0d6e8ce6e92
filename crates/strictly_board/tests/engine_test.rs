//! Tests for the game engine state machine and its events.

use std::sync::{Arc, Mutex};
use strictly_board::{
    Board, GameEngine, GameEvent, GameStatus, IllegalMove, Move, Player, Square,
};

fn recording_engine() -> (GameEngine, Arc<Mutex<Vec<GameEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut engine = GameEngine::new();
    let log = Arc::clone(&events);
    engine.subscribe(Arc::new(move |e: &GameEvent| log.lock().unwrap().push(e.clone())));
    (engine, events)
}

fn play(engine: &mut GameEngine, moves: &[usize]) {
    for &index in moves {
        let player = engine.current_turn();
        engine.submit_move(index, player).expect("scripted move should be legal");
    }
}

#[test]
fn test_center_opening() {
    let (mut engine, events) = recording_engine();

    let status = engine.submit_move(4, Player::X).expect("Valid move");

    assert_eq!(status, GameStatus::InProgress);
    assert_eq!(engine.current_turn(), Player::O);
    assert_eq!(
        *events.lock().unwrap(),
        vec![GameEvent::MoveMade {
            index: 4,
            player: Player::X
        }]
    );
}

#[test]
fn test_top_row_win_reports_line_and_event_order() {
    let (mut engine, events) = recording_engine();
    // X X _ / O O _ / _ _ _
    play(&mut engine, &[0, 3, 1, 4]);
    events.lock().unwrap().clear();

    let status = engine.submit_move(2, Player::X).unwrap();

    assert_eq!(
        status,
        GameStatus::Won {
            winner: Player::X,
            line: [0, 1, 2]
        }
    );
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            GameEvent::MoveMade {
                index: 2,
                player: Player::X
            },
            GameEvent::WinningLineFound { line: [0, 1, 2] },
            GameEvent::GameWon {
                winner: Player::X,
                line: [0, 1, 2]
            },
        ]
    );
}

#[test]
fn test_full_board_without_line_is_draw() {
    let (mut engine, events) = recording_engine();
    // Final board: X O X / X O O / O X X
    play(&mut engine, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert_eq!(engine.status(), GameStatus::Draw);
    assert_eq!(events.lock().unwrap().last(), Some(&GameEvent::GameDraw));
}

#[test]
fn test_rejections_leave_state_unchanged() {
    let mut engine = GameEngine::new();
    engine.submit_move(4, Player::X).unwrap();
    let before = engine.session();

    assert_eq!(engine.submit_move(9, Player::O), Err(IllegalMove::OutOfBounds(9)));
    assert_eq!(engine.submit_move(4, Player::O), Err(IllegalMove::SquareOccupied(4)));
    assert_eq!(
        engine.submit_move(0, Player::X),
        Err(IllegalMove::WrongTurn {
            expected: Player::O,
            attempted: Player::X
        })
    );

    assert_eq!(engine.session(), before);
}

#[test]
fn test_no_moves_after_game_over() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[0, 3, 1, 4, 2]);
    let before = engine.session();

    assert_eq!(engine.submit_move(8, Player::O), Err(IllegalMove::GameOver));
    assert_eq!(engine.submit_move(8, Player::X), Err(IllegalMove::GameOver));
    assert_eq!(engine.session(), before);
}

#[test]
fn test_rejected_move_emits_nothing() {
    let (mut engine, events) = recording_engine();
    let _ = engine.submit_move(4, Player::O);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_new_game_resets_and_bumps_session() {
    let (mut engine, events) = recording_engine();
    play(&mut engine, &[0, 3, 1, 4, 2]);
    let old_id = engine.session_id();

    let new_id = engine.new_game();

    assert!(new_id > old_id);
    assert_eq!(engine.status(), GameStatus::InProgress);
    assert_eq!(engine.current_turn(), Player::X);
    assert_eq!(engine.board_snapshot(), Board::new());
    assert!(engine.history().is_empty());
    assert_eq!(
        events.lock().unwrap().last(),
        Some(&GameEvent::GameStarted { session_id: new_id })
    );
}

#[test]
fn test_snapshot_is_independent_copy() {
    let mut engine = GameEngine::new();
    let snapshot = engine.board_snapshot();
    engine.submit_move(0, Player::X).unwrap();

    assert_eq!(snapshot.get(0), Some(Square::Empty));
    assert_eq!(engine.board_snapshot().get(0), Some(Square::Occupied(Player::X)));
}

#[test]
fn test_history_records_moves_in_order() {
    let mut engine = GameEngine::new();
    play(&mut engine, &[4, 0, 8]);
    assert_eq!(
        engine.history(),
        vec![
            Move::new(Player::X, 4),
            Move::new(Player::O, 0),
            Move::new(Player::X, 8)
        ]
    );
}

#[test]
fn test_unsubscribed_sink_receives_nothing() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut engine = GameEngine::new();
    let log = Arc::clone(&events);
    let id = engine.subscribe(Arc::new(move |e: &GameEvent| log.lock().unwrap().push(e.clone())));

    assert!(engine.unsubscribe(id));
    engine.submit_move(4, Player::X).unwrap();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_engines_do_not_share_subscribers() {
    let (mut first, first_events) = recording_engine();
    let mut second = GameEngine::new();

    second.submit_move(4, Player::X).unwrap();
    assert!(first_events.lock().unwrap().is_empty());

    first.submit_move(0, Player::X).unwrap();
    assert_eq!(first_events.lock().unwrap().len(), 1);
}
