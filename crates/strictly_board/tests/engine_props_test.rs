//! Property tests for turn alternation and mark counts.

use proptest::prelude::*;
use strictly_board::{GameEngine, GameStatus, Player};

proptest! {
    #[test]
    fn turns_alternate_and_counts_stay_balanced(attempts in prop::collection::vec(0usize..12, 0..40)) {
        let mut engine = GameEngine::new();

        for index in attempts {
            let before = engine.session();
            let mover = engine.current_turn();

            match engine.submit_move(index, mover) {
                Ok(status) => {
                    if status == GameStatus::InProgress {
                        prop_assert_eq!(engine.current_turn(), mover.opponent());
                    } else {
                        prop_assert!(engine.is_over());
                    }
                }
                Err(_) => prop_assert_eq!(engine.session(), before),
            }

            let board = engine.board_snapshot();
            let x = board.count(Player::X);
            let o = board.count(Player::O);
            prop_assert!(x == o || x == o + 1, "x={} o={}", x, o);
        }
    }

    #[test]
    fn wrong_side_is_always_rejected(index in 0usize..9) {
        let mut engine = GameEngine::new();
        let before = engine.session();
        prop_assert!(engine.submit_move(index, Player::O).is_err());
        prop_assert_eq!(engine.session(), before);
    }
}
