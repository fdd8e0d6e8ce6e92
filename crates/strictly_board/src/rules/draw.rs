//! Draw detection logic for tic-tac-toe.

use super::win::check_win;
use crate::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn check_draw(board: &Board) -> bool {
    is_full(board) && check_win(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn board_from(marks: [Player; 9]) -> Board {
        Board::from_squares(marks.map(Square::Occupied))
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
        assert!(!check_draw(&Board::new()));
    }

    #[test]
    fn test_draw_detection() {
        use Player::{O, X};
        // X O X / O X X / O X O
        let board = board_from([X, O, X, O, X, X, O, X, O]);
        assert!(is_full(&board));
        assert!(check_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        use Player::{O, X};
        // X X X / O O X / X O O
        let board = board_from([X, X, X, O, O, X, X, O, O]);
        assert!(is_full(&board));
        assert!(!check_draw(&board));
    }
}
