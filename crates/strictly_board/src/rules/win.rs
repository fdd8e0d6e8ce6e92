//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Square};
use tracing::instrument;

/// Three board indices forming a row, column, or diagonal.
pub type Line = [usize; 3];

/// The 8 canonical lines, in scan order: rows, columns, diagonals.
pub const LINES: [Line; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks if there is a winner on the board.
///
/// Returns the player and the first completed line in [`LINES`] order,
/// so the reported line is deterministic even when two lines complete at once.
#[instrument(skip(board))]
pub fn check_win(board: &Board) -> Option<(Player, Line)> {
    LINES.into_iter().find_map(|line| {
        let [a, b, c] = line;
        match board.get(a)? {
            Square::Occupied(player)
                if board.get(b) == Some(Square::Occupied(player))
                    && board.get(c) == Some(Square::Occupied(player)) =>
            {
                Some((player, line))
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(marks: &[(usize, Player)]) -> Board {
        let mut board = Board::new();
        for &(i, p) in marks {
            board.set(i, Square::Occupied(p));
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_win(&Board::new()), None);
    }

    #[test]
    fn test_every_canonical_line_is_detected() {
        for line in LINES {
            for player in [Player::X, Player::O] {
                let board = board_with(&line.map(|i| (i, player)));
                assert_eq!(check_win(&board), Some((player, line)), "line {line:?}");
            }
        }
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(&[(0, Player::X), (1, Player::X), (2, Player::O)]);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_first_line_in_scan_order_wins_tie() {
        // Top row and left column both complete; the row is scanned first.
        let board = board_with(&[
            (0, Player::X),
            (1, Player::X),
            (2, Player::X),
            (3, Player::X),
            (6, Player::X),
        ]);
        assert_eq!(check_win(&board), Some((Player::X, [0, 1, 2])));
    }
}
