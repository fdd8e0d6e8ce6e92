//! Move legality.

use crate::Board;

/// A move is legal when the index is on the board and the cell is empty.
pub fn is_legal(board: &Board, index: usize) -> bool {
    index < Board::CELLS && board.is_empty(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Square};

    #[test]
    fn test_legality() {
        let mut board = Board::new();
        board.set(4, Square::Occupied(Player::O));
        assert!(is_legal(&board, 0));
        assert!(!is_legal(&board, 4));
        assert!(!is_legal(&board, 9));
        assert!(!is_legal(&board, usize::MAX));
    }
}
