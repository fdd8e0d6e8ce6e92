//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Symbol used when rendering the board.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Squares are stored row-major, so index = row * 3 + col.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Board {
    squares: [Square; 9],
}

impl Board {
    /// Number of cells on the board.
    pub const CELLS: usize = 9;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from raw squares.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Sets the square at the given index.
    ///
    /// Out-of-range indices are ignored; callers validate through the rules first.
    pub(crate) fn set(&mut self, index: usize, square: Square) {
        if let Some(slot) = self.squares.get_mut(index) {
            *slot = square;
        }
    }

    /// Checks if a square is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Indices of every empty square, ascending.
    pub fn empty_indices(&self) -> Vec<usize> {
        (0..Self::CELLS).filter(|&i| self.is_empty(i)).collect()
    }

    /// Counts the marks placed by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }

    /// Per-cell symbols: `X`, `O`, or the cell index for empty cells.
    pub fn symbols(&self) -> [char; 9] {
        let mut out = ['0'; 9];
        for ((cell, square), digit) in out.iter_mut().zip(&self.squares).zip(b'0'..) {
            *cell = match square {
                Square::Occupied(player) => player.symbol(),
                Square::Empty => char::from(digit),
            };
        }
        out
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their index so the text doubles as a move legend.
    pub fn display(&self) -> String {
        let symbols = self.symbols();
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                result.push(symbols[row * 3 + col]);
                if col < 2 {
                    result.push_str(" | ");
                }
            }
            if row < 2 {
                result.push_str("\n--+---+--\n");
            }
        }
        result
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_indices(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.count(Player::X), 0);
    }

    #[test]
    fn test_out_of_range_is_not_empty() {
        let board = Board::new();
        assert!(!board.is_empty(9));
        assert_eq!(board.get(42), None);
    }

    #[test]
    fn test_display_shows_indices_for_empty_cells() {
        let mut board = Board::new();
        board.set(4, Square::Occupied(Player::X));
        let text = board.display();
        assert!(text.starts_with("0 | 1 | 2"));
        assert!(text.contains("3 | X | 5"));
    }

    #[test]
    fn test_symbols_mark_players_and_number_empty_cells() {
        let mut board = Board::new();
        board.set(0, Square::Occupied(Player::O));
        board.set(8, Square::Occupied(Player::X));
        assert_eq!(
            board.symbols(),
            ['O', '1', '2', '3', '4', '5', '6', '7', 'X']
        );
    }
}
