//! First-class action types for tic-tac-toe.
//!
//! Moves are domain events, not side effects. They record who placed
//! which mark and are kept in the session history in order.

use crate::Player;
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a player placing their mark at a board index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// The board index (0-8) where the mark was placed.
    pub index: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, index: usize) -> Self {
        Self { player, index }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.index)
    }
}

/// Reason a submitted move was rejected.
///
/// Rejection never changes engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum IllegalMove {
    /// The game has already been won or drawn.
    #[display("Game is already over")]
    GameOver,

    /// The index is not on the board.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(#[error(not(source))] usize),

    /// The square at the index is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(#[error(not(source))] usize),

    /// It's not this player's turn.
    #[display("It's not {}'s turn (current turn: {})", attempted, expected)]
    WrongTurn {
        /// Player whose turn it is.
        expected: Player,
        /// Player that attempted the move.
        attempted: Player,
    },
}
