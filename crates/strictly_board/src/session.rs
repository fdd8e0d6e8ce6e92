//! Game session state.

use crate::action::Move;
use crate::rules::Line;
use crate::{Board, Player, Square};
use serde::{Deserialize, Serialize};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won {
        /// The winning player.
        winner: Player,
        /// Indices of the completed line.
        line: Line,
    },
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// True for `Won` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The winner, if the game was won.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

/// Complete state of one game, from the first move to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    id: u64,
    board: Board,
    turn: Player,
    status: GameStatus,
    history: Vec<Move>,
}

impl GameSession {
    /// Creates an empty session with X to move.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            board: Board::new(),
            turn: Player::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Session id assigned by the engine.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose turn it is. After the game ends this is the last mover.
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Returns the game status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Accepted moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Places a mark. Unchecked; the engine validates first.
    pub(crate) fn place(&mut self, index: usize, player: Player) {
        self.board.set(index, Square::Occupied(player));
        self.history.push(Move::new(player, index));
    }

    pub(crate) fn pass_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    pub(crate) fn finish(&mut self, status: GameStatus) {
        self.status = status;
    }
}
