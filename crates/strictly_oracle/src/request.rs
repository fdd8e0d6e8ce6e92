//! What a decision source is asked.

use serde::{Deserialize, Serialize};
use strictly_board::{Board, Player, TacticalHints};

/// Serializable view of the board for the side to move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// Side the decision source plays.
    pub side: Player,
    /// Per-cell symbols: `X`, `O`, or the cell's index when empty.
    pub cells: [char; 9],
    /// Indices of the empty cells.
    pub available: Vec<usize>,
    /// Grid rendering of `cells`.
    pub text: String,
}

impl BoardView {
    /// Captures `board` as seen by `side`.
    pub fn new(board: &Board, side: Player) -> Self {
        Self {
            side,
            cells: board.symbols(),
            available: board.empty_indices(),
            text: board.display(),
        }
    }
}

/// One outstanding query to a decision source.
///
/// Carries the session it was issued for so a late answer can be
/// recognised as stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Coordinator-local request number.
    pub request_id: u64,
    /// Engine session the request belongs to.
    pub session_id: u64,
    /// Board at issue time.
    pub view: BoardView,
    /// Two-in-a-row summary for both sides.
    pub hints: TacticalHints,
}

impl MoveRequest {
    /// Builds a request for `side` from the current board.
    pub fn new(request_id: u64, session_id: u64, board: &Board, side: Player) -> Self {
        Self {
            request_id,
            session_id,
            view: BoardView::new(board, side),
            hints: TacticalHints::for_side(board, side),
        }
    }

    /// Side the request asks a move for.
    pub fn side(&self) -> Player {
        self.view.side
    }
}
