//! Two-in-a-row detection, used to prime external move sources.
//!
//! The scan mirrors [`check_win`](super::check_win) but matches the
//! 2-of-3 pattern: two cells owned by one player and the third empty.

use super::win::{LINES, Line};
use crate::{Board, Player, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A line one move away from completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    /// The line under threat.
    pub line: Line,
    /// The empty cell that completes it.
    pub cell: usize,
}

/// Finds every line where `player` holds two cells and the third is empty.
#[instrument(skip(board))]
pub fn find_threats(board: &Board, player: Player) -> Vec<Threat> {
    LINES
        .into_iter()
        .filter_map(|line| {
            let mut owned = 0;
            let mut empty = None;
            for i in line {
                match board.get(i)? {
                    Square::Occupied(p) if p == player => owned += 1,
                    Square::Empty => empty = Some(i),
                    Square::Occupied(_) => return None,
                }
            }
            match (owned, empty) {
                (2, Some(cell)) => Some(Threat { line, cell }),
                _ => None,
            }
        })
        .collect()
}

/// Advisory tactical summary for the side about to move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalHints {
    /// Lines the side to move can complete right now.
    pub winning: Vec<Threat>,
    /// Lines the opponent would complete next turn unless blocked.
    pub blocking: Vec<Threat>,
}

impl TacticalHints {
    /// Computes hints for `side` on `board`.
    #[instrument(skip(board))]
    pub fn for_side(board: &Board, side: Player) -> Self {
        Self {
            winning: find_threats(board, side),
            blocking: find_threats(board, side.opponent()),
        }
    }

    /// True when neither side has a two-in-a-row.
    pub fn is_empty(&self) -> bool {
        self.winning.is_empty() && self.blocking.is_empty()
    }

    /// Renders the hints as short advisory sentences.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        for t in &self.winning {
            lines.push(format!(
                "You can win on line {:?} by playing {}.",
                t.line, t.cell
            ));
        }
        for t in &self.blocking {
            lines.push(format!(
                "Opponent threatens line {:?}; block by playing {}.",
                t.line, t.cell
            ));
        }
        lines.join("\n")
    }
}
