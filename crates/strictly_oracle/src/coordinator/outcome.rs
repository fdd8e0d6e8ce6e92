//! How a decision request ended, and the events that report it.

use crate::source::DecisionError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strictly_board::IllegalMove;

/// An answer that parsed but cannot be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum InvalidDecision {
    /// Not a cell index 0-8.
    #[display("{} is not a cell index (0-8)", _0)]
    OutOfRange(i64),
    /// The cell is already taken.
    #[display("cell {} is already occupied", _0)]
    Occupied(usize),
}

/// Why the decision source's answer was not used. Always recovered by fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum DecisionFailure {
    /// Request could not be completed.
    #[display("transport failure: {}", _0)]
    Transport(String),
    /// No answer in time. Handled exactly like a parse failure.
    #[display("timed out after {:?}", _0)]
    Timeout(Duration),
    /// Answer held no number.
    #[display("parse failure: {}", _0)]
    Parse(String),
    /// Answer named an unplayable cell.
    #[display("invalid move: {}", _0)]
    InvalidMove(InvalidDecision),
}

impl DecisionFailure {
    /// Maps a source error; `None` for cancellation, which is not a failure.
    pub(crate) fn from_source(err: DecisionError) -> Option<Self> {
        match err {
            DecisionError::Transport(msg) => Some(Self::Transport(msg)),
            DecisionError::Timeout(after) => Some(Self::Timeout(after)),
            DecisionError::Parse(msg) => Some(Self::Parse(msg)),
            DecisionError::Cancelled => None,
        }
    }
}

/// Why a finished request submitted nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum StaleReason {
    /// The request was cancelled before it finished.
    #[display("request cancelled")]
    Cancelled,
    /// A new game started while the request was in flight.
    #[display("session changed from {} to {}", issued, current)]
    SessionChanged {
        /// Session the request was issued for.
        issued: u64,
        /// Session now in the engine.
        current: u64,
    },
    /// The game ended while the request was in flight.
    #[display("game is over")]
    GameOver,
    /// Someone else moved for the managed side.
    #[display("not the managed side's turn")]
    NotManagedTurn,
}

/// Final result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The source's cell was valid and submitted.
    Accepted {
        /// Cell played.
        index: usize,
    },
    /// The source's answer was unusable; the fallback cell was submitted.
    Fallback {
        /// Cell played.
        index: usize,
        /// What was wrong with the answer.
        reason: DecisionFailure,
    },
    /// Game state moved on; nothing was submitted.
    Stale(StaleReason),
    /// The engine refused the move. Unreachable while the staleness check holds.
    Rejected(IllegalMove),
}

impl Resolution {
    /// The cell that was submitted, if any.
    pub fn submitted(&self) -> Option<usize> {
        match self {
            Resolution::Accepted { index } | Resolution::Fallback { index, .. } => Some(*index),
            Resolution::Stale(_) | Resolution::Rejected(_) => None,
        }
    }
}

/// Events emitted by the coordinator, in transition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorEvent {
    /// A request was issued; the coordinator is awaiting a decision.
    ThinkingStarted {
        /// Request number.
        request_id: u64,
    },
    /// The source's cell was played.
    DecisionAccepted {
        /// Request number.
        request_id: u64,
        /// Cell played.
        index: usize,
    },
    /// The fallback cell was played instead of the source's answer.
    FallbackUsed {
        /// Request number.
        request_id: u64,
        /// Cell played.
        index: usize,
        /// What was wrong with the answer.
        reason: DecisionFailure,
    },
    /// The answer arrived for a game state that no longer exists.
    StaleDecisionDiscarded {
        /// Request number.
        request_id: u64,
        /// What changed.
        reason: StaleReason,
    },
    /// The coordinator is idle again.
    ThinkingFinished {
        /// Request number.
        request_id: u64,
    },
}
