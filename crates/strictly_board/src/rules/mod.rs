//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating board state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage so the engine and the move coordinator share one line scan.

pub mod draw;
pub mod legal;
pub mod threats;
pub mod win;

pub use draw::{check_draw, is_full};
pub use legal::is_legal;
pub use threats::{TacticalHints, Threat, find_threats};
pub use win::{LINES, Line, check_win};
