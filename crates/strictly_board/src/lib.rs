//! Tic-tac-toe board, rules, and game engine.
//!
//! # Architecture
//!
//! - **Board**: the 9-cell grid ([`Board`], [`Square`], [`Player`])
//! - **Rules**: pure functions for win, draw, legality, and two-in-a-row scans
//! - **Engine**: [`GameEngine`], the only place a session is mutated
//! - **Events**: per-engine [`EventBus`] with pluggable [`EventSink`]s
//!
//! # Example
//!
//! ```
//! use strictly_board::{GameEngine, GameStatus, Player};
//!
//! let mut engine = GameEngine::new();
//! engine.submit_move(4, Player::X).unwrap();
//! assert_eq!(engine.current_turn(), Player::O);
//! assert_eq!(engine.status(), GameStatus::InProgress);
//! assert!(engine.submit_move(4, Player::O).is_err());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod events;
mod position;
pub mod rules;
mod session;
mod types;

pub use action::{IllegalMove, Move};
pub use engine::{GameEngine, SharedEngine};
pub use events::{EventBus, EventSink, GameEvent, SubscriptionId};
pub use position::Position;
pub use rules::{Line, TacticalHints, Threat};
pub use session::{GameSession, GameStatus};
pub use types::{Board, Player, Square};
