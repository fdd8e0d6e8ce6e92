//! Strictly Oracle - tic-tac-toe against an external move oracle.
//!
//! One side of a [`strictly_board::GameEngine`] is played by a
//! [`DecisionSource`]: an LLM, an HTTP endpoint, or a local policy. The
//! [`MoveCoordinator`] asks the source for a move whenever it is that
//! side's turn, keeps at most one request in flight, and falls back to a
//! local choice when the answer is late, malformed, or illegal.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_board::{GameEngine, GameEvent, Player};
//! use strictly_oracle::{ChannelSink, CoordinatorConfig, MoveCoordinator, SimpleDecisionSource};
//!
//! # async fn example() {
//! let engine = GameEngine::new().into_shared();
//! let (sink, events) = ChannelSink::<GameEvent>::channel();
//! engine.lock().unwrap().subscribe(sink);
//!
//! let coordinator = MoveCoordinator::new(
//!     Arc::clone(&engine),
//!     Arc::new(SimpleDecisionSource::default()),
//!     Player::O,
//!     CoordinatorConfig::default(),
//! );
//! tokio::spawn(coordinator.run(events));
//!
//! engine.lock().unwrap().submit_move(4, Player::X).unwrap();
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod coordinator;
mod llm_client;
mod request;
mod sink;
mod source;

pub use config::{ConfigError, HttpSection, LlmSection, OracleConfig, SourceKind};
pub use coordinator::{
    CoordinatorConfig, CoordinatorEvent, DecisionFailure, Fallback, FallbackPolicy,
    InvalidDecision, MoveCoordinator, Phase, Resolution, StaleReason, Trigger,
};
pub use llm_client::{ChatTurn, LlmClient, LlmError, LlmProvider};
pub use request::{BoardView, MoveRequest};
pub use sink::ChannelSink;
pub use source::{
    DecisionError, DecisionSource, HttpDecisionSource, LlmDecisionSource, SimpleDecisionSource,
    parse_cell,
};
