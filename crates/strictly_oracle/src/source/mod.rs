//! Decision sources: whoever proposes the managed side's moves.
//!
//! A source is an opaque, possibly slow, possibly wrong oracle. It only
//! proposes a cell; the coordinator validates the answer and falls back
//! locally when it is unusable.

mod http;
mod llm;
mod simple;

pub use http::HttpDecisionSource;
pub use llm::{LlmDecisionSource, parse_cell};
pub use simple::SimpleDecisionSource;

use crate::request::MoveRequest;
use std::time::Duration;

/// Why a source produced no usable number.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DecisionError {
    /// The request never got a well-formed response.
    #[display("Transport failure: {}", _0)]
    Transport(#[error(not(source))] String),

    /// No response within the allotted time.
    #[display("No decision within {:?}", _0)]
    Timeout(#[error(not(source))] Duration),

    /// A response arrived but held no cell number.
    #[display("Unparseable decision: {}", _0)]
    Parse(#[error(not(source))] String),

    /// The request was withdrawn before an answer arrived.
    #[display("Request cancelled")]
    Cancelled,
}

/// External oracle that proposes a move.
///
/// The returned number is unvalidated: it may be out of range or point
/// at an occupied cell.
#[async_trait::async_trait]
pub trait DecisionSource: Send + Sync {
    /// Asks for a cell index for `request.side()`.
    async fn request_move(&self, request: &MoveRequest) -> Result<i64, DecisionError>;

    /// Returns the source's display name.
    fn name(&self) -> &str;
}
