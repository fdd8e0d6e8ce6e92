//! Decision source backed by a chat-completion LLM.

use super::{DecisionError, DecisionSource};
use crate::llm_client::{ChatTurn, LlmClient, LlmError};
use crate::request::MoveRequest;
use tracing::{debug, info, instrument};

const SYSTEM_PROMPT: &str = "You are an expert tic-tac-toe player. \
Always respond with only a single digit (0-8) representing your move choice.";

/// Default reply budget; a cell index needs one or two tokens.
const REPLY_TOKENS: u32 = 5;
const TEMPERATURE: f32 = 0.3;

/// Asks an LLM for the managed side's move.
#[derive(Debug)]
pub struct LlmDecisionSource {
    name: String,
    client: LlmClient,
    max_tokens: u32,
    temperature: f32,
}

impl LlmDecisionSource {
    /// Creates a source around an initialised client.
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        let name = name.into();
        info!(
            source = %name,
            provider = %client.provider(),
            model = %client.model(),
            "Creating LLM decision source"
        );
        Self {
            name,
            client,
            max_tokens: REPLY_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Overrides the reply budget and sampling temperature.
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens.max(1);
        self.temperature = temperature;
        self
    }

    /// Builds the user prompt for `request`.
    pub fn prompt(request: &MoveRequest) -> String {
        let side = request.side();
        let available = request
            .view
            .available
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let mut prompt = format!(
            "You are playing tic-tac-toe as {side} against {opponent}.\n\n\
             Current board (empty cells show their number):\n{board}\n\n\
             Available positions: {available}\n",
            opponent = side.opponent(),
            board = request.view.text,
        );
        if !request.hints.is_empty() {
            prompt.push_str("\nTactical notes:\n");
            prompt.push_str(&request.hints.describe());
            prompt.push('\n');
        }
        prompt.push_str(
            "\nRespond with ONLY the number (0-8) of the position where you want \
             to place your mark. Do not include any explanation.",
        );
        prompt
    }
}

#[async_trait::async_trait]
impl DecisionSource for LlmDecisionSource {
    #[instrument(skip(self, request), fields(source = %self.name, request_id = request.request_id))]
    async fn request_move(&self, request: &MoveRequest) -> Result<i64, DecisionError> {
        let user = Self::prompt(request);
        let turn = ChatTurn {
            system: SYSTEM_PROMPT,
            user: &user,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let reply = self.client.chat(turn).await.map_err(decision_error)?;

        debug!(reply = %reply, "LLM replied");
        parse_cell(&reply)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A blank reply is a parse failure; everything else never reached a reply.
fn decision_error(err: LlmError) -> DecisionError {
    match err {
        LlmError::EmptyReply(_) => DecisionError::Parse(err.to_string()),
        other => DecisionError::Transport(other.to_string()),
    }
}

/// Extracts the first integer from free-form model output.
///
/// Range and occupancy are not checked here.
pub fn parse_cell(reply: &str) -> Result<i64, DecisionError> {
    let bytes = reply.as_bytes();
    let start = bytes
        .iter()
        .position(u8::is_ascii_digit)
        .ok_or_else(|| DecisionError::Parse(format!("No number in reply: {:?}", reply)))?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| start + n);
    let negative = start > 0 && bytes[start - 1] == b'-';

    let value: i64 = reply[start..end]
        .parse()
        .map_err(|e| DecisionError::Parse(format!("Bad number in reply {:?}: {}", reply, e)))?;
    Ok(if negative { -value } else { value })
}
