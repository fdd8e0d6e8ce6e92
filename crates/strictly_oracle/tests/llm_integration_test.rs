//! Integration tests against live LLM providers. Run with `--features api`.

use strictly_board::{Board, Player};
use strictly_oracle::{
    DecisionSource, LlmClient, LlmDecisionSource, LlmProvider, MoveRequest,
};
use tracing::instrument;

fn source(provider: LlmProvider, var: &str, model: &str) -> LlmDecisionSource {
    dotenvy::dotenv().ok();
    let api_key = std::env::var(var).unwrap_or_else(|_| panic!("{} not set", var));
    LlmDecisionSource::new("Oracle", LlmClient::new(provider, api_key, model))
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_answers_with_a_number() {
    let source = source(LlmProvider::Anthropic, "ANTHROPIC_API_KEY", "claude-3-5-haiku-latest");
    let request = MoveRequest::new(1, 1, &Board::new(), Player::O);

    let cell = source.request_move(&request).await.expect("Failed to get a move");

    eprintln!("Anthropic chose: {}", cell);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_answers_with_a_number() {
    let source = source(LlmProvider::OpenAI, "OPENAI_API_KEY", "gpt-4o-mini");
    let request = MoveRequest::new(1, 1, &Board::new(), Player::O);

    let cell = source.request_move(&request).await.expect("Failed to get a move");

    eprintln!("OpenAI chose: {}", cell);
}
