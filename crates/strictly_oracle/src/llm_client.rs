//! Chat-completion transport used by the LLM decision source.
//!
//! One client talks to one provider and one model. The provider backend
//! (an async-openai client, or a reqwest client plus key for Anthropic)
//! is built once and reused for every move request. Sampling settings
//! travel with each [`ChatTurn`], so the caller decides how long and how
//! varied a reply may be.

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI chat completions.
    #[display("openai")]
    OpenAI,
    /// Anthropic messages.
    #[display("anthropic")]
    Anthropic,
}

/// One system-plus-user exchange and the limits on its reply.
#[derive(Debug, Clone, Copy)]
pub struct ChatTurn<'a> {
    /// Standing instructions.
    pub system: &'a str,
    /// The question for this turn.
    pub user: &'a str,
    /// Upper bound on reply length.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Why a chat turn produced no text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LlmError {
    /// The request could not be assembled.
    #[display("Could not build {} request: {}", provider, reason)]
    Build {
        /// Provider the request was for.
        provider: LlmProvider,
        /// Builder message.
        reason: String,
    },

    /// The request did not complete.
    #[display("{} request failed: {}", provider, reason)]
    Request {
        /// Provider the request was for.
        provider: LlmProvider,
        /// Transport or API message.
        reason: String,
    },

    /// The provider answered with a non-success status.
    #[display("{} returned HTTP {}: {}", provider, status, body)]
    Status {
        /// Provider the request was for.
        provider: LlmProvider,
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The reply carried no text.
    #[display("{} reply had no text", _0)]
    EmptyReply(#[error(not(source))] LlmProvider),
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicReply {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
enum Backend {
    OpenAI(OpenAIClient<OpenAIConfig>),
    Anthropic { http: reqwest::Client, api_key: String },
}

/// Chat client bound to one provider and model.
#[derive(Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    model: String,
    backend: Backend,
}

impl LlmClient {
    /// Creates a client; the key is kept only inside the provider backend.
    #[instrument(skip(api_key, model))]
    pub fn new(provider: LlmProvider, api_key: String, model: impl Into<String>) -> Self {
        let model = model.into();
        let backend = match provider {
            LlmProvider::OpenAI => {
                Backend::OpenAI(OpenAIClient::with_config(OpenAIConfig::new().with_api_key(api_key)))
            }
            LlmProvider::Anthropic => Backend::Anthropic {
                http: reqwest::Client::new(),
                api_key,
            },
        };
        debug!(model = %model, "LLM client ready");
        Self {
            provider,
            model,
            backend,
        }
    }

    /// Provider this client talks to.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs one chat turn and returns the reply text.
    #[instrument(skip(self, turn), fields(provider = %self.provider, model = %self.model, max_tokens = turn.max_tokens))]
    pub async fn chat(&self, turn: ChatTurn<'_>) -> Result<String, LlmError> {
        let text = match &self.backend {
            Backend::OpenAI(client) => self.chat_openai(client, turn).await?,
            Backend::Anthropic { http, api_key } => self.chat_anthropic(http, api_key, turn).await?,
        };
        if text.trim().is_empty() {
            warn!("Provider returned blank text");
            return Err(LlmError::EmptyReply(self.provider));
        }
        debug!(reply_len = text.len(), "Chat turn complete");
        Ok(text)
    }

    async fn chat_openai(
        &self,
        client: &OpenAIClient<OpenAIConfig>,
        turn: ChatTurn<'_>,
    ) -> Result<String, LlmError> {
        let build = |e: async_openai::error::OpenAIError| LlmError::Build {
            provider: self.provider,
            reason: e.to_string(),
        };

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(turn.system)
                    .build()
                    .map_err(build)?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.user)
                    .build()
                    .map_err(build)?,
            ),
        ];
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(turn.max_tokens)
            .temperature(turn.temperature)
            .build()
            .map_err(build)?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Request {
                provider: self.provider,
                reason: e.to_string(),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyReply(self.provider))
    }

    async fn chat_anthropic(
        &self,
        http: &reqwest::Client,
        api_key: &str,
        turn: ChatTurn<'_>,
    ) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: turn.max_tokens,
            temperature: turn.temperature,
            system: turn.system,
            messages: [AnthropicMessage {
                role: "user",
                content: turn.user,
            }],
        };
        let request_failed = |e: reqwest::Error| LlmError::Request {
            provider: self.provider,
            reason: e.to_string(),
        };

        let response = http
            .post(ANTHROPIC_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                provider: self.provider,
                status: status.as_u16(),
                body,
            });
        }

        let reply: AnthropicReply = response.json().await.map_err(request_failed)?;
        reply
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(LlmError::EmptyReply(self.provider))
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anthropic_body_shape() {
        let body = AnthropicRequest {
            model: "claude-3-5-haiku-latest",
            max_tokens: 5,
            temperature: 0.3,
            system: "sys",
            messages: [AnthropicMessage {
                role: "user",
                content: "move?",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["max_tokens"], 5);
        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "move?");
    }

    #[test]
    fn test_anthropic_reply_takes_first_text_block() {
        let reply: AnthropicReply = serde_json::from_str(
            r#"{"content":[{"type":"tool_use"},{"type":"text","text":"4"}]}"#,
        )
        .unwrap();
        let text = reply.content.into_iter().find_map(|b| b.text);
        assert_eq!(text.as_deref(), Some("4"));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = LlmClient::new(LlmProvider::Anthropic, "sk-secret".to_string(), "m");
        let shown = format!("{:?}", client);
        assert!(shown.contains("Anthropic"));
        assert!(!shown.contains("sk-secret"));
    }
}
