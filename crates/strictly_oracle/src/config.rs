//! Oracle configuration loaded from TOML.

use crate::coordinator::{CoordinatorConfig, FallbackPolicy};
use crate::llm_client::{LlmClient, LlmProvider};
use crate::source::{DecisionSource, HttpDecisionSource, LlmDecisionSource, SimpleDecisionSource};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use strictly_board::Player;
use tracing::{debug, info, instrument};

/// Which decision source backs the managed side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Chat-completion LLM.
    Llm,
    /// JSON-over-HTTP endpoint.
    Http,
    /// Local first-empty player.
    Simple,
}

/// LLM settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct LlmSection {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// LLM model name (e.g., "gpt-4o-mini", "claude-3-5-haiku-latest").
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    temperature: f32,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// HTTP decision endpoint settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct HttpSection {
    /// URL receiving the POSTed move request.
    url: String,
}

/// Configuration for the managed side and its decision source.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Display name of the managed player.
    #[serde(default = "default_name")]
    name: String,

    /// Side played by the decision source.
    #[serde(default = "default_side")]
    side: Player,

    /// Decision source kind.
    #[serde(default = "default_source")]
    source: SourceKind,

    /// Minimum thinking time before a decision is accepted, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,

    /// Timeout for one decision request, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Fallback policy for unusable decisions.
    #[serde(default)]
    fallback: FallbackPolicy,

    /// Seed for the random fallback.
    #[serde(default)]
    seed: Option<u64>,

    /// LLM settings (used when `source = "llm"`).
    #[serde(default)]
    llm: LlmSection,

    /// HTTP settings (required when `source = "http"`).
    #[serde(default)]
    http: Option<HttpSection>,
}

fn default_name() -> String {
    "Oracle".to_string()
}

fn default_side() -> Player {
    Player::O
}

fn default_source() -> SourceKind {
    SourceKind::Llm
}

fn default_thinking_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    5
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            side: default_side(),
            source: default_source(),
            thinking_delay_ms: default_thinking_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            fallback: FallbackPolicy::default(),
            seed: None,
            llm: LlmSection::default(),
            http: None,
        }
    }
}

impl OracleConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(name = %config.name, source = ?config.source, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Overrides the source kind.
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    /// Overrides the managed side.
    pub fn with_side(mut self, side: Player) -> Self {
        self.side = side;
        self
    }

    /// Coordinator settings derived from this config.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let config = CoordinatorConfig::default()
            .with_thinking_delay(Duration::from_millis(self.thinking_delay_ms))
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms))
            .with_fallback(self.fallback);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Creates the LLM client for this config.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY environment variable.
    #[instrument(skip(self), fields(provider = ?self.llm.provider, model = %self.llm.model))]
    pub fn create_llm_client(&self) -> Result<LlmClient, ConfigError> {
        let var = match self.llm.provider {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        };
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmClient::new(self.llm.provider, api_key, self.llm.model.clone()))
    }

    /// Builds the configured decision source.
    #[instrument(skip(self), fields(source = ?self.source))]
    pub fn build_source(&self) -> Result<Arc<dyn DecisionSource>, ConfigError> {
        let source: Arc<dyn DecisionSource> = match self.source {
            SourceKind::Simple => Arc::new(SimpleDecisionSource::new(self.name.clone())),
            SourceKind::Llm => {
                let source = LlmDecisionSource::new(self.name.clone(), self.create_llm_client()?)
                    .with_sampling(self.llm.max_tokens, self.llm.temperature);
                Arc::new(source)
            }
            SourceKind::Http => {
                let http = self
                    .http
                    .as_ref()
                    .ok_or_else(|| ConfigError::new("source = \"http\" requires an [http] section".to_string()))?;
                Arc::new(HttpDecisionSource::new(
                    self.name.clone(),
                    http.url.clone(),
                    Duration::from_millis(self.request_timeout_ms),
                )?)
            }
        };
        Ok(source)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
