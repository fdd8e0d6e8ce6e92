//! Decision source that POSTs the request as JSON to an HTTP endpoint.
//!
//! Request body: the serialized [`MoveRequest`]. Expected response:
//! `{"cell": <integer>}`.

use super::{DecisionError, DecisionSource};
use crate::config::ConfigError;
use crate::request::MoveRequest;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Deserialize)]
struct CellReply {
    cell: i64,
}

/// Remote move oracle speaking plain JSON over HTTP.
pub struct HttpDecisionSource {
    name: String,
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpDecisionSource {
    /// Creates a source posting to `url`. `timeout` bounds each HTTP call.
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let name = name.into();
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::new(format!("Decision endpoint must be an http(s) URL, got {:?}", url)));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;
        info!(source = %name, url = %url, "Creating HTTP decision source");
        Ok(Self {
            name,
            url,
            timeout,
            client,
        })
    }
}

#[async_trait::async_trait]
impl DecisionSource for HttpDecisionSource {
    #[instrument(skip(self, request), fields(source = %self.name, request_id = request.request_id))]
    async fn request_move(&self, request: &MoveRequest) -> Result<i64, DecisionError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "HTTP decision request failed");
                if e.is_timeout() {
                    DecisionError::Timeout(self.timeout)
                } else {
                    DecisionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DecisionError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(DecisionError::Transport(format!("HTTP {}: {}", status, body)));
        }

        debug!(body = %body, "Decision endpoint replied");
        let reply: CellReply = serde_json::from_str(&body)
            .map_err(|e| DecisionError::Parse(format!("Bad decision body {:?}: {}", body, e)))?;
        Ok(reply.cell)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_url() {
        let err = HttpDecisionSource::new("Remote", "ftp://oracle/move", Duration::from_secs(1))
            .err()
            .expect("ftp URL should be refused");
        assert!(err.message.contains("http(s) URL"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        let source = HttpDecisionSource::new("Remote", "http://127.0.0.1:9/move", Duration::from_secs(2))
            .expect("client should build");
        let request = MoveRequest::new(1, 1, &strictly_board::Board::new(), strictly_board::Player::O);

        let err = source.request_move(&request).await.unwrap_err();

        assert!(
            matches!(err, DecisionError::Transport(_) | DecisionError::Timeout(_)),
            "got {:?}",
            err
        );
    }
}
