//! Local decision source for offline play and tests.

use super::{DecisionError, DecisionSource};
use crate::request::MoveRequest;
use tracing::debug;

/// Takes a hinted win, then a hinted block, otherwise the first empty square.
pub struct SimpleDecisionSource {
    name: String,
}

impl SimpleDecisionSource {
    /// Creates a new simple source.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for SimpleDecisionSource {
    fn default() -> Self {
        Self::new("Simple")
    }
}

#[async_trait::async_trait]
impl DecisionSource for SimpleDecisionSource {
    async fn request_move(&self, request: &MoveRequest) -> Result<i64, DecisionError> {
        let choice = request
            .hints
            .winning
            .first()
            .or_else(|| request.hints.blocking.first())
            .map(|t| t.cell)
            .or_else(|| request.view.available.first().copied())
            .ok_or_else(|| DecisionError::Parse("No valid moves available".to_string()))?;

        debug!(source = %self.name, position = choice, "Simple source chose position");
        Ok(choice as i64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_board::{GameEngine, Player};

    #[tokio::test]
    async fn test_prefers_win_then_block_then_first_empty() {
        let source = SimpleDecisionSource::default();
        let mut engine = GameEngine::new();

        let request = MoveRequest::new(1, 0, &engine.board_snapshot(), Player::X);
        assert_eq!(source.request_move(&request).await, Ok(0));

        // X X _ / O _ _ / _ _ _ : O must block at 2
        for (i, p) in [(0, Player::X), (3, Player::O), (1, Player::X)] {
            engine.submit_move(i, p).unwrap();
        }
        let request = MoveRequest::new(2, 0, &engine.board_snapshot(), Player::O);
        assert_eq!(source.request_move(&request).await, Ok(2));

        // X X _ / O O _ / _ _ X : O can win at 5
        engine.submit_move(4, Player::O).unwrap();
        engine.submit_move(8, Player::X).unwrap();
        let request = MoveRequest::new(3, 0, &engine.board_snapshot(), Player::O);
        assert_eq!(source.request_move(&request).await, Ok(5));
    }
}
