//! Coordinator tuning.

use super::fallback::FallbackPolicy;
use derive_getters::Getters;
use derive_setters::Setters;
use std::time::Duration;

/// Timing and fallback settings for a [`MoveCoordinator`](super::MoveCoordinator).
#[derive(Debug, Clone, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct CoordinatorConfig {
    /// Minimum time between issuing a request and accepting its answer.
    thinking_delay: Duration,
    /// Upper bound on one decision-source call.
    request_timeout: Duration,
    /// Local choice when the answer is unusable.
    fallback: FallbackPolicy,
    /// Seed for the random fallback.
    #[setters(strip_option)]
    seed: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            thinking_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            fallback: FallbackPolicy::Random,
            seed: None,
        }
    }
}
