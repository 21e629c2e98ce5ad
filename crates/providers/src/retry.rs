//! Bounded retry with fixed backoff around a single-attempt provider.
//!
//! The client never returns an error. When every attempt fails it returns a
//! sentinel string that embeds the last failure, so the orchestration keeps
//! going in a degraded state instead of aborting the run.

use agentrelay_core::provider::{GenerateOptions, GenerateRequest, Provider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Prefix of every string produced when retries are exhausted.
pub const FAILURE_SENTINEL_PREFIX: &str = "[ERROR] Failed after ";

/// Whether `text` is the sentinel returned after exhausting all attempts.
pub fn is_failure_sentinel(text: &str) -> bool {
    text.starts_with(FAILURE_SENTINEL_PREFIX)
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Fixed delay before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// The generative client used by every agent.
///
/// Wraps a [`Provider`] with a [`RetryPolicy`] and the fixed sampling
/// options. Calls are sequential: the orchestrator awaits each one before
/// issuing the next.
pub struct GenerativeClient {
    provider: Arc<dyn Provider>,
    policy: RetryPolicy,
    options: GenerateOptions,
}

impl GenerativeClient {
    pub fn new(provider: Arc<dyn Provider>, policy: RetryPolicy, options: GenerateOptions) -> Self {
        Self {
            provider,
            policy,
            options,
        }
    }

    /// Generate a completion, retrying transport and decoding failures.
    pub async fn generate(&self, model: &str, prompt: &str, system: &str) -> String {
        let request = GenerateRequest::new(model, prompt, system, self.options);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.provider.generate(&request).await {
                Ok(text) => {
                    debug!(
                        provider = self.provider.name(),
                        model = %model,
                        attempt,
                        chars = text.chars().count(),
                        "Generation succeeded"
                    );
                    return text;
                }
                Err(e) if attempt < max_attempts => {
                    warn!(
                        model = %model,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Generation failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        model = %model,
                        attempts = max_attempts,
                        error = %e,
                        "Generation failed, giving up"
                    );
                    return format!("{FAILURE_SENTINEL_PREFIX}{max_attempts} attempts: {e}");
                }
            }
        }
    }
}
