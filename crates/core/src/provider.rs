//! Provider trait: the abstraction over the generative completion service.
//!
//! A Provider performs exactly one completion attempt. Retrying, backoff and
//! failure degradation live one layer up in `agentrelay-providers::retry`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Sampling options applied to every request.
///
/// These come from configuration once at startup; callers never vary them
/// per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f64,

    /// Context window size in tokens
    pub context_window: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            context_window: 4096,
        }
    }
}

/// A single non-streaming completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The model to use (e.g., "qwen2.5:3b")
    pub model: String,

    /// The full prompt text
    pub prompt: String,

    /// System prompt; omitted from the wire request when empty
    #[serde(default)]
    pub system: String,

    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        system: impl Into<String>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: system.into(),
            options,
        }
    }
}

/// The core Provider trait.
///
/// Implementations issue one request and report any transport or decoding
/// problem as a [`ProviderError`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send one completion request and return the generated text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}
