//! Ollama provider: single-attempt calls to the native generate endpoint.
//!
//! Speaks `POST {base_url}/api/generate` with `stream: false`, which returns
//! the whole completion in one JSON object.

use agentrelay_core::error::ProviderError;
use agentrelay_core::provider::{GenerateOptions, GenerateRequest, Provider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// A provider backed by a local (or remote) Ollama server.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a provider whose every request attempt is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = ApiRequest::from(request);

        debug!(
            model = %request.model,
            prompt_chars = request.prompt.chars().count(),
            "Sending generate request"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_body, "Ollama returned error");
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let api_response: ApiResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse response: {e}"))
        })?;

        Ok(api_response.response)
    }
}

// --- Ollama API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ApiOptions,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiOptions {
    temperature: f64,
    num_ctx: u32,
}

impl From<GenerateOptions> for ApiOptions {
    fn from(options: GenerateOptions) -> Self {
        Self {
            temperature: options.temperature,
            num_ctx: options.context_window,
        }
    }
}

impl<'a> From<&'a GenerateRequest> for ApiRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
            options: request.options.into(),
            system: &request.system,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response: String,
}
