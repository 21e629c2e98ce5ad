//! Generative service clients for agentrelay.
//!
//! `OllamaProvider` implements the single-attempt `agentrelay_core::Provider`
//! trait; `GenerativeClient` adds the bounded retry policy every agent call
//! goes through.

pub mod ollama;
pub mod retry;

pub use ollama::OllamaProvider;
pub use retry::{is_failure_sentinel, GenerativeClient, RetryPolicy, FAILURE_SENTINEL_PREFIX};
