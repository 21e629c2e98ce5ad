//! Event log sinks for agentrelay.
//!
//! Every run writes an append-only JSONL record of its significant steps
//! (start, main-agent answers, sub-agent results, and how the run stopped).
//! The sinks here implement `agentrelay_core::EventSink`.

pub mod jsonl;
pub mod recorder;

pub use jsonl::JsonlEventLog;
pub use recorder::{EventRecorder, FanoutSink, TracingSink};

/// Errors from the telemetry subsystem.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("event log lock poisoned")]
    Poisoned,
}
