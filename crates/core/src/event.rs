//! Run events: the append-only record of what happened during a run.
//!
//! The orchestrator emits one event per significant step. Sinks decide where
//! they go (a JSONL file, memory, tracing).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::DelegationKind;

/// Every event the orchestration loop emits.
///
/// Turn numbers are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RunEvent {
    /// The run started
    Start { challenge: String, config: String },

    /// The main agent answered
    Main { turn: u32, response: String },

    /// A sub-agent finished a delegated task
    SubAgent {
        turn: u32,
        agent: DelegationKind,
        task: String,
        /// Bounded snapshot of the sub-agent result
        result: String,
        /// Length of the full result in characters
        chars: usize,
    },

    /// The main agent declared the challenge complete
    Done { turn: u32 },

    /// The main agent returned nothing
    Empty { turn: u32 },

    /// The turn budget ran out
    TurnLimit { turns: u32 },
}

impl RunEvent {
    /// The `type` tag as it appears in the log.
    pub fn kind(&self) -> &'static str {
        match self {
            RunEvent::Start { .. } => "start",
            RunEvent::Main { .. } => "main",
            RunEvent::SubAgent { .. } => "sub-agent",
            RunEvent::Done { .. } => "done",
            RunEvent::Empty { .. } => "empty",
            RunEvent::TurnLimit { .. } => "turn-limit",
        }
    }
}

/// A timestamped event, one line in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub event: RunEvent,
}

impl EventRecord {
    pub fn now(event: RunEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Where run events are written.
///
/// Recording must never fail the run; sinks handle their own I/O errors.
pub trait EventSink: Send + Sync {
    fn record(&self, record: &EventRecord);

    /// Timestamp an event and record it.
    fn emit(&self, event: RunEvent) {
        self.record(&EventRecord::now(event));
    }
}
