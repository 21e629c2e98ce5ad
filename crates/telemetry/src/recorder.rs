//! In-process event sinks: an inspectable recorder, a tracing bridge, and a
//! fan-out that forwards to several sinks at once.

use agentrelay_core::event::{EventRecord, EventSink, RunEvent};
use std::sync::{Arc, Mutex};

/// Keeps every record in memory.
/// Useful for tests and for summarizing a run after it finishes.
#[derive(Default)]
pub struct EventRecorder {
    records: Mutex<Vec<EventRecord>>,
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("count", &self.count())
            .finish()
    }
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Recorded events without their timestamps.
    pub fn events(&self) -> Vec<RunEvent> {
        self.records().into_iter().map(|r| r.event).collect()
    }

    /// The `type` tag of every recorded event, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.records().iter().map(|r| r.event.kind()).collect()
    }

    pub fn count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl EventSink for EventRecorder {
    fn record(&self, record: &EventRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

/// Mirrors events into `tracing` at debug level.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, record: &EventRecord) {
        tracing::debug!(event = record.event.kind(), record = ?record.event, "EVENT");
    }
}

/// Forwards every record to each inner sink, in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn record(&self, record: &EventRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}
