//! JSONL event log, one JSON object per line, append-only.
//!
//! Storage location: `{log_dir}/run-{YYYYmmdd-HHMMSS}.jsonl`, one file per
//! run. The directory and file are created on the first write.

use agentrelay_core::event::{EventRecord, EventSink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::TelemetryError;

/// An append-only JSONL file sink.
pub struct JsonlEventLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl JsonlEventLog {
    /// Log to an explicit file path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Mutex::new(None),
        }
    }

    /// Log to a fresh `run-<timestamp>.jsonl` file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        Self::new(dir.join(format!("run-{stamp}.jsonl")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, TelemetryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        debug!(path = %self.path.display(), "Opened event log");
        Ok(file)
    }

    /// Serialize and append one record.
    pub fn append(&self, record: &EventRecord) -> Result<(), TelemetryError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut guard = self.file.lock().map_err(|_| TelemetryError::Poisoned)?;
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        if let Some(file) = guard.as_mut() {
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }
}

impl EventSink for JsonlEventLog {
    fn record(&self, record: &EventRecord) {
        if let Err(e) = self.append(record) {
            warn!(path = %self.path.display(), error = %e, "Failed to write event log");
        }
    }
}
