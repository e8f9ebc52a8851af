//! Session trace
//!
//! Records what happened in one session so a run can be inspected after
//! the fact. In-memory only.

use crate::models::{TraceEntry, TraceEvent};
use crate::state::UserState;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::io::Write;
use tracing::debug;
use uuid::Uuid;

pub struct SessionTrace {
    session_id: Uuid,
    entries: Vec<TraceEntry>,
}

impl SessionTrace {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            entries: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn record(&mut self, round: u32, event: TraceEvent) {
        debug!(session_id = %self.session_id, round, ?event, "Trace event");
        self.entries.push(TraceEntry {
            round,
            event,
            recorded_at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}

impl Default for SessionTrace {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 of the state's JSON form, hex encoded.
/// Equal states always hash equally since fields are kept sorted.
pub fn compute_state_hash(state: &UserState) -> String {
    let mut hasher = Sha256::new();

    if serde_json::to_writer(&mut HashWriter(&mut hasher), state).is_err() {
        return String::new();
    }

    hex::encode(hasher.finalize())
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
