//! Recorded simulation trace
//!
//! A [`TraceLog`] keeps every line emitted on the trace hook together with
//! the simulated time it was emitted at. Tests query it to check when things
//! happened; [`TraceLog::digest`] condenses a whole run into one hash so two
//! runs can be compared for determinism.

use crate::core::time::SimTime;
use sha2::{Digest, Sha256};

/// One line of trace output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub time: SimTime,
    pub message: String,
}

/// Ordered list of trace entries
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn log(&mut self, time: SimTime, message: impl Into<String>) {
        self.entries.push(TraceEntry {
            time,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Entries emitted at exactly `time`
    pub fn entries_at(&self, time: SimTime) -> Vec<&TraceEntry> {
        self.entries.iter().filter(|e| e.time == time).collect()
    }

    /// Entries whose message contains `needle`
    pub fn entries_containing(&self, needle: &str) -> Vec<&TraceEntry> {
        self.entries
            .iter()
            .filter(|e| e.message.contains(needle))
            .collect()
    }

    /// First entry whose message contains `needle`
    pub fn first_containing(&self, needle: &str) -> Option<&TraceEntry> {
        self.entries.iter().find(|e| e.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// SHA-256 over every `(time, message)` pair, hex encoded
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            hasher.update(entry.time.to_le_bytes());
            hasher.update(entry.message.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}
