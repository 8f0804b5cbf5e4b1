//! Append-only combat log.
//!
//! The log is the sole channel of truth between the simulator and its
//! downstream consumers (stats tracking, result building, UIs). Entries are
//! immutable once pushed. Every entry that describes a quantity carries it
//! in the structured `value` field; the human-readable message is cosmetic
//! and additionally leads with the same integer for display purposes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event classification for filtering and stats dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    Damage,
    Heal,
    Death,
    Pull,
    Boss,
    Phase,
    Run,
    Warning,
}

/// A single timestamped, immutable combat fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Simulated seconds since the run started.
    pub timestamp: f64,
    pub event: LogEvent,
    pub source: String,
    pub target: String,
    /// Structured numeric payload (damage dealt, healing done, forces).
    pub value: Option<f64>,
    pub message: String,
}

/// Callback invoked once per newly appended entry, for streaming consumers.
pub type LogCallback = Box<dyn FnMut(&CombatLogEntry)>;

/// The append-only log plus an optional streaming callback.
#[derive(Default)]
pub struct CombatLog {
    entries: Vec<CombatLogEntry>,
    on_entry: Option<LogCallback>,
}

impl fmt::Debug for CombatLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatLog")
            .field("entries", &self.entries.len())
            .field("streaming", &self.on_entry.is_some())
            .finish()
    }
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a streaming callback. It fires for every entry appended
    /// after this call.
    pub fn set_callback(&mut self, callback: impl FnMut(&CombatLogEntry) + 'static) {
        self.on_entry = Some(Box::new(callback));
    }

    /// Append an entry and notify the streaming callback, if any.
    pub fn record(
        &mut self,
        timestamp: f64,
        event: LogEvent,
        source: impl Into<String>,
        target: impl Into<String>,
        value: Option<f64>,
        message: impl Into<String>,
    ) {
        let entry = CombatLogEntry {
            timestamp,
            event,
            source: source.into(),
            target: target.into(),
            value,
            message: message.into(),
        };
        if let Some(callback) = &mut self.on_entry {
            callback(&entry);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the log, keeping only the entries.
    pub fn into_entries(self) -> Vec<CombatLogEntry> {
        self.entries
    }

    /// Entries of one event type, in order.
    pub fn filter_by_event(&self, event: LogEvent) -> Vec<&CombatLogEntry> {
        self.entries.iter().filter(|e| e.event == event).collect()
    }

    /// Serialize the entries for export or replay.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
