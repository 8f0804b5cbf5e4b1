//! Incremental, log-driven run statistics.
//!
//! The tracker consumes combat log entries exactly once (a seen-count
//! cursor guards against re-ingestion) and aggregates running totals from
//! the structured `value` field. Message text is never parsed.

use crate::combat_log::{CombatLogEntry, LogEvent};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct RunStatsTracker {
    seen: usize,
    party_names: HashSet<String>,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub healing_done: f64,
    pub kills: u32,
    pub deaths: u32,
}

impl RunStatsTracker {
    /// Track stats for the given party roster. Entry targets matching a
    /// roster name count as incoming (damage taken, deaths); everything
    /// else counts as outgoing (damage dealt, kills).
    pub fn new(party_names: impl IntoIterator<Item = String>) -> Self {
        Self {
            party_names: party_names.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Consume any entries appended since the last call. Safe to call
    /// repeatedly with the same log; already-seen entries are skipped.
    pub fn ingest(&mut self, entries: &[CombatLogEntry]) {
        if self.seen >= entries.len() {
            return;
        }
        for entry in &entries[self.seen..] {
            self.consume(entry);
        }
        self.seen = entries.len();
    }

    fn consume(&mut self, entry: &CombatLogEntry) {
        let value = entry.value.unwrap_or(0.0).max(0.0);
        match entry.event {
            LogEvent::Damage => {
                if self.party_names.contains(&entry.target) {
                    self.damage_taken += value;
                } else {
                    self.damage_dealt += value;
                }
            }
            LogEvent::Heal => self.healing_done += value,
            LogEvent::Death => {
                if self.party_names.contains(&entry.target) {
                    self.deaths += 1;
                } else {
                    self.kills += 1;
                }
            }
            LogEvent::Pull | LogEvent::Boss | LogEvent::Phase | LogEvent::Run
            | LogEvent::Warning => {}
        }
    }

    pub fn entries_seen(&self) -> usize {
        self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: LogEvent, target: &str, value: Option<f64>) -> CombatLogEntry {
        CombatLogEntry {
            timestamp: 0.0,
            event,
            source: "test".to_string(),
            target: target.to_string(),
            value,
            message: String::new(),
        }
    }

    fn tracker() -> RunStatsTracker {
        RunStatsTracker::new(["Brakka".to_string(), "Seris".to_string()])
    }

    #[test]
    fn test_damage_discriminated_by_target() {
        let mut stats = tracker();
        let log = vec![
            entry(LogEvent::Damage, "Rotfang", Some(120.0)),
            entry(LogEvent::Damage, "Brakka", Some(45.0)),
            entry(LogEvent::Damage, "Rotfang", Some(80.0)),
        ];
        stats.ingest(&log);

        assert_eq!(stats.damage_dealt, 200.0);
        assert_eq!(stats.damage_taken, 45.0);
    }

    #[test]
    fn test_kills_and_deaths_by_target() {
        let mut stats = tracker();
        let log = vec![
            entry(LogEvent::Death, "Rotfang", None),
            entry(LogEvent::Death, "Brakka", None),
            entry(LogEvent::Death, "Gravemaw", None),
        ];
        stats.ingest(&log);

        assert_eq!(stats.kills, 2);
        assert_eq!(stats.deaths, 1);
    }

    #[test]
    fn test_healing_accumulates() {
        let mut stats = tracker();
        let log = vec![
            entry(LogEvent::Heal, "Brakka", Some(150.0)),
            entry(LogEvent::Heal, "Seris", Some(90.0)),
        ];
        stats.ingest(&log);
        assert_eq!(stats.healing_done, 240.0);
    }

    #[test]
    fn test_ingest_is_exactly_once() {
        let mut stats = tracker();
        let mut log = vec![entry(LogEvent::Damage, "Rotfang", Some(100.0))];

        stats.ingest(&log);
        stats.ingest(&log);
        stats.ingest(&log);
        assert_eq!(stats.damage_dealt, 100.0);

        // New entries past the cursor are picked up, old ones stay counted
        log.push(entry(LogEvent::Damage, "Rotfang", Some(50.0)));
        stats.ingest(&log);
        assert_eq!(stats.damage_dealt, 150.0);
        assert_eq!(stats.entries_seen(), 2);
    }

    #[test]
    fn test_missing_value_counts_as_zero() {
        let mut stats = tracker();
        stats.ingest(&[entry(LogEvent::Damage, "Rotfang", None)]);
        assert_eq!(stats.damage_dealt, 0.0);
    }

    #[test]
    fn test_non_numeric_events_ignored() {
        let mut stats = tracker();
        stats.ingest(&[
            entry(LogEvent::Pull, "", Some(12.0)),
            entry(LogEvent::Phase, "", Some(70.0)),
            entry(LogEvent::Run, "", None),
            entry(LogEvent::Warning, "", None),
        ]);
        assert_eq!(stats.damage_dealt, 0.0);
        assert_eq!(stats.healing_done, 0.0);
        assert_eq!(stats.kills, 0);
    }
}
