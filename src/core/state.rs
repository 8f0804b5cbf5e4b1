//! Live combat state and its managed wrapper.
//!
//! All mutation of the run state funnels through `StateManager`, which
//! enforces the simulation-mode invariants after every update: pool values
//! stay finite and clamped, and (in validation mode) dead party members are
//! battle-resurrected immediately so a run always reaches a definitive
//! outcome instead of stalling on a wipe.

use crate::combat_log::{CombatLog, LogEvent};
use crate::core::constants::*;
use crate::core::entity::CombatEntity;

/// The mutable state of one dungeon run.
#[derive(Debug, Default)]
pub struct SimState {
    /// Simulated seconds since the run started.
    pub clock: f64,
    pub forces_cleared: f64,
    pub deaths: u32,
    pub current_pull: u32,
    pub party: Vec<CombatEntity>,
    pub log: CombatLog,
}

impl SimState {
    pub fn new(party: Vec<CombatEntity>) -> Self {
        Self {
            party,
            ..Self::default()
        }
    }

    pub fn living_members(&self) -> usize {
        self.party.iter().filter(|m| m.is_alive()).count()
    }

    pub fn party_wiped(&self) -> bool {
        self.party.iter().all(|m| !m.is_alive())
    }
}

/// Sparse update: every `None` field falls back to the current value.
#[derive(Debug, Default, Clone)]
pub struct PartialState {
    pub clock: Option<f64>,
    pub forces_cleared: Option<f64>,
    pub deaths: Option<u32>,
    pub current_pull: Option<u32>,
    pub party: Option<Vec<CombatEntity>>,
}

impl PartialState {
    pub fn is_empty(&self) -> bool {
        self.clock.is_none()
            && self.forces_cleared.is_none()
            && self.deaths.is_none()
            && self.current_pull.is_none()
            && self.party.is_none()
    }
}

/// Wrapper that owns the run state and applies updates under invariants.
#[derive(Debug)]
pub struct StateManager {
    state: SimState,
    /// Battle-resurrect dead party members after every update.
    auto_resurrect: bool,
}

impl StateManager {
    pub fn new(state: SimState, auto_resurrect: bool) -> Self {
        let mut manager = Self {
            state,
            auto_resurrect,
        };
        manager.enforce_invariants();
        manager
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn into_state(self) -> SimState {
        self.state
    }

    /// Full-replacement update: the closure may rewrite any part of the
    /// state. Invariants are enforced afterwards.
    pub fn update_with(&mut self, update: impl FnOnce(&mut SimState)) {
        update(&mut self.state);
        self.enforce_invariants();
    }

    /// Sparse merge update. A `None` argument (the caller had nothing to
    /// apply) or an empty partial is rejected as a warned no-op, never a
    /// panic; missing fields keep their current values.
    pub fn merge(&mut self, partial: Option<PartialState>) {
        let partial = match partial {
            Some(p) if !p.is_empty() => p,
            _ => {
                let clock = self.state.clock;
                self.state.log.record(
                    clock,
                    LogEvent::Warning,
                    "state",
                    "",
                    None,
                    "ignored state update with no fields",
                );
                return;
            }
        };

        if let Some(clock) = partial.clock {
            self.state.clock = clock;
        }
        if let Some(forces) = partial.forces_cleared {
            self.state.forces_cleared = forces;
        }
        if let Some(deaths) = partial.deaths {
            self.state.deaths = deaths;
        }
        if let Some(pull) = partial.current_pull {
            self.state.current_pull = pull;
        }
        if let Some(party) = partial.party {
            self.state.party = party;
        }
        self.enforce_invariants();
    }

    /// Post-update invariant pass: sanitize counters and, in validation
    /// mode, battle-resurrect any dead member.
    fn enforce_invariants(&mut self) {
        if !self.state.clock.is_finite() || self.state.clock < 0.0 {
            self.state.clock = 0.0;
        }
        if !self.state.forces_cleared.is_finite() || self.state.forces_cleared < 0.0 {
            self.state.forces_cleared = 0.0;
        }
        if self.auto_resurrect {
            self.resurrect_dead_members();
        }
    }

    /// Restore every member marked dead to 60% life / 30% mana, stamping
    /// the resurrection time and emitting exactly one "Battle Res" heal
    /// entry per death event. Members at zero health that death resolution
    /// has not marked yet are left alone so the death is still counted.
    /// Entries for the same member within the dedup window are suppressed
    /// so double-processed updates cannot duplicate them.
    fn resurrect_dead_members(&mut self) {
        let clock = self.state.clock;
        for member in &mut self.state.party {
            if !member.is_dead {
                continue;
            }

            member.is_dead = false;
            member.health = member.max_health * RESURRECT_LIFE_FRACTION;
            member.mana = member.max_mana * RESURRECT_MANA_FRACTION;
            member.last_resurrected_at = Some(clock);

            let duplicate = self
                .state
                .log
                .entries()
                .iter()
                .rev()
                .take_while(|e| clock - e.timestamp <= RESURRECT_DEDUP_WINDOW_SECS)
                .any(|e| {
                    e.event == LogEvent::Heal
                        && e.source == "Battle Res"
                        && e.target == member.name
                });
            if !duplicate {
                self.state.log.record(
                    clock,
                    LogEvent::Heal,
                    "Battle Res",
                    member.name.clone(),
                    Some(member.health),
                    format!("{} healing on {} (Battle Res)", member.health as i64, member.name),
                );
            }
        }
    }
}
