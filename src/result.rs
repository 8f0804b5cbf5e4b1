//! Terminal run result and validation.
//!
//! The result builder reports the simulator's own verdict (it never
//! re-derives success) and attaches rewards rolled from the injected
//! loot tables. A separate validation object cross-references the route,
//! the tracked stats, and the result for test harnesses.

use crate::combat_log::CombatLogEntry;
use crate::core::constants::*;
use crate::core::engine::SimulationOutcome;
use crate::dungeon::route::RoutePull;
use crate::dungeon::types::KeyScaling;
use crate::loot::{LootItem, LootTables};
use crate::stats::RunStatsTracker;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal output of one dungeon run. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonRunResult {
    pub run_id: Uuid,
    pub success: bool,
    pub fail_reason: Option<String>,
    pub key_level: u32,
    pub time_elapsed: f64,
    pub time_limit: f64,
    /// Key upgrade earned from the time margin: 0 through +3.
    pub upgrade_level: u32,
    pub loot: Vec<LootItem>,
    pub orb_drops: Vec<String>,
    pub fragment_drops: Vec<String>,
    pub experience_gained: u64,
    pub deaths: u32,
    pub forces_cleared: f64,
    pub forces_required: f64,
    /// Unix timestamp when the result was built.
    pub completed_at: i64,
    pub combat_log: Vec<CombatLogEntry>,
}

/// Pass/fail cross-check of a completed run against its route and stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunValidation {
    pub passed: bool,
    pub pulls_planned: usize,
    pub forces_cleared: f64,
    pub forces_required: f64,
    pub issues: Vec<String>,
}

/// Builds `DungeonRunResult` values from simulator output. All reference
/// data arrives through the constructor.
pub struct ResultBuilder<'a> {
    tables: &'a LootTables,
    scaling: KeyScaling,
}

impl<'a> ResultBuilder<'a> {
    pub fn new(tables: &'a LootTables, scaling: KeyScaling) -> Self {
        Self { tables, scaling }
    }

    /// Assemble the final result from the simulator verdict, rolling
    /// rewards scaled by the run's key level.
    pub fn build(
        &self,
        outcome: SimulationOutcome,
        time_limit: f64,
        rng: &mut impl Rng,
    ) -> DungeonRunResult {
        let upgrade = upgrade_level(outcome.success, outcome.time_elapsed, time_limit);

        let item_level = 60 + 2 * self.scaling.key_level;
        let item_count = if outcome.success {
            (self.tables.base_item_count * self.scaling.item_quantity).round() as usize
        } else {
            (self.tables.base_item_count * self.scaling.item_quantity * 0.25).round() as usize
        };
        let loot: Vec<LootItem> = (0..item_count)
            .map(|_| self.tables.roll_item(item_level, self.scaling.item_rarity, rng))
            .collect();

        let orb_count = if outcome.success {
            (self.tables.base_orb_count * self.scaling.item_quantity).round() as usize
        } else {
            0
        };
        let orb_drops: Vec<String> = (0..orb_count)
            .filter_map(|_| self.tables.roll_orb(rng))
            .collect();

        let fragment_drops: Vec<String> = (0..outcome.bosses_killed)
            .filter_map(|_| self.tables.roll_fragment(rng))
            .collect();

        let experience_gained = (outcome.forces_cleared
            * self.tables.xp_per_forces
            * self.scaling.reward_multiplier)
            .max(0.0) as u64;

        DungeonRunResult {
            run_id: Uuid::new_v4(),
            success: outcome.success,
            fail_reason: outcome.fail_reason,
            key_level: self.scaling.key_level,
            time_elapsed: outcome.time_elapsed,
            time_limit,
            upgrade_level: upgrade,
            loot,
            orb_drops,
            fragment_drops,
            experience_gained,
            deaths: outcome.deaths,
            forces_cleared: outcome.forces_cleared,
            forces_required: outcome.forces_required,
            completed_at: chrono::Utc::now().timestamp(),
            combat_log: outcome.log,
        }
    }

    /// Cross-reference the result against the planned route and the
    /// log-derived stats.
    pub fn validate(
        &self,
        result: &DungeonRunResult,
        route: &[RoutePull],
        stats: &RunStatsTracker,
    ) -> RunValidation {
        let mut issues = Vec::new();

        for pull in route {
            if pull.pack_ids.len() > 3 {
                issues.push(format!(
                    "pull {} contains {} packs (cap is 3)",
                    pull.pull_number,
                    pull.pack_ids.len()
                ));
            }
        }

        let routed_forces: f64 = route.iter().map(|p| p.total_forces).sum();
        if result.forces_cleared > routed_forces + 1e-6 {
            issues.push(format!(
                "cleared {} forces but the route only contains {}",
                result.forces_cleared, routed_forces
            ));
        }
        if result.success && result.forces_cleared + 1e-6 < result.forces_required {
            issues.push(format!(
                "successful run cleared {} of {} required forces",
                result.forces_cleared, result.forces_required
            ));
        }
        if result.success && result.combat_log.is_empty() {
            issues.push("successful run produced an empty combat log".to_string());
        }
        if stats.deaths != result.deaths {
            issues.push(format!(
                "log records {} deaths but the simulator reported {}",
                stats.deaths, result.deaths
            ));
        }

        RunValidation {
            passed: issues.is_empty(),
            pulls_planned: route.len(),
            forces_cleared: result.forces_cleared,
            forces_required: result.forces_required,
            issues,
        }
    }
}

/// Key upgrade from the time margin: beat 60% of the limit for +3, 80% for
/// +2, the limit itself for +1. Failed runs never upgrade.
fn upgrade_level(success: bool, time_elapsed: f64, time_limit: f64) -> u32 {
    if !success || time_limit <= 0.0 {
        return 0;
    }
    let fraction = time_elapsed / time_limit;
    if fraction <= UPGRADE_PLUS_THREE_FRACTION {
        3
    } else if fraction <= UPGRADE_PLUS_TWO_FRACTION {
        2
    } else if fraction <= 1.0 {
        1
    } else {
        0
    }
}
