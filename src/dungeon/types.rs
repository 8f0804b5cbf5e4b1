//! Dungeon definitions: gates, enemy packs, bosses, affixes, key scaling.
//!
//! These are static input data supplied by the calling application. The
//! engine never mutates a `Dungeon`; it projects packs into per-pull
//! `CombatEntity` instances.

use crate::core::constants::*;
use serde::{Deserialize, Serialize};

/// 2D map position in abstract map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Run-wide difficulty modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affix {
    /// Non-boss enemies gain health and damage.
    Fortified,
    /// Bosses gain health and damage.
    Tyrannical,
}

/// A named boss phase, entered when the boss's health fraction falls to
/// the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    pub name: String,
    /// Health fraction in `(0, 1)` at which this phase begins.
    pub health_threshold: f64,
}

/// Boss definition attached to a gate's boss pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub name: String,
    pub health: f64,
    pub damage: f64,
    pub phases: Vec<BossPhase>,
}

/// A spatial cluster of enemies that is pulled as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyPack {
    pub id: u32,
    pub name: String,
    pub position: Position,
    /// Packs within this radius of each other can be chained into one pull.
    pub pull_radius: f64,
    /// Difficulty contribution toward the gate requirement.
    pub forces: f64,
    pub gate: u8,
    /// Number of enemies in the pack.
    pub count: u32,
    pub enemy_health: f64,
    pub enemy_damage: f64,
    #[serde(default)]
    pub is_gate_boss: bool,
    #[serde(default)]
    pub boss: Option<Boss>,
}

/// A sequential dungeon section with its own forces requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub number: u8,
    pub required_forces: f64,
    pub packs: Vec<EnemyPack>,
}

/// A complete dungeon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub name: String,
    pub gates: Vec<Gate>,
    /// Par time for the run, in seconds.
    pub time_limit_secs: f64,
}

impl Dungeon {
    pub fn total_required_forces(&self) -> f64 {
        self.gates.iter().map(|g| g.required_forces).sum()
    }

    pub fn pack(&self, id: u32) -> Option<&EnemyPack> {
        self.gates
            .iter()
            .flat_map(|g| g.packs.iter())
            .find(|p| p.id == id)
    }

    pub fn pack_count(&self) -> usize {
        self.gates.iter().map(|g| g.packs.len()).sum()
    }
}

/// Per-run scaling derived once from the integer key level and held
/// constant for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyScaling {
    pub key_level: u32,
    pub health_multiplier: f64,
    pub damage_multiplier: f64,
    pub item_quantity: f64,
    pub item_rarity: f64,
    pub reward_multiplier: f64,
}

impl KeyScaling {
    /// Enemy health/damage compound per level above 1; reward-side
    /// multipliers grow linearly with the level.
    pub fn for_key_level(key_level: u32) -> Self {
        let level = key_level.max(1);
        let steps = (level - 1) as i32;
        let combat = (1.0 + KEY_COMBAT_SCALING_PER_LEVEL).powi(steps);
        Self {
            key_level: level,
            health_multiplier: combat,
            damage_multiplier: combat,
            item_quantity: 1.0 + KEY_ITEM_QUANTITY_PER_LEVEL * level as f64,
            item_rarity: 1.0 + KEY_ITEM_RARITY_PER_LEVEL * level as f64,
            reward_multiplier: 1.0 + KEY_REWARD_PER_LEVEL * steps as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_key_scaling_level_one_is_baseline() {
        let scaling = KeyScaling::for_key_level(1);
        assert_eq!(scaling.health_multiplier, 1.0);
        assert_eq!(scaling.damage_multiplier, 1.0);
        assert_eq!(scaling.reward_multiplier, 1.0);
    }

    #[test]
    fn test_key_scaling_compounds() {
        let k5 = KeyScaling::for_key_level(5);
        let k10 = KeyScaling::for_key_level(10);
        assert!(k5.health_multiplier > 1.0);
        assert!(k10.health_multiplier > k5.health_multiplier);
        assert!(k10.item_rarity > k5.item_rarity);
        // 1.08^4
        assert!((k5.health_multiplier - 1.360_488_96).abs() < 1e-6);
    }

    #[test]
    fn test_key_scaling_clamps_to_level_one() {
        let scaling = KeyScaling::for_key_level(0);
        assert_eq!(scaling.key_level, 1);
        assert_eq!(scaling.health_multiplier, 1.0);
    }

    #[test]
    fn test_dungeon_lookups() {
        let dungeon = Dungeon {
            name: "Test Halls".to_string(),
            gates: vec![
                Gate {
                    number: 1,
                    required_forces: 30.0,
                    packs: vec![EnemyPack {
                        id: 1,
                        name: "Rotlings".to_string(),
                        position: Position::new(0.0, 0.0),
                        pull_radius: 40.0,
                        forces: 10.0,
                        gate: 1,
                        count: 3,
                        enemy_health: 400.0,
                        enemy_damage: 30.0,
                        is_gate_boss: false,
                        boss: None,
                    }],
                },
                Gate {
                    number: 2,
                    required_forces: 40.0,
                    packs: vec![],
                },
            ],
            time_limit_secs: 1800.0,
        };

        assert_eq!(dungeon.total_required_forces(), 70.0);
        assert_eq!(dungeon.pack_count(), 1);
        assert!(dungeon.pack(1).is_some());
        assert!(dungeon.pack(99).is_none());
    }
}
