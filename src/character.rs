//! Party member definitions.
//!
//! `Character` is owned by the calling application; the engine only reads
//! it and projects it into a runtime `CombatEntity` at pull start.

use crate::core::mitigation::Resistances;
use serde::{Deserialize, Serialize};

/// Party role. All role-gated behavior dispatches on this enum; nothing in
/// the engine inspects character names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Tank,
    Healer,
    Dps,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Tank => "tank",
            Role::Healer => "healer",
            Role::Dps => "dps",
        }
    }
}

/// Base combat stats of a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_life: f64,
    pub max_mana: f64,
    pub armor: f64,
    pub evasion: f64,
    pub energy_shield: f64,
    pub resistances: Resistances,
    /// Attack block chance, percent.
    pub block_chance: f64,
    /// Spell block chance, percent.
    pub spell_block_chance: f64,
    /// Spell suppression chance, percent.
    pub spell_suppression_chance: f64,
    /// Critical strike chance, percent.
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    /// Life regenerated per second.
    pub life_regen: f64,
    /// Mana regenerated per second.
    pub mana_regen: f64,
    /// Damage per attack before role modifiers.
    pub damage: f64,
    pub accuracy: f64,
}

impl BaseStats {
    /// Reasonable stat line for a role at a level. Used by the demo party
    /// and the simulator; real callers supply their own builds.
    pub fn for_role(role: Role, level: u32) -> Self {
        let level_factor = 1.0 + 0.02 * level.saturating_sub(1) as f64;
        let resistances = Resistances {
            fire: 75.0,
            cold: 75.0,
            lightning: 75.0,
            chaos: 40.0,
        };
        match role {
            Role::Tank => Self {
                max_life: 3500.0 * level_factor,
                max_mana: 300.0,
                armor: 2500.0 * level_factor,
                evasion: 400.0,
                energy_shield: 500.0,
                resistances,
                block_chance: 50.0,
                spell_block_chance: 30.0,
                spell_suppression_chance: 20.0,
                crit_chance: 10.0,
                crit_multiplier: 1.5,
                life_regen: 35.0,
                mana_regen: 5.0,
                damage: 180.0 * level_factor,
                accuracy: 1400.0,
            },
            Role::Healer => Self {
                max_life: 2200.0 * level_factor,
                max_mana: 900.0,
                armor: 600.0,
                evasion: 600.0,
                energy_shield: 800.0 * level_factor,
                resistances,
                block_chance: 10.0,
                spell_block_chance: 20.0,
                spell_suppression_chance: 40.0,
                crit_chance: 10.0,
                crit_multiplier: 1.5,
                life_regen: 20.0,
                mana_regen: 25.0,
                damage: 120.0 * level_factor,
                accuracy: 1200.0,
            },
            Role::Dps => Self {
                max_life: 2400.0 * level_factor,
                max_mana: 500.0,
                armor: 800.0,
                evasion: 1200.0,
                energy_shield: 600.0,
                resistances,
                block_chance: 15.0,
                spell_block_chance: 10.0,
                spell_suppression_chance: 60.0,
                crit_chance: 35.0,
                crit_multiplier: 2.0,
                life_regen: 15.0,
                mana_regen: 12.0,
                damage: 260.0 * level_factor,
                accuracy: 1800.0,
            },
        }
    }
}

/// A party member supplied by the caller. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub role: Role,
    pub level: u32,
    pub stats: BaseStats,
}

impl Character {
    pub fn new(name: impl Into<String>, role: Role, level: u32) -> Self {
        Self {
            name: name.into(),
            role,
            level,
            stats: BaseStats::for_role(role, level),
        }
    }
}

/// A standard five-member party: one tank, one healer, three dps.
pub fn standard_party(level: u32) -> Vec<Character> {
    vec![
        Character::new("Brakka", Role::Tank, level),
        Character::new("Seris", Role::Healer, level),
        Character::new("Vex", Role::Dps, level),
        Character::new("Odrin", Role::Dps, level),
        Character::new("Milla", Role::Dps, level),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_party_composition() {
        let party = standard_party(70);
        assert_eq!(party.len(), 5);
        assert_eq!(party.iter().filter(|c| c.role == Role::Tank).count(), 1);
        assert_eq!(party.iter().filter(|c| c.role == Role::Healer).count(), 1);
        assert_eq!(party.iter().filter(|c| c.role == Role::Dps).count(), 3);
    }

    #[test]
    fn test_stats_scale_with_level() {
        let low = BaseStats::for_role(Role::Tank, 1);
        let high = BaseStats::for_role(Role::Tank, 50);
        assert!(high.max_life > low.max_life);
        assert!(high.damage > low.damage);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::Tank.label(), "tank");
        assert_eq!(Role::Healer.label(), "healer");
        assert_eq!(Role::Dps.label(), "dps");
    }
}
