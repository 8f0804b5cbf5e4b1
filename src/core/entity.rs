//! Runtime combat entities and timed effects.
//!
//! A `CombatEntity` is the engine's mutable projection of a `Character` or
//! an enemy pack member. Player entities persist across pulls; enemy
//! entities live for exactly one pull. Every pool setter clamps, so no
//! externally observable health/mana/energy-shield value can ever be
//! negative or non-finite.

use crate::character::{Character, Role};
use crate::core::mitigation::{Defenses, HitOutcome, Resistances};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    DamageOverTime,
    HealOverTime,
    Buff,
    Debuff,
}

/// A timed modifier attached to an entity. Ticks every `tick_interval_secs`
/// of simulated time, applying `value_per_tick * stacks`, and is removed
/// once `remaining_secs` reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub name: String,
    pub kind: EffectKind,
    pub value_per_tick: f64,
    pub remaining_secs: f64,
    pub tick_interval_secs: f64,
    pub since_last_tick: f64,
    pub stacks: u32,
}

impl ActiveEffect {
    pub fn new(
        name: impl Into<String>,
        kind: EffectKind,
        value_per_tick: f64,
        duration_secs: f64,
        tick_interval_secs: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            value_per_tick,
            remaining_secs: duration_secs,
            tick_interval_secs,
            since_last_tick: 0.0,
            stacks: 1,
        }
    }
}

/// One applied effect tick, reported so the engine can log it.
#[derive(Debug, Clone)]
pub struct EffectTick {
    pub effect_name: String,
    pub kind: EffectKind,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEntity {
    pub name: String,
    /// Party role for players; `None` for enemies.
    pub role: Option<Role>,
    pub is_boss: bool,
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub energy_shield: f64,
    pub max_energy_shield: f64,
    pub damage: f64,
    pub accuracy: f64,
    pub armor: f64,
    pub evasion: f64,
    pub block_chance: f64,
    pub block_buff: f64,
    pub spell_block_chance: f64,
    pub spell_suppression_chance: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub life_regen: f64,
    pub mana_regen: f64,
    pub resistances: Resistances,
    pub attack_cooldown: f64,
    pub heal_cooldown: f64,
    pub effects: Vec<ActiveEffect>,
    pub is_dead: bool,
    /// Simulated-time stamp of the most recent battle resurrection.
    pub last_resurrected_at: Option<f64>,
}

impl CombatEntity {
    /// Project a character into a fresh runtime entity.
    pub fn from_character(character: &Character) -> Self {
        let s = &character.stats;
        Self {
            name: character.name.clone(),
            role: Some(character.role),
            is_boss: false,
            health: s.max_life,
            max_health: s.max_life,
            mana: s.max_mana,
            max_mana: s.max_mana,
            energy_shield: s.energy_shield,
            max_energy_shield: s.energy_shield,
            damage: s.damage,
            accuracy: s.accuracy,
            armor: s.armor,
            evasion: s.evasion,
            block_chance: s.block_chance,
            block_buff: 0.0,
            spell_block_chance: s.spell_block_chance,
            spell_suppression_chance: s.spell_suppression_chance,
            crit_chance: s.crit_chance,
            crit_multiplier: s.crit_multiplier,
            life_regen: s.life_regen,
            mana_regen: s.mana_regen,
            resistances: s.resistances,
            attack_cooldown: 0.0,
            heal_cooldown: 0.0,
            effects: Vec::new(),
            is_dead: false,
            last_resurrected_at: None,
        }
    }

    /// Build an enemy entity. Enemies carry only the stats the engine
    /// actually exercises for them.
    pub fn enemy(name: impl Into<String>, health: f64, damage: f64, accuracy: f64) -> Self {
        Self {
            name: name.into(),
            role: None,
            is_boss: false,
            health: health.max(1.0),
            max_health: health.max(1.0),
            mana: 0.0,
            max_mana: 0.0,
            energy_shield: 0.0,
            max_energy_shield: 0.0,
            damage: damage.max(0.0),
            accuracy,
            armor: 0.0,
            evasion: 0.0,
            block_chance: 0.0,
            block_buff: 0.0,
            spell_block_chance: 0.0,
            spell_suppression_chance: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
            life_regen: 0.0,
            mana_regen: 0.0,
            resistances: Resistances::default(),
            attack_cooldown: 0.0,
            heal_cooldown: 0.0,
            effects: Vec::new(),
            is_dead: false,
            last_resurrected_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead && self.health > 0.0
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Mitigation snapshot for an incoming hit.
    pub fn defenses(&self) -> Defenses {
        Defenses {
            armor: self.armor,
            evasion: self.evasion,
            block_chance: self.block_chance,
            block_buff: self.block_buff,
            spell_block_chance: self.spell_block_chance,
            spell_suppression_chance: self.spell_suppression_chance,
            resistances: self.resistances,
            energy_shield: self.energy_shield,
            life: self.health,
        }
    }

    /// Commit a resolved hit: the outcome already carries the final pool
    /// values from the mitigation pipeline.
    pub fn apply_hit(&mut self, outcome: &HitOutcome) {
        self.set_energy_shield(outcome.es_remaining);
        self.set_health(outcome.life_remaining);
    }

    /// Direct health loss that bypasses energy shield (damage over time).
    pub fn apply_damage(&mut self, amount: f64) {
        if amount > 0.0 {
            self.set_health(self.health - amount);
        }
    }

    /// Restore health, capped at the maximum. Returns the amount actually
    /// restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 || self.is_dead {
            return 0.0;
        }
        let before = self.health;
        self.set_health(self.health + amount);
        self.health - before
    }

    pub fn spend_mana(&mut self, amount: f64) -> bool {
        if self.mana < amount {
            return false;
        }
        self.set_mana(self.mana - amount);
        true
    }

    /// Passive per-second regeneration, scaled by the tick length.
    pub fn apply_regen(&mut self, dt: f64) {
        if self.is_dead {
            return;
        }
        self.set_health(self.health + self.life_regen * dt);
        self.set_mana(self.mana + self.mana_regen * dt);
    }

    /// Advance all active effects by `dt` simulated seconds, applying any
    /// that reach their tick interval and dropping expired ones. Returns
    /// the applied ticks for logging.
    pub fn tick_effects(&mut self, dt: f64) -> Vec<EffectTick> {
        let mut applied = Vec::new();
        let mut damage_total = 0.0;
        let mut heal_total = 0.0;

        for effect in &mut self.effects {
            effect.since_last_tick += dt;
            effect.remaining_secs -= dt;

            if effect.since_last_tick >= effect.tick_interval_secs {
                effect.since_last_tick = 0.0;
                let amount = effect.value_per_tick * effect.stacks as f64;
                match effect.kind {
                    EffectKind::DamageOverTime => damage_total += amount,
                    EffectKind::HealOverTime => heal_total += amount,
                    EffectKind::Buff | EffectKind::Debuff => {}
                }
                applied.push(EffectTick {
                    effect_name: effect.name.clone(),
                    kind: effect.kind,
                    amount,
                });
            }
        }
        self.effects.retain(|e| e.remaining_secs > 0.0);

        self.apply_damage(damage_total);
        self.heal(heal_total);
        applied
    }

    fn set_health(&mut self, value: f64) {
        self.health = sanitize(value, self.health).clamp(0.0, self.max_health.max(0.0));
    }

    fn set_mana(&mut self, value: f64) {
        self.mana = sanitize(value, self.mana).clamp(0.0, self.max_mana.max(0.0));
    }

    fn set_energy_shield(&mut self, value: f64) {
        self.energy_shield =
            sanitize(value, self.energy_shield).clamp(0.0, self.max_energy_shield.max(0.0));
    }
}

fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
