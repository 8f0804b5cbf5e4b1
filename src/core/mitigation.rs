//! Layered damage-mitigation formulas.
//!
//! These pure functions convert raw damage plus defender stats into final
//! damage without side effects. Both the dungeon engine and the batch
//! simulator use these for consistent combat math.
//!
//! A single hit resolves in a fixed order: avoidance rolls (evade, block,
//! suppression) first, then armor for physical damage or resistance for
//! elemental/chaos damage, then energy shield absorption, then life.

use crate::core::constants::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Damage classification. Physical is mitigated by armor; everything else
/// by the matching resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
}

impl DamageType {
    pub fn is_physical(&self) -> bool {
        matches!(self, DamageType::Physical)
    }
}

/// Delivery mechanism of a hit. Attacks can be evaded and blocked; spells
/// can be spell-blocked and suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Attack,
    Spell,
}

/// Per-type resistances of a defender, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    pub fire: f64,
    pub cold: f64,
    pub lightning: f64,
    pub chaos: f64,
}

impl Resistances {
    /// Resistance applicable to a damage type. Physical damage is exempt
    /// from resistance and returns 0.
    pub fn for_damage_type(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => 0.0,
            DamageType::Fire => self.fire,
            DamageType::Cold => self.cold,
            DamageType::Lightning => self.lightning,
            DamageType::Chaos => self.chaos,
        }
    }
}

/// Snapshot of a defender's mitigation-relevant stats for one hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defenses {
    pub armor: f64,
    pub evasion: f64,
    pub block_chance: f64,
    pub block_buff: f64,
    pub spell_block_chance: f64,
    pub spell_suppression_chance: f64,
    pub resistances: Resistances,
    pub energy_shield: f64,
    pub life: f64,
}

/// How one hit split across energy shield and life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EsAbsorption {
    pub damage_to_es: f64,
    pub damage_to_life: f64,
    pub es_remaining: f64,
    pub life_remaining: f64,
}

/// Fully resolved hit: avoidance flags plus the energy shield split.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitOutcome {
    pub evaded: bool,
    pub blocked: bool,
    pub suppressed: bool,
    pub damage_to_es: f64,
    pub damage_to_life: f64,
    pub es_remaining: f64,
    pub life_remaining: f64,
}

impl HitOutcome {
    /// Total damage that landed on the defender.
    pub fn total_damage(&self) -> f64 {
        self.damage_to_es + self.damage_to_life
    }
}

/// Substitute non-finite values with a fallback instead of propagating them.
fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Pass-through multiplier after armor.
///
/// Reduction is `armor / (armor + 25 * raw_damage)`, capped at 90%, so the
/// returned multiplier is always in `[0.10, 1.0]`. Armor is less effective
/// against larger hits. Zero armor or non-positive damage means no reduction.
pub fn armor_multiplier(armor: f64, raw_damage: f64) -> f64 {
    if armor <= 0.0 || raw_damage <= 0.0 {
        return 1.0;
    }
    let reduction = (armor / (armor + ARMOR_DAMAGE_FACTOR * raw_damage)).min(ARMOR_REDUCTION_CAP);
    1.0 - sanitize(reduction, 0.0)
}

/// Chance for the defender to evade an attack, in `[0, 0.95]`.
///
/// Chance-to-hit is `accuracy / (accuracy + (evasion/4)^0.8)`. Zero evasion
/// never evades; a non-positive accuracy attacker is evaded at the cap.
pub fn evade_chance(evasion: f64, accuracy: f64) -> f64 {
    if evasion <= 0.0 {
        return 0.0;
    }
    if accuracy <= 0.0 {
        return EVADE_CHANCE_CAP;
    }
    let chance_to_hit = accuracy / (accuracy + (evasion / 4.0).powf(0.8));
    sanitize(1.0 - chance_to_hit, 0.0).clamp(0.0, EVADE_CHANCE_CAP)
}

/// Roll whether an attack is evaded.
pub fn roll_evade(evasion: f64, accuracy: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < evade_chance(evasion, accuracy)
}

/// Roll a block attempt. Chance plus buff is capped at 75%; a successful
/// block reduces the hit by a fixed 30%.
pub fn roll_block(block_chance: f64, buff: f64, rng: &mut impl Rng) -> bool {
    let chance = (block_chance + buff).min(BLOCK_CHANCE_CAP);
    rng.gen::<f64>() * 100.0 < chance
}

/// Roll a spell suppression attempt. Chance is capped at 100%; success
/// reduces the hit by a fixed 50%.
pub fn roll_suppression(suppression_chance: f64, rng: &mut impl Rng) -> bool {
    let chance = suppression_chance.min(SUPPRESSION_CHANCE_CAP);
    rng.gen::<f64>() * 100.0 < chance
}

/// Pass-through multiplier after elemental/chaos resistance.
/// Resistance is capped at 75%. Negative resistance amplifies damage.
pub fn resistance_multiplier(resistance: f64) -> f64 {
    1.0 - sanitize(resistance, 0.0).min(RESISTANCE_CAP) / 100.0
}

/// Split already-mitigated damage across energy shield and life.
///
/// Energy shield absorbs before life for every damage type, chaos included.
/// All four outputs are finite: non-finite intermediates fall back to the
/// corresponding current value rather than poisoning the combat state.
pub fn absorb_with_energy_shield(adjusted_damage: f64, energy_shield: f64, life: f64) -> EsAbsorption {
    let current_es = sanitize(energy_shield, 0.0).max(0.0);
    let current_life = sanitize(life, 0.0).max(0.0);
    let damage = sanitize(adjusted_damage, 0.0).max(0.0);

    let damage_to_es = damage.min(current_es);
    let damage_to_life = (damage - current_es).max(0.0);

    EsAbsorption {
        damage_to_es: sanitize(damage_to_es, 0.0),
        damage_to_life: sanitize(damage_to_life, 0.0),
        es_remaining: sanitize(current_es - damage_to_es, current_es).max(0.0),
        life_remaining: sanitize(current_life - damage_to_life, current_life).max(0.0),
    }
}

/// Resolve one hit through the full mitigation pipeline.
///
/// Order: avoidance rolls, then armor (physical) or resistance
/// (elemental/chaos), then energy shield, then life. The outcome carries
/// the avoidance flags and the final pool values so the caller can commit
/// them to the defender in one step.
pub fn resolve_hit(
    raw_damage: f64,
    damage_type: DamageType,
    kind: HitKind,
    attacker_accuracy: f64,
    defenses: &Defenses,
    rng: &mut impl Rng,
) -> HitOutcome {
    let mut outcome = HitOutcome {
        es_remaining: sanitize(defenses.energy_shield, 0.0).max(0.0),
        life_remaining: sanitize(defenses.life, 0.0).max(0.0),
        ..HitOutcome::default()
    };

    let mut damage = sanitize(raw_damage, 0.0);
    if damage <= 0.0 {
        return outcome;
    }

    match kind {
        HitKind::Attack => {
            if roll_evade(defenses.evasion, attacker_accuracy, rng) {
                outcome.evaded = true;
                return outcome;
            }
            if roll_block(defenses.block_chance, defenses.block_buff, rng) {
                outcome.blocked = true;
                damage *= 1.0 - BLOCK_DAMAGE_REDUCTION;
            }
        }
        HitKind::Spell => {
            if roll_block(defenses.spell_block_chance, defenses.block_buff, rng) {
                outcome.blocked = true;
                damage *= 1.0 - BLOCK_DAMAGE_REDUCTION;
            }
            if roll_suppression(defenses.spell_suppression_chance, rng) {
                outcome.suppressed = true;
                damage *= 1.0 - SUPPRESSION_DAMAGE_REDUCTION;
            }
        }
    }

    damage *= if damage_type.is_physical() {
        armor_multiplier(defenses.armor, damage)
    } else {
        resistance_multiplier(defenses.resistances.for_damage_type(damage_type))
    };

    let split = absorb_with_energy_shield(damage, defenses.energy_shield, defenses.life);
    outcome.damage_to_es = split.damage_to_es;
    outcome.damage_to_life = split.damage_to_life;
    outcome.es_remaining = split.es_remaining;
    outcome.life_remaining = split.life_remaining;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_multiplier_no_armor() {
        assert_eq!(armor_multiplier(0.0, 100.0), 1.0);
        assert_eq!(armor_multiplier(-50.0, 100.0), 1.0);
    }

    #[test]
    fn test_armor_multiplier_no_damage() {
        assert_eq!(armor_multiplier(1000.0, 0.0), 1.0);
        assert_eq!(armor_multiplier(1000.0, -5.0), 1.0);
    }

    #[test]
    fn test_armor_diminishes_against_big_hits() {
        // 2000 armor vs 500 raw: reduction 2000/14500 = 13.8%
        let vs_big = armor_multiplier(2000.0, 500.0);
        assert!((vs_big - 0.862).abs() < 0.001, "got {vs_big}");

        // 2000 armor vs 100 raw: reduction 2000/4500 = 44.4%
        let vs_small = armor_multiplier(2000.0, 100.0);
        assert!((vs_small - 0.556).abs() < 0.001, "got {vs_small}");
    }

    #[test]
    fn test_armor_multiplier_monotone_in_armor() {
        let damage = 250.0;
        let mut previous = armor_multiplier(0.0, damage);
        for armor in (0..200).map(|i| i as f64 * 100.0) {
            let multiplier = armor_multiplier(armor, damage);
            assert!(
                multiplier <= previous + 1e-12,
                "multiplier rose from {previous} to {multiplier} at armor {armor}"
            );
            assert!((0.10..=1.0).contains(&multiplier));
            previous = multiplier;
        }
    }

    #[test]
    fn test_armor_multiplier_floor() {
        // Absurd armor against a tiny hit still caps at 90% reduction
        assert!((armor_multiplier(1e12, 1.0) - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_evade_chance_bounds() {
        assert_eq!(evade_chance(0.0, 1000.0), 0.0);
        assert_eq!(evade_chance(5000.0, 0.0), EVADE_CHANCE_CAP);
        assert_eq!(evade_chance(5000.0, -10.0), EVADE_CHANCE_CAP);

        for evasion in [1.0, 50.0, 800.0, 20_000.0, 1e9] {
            for accuracy in [1.0, 100.0, 2000.0, 1e9] {
                let chance = evade_chance(evasion, accuracy);
                assert!(
                    (0.0..=EVADE_CHANCE_CAP).contains(&chance),
                    "evade {chance} out of bounds for evasion {evasion} accuracy {accuracy}"
                );
            }
        }
    }

    #[test]
    fn test_block_chance_capped_at_75() {
        let mut rng = rand::thread_rng();
        let trials = 10_000;
        let mut blocked = 0;
        for _ in 0..trials {
            if roll_block(100.0, 0.0, &mut rng) {
                blocked += 1;
            }
        }
        // Capped at 75%, so ~25% of rolls must still fail
        let rate = blocked as f64 / trials as f64;
        assert!(
            (0.72..=0.78).contains(&rate),
            "expected ~75% block rate at the cap, got {rate:.3}"
        );
    }

    #[test]
    fn test_block_never_with_zero_chance() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert!(!roll_block(0.0, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_suppression_always_at_cap() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert!(roll_suppression(150.0, &mut rng));
        }
    }

    #[test]
    fn test_resistance_multiplier_caps() {
        assert!((resistance_multiplier(75.0) - 0.25).abs() < 1e-12);
        assert!((resistance_multiplier(100.0) - 0.25).abs() < 1e-12);
        assert!((resistance_multiplier(0.0) - 1.0).abs() < 1e-12);
        // Negative resistance amplifies
        assert!(resistance_multiplier(-60.0) > 1.0);
    }

    #[test]
    fn test_physical_exempt_from_resistance() {
        let res = Resistances {
            fire: 75.0,
            cold: 75.0,
            lightning: 75.0,
            chaos: 75.0,
        };
        assert_eq!(res.for_damage_type(DamageType::Physical), 0.0);
        assert_eq!(res.for_damage_type(DamageType::Fire), 75.0);
    }

    #[test]
    fn test_energy_shield_depletes_before_life() {
        // 150 raw, 100 ES, 50 life: ES fully drains, entity exactly dies
        let split = absorb_with_energy_shield(150.0, 100.0, 50.0);
        assert_eq!(split.damage_to_es, 100.0);
        assert_eq!(split.damage_to_life, 50.0);
        assert_eq!(split.es_remaining, 0.0);
        assert_eq!(split.life_remaining, 0.0);
    }

    #[test]
    fn test_energy_shield_partial_absorb() {
        let split = absorb_with_energy_shield(60.0, 100.0, 50.0);
        assert_eq!(split.damage_to_es, 60.0);
        assert_eq!(split.damage_to_life, 0.0);
        assert_eq!(split.es_remaining, 40.0);
        assert_eq!(split.life_remaining, 50.0);
    }

    #[test]
    fn test_energy_shield_never_produces_nan() {
        let cases = [
            (f64::NAN, 100.0, 50.0),
            (f64::INFINITY, 100.0, 50.0),
            (80.0, f64::NAN, 50.0),
            (80.0, 100.0, f64::NAN),
            (f64::NEG_INFINITY, f64::NAN, f64::INFINITY),
        ];
        for (damage, es, life) in cases {
            let split = absorb_with_energy_shield(damage, es, life);
            assert!(split.damage_to_es.is_finite());
            assert!(split.damage_to_life.is_finite());
            assert!(split.es_remaining.is_finite());
            assert!(split.life_remaining.is_finite());
            assert!(split.es_remaining >= 0.0);
            assert!(split.life_remaining >= 0.0);
        }
    }

    #[test]
    fn test_resolve_hit_physical_uses_armor() {
        let mut rng = rand::thread_rng();
        let defenses = Defenses {
            armor: 2000.0,
            energy_shield: 0.0,
            life: 1000.0,
            ..Defenses::default()
        };
        let outcome = resolve_hit(
            500.0,
            DamageType::Physical,
            HitKind::Attack,
            1000.0,
            &defenses,
            &mut rng,
        );
        // No evasion/block possible, so damage is exactly 500 * 0.862
        assert!(!outcome.evaded && !outcome.blocked);
        assert!((outcome.damage_to_life - 500.0 * 0.862_068_965).abs() < 0.01);
    }

    #[test]
    fn test_resolve_hit_elemental_uses_resistance() {
        let mut rng = rand::thread_rng();
        let defenses = Defenses {
            armor: 10_000.0, // must be ignored for fire
            resistances: Resistances {
                fire: 75.0,
                ..Resistances::default()
            },
            life: 1000.0,
            ..Defenses::default()
        };
        let outcome = resolve_hit(
            400.0,
            DamageType::Fire,
            HitKind::Spell,
            1000.0,
            &defenses,
            &mut rng,
        );
        assert!((outcome.damage_to_life - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_hit_evaded_leaves_pools_untouched() {
        let mut rng = rand::thread_rng();
        let defenses = Defenses {
            evasion: 1e9,
            energy_shield: 40.0,
            life: 100.0,
            ..Defenses::default()
        };
        // Attacker with zero accuracy is evaded at the 95% cap; retry until
        // the roll lands (statistically immediate)
        for _ in 0..200 {
            let outcome = resolve_hit(
                50.0,
                DamageType::Physical,
                HitKind::Attack,
                0.0,
                &defenses,
                &mut rng,
            );
            if outcome.evaded {
                assert_eq!(outcome.total_damage(), 0.0);
                assert_eq!(outcome.es_remaining, 40.0);
                assert_eq!(outcome.life_remaining, 100.0);
                return;
            }
        }
        panic!("no evade in 200 rolls at 95% evade chance");
    }

    #[test]
    fn test_resolve_hit_nonpositive_damage_is_noop() {
        let mut rng = rand::thread_rng();
        let defenses = Defenses {
            life: 100.0,
            ..Defenses::default()
        };
        for raw in [0.0, -25.0, f64::NAN] {
            let outcome = resolve_hit(
                raw,
                DamageType::Physical,
                HitKind::Attack,
                100.0,
                &defenses,
                &mut rng,
            );
            assert_eq!(outcome.total_damage(), 0.0);
            assert_eq!(outcome.life_remaining, 100.0);
        }
    }

    #[test]
    fn test_resolve_hit_suppression_halves_spell() {
        let mut rng = rand::thread_rng();
        let defenses = Defenses {
            spell_suppression_chance: 100.0,
            life: 1000.0,
            ..Defenses::default()
        };
        let outcome = resolve_hit(
            200.0,
            DamageType::Lightning,
            HitKind::Spell,
            1000.0,
            &defenses,
            &mut rng,
        );
        assert!(outcome.suppressed);
        assert!((outcome.damage_to_life - 100.0).abs() < 1e-9);
    }
}
