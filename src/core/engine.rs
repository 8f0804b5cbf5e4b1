//! Tick-based dungeon combat simulator.
//!
//! One engine drives both operating modes. `Gameplay` steps 1.0s ticks and
//! lets wipes end the run; `Validation` steps 0.1s ticks with battle
//! resurrection active so every run reaches a definitive forces-cleared
//! outcome. The per-tick pass order is a correctness invariant: effects,
//! then death resolution, then player actions, then enemy actions. The
//! order decides whether a unit that died this tick can still act.

use crate::character::{Character, Role};
use crate::combat_log::{CombatLogEntry, LogEvent};
use crate::core::constants::*;
use crate::core::entity::{CombatEntity, EffectKind};
use crate::core::mitigation::{self, DamageType, HitKind};
use crate::core::state::{SimState, StateManager};
use crate::dungeon::route::{generate_auto_route, RouteConfig, RoutePull};
use crate::dungeon::types::{Affix, BossPhase, Dungeon, KeyScaling};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Operating mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineMode {
    /// 1.0s ticks, wipes end the run.
    Gameplay,
    /// 0.1s ticks, battle resurrection keeps the run going to completion.
    Validation,
}

impl EngineMode {
    pub fn tick_secs(&self) -> f64 {
        match self {
            EngineMode::Gameplay => GAMEPLAY_TICK_SECS,
            EngineMode::Validation => VALIDATION_TICK_SECS,
        }
    }

    pub fn auto_resurrect(&self) -> bool {
        matches!(self, EngineMode::Validation)
    }
}

/// How one encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncounterResolution {
    Cleared,
    Wiped,
    TimedOut,
}

/// Monotone phase progress for one boss entity in the current encounter.
#[derive(Debug)]
struct PhaseTracker {
    enemy_index: usize,
    /// Sorted by threshold, highest first.
    phases: Vec<BossPhase>,
    next_phase: usize,
}

/// Raw simulator verdict, consumed by the result builder.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub success: bool,
    pub fail_reason: Option<String>,
    pub time_elapsed: f64,
    pub forces_cleared: f64,
    pub forces_required: f64,
    pub deaths: u32,
    pub survivors: u32,
    pub bosses_killed: u32,
    pub route: Vec<RoutePull>,
    pub log: Vec<CombatLogEntry>,
}

/// The dungeon run state machine.
pub struct DungeonSimulator {
    dungeon: Dungeon,
    scaling: KeyScaling,
    affixes: Vec<Affix>,
    mode: EngineMode,
    route_config: RouteConfig,
    state: StateManager,
    bosses_killed: u32,
}

impl DungeonSimulator {
    pub fn new(
        dungeon: Dungeon,
        party: &[Character],
        key_level: u32,
        affixes: Vec<Affix>,
        mode: EngineMode,
    ) -> Self {
        let entities: Vec<CombatEntity> = party.iter().map(CombatEntity::from_character).collect();
        Self {
            dungeon,
            scaling: KeyScaling::for_key_level(key_level),
            affixes,
            mode,
            route_config: RouteConfig::default(),
            state: StateManager::new(SimState::new(entities), mode.auto_resurrect()),
            bosses_killed: 0,
        }
    }

    pub fn with_route_config(mut self, route_config: RouteConfig) -> Self {
        self.route_config = route_config;
        self
    }

    pub fn scaling(&self) -> KeyScaling {
        self.scaling
    }

    /// Stream every new log entry to the callback as it is appended.
    pub fn set_log_callback(&mut self, callback: impl FnMut(&CombatLogEntry) + 'static) {
        self.state.update_with(|s| s.log.set_callback(callback));
    }

    /// Execute the whole run: route, pulls, bosses, verdict.
    pub fn run(mut self, rng: &mut impl Rng) -> SimulationOutcome {
        let route = generate_auto_route(&self.dungeon, &self.route_config);
        let forces_required = self.dungeon.total_required_forces();

        let banner = format!(
            "Keystone +{} run of {} started ({} pulls planned)",
            self.scaling.key_level,
            self.dungeon.name,
            route.len()
        );
        self.state.update_with(|s| {
            let clock = s.clock;
            s.log.record(clock, LogEvent::Run, "engine", "", None, banner);
        });

        let mut fail_reason: Option<String> = None;
        for pull in &route {
            if self.state.state().party_wiped() {
                self.state.update_with(|s| {
                    let clock = s.clock;
                    s.log.record(
                        clock,
                        LogEvent::Run,
                        "engine",
                        "",
                        None,
                        "PARTY WIPE - run abandoned",
                    );
                });
                fail_reason = Some("party wipe".to_string());
                break;
            }

            let (mut enemies, mut trackers) = self.spawn_pull(pull);
            match self.simulate_encounter(&mut enemies, &mut trackers, rng) {
                EncounterResolution::Cleared => {
                    self.bosses_killed +=
                        enemies.iter().filter(|e| e.is_boss && !e.is_alive()).count() as u32;
                    self.state.update_with(|s| {
                        s.forces_cleared += pull.total_forces;
                    });
                    self.between_pull_recovery();
                }
                EncounterResolution::Wiped => {
                    // The next loop iteration's wipe check reports and halts.
                }
                EncounterResolution::TimedOut => {
                    self.state.update_with(|s| {
                        let clock = s.clock;
                        s.log.record(
                            clock,
                            LogEvent::Run,
                            "engine",
                            "",
                            None,
                            "encounter aborted at the simulated-time safety cap",
                        );
                    });
                    fail_reason = Some("encounter exceeded the safety time cap".to_string());
                    break;
                }
            }
        }

        let state = self.state.into_state();
        let survivors = state.living_members() as u32;
        let success =
            fail_reason.is_none() && state.forces_cleared >= forces_required && survivors > 0;
        let fail_reason = if success {
            None
        } else {
            fail_reason.or_else(|| {
                if survivors == 0 {
                    Some("party wipe".to_string())
                } else {
                    Some("forces requirement not met".to_string())
                }
            })
        };

        SimulationOutcome {
            success,
            fail_reason,
            time_elapsed: state.clock,
            forces_cleared: state.forces_cleared,
            forces_required,
            deaths: state.deaths,
            survivors,
            bosses_killed: self.bosses_killed,
            route,
            log: state.log.into_entries(),
        }
    }

    /// Instantiate the enemies of one pull, applying key scaling and the
    /// run's affixes, and log the pull (and any boss engagement).
    fn spawn_pull(&mut self, pull: &RoutePull) -> (Vec<CombatEntity>, Vec<PhaseTracker>) {
        let fortified = self.affixes.contains(&Affix::Fortified);
        let tyrannical = self.affixes.contains(&Affix::Tyrannical);
        let (trash_health_mult, trash_damage_mult) = if fortified {
            (FORTIFIED_TRASH_HEALTH_MULT, FORTIFIED_TRASH_DAMAGE_MULT)
        } else {
            (1.0, 1.0)
        };
        let (boss_health_mult, boss_damage_mult) = if tyrannical {
            (TYRANNICAL_BOSS_HEALTH_MULT, TYRANNICAL_BOSS_DAMAGE_MULT)
        } else {
            (1.0, 1.0)
        };

        let mut enemies = Vec::new();
        let mut trackers = Vec::new();
        let mut pack_names = Vec::new();
        let mut boss_names = Vec::new();

        for pack_id in &pull.pack_ids {
            let pack = match self.dungeon.pack(*pack_id) {
                Some(pack) => pack,
                None => continue,
            };
            pack_names.push(pack.name.clone());

            for member in 1..=pack.count {
                let health =
                    pack.enemy_health * self.scaling.health_multiplier * trash_health_mult;
                let damage =
                    pack.enemy_damage * self.scaling.damage_multiplier * trash_damage_mult;
                enemies.push(CombatEntity::enemy(
                    format!("{} {}", pack.name, member),
                    health,
                    damage,
                    ENEMY_BASE_ACCURACY,
                ));
            }

            if pack.is_gate_boss {
                if let Some(boss) = &pack.boss {
                    let mut entity = CombatEntity::enemy(
                        boss.name.clone(),
                        boss.health * self.scaling.health_multiplier * boss_health_mult,
                        boss.damage * self.scaling.damage_multiplier * boss_damage_mult,
                        ENEMY_BASE_ACCURACY * 1.2,
                    );
                    entity.is_boss = true;

                    let mut phases = boss.phases.clone();
                    phases.sort_by(|a, b| {
                        b.health_threshold
                            .partial_cmp(&a.health_threshold)
                            .unwrap_or(Ordering::Equal)
                    });
                    trackers.push(PhaseTracker {
                        enemy_index: enemies.len(),
                        phases,
                        next_phase: 0,
                    });
                    boss_names.push(boss.name.clone());
                    enemies.push(entity);
                }
            }
        }

        let pull_number = pull.pull_number;
        let gate = pull.gate;
        let forces = pull.total_forces;
        self.state.update_with(|s| {
            s.current_pull = pull_number;
            let clock = s.clock;
            s.log.record(
                clock,
                LogEvent::Pull,
                "engine",
                "",
                Some(forces),
                format!(
                    "{} forces pulled (pull {}, gate {}: {})",
                    forces as i64,
                    pull_number,
                    gate,
                    pack_names.join(", ")
                ),
            );
            for boss_name in &boss_names {
                s.log.record(
                    clock,
                    LogEvent::Boss,
                    "engine",
                    boss_name.clone(),
                    None,
                    format!("{boss_name} engaged"),
                );
            }
        });

        (enemies, trackers)
    }

    /// Drive the tick loop for one encounter until it resolves. The
    /// simulated-time cap is a hard abort and always terminates the loop.
    fn simulate_encounter(
        &mut self,
        enemies: &mut [CombatEntity],
        trackers: &mut [PhaseTracker],
        rng: &mut impl Rng,
    ) -> EncounterResolution {
        let tick = self.mode.tick_secs();
        let mut elapsed = 0.0;

        while elapsed < ENCOUNTER_TIME_CAP_SECS {
            self.tick_once(enemies, trackers, tick, rng);
            elapsed += tick;

            if enemies.iter().all(|e| !e.is_alive()) {
                return EncounterResolution::Cleared;
            }
            // A mid-tick zero-health party only ends the encounter in
            // gameplay mode; validation mode resurrects at the next death
            // resolution pass.
            if self.mode == EngineMode::Gameplay && self.state.state().party_wiped() {
                return EncounterResolution::Wiped;
            }
        }
        EncounterResolution::TimedOut
    }

    /// One tick: effects, deaths, player actions, enemy actions, boss
    /// phases, clock.
    fn tick_once(
        &mut self,
        enemies: &mut [CombatEntity],
        trackers: &mut [PhaseTracker],
        tick: f64,
        rng: &mut impl Rng,
    ) {
        // 1. Active effects and passive regeneration.
        self.state.update_with(|s| {
            let clock = s.clock;
            for member in &mut s.party {
                if member.is_dead {
                    continue;
                }
                member.apply_regen(tick);
                let name = member.name.clone();
                for applied in member.tick_effects(tick) {
                    log_effect_tick(&mut s.log, clock, &name, &applied);
                }
            }
            for enemy in enemies.iter_mut() {
                if enemy.is_dead {
                    continue;
                }
                let name = enemy.name.clone();
                for applied in enemy.tick_effects(tick) {
                    log_effect_tick(&mut s.log, clock, &name, &applied);
                }
            }
        });

        // 2. Death resolution: exactly one death event per entity.
        self.state.update_with(|s| {
            let clock = s.clock;
            for member in &mut s.party {
                if member.health <= 0.0 && !member.is_dead {
                    member.is_dead = true;
                    s.deaths += 1;
                    s.log.record(
                        clock,
                        LogEvent::Death,
                        "combat",
                        member.name.clone(),
                        None,
                        format!("{} died", member.name),
                    );
                }
            }
            for enemy in enemies.iter_mut() {
                if enemy.health <= 0.0 && !enemy.is_dead {
                    enemy.is_dead = true;
                    s.log.record(
                        clock,
                        LogEvent::Death,
                        "combat",
                        enemy.name.clone(),
                        None,
                        format!("{} slain", enemy.name),
                    );
                }
            }
        });

        // 3. Player actions, cooldowns decremented first.
        self.state.update_with(|s| {
            let clock = s.clock;
            for member in &mut s.party {
                if member.is_dead {
                    continue;
                }
                member.attack_cooldown = (member.attack_cooldown - tick).max(0.0);
                member.heal_cooldown = (member.heal_cooldown - tick).max(0.0);
            }

            for actor in 0..s.party.len() {
                if s.party[actor].is_dead {
                    continue;
                }
                match s.party[actor].role {
                    Some(Role::Healer) => {
                        if s.party[actor].heal_cooldown > 0.0 {
                            continue;
                        }
                        let target = s
                            .party
                            .iter()
                            .enumerate()
                            .filter(|(_, m)| m.is_alive())
                            .min_by(|a, b| {
                                a.1.health_fraction()
                                    .partial_cmp(&b.1.health_fraction())
                                    .unwrap_or(Ordering::Equal)
                            })
                            .map(|(index, _)| index);
                        let Some(target) = target else { continue };
                        if s.party[target].health_fraction() >= HEAL_THRESHOLD_FRACTION {
                            continue;
                        }
                        let amount = s.party[actor].damage * HEAL_POWER_FACTOR;
                        if !s.party[actor].spend_mana(HEAL_MANA_COST) {
                            continue;
                        }
                        let healed = s.party[target].heal(amount);
                        s.party[actor].heal_cooldown = HEAL_COOLDOWN_SECS;
                        let source = s.party[actor].name.clone();
                        let target_name = s.party[target].name.clone();
                        s.log.record(
                            clock,
                            LogEvent::Heal,
                            source,
                            target_name.clone(),
                            Some(healed),
                            format!("{} healing on {}", healed as i64, target_name),
                        );
                    }
                    _ => {
                        if s.party[actor].attack_cooldown > 0.0 {
                            continue;
                        }
                        let Some(enemy) = enemies.iter_mut().find(|e| e.is_alive()) else {
                            continue;
                        };
                        let mut damage = s.party[actor].damage;
                        if s.party[actor].role == Some(Role::Tank) {
                            damage *= TANK_DAMAGE_FACTOR;
                        }
                        let crit = rng.gen::<f64>() * 100.0 < s.party[actor].crit_chance;
                        if crit {
                            damage *= s.party[actor].crit_multiplier;
                        }
                        damage *= mitigation::armor_multiplier(enemy.armor, damage);
                        enemy.apply_damage(damage);
                        s.party[actor].attack_cooldown = ATTACK_COOLDOWN_SECS;
                        s.log.record(
                            clock,
                            LogEvent::Damage,
                            s.party[actor].name.clone(),
                            enemy.name.clone(),
                            Some(damage),
                            format!(
                                "{} damage to {}{}",
                                damage as i64,
                                enemy.name,
                                if crit { " (critical)" } else { "" }
                            ),
                        );
                    }
                }
            }
        });

        // 4. Enemy actions, then boss phase transitions, then the clock.
        self.state.update_with(|s| {
            let clock = s.clock;
            for enemy in enemies.iter_mut() {
                enemy.attack_cooldown = (enemy.attack_cooldown - tick).max(0.0);
                if !enemy.is_alive() || enemy.attack_cooldown > 0.0 {
                    continue;
                }
                let living: Vec<usize> = s
                    .party
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.is_alive())
                    .map(|(index, _)| index)
                    .collect();
                if living.is_empty() {
                    break;
                }
                // Tanks hold attention; otherwise pick a random living target.
                let target = living
                    .iter()
                    .copied()
                    .find(|&index| s.party[index].role == Some(Role::Tank))
                    .unwrap_or_else(|| living[rng.gen_range(0..living.len())]);

                let outcome = mitigation::resolve_hit(
                    enemy.damage,
                    DamageType::Physical,
                    HitKind::Attack,
                    enemy.accuracy,
                    &s.party[target].defenses(),
                    rng,
                );
                s.party[target].apply_hit(&outcome);
                enemy.attack_cooldown = ATTACK_COOLDOWN_SECS;

                let landed = outcome.total_damage();
                let suffix = if outcome.evaded {
                    " (evaded)"
                } else if outcome.blocked {
                    " (blocked)"
                } else {
                    ""
                };
                let target_name = s.party[target].name.clone();
                s.log.record(
                    clock,
                    LogEvent::Damage,
                    enemy.name.clone(),
                    target_name.clone(),
                    Some(landed),
                    format!("{} damage to {}{}", landed as i64, target_name, suffix),
                );
            }

            for tracker in trackers.iter_mut() {
                let boss = &enemies[tracker.enemy_index];
                while tracker.next_phase < tracker.phases.len()
                    && boss.health_fraction() <= tracker.phases[tracker.next_phase].health_threshold
                {
                    let phase = &tracker.phases[tracker.next_phase];
                    s.log.record(
                        clock,
                        LogEvent::Phase,
                        boss.name.clone(),
                        "",
                        Some(phase.health_threshold * 100.0),
                        format!("{} entered phase: {}", boss.name, phase.name),
                    );
                    tracker.next_phase += 1;
                }
            }

            s.clock += tick;
        });
    }

    /// Flat recovery between pulls: 20% life, 30% mana, survivors only.
    fn between_pull_recovery(&mut self) {
        self.state.update_with(|s| {
            for member in &mut s.party {
                if member.is_dead {
                    continue;
                }
                let life = member.max_health * BETWEEN_PULL_LIFE_RECOVERY;
                member.heal(life);
                member.mana =
                    (member.mana + member.max_mana * BETWEEN_PULL_MANA_RECOVERY).min(member.max_mana);
            }
        });
    }
}

fn log_effect_tick(
    log: &mut crate::combat_log::CombatLog,
    clock: f64,
    entity_name: &str,
    applied: &crate::core::entity::EffectTick,
) {
    match applied.kind {
        EffectKind::DamageOverTime => log.record(
            clock,
            LogEvent::Damage,
            applied.effect_name.clone(),
            entity_name.to_string(),
            Some(applied.amount),
            format!(
                "{} damage to {} ({})",
                applied.amount as i64, entity_name, applied.effect_name
            ),
        ),
        EffectKind::HealOverTime => log.record(
            clock,
            LogEvent::Heal,
            applied.effect_name.clone(),
            entity_name.to_string(),
            Some(applied.amount),
            format!(
                "{} healing on {} ({})",
                applied.amount as i64, entity_name, applied.effect_name
            ),
        ),
        EffectKind::Buff | EffectKind::Debuff => {}
    }
}
