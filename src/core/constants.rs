// Tick and timing
pub const GAMEPLAY_TICK_SECS: f64 = 1.0;
pub const VALIDATION_TICK_SECS: f64 = 0.1;
pub const ENCOUNTER_TIME_CAP_SECS: f64 = 3600.0;
pub const ATTACK_COOLDOWN_SECS: f64 = 1.0;
pub const HEAL_COOLDOWN_SECS: f64 = 2.0;

// Mitigation formula caps
pub const ARMOR_DAMAGE_FACTOR: f64 = 25.0;
pub const ARMOR_REDUCTION_CAP: f64 = 0.90;
pub const EVADE_CHANCE_CAP: f64 = 0.95;
pub const BLOCK_CHANCE_CAP: f64 = 75.0;
pub const BLOCK_DAMAGE_REDUCTION: f64 = 0.30;
pub const SUPPRESSION_CHANCE_CAP: f64 = 100.0;
pub const SUPPRESSION_DAMAGE_REDUCTION: f64 = 0.50;
pub const RESISTANCE_CAP: f64 = 75.0;

// Party behavior
pub const HEAL_THRESHOLD_FRACTION: f64 = 0.90;
pub const HEAL_POWER_FACTOR: f64 = 2.0;
pub const HEAL_MANA_COST: f64 = 40.0;
pub const TANK_DAMAGE_FACTOR: f64 = 0.70;
pub const BETWEEN_PULL_LIFE_RECOVERY: f64 = 0.20;
pub const BETWEEN_PULL_MANA_RECOVERY: f64 = 0.30;

// Enemies
pub const ENEMY_BASE_ACCURACY: f64 = 500.0;

// Battle resurrection (validation mode only)
pub const RESURRECT_LIFE_FRACTION: f64 = 0.60;
pub const RESURRECT_MANA_FRACTION: f64 = 0.30;
pub const RESURRECT_DEDUP_WINDOW_SECS: f64 = 0.1;

// Affix multipliers
pub const TYRANNICAL_BOSS_HEALTH_MULT: f64 = 1.4;
pub const TYRANNICAL_BOSS_DAMAGE_MULT: f64 = 1.15;
pub const FORTIFIED_TRASH_HEALTH_MULT: f64 = 1.20;
pub const FORTIFIED_TRASH_DAMAGE_MULT: f64 = 1.30;

// Key level scaling: enemy health/damage compound per level above 1,
// reward multipliers grow linearly
pub const KEY_COMBAT_SCALING_PER_LEVEL: f64 = 0.08;
pub const KEY_ITEM_QUANTITY_PER_LEVEL: f64 = 0.10;
pub const KEY_ITEM_RARITY_PER_LEVEL: f64 = 0.15;
pub const KEY_REWARD_PER_LEVEL: f64 = 0.20;

// Timed-run upgrade thresholds (fraction of the time limit)
pub const UPGRADE_PLUS_THREE_FRACTION: f64 = 0.60;
pub const UPGRADE_PLUS_TWO_FRACTION: f64 = 0.80;
