//! Batch simulation configuration.

use crate::core::engine::EngineMode;
use crate::dungeon::types::Affix;

/// Configuration for a batch of simulated dungeon runs.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random). Run `i` is seeded
    /// with `seed + i`.
    pub seed: Option<u64>,

    /// Key level for every run in the batch
    pub key_level: u32,

    /// Active affixes for every run in the batch
    pub affixes: Vec<Affix>,

    /// Engine mode (validation mode auto-resurrects so runs always complete)
    pub mode: EngineMode,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per-run detail)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            key_level: 10,
            affixes: Vec::new(),
            mode: EngineMode::Validation,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for formula-validation sweeps at a key level.
    pub fn validation(key_level: u32) -> Self {
        Self {
            key_level,
            mode: EngineMode::Validation,
            ..Default::default()
        }
    }

    /// Quick config for gameplay-accurate balance testing.
    pub fn gameplay(key_level: u32) -> Self {
        Self {
            key_level,
            mode: EngineMode::Gameplay,
            ..Default::default()
        }
    }
}
