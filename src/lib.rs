//! Keystone - combat resolution and route planning for tick-based dungeon
//! runs.
//!
//! Given a party of characters, a dungeon definition, and a key level, the
//! engine plans a pull route, resolves combat tick by tick through a
//! layered mitigation model, and produces a verifiable `DungeonRunResult`
//! plus a full causal combat log. Presentation, persistence, and character
//! building are the calling application's concern; this crate only
//! simulates.

pub mod character;
pub mod combat_log;
pub mod core;
pub mod dungeon;
pub mod loot;
pub mod result;
pub mod simulator;
pub mod stats;

pub use crate::core::{DungeonSimulator, EngineMode, SimulationOutcome};
pub use character::{BaseStats, Character, Role};
pub use combat_log::{CombatLog, CombatLogEntry, LogEvent};
pub use dungeon::{generate_auto_route, Affix, Dungeon, KeyScaling, RouteConfig, RoutePull};
pub use loot::LootTables;
pub use result::{DungeonRunResult, ResultBuilder, RunValidation};
pub use stats::RunStatsTracker;
