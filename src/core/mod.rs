//! Core combat engine: mitigation math, entities, state, tick loop.

pub mod constants;
pub mod engine;
pub mod entity;
pub mod mitigation;
pub mod state;

pub use engine::{DungeonSimulator, EngineMode, SimulationOutcome};
pub use entity::{ActiveEffect, CombatEntity, EffectKind};
pub use state::{PartialState, SimState, StateManager};
