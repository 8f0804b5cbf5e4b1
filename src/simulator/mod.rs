//! Monte-Carlo batch simulation over the dungeon engine.
//!
//! Runs many seeded dungeon simulations to analyze:
//! - Clear rates and timing at each key level
//! - Death counts and upgrade-level distribution
//! - Reward output (experience, loot, orbs)
//!
//! Every run goes through the same engine as a normal simulation, so batch
//! results match single-run behavior exactly.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, run_single};
