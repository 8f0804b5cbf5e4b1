//! Batch simulation runner.
//!
//! Runs many seeded dungeon simulations through the real engine and
//! aggregates their results, the Monte-Carlo harness used for balance and
//! formula validation. Each run gets an isolated engine instance; nothing
//! is shared across runs except the immutable inputs.

use super::config::SimConfig;
use super::report::SimReport;
use crate::character::Character;
use crate::core::engine::DungeonSimulator;
use crate::dungeon::types::{Dungeon, KeyScaling};
use crate::loot::LootTables;
use crate::result::{DungeonRunResult, ResultBuilder, RunValidation};
use crate::stats::RunStatsTracker;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Run the full batch and return an aggregated report.
pub fn run_simulation(
    config: &SimConfig,
    dungeon: &Dungeon,
    party: &[Character],
    tables: &LootTables,
) -> SimReport {
    let mut runs = Vec::with_capacity(config.num_runs as usize);

    for run_index in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_index as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let (result, validation) = run_single(config, dungeon, party, tables, &mut rng);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - {} +{}: {} in {:.0}s, {} forces, {} deaths{}",
                run_index + 1,
                config.num_runs,
                dungeon.name,
                config.key_level,
                if result.success { "cleared" } else { "failed" },
                result.time_elapsed,
                result.forces_cleared,
                result.deaths,
                if validation.passed {
                    String::new()
                } else {
                    format!(" [validation: {}]", validation.issues.join("; "))
                }
            );
        }

        runs.push((result, validation));
    }

    SimReport::from_runs(runs)
}

/// Simulate one run end to end: engine, stats tracking, result building,
/// validation.
pub fn run_single(
    config: &SimConfig,
    dungeon: &Dungeon,
    party: &[Character],
    tables: &LootTables,
    rng: &mut impl Rng,
) -> (DungeonRunResult, RunValidation) {
    let engine = DungeonSimulator::new(
        dungeon.clone(),
        party,
        config.key_level,
        config.affixes.clone(),
        config.mode,
    );
    let outcome = engine.run(rng);
    let route = outcome.route.clone();

    let mut stats = RunStatsTracker::new(party.iter().map(|c| c.name.clone()));
    stats.ingest(&outcome.log);

    let builder = ResultBuilder::new(tables, KeyScaling::for_key_level(config.key_level));
    let result = builder.build(outcome, dungeon.time_limit_secs, rng);
    let validation = builder.validate(&result, &route, &stats);

    (result, validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::standard_party;
    use crate::dungeon::data::sample_dungeon;

    #[test]
    fn test_single_seeded_run() {
        let config = SimConfig {
            num_runs: 1,
            seed: Some(12345),
            key_level: 1,
            verbosity: 0,
            ..Default::default()
        };
        let dungeon = sample_dungeon();
        let party = standard_party(70);
        let tables = LootTables::default_tables();

        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let (result, validation) = run_single(&config, &dungeon, &party, &tables, &mut rng);

        assert!(result.success, "key 1 run should clear: {:?}", result.fail_reason);
        assert!(result.forces_cleared >= 100.0);
        assert!(validation.passed, "issues: {:?}", validation.issues);
    }

    #[test]
    fn test_batch_simulation() {
        let config = SimConfig {
            num_runs: 5,
            seed: Some(42),
            key_level: 2,
            verbosity: 0,
            ..Default::default()
        };
        let dungeon = sample_dungeon();
        let party = standard_party(70);
        let tables = LootTables::default_tables();

        let report = run_simulation(&config, &dungeon, &party, &tables);

        assert_eq!(report.num_runs, 5);
        assert_eq!(report.results.len(), 5);
        assert!(report.success_rate > 0.0);
        assert_eq!(report.validation_failures, 0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SimConfig {
            num_runs: 2,
            seed: Some(777),
            key_level: 3,
            verbosity: 0,
            ..Default::default()
        };
        let dungeon = sample_dungeon();
        let party = standard_party(70);
        let tables = LootTables::default_tables();

        let first = run_simulation(&config, &dungeon, &party, &tables);
        let second = run_simulation(&config, &dungeon, &party, &tables);

        for (a, b) in first.results.iter().zip(second.results.iter()) {
            assert_eq!(a.time_elapsed, b.time_elapsed);
            assert_eq!(a.forces_cleared, b.forces_cleared);
            assert_eq!(a.deaths, b.deaths);
            assert_eq!(a.combat_log.len(), b.combat_log.len());
        }
    }
}
