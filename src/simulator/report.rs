//! Batch simulation report generation.

use crate::result::{DungeonRunResult, RunValidation};

/// Aggregated results from a batch of simulated runs.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub num_runs: u32,
    pub successes: u32,
    pub success_rate: f64,
    pub validation_failures: u32,

    pub avg_time_elapsed: f64,
    pub avg_deaths: f64,
    pub avg_forces_cleared: f64,
    pub avg_experience: f64,

    /// Runs that earned upgrade level 0, +1, +2, +3.
    pub upgrade_distribution: [u32; 4],

    /// Individual run results for detailed analysis.
    pub results: Vec<DungeonRunResult>,
}

impl SimReport {
    /// Aggregate completed runs into a report.
    pub fn from_runs(runs: Vec<(DungeonRunResult, RunValidation)>) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;

        let successes = runs.iter().filter(|(r, _)| r.success).count() as u32;
        let validation_failures = runs.iter().filter(|(_, v)| !v.passed).count() as u32;

        let avg_time_elapsed =
            runs.iter().map(|(r, _)| r.time_elapsed).sum::<f64>() / divisor;
        let avg_deaths = runs.iter().map(|(r, _)| r.deaths as f64).sum::<f64>() / divisor;
        let avg_forces_cleared =
            runs.iter().map(|(r, _)| r.forces_cleared).sum::<f64>() / divisor;
        let avg_experience =
            runs.iter().map(|(r, _)| r.experience_gained as f64).sum::<f64>() / divisor;

        let mut upgrade_distribution = [0u32; 4];
        for (result, _) in &runs {
            let bucket = (result.upgrade_level as usize).min(3);
            upgrade_distribution[bucket] += 1;
        }

        Self {
            num_runs,
            successes,
            success_rate: successes as f64 / divisor,
            validation_failures,
            avg_time_elapsed,
            avg_deaths,
            avg_forces_cleared,
            avg_experience,
            upgrade_distribution,
            results: runs.into_iter().map(|(r, _)| r).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::CombatLogEntry;
    use uuid::Uuid;

    fn run(success: bool, upgrade: u32, deaths: u32) -> (DungeonRunResult, RunValidation) {
        let result = DungeonRunResult {
            run_id: Uuid::new_v4(),
            success,
            fail_reason: None,
            key_level: 5,
            time_elapsed: 400.0,
            time_limit: 1500.0,
            upgrade_level: upgrade,
            loot: Vec::new(),
            orb_drops: Vec::new(),
            fragment_drops: Vec::new(),
            experience_gained: 10_000,
            deaths,
            forces_cleared: 100.0,
            forces_required: 100.0,
            completed_at: 0,
            combat_log: Vec::<CombatLogEntry>::new(),
        };
        let validation = RunValidation {
            passed: true,
            pulls_planned: 10,
            forces_cleared: 100.0,
            forces_required: 100.0,
            issues: Vec::new(),
        };
        (result, validation)
    }

    #[test]
    fn test_report_aggregates() {
        let report = SimReport::from_runs(vec![
            run(true, 3, 0),
            run(true, 2, 1),
            run(false, 0, 5),
            run(true, 3, 0),
        ]);

        assert_eq!(report.num_runs, 4);
        assert_eq!(report.successes, 3);
        assert!((report.success_rate - 0.75).abs() < 1e-12);
        assert_eq!(report.upgrade_distribution, [1, 0, 1, 2]);
        assert!((report.avg_deaths - 1.5).abs() < 1e-12);
        assert_eq!(report.validation_failures, 0);
    }

    #[test]
    fn test_empty_report_does_not_divide_by_zero() {
        let report = SimReport::from_runs(Vec::new());
        assert_eq!(report.num_runs, 0);
        assert_eq!(report.success_rate, 0.0);
        assert_eq!(report.avg_deaths, 0.0);
    }
}
