//! Dungeon balance simulator CLI.
//!
//! Runs Monte-Carlo batches of dungeon simulations against the built-in
//! demo dungeon and party.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # 100 validation runs at +10
//!   cargo run --bin simulate -- -n 500 -k 15      # 500 runs at key +15
//!   cargo run --bin simulate -- --seed 42         # reproducible batch
//!   cargo run --bin simulate -- --gameplay --affix tyrannical

use keystone::character::standard_party;
use keystone::core::engine::EngineMode;
use keystone::dungeon::data::sample_dungeon;
use keystone::dungeon::types::Affix;
use keystone::loot::LootTables;
use keystone::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args);

    let dungeon = sample_dungeon();
    let party = standard_party(70);
    let tables = LootTables::default_tables();

    println!("Keystone dungeon simulator");
    println!("  Dungeon:   {}", dungeon.name);
    println!("  Key level: +{}", config.key_level);
    println!("  Runs:      {}", config.num_runs);
    println!("  Mode:      {:?}", config.mode);
    if !config.affixes.is_empty() {
        println!("  Affixes:   {:?}", config.affixes);
    }
    if let Some(seed) = config.seed {
        println!("  Seed:      {}", seed);
    }
    println!();

    let report = run_simulation(&config, &dungeon, &party, &tables);

    println!("Results over {} runs:", report.num_runs);
    println!(
        "  Success rate:    {:.1}% ({}/{})",
        report.success_rate * 100.0,
        report.successes,
        report.num_runs
    );
    println!("  Avg time:        {:.0}s of {:.0}s limit", report.avg_time_elapsed, dungeon.time_limit_secs);
    println!("  Avg deaths:      {:.2}", report.avg_deaths);
    println!(
        "  Avg forces:      {:.1} of {:.0}",
        report.avg_forces_cleared,
        dungeon.total_required_forces()
    );
    println!("  Avg experience:  {:.0}", report.avg_experience);
    println!(
        "  Upgrades:        depleted {}  +1 {}  +2 {}  +3 {}",
        report.upgrade_distribution[0],
        report.upgrade_distribution[1],
        report.upgrade_distribution[2],
        report.upgrade_distribution[3]
    );
    if report.validation_failures > 0 {
        println!("  WARNING: {} runs failed validation", report.validation_failures);
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig {
        verbosity: 1,
        ..Default::default()
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if let Some(value) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                    config.num_runs = value;
                }
                i += 2;
            }
            "-k" | "--key" => {
                if let Some(value) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                    config.key_level = value;
                }
                i += 2;
            }
            "--seed" => {
                config.seed = args.get(i + 1).and_then(|v| v.parse().ok());
                i += 2;
            }
            "--gameplay" => {
                config.mode = EngineMode::Gameplay;
                i += 1;
            }
            "--affix" => {
                match args.get(i + 1).map(|v| v.as_str()) {
                    Some("fortified") => config.affixes.push(Affix::Fortified),
                    Some("tyrannical") => config.affixes.push(Affix::Tyrannical),
                    _ => eprintln!("unknown affix, expected fortified|tyrannical"),
                }
                i += 2;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
                i += 1;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
                i += 1;
            }
            other => {
                eprintln!("ignoring unknown argument: {other}");
                i += 1;
            }
        }
    }
    config
}
