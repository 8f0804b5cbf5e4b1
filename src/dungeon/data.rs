//! Built-in demo dungeon.
//!
//! Real deployments feed the engine dungeon definitions from game data;
//! this fixed three-gate layout backs the demo binary and the test suite.

use super::types::{Boss, BossPhase, Dungeon, EnemyPack, Gate, Position};

fn pack(
    id: u32,
    name: &str,
    gate: u8,
    x: f64,
    y: f64,
    pull_radius: f64,
    forces: f64,
    count: u32,
    enemy_health: f64,
    enemy_damage: f64,
) -> EnemyPack {
    EnemyPack {
        id,
        name: name.to_string(),
        position: Position::new(x, y),
        pull_radius,
        forces,
        gate,
        count,
        enemy_health,
        enemy_damage,
        is_gate_boss: false,
        boss: None,
    }
}

fn boss_pack(
    id: u32,
    name: &str,
    gate: u8,
    x: f64,
    y: f64,
    forces: f64,
    boss: Boss,
) -> EnemyPack {
    EnemyPack {
        id,
        name: name.to_string(),
        position: Position::new(x, y),
        pull_radius: 50.0,
        forces,
        gate,
        count: 2,
        enemy_health: 450.0,
        enemy_damage: 28.0,
        is_gate_boss: true,
        boss: Some(boss),
    }
}

fn phase(name: &str, health_threshold: f64) -> BossPhase {
    BossPhase {
        name: name.to_string(),
        health_threshold,
    }
}

/// The Sunken Bastion: three gates, 100 total required forces, a boss at
/// the end of each gate.
pub fn sample_dungeon() -> Dungeon {
    Dungeon {
        name: "The Sunken Bastion".to_string(),
        time_limit_secs: 1500.0,
        gates: vec![
            Gate {
                number: 1,
                required_forces: 30.0,
                packs: vec![
                    pack(1, "Gatecrash Rotlings", 1, 20.0, 30.0, 40.0, 9.0, 3, 400.0, 30.0),
                    pack(2, "Rotling Skirmishers", 1, 60.0, 50.0, 40.0, 9.0, 3, 380.0, 28.0),
                    pack(3, "Fetid Shamblers", 1, 120.0, 20.0, 35.0, 10.0, 2, 520.0, 35.0),
                    pack(4, "Carrion Swarm", 1, 180.0, 70.0, 45.0, 8.0, 4, 300.0, 22.0),
                    pack(5, "Gravebound Sentries", 1, 240.0, 40.0, 35.0, 10.0, 2, 550.0, 38.0),
                    boss_pack(
                        6,
                        "Gatewarden's Court",
                        1,
                        310.0,
                        50.0,
                        4.0,
                        Boss {
                            name: "Korzul the Gatewarden".to_string(),
                            health: 6000.0,
                            damage: 110.0,
                            phases: vec![phase("Bonestorm", 0.70), phase("Desperation", 0.30)],
                        },
                    ),
                ],
            },
            Gate {
                number: 2,
                required_forces: 35.0,
                packs: vec![
                    pack(7, "Tidecaller Acolytes", 2, 420.0, 30.0, 40.0, 9.0, 3, 430.0, 32.0),
                    pack(8, "Brinehide Brutes", 2, 470.0, 60.0, 40.0, 11.0, 2, 600.0, 42.0),
                    pack(9, "Drowned Watch", 2, 540.0, 25.0, 35.0, 10.0, 3, 450.0, 34.0),
                    pack(10, "Reefback Crawlers", 2, 600.0, 75.0, 45.0, 8.0, 4, 320.0, 24.0),
                    pack(11, "Siltfang Packmother", 2, 660.0, 45.0, 35.0, 10.0, 2, 580.0, 40.0),
                    boss_pack(
                        12,
                        "Maw Attendants",
                        2,
                        720.0,
                        50.0,
                        4.0,
                        Boss {
                            name: "Maw of the Deep".to_string(),
                            health: 7500.0,
                            damage: 125.0,
                            phases: vec![phase("Riptide", 0.66), phase("Abyssal Hunger", 0.33)],
                        },
                    ),
                ],
            },
            Gate {
                number: 3,
                required_forces: 35.0,
                packs: vec![
                    pack(13, "Bastion Remnants", 3, 830.0, 35.0, 40.0, 9.0, 3, 470.0, 35.0),
                    pack(14, "Runeblind Zealots", 3, 880.0, 60.0, 40.0, 10.0, 3, 490.0, 36.0),
                    pack(15, "Keybound Constructs", 3, 950.0, 25.0, 35.0, 11.0, 2, 640.0, 45.0),
                    pack(16, "Vault Skitterers", 3, 1000.0, 70.0, 45.0, 8.0, 4, 330.0, 25.0),
                    pack(17, "Wardens of the Seal", 3, 1060.0, 45.0, 35.0, 10.0, 2, 620.0, 44.0),
                    boss_pack(
                        18,
                        "Avatar's Honor Guard",
                        3,
                        1120.0,
                        50.0,
                        4.0,
                        Boss {
                            name: "Avatar of the Key".to_string(),
                            health: 9000.0,
                            damage: 140.0,
                            phases: vec![
                                phase("Keystone Resonance", 0.75),
                                phase("Shattered Wards", 0.50),
                                phase("Final Invocation", 0.25),
                            ],
                        },
                    ),
                ],
            },
        ],
    }
}
