//! Automatic pull-route generation.
//!
//! Greedy, myopic heuristic: per gate, repeatedly score the unused packs,
//! grow a cluster around the winner, and record it as one pull. It does not
//! attempt global optimality; it guarantees termination (every iteration
//! consumes at least one pack) and a hard per-pull pack cap.

use super::types::{Dungeon, EnemyPack, Gate, Position};
use serde::{Deserialize, Serialize};

/// One planned combat encounter. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePull {
    pub pull_number: u32,
    pub gate: u8,
    pub pack_ids: Vec<u32>,
    pub total_forces: f64,
}

/// Route heuristic tunables.
///
/// The overshoot tolerances intentionally differ between pack scoring and
/// cluster growth; they were tuned independently and are kept as separate
/// knobs rather than unified.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Soft distance (map units) at which proximity scoring halves.
    pub proximity_soft_radius: f64,
    /// Overshoot beyond the gate requirement that starts penalizing a
    /// candidate start pack.
    pub score_overshoot_limit: f64,
    /// Window around the exact remaining requirement that earns a
    /// forces-fit reward.
    pub forces_fit_window: f64,
    /// Max forces overshoot tolerated when growing a cluster; gate bosses
    /// are exempt.
    pub growth_overshoot_limit: f64,
    /// Fraction of the gate requirement that must be accumulated before
    /// boss packs receive their scoring bonus.
    pub boss_score_threshold: f64,
    pub boss_score_bonus: f64,
    /// Score added per unused pack within pull radius of a candidate.
    pub cluster_neighbor_bonus: f64,
    /// Hard ceiling on packs per pull.
    pub max_packs_per_pull: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            proximity_soft_radius: 200.0,
            score_overshoot_limit: 50.0,
            forces_fit_window: 20.0,
            growth_overshoot_limit: 15.0,
            boss_score_threshold: 0.70,
            boss_score_bonus: 75.0,
            cluster_neighbor_bonus: 10.0,
            max_packs_per_pull: 3,
        }
    }
}

/// Generate an ordered route covering all gates sequentially.
pub fn generate_auto_route(dungeon: &Dungeon, config: &RouteConfig) -> Vec<RoutePull> {
    let mut pulls = Vec::new();
    let mut pull_number = 1u32;
    let mut last_position: Option<Position> = None;

    for gate in &dungeon.gates {
        route_gate(gate, config, &mut pulls, &mut pull_number, &mut last_position);
    }
    pulls
}

fn route_gate(
    gate: &Gate,
    config: &RouteConfig,
    pulls: &mut Vec<RoutePull>,
    pull_number: &mut u32,
    last_position: &mut Option<Position>,
) {
    let packs = &gate.packs;
    let mut used = vec![false; packs.len()];
    let mut accumulated = 0.0f64;
    let mut boss_pending = packs.iter().any(|p| p.is_gate_boss);

    while accumulated < gate.required_forces || boss_pending {
        let start = match select_start_pack(
            packs,
            &used,
            accumulated,
            gate.required_forces,
            last_position.as_ref(),
            config,
        ) {
            Some(index) => index,
            // Packs exhausted with requirements unmet: defined degenerate
            // case, the gate simply ends short.
            None => break,
        };

        let cluster = grow_cluster(packs, &used, start, accumulated, gate.required_forces, config);

        let mut forces = 0.0;
        let mut centroid_x = 0.0;
        let mut centroid_y = 0.0;
        let mut pack_ids = Vec::with_capacity(cluster.len());
        for &index in &cluster {
            let pack = &packs[index];
            used[index] = true;
            forces += pack.forces;
            centroid_x += pack.position.x;
            centroid_y += pack.position.y;
            pack_ids.push(pack.id);
            if pack.is_gate_boss {
                boss_pending = false;
            }
        }

        let members = cluster.len() as f64;
        *last_position = Some(Position::new(centroid_x / members, centroid_y / members));
        accumulated += forces;

        pulls.push(RoutePull {
            pull_number: *pull_number,
            gate: gate.number,
            pack_ids,
            total_forces: forces,
        });
        *pull_number += 1;
    }
}

/// Score every unused pack and return the best start. Ties keep the
/// earliest pack in iteration order.
fn select_start_pack(
    packs: &[EnemyPack],
    used: &[bool],
    accumulated: f64,
    required: f64,
    last_position: Option<&Position>,
    config: &RouteConfig,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, pack) in packs.iter().enumerate() {
        if used[index] {
            continue;
        }
        let score = score_pack(pack, packs, used, accumulated, required, last_position, config);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

fn score_pack(
    pack: &EnemyPack,
    packs: &[EnemyPack],
    used: &[bool],
    accumulated: f64,
    required: f64,
    last_position: Option<&Position>,
    config: &RouteConfig,
) -> f64 {
    let mut score = 0.0;

    // Proximity to the previous pull's centroid, softened around the
    // configured radius. The first pull of a dungeon has no anchor.
    if let Some(last) = last_position {
        let distance = last.distance_to(&pack.position);
        score += 100.0 * config.proximity_soft_radius / (config.proximity_soft_radius + distance);
    }

    // Forces fit: reward landing near the remaining requirement, penalize
    // overshooting it by more than the limit.
    let remaining = (required - accumulated).max(0.0);
    let overshoot = pack.forces - remaining;
    if overshoot > config.score_overshoot_limit {
        score -= overshoot - config.score_overshoot_limit;
    } else {
        let closeness = (remaining - pack.forces).abs();
        score += (config.forces_fit_window - closeness).max(0.0);
    }

    // Boss packs become attractive only once most of the gate is cleared.
    if pack.is_gate_boss && required > 0.0 && accumulated >= config.boss_score_threshold * required
    {
        score += config.boss_score_bonus;
    }

    // Clustering: packs with reachable unused neighbors make better pull
    // anchors.
    let neighbors = packs
        .iter()
        .enumerate()
        .filter(|(other_index, other)| {
            !used[*other_index]
                && other.id != pack.id
                && pack.position.distance_to(&other.position)
                    <= pack.pull_radius.max(other.pull_radius)
        })
        .count();
    score += config.cluster_neighbor_bonus * neighbors as f64;

    score
}

/// Grow a cluster from the start pack: any unused pack within the larger of
/// the two pull radii of *any* current member joins, up to the pack cap.
/// Candidates that would overshoot the remaining gate need by more than the
/// growth limit are skipped unless they are the gate boss.
fn grow_cluster(
    packs: &[EnemyPack],
    used: &[bool],
    start: usize,
    accumulated: f64,
    required: f64,
    config: &RouteConfig,
) -> Vec<usize> {
    let mut cluster = vec![start];
    let mut cluster_forces = packs[start].forces;
    let remaining_need = (required - accumulated).max(0.0);

    while cluster.len() < config.max_packs_per_pull {
        let mut added = false;
        for (index, pack) in packs.iter().enumerate() {
            if used[index] || cluster.contains(&index) {
                continue;
            }
            let reachable = cluster.iter().any(|&member_index| {
                let member = &packs[member_index];
                pack.position.distance_to(&member.position)
                    <= pack.pull_radius.max(member.pull_radius)
            });
            if !reachable {
                continue;
            }
            let overshoot = cluster_forces + pack.forces - remaining_need;
            if overshoot > config.growth_overshoot_limit && !pack.is_gate_boss {
                continue;
            }
            cluster.push(index);
            cluster_forces += pack.forces;
            added = true;
            break;
        }
        if !added {
            break;
        }
    }
    cluster
}
