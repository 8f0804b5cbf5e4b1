//! Dungeon definitions and route planning.

pub mod data;
pub mod route;
pub mod types;

pub use data::sample_dungeon;
pub use route::{generate_auto_route, RouteConfig, RoutePull};
pub use types::{Affix, Boss, BossPhase, Dungeon, EnemyPack, Gate, KeyScaling, Position};
