//! Engine configuration.
//!
//! Every field has a default so a partial JSON document is enough.

use serde::{Deserialize, Serialize};

use skirmish_core::constants::*;
use skirmish_core::enums::UnitKind;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs = same match.
    pub seed: u64,
    pub player_count: u8,
    pub starting_photons: f64,
    /// Photons per second every player with a living base earns.
    pub base_income_per_sec: f64,
    /// Match time limit in seconds; 0 disables it.
    pub time_limit_secs: f64,
    /// Distance-traveled promotion. Off unless explicitly enabled.
    pub promotion_enabled: bool,
    /// Projectiles constructed up front, capped at `projectile_pool_max`.
    pub projectile_pool_prewarm: usize,
    /// Released projectiles kept for reuse; the rest are dropped.
    pub projectile_pool_max: usize,
    /// Unit kinds every player may spawn.
    pub enabled_units: Vec<UnitKind>,
    /// Frame deltas above this are clamped.
    pub max_frame_dt: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player_count: PLAYER_COUNT,
            starting_photons: STARTING_PHOTONS,
            base_income_per_sec: BASE_INCOME_PER_SEC,
            time_limit_secs: 0.0,
            promotion_enabled: false,
            projectile_pool_prewarm: PROJECTILE_POOL_PREWARM,
            projectile_pool_max: PROJECTILE_POOL_MAX,
            enabled_units: UnitKind::ALL.to_vec(),
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}
