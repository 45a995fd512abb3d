//! Simulation engine for the skirmish core.
//!
//! Owns the hecs ECS world, runs the per-frame systems in a fixed order
//! and produces `GameStateSnapshot`s for the renderer and the sync layer.

pub mod abilities;
pub mod config;
pub mod damage;
pub mod engine;
pub mod error;
pub mod map;
pub mod pool;
pub mod projectile;
pub mod systems;
pub mod world_setup;

pub use config::SimConfig;
pub use engine::SimulationEngine;
pub use error::{SimError, UnitFault};
pub use skirmish_core as core;

#[cfg(test)]
mod tests;
