//! Fundamental geometric, identity and time types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 2D position on the battlefield (x = east, y = south, screen convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Stable identifier assigned to a unit at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Player index. Valid values are `0..player_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Simulation time tracking.
///
/// Frames advance by measured wall-clock deltas, not a fixed step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of frames simulated so far.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }
}

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The opposing player in a two-player match.
    pub fn opponent(self) -> PlayerId {
        PlayerId(1 - self.0.min(1))
    }
}

impl SimTime {
    /// Advance by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
