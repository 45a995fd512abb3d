//! Map data supplied by the level: playable bounds, obstacles and base
//! spawn points.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::{BaseKind, ObstacleKind};

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closest point inside the rectangle.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Obstacle footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum Shape {
    Rect { min: Vec2, max: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

/// Static or boundary obstacle queried by steering every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    #[serde(default)]
    pub kind: ObstacleKind,
    pub shape: Shape,
}

/// Where a player's base is placed at match start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseSpawn {
    pub position: Vec2,
    #[serde(default)]
    pub kind: BaseKind,
}

/// Complete map description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    pub bounds: Rect,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// One entry per player, indexed by player id.
    pub bases: Vec<BaseSpawn>,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            bounds: Rect::new(Vec2::ZERO, Vec2::new(1600.0, 900.0)),
            obstacles: Vec::new(),
            bases: vec![
                BaseSpawn {
                    position: Vec2::new(120.0, 450.0),
                    kind: BaseKind::Citadel,
                },
                BaseSpawn {
                    position: Vec2::new(1480.0, 450.0),
                    kind: BaseKind::Citadel,
                },
            ],
        }
    }
}
