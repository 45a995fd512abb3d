//! Game state snapshot: the read-only view handed to the renderer and the
//! multiplayer-sync collaborator after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::enums::*;
use crate::events::SimEvent;
use crate::orders::CommandNode;
use crate::types::{PlayerId, SimTime, UnitId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub winner: Option<Winner>,
    pub players: Vec<PlayerView>,
    pub units: Vec<UnitView>,
    pub bases: Vec<BaseView>,
    pub structures: Vec<StructureView>,
    pub projectiles: Vec<ProjectileView>,
    pub impacts: Vec<ImpactMarker>,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub photons: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub kind: UnitKind,
    pub owner: PlayerId,
    pub position: Vec2,
    pub rotation: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Smoothed hp for the health bar.
    pub displayed_hp: f32,
    pub dying: bool,
    /// Queued nodes, head first, for path drawing.
    pub queue: Vec<CommandNode>,
    /// True while the queue is fading out.
    pub queue_fading: bool,
    pub effects: Effects,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseView {
    pub owner: PlayerId,
    pub kind: BaseKind,
    pub position: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub shielded: bool,
    pub laser_beam: Option<LaserBeam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureView {
    pub owner: PlayerId,
    pub kind: StructureKind,
    pub position: Vec2,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub owner: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Short-lived marker where something landed, for particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactMarker {
    pub position: Vec2,
    pub radius: f32,
    /// Seconds left before the marker disappears.
    pub remaining: f32,
}
