//! Events emitted by the simulation for audio, effects and UI feedback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{PlayerId, UnitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    MatchStarted,
    UnitSpawned {
        unit: UnitId,
        kind: UnitKind,
        owner: PlayerId,
    },
    UnitDied {
        unit: UnitId,
        kind: UnitKind,
        owner: PlayerId,
        position: Vec2,
    },
    /// A queue was cancelled after the unit stayed stuck too long.
    QueueCancelled { unit: UnitId },
    ProjectileFired {
        owner: PlayerId,
        kind: ProjectileKind,
        from: Vec2,
    },
    ProjectileImpact { kind: ProjectileKind, position: Vec2 },
    AbilityCast {
        unit: UnitId,
        kind: UnitKind,
        position: Vec2,
    },
    ComboSwing { unit: UnitId, swing: u8 },
    KnifeThrown { unit: UnitId, target: Vec2 },
    Recloaked { unit: UnitId },
    /// Damage that an active base shield absorbed.
    ShieldBlocked { owner: PlayerId, amount: f32 },
    BaseDamaged {
        owner: PlayerId,
        amount: f32,
        remaining: f32,
    },
    StructureBuilt {
        owner: PlayerId,
        kind: StructureKind,
        position: Vec2,
    },
    StructureDestroyed {
        owner: PlayerId,
        kind: StructureKind,
    },
    MatchEnded { winner: Winner },
}
